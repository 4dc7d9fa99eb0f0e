//! Shape-morph reveal for a floating icon: the icon travels between a window
//! rect and its resting place while its clip morphs from the launcher's icon
//! shape into the window's rounded rectangle.

pub mod canvas;
pub mod color;
pub mod controller;
pub mod drawable;
pub mod easing;
pub mod geometry;
pub mod rect_anim;
pub mod registry;
pub mod reveal;
pub mod shape;
pub mod spring;

pub use controller::{LayoutParams, MorphConfig, MorphController, RevealPhase};
pub use registry::ShapeRegistry;
pub use shape::{IconShape, ShapeError};
