//! The active icon shape and the values derived from it.

use std::sync::OnceLock;

use lyon_path::Path;

use crate::shape::IconShape;

/// Ratio of the diameter of a normalized circular icon to the actual icon
/// size.
pub const ICON_VISIBLE_AREA_FACTOR: f32 = 0.92;

/// Side of the cached outline returned by [`ShapeRegistry::shape_path`].
pub const DEFAULT_PATH_SIZE: f32 = 100.0;

/// One shape selection, shared by every controller it is handed to.
///
/// The shape is fixed for the registry's lifetime; pick another by building
/// another registry.
#[derive(Debug)]
pub struct ShapeRegistry {
    shape: IconShape,
    normalization_scale: f32,
    shape_path: OnceLock<Path>,
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new(IconShape::default())
    }
}

impl ShapeRegistry {
    pub fn new(shape: IconShape) -> Self {
        Self {
            shape,
            normalization_scale: ICON_VISIBLE_AREA_FACTOR,
            shape_path: OnceLock::new(),
        }
    }

    pub fn with_normalization_scale(self, normalization_scale: f32) -> Self {
        Self {
            normalization_scale,
            ..self
        }
    }

    pub fn shape(&self) -> IconShape {
        self.shape
    }

    pub fn normalization_scale(&self) -> f32 {
        self.normalization_scale
    }

    /// Outline of the active shape in a `DEFAULT_PATH_SIZE` square at the
    /// origin, built on first use.
    pub fn shape_path(&self) -> &Path {
        self.shape_path
            .get_or_init(|| self.shape.outline_path(0.0, 0.0, DEFAULT_PATH_SIZE * 0.5))
    }
}

#[cfg(test)]
mod tests {
    use lyon_algorithms::aabb::bounding_box;

    use super::*;

    #[test]
    fn defaults_match_launcher_conventions() {
        let registry = ShapeRegistry::default();

        assert_eq!(registry.shape(), IconShape::rounded_square(0.5).unwrap());
        assert_eq!(registry.normalization_scale(), ICON_VISIBLE_AREA_FACTOR);
    }

    #[test]
    fn shape_path_is_cached_at_default_size() {
        let registry = ShapeRegistry::new(IconShape::squircle(0.2).unwrap());
        let first = registry.shape_path() as *const Path;
        let second = registry.shape_path() as *const Path;
        assert_eq!(first, second);

        let bounds = bounding_box(registry.shape_path().iter());
        assert!((bounds.width() - DEFAULT_PATH_SIZE).abs() < 0.5);
        assert!(bounds.min.x.abs() < 0.5 && bounds.min.y.abs() < 0.5);
    }

    #[test]
    fn registries_are_independent() {
        let circle = ShapeRegistry::new(IconShape::Circle).with_normalization_scale(1.0);
        let tear_drop = ShapeRegistry::new(IconShape::tear_drop(0.4).unwrap());

        assert!(circle.shape().enable_shape_detection());
        assert!(!tear_drop.shape().enable_shape_detection());
        assert_eq!(circle.normalization_scale(), 1.0);
        assert_eq!(tear_drop.normalization_scale(), ICON_VISIBLE_AREA_FACTOR);
    }
}
