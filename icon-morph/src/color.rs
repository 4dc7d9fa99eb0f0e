//! Alpha compositing for terminal cells.
//!
//! Cells carry no alpha channel, so translucent paint is blended into the
//! color already in the cell. Blending happens in Oklch so fades keep their
//! perceived lightness instead of going muddy halfway.

use std::f32::consts::PI;

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    pub l: f32,
    pub c: f32,
    pub h: f32,
}

/// Blends `paint` over `under` with `alpha` in `[0, 1]`.
///
/// Colors without an RGB equivalent (`Reset`, `Indexed`) snap: the paint wins
/// from half opacity up.
pub fn composite(under: Color, paint: Color, alpha: f32) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);

    if alpha >= 1.0 {
        return paint;
    }

    if alpha <= 0.0 {
        return under;
    }

    match (to_oklch(under), to_oklch(paint)) {
        (Some(a), Some(b)) => from_oklch(lerp(a, b, alpha)),
        _ if alpha >= 0.5 => paint,
        _ => under,
    }
}

/// Hue takes the shortest arc.
pub fn lerp(a: Oklch, b: Oklch, t: f32) -> Oklch {
    let mut dh = b.h - a.h;

    if dh > PI {
        dh -= 2.0 * PI;
    } else if dh < -PI {
        dh += 2.0 * PI;
    }

    Oklch {
        l: a.l + (b.l - a.l) * t,
        c: a.c + (b.c - a.c) * t,
        h: a.h + dh * t,
    }
}

pub fn to_oklch(color: Color) -> Option<Oklch> {
    let (r, g, b) = match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black => (0, 0, 0),
        Color::Red => (128, 0, 0),
        Color::Green => (0, 128, 0),
        Color::Yellow => (128, 128, 0),
        Color::Blue => (0, 0, 128),
        Color::Magenta => (128, 0, 128),
        Color::Cyan => (0, 128, 128),
        Color::Gray => (192, 192, 192),
        Color::DarkGray => (128, 128, 128),
        Color::LightRed => (255, 0, 0),
        Color::LightGreen => (0, 255, 0),
        Color::LightYellow => (255, 255, 0),
        Color::LightBlue => (0, 0, 255),
        Color::LightMagenta => (255, 0, 255),
        Color::LightCyan => (0, 255, 255),
        Color::White => (255, 255, 255),
        Color::Reset | Color::Indexed(_) => return None,
    };

    Some(srgb_to_oklch(r, g, b))
}

pub fn from_oklch(lch: Oklch) -> Color {
    let (r, g, b) = oklch_to_srgb(lch);
    Color::Rgb(r, g, b)
}

fn srgb_to_oklch(r: u8, g: u8, b: u8) -> Oklch {
    let decode = |c: u8| {
        let c = c as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    let (r, g, b) = (decode(r), decode(g), decode(b));

    let l = (0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b).cbrt();
    let m = (0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b).cbrt();
    let s = (0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b).cbrt();

    let lab_l = 0.2104542553 * l + 0.7936177850 * m - 0.0040720468 * s;
    let lab_a = 1.9779984951 * l - 2.4285922050 * m + 0.4505937099 * s;
    let lab_b = 0.0259040371 * l + 0.7827717662 * m - 0.8086757660 * s;

    let c = (lab_a * lab_a + lab_b * lab_b).sqrt();
    let h = if c < 1e-8 { 0.0 } else { lab_b.atan2(lab_a) };

    Oklch { l: lab_l, c, h }
}

fn oklch_to_srgb(lch: Oklch) -> (u8, u8, u8) {
    let a = lch.c * lch.h.cos();
    let b = lch.c * lch.h.sin();

    let l = (lch.l + 0.3963377774 * a + 0.2158037573 * b).powi(3);
    let m = (lch.l - 0.1055613458 * a - 0.0638541728 * b).powi(3);
    let s = (lch.l - 0.0894841775 * a - 1.2914855480 * b).powi(3);

    let r = 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s;
    let g = -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s;
    let b = -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s;

    let encode = |c: f32| {
        let c = c.clamp(0.0, 1.0);
        let c = if c <= 0.0031308 {
            c * 12.92
        } else {
            1.055 * c.powf(1.0 / 2.4) - 0.055
        };
        (c * 255.0 + 0.5) as u8
    };

    (encode(r), encode(g), encode(b))
}
