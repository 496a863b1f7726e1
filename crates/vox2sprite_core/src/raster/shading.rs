//! Per-face flat shading.
//!
//! Top faces keep the palette colour. Right and left faces lose a third and
//! two thirds of their lightness. Alpha always passes through.

use serde::Deserialize;

use crate::projection::Face;
use crate::vox::Rgba;

/// How a face's darkening amount is applied to a colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingModel {
    /// Scale HSL lightness by `1 - amount`, keeping hue and saturation.
    #[default]
    Hsl,
    /// Scale each RGB channel by `1 - amount`.
    Rgb,
}

/// Shades a palette colour for the given face.
#[must_use]
pub fn shade(color: Rgba, face: Face, model: ShadingModel) -> Rgba {
    let amount = face.darkening();
    if amount == 0.0 {
        return color;
    }
    let (r, g, b) = match model {
        ShadingModel::Hsl => {
            let (h, s, l) = rgb_to_hsl(color);
            hsl_to_rgb(h, s, l * (1.0 - amount))
        }
        ShadingModel::Rgb => {
            let keep = 1.0 - amount;
            (
                unit(color.r) * keep,
                unit(color.g) * keep,
                unit(color.b) * keep,
            )
        }
    };
    Rgba::new(to_channel(r), to_channel(g), to_channel(b), color.a)
}

#[inline]
fn unit(channel: u8) -> f64 {
    f64::from(channel) / 255.0
}

/// Rounds half to even, like a clamped byte array store.
#[inline]
fn to_channel(value: f64) -> u8 {
    (value * 255.0).round_ties_even().clamp(0.0, 255.0) as u8
}

/// Returns `(hue in [0, 1), saturation, lightness)`.
fn rgb_to_hsl(color: Rgba) -> (f64, f64, f64) {
    let (r, g, b) = (unit(color.r), unit(color.g), unit(color.b));
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;

    if delta == 0.0 {
        return (0.0, 0.0, l);
    }

    let s = if l <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let sector = if r == max {
        (g - b) / delta
    } else if g == max {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    let h = (sector / 6.0).rem_euclid(1.0);
    (h, s, l)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let t2 = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let t1 = 2.0 * l - t2;
    let channel = |t: f64| {
        let t = t.rem_euclid(1.0);
        if 6.0 * t < 1.0 {
            t1 + (t2 - t1) * 6.0 * t
        } else if 2.0 * t < 1.0 {
            t2
        } else if 3.0 * t < 2.0 {
            t1 + (t2 - t1) * (2.0 / 3.0 - t) * 6.0
        } else {
            t1
        }
    };
    (channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
}
