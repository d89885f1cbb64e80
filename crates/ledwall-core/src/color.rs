#![forbid(unsafe_code)]

//! HSL/RGB color conversion.
//!
//! Two value scales are used by the pipeline and must never be mixed
//! implicitly:
//! - **normalized**: saturation/lightness in `[0.0, 1.0]`, the contract of
//!   [`hsl_to_rgb`]/[`rgb_to_hsl`] and of video-frame sampling;
//! - **percent**: saturation/lightness in `[0, 100]`, the contract of
//!   pattern generators ([`CellColor`]).
//!
//! Hue is always degrees. Conversions between the scales are explicit
//! ([`CellColor::normalized`], [`CellColor::from_normalized`]).
//!
//! # Determinism
//!
//! All functions here are pure and total. There are no error cases: hue is
//! wrapped modulo 360 (including negative input) and the remaining channels
//! are expected pre-clamped by callers.

/// Convert HSL to RGB.
///
/// `h` is in degrees (any finite value; wrapped into `[0, 360)`), `s` and
/// `l` are normalized `[0, 1]`. Returns `(r, g, b)` normalized `[0, 1]`.
///
/// Uses the standard hexagonal-prism construction: chroma
/// `c = (1 - |2l - 1|) * s`, intermediate `x = c * (1 - |((h/60) mod 2) - 1|)`,
/// sector selection on `h/60`, and lightness offset `m = l - c/2` added to
/// every channel.
#[inline]
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = ((h % 360.0) + 360.0) % 360.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - ((hp % 2.0) - 1.0).abs());

    let (r1, g1, b1) = if hp < 1.0 {
        (c, x, 0.0)
    } else if hp < 2.0 {
        (x, c, 0.0)
    } else if hp < 3.0 {
        (0.0, c, x)
    } else if hp < 4.0 {
        (0.0, x, c)
    } else if hp < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    let m = l - c / 2.0;
    (r1 + m, g1 + m, b1 + m)
}

/// Convert RGB to HSL.
///
/// All inputs normalized `[0, 1]`. Returns `(h, s, l)` with hue in degrees
/// `[0, 360)` and saturation/lightness normalized.
///
/// The achromatic case (`max == min`) yields `h = 0, s = 0`. The saturation
/// denominator branches on `l > 0.5`, matching the standard formulation.
#[inline]
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h * 60.0, s, l)
}

/// A cell color on the percent scale: hue in degrees, saturation and
/// lightness in `[0, 100]`.
///
/// This is what pattern generators produce for one grid cell at one
/// instant. It is not persisted; the simulator recomputes it every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellColor {
    /// Hue in degrees. May be any finite value; consumers wrap it.
    pub hue: f64,
    /// Saturation, percent `[0, 100]`.
    pub saturation: f64,
    /// Lightness, percent `[0, 100]`.
    pub lightness: f64,
}

impl CellColor {
    /// An unlit (black) cell.
    pub const UNLIT: Self = Self {
        hue: 0.0,
        saturation: 0.0,
        lightness: 0.0,
    };

    /// Create a cell color from percent-scale components.
    #[inline]
    pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Build from normalized HSL (saturation/lightness in `[0, 1]`), as
    /// produced by [`rgb_to_hsl`]. The scale conversion is explicit here so
    /// the two contracts are never mixed silently.
    #[inline]
    pub fn from_normalized(h: f64, s: f64, l: f64) -> Self {
        Self {
            hue: h,
            saturation: s * 100.0,
            lightness: l * 100.0,
        }
    }

    /// Normalized `(h, s, l)` with saturation/lightness clamped to `[0, 1]`.
    #[inline]
    pub fn normalized(&self) -> (f64, f64, f64) {
        (
            self.hue,
            (self.saturation / 100.0).clamp(0.0, 1.0),
            (self.lightness / 100.0).clamp(0.0, 1.0),
        )
    }

    /// Copy with a different percent-scale lightness.
    #[inline]
    pub const fn with_lightness(mut self, lightness: f64) -> Self {
        self.lightness = lightness;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    #[test]
    fn primary_colors() {
        let (r, g, b) = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((r - 1.0).abs() < EPS && g.abs() < EPS && b.abs() < EPS);

        let (r, g, b) = hsl_to_rgb(120.0, 1.0, 0.5);
        assert!(r.abs() < EPS && (g - 1.0).abs() < EPS && b.abs() < EPS);

        let (r, g, b) = hsl_to_rgb(240.0, 1.0, 0.5);
        assert!(r.abs() < EPS && g.abs() < EPS && (b - 1.0).abs() < EPS);
    }

    #[test]
    fn negative_hue_wraps() {
        let a = hsl_to_rgb(-120.0, 0.8, 0.4);
        let b = hsl_to_rgb(240.0, 0.8, 0.4);
        assert_close(a.0, b.0);
        assert_close(a.1, b.1);
        assert_close(a.2, b.2);
    }

    #[test]
    fn hue_wraps_past_360() {
        let a = hsl_to_rgb(420.0, 0.9, 0.5);
        let b = hsl_to_rgb(60.0, 0.9, 0.5);
        assert_close(a.0, b.0);
        assert_close(a.1, b.1);
        assert_close(a.2, b.2);
    }

    #[test]
    fn achromatic_case() {
        let (h, s, l) = rgb_to_hsl(0.5, 0.5, 0.5);
        assert_close(h, 0.0);
        assert_close(s, 0.0);
        assert_close(l, 0.5);
    }

    #[test]
    fn extremes() {
        assert_eq!(hsl_to_rgb(0.0, 0.0, 0.0), (0.0, 0.0, 0.0));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 1.0), (1.0, 1.0, 1.0));
    }

    #[test]
    fn round_trip_sample() {
        let (h0, s0, l0) = (210.0, 0.7, 0.4);
        let (r, g, b) = hsl_to_rgb(h0, s0, l0);
        let (h, s, l) = rgb_to_hsl(r, g, b);
        assert_close(h, h0);
        assert_close(s, s0);
        assert_close(l, l0);
    }

    #[test]
    fn saturation_branch_above_half_lightness() {
        let (r, g, b) = hsl_to_rgb(30.0, 0.6, 0.75);
        let (h, s, l) = rgb_to_hsl(r, g, b);
        assert_close(h, 30.0);
        assert_close(s, 0.6);
        assert_close(l, 0.75);
    }

    #[test]
    fn cell_color_scale_conversion() {
        let c = CellColor::new(180.0, 85.0, 55.0);
        let (h, s, l) = c.normalized();
        assert_close(h, 180.0);
        assert_close(s, 0.85);
        assert_close(l, 0.55);

        let back = CellColor::from_normalized(h, s, l);
        assert_close(back.saturation, 85.0);
        assert_close(back.lightness, 55.0);
    }

    #[test]
    fn normalized_clamps_out_of_range_percent() {
        let c = CellColor::new(0.0, 120.0, -5.0);
        let (_, s, l) = c.normalized();
        assert_eq!(s, 1.0);
        assert_eq!(l, 0.0);
    }
}
