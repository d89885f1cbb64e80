//! Property tests for the HSL/RGB conversion pair.

use ledwall_core::color::{hsl_to_rgb, rgb_to_hsl};
use proptest::prelude::*;

const TOL: f64 = 1e-6;

proptest! {
    /// Round-tripping HSL through RGB reproduces the input, except in the
    /// degenerate cases where hue (s = 0) or saturation (l in {0, 1}) is
    /// undefined. The strategy stays away from those boundaries.
    #[test]
    fn hsl_round_trips_through_rgb(
        h in 0.0f64..360.0,
        s in 0.01f64..1.0,
        l in 0.01f64..0.99,
    ) {
        let (r, g, b) = hsl_to_rgb(h, s, l);
        let (h2, s2, l2) = rgb_to_hsl(r, g, b);

        // Hue wraps: 360 and 0 are the same angle.
        let dh = (h2 - h).abs().min((h2 - h + 360.0).abs()).min((h2 - h - 360.0).abs());
        prop_assert!(dh < 1e-4, "hue {h} -> {h2}");
        prop_assert!((s2 - s).abs() < 1e-4, "saturation {s} -> {s2}");
        prop_assert!((l2 - l).abs() < TOL, "lightness {l} -> {l2}");
    }

    /// RGB output channels always land in [0, 1] for in-range HSL input.
    #[test]
    fn rgb_channels_bounded(
        h in -720.0f64..720.0,
        s in 0.0f64..=1.0,
        l in 0.0f64..=1.0,
    ) {
        let (r, g, b) = hsl_to_rgb(h, s, l);
        for c in [r, g, b] {
            prop_assert!((-TOL..=1.0 + TOL).contains(&c), "channel {c} out of range");
        }
    }

    /// Hue wrapping: any whole number of turns added to the hue yields the
    /// same RGB triple.
    #[test]
    fn hue_is_periodic(
        h in 0.0f64..360.0,
        s in 0.0f64..=1.0,
        l in 0.0f64..=1.0,
        turns in -2i32..=2,
    ) {
        let a = hsl_to_rgb(h, s, l);
        let b = hsl_to_rgb(h + f64::from(turns) * 360.0, s, l);
        prop_assert!((a.0 - b.0).abs() < 1e-9);
        prop_assert!((a.1 - b.1).abs() < 1e-9);
        prop_assert!((a.2 - b.2).abs() < 1e-9);
    }

    /// The achromatic contract: zero saturation collapses to a gray whose
    /// channels all equal the lightness.
    #[test]
    fn zero_saturation_is_gray(h in -360.0f64..720.0, l in 0.0f64..=1.0) {
        let (r, g, b) = hsl_to_rgb(h, 0.0, l);
        prop_assert!((r - l).abs() < TOL);
        prop_assert!((g - l).abs() < TOL);
        prop_assert!((b - l).abs() < TOL);
    }
}
