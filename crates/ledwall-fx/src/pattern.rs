#![forbid(unsafe_code)]

//! Per-cell pattern generators.
//!
//! Each pattern is a pure function from `(x, y, grid, time)` to a
//! percent-scale [`CellColor`] — the classic demo-effect shape (compare the
//! plasma wave: normalized coordinates in, color out). Dispatch is a plain
//! `match` on the [`Pattern`] enum; adding a pattern means one variant and
//! one arm.
//!
//! The one deliberate exception to purity is [`Pattern::Static`], which
//! re-samples its saturation from injected noise on every call to emulate
//! panel shimmer. The entropy source is an explicit [`PanelNoise`] argument
//! so a fixed seed reproduces exact output.
//!
//! [`Pattern::Video`] is not a color function; the simulator routes it to
//! the video sampler instead. Sampling it directly yields an unlit cell.

use ledwall_core::color::CellColor;
use ledwall_core::geometry::PixelGrid;

use std::str::FromStr;

// ---------------------------------------------------------------------------
// Xorshift32 noise
// ---------------------------------------------------------------------------

/// Xorshift32 entropy source for the `Static` pattern's per-cell
/// saturation shimmer.
///
/// Injected rather than ambient so tests can pin the seed; the zero state
/// is avoided by forcing the low bit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelNoise {
    state: u32,
}

impl PanelNoise {
    /// Create a noise source with a specific seed.
    #[inline]
    pub const fn with_seed(seed: u32) -> Self {
        Self { state: seed | 1 }
    }

    /// Next raw value.
    #[inline]
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Next value uniform in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32() >> 8) / f64::from(1u32 << 24)
    }
}

impl Default for PanelNoise {
    fn default() -> Self {
        Self::with_seed(0x1ED0_5EED)
    }
}

// ---------------------------------------------------------------------------
// Pattern registry
// ---------------------------------------------------------------------------

/// Chase band half-width in cells.
const CHASE_BAND_CELLS: f64 = 50.0;

/// The built-in pattern registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pattern {
    /// Position-keyed hue with noisy saturation and a fixed spatial ripple.
    /// Time-independent; intentionally shimmering.
    #[default]
    Static,
    /// Scrolling hue sweep.
    Rainbow,
    /// Whole-panel brightness oscillation.
    Pulse,
    /// A bright band sweeping across the panel once per second.
    Chase,
    /// Horizontal brightness wave.
    Wave,
    /// Binary flash at 2 Hz.
    Strobe,
    /// Scrolling color band.
    Scroll,
    /// External video source; handled by the simulator, not by `sample`.
    Video,
}

impl Pattern {
    /// All selectable patterns, in UI order.
    pub const ALL: [Self; 8] = [
        Self::Static,
        Self::Rainbow,
        Self::Pulse,
        Self::Chase,
        Self::Wave,
        Self::Strobe,
        Self::Scroll,
        Self::Video,
    ];

    /// Stable identifier, as used by the harness UI.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Rainbow => "rainbow",
            Self::Pulse => "pulse",
            Self::Chase => "chase",
            Self::Wave => "wave",
            Self::Strobe => "strobe",
            Self::Scroll => "scroll",
            Self::Video => "video",
        }
    }

    /// Sample the pattern for one grid cell.
    ///
    /// `x`/`y` are cell coordinates in `[0, grid.pixels_x)` /
    /// `[0, grid.pixels_y)`; `time` is the animation clock in seconds.
    /// Returns percent-scale saturation/lightness.
    pub fn sample(
        &self,
        x: u32,
        y: u32,
        grid: PixelGrid,
        time: f64,
        noise: &mut PanelNoise,
    ) -> CellColor {
        if grid.is_empty() {
            return CellColor::UNLIT;
        }
        let px = f64::from(grid.pixels_x);
        let py = f64::from(grid.pixels_y);
        let xf = f64::from(x);
        let yf = f64::from(y);
        let pos_hue = ((xf / px) * 360.0 + (yf / py) * 60.0) % 360.0;

        match self {
            Self::Static => {
                let saturation = 85.0 + noise.next_f64() * 15.0;
                let lightness = 55.0 + (xf * 0.02).sin() * 8.0 + (yf * 0.02).cos() * 8.0;
                CellColor::new(pos_hue, saturation, lightness)
            }
            Self::Rainbow => {
                let hue = ((xf / px) * 360.0 + (yf / py) * 60.0 + time * 100.0) % 360.0;
                CellColor::new(hue, 90.0, 50.0)
            }
            Self::Pulse => {
                let lightness = 30.0 + (time * 3.0).sin() * 20.0 + 20.0;
                CellColor::new(pos_hue, 85.0, lightness)
            }
            Self::Chase => {
                let chase_pos = (time * px) % px;
                let distance = (xf - chase_pos).abs();
                let hue = 200.0 + distance * 2.0;
                let lightness = if distance < CHASE_BAND_CELLS {
                    50.0 + (1.0 - distance / CHASE_BAND_CELLS) * 30.0
                } else {
                    20.0
                };
                CellColor::new(hue, 80.0, lightness)
            }
            Self::Wave => {
                let wave = ((xf / px) * std::f64::consts::TAU + time * 3.0).sin() * 30.0;
                CellColor::new(pos_hue, 85.0, 50.0 + wave)
            }
            Self::Strobe => {
                let phase = (time * 4.0).floor() as i64 % 2;
                let lightness = if phase == 0 { 60.0 } else { 20.0 };
                CellColor::new(pos_hue, 85.0, lightness)
            }
            Self::Scroll => {
                let scroll_pos = (time * px * 0.5) % px;
                let hue = ((xf - scroll_pos) / px * 360.0) % 360.0;
                CellColor::new(hue, 90.0, 50.0)
            }
            Self::Video => CellColor::UNLIT,
        }
    }
}

impl FromStr for Pattern {
    type Err = ();

    /// Parse a harness-supplied identifier. Unknown names are an error so
    /// the caller can apply its own fallback (the UI falls back to
    /// `Static`, the default).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or(())
    }
}
