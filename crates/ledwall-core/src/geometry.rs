#![forbid(unsafe_code)]

//! Physical panel description and the derived logical pixel grid.

use std::fmt;

/// Errors raised by panel configuration validation.
///
/// Construction is the only fallible surface in the engine; everything
/// derived from a valid [`PanelSpec`] is infallible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelError {
    /// Physical width/height must be finite and positive.
    InvalidSize { width_m: f64, height_m: f64 },
    /// Pixel pitch must be finite and positive.
    InvalidPitch { pitch_m: f64 },
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { width_m, height_m } => {
                write!(f, "invalid panel size: {width_m} m x {height_m} m")
            }
            Self::InvalidPitch { pitch_m } => write!(f, "invalid pixel pitch: {pitch_m} m"),
        }
    }
}

impl std::error::Error for PanelError {}

/// Physical description of an LED panel.
///
/// Dimensions are meters. The physical size is fixed for the lifetime of a
/// simulator; the pitch is the one mutable knob, and changing it regenerates
/// the grid (see `LedPanelSim::set_pixel_pitch` in `ledwall-fx`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSpec {
    width_m: f64,
    height_m: f64,
    pitch_m: f64,
}

impl PanelSpec {
    /// Validate and create a panel spec.
    pub fn new(width_m: f64, height_m: f64, pitch_m: f64) -> Result<Self, PanelError> {
        if !(width_m.is_finite() && height_m.is_finite()) || width_m <= 0.0 || height_m <= 0.0 {
            return Err(PanelError::InvalidSize { width_m, height_m });
        }
        if !pitch_m.is_finite() || pitch_m <= 0.0 {
            return Err(PanelError::InvalidPitch { pitch_m });
        }
        Ok(Self {
            width_m,
            height_m,
            pitch_m,
        })
    }

    /// Physical width in meters.
    #[inline]
    pub const fn width_m(&self) -> f64 {
        self.width_m
    }

    /// Physical height in meters.
    #[inline]
    pub const fn height_m(&self) -> f64 {
        self.height_m
    }

    /// Pixel pitch in meters.
    #[inline]
    pub const fn pitch_m(&self) -> f64 {
        self.pitch_m
    }

    /// Pixel pitch in millimeters.
    #[inline]
    pub fn pitch_mm(&self) -> f64 {
        self.pitch_m * 1000.0
    }

    /// Copy with a different (validated) pitch.
    pub fn with_pitch(&self, pitch_m: f64) -> Result<Self, PanelError> {
        Self::new(self.width_m, self.height_m, pitch_m)
    }

    /// Derive the logical grid: `pixels = round(size / pitch)` per axis,
    /// at least 1 each for a valid spec.
    pub fn grid(&self) -> PixelGrid {
        let px = (self.width_m / self.pitch_m).round().max(1.0) as u32;
        let py = (self.height_m / self.pitch_m).round().max(1.0) as u32;
        PixelGrid {
            pixels_x: px,
            pixels_y: py,
        }
    }
}

/// Logical pixel grid dimensions, immutable per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelGrid {
    /// LED columns.
    pub pixels_x: u32,
    /// LED rows.
    pub pixels_y: u32,
}

impl PixelGrid {
    /// Create a grid directly. Zero dimensions are permitted (tiny-area
    /// safe); rendering an empty grid is a no-op, not a panic.
    #[inline]
    pub const fn new(pixels_x: u32, pixels_y: u32) -> Self {
        Self { pixels_x, pixels_y }
    }

    /// Total cell count.
    #[inline]
    pub const fn cells(&self) -> u64 {
        self.pixels_x as u64 * self.pixels_y as u64
    }

    /// Check for a degenerate grid.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.pixels_x == 0 || self.pixels_y == 0
    }
}
