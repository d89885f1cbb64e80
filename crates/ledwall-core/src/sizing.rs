#![forbid(unsafe_code)]

//! Render-buffer sizing policy.
//!
//! The output raster is `grid * scale` pixels. A dense grid at the default
//! scale would allocate enormous buffers, so the policy clamps the scale to
//! keep both raster dimensions within [`MAX_RENDER_DIM`]. When the scale
//! drops below [`BASE_SCALE`] the result carries a non-fatal advisory; the
//! harness decides how (or whether) to surface it.

use crate::geometry::PixelGrid;

use std::fmt;

/// Default pixels-per-LED scale when headroom allows.
pub const BASE_SCALE: u32 = 10;

/// Maximum render-buffer width/height in pixels.
pub const MAX_RENDER_DIM: u32 = 8192;

/// Non-fatal notice that render quality was reduced to bound memory.
///
/// The engine owns the fact (clamped scale); the wording shown to users is
/// the harness's business. The `Display` impl supplies a default message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleAdvisory {
    /// The clamped pixels-per-LED scale actually in effect.
    pub scale: u32,
}

impl fmt::Display for ScaleAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "render scale reduced to {} to limit memory usage",
            self.scale
        )
    }
}

/// The chosen pixels-per-LED scale for the current grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderScale {
    scale: u32,
}

impl RenderScale {
    /// Compute the scale for a grid.
    ///
    /// Starts from [`BASE_SCALE`]; if either raster dimension would exceed
    /// [`MAX_RENDER_DIM`], reduces to `MAX_RENDER_DIM / pixels` (integer
    /// floor) on that axis, with a hard floor of 1. Must be recomputed
    /// whenever the grid changes.
    pub fn compute(grid: PixelGrid) -> Self {
        let mut scale = BASE_SCALE;
        if grid.pixels_x.saturating_mul(scale) > MAX_RENDER_DIM {
            scale = MAX_RENDER_DIM / grid.pixels_x.max(1);
        }
        if grid.pixels_y.saturating_mul(scale) > MAX_RENDER_DIM {
            scale = MAX_RENDER_DIM / grid.pixels_y.max(1);
        }
        let scale = scale.max(1);

        #[cfg(feature = "tracing")]
        if scale < BASE_SCALE {
            tracing::debug!(scale, px = grid.pixels_x, py = grid.pixels_y, "render scale clamped");
        }

        Self { scale }
    }

    /// Pixels per LED cell in the output raster.
    #[inline]
    pub const fn get(&self) -> u32 {
        self.scale
    }

    /// True when the policy had to clamp below [`BASE_SCALE`].
    #[inline]
    pub const fn is_degraded(&self) -> bool {
        self.scale < BASE_SCALE
    }

    /// The degraded-quality advisory, when the scale was clamped.
    #[inline]
    pub const fn advisory(&self) -> Option<ScaleAdvisory> {
        if self.is_degraded() {
            Some(ScaleAdvisory { scale: self.scale })
        } else {
            None
        }
    }

    /// Output raster dimensions for a grid under this scale.
    #[inline]
    pub const fn raster_dims(&self, grid: PixelGrid) -> (u32, u32) {
        (grid.pixels_x * self.scale, grid.pixels_y * self.scale)
    }
}
