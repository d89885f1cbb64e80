#![forbid(unsafe_code)]

//! The frame compositor.
//!
//! [`LedPanelSim`] owns the grid, the render buffers, and the noise source;
//! everything per-frame arrives through an explicit [`FrameParams`] context
//! and everything it learns goes back out in a [`FrameReport`]. The engine
//! reads no globals, which makes a frame fully reproducible from its
//! inputs (plus the noise seed).
//!
//! # Per-frame algorithm
//!
//! 1. Derive the optical response from brightness and the micro-blur from
//!    viewer distance, once.
//! 2. Clear the lit-LED buffer to transparent and the output to black.
//! 3. For every cell: sample the active source, attenuate lightness for
//!    distance, convert HSL to RGB, gamma-correct, quantize, and paint a
//!    filled disc plus an offset highlight disc onto the lit buffer.
//! 4. Composite the lit buffer onto the output: the blurred bleed layer
//!    first (when brightness overdrive calls for it), then the crisp layer.
//!
//! # Resource model
//!
//! All four rasters are owned here and resized in place when the grid or
//! scale changes; steady-state frames allocate nothing.

use bitflags::bitflags;

use ledwall_core::color::{CellColor, hsl_to_rgb};
use ledwall_core::geometry::{PanelError, PanelSpec, PixelGrid};
use ledwall_core::sizing::{RenderScale, ScaleAdvisory};
use ledwall_render::composite::{Layer, LayerStack};
use ledwall_render::pixel::PackedRgba;
use ledwall_render::raster::Raster;

use crate::optics::{self, BrightnessResponse};
use crate::pattern::{PanelNoise, Pattern};
use crate::video::VideoFrame;

/// Physical LED die size in millimeters; together with the pitch it sets
/// the lit fraction of each cell.
const LED_DIE_MM: f64 = 2.7;

/// Highlight disc offset from the LED center, as a fraction of the radius.
const HIGHLIGHT_OFFSET: f64 = 0.3;

/// Highlight disc radius as a fraction of the LED radius.
const HIGHLIGHT_RADIUS: f64 = 0.4;

/// Percent-scale lightness boost for the highlight disc.
const HIGHLIGHT_BOOST_PCT: f64 = 20.0;

/// Percent-scale ceiling for the boosted highlight lightness.
const HIGHLIGHT_MAX_PCT: f64 = 95.0;

bitflags! {
    /// Frame status flags reported to the harness.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameFlags: u8 {
        /// The output raster changed; the texture consumer must re-upload.
        const DIRTY    = 0b0000_0001;
        /// Render scale is clamped below the base scale.
        const DEGRADED = 0b0000_0010;
    }
}

/// Everything the engine needs for one frame, observed atomically at frame
/// start. No field is retained across frames.
#[derive(Debug, Clone, Copy)]
pub struct FrameParams<'a> {
    /// Active pattern.
    pub pattern: Pattern,
    /// Animation clock in seconds, monotonic, advanced by the harness.
    pub time_seconds: f64,
    /// Viewer distance, same units as the panel dimensions.
    pub camera_distance: f64,
    /// Requested brightness in nits.
    pub brightness_nits: f64,
    /// Decoded video frame, when `pattern` is [`Pattern::Video`].
    pub video: Option<&'a VideoFrame>,
}

impl Default for FrameParams<'_> {
    /// Defaults matching the reference panel setup: static pattern, 6 units
    /// away, 1000 nits.
    fn default() -> Self {
        Self {
            pattern: Pattern::Static,
            time_seconds: 0.0,
            camera_distance: 6.0,
            brightness_nits: 1000.0,
            video: None,
        }
    }
}

/// What one `render_frame` call produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Dirty/degraded status.
    pub flags: FrameFlags,
    /// Present when the sizing policy clamped the render scale.
    pub advisory: Option<ScaleAdvisory>,
}

impl FrameReport {
    /// True when the texture consumer must re-upload.
    #[inline]
    pub const fn is_dirty(&self) -> bool {
        self.flags.contains(FrameFlags::DIRTY)
    }
}

/// The LED panel simulator.
pub struct LedPanelSim {
    spec: PanelSpec,
    grid: PixelGrid,
    scale: RenderScale,
    /// Lit LED discs on a transparent background.
    lit: Raster,
    /// The composited frame; black background.
    output: Raster,
    layers: LayerStack,
    noise: PanelNoise,
}

impl LedPanelSim {
    /// Create a simulator for a validated panel spec.
    pub fn new(spec: PanelSpec) -> Self {
        Self::with_noise_seed(spec, 0x1ED0_5EED)
    }

    /// Create a simulator with a pinned noise seed, for reproducible
    /// `Static`-pattern output in tests.
    pub fn with_noise_seed(spec: PanelSpec, seed: u32) -> Self {
        let grid = spec.grid();
        let scale = RenderScale::compute(grid);
        let (w, h) = scale.raster_dims(grid);
        Self {
            spec,
            grid,
            scale,
            lit: Raster::new(w, h),
            output: Raster::new(w, h),
            layers: LayerStack::new(),
            noise: PanelNoise::with_seed(seed),
        }
    }

    /// Current panel spec.
    #[inline]
    pub const fn spec(&self) -> &PanelSpec {
        &self.spec
    }

    /// Current logical grid.
    #[inline]
    pub const fn grid(&self) -> PixelGrid {
        self.grid
    }

    /// Current render scale.
    #[inline]
    pub const fn scale(&self) -> RenderScale {
        self.scale
    }

    /// The composited output raster for the last rendered frame.
    #[inline]
    pub fn output(&self) -> &Raster {
        &self.output
    }

    /// Export the output as RGB24 bytes for texture upload, reusing `out`.
    pub fn write_rgb(&self, out: &mut Vec<u8>) {
        self.output.write_rgb(out);
    }

    /// Change the pixel pitch. Regenerates the grid and render scale and
    /// resizes the buffers; all previously rendered content is invalid.
    pub fn set_pixel_pitch(&mut self, pitch_m: f64) -> Result<(), PanelError> {
        self.spec = self.spec.with_pitch(pitch_m)?;
        self.grid = self.spec.grid();
        self.scale = RenderScale::compute(self.grid);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            px = self.grid.pixels_x,
            py = self.grid.pixels_y,
            scale = self.scale.get(),
            "grid regenerated"
        );

        let (w, h) = self.scale.raster_dims(self.grid);
        self.lit.resize(w, h);
        self.output.resize(w, h);
        Ok(())
    }

    /// Render one frame. Always succeeds; see the module docs for the
    /// pipeline.
    pub fn render_frame(&mut self, params: &FrameParams<'_>) -> FrameReport {
        let response = BrightnessResponse::from_nits(params.brightness_nits);
        let pixel_blur = optics::distance_blur_px(params.camera_distance);

        let (w, h) = self.scale.raster_dims(self.grid);
        self.lit.resize(w, h);
        self.output.resize(w, h);
        self.lit.clear(PackedRgba::TRANSPARENT);
        self.output.clear(PackedRgba::BLACK);

        if !self.grid.is_empty() {
            match (params.pattern, params.video) {
                (Pattern::Video, Some(frame)) => {
                    self.paint_video(frame, params.camera_distance, response.gamma);
                    self.composite(&response, pixel_blur);
                }
                (Pattern::Video, None) => {
                    // No frame from the decoder: the panel shows a black
                    // grid rather than failing.
                    #[cfg(feature = "tracing")]
                    tracing::trace!("video pattern with no frame; black grid fallback");
                }
                (pattern, _) => {
                    self.paint_pattern(
                        pattern,
                        params.time_seconds,
                        params.camera_distance,
                        response.gamma,
                    );
                    self.composite(&response, pixel_blur);
                }
            }
        }

        let mut flags = FrameFlags::DIRTY;
        if self.scale.is_degraded() {
            flags |= FrameFlags::DEGRADED;
        }
        FrameReport {
            flags,
            advisory: self.scale.advisory(),
        }
    }

    /// Disc radius in output pixels for the current pitch and scale.
    fn led_radius(&self) -> f64 {
        let diameter = (LED_DIE_MM / self.spec.pitch_mm() * self.scale.get() as f64).round();
        diameter / 2.0
    }

    fn paint_pattern(&mut self, pattern: Pattern, time: f64, distance: f64, gamma: f64) {
        let radius = self.led_radius();
        let scale = f64::from(self.scale.get());
        for y in 0..self.grid.pixels_y {
            for x in 0..self.grid.pixels_x {
                let color = pattern.sample(x, y, self.grid, time, &mut self.noise);
                let cx = (f64::from(x) + 0.5) * scale;
                let cy = (f64::from(y) + 0.5) * scale;
                paint_led(&mut self.lit, cx, cy, radius, color, distance, gamma);
            }
        }
    }

    fn paint_video(&mut self, frame: &VideoFrame, distance: f64, gamma: f64) {
        let radius = self.led_radius();
        let scale = f64::from(self.scale.get());
        for y in 0..self.grid.pixels_y {
            for x in 0..self.grid.pixels_x {
                let (hue, s, l) = frame.sample_hsl(x, y, self.grid);
                let color = CellColor::from_normalized(hue, s, l);
                let cx = (f64::from(x) + 0.5) * scale;
                let cy = (f64::from(y) + 0.5) * scale;
                paint_led(&mut self.lit, cx, cy, radius, color, distance, gamma);
            }
        }
    }

    fn composite(&mut self, response: &BrightnessResponse, pixel_blur: f64) {
        self.layers.clear();
        let total_blur = response.blur_radius_px + pixel_blur;
        if response.has_bleed() && total_blur > 0.0 {
            self.layers
                .push(Layer::blurred(total_blur, response.bleed_alpha as f32));
        }
        self.layers.push(Layer::CRISP);
        self.layers.composite(&self.lit, &mut self.output);
    }
}

/// Paint one LED: the main disc and the offset highlight disc, both through
/// the attenuation + gamma pipeline.
fn paint_led(
    lit: &mut Raster,
    cx: f64,
    cy: f64,
    radius: f64,
    color: CellColor,
    distance: f64,
    gamma: f64,
) {
    let attenuated = color.with_lightness(optics::attenuate(color.lightness, distance));
    lit.fill_disc(cx, cy, radius, shade(attenuated, gamma));

    let highlight = attenuated.with_lightness(
        (attenuated.lightness + HIGHLIGHT_BOOST_PCT).min(HIGHLIGHT_MAX_PCT),
    );
    lit.fill_disc(
        cx - radius * HIGHLIGHT_OFFSET,
        cy - radius * HIGHLIGHT_OFFSET,
        radius * HIGHLIGHT_RADIUS,
        shade(highlight, gamma),
    );
}

/// Percent-scale cell color to a quantized, gamma-corrected opaque pixel.
/// Channels are clamped to `[0, 1]` both before and after the exponent.
fn shade(color: CellColor, gamma: f64) -> PackedRgba {
    let (h, s, l) = color.normalized();
    let (r, g, b) = hsl_to_rgb(h, s, l);
    PackedRgba::rgb(
        quantize(r.clamp(0.0, 1.0).powf(gamma)),
        quantize(g.clamp(0.0, 1.0).powf(gamma)),
        quantize(b.clamp(0.0, 1.0).powf(gamma)),
    )
}

#[inline]
fn quantize(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}
