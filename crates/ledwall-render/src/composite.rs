#![forbid(unsafe_code)]

//! Layered compositing.
//!
//! A [`LayerStack`] paints one source raster onto a destination several
//! times, bottom-to-top (painter's algorithm). Each [`Layer`] may blur the
//! source and scale its opacity before the SourceOver blend. The LED
//! simulator uses exactly two layers — the blurred, semi-transparent bleed
//! halo underneath and the crisp LEDs on top — but the stack is not limited
//! to that shape.
//!
//! # Invariants
//! - Compositing never allocates once the scratch rasters have reached the
//!   destination size.
//! - A destination/source size mismatch is a caller bug; the stack clips to
//!   the overlapping region rather than panicking.

use smallvec::SmallVec;

use crate::blur::{box_blur, unpremultiply};
use crate::raster::Raster;

/// One compositing pass over the source raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    /// Blur radius in output pixels. Fractional radii are honored by the
    /// Gaussian approximation (two box passes at half the radius).
    pub blur_radius_px: f64,
    /// Global opacity in `[0, 1]` applied on top of per-pixel alpha.
    pub opacity: f32,
}

impl Layer {
    /// A crisp, fully opaque pass.
    pub const CRISP: Self = Self {
        blur_radius_px: 0.0,
        opacity: 1.0,
    };

    /// A blurred pass at reduced opacity.
    #[inline]
    pub const fn blurred(blur_radius_px: f64, opacity: f32) -> Self {
        Self {
            blur_radius_px,
            opacity,
        }
    }
}

/// Bottom-to-top stack of compositing passes.
///
/// Layer 0 is painted first; later layers land on top. The inline capacity
/// covers the bleed + crisp pair without heap allocation.
#[derive(Debug, Default)]
pub struct LayerStack {
    layers: SmallVec<[Layer; 2]>,
    blurred: Raster,
    scratch: Raster,
}

impl LayerStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all layers (buffers are kept for reuse).
    #[inline]
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Add a layer on top of the stack.
    #[inline]
    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Number of layers.
    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True when no layers are queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Composite `src` onto `dst` through every layer, bottom-to-top.
    pub fn composite(&mut self, src: &Raster, dst: &mut Raster) {
        if src.is_empty() || dst.is_empty() {
            return;
        }
        for layer in &self.layers {
            if layer.opacity <= 0.0 {
                continue;
            }
            if layer.blur_radius_px > 0.0 {
                self.blurred.copy_from(src);
                // Two box passes at half the radius approximate the
                // Gaussian of the requested radius. The blur averages in
                // premultiplied space; convert back before the straight-
                // alpha SourceOver blend.
                let r = ((layer.blur_radius_px / 2.0).round() as u32).max(1);
                box_blur(&mut self.blurred, &mut self.scratch, r);
                box_blur(&mut self.blurred, &mut self.scratch, r);
                unpremultiply(&mut self.blurred);
                draw_over(dst, &self.blurred, layer.opacity);
            } else {
                draw_over(dst, src, layer.opacity);
            }
        }
    }
}

/// SourceOver-blend `src` onto `dst` at a global opacity, clipped to the
/// overlapping region.
pub fn draw_over(dst: &mut Raster, src: &Raster, opacity: f32) {
    let w = dst.width().min(src.width());
    let h = dst.height().min(src.height());
    let full = dst.width() == src.width() && dst.height() == src.height();

    if full {
        let sp = src.pixels();
        for (d, s) in dst.pixels_mut().iter_mut().zip(sp) {
            *d = s.with_opacity(opacity).over(*d);
        }
        return;
    }

    for y in 0..h {
        for x in 0..w {
            if let Some(s) = src.get(x, y) {
                if let Some(d) = dst.get(x, y) {
                    dst.set(x, y, s.with_opacity(opacity).over(d));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::PackedRgba;

    #[test]
    fn crisp_layer_copies_opaque_pixels() {
        let mut src = Raster::new(4, 4);
        src.set(1, 1, PackedRgba::rgb(10, 200, 30));
        let mut dst = Raster::new(4, 4);
        dst.clear(PackedRgba::BLACK);

        let mut stack = LayerStack::new();
        stack.push(Layer::CRISP);
        stack.composite(&src, &mut dst);

        assert_eq!(dst.get(1, 1), Some(PackedRgba::rgb(10, 200, 30)));
        assert_eq!(dst.get(0, 0), Some(PackedRgba::BLACK));
    }

    #[test]
    fn bleed_layer_spreads_beyond_the_disc() {
        let mut src = Raster::new(16, 16);
        src.fill_disc(8.0, 8.0, 2.0, PackedRgba::rgb(255, 0, 0));
        let mut dst = Raster::new(16, 16);
        dst.clear(PackedRgba::BLACK);

        let mut stack = LayerStack::new();
        stack.push(Layer::blurred(6.0, 0.8));
        stack.push(Layer::CRISP);
        stack.composite(&src, &mut dst);

        // Outside the crisp disc, the halo still contributes red.
        let halo = dst.get(12, 8).unwrap();
        assert!(halo.r() > 0, "expected halo at (12,8), got {halo:?}");
        // Inside the disc the crisp pass wins.
        assert_eq!(dst.get(8, 8), Some(PackedRgba::rgb(255, 0, 0)));
    }

    #[test]
    fn zero_opacity_layer_is_skipped() {
        let mut src = Raster::new(2, 2);
        src.clear(PackedRgba::WHITE);
        let mut dst = Raster::new(2, 2);
        dst.clear(PackedRgba::BLACK);

        let mut stack = LayerStack::new();
        stack.push(Layer::blurred(4.0, 0.0));
        stack.composite(&src, &mut dst);

        assert_eq!(dst.get(0, 0), Some(PackedRgba::BLACK));
    }

    #[test]
    fn empty_stack_leaves_dst_untouched() {
        let mut src = Raster::new(2, 2);
        src.clear(PackedRgba::WHITE);
        let mut dst = Raster::new(2, 2);
        dst.clear(PackedRgba::BLACK);

        LayerStack::new().composite(&src, &mut dst);
        assert_eq!(dst.get(1, 1), Some(PackedRgba::BLACK));
    }

    #[test]
    fn clear_keeps_buffers_but_drops_layers() {
        let mut stack = LayerStack::new();
        stack.push(Layer::CRISP);
        assert_eq!(stack.len(), 1);
        stack.clear();
        assert!(stack.is_empty());
    }

    #[test]
    fn half_opacity_halves_contribution() {
        let mut src = Raster::new(1, 1);
        src.clear(PackedRgba::rgb(200, 100, 50));
        let mut dst = Raster::new(1, 1);
        dst.clear(PackedRgba::BLACK);

        draw_over(&mut dst, &src, 0.5);
        let out = dst.get(0, 0).unwrap();
        // 200 * (128/255) ~ 100, rounded by the exact-rational blend.
        assert!((out.r() as i32 - 100).abs() <= 1, "got {}", out.r());
        assert_eq!(out.a(), 255);
    }

    #[test]
    fn size_mismatch_clips_instead_of_panicking() {
        let mut src = Raster::new(3, 3);
        src.clear(PackedRgba::WHITE);
        let mut dst = Raster::new(2, 2);
        dst.clear(PackedRgba::BLACK);
        draw_over(&mut dst, &src, 1.0);
        assert_eq!(dst.get(1, 1), Some(PackedRgba::WHITE));
    }
}
