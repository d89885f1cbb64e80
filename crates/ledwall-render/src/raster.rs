#![forbid(unsafe_code)]

//! Raster storage.
//!
//! A `Raster` is a row-major grid of [`PackedRgba`] pixels:
//! `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `pixels.len() == width * height` at all times.
//! 2. Zero-size rasters are legal; every operation on them is a no-op.
//! 3. `resize` reuses the existing allocation where possible — the frame
//!    loop must stay allocation-free once buffers reach steady state.

use crate::pixel::PackedRgba;

/// A 2D grid of RGBA pixels.
#[derive(Debug, Clone, Default)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<PackedRgba>,
}

impl Raster {
    /// Create a raster filled with transparent pixels. Zero dimensions are
    /// permitted.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![PackedRgba::TRANSPARENT; len],
        }
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Pixel count.
    #[inline]
    pub const fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check for a zero-size raster.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Resize in place, reusing storage. Contents are unspecified after a
    /// resize; callers clear before painting. No-op when dimensions match.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        let len = width as usize * height as usize;

        #[cfg(feature = "tracing")]
        if len > self.pixels.capacity() {
            tracing::debug!(width, height, "raster storage grows");
        }

        self.pixels.resize(len, PackedRgba::TRANSPARENT);
        self.width = width;
        self.height = height;
    }

    /// Fill every pixel with one color.
    pub fn clear(&mut self, color: PackedRgba) {
        self.pixels.fill(color);
    }

    /// Read a pixel; `None` out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<PackedRgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Write a pixel; out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: PackedRgba) {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize] = color;
        }
    }

    /// Borrow the pixel storage (row-major).
    #[inline]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }

    /// Mutably borrow the pixel storage (row-major).
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [PackedRgba] {
        &mut self.pixels
    }

    /// Copy dimensions and pixels from another raster, reusing storage.
    pub fn copy_from(&mut self, src: &Raster) {
        self.resize(src.width, src.height);
        self.pixels.copy_from_slice(&src.pixels);
    }

    /// Paint a filled disc.
    ///
    /// `cx`/`cy` are the center in pixel coordinates, `radius` in pixels.
    /// A pixel is covered when its center lies inside the circle; the pixel
    /// containing the disc center is always painted, so sub-pixel discs
    /// stay visible. The disc is clipped to the raster; a non-positive
    /// radius paints nothing.
    pub fn fill_disc(&mut self, cx: f64, cy: f64, radius: f64, color: PackedRgba) {
        if radius <= 0.0 || self.is_empty() {
            return;
        }
        if cx >= 0.0 && cy >= 0.0 {
            self.set(cx as u32, cy as u32, color);
        }
        let r2 = radius * radius;
        let x0 = ((cx - radius).floor().max(0.0)) as u32;
        let y0 = ((cy - radius).floor().max(0.0)) as u32;
        let x1 = ((cx + radius).ceil()).min(self.width as f64) as u32;
        let y1 = ((cy + radius).ceil()).min(self.height as f64) as u32;

        for y in y0..y1 {
            let dy = (y as f64 + 0.5) - cy;
            let row = y as usize * self.width as usize;
            for x in x0..x1 {
                let dx = (x as f64 + 0.5) - cx;
                if dx * dx + dy * dy <= r2 {
                    self.pixels[row + x as usize] = color;
                }
            }
        }
    }

    /// Export as tightly packed RGB24 bytes (alpha dropped), for texture
    /// upload. Reuses `out`'s allocation.
    pub fn write_rgb(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.len() * 3);
        for px in &self.pixels {
            out.push(px.r());
            out.push(px.g());
            out.push(px.b());
        }
    }
}
