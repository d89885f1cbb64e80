#![forbid(unsafe_code)]

//! Raster kernel: packed pixels, buffers, blur, and layered compositing.
//!
//! # Role in the workspace
//! `ledwall-render` owns everything that touches raw pixels: the packed
//! RGBA color type, row-major pixel buffers with in-place resize, the disc
//! rasterizer used to paint individual LEDs, the separable box blur behind
//! the bleed effect, and the bottom-to-top layer compositor.
//!
//! It knows nothing about patterns, brightness models, or video; those live
//! in `ledwall-fx`.

pub mod blur;
pub mod composite;
pub mod pixel;
pub mod raster;

pub use composite::{Layer, LayerStack};
pub use pixel::PackedRgba;
pub use raster::Raster;
