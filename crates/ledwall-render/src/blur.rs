#![forbid(unsafe_code)]

//! Separable box blur.
//!
//! Sliding-window implementation: O(width * height) regardless of radius,
//! edge-clamped (border pixels repeat). All four channels are averaged,
//! including alpha — the lit-LED buffer is mostly transparent and the halo
//! must spread alpha, not just color.
//!
//! One call runs a horizontal and a vertical pass. Run it twice to
//! approximate a Gaussian (see `LayerStack`).

use crate::pixel::PackedRgba;
use crate::raster::Raster;

/// Blur `raster` in place with a box kernel of the given radius, using
/// `scratch` for the intermediate pass. `scratch` is resized as needed and
/// its previous contents are ignored. Radius 0 is a no-op.
///
/// Channels are averaged independently, which is premultiplied-alpha
/// arithmetic when the input is opaque-on-transparent (the lit-LED buffer
/// is exactly that). Callers that need straight alpha back run
/// [`unpremultiply`] after the final pass.
pub fn box_blur(raster: &mut Raster, scratch: &mut Raster, radius: u32) {
    if radius == 0 || raster.is_empty() {
        return;
    }
    let w = raster.width();
    let h = raster.height();
    scratch.resize(w, h);

    horizontal_pass(raster.pixels(), scratch.pixels_mut(), w, h, radius);
    vertical_pass(scratch.pixels(), raster.pixels_mut(), w, h, radius);
}

/// Convert premultiplied channels back to straight alpha:
/// `c = c * 255 / a`, rounded, clamped. Fully transparent and fully opaque
/// pixels are already correct in both representations.
pub fn unpremultiply(raster: &mut Raster) {
    for px in raster.pixels_mut() {
        let a = px.a() as u32;
        if a == 0 || a == 255 {
            continue;
        }
        let scale = |c: u8| (((c as u32) * 255 + a / 2) / a).min(255) as u8;
        *px = PackedRgba::rgba(scale(px.r()), scale(px.g()), scale(px.b()), px.a());
    }
}

#[inline]
fn clamp_index(i: i64, max: i64) -> usize {
    i.clamp(0, max - 1) as usize
}

fn horizontal_pass(src: &[PackedRgba], dst: &mut [PackedRgba], w: u32, h: u32, radius: u32) {
    let w = w as i64;
    let r = radius as i64;
    let div = 2 * radius + 1;

    for y in 0..h as i64 {
        let row = (y * w) as usize;
        let (mut sr, mut sg, mut sb, mut sa) = (0u32, 0u32, 0u32, 0u32);

        for i in -r..=r {
            let px = src[row + clamp_index(i, w)];
            sr += px.r() as u32;
            sg += px.g() as u32;
            sb += px.b() as u32;
            sa += px.a() as u32;
        }
        dst[row] = PackedRgba::rgba(
            (sr / div) as u8,
            (sg / div) as u8,
            (sb / div) as u8,
            (sa / div) as u8,
        );

        for x in 1..w {
            let leave = src[row + clamp_index(x - 1 - r, w)];
            let enter = src[row + clamp_index(x + r, w)];
            sr = sr - leave.r() as u32 + enter.r() as u32;
            sg = sg - leave.g() as u32 + enter.g() as u32;
            sb = sb - leave.b() as u32 + enter.b() as u32;
            sa = sa - leave.a() as u32 + enter.a() as u32;
            dst[row + x as usize] = PackedRgba::rgba(
                (sr / div) as u8,
                (sg / div) as u8,
                (sb / div) as u8,
                (sa / div) as u8,
            );
        }
    }
}

fn vertical_pass(src: &[PackedRgba], dst: &mut [PackedRgba], w: u32, h: u32, radius: u32) {
    let w = w as i64;
    let h = h as i64;
    let r = radius as i64;
    let div = 2 * radius + 1;

    for x in 0..w {
        let (mut sr, mut sg, mut sb, mut sa) = (0u32, 0u32, 0u32, 0u32);

        for i in -r..=r {
            let px = src[clamp_index(i, h) * w as usize + x as usize];
            sr += px.r() as u32;
            sg += px.g() as u32;
            sb += px.b() as u32;
            sa += px.a() as u32;
        }
        dst[x as usize] = PackedRgba::rgba(
            (sr / div) as u8,
            (sg / div) as u8,
            (sb / div) as u8,
            (sa / div) as u8,
        );

        for y in 1..h {
            let leave = src[clamp_index(y - 1 - r, h) * w as usize + x as usize];
            let enter = src[clamp_index(y + r, h) * w as usize + x as usize];
            sr = sr - leave.r() as u32 + enter.r() as u32;
            sg = sg - leave.g() as u32 + enter.g() as u32;
            sb = sb - leave.b() as u32 + enter.b() as u32;
            sa = sa - leave.a() as u32 + enter.a() as u32;
            dst[(y * w) as usize + x as usize] = PackedRgba::rgba(
                (sr / div) as u8,
                (sg / div) as u8,
                (sb / div) as u8,
                (sa / div) as u8,
            );
        }
    }
}
