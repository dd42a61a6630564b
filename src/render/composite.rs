//! Premultiplied RGBA8 compositing on [`Frame`]s.

use crate::foundation::core::Frame;
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel, with `opacity` applied to `src`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }
    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    if sa == 255 && op == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite `src` over `dst`; both frames must have the same size.
pub fn over_in_place(dst: &mut Frame, src: &Frame, opacity: f32) -> CardResult<()> {
    if dst.size() != src.size() {
        return Err(CardError::raster(format!(
            "cannot composite {} over {}",
            src.size(),
            dst.size()
        )));
    }
    for (d, s) in dst.data.chunks_exact_mut(4).zip(src.data.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Stretch `src` across the whole of `dst` and composite it on top.
pub fn draw_scaled(dst: &mut Frame, src: &Frame) -> CardResult<()> {
    if src.size() == dst.size() {
        return over_in_place(dst, src, 1.0);
    }
    let scaled = src.resized(dst.size())?;
    over_in_place(dst, &scaled, 1.0)
}

/// Fill every pixel with a straight-alpha `rgba` color.
pub fn fill(dst: &mut Frame, rgba: [u8; 4]) {
    let a = u16::from(rgba[3]);
    let px = [
        mul_div255_u8(u16::from(rgba[0]), a),
        mul_div255_u8(u16::from(rgba[1]), a),
        mul_div255_u8(u16::from(rgba[2]), a),
        rgba[3],
    ];
    for d in dst.data.chunks_exact_mut(4) {
        let out = over([d[0], d[1], d[2], d[3]], px, 1.0);
        d.copy_from_slice(&out);
    }
}

/// Opaque RGBA8 for encoders without alpha: composite over black.
///
/// Premultiplied color over opaque black is the color itself, so only alpha changes.
pub fn flatten_to_opaque(frame: &Frame) -> Vec<u8> {
    let mut out = frame.data.clone();
    for px in out.chunks_exact_mut(4) {
        px[3] = 255;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
