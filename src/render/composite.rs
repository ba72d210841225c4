use crate::foundation::error::{WavyteError, WavyteResult};
use crate::foundation::math::mul_div255_u8;

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over of premultiplied `src` onto `dst`, with `src` scaled by `opacity`.
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

/// Source-over of an equally sized premultiplied buffer onto `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> WavyteResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(WavyteError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Buffer geometry for [`blit_nearest_over`].
#[derive(Clone, Copy, Debug)]
pub struct BlitParams {
    /// Destination width in pixels.
    pub dst_width: u32,
    /// Destination height in pixels.
    pub dst_height: u32,
    /// Source width in pixels.
    pub src_width: u32,
    /// Source height in pixels.
    pub src_height: u32,
    /// Magnification from source to destination pixels.
    pub factor: f64,
}

/// Nearest-neighbor source index for destination coordinate `d`.
///
/// Samples at the destination pixel center and clamps into `[0, src_len)`.
pub fn nearest_index(d: u32, factor: f64, src_len: u32) -> u32 {
    let s = ((f64::from(d) + 0.5) / factor).floor();
    let max = src_len.saturating_sub(1);
    if s <= 0.0 {
        0
    } else if s >= f64::from(max) {
        max
    } else {
        s as u32
    }
}

/// Magnify `src` by `params.factor` with nearest-neighbor sampling and composite it over `dst`.
///
/// No filtering is applied: each destination pixel copies exactly one source pixel.
pub fn blit_nearest_over(dst: &mut [u8], src: &[u8], params: BlitParams) -> WavyteResult<()> {
    let BlitParams {
        dst_width,
        dst_height,
        src_width,
        src_height,
        factor,
    } = params;
    if !(factor.is_finite() && factor > 0.0) {
        return Err(WavyteError::validation(format!(
            "blit factor must be finite and > 0, got {factor}"
        )));
    }

    let dst_len = buffer_len(dst_width, dst_height)?;
    let src_len = buffer_len(src_width, src_height)?;
    if dst.len() != dst_len || src.len() != src_len {
        return Err(WavyteError::render(
            "blit_nearest_over expects buffers matching width*height*4",
        ));
    }
    if dst_len == 0 || src_len == 0 {
        return Ok(());
    }

    let columns: Vec<usize> = (0..dst_width)
        .map(|x| nearest_index(x, factor, src_width) as usize)
        .collect();
    let dst_stride = dst_width as usize * 4;
    let src_stride = src_width as usize * 4;

    for (y, row) in dst.chunks_exact_mut(dst_stride).enumerate() {
        let sy = nearest_index(y as u32, factor, src_height) as usize;
        let src_row = &src[sy * src_stride..(sy + 1) * src_stride];
        for (d, &sx) in row.chunks_exact_mut(4).zip(columns.iter()) {
            let s = &src_row[sx * 4..sx * 4 + 4];
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], 1.0);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

pub(crate) fn buffer_len(width: u32, height: u32) -> WavyteResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| WavyteError::render("rgba8 buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
