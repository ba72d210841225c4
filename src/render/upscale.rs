//! Pixel-snap upscaling: rasterize at low resolution, magnify with nearest-neighbor sampling.

use crate::foundation::core::Affine;
use crate::foundation::error::{WavyteError, WavyteResult};
use crate::render::composite::{BlitParams, blit_nearest_over};
use crate::render::painter::{Drawable, Painter};
use crate::render::surface::{Surface, raster_dims};

/// Low-resolution buffer size for a destination of `dest_width x dest_height` at `factor`.
///
/// Each non-zero dimension maps to `max(1, round(dim / factor))`; a zero dimension stays zero.
pub fn low_res_size(dest_width: u32, dest_height: u32, factor: f64) -> WavyteResult<(u32, u32)> {
    validate_factor(factor)?;
    let scale = |dim: u32| -> u32 {
        if dim == 0 {
            return 0;
        }
        (f64::from(dim) / factor).round().max(1.0) as u32
    };
    Ok((scale(dest_width), scale(dest_height)))
}

fn validate_factor(factor: f64) -> WavyteResult<()> {
    if !(factor.is_finite() && factor > 0.0) {
        return Err(WavyteError::validation(format!(
            "upscale factor must be finite and > 0, got {factor}"
        )));
    }
    Ok(())
}

/// Counters describing buffer reuse across frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpscalerStats {
    /// Frames that went through the offscreen buffer.
    pub frames: u64,
    /// Buffer (re)allocations.
    pub allocations: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BufferKey {
    width: u16,
    height: u16,
    factor: f64,
}

struct UpscaleBuffer {
    key: BufferKey,
    pixmap: vello_cpu::Pixmap,
}

/// Renders a subtree at `1/factor` resolution into an owned offscreen buffer, then magnifies it
/// onto the destination with nearest-neighbor sampling.
///
/// The buffer belongs to this instance alone and is dropped with it.
#[derive(Default)]
pub struct Upscaler {
    buffer: Option<UpscaleBuffer>,
    stats: UpscalerStats,
}

impl Upscaler {
    /// Create an upscaler with no buffer allocated yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer reuse counters.
    pub fn stats(&self) -> UpscalerStats {
        self.stats
    }

    /// Current offscreen buffer size, if one has been allocated.
    pub fn buffer_size(&self) -> Option<(u32, u32)> {
        self.buffer
            .as_ref()
            .map(|b| (u32::from(b.key.width), u32::from(b.key.height)))
    }

    /// Premultiplied contents of the offscreen buffer from the last frame.
    pub fn buffer_data(&self) -> Option<&[u8]> {
        self.buffer.as_ref().map(|b| b.pixmap.data_as_u8_slice())
    }

    /// Render `source` at low resolution and composite the magnified result over `dest`.
    ///
    /// `source` is drawn in destination pixel space; the `1/factor` reduction is applied here.
    /// A `factor` below `1` makes the buffer larger than `dest`, so the pass shrinks instead of
    /// magnifying. A zero-sized `dest` skips rendering entirely.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(factor = factor, width = dest.width(), height = dest.height())
    )]
    pub fn render(
        &mut self,
        dest: &mut Surface,
        source: &dyn Drawable,
        factor: f64,
    ) -> WavyteResult<()> {
        validate_factor(factor)?;
        if dest.is_empty() {
            tracing::trace!("zero-sized destination, skipping upscale pass");
            return Ok(());
        }

        let (low_w, low_h) = low_res_size(dest.width(), dest.height(), factor)?;
        let (low_w, low_h) = raster_dims(low_w, low_h)?;
        let buffer = self.acquire(BufferKey {
            width: low_w,
            height: low_h,
            factor,
        });
        buffer.pixmap.data_as_u8_slice_mut().fill(0);

        let mut painter = Painter::new(low_w, low_h);
        source.draw(&mut painter, Affine::scale(1.0 / factor))?;
        painter.finish_into(&mut buffer.pixmap);

        let (dst_width, dst_height) = (dest.width(), dest.height());
        blit_nearest_over(
            dest.data_mut(),
            buffer.pixmap.data_as_u8_slice(),
            BlitParams {
                dst_width,
                dst_height,
                src_width: u32::from(low_w),
                src_height: u32::from(low_h),
                factor,
            },
        )?;
        self.stats.frames = self.stats.frames.saturating_add(1);
        Ok(())
    }

    fn acquire(&mut self, key: BufferKey) -> &mut UpscaleBuffer {
        let buffer = match self.buffer.take() {
            Some(b) if b.key == key => b,
            _ => {
                tracing::debug!(
                    width = key.width,
                    height = key.height,
                    factor = key.factor,
                    "allocating upscale buffer"
                );
                self.stats.allocations = self.stats.allocations.saturating_add(1);
                UpscaleBuffer {
                    key,
                    pixmap: vello_cpu::Pixmap::new(key.width, key.height),
                }
            }
        };
        self.buffer.insert(buffer)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/upscale.rs"]
mod tests;
