use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Affine, Canvas, Rgba8};
use crate::foundation::error::{WavyteError, WavyteResult};
use crate::render::composite::{PremulRgba8, buffer_len, over_in_place};
use crate::render::painter::{Drawable, Painter};

/// A rendered frame as plain RGBA8 bytes.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major pixel bytes, 4 per pixel.
    pub data: Vec<u8>,
    /// Whether `data` carries premultiplied alpha.
    pub premultiplied: bool,
}

/// Premultiplied RGBA8 raster target, row-major, 4 bytes per pixel.
///
/// Zero-sized surfaces are valid; every paint onto them is a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a fully transparent surface.
    pub fn new(width: u32, height: u32) -> WavyteResult<Self> {
        let len = buffer_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Allocate a surface matching `canvas`.
    pub fn for_canvas(canvas: Canvas) -> WavyteResult<Self> {
        Self::new(canvas.width, canvas.height)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Return `true` when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Premultiplied pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Overwrite every pixel with `color`.
    pub fn clear(&mut self, color: Rgba8) {
        let premul = color.premultiplied();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    /// Rasterize whatever `f` draws and composite it source-over onto this surface.
    pub fn paint<F>(&mut self, f: F) -> WavyteResult<()>
    where
        F: FnOnce(&mut Painter) -> WavyteResult<()>,
    {
        if self.is_empty() {
            return Ok(());
        }
        let (w, h) = raster_dims(self.width, self.height)?;
        let mut painter = Painter::new(w, h);
        f(&mut painter)?;
        let pixmap = painter.finish();
        over_in_place(&mut self.data, pixmap.data_as_u8_slice(), 1.0)
    }

    /// Draw `drawable` with `transform` mapping its local space to surface pixels.
    pub fn draw(&mut self, drawable: &dyn Drawable, transform: Affine) -> WavyteResult<()> {
        self.paint(|p| drawable.draw(p, transform))
    }

    /// Copy out the pixels as a [`FrameRGBA`].
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
            premultiplied: true,
        }
    }

    /// Straight-alpha copy of the pixel bytes.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Write the surface as a PNG (straight alpha).
    pub fn save_png(&self, path: impl AsRef<Path>) -> WavyteResult<()> {
        let path = path.as_ref();
        if self.is_empty() {
            return Err(WavyteError::render("cannot encode an empty surface as png"));
        }
        image::save_buffer_with_format(
            path,
            &self.to_straight_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Validate that a surface fits the rasterizer's `u16` extent.
pub(crate) fn raster_dims(width: u32, height: u32) -> WavyteResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| WavyteError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| WavyteError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
