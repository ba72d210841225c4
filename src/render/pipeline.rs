use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{WavyteError, WavyteResult};
use crate::render::surface::Surface;
use crate::render::upscale::{Upscaler, UpscalerStats};
use crate::scene::parallax::{LayerOffset, Parallax};

/// A ready-to-render parallax scene: canvas, background, compositor and optional pixel snap.
///
/// Per frame the camera is applied to the compositor, every layer's repeater draws its copies,
/// and when `pixel_factor` is set the whole stack goes through the [`Upscaler`].
pub struct Scene {
    canvas: Canvas,
    background: Rgba8,
    parallax: Parallax,
    pixel_factor: Option<f64>,
    upscaler: Upscaler,
}

impl Scene {
    /// Assemble a scene. `pixel_factor`, when given, must be finite and > 0.
    pub fn new(
        canvas: Canvas,
        background: Rgba8,
        parallax: Parallax,
        pixel_factor: Option<f64>,
    ) -> WavyteResult<Self> {
        if let Some(f) = pixel_factor
            && !(f.is_finite() && f > 0.0)
        {
            return Err(WavyteError::validation(format!(
                "pixel_factor must be finite and > 0, got {f}"
            )));
        }
        Ok(Self {
            canvas,
            background,
            parallax,
            pixel_factor,
            upscaler: Upscaler::new(),
        })
    }

    /// Output size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Clear color.
    pub fn background(&self) -> Rgba8 {
        self.background
    }

    /// The compositor.
    pub fn parallax(&self) -> &Parallax {
        &self.parallax
    }

    /// Mutable compositor, for changing snap, ratios or layers between frames.
    pub fn parallax_mut(&mut self) -> &mut Parallax {
        &mut self.parallax
    }

    /// Nearest-neighbor magnification factor, if pixel snapping is on.
    pub fn pixel_factor(&self) -> Option<f64> {
        self.pixel_factor
    }

    /// Buffer reuse counters of the pixel-snap pass.
    pub fn upscaler_stats(&self) -> UpscalerStats {
        self.upscaler.stats()
    }

    /// Layer offsets at `camera`, without rendering.
    pub fn offsets_at(&mut self, camera: f64) -> WavyteResult<Vec<LayerOffset>> {
        self.parallax.set_camera(camera)?;
        Ok(self.parallax.offsets())
    }

    /// Render one frame with the camera at `camera`.
    #[tracing::instrument(
        level = "debug",
        skip(self),
        fields(width = self.canvas.width, height = self.canvas.height)
    )]
    pub fn render_frame(&mut self, camera: f64) -> WavyteResult<Surface> {
        self.parallax.set_camera(camera)?;
        let mut surface = Surface::for_canvas(self.canvas)?;
        surface.clear(self.background);
        match self.pixel_factor {
            Some(factor) => self.upscaler.render(&mut surface, &self.parallax, factor)?,
            None => self.parallax.render(&mut surface)?,
        }
        Ok(surface)
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("canvas", &self.canvas)
            .field("background", &self.background)
            .field("parallax", &self.parallax)
            .field("pixel_factor", &self.pixel_factor)
            .field("upscaler", &self.upscaler.stats())
            .finish()
    }
}

/// Camera positions `from, from + step, ...` up to and including `to`.
pub fn camera_sweep(from: f64, to: f64, step: f64) -> WavyteResult<Vec<f64>> {
    if !(from.is_finite() && to.is_finite()) {
        return Err(WavyteError::validation("sweep bounds must be finite"));
    }
    if !(step.is_finite() && step > 0.0) {
        return Err(WavyteError::validation(format!(
            "sweep step must be finite and > 0, got {step}"
        )));
    }
    if to < from {
        return Err(WavyteError::validation(format!(
            "sweep end {to} is before start {from}"
        )));
    }
    let count = ((to - from) / step + 1e-9).floor();
    if count >= 1e7 {
        return Err(WavyteError::validation("sweep has too many frames"));
    }
    Ok((0..=count as u64)
        .map(|i| from + i as f64 * step)
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
