//! Multi-layer parallax compositing driven by a single camera scalar.
//!
//! Each layer's horizontal offset is `wrap(camera * (ratio - anchor), tile_width * upscale)`,
//! optionally blended toward the nearest multiple of `upscale` (the low-res pixel grid).

use std::sync::Arc;

use crate::foundation::core::{Affine, Rect, Vec2};
use crate::foundation::error::{WavyteError, WavyteResult};
use crate::foundation::math::{lerp, snap_to_step, wrap};
use crate::render::painter::{Drawable, Painter};
use crate::render::surface::Surface;
use crate::scene::repeater::{Repeater, RepeaterConfig};
use crate::transform::affine;

/// One depth plane: a horizontally repeated unit and its depth ratio.
///
/// The unit is authored in tile space, where one tile spans `tile_width` units. The compositor
/// scales it by `upscale` when drawing.
#[derive(Clone, Debug)]
pub struct ParallaxLayer {
    repeater: Repeater,
    ratio: f64,
    tile_width: f64,
    placement: Affine,
}

impl ParallaxLayer {
    /// Create a layer repeating `unit` every `tile_width` tile-space units.
    ///
    /// `config` must cover the viewport plus one tile on each side; see
    /// [`RepeaterConfig::covering`].
    pub fn new(
        unit: Arc<dyn Drawable>,
        tile_width: f64,
        ratio: f64,
        config: RepeaterConfig,
    ) -> WavyteResult<Self> {
        if !(tile_width.is_finite() && tile_width > 0.0) {
            return Err(WavyteError::validation(format!(
                "layer tile_width must be finite and > 0, got {tile_width}"
            )));
        }
        validate_ratio(ratio)?;
        let repeater = Repeater::new(unit, Affine::translate(Vec2::new(tile_width, 0.0)), config)?;
        Ok(Self {
            repeater,
            ratio,
            tile_width,
            placement: Affine::IDENTITY,
        })
    }

    /// Screen-space placement applied before scrolling (for example a vertical position).
    pub fn with_placement(mut self, placement: Affine) -> Self {
        self.placement = placement;
        self
    }

    /// Depth ratio.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Horizontal period of the unit, in tile space.
    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }

    /// Screen-space placement.
    pub fn placement(&self) -> Affine {
        self.placement
    }

    /// The repeater drawing this layer's copies.
    pub fn repeater(&self) -> &Repeater {
        &self.repeater
    }

    /// Change how many copies the layer draws.
    pub fn set_repeat(&mut self, config: RepeaterConfig) -> WavyteResult<()> {
        self.repeater.set_config(config)
    }
}

/// Per-frame compositor parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ParallaxState {
    /// Camera position along the scroll axis, in screen pixels.
    pub camera: f64,
    /// Screen pixels per tile-space unit; also the snap grid step.
    pub upscale: f64,
    /// `0` keeps the continuous offset, `1` snaps fully to the `upscale` grid.
    pub snap: f64,
    /// Depth ratio of the plane the viewport is locked to.
    pub anchor: f64,
}

impl Default for ParallaxState {
    fn default() -> Self {
        Self {
            camera: 0.0,
            upscale: 1.0,
            snap: 0.0,
            anchor: 0.0,
        }
    }
}

/// Offset of one layer, before and after snapping.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LayerOffset {
    /// Continuous offset in `[0, tile_width * upscale)`.
    pub raw: f64,
    /// `raw` rounded to the nearest multiple of `upscale`.
    pub snapped: f64,
    /// `raw` blended toward `snapped` by `snap`.
    pub offset: f64,
}

impl ParallaxState {
    /// Check every field; used by the setters before a change is applied.
    pub fn validate(&self) -> WavyteResult<()> {
        if !self.camera.is_finite() {
            return Err(WavyteError::validation(format!(
                "camera must be finite, got {}",
                self.camera
            )));
        }
        if !(self.upscale.is_finite() && self.upscale > 0.0) {
            return Err(WavyteError::validation(format!(
                "upscale must be finite and > 0, got {}",
                self.upscale
            )));
        }
        if !(0.0..=1.0).contains(&self.snap) {
            return Err(WavyteError::validation(format!(
                "snap must be in [0, 1], got {}",
                self.snap
            )));
        }
        if !self.anchor.is_finite() {
            return Err(WavyteError::validation(format!(
                "anchor must be finite, got {}",
                self.anchor
            )));
        }
        Ok(())
    }

    /// Offset for a layer with `ratio` and `tile_width` at the current camera.
    pub fn layer_offset(&self, ratio: f64, tile_width: f64) -> LayerOffset {
        let period = tile_width * self.upscale;
        let raw = wrap(self.camera * (ratio - self.anchor), period);
        let snapped = snap_to_step(raw, self.upscale);
        let offset = lerp(raw, snapped, self.snap).clamp(raw.min(snapped), raw.max(snapped));
        LayerOffset {
            raw,
            snapped,
            offset,
        }
    }
}

/// Ordered set of layers drawn back-to-front in list order.
#[derive(Clone, Debug, Default)]
pub struct Parallax {
    layers: Vec<ParallaxLayer>,
    state: ParallaxState,
}

impl Parallax {
    /// Create a compositor with default state. Layers are drawn in the given order.
    pub fn new(layers: Vec<ParallaxLayer>) -> Self {
        Self {
            layers,
            state: ParallaxState::default(),
        }
    }

    /// Builder form of [`Parallax::set_state`].
    pub fn with_state(mut self, state: ParallaxState) -> WavyteResult<Self> {
        self.set_state(state)?;
        Ok(self)
    }

    /// Append a layer in front of all existing layers.
    pub fn push_layer(&mut self, layer: ParallaxLayer) {
        self.layers.push(layer);
    }

    /// Layers in draw order.
    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    /// Mutable access to layer `index`.
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut ParallaxLayer> {
        self.layers.get_mut(index)
    }

    /// Current state.
    pub fn state(&self) -> ParallaxState {
        self.state
    }

    /// Replace the whole state. On error the previous state stays in effect.
    pub fn set_state(&mut self, state: ParallaxState) -> WavyteResult<()> {
        state.validate()?;
        self.state = state;
        Ok(())
    }

    /// Move the camera.
    ///
    /// With the default `anchor` of `0` every layer, including one at ratio `1`, scrolls by
    /// `camera * ratio`. Call [`Parallax::set_anchor`] with `1.0` to lock ratio-1 layers to the
    /// viewport.
    pub fn set_camera(&mut self, camera: f64) -> WavyteResult<()> {
        self.set_state(ParallaxState {
            camera,
            ..self.state
        })
    }

    /// Set the snap strength in `[0, 1]`.
    pub fn set_snap(&mut self, snap: f64) -> WavyteResult<()> {
        self.set_state(ParallaxState { snap, ..self.state })
    }

    /// Set screen pixels per tile-space unit.
    pub fn set_upscale(&mut self, upscale: f64) -> WavyteResult<()> {
        self.set_state(ParallaxState {
            upscale,
            ..self.state
        })
    }

    /// Set the depth ratio of the viewport's reference plane.
    pub fn set_anchor(&mut self, anchor: f64) -> WavyteResult<()> {
        self.set_state(ParallaxState {
            anchor,
            ..self.state
        })
    }

    /// Assign one ratio per layer, in layer order.
    ///
    /// The list length must equal the layer count. Nothing changes unless every ratio is valid.
    /// A layer is screen-locked when its ratio equals the state's `anchor` (default `0`).
    pub fn set_ratios(&mut self, ratios: &[f64]) -> WavyteResult<()> {
        if ratios.len() != self.layers.len() {
            return Err(WavyteError::validation(format!(
                "expected {} ratios (one per layer), got {}",
                self.layers.len(),
                ratios.len()
            )));
        }
        for &r in ratios {
            validate_ratio(r)?;
        }
        for (layer, &r) in self.layers.iter_mut().zip(ratios) {
            layer.ratio = r;
        }
        Ok(())
    }

    /// Offset of layer `index` at the current state.
    pub fn layer_offset(&self, index: usize) -> Option<LayerOffset> {
        self.layers
            .get(index)
            .map(|l| self.state.layer_offset(l.ratio, l.tile_width))
    }

    /// Offsets of all layers, in draw order.
    pub fn offsets(&self) -> Vec<LayerOffset> {
        self.layers
            .iter()
            .map(|l| self.state.layer_offset(l.ratio, l.tile_width))
            .collect()
    }

    /// Composite every layer onto `surface`.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(camera = self.state.camera, layers = self.layers.len())
    )]
    pub fn render(&self, surface: &mut Surface) -> WavyteResult<()> {
        surface.draw(self, Affine::IDENTITY)
    }

    /// Layer space (tile units) to compositor space, at the current offset.
    fn layer_transform(&self, layer: &ParallaxLayer) -> Affine {
        let offset = self.state.layer_offset(layer.ratio, layer.tile_width).offset;
        affine::compose(
            affine::compose(Affine::translate(Vec2::new(-offset, 0.0)), layer.placement),
            Affine::scale(self.state.upscale),
        )
    }
}

impl Drawable for Parallax {
    fn draw(&self, painter: &mut Painter, transform: Affine) -> WavyteResult<()> {
        for layer in &self.layers {
            let t = affine::compose(transform, self.layer_transform(layer));
            layer.repeater.render(painter, t)?;
        }
        Ok(())
    }

    fn local_bounds(&self) -> Rect {
        self.layers
            .iter()
            .map(|l| self.layer_transform(l).transform_rect_bbox(l.repeater.bbox()))
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
    }
}

fn validate_ratio(ratio: f64) -> WavyteResult<()> {
    if !ratio.is_finite() {
        return Err(WavyteError::validation(format!(
            "layer ratio must be finite, got {ratio}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/parallax.rs"]
mod tests;
