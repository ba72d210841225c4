//! JSON scene descriptions.
//!
//! A [`SceneSpec`] lists layers back-to-front. Each layer's unit is authored in tile space and
//! built from rectangles, SVG path data and text-row pixel sprites.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Rect, Rgba8, Transform2D};
use crate::foundation::error::{WavyteError, WavyteResult};
use crate::render::painter::Drawable;
use crate::render::pipeline::Scene;
use crate::scene::parallax::{Parallax, ParallaxLayer, ParallaxState};
use crate::scene::repeater::RepeaterConfig;
use crate::scene::shapes::{FillPath, Group, PixelSprite};

/// Serializable description of a full parallax scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneSpec {
    /// Output size in pixels.
    pub canvas: Canvas,
    /// Color every frame is cleared to.
    #[serde(default = "transparent")]
    pub background: Rgba8,
    /// Screen pixels per tile-space unit.
    #[serde(default = "one")]
    pub upscale: f64,
    /// Snap strength in `[0, 1]`.
    #[serde(default)]
    pub snap: f64,
    /// Depth ratio the viewport is locked to.
    #[serde(default)]
    pub anchor: f64,
    /// When set, layers are rasterized at `1 / pixel_factor` resolution and magnified with
    /// nearest-neighbor sampling. Must equal `upscale`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_factor: Option<f64>,
    /// Layers, back to front.
    pub layers: Vec<LayerSpec>,
}

/// One depth plane of a [`SceneSpec`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerSpec {
    /// Depth ratio.
    pub ratio: f64,
    /// Horizontal period of the unit, in tile space.
    pub tile_width: f64,
    /// Copy range; derived from the canvas width when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeaterConfig>,
    /// Screen-space placement of the strip.
    #[serde(default)]
    pub placement: Transform2D,
    /// Items making up one tile, drawn in order.
    pub unit: Vec<UnitItem>,
}

/// A primitive inside a layer's unit.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitItem {
    /// Solid rectangle.
    Rect {
        /// Rectangle in item space.
        rect: Rect,
        /// Fill color.
        color: Rgba8,
        /// Item-to-tile transform.
        #[serde(default)]
        transform: Transform2D,
    },
    /// Solid path from SVG `d` syntax.
    Path {
        /// SVG path data.
        svg_path_d: String,
        /// Fill color.
        color: Rgba8,
        /// Item-to-tile transform.
        #[serde(default)]
        transform: Transform2D,
    },
    /// Pixel sprite from text rows; `.` and space are transparent.
    Sprite {
        /// One string per row, all the same length.
        rows: Vec<String>,
        /// Color for each non-transparent character.
        palette: BTreeMap<char, Rgba8>,
        /// Item-to-tile transform.
        #[serde(default)]
        transform: Transform2D,
    },
}

fn transparent() -> Rgba8 {
    Rgba8::TRANSPARENT
}

fn one() -> f64 {
    1.0
}

impl SceneSpec {
    /// Parse a scene from JSON text.
    pub fn from_json_str(s: &str) -> WavyteResult<Self> {
        serde_json::from_str(s).map_err(|e| WavyteError::serde(format!("scene json: {e}")))
    }

    /// Read and parse a scene file.
    pub fn from_path(path: impl AsRef<Path>) -> WavyteResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> WavyteResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| WavyteError::serde(e.to_string()))
    }

    /// Check every field without building anything.
    pub fn validate(&self) -> WavyteResult<()> {
        ParallaxState {
            camera: 0.0,
            upscale: self.upscale,
            snap: self.snap,
            anchor: self.anchor,
        }
        .validate()?;
        if let Some(f) = self.pixel_factor
            && !(f.is_finite() && f > 0.0)
        {
            return Err(WavyteError::validation(format!(
                "pixel_factor must be finite and > 0, got {f}"
            )));
        }
        // Snapping rounds to multiples of `upscale`; that is only the low-res grid when they match.
        if let Some(f) = self.pixel_factor
            && (f - self.upscale).abs() > 1e-9 * self.upscale
        {
            return Err(WavyteError::validation(format!(
                "pixel_factor {f} must equal upscale {}",
                self.upscale
            )));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            layer
                .validate()
                .map_err(|e| WavyteError::validation(format!("layer {i}: {}", strip(&e))))?;
        }
        Ok(())
    }

    /// Validate and build a runnable [`Scene`].
    pub fn build(&self) -> WavyteResult<Scene> {
        self.validate()?;
        let mut parallax = Parallax::new(Vec::with_capacity(self.layers.len())).with_state(
            ParallaxState {
                camera: 0.0,
                upscale: self.upscale,
                snap: self.snap,
                anchor: self.anchor,
            },
        )?;
        for layer in &self.layers {
            let repeat = match layer.repeat {
                Some(r) => r,
                None => RepeaterConfig::covering(
                    f64::from(self.canvas.width),
                    layer.tile_width * self.upscale,
                )?,
            };
            let built = ParallaxLayer::new(layer.build_unit()?, layer.tile_width, layer.ratio, repeat)?
                .with_placement(layer.placement.to_affine());
            parallax.push_layer(built);
        }
        Scene::new(self.canvas, self.background, parallax, self.pixel_factor)
    }
}

impl LayerSpec {
    fn validate(&self) -> WavyteResult<()> {
        if !self.ratio.is_finite() {
            return Err(WavyteError::validation("ratio must be finite"));
        }
        if !(self.tile_width.is_finite() && self.tile_width > 0.0) {
            return Err(WavyteError::validation(format!(
                "tile_width must be finite and > 0, got {}",
                self.tile_width
            )));
        }
        if !self.placement.to_affine().is_finite() {
            return Err(WavyteError::validation("placement must be finite"));
        }
        self.build_unit().map(|_| ())
    }

    /// The unit as a single drawable group.
    pub fn build_unit(&self) -> WavyteResult<Arc<dyn Drawable>> {
        let mut group = Group::new();
        for item in &self.unit {
            let (transform, drawable): (Transform2D, Arc<dyn Drawable>) = match item {
                UnitItem::Rect {
                    rect,
                    color,
                    transform,
                } => (*transform, Arc::new(FillPath::rect(*rect, *color))),
                UnitItem::Path {
                    svg_path_d,
                    color,
                    transform,
                } => (*transform, Arc::new(FillPath::from_svg(svg_path_d, *color)?)),
                UnitItem::Sprite {
                    rows,
                    palette,
                    transform,
                } => (*transform, Arc::new(PixelSprite::from_rows(rows, palette)?)),
            };
            let affine = transform.to_affine();
            if !affine.is_finite() {
                return Err(WavyteError::validation("unit item transform must be finite"));
            }
            group.push(affine, drawable);
        }
        Ok(Arc::new(group))
    }
}

fn strip(e: &WavyteError) -> String {
    match e {
        WavyteError::Validation(msg) | WavyteError::Render(msg) | WavyteError::Serde(msg) => {
            msg.clone()
        }
        WavyteError::Other(err) => format!("{err:#}"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
