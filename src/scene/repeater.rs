//! Tile repetition by transform composition.
//!
//! A [`Repeater`] draws one shared unit many times. Copy `k` is placed at `T^k`, where `T` is
//! the unit transform and `k` runs over `[start, start + copies)`. The copies are produced by
//! stepping a running matrix, never by duplicating scene content.

use std::sync::Arc;

use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::{WavyteError, WavyteResult};
use crate::render::painter::{Drawable, Painter};
use crate::transform::affine;

/// How many copies to draw and which index the first one has.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RepeaterConfig {
    /// Number of copies drawn.
    pub copies: u32,
    /// Signed index of the first copy; copy `0` sits at the unit's own placement.
    pub start: i32,
}

impl RepeaterConfig {
    /// Build a config drawing `copies` copies starting at index `start`.
    pub const fn new(copies: u32, start: i32) -> Self {
        Self { copies, start }
    }

    /// Enough copies to span `viewport` with one extra `period` of margin on each side.
    ///
    /// Yields `start = -1` and `copies = ceil(viewport / period) + 2`.
    pub fn covering(viewport: f64, period: f64) -> WavyteResult<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(WavyteError::validation(format!(
                "tile period must be finite and > 0, got {period}"
            )));
        }
        if !(viewport.is_finite() && viewport >= 0.0) {
            return Err(WavyteError::validation(format!(
                "viewport must be finite and >= 0, got {viewport}"
            )));
        }
        let span = (viewport / period).ceil();
        if span > f64::from(u32::MAX - 2) {
            return Err(WavyteError::validation("viewport needs too many tile copies"));
        }
        Ok(Self::new(span as u32 + 2, -1))
    }

    /// Copy indices in draw order.
    pub fn indices(self) -> std::ops::Range<i64> {
        let start = i64::from(self.start);
        start..start + i64::from(self.copies)
    }
}

/// Iterator over `(index, transform)` for each copy, in ascending index order.
#[derive(Clone, Debug)]
pub struct TileWalk {
    step: Affine,
    current: Affine,
    index: i64,
    remaining: u32,
}

impl Iterator for TileWalk {
    type Item = (i64, Affine);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = (self.index, self.current);
        self.current = affine::compose(self.current, self.step);
        self.index += 1;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for TileWalk {}

/// Draws a single unit repeatedly along its own transform.
///
/// The unit content is shared, not owned; only its transform and config live here. The bounding
/// box is recomputed whenever either changes, so [`Repeater::bbox`] is a cached read. Without an
/// own box and with zero copies the bounding box is [`Rect::ZERO`].
#[derive(Clone)]
pub struct Repeater {
    unit: Arc<dyn Drawable>,
    unit_transform: Affine,
    config: RepeaterConfig,
    own_bounds: Option<Rect>,
    bbox: Rect,
}

impl Repeater {
    /// Create a repeater, rejecting a singular `unit_transform` when `config.start < 0`.
    pub fn new(
        unit: Arc<dyn Drawable>,
        unit_transform: Affine,
        config: RepeaterConfig,
    ) -> WavyteResult<Self> {
        validate(unit_transform, config)?;
        let mut r = Self {
            unit,
            unit_transform,
            config,
            own_bounds: None,
            bbox: Rect::ZERO,
        };
        r.bbox = r.compute_bbox();
        Ok(r)
    }

    /// Set the repeater's own (un-tiled) box, which is always part of the bounding box.
    pub fn with_own_bounds(mut self, bounds: Rect) -> Self {
        self.own_bounds = Some(bounds);
        self.bbox = self.compute_bbox();
        self
    }

    /// The shared unit.
    pub fn unit(&self) -> &Arc<dyn Drawable> {
        &self.unit
    }

    /// Step between consecutive copies.
    pub fn unit_transform(&self) -> Affine {
        self.unit_transform
    }

    /// Current copy range.
    pub fn config(&self) -> RepeaterConfig {
        self.config
    }

    /// The repeater's own (un-tiled) box, if one was set.
    pub fn own_bounds(&self) -> Option<Rect> {
        self.own_bounds
    }

    /// Cached union of all copy bounds and the own box.
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    /// Change the copy range. On error the previous config stays in effect.
    pub fn set_config(&mut self, config: RepeaterConfig) -> WavyteResult<()> {
        validate(self.unit_transform, config)?;
        self.config = config;
        self.bbox = self.compute_bbox();
        Ok(())
    }

    /// Change the per-copy step. On error the previous transform stays in effect.
    pub fn set_unit_transform(&mut self, unit_transform: Affine) -> WavyteResult<()> {
        validate(unit_transform, self.config)?;
        self.unit_transform = unit_transform;
        self.bbox = self.compute_bbox();
        Ok(())
    }

    /// Swap the shared unit content.
    pub fn set_unit(&mut self, unit: Arc<dyn Drawable>) {
        self.unit = unit;
        self.bbox = self.compute_bbox();
    }

    /// Walk the copies in draw order.
    ///
    /// The running matrix starts at identity and is stepped by the inverse of the unit transform
    /// `-start` times (or forward `start` times), so the first item is `T^start`. Each following
    /// item post-multiplies by `T`.
    pub fn tile_transforms(&self) -> TileWalk {
        let start = self.config.start;
        let mut current = affine::identity();
        if start < 0 {
            // Invertibility was checked when the config was accepted.
            let inverse = self.unit_transform.inverse();
            for _ in start..0 {
                current = affine::compose(current, inverse);
            }
        } else {
            for _ in 0..start {
                current = affine::compose(current, self.unit_transform);
            }
        }
        TileWalk {
            step: self.unit_transform,
            current,
            index: i64::from(start),
            remaining: self.config.copies,
        }
    }

    /// Placement of copy `index` computed directly as `T^index`.
    pub fn copy_transform(&self, index: i64) -> WavyteResult<Affine> {
        affine::power(self.unit_transform, index)
    }

    /// Union of every copy's unit bounds (in repeater space) with the own box.
    pub fn compute_bbox(&self) -> Rect {
        let local = self.unit.local_bounds();
        self.tile_transforms()
            .map(|(_, m)| m.transform_rect_bbox(local))
            .fold(self.own_bounds, |acc, copy| {
                Some(acc.map_or(copy, |a| a.union(copy)))
            })
            .unwrap_or(Rect::ZERO)
    }

    /// Draw every copy, in ascending index order, under `transform`.
    pub fn render(&self, painter: &mut Painter, transform: Affine) -> WavyteResult<()> {
        for (_, m) in self.tile_transforms() {
            self.unit.draw(painter, affine::compose(transform, m))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Repeater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repeater")
            .field("unit_transform", &self.unit_transform)
            .field("config", &self.config)
            .field("own_bounds", &self.own_bounds)
            .field("bbox", &self.bbox)
            .finish_non_exhaustive()
    }
}

impl Drawable for Repeater {
    fn draw(&self, painter: &mut Painter, transform: Affine) -> WavyteResult<()> {
        self.render(painter, transform)
    }

    fn local_bounds(&self) -> Rect {
        self.bbox
    }
}

fn validate(unit_transform: Affine, config: RepeaterConfig) -> WavyteResult<()> {
    if !unit_transform.is_finite() {
        return Err(WavyteError::validation(
            "repeater unit transform must have finite coefficients",
        ));
    }
    if config.start < 0 && !affine::is_invertible(unit_transform) {
        return Err(WavyteError::validation(format!(
            "repeater start {} needs an invertible unit transform",
            config.start
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/repeater.rs"]
mod tests;
