use std::collections::BTreeMap;
use std::sync::Arc;

use kurbo::Shape as _;

use crate::foundation::core::{Affine, BezPath, Rect, Rgba8};
use crate::foundation::error::{WavyteError, WavyteResult};
use crate::render::painter::{Drawable, Painter};

/// A solid-filled path.
#[derive(Clone, Debug)]
pub struct FillPath {
    path: BezPath,
    color: Rgba8,
}

impl FillPath {
    /// Fill `path` with `color`.
    pub fn new(path: BezPath, color: Rgba8) -> Self {
        Self { path, color }
    }

    /// Fill an axis-aligned rectangle.
    pub fn rect(rect: Rect, color: Rgba8) -> Self {
        Self::new(rect.to_path(0.1), color)
    }

    /// Parse SVG path data (`d` attribute syntax).
    pub fn from_svg(d: &str, color: Rgba8) -> WavyteResult<Self> {
        let path = BezPath::from_svg(d)
            .map_err(|e| WavyteError::validation(format!("invalid svg_path_d: {e}")))?;
        Ok(Self::new(path, color))
    }
}

impl Drawable for FillPath {
    fn draw(&self, painter: &mut Painter, transform: Affine) -> WavyteResult<()> {
        painter.fill_path(&self.path, transform, self.color);
        Ok(())
    }

    fn local_bounds(&self) -> Rect {
        self.path.bounding_box()
    }
}

/// A grid of optional colors, one unit square per cell.
///
/// Cell `(x, y)` covers `[x, x+1) x [y, y+1)` in local space.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelSprite {
    width: u32,
    height: u32,
    cells: Vec<Option<Rgba8>>,
}

impl PixelSprite {
    /// Build from row-major cells; `None` is transparent.
    pub fn new(width: u32, height: u32, cells: Vec<Option<Rgba8>>) -> WavyteResult<Self> {
        if cells.len() != width as usize * height as usize {
            return Err(WavyteError::validation(format!(
                "sprite expects {} cells, got {}",
                width as usize * height as usize,
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build from text rows; `.` and ` ` are transparent, other chars index `palette`.
    pub fn from_rows<S: AsRef<str>>(
        rows: &[S],
        palette: &BTreeMap<char, Rgba8>,
    ) -> WavyteResult<Self> {
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(WavyteError::validation(format!(
                    "sprite row {y} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }
            for ch in row.chars() {
                let cell = match ch {
                    '.' | ' ' => None,
                    _ => Some(*palette.get(&ch).ok_or_else(|| {
                        WavyteError::validation(format!("sprite char '{ch}' is not in the palette"))
                    })?),
                };
                cells.push(cell);
            }
        }
        let width = u32::try_from(width)
            .map_err(|_| WavyteError::validation("sprite is too wide"))?;
        let height = u32::try_from(rows.len())
            .map_err(|_| WavyteError::validation("sprite is too tall"))?;
        Self::new(width, height, cells)
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell color at `(x, y)`.
    pub fn cell(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Horizontal runs of equal color as `(y, x0, x1, color)`.
    fn runs(&self) -> impl Iterator<Item = (u32, u32, u32, Rgba8)> + '_ {
        (0..self.height).flat_map(move |y| {
            let mut out = Vec::new();
            let mut x = 0;
            while x < self.width {
                let Some(color) = self.cell(x, y) else {
                    x += 1;
                    continue;
                };
                let start = x;
                while x < self.width && self.cell(x, y) == Some(color) {
                    x += 1;
                }
                out.push((y, start, x, color));
            }
            out
        })
    }
}

impl Drawable for PixelSprite {
    fn draw(&self, painter: &mut Painter, transform: Affine) -> WavyteResult<()> {
        for (y, x0, x1, color) in self.runs() {
            let rect = Rect::new(
                f64::from(x0),
                f64::from(y),
                f64::from(x1),
                f64::from(y) + 1.0,
            );
            painter.fill_rect(rect, transform, color);
        }
        Ok(())
    }

    fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Ordered children, each with its own local-to-group transform. Drawn in list order.
#[derive(Clone, Default)]
pub struct Group {
    children: Vec<(Affine, Arc<dyn Drawable>)>,
}

impl Group {
    /// An empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child drawn after all existing children.
    pub fn push(&mut self, transform: Affine, child: Arc<dyn Drawable>) {
        self.children.push((transform, child));
    }

    /// Builder form of [`Group::push`].
    pub fn with(mut self, transform: Affine, child: Arc<dyn Drawable>) -> Self {
        self.push(transform, child);
        self
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Return `true` when the group has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Drawable for Group {
    fn draw(&self, painter: &mut Painter, transform: Affine) -> WavyteResult<()> {
        for (local, child) in &self.children {
            child.draw(painter, transform * *local)?;
        }
        Ok(())
    }

    fn local_bounds(&self) -> Rect {
        self.children
            .iter()
            .map(|(local, child)| local.transform_rect_bbox(child.local_bounds()))
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/shapes.rs"]
mod tests;
