use crate::foundation::core::{Affine, BezPath, Rect, Rgba8};
use crate::foundation::error::WavyteResult;

/// Anything that can rasterize itself under a caller-supplied transform.
///
/// This is the only contract the tiling and compositing stages need from scene content.
pub trait Drawable: Send + Sync {
    /// Draw into `painter` with `transform` mapping local space to painter space.
    fn draw(&self, painter: &mut Painter, transform: Affine) -> WavyteResult<()>;

    /// Axis-aligned bounds in local space.
    fn local_bounds(&self) -> Rect;
}

/// Immediate-mode drawing target backed by `vello_cpu`.
pub struct Painter {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl Painter {
    pub(crate) fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        }
    }

    /// Target width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Target height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Fill `rect` (local space) with a solid color.
    pub fn fill_rect(&mut self, rect: Rect, transform: Affine, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
    }

    /// Fill `path` (local space) with a solid color using the non-zero rule.
    pub fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Rasterize everything drawn so far into `pixmap`.
    pub(crate) fn finish_into(mut self, pixmap: &mut vello_cpu::Pixmap) {
        self.ctx.flush();
        self.ctx.render_to_pixmap(pixmap);
    }

    /// Rasterize into a fresh transparent pixmap.
    pub(crate) fn finish(self) -> vello_cpu::Pixmap {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.finish_into(&mut pixmap);
        pixmap
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
