//! CPU raster surfaces, drawing, compositing and pixel-snap upscaling.

pub(crate) mod composite;
pub(crate) mod painter;
pub(crate) mod pipeline;
pub(crate) mod surface;
pub(crate) mod upscale;
