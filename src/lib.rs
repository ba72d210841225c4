//! Wavyte Parallax renders endlessly scrolling, multi-depth backgrounds on the CPU.
//!
//! A scene is a stack of layers, each one a small tile-space drawing repeated along the
//! scroll axis. A single camera scalar drives every layer at its own depth ratio, and an
//! optional pixel-snap pass rasterizes the result at low resolution before magnifying it with
//! nearest-neighbor sampling.
//!
//! # Pipeline overview
//!
//! 1. **Compose**: [`Parallax`] turns `camera * (ratio - anchor)` into a wrapped, optionally
//!    snapped offset per layer.
//! 2. **Tile**: each layer's [`Repeater`] walks `T^start .. T^(start + copies)` and draws the
//!    shared unit once per step.
//! 3. **Snap** (optional): [`Upscaler`] renders the stack at `1 / factor` size into an owned
//!    buffer and blits it onto the frame with nearest-neighbor sampling.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs produce byte-identical frames.
//! - **Premultiplied RGBA8** end-to-end: [`Surface`] stores premultiplied pixels.
//!
//! # Getting started
//!
//! Describe a scene in JSON, parse it with [`SceneSpec::from_json_str`], then call
//! [`Scene::render_frame`] once per camera position.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod render;
mod scene;

/// Shared affine helpers (composition, invertibility, integer powers).
pub mod transform;

pub use foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Transform2D, Vec2};
pub use foundation::error::{WavyteError, WavyteResult};
pub use foundation::math::{lerp, snap_to_step, wrap};
pub use render::composite::{
    BlitParams, PremulRgba8, blit_nearest_over, nearest_index, over, over_in_place,
};
pub use render::painter::{Drawable, Painter};
pub use render::pipeline::{Scene, camera_sweep};
pub use render::surface::{FrameRGBA, Surface};
pub use render::upscale::{Upscaler, UpscalerStats, low_res_size};
pub use scene::config::{LayerSpec, SceneSpec, UnitItem};
pub use scene::parallax::{LayerOffset, Parallax, ParallaxLayer, ParallaxState};
pub use scene::repeater::{Repeater, RepeaterConfig, TileWalk};
pub use scene::shapes::{FillPath, Group, PixelSprite};
