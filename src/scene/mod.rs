//! Drawables, tiling, the parallax compositor and the JSON scene description.

pub(crate) mod config;
pub(crate) mod parallax;
pub(crate) mod repeater;
pub(crate) mod shapes;
