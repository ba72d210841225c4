//! Affine transform helpers shared by the tiling and compositing stages.

/// Composition, inversion checks and integer powers.
pub mod affine;
