/// Normalize `value` into `[0, modulus)` for a positive `modulus`.
///
/// Negative inputs wrap from the top (`-1 mod 16 == 15`).
pub fn wrap(value: f64, modulus: f64) -> f64 {
    let r = value.rem_euclid(modulus);
    // A tiny negative `value` rounds up to exactly `modulus`.
    if r >= modulus { 0.0 } else { r }
}

/// Linear interpolation, exact at `t == 0` and `t == 1`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Round `value` to the nearest multiple of `step`.
pub fn snap_to_step(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
