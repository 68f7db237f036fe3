use std::f64::consts::{PI, TAU};

use super::Point3;

/// Azimuthal angle of a point in `(-pi, pi]`.
#[must_use]
pub fn phi(point: &Point3) -> f64 {
    point.y.atan2(point.x)
}

/// Wraps an angle into `[-pi, pi)`.
#[must_use]
pub fn wrap_phi(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Signed difference `to - from`, wrapped into `[-pi, pi)`.
#[must_use]
pub fn phi_delta(from: f64, to: f64) -> f64 {
    wrap_phi(to - from)
}
