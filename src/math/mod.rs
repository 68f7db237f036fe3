pub mod phi;
pub mod radial;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Rigid-body placement (rotation followed by translation).
pub type Transform3 = nalgebra::Isometry3<f64>;

/// Pure translation part of a [`Transform3`].
pub type Translation3 = nalgebra::Translation3<f64>;

/// Unit quaternion rotation part of a [`Transform3`].
pub type Rotation3 = nalgebra::UnitQuaternion<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns `true` if every component of the transform is finite.
#[must_use]
pub fn is_finite_transform(transform: &Transform3) -> bool {
    transform.translation.vector.iter().all(|c| c.is_finite())
        && transform.rotation.coords.iter().all(|c| c.is_finite())
}

/// Returns `true` if `transform` is the identity within `tolerance`.
///
/// The rotation is compared through its angle, the translation per component.
#[must_use]
pub fn is_identity(transform: &Transform3, tolerance: f64) -> bool {
    transform.translation.vector.amax() <= tolerance && transform.rotation.angle() <= tolerance
}

/// Returns `true` if two placements agree within `tolerance`.
#[must_use]
pub fn transforms_close(a: &Transform3, b: &Transform3, tolerance: f64) -> bool {
    is_identity(&(a * b.inverse()), tolerance)
}
