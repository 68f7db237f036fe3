use std::f64::consts::TAU;
use std::sync::Arc;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Transform3, Vector3, TOLERANCE};

use super::{arc_steps, check_transform, Surface, SurfaceKind, SurfaceRef};

/// A finite cylinder around its local z-axis.
///
/// Covers local `z` in `[-half_z, half_z]` at a fixed `radius`.
#[derive(Debug, Clone)]
pub struct CylinderSurface {
    transform: Transform3,
    radius: f64,
    half_z: f64,
}

impl CylinderSurface {
    /// Creates a new cylinder.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or half length is non-positive, or the
    /// placement is not finite.
    pub fn new(transform: Transform3, radius: f64, half_z: f64) -> Result<Self> {
        check_transform(&transform)?;
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cylinder radius must be positive".into()).into(),
            );
        }
        if half_z < TOLERANCE {
            return Err(
                GeometryError::Degenerate("cylinder half length must be positive".into()).into(),
            );
        }
        Ok(Self {
            transform,
            radius,
            half_z,
        })
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the half length along the local z-axis.
    #[must_use]
    pub fn half_z(&self) -> f64 {
        self.half_z
    }
}

impl Surface for CylinderSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Cylinder
    }

    fn transform(&self) -> &Transform3 {
        &self.transform
    }

    fn binning_position(&self) -> Point3 {
        Point3::from(self.transform.translation.vector)
    }

    /// Normal at local `phi = 0`.
    fn normal(&self) -> Vector3 {
        self.transform.rotation * Vector3::x()
    }

    /// Two rings at `-half_z` and `+half_z`; chords sit slightly inside the
    /// true radius.
    fn polyhedron(&self, arc_segments: usize) -> Vec<Point3> {
        let steps = arc_steps(TAU, arc_segments);
        let ring = |z: f64| {
            (0..steps).map(move |i| {
                #[allow(clippy::cast_precision_loss)]
                let angle = TAU * i as f64 / steps as f64;
                Point3::new(self.radius * angle.cos(), self.radius * angle.sin(), z)
            })
        };
        ring(-self.half_z)
            .chain(ring(self.half_z))
            .map(|p| self.transform * p)
            .collect()
    }

    fn shifted(&self, shift: &Transform3) -> SurfaceRef {
        let mut moved = self.clone();
        moved.transform = shift * self.transform;
        Arc::new(moved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::AxisDirection;
    use approx::assert_relative_eq;

    fn z_cylinder(radius: f64) -> CylinderSurface {
        CylinderSurface::new(Transform3::identity(), radius, 5.0).unwrap()
    }

    #[test]
    fn outline_spans_both_ends() {
        let c = z_cylinder(2.0);
        let e = c.extent(36);
        assert_relative_eq!(e.min(AxisDirection::Z), -5.0);
        assert_relative_eq!(e.max(AxisDirection::Z), 5.0);
        assert_relative_eq!(e.max(AxisDirection::R), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn outline_around_the_axis_covers_every_azimuth() {
        let e = CylinderSurface::new(Transform3::translation(0.0, 0.0, 10.0), 3.0, 5.0)
            .unwrap()
            .extent(72);
        assert!(e.interval(AxisDirection::Phi) >= TAU - 1e-12);
    }

    #[test]
    fn normal_outward_at_zero() {
        let c = z_cylinder(1.0);
        assert!((c.normal() - Vector3::x()).norm() < TOLERANCE);
    }

    #[test]
    fn invalid_radius() {
        assert!(CylinderSurface::new(Transform3::identity(), 0.0, 1.0).is_err());
        assert!(CylinderSurface::new(Transform3::identity(), 1.0, -1.0).is_err());
    }
}
