use std::f64::consts::PI;
use std::sync::Arc;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Transform3, Vector3, TOLERANCE};

use super::{arc_steps, check_transform, Surface, SurfaceKind, SurfaceRef};

/// An annulus, or annular sector, in the local xy-plane.
///
/// Covers radii `[r_min, r_max]` and azimuths
/// `[avg_phi - half_phi, avg_phi + half_phi]` around the local z-axis.
#[derive(Debug, Clone)]
pub struct DiscSurface {
    transform: Transform3,
    r_min: f64,
    r_max: f64,
    avg_phi: f64,
    half_phi: f64,
}

impl DiscSurface {
    /// Creates a full annulus.
    ///
    /// # Errors
    ///
    /// Returns an error if the radii are not `0 <= r_min < r_max`.
    pub fn full(transform: Transform3, r_min: f64, r_max: f64) -> Result<Self> {
        Self::sector(transform, r_min, r_max, 0.0, PI)
    }

    /// Creates an annular sector.
    ///
    /// # Errors
    ///
    /// Returns an error if the radii are not `0 <= r_min < r_max`, the
    /// half opening angle is outside `(0, pi]`, or the placement is not finite.
    pub fn sector(
        transform: Transform3,
        r_min: f64,
        r_max: f64,
        avg_phi: f64,
        half_phi: f64,
    ) -> Result<Self> {
        check_transform(&transform)?;
        if !(r_min >= 0.0 && r_max - r_min > TOLERANCE) {
            return Err(GeometryError::InvalidBounds {
                what: "disc radial",
                min: r_min,
                max: r_max,
            }
            .into());
        }
        if !(half_phi > TOLERANCE && half_phi <= PI) || !avg_phi.is_finite() {
            return Err(GeometryError::Degenerate(format!(
                "disc half opening angle {half_phi} outside (0, pi]"
            ))
            .into());
        }
        Ok(Self {
            transform,
            r_min,
            r_max,
            avg_phi,
            half_phi,
        })
    }

    /// Returns the inner radius.
    #[must_use]
    pub fn r_min(&self) -> f64 {
        self.r_min
    }

    /// Returns the outer radius.
    #[must_use]
    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    /// Returns the central azimuth of the sector.
    #[must_use]
    pub fn avg_phi(&self) -> f64 {
        self.avg_phi
    }

    /// Returns the half opening angle of the sector.
    #[must_use]
    pub fn half_phi(&self) -> f64 {
        self.half_phi
    }

    fn is_full(&self) -> bool {
        self.half_phi >= PI - TOLERANCE
    }

    fn arc(&self, radius: f64, steps: usize) -> impl Iterator<Item = Point3> + '_ {
        let start = self.avg_phi - self.half_phi;
        #[allow(clippy::cast_precision_loss)]
        let step = 2.0 * self.half_phi / steps as f64;
        (0..=steps).map(move |i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = start + step * i as f64;
            self.transform * Point3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
        })
    }
}

impl Surface for DiscSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Disc
    }

    fn transform(&self) -> &Transform3 {
        &self.transform
    }

    fn binning_position(&self) -> Point3 {
        if self.is_full() {
            return Point3::from(self.transform.translation.vector);
        }
        let r = 0.5 * (self.r_min + self.r_max);
        self.transform * Point3::new(r * self.avg_phi.cos(), r * self.avg_phi.sin(), 0.0)
    }

    fn normal(&self) -> Vector3 {
        self.transform.rotation * Vector3::z()
    }

    fn polyhedron(&self, arc_segments: usize) -> Vec<Point3> {
        let steps = arc_steps(2.0 * self.half_phi, arc_segments);
        let mut outline: Vec<Point3> = self.arc(self.r_max, steps).collect();
        if self.r_min > TOLERANCE {
            // Inner chords touch r_min at their midpoints.
            #[allow(clippy::cast_precision_loss)]
            let half_step = self.half_phi / steps as f64;
            let inner: Vec<Point3> = self.arc(self.r_min / half_step.cos(), steps).collect();
            outline.extend(inner.into_iter().rev());
        } else {
            outline.push(self.transform * Point3::origin());
        }
        outline
    }

    fn shifted(&self, shift: &Transform3) -> SurfaceRef {
        let mut moved = self.clone();
        moved.transform = shift * self.transform;
        Arc::new(moved)
    }
}
