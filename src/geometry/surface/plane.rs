use std::sync::Arc;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Rotation3, Transform3, Translation3, Vector3, TOLERANCE};

use super::{check_transform, Surface, SurfaceKind, SurfaceRef};

/// A rectangular planar surface.
///
/// The rectangle spans `[-half_x, half_x] x [-half_y, half_y]` in the local
/// xy-plane; the local z-axis is the normal.
#[derive(Debug, Clone)]
pub struct PlaneSurface {
    transform: Transform3,
    half_x: f64,
    half_y: f64,
}

impl PlaneSurface {
    /// Creates a new rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error if a half length is not positive or the placement is
    /// not finite.
    pub fn new(transform: Transform3, half_x: f64, half_y: f64) -> Result<Self> {
        check_transform(&transform)?;
        if !(half_x > TOLERANCE && half_y > TOLERANCE) {
            return Err(
                GeometryError::Degenerate("rectangle half lengths must be positive".into()).into(),
            );
        }
        Ok(Self {
            transform,
            half_x,
            half_y,
        })
    }

    /// Creates a rectangle centred at `center` with local axes `u_dir` and
    /// `v_dir`. The normal is `u_dir x v_dir`.
    ///
    /// `v_dir` is re-orthogonalised against `u_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vectors are zero-length or parallel,
    /// or a half length is not positive.
    pub fn from_axes(
        center: Point3,
        u_dir: Vector3,
        v_dir: Vector3,
        half_x: f64,
        half_y: f64,
    ) -> Result<Self> {
        let u_len = u_dir.norm();
        if u_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        if v_dir.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let u_dir = u_dir / u_len;

        let normal = u_dir.cross(&v_dir);
        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(
                GeometryError::Degenerate("plane directions are parallel".into()).into(),
            );
        }
        let normal = normal / normal_len;
        let v_dir = normal.cross(&u_dir);

        let basis = nalgebra::Matrix3::from_columns(&[u_dir, v_dir, normal]);
        let rotation =
            Rotation3::from_rotation_matrix(&nalgebra::Rotation3::from_matrix_unchecked(basis));
        let transform = Transform3::from_parts(Translation3::from(center.coords), rotation);
        Self::new(transform, half_x, half_y)
    }

    /// Returns the half length along the local x-axis.
    #[must_use]
    pub fn half_x(&self) -> f64 {
        self.half_x
    }

    /// Returns the half length along the local y-axis.
    #[must_use]
    pub fn half_y(&self) -> f64 {
        self.half_y
    }
}

impl Surface for PlaneSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Plane
    }

    fn transform(&self) -> &Transform3 {
        &self.transform
    }

    fn binning_position(&self) -> Point3 {
        Point3::from(self.transform.translation.vector)
    }

    fn normal(&self) -> Vector3 {
        self.transform.rotation * Vector3::z()
    }

    fn polyhedron(&self, _arc_segments: usize) -> Vec<Point3> {
        let (hx, hy) = (self.half_x, self.half_y);
        [(-hx, -hy), (hx, -hy), (hx, hy), (-hx, hy)]
            .iter()
            .map(|&(x, y)| self.transform * Point3::new(x, y, 0.0))
            .collect()
    }

    fn shifted(&self, shift: &Transform3) -> SurfaceRef {
        let mut moved = self.clone();
        moved.transform = shift * self.transform;
        Arc::new(moved)
    }
}
