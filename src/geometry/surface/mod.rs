mod cylinder;
mod disc;
mod plane;

pub use cylinder::CylinderSurface;
pub use disc::DiscSurface;
pub use plane::PlaneSurface;

use std::fmt;
use std::sync::Arc;

use crate::error::{GeometryError, Result};
use crate::geometry::Extent;
use crate::math::{is_finite_transform, Point3, Transform3, Vector3};

/// Shared, immutable handle to a surface.
///
/// Layers reference surfaces through this handle and never own them
/// exclusively.
pub type SurfaceRef = Arc<dyn Surface>;

/// Shape family of a bounded surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Planar rectangle.
    Plane,
    /// Annulus or annular sector perpendicular to its local z-axis.
    Disc,
    /// Finite cylinder around its local z-axis.
    Cylinder,
}

/// A bounded surface placed in 3D space.
///
/// Implementations are immutable; a transformed copy is a new surface.
pub trait Surface: fmt::Debug + Send + Sync {
    /// Returns the shape family.
    fn kind(&self) -> SurfaceKind;

    /// Returns the placement of the surface's local frame.
    fn transform(&self) -> &Transform3;

    /// Representative position used to count distinct positions when binning.
    fn binning_position(&self) -> Point3;

    /// Unit normal at the binning position.
    fn normal(&self) -> Vector3;

    /// Closed polygonal outline in global coordinates.
    ///
    /// Curved boundaries are approximated with `arc_segments` segments per
    /// full turn.
    fn polyhedron(&self, arc_segments: usize) -> Vec<Point3>;

    /// Returns a copy of this surface moved by `shift` (applied after the
    /// current placement).
    fn shifted(&self, shift: &Transform3) -> SurfaceRef;

    /// Extent of the outline in global coordinates.
    fn extent(&self, arc_segments: usize) -> Extent {
        Extent::from_outline(&self.polyhedron(arc_segments))
    }
}

/// Rejects placements with NaN or infinite components.
pub(crate) fn check_transform(transform: &Transform3) -> Result<()> {
    if is_finite_transform(transform) {
        Ok(())
    } else {
        Err(GeometryError::NonFiniteTransform.into())
    }
}

/// Number of segments used for an arc of `sweep` radians.
pub(crate) fn arc_steps(sweep: f64, arc_segments: usize) -> usize {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let steps = (sweep / std::f64::consts::TAU * arc_segments.max(1) as f64).ceil() as usize;
    steps.max(1)
}
