use std::sync::Arc;

use crate::error::Result;
use crate::geometry::{CylinderSurface, DiscSurface, PlaneSurface, SurfaceRef};
use crate::math::{Point3, Transform3, TOLERANCE};

use super::LayerShape;

/// Boundary surfaces through which a layer is entered.
#[derive(Debug, Clone, Default)]
pub struct ApproachDescriptor {
    surfaces: Vec<SurfaceRef>,
}

impl ApproachDescriptor {
    /// Wraps caller-built approach surfaces.
    #[must_use]
    pub fn new(surfaces: Vec<SurfaceRef>) -> Self {
        Self { surfaces }
    }

    /// Default approach surfaces for a layer of `shape` placed at `placement`.
    ///
    /// Cylinders get an inner and an outer tube, discs get a disc on each
    /// face and planes a rectangle on each side.
    ///
    /// # Errors
    ///
    /// Returns an error if `placement` is not finite.
    pub fn for_shape(shape: &LayerShape, placement: &Transform3) -> Result<Self> {
        let surfaces: Vec<SurfaceRef> = match shape {
            LayerShape::Cylinder(b) => {
                let mut tubes: Vec<SurfaceRef> = Vec::with_capacity(2);
                // A layer reaching the axis has no inner tube.
                if b.r_min() > TOLERANCE {
                    tubes.push(Arc::new(CylinderSurface::new(*placement, b.r_min(), b.half_z())?));
                }
                tubes.push(Arc::new(CylinderSurface::new(*placement, b.r_max(), b.half_z())?));
                tubes
            }
            LayerShape::Disc(b) => [b.z_min(), b.z_max()]
                .into_iter()
                .map(|z| {
                    let face = placement * Transform3::translation(0.0, 0.0, z);
                    Ok(Arc::new(DiscSurface::full(face, b.r_min(), b.r_max())?) as SurfaceRef)
                })
                .collect::<Result<_>>()?,
            LayerShape::Plane(b) => [-b.half_z(), b.half_z()]
                .into_iter()
                .map(|z| {
                    let face = placement * Transform3::translation(0.0, 0.0, z);
                    Ok(Arc::new(PlaneSurface::new(face, b.half_x(), b.half_y())?) as SurfaceRef)
                })
                .collect::<Result<_>>()?,
        };
        Ok(Self { surfaces })
    }

    /// Returns the approach surfaces.
    #[must_use]
    pub fn surfaces(&self) -> &[SurfaceRef] {
        &self.surfaces
    }

    /// Copy with every approach surface moved by `shift`.
    #[must_use]
    pub fn with_shift(&self, shift: &Transform3) -> Self {
        Self {
            surfaces: self.surfaces.iter().map(|s| s.shifted(shift)).collect(),
        }
    }

    /// Approach surface whose binning position is nearest to `position`.
    #[must_use]
    pub fn closest(&self, position: &Point3) -> Option<&SurfaceRef> {
        self.surfaces.iter().min_by(|a, b| {
            let da = (a.binning_position() - position).norm_squared();
            let db = (b.binning_position() - position).norm_squared();
            da.total_cmp(&db)
        })
    }
}
