//! Layers: binned collections of sensitive surfaces.

mod approach;
mod creator;

pub use approach::ApproachDescriptor;
pub use creator::{LayerCreator, LayerOptions};

use tracing::debug;

use crate::binning::SurfaceArray;
use crate::error::{GeometryError, Result};
use crate::geometry::{CylinderBounds, DiscBounds, PlaneBounds, SurfaceRef};
use crate::math::phi::phi;
use crate::math::radial::perp;
use crate::math::{is_finite_transform, Point3, Transform3};

/// Shape and bounds of a layer, in its local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerShape {
    /// Tube around the local z-axis, binned in `(phi, z)`.
    Cylinder(CylinderBounds),
    /// Annulus perpendicular to the local z-axis, binned in `(r, phi)`.
    Disc(DiscBounds),
    /// Box with its thin side along local z, binned in `(x, y)`.
    Plane(PlaneBounds),
}

impl LayerShape {
    /// Returns the extent of the layer across its surfaces.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        match self {
            Self::Cylinder(b) => b.thickness(),
            Self::Disc(b) => b.thickness(),
            Self::Plane(b) => b.thickness(),
        }
    }
}

/// A placed, bounded container of surfaces organised for fast lookup.
///
/// Layers are immutable once built; moving one produces a new layer.
#[derive(Debug, Clone)]
pub struct Layer {
    shape: LayerShape,
    placement: Transform3,
    surface_array: SurfaceArray,
    approach: ApproachDescriptor,
}

impl Layer {
    pub(crate) fn new(
        shape: LayerShape,
        placement: Transform3,
        surface_array: SurfaceArray,
        approach: ApproachDescriptor,
    ) -> Self {
        Self {
            shape,
            placement,
            surface_array,
            approach,
        }
    }

    /// Returns the shape and bounds.
    #[must_use]
    pub fn shape(&self) -> &LayerShape {
        &self.shape
    }

    /// Returns the placement of the layer frame.
    #[must_use]
    pub fn placement(&self) -> &Transform3 {
        &self.placement
    }

    /// Returns the binned surfaces.
    #[must_use]
    pub fn surface_array(&self) -> &SurfaceArray {
        &self.surface_array
    }

    /// Returns the approach surfaces.
    #[must_use]
    pub fn approach_descriptor(&self) -> &ApproachDescriptor {
        &self.approach
    }

    /// Returns the layer thickness.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.shape.thickness()
    }

    /// Converts a global point into the layer's two binning coordinates:
    /// `(phi, z)` for cylinders, `(r, phi)` for discs, `(x, y)` for planes.
    #[must_use]
    pub fn local_coordinates(&self, global: &Point3) -> (f64, f64) {
        let local = self.placement.inverse_transform_point(global);
        match self.shape {
            LayerShape::Cylinder(_) => (phi(&local), local.z),
            LayerShape::Disc(_) => (perp(&local), phi(&local)),
            LayerShape::Plane(_) => (local.x, local.y),
        }
    }

    /// Surfaces in the bin containing `global`.
    #[must_use]
    pub fn surfaces_at(&self, global: &Point3) -> Vec<&SurfaceRef> {
        let (v0, v1) = self.local_coordinates(global);
        self.surface_array.surfaces_at(v0, v1)
    }

    /// Copy of this layer moved by `shift`.
    ///
    /// Bounds and binning are unchanged since they live in the layer frame.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFiniteTransform`] if `shift` is not finite.
    pub fn clone_with_shift(&self, shift: &Transform3) -> Result<Self> {
        if !is_finite_transform(shift) {
            return Err(GeometryError::NonFiniteTransform.into());
        }
        debug!(
            surfaces = self.surface_array.len(),
            translation = ?shift.translation.vector,
            "cloning layer with shift"
        );
        Ok(Self {
            shape: self.shape,
            placement: shift * self.placement,
            surface_array: self.surface_array.with_shift(shift),
            approach: self.approach.with_shift(shift),
        })
    }
}
