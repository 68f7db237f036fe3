pub mod bounds;
pub mod extent;
pub mod surface;

use std::fmt;

pub use bounds::{CylinderBounds, DiscBounds, PlaneBounds};
pub use extent::Extent;
pub use surface::{CylinderSurface, DiscSurface, PlaneSurface, Surface, SurfaceKind, SurfaceRef};

/// Coordinate along which extents are measured and surfaces are binned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisDirection {
    /// Cartesian x.
    X,
    /// Cartesian y.
    Y,
    /// Cartesian z (the beam axis).
    Z,
    /// Transverse distance from the z-axis.
    R,
    /// Azimuthal angle around the z-axis.
    Phi,
}

impl AxisDirection {
    /// All directions, in storage order.
    pub const ALL: [Self; 5] = [Self::X, Self::Y, Self::Z, Self::R, Self::Phi];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
            Self::R => 3,
            Self::Phi => 4,
        }
    }
}

impl fmt::Display for AxisDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::R => "r",
            Self::Phi => "phi",
        };
        f.write_str(name)
    }
}
