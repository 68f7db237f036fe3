//! Two-dimensional binning of surfaces.

mod bin_utility;
mod engine;
mod surface_array;

pub use bin_utility::{BinUtility, BinningOption, BinningType};
pub use engine::{
    bin_cylinder, bin_disc, bin_plane, AxisSpec, BinnedSurfaces, CylinderSizing, DiscSizing,
    PlaneSizing,
};
pub use surface_array::{BinningScheme, SurfaceArray, SurfaceId};
