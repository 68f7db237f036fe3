//! Tracking volumes and independently transformable detached volumes.

mod detached;
mod tracking;

pub use detached::DetachedTrackingVolume;
pub use tracking::TrackingVolume;

/// Detector-region tag of a volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometrySignature {
    /// Whole detector.
    Global,
    /// Inner detector.
    Id,
    /// Beam pipe.
    BeamPipe,
    /// Calorimeter.
    Calo,
    /// Muon spectrometer.
    MuonSpectrometer,
    /// Cavern around the detector.
    Cavern,
    /// Not yet signed.
    #[default]
    Unsigned,
}

/// Navigation role of a volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryType {
    /// Volume with confined layers.
    #[default]
    Static,
    /// Homogeneous material without layers.
    Dense,
    /// Dense volume that still confines layers.
    DenseWithLayers,
    /// Volume that moves independently of its surroundings.
    Detached,
    /// Top-level container.
    Master,
}

/// Bounds of a tracking volume in its local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VolumeBounds {
    /// Tube around the local z-axis.
    Cylinder { r_min: f64, r_max: f64, half_z: f64 },
    /// Box centred on the origin.
    Cuboid {
        half_x: f64,
        half_y: f64,
        half_z: f64,
    },
}
