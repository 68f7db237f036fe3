use crate::error::{GeometryError, Result};

/// Settings shared by the binning engine and the layer factory.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LayerCreatorConfig {
    /// Surface positions closer than this count as one position when the bin
    /// count or boundaries are derived from the surfaces.
    pub cluster_tolerance: f64,
    /// Polygon segments per full turn when outlining curved surfaces.
    pub arc_segments: usize,
    /// Axes (x, y, z) along which the default placement moves to the centre
    /// of the surface set. Cylinder and disc layers only use z.
    pub center_of_gravity: [bool; 3],
}

impl Default for LayerCreatorConfig {
    fn default() -> Self {
        Self {
            cluster_tolerance: 1e-3,
            arc_segments: 72,
            center_of_gravity: [true, true, true],
        }
    }
}

impl LayerCreatorConfig {
    /// Checks that the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is negative or not finite, or no arc
    /// segments are requested.
    pub fn validate(&self) -> Result<()> {
        if !(self.cluster_tolerance.is_finite() && self.cluster_tolerance >= 0.0) {
            return Err(GeometryError::Degenerate(format!(
                "cluster tolerance {} must be finite and non-negative",
                self.cluster_tolerance
            ))
            .into());
        }
        if self.arc_segments < 4 {
            return Err(GeometryError::Degenerate(
                "at least four arc segments per turn are needed".into(),
            )
            .into());
        }
        Ok(())
    }
}
