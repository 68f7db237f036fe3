use crate::error::{GeometryError, Result};
use crate::math::TOLERANCE;

fn ordered(what: &'static str, min: f64, max: f64) -> Result<()> {
    if min.is_finite() && max.is_finite() && max - min > TOLERANCE {
        Ok(())
    } else {
        Err(GeometryError::InvalidBounds { what, min, max }.into())
    }
}

fn non_negative_radius(what: &'static str, r_min: f64, r_max: f64) -> Result<()> {
    if r_min < 0.0 {
        return Err(GeometryError::InvalidBounds {
            what,
            min: r_min,
            max: r_max,
        }
        .into());
    }
    ordered(what, r_min, r_max)
}

/// Bounds of a cylindrical layer: a tube symmetric about its placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderBounds {
    r_min: f64,
    r_max: f64,
    half_z: f64,
}

impl CylinderBounds {
    /// Creates tube bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidBounds`] unless
    /// `0 <= r_min < r_max` and `half_z > 0`.
    pub fn new(r_min: f64, r_max: f64, half_z: f64) -> Result<Self> {
        non_negative_radius("cylinder radial", r_min, r_max)?;
        ordered("cylinder z", -half_z, half_z)?;
        Ok(Self {
            r_min,
            r_max,
            half_z,
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

    /// Returns the half length along z.
    #[must_use]
    pub fn half_z(&self) -> f64 {
        self.half_z
    }

    /// Returns the radial thickness.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.r_max - self.r_min
    }
}

/// Bounds of a disc layer: an annulus with a z extent in the layer frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscBounds {
    r_min: f64,
    r_max: f64,
    z_min: f64,
    z_max: f64,
}

impl DiscBounds {
    /// Creates annulus bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidBounds`] unless
    /// `0 <= r_min < r_max` and `z_min < z_max`.
    pub fn new(r_min: f64, r_max: f64, z_min: f64, z_max: f64) -> Result<Self> {
        non_negative_radius("disc radial", r_min, r_max)?;
        ordered("disc z", z_min, z_max)?;
        Ok(Self {
            r_min,
            r_max,
            z_min,
            z_max,
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

    /// Returns the lower z limit in the layer frame.
    #[must_use]
    pub fn z_min(&self) -> f64 {
        self.z_min
    }

    /// Returns the upper z limit in the layer frame.
    #[must_use]
    pub fn z_max(&self) -> f64 {
        self.z_max
    }

    /// Returns the extent along z.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.z_max - self.z_min
    }
}

/// Bounds of a planar layer: a box symmetric about its placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneBounds {
    half_x: f64,
    half_y: f64,
    half_z: f64,
}

impl PlaneBounds {
    /// Creates box bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidBounds`] unless every half length is
    /// positive.
    pub fn new(half_x: f64, half_y: f64, half_z: f64) -> Result<Self> {
        ordered("plane x", -half_x, half_x)?;
        ordered("plane y", -half_y, half_y)?;
        ordered("plane z", -half_z, half_z)?;
        Ok(Self {
            half_x,
            half_y,
            half_z,
        })
    }

    /// Returns the half length along local x.
    #[must_use]
    pub fn half_x(&self) -> f64 {
        self.half_x
    }

    /// Returns the half length along local y.
    #[must_use]
    pub fn half_y(&self) -> f64 {
        self.half_y
    }

    /// Returns the half length along local z.
    #[must_use]
    pub fn half_z(&self) -> f64 {
        self.half_z
    }

    /// Returns the extent along local z.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        2.0 * self.half_z
    }
}
