use crate::error::{BinningError, GeometryError, Result};
use crate::geometry::AxisDirection;

/// Footprints touching a bin boundary closer than this do not overlap it.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// How an axis range is partitioned into bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinningType {
    /// Equal-width bins.
    Equidistant,
    /// Explicit, strictly increasing boundaries.
    Arbitrary,
}

/// Behaviour at the ends of the axis range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinningOption {
    /// Values outside the range fall into the first or last bin.
    Open,
    /// The range is periodic (azimuth); values wrap around.
    Closed,
}

/// One binning axis: direction, type, end behaviour, and boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct BinUtility {
    direction: AxisDirection,
    binning_type: BinningType,
    option: BinningOption,
    boundaries: Vec<f64>,
}

impl BinUtility {
    /// Creates `bins` equal-width bins over `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`BinningError::ZeroBins`] if `bins` is zero, or
    /// [`GeometryError::InvalidBounds`] if the range is empty or not finite.
    pub fn equidistant(
        direction: AxisDirection,
        bins: usize,
        min: f64,
        max: f64,
        option: BinningOption,
    ) -> Result<Self> {
        if bins == 0 {
            return Err(BinningError::ZeroBins { axis: direction }.into());
        }
        if !(min.is_finite() && max.is_finite() && max - min > BOUNDARY_TOLERANCE) {
            return Err(GeometryError::InvalidBounds {
                what: "bin range",
                min,
                max,
            }
            .into());
        }
        #[allow(clippy::cast_precision_loss)]
        let width = (max - min) / bins as f64;
        #[allow(clippy::cast_precision_loss)]
        let mut boundaries: Vec<f64> = (0..bins).map(|i| min + width * i as f64).collect();
        boundaries.push(max);
        Ok(Self {
            direction,
            binning_type: BinningType::Equidistant,
            option,
            boundaries,
        })
    }

    /// Creates bins from explicit boundaries.
    ///
    /// # Errors
    ///
    /// Returns a [`BinningError`] if fewer than two boundaries are given, a
    /// boundary is not finite, or the sequence is not strictly increasing.
    pub fn arbitrary(
        direction: AxisDirection,
        boundaries: Vec<f64>,
        option: BinningOption,
    ) -> Result<Self> {
        if boundaries.len() < 2 {
            return Err(BinningError::TooFewBoundaries {
                axis: direction,
                count: boundaries.len(),
            }
            .into());
        }
        if let Some(index) = boundaries.iter().position(|b| !b.is_finite()) {
            return Err(BinningError::NonFiniteBoundary {
                axis: direction,
                index,
            }
            .into());
        }
        if let Some(index) = boundaries.windows(2).position(|w| w[1] <= w[0]) {
            return Err(BinningError::NonIncreasingBoundaries {
                axis: direction,
                index: index + 1,
            }
            .into());
        }
        Ok(Self {
            direction,
            binning_type: BinningType::Arbitrary,
            option,
            boundaries,
        })
    }

    /// Returns the axis direction.
    #[must_use]
    pub fn direction(&self) -> AxisDirection {
        self.direction
    }

    /// Returns the binning type.
    #[must_use]
    pub fn binning_type(&self) -> BinningType {
        self.binning_type
    }

    /// Returns the end behaviour.
    #[must_use]
    pub fn option(&self) -> BinningOption {
        self.option
    }

    /// Returns the bin boundaries (`bins() + 1` values).
    #[must_use]
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Returns the number of bins.
    #[must_use]
    pub fn bins(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Returns the lower end of the range.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.boundaries[0]
    }

    /// Returns the upper end of the range.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// Returns the width of bin `index`, or `None` if out of range.
    #[must_use]
    pub fn width(&self, index: usize) -> Option<f64> {
        let lo = self.boundaries.get(index)?;
        let hi = self.boundaries.get(index + 1)?;
        Some(hi - lo)
    }

    /// Returns the centre of bin `index`, or `None` if out of range.
    #[must_use]
    pub fn center(&self, index: usize) -> Option<f64> {
        let lo = self.boundaries.get(index)?;
        let hi = self.boundaries.get(index + 1)?;
        Some(0.5 * (lo + hi))
    }

    /// Maps a value to its bin.
    ///
    /// Open axes clip to `[0, bins - 1]`; closed axes wrap the value into the
    /// range first.
    #[must_use]
    pub fn bin(&self, value: f64) -> usize {
        let value = match self.option {
            BinningOption::Open => value,
            BinningOption::Closed => self.wrap(value),
        };
        let last = self.bins() - 1;
        match self.binning_type {
            BinningType::Equidistant => {
                #[allow(clippy::cast_precision_loss)]
                let width = (self.max() - self.min()) / (last + 1) as f64;
                let raw = ((value - self.min()) / width).floor();
                if raw.is_nan() || raw < 0.0 {
                    0
                } else {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let index = raw as usize;
                    index.min(last)
                }
            }
            BinningType::Arbitrary => self
                .boundaries
                .partition_point(|&b| b <= value)
                .saturating_sub(1)
                .min(last),
        }
    }

    /// Returns every bin the interval `[lo, hi]` overlaps, in axis order
    /// starting from the bin containing `lo`.
    ///
    /// Contact with a boundary within tolerance is not overlap. On a closed
    /// axis the interval wraps, and an interval spanning the whole period
    /// overlaps all bins.
    #[must_use]
    pub fn bins_overlapping(&self, lo: f64, hi: f64) -> Vec<usize> {
        let (lo, hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
        if self.option == BinningOption::Closed
            && hi - lo >= self.max() - self.min() - BOUNDARY_TOLERANCE
        {
            return (0..self.bins()).collect();
        }
        let (lo, hi) = if hi - lo > 2.0 * BOUNDARY_TOLERANCE {
            (lo + BOUNDARY_TOLERANCE, hi - BOUNDARY_TOLERANCE)
        } else {
            let mid = 0.5 * (lo + hi);
            (mid, mid)
        };

        match self.option {
            BinningOption::Open => (self.bin(lo)..=self.bin(hi)).collect(),
            BinningOption::Closed => {
                let period = self.max() - self.min();
                let count = self.bins();
                if hi - lo >= period {
                    return (0..count).collect();
                }
                let first = self.bin(lo);
                let last = self.bin(hi);
                let mut bins = vec![first];
                let mut current = first;
                // A footprint may start and end in the same bin after going
                // once around when it is nearly a full period wide.
                let wraps_fully = first == last && self.wrap(hi) < self.wrap(lo);
                while current != last || (wraps_fully && bins.len() == 1) {
                    current = (current + 1) % count;
                    if current == first {
                        break;
                    }
                    bins.push(current);
                }
                bins
            }
        }
    }

    fn wrap(&self, value: f64) -> f64 {
        let period = self.max() - self.min();
        self.min() + (value - self.min()).rem_euclid(period)
    }
}
