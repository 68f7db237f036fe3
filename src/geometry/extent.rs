use std::f64::consts::{PI, TAU};

use crate::math::phi::{phi, phi_delta, wrap_phi};
use crate::math::radial::{perp, segment_min_perp};
use crate::math::Point3;

use super::AxisDirection;

/// Per-axis `[min, max]` ranges of a set of points.
///
/// `R` uses the closest approach of outline edges to the z-axis for its
/// minimum. `Phi` is the azimuth swept by the outline edges: a footprint
/// straddling the `+-pi` seam stays contiguous and may reach past `+-pi`, and
/// an outline going all the way round the axis spans `[-pi, pi]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extent {
    ranges: [Option<(f64, f64)>; 5],
}

impl Extent {
    /// Creates an extent that constrains no axis.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the extent of a closed outline (last vertex connects to the first).
    #[must_use]
    pub fn from_outline(outline: &[Point3]) -> Self {
        let mut extent = Self::new();
        if outline.is_empty() {
            return extent;
        }

        for (i, p) in outline.iter().enumerate() {
            extent.extend(AxisDirection::X, p.x);
            extent.extend(AxisDirection::Y, p.y);
            extent.extend(AxisDirection::Z, p.z);
            extent.extend(AxisDirection::R, perp(p));
            let next = &outline[(i + 1) % outline.len()];
            extent.extend(AxisDirection::R, segment_min_perp(p, next));
        }

        if let Some((lo, hi)) = phi_coverage(outline) {
            extent.extend(AxisDirection::Phi, lo);
            extent.extend(AxisDirection::Phi, hi);
        }

        extent
    }

    /// Widens the range along `direction` to include `value`.
    pub fn extend(&mut self, direction: AxisDirection, value: f64) {
        let slot = &mut self.ranges[direction.index()];
        *slot = Some(match *slot {
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
            None => (value, value),
        });
    }

    /// Merges another extent into this one, axis by axis.
    ///
    /// `Phi` ranges are merged numerically; callers binning in azimuth work
    /// with per-surface footprints instead.
    pub fn merge(&mut self, other: &Extent) {
        for direction in AxisDirection::ALL {
            if let Some((lo, hi)) = other.range(direction) {
                self.extend(direction, lo);
                self.extend(direction, hi);
            }
        }
    }

    /// Returns the range along `direction`, if constrained.
    #[must_use]
    pub fn range(&self, direction: AxisDirection) -> Option<(f64, f64)> {
        self.ranges[direction.index()]
    }

    /// Returns `true` if the extent has a range along `direction`.
    #[must_use]
    pub fn constrains(&self, direction: AxisDirection) -> bool {
        self.range(direction).is_some()
    }

    /// Lower limit along `direction` (`0.0` when unconstrained).
    #[must_use]
    pub fn min(&self, direction: AxisDirection) -> f64 {
        self.range(direction).map_or(0.0, |(lo, _)| lo)
    }

    /// Upper limit along `direction` (`0.0` when unconstrained).
    #[must_use]
    pub fn max(&self, direction: AxisDirection) -> f64 {
        self.range(direction).map_or(0.0, |(_, hi)| hi)
    }

    /// Width of the range along `direction`.
    #[must_use]
    pub fn interval(&self, direction: AxisDirection) -> f64 {
        self.max(direction) - self.min(direction)
    }

    /// Midpoint of the range along `direction`.
    #[must_use]
    pub fn medium(&self, direction: AxisDirection) -> f64 {
        0.5 * (self.min(direction) + self.max(direction))
    }
}

/// Vertices closer than this to the z-axis have no azimuth.
const AXIS_TOLERANCE: f64 = 1e-12;

/// Gaps in azimuth coverage narrower than this are closed.
const SWEEP_TOLERANCE: f64 = 1e-9;

/// Smallest contiguous azimuth range holding every vertex and every edge
/// sweep of a closed outline, as `(lo, hi)` with `lo` in `[-pi, pi)`.
fn phi_coverage(outline: &[Point3]) -> Option<(f64, f64)> {
    let mut sweeps: Vec<(f64, f64)> = Vec::with_capacity(2 * outline.len());
    let mut push = |from: f64, delta: f64| {
        let lo = wrap_phi(if delta < 0.0 { from + delta } else { from });
        let hi = lo + delta.abs();
        if hi > PI {
            sweeps.push((lo, PI));
            sweeps.push((-PI, hi - TAU));
        } else {
            sweeps.push((lo, hi));
        }
    };
    for (i, a) in outline.iter().enumerate() {
        if perp(a) < AXIS_TOLERANCE {
            continue;
        }
        push(phi(a), 0.0);
        let b = &outline[(i + 1) % outline.len()];
        if perp(b) >= AXIS_TOLERANCE {
            push(phi(a), phi_delta(phi(a), phi(b)));
        }
    }
    if sweeps.is_empty() {
        return None;
    }

    sweeps.sort_by(|x, y| x.0.total_cmp(&y.0));
    let mut merged: Vec<(f64, f64)> = Vec::new();
    for (lo, hi) in sweeps {
        match merged.last_mut() {
            Some(last) if lo <= last.1 + SWEEP_TOLERANCE => last.1 = last.1.max(hi),
            _ => merged.push((lo, hi)),
        }
    }

    // The widest uncovered gap, starting with the one across the seam.
    let first = merged[0];
    let last = merged[merged.len() - 1];
    let mut gap = first.0 + TAU - last.1;
    let mut range = (first.0, last.1);
    for pair in merged.windows(2) {
        let width = pair[1].0 - pair[0].1;
        if width > gap {
            gap = width;
            range = (pair[1].0, pair[0].1 + TAU);
        }
    }
    if gap <= SWEEP_TOLERANCE {
        return Some((-PI, PI));
    }
    Some(range)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn square_outline_extent() {
        let e = Extent::from_outline(&[
            p(10.0, -1.0, -5.0),
            p(10.0, 1.0, -5.0),
            p(10.0, 1.0, 5.0),
            p(10.0, -1.0, 5.0),
        ]);
        assert_relative_eq!(e.min(AxisDirection::Z), -5.0);
        assert_relative_eq!(e.max(AxisDirection::Z), 5.0);
        assert_relative_eq!(e.min(AxisDirection::R), 10.0, epsilon = 1e-12);
        assert_relative_eq!(e.max(AxisDirection::R), 101.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(e.medium(AxisDirection::Phi), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn phi_footprint_straddling_seam_is_contiguous() {
        let e = Extent::from_outline(&[
            p(-10.0, -1.0, 0.0),
            p(-10.0, 1.0, 0.0),
            p(-11.0, 1.0, 0.0),
            p(-11.0, -1.0, 0.0),
        ]);
        let (lo, hi) = e.range(AxisDirection::Phi).unwrap();
        assert!(hi - lo < 0.25, "lo={lo} hi={hi}");
        assert!(lo < PI && hi > PI, "lo={lo} hi={hi}");
    }

    #[test]
    fn merge_widens_each_axis() {
        let mut a = Extent::new();
        a.extend(AxisDirection::Z, 1.0);
        let mut b = Extent::new();
        b.extend(AxisDirection::Z, -3.0);
        b.extend(AxisDirection::R, 7.0);
        a.merge(&b);
        assert_eq!(a.range(AxisDirection::Z), Some((-3.0, 1.0)));
        assert!(a.constrains(AxisDirection::R));
        assert!(!a.constrains(AxisDirection::X));
        assert_relative_eq!(a.interval(AxisDirection::Z), 4.0);
    }
}
