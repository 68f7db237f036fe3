use std::f64::consts::PI;

use tracing::{trace, warn};

use crate::config::LayerCreatorConfig;
use crate::error::{BinningError, GeometryError, Result};
use crate::geometry::{
    AxisDirection, CylinderBounds, DiscBounds, Extent, PlaneBounds, SurfaceRef,
};
use crate::math::phi::phi;
use crate::math::radial::perp;
use crate::math::{Point3, Transform3, TOLERANCE};

use super::{BinUtility, BinningOption, BinningScheme, BinningType, SurfaceArray};

/// How one axis of a layer is binned.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisSpec {
    /// Fixed number of equidistant bins over the layer range.
    Bins(usize),
    /// Bins derived from the distinct surface positions along the axis:
    /// one equidistant bin per position, or arbitrary boundaries halfway
    /// between neighbouring positions.
    Auto(BinningType),
    /// Explicit arbitrary boundaries.
    Boundaries(Vec<f64>),
}

/// Size of a cylindrical layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CylinderSizing {
    /// Surface extent padded by `r` radially (both sides) and `z` along z.
    Envelope { r: f64, z: f64 },
    /// Explicit tube bounds in the layer frame.
    Bounds { r_min: f64, r_max: f64, half_z: f64 },
}

/// Size of a disc layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscSizing {
    /// Surface extent padded by `r_min` inwards, `r_max` outwards and `z`
    /// on both faces.
    Envelope { r_min: f64, r_max: f64, z: f64 },
    /// Explicit bounds. Without a placement the z range is global and the
    /// layer is centred on it.
    Bounds {
        z_min: f64,
        z_max: f64,
        r_min: f64,
        r_max: f64,
    },
}

/// Size of a planar layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaneSizing {
    /// Surface extent padded by `xy` in x and y, and `z` along the normal.
    Envelope { xy: f64, z: f64 },
    /// Explicit half lengths in the layer frame.
    Bounds {
        half_x: f64,
        half_y: f64,
        half_z: f64,
    },
}

/// Output of the binning engine for one layer.
#[derive(Debug, Clone)]
pub struct BinnedSurfaces<B> {
    /// Padded bounds in the layer frame.
    pub bounds: B,
    /// Placement of the layer frame.
    pub placement: Transform3,
    /// Unpadded extent of the surfaces in the layer frame.
    pub extent: Extent,
    /// Surfaces sorted into the two binning axes.
    pub array: SurfaceArray,
}

/// A surface measured in the layer frame.
struct Footprint {
    surface: SurfaceRef,
    extent: Extent,
    position: Point3,
}

/// Bins surfaces for a cylindrical layer (`phi` x `z`).
///
/// Every surface reference must describe a finite surface; this is not
/// checked.
///
/// # Errors
///
/// Returns an error if `surfaces` is empty, an envelope is negative, the
/// padded extent is degenerate, explicit bounds are inconsistent, or an axis
/// specification is invalid.
pub fn bin_cylinder(
    surfaces: &[SurfaceRef],
    sizing: &CylinderSizing,
    phi_spec: AxisSpec,
    z_spec: AxisSpec,
    placement: Option<&Transform3>,
    config: &LayerCreatorConfig,
) -> Result<BinnedSurfaces<CylinderBounds>> {
    let initial = measure(surfaces, placement, config)?;
    let placement = placement.copied().unwrap_or_else(|| {
        let cog = config.center_of_gravity;
        default_placement(&initial, [false, false, cog[2]])
    });
    let footprints = footprints(surfaces, &placement, config);
    let extent = total(&footprints);

    let bounds = match *sizing {
        CylinderSizing::Envelope { r, z } => {
            check_envelope(AxisDirection::R, r)?;
            check_envelope(AxisDirection::Z, z)?;
            let (r_min, r_max) = padded(&extent, AxisDirection::R, r, r)?;
            let half_z = symmetric_half(&extent, AxisDirection::Z, z)?;
            CylinderBounds::new(r_min.max(0.0), r_max, half_z)?
        }
        CylinderSizing::Bounds {
            r_min,
            r_max,
            half_z,
        } => {
            let bounds = CylinderBounds::new(r_min, r_max, half_z)?;
            warn_outside(&extent, AxisDirection::R, r_min, r_max);
            warn_outside(&extent, AxisDirection::Z, -half_z, half_z);
            bounds
        }
    };

    let phis: Vec<f64> = footprints.iter().map(|f| phi(&f.position)).collect();
    let zs: Vec<f64> = footprints.iter().map(|f| f.position.z).collect();
    let phi_axis = build_axis(
        AxisDirection::Phi,
        phi_spec,
        (-PI, PI),
        BinningOption::Closed,
        &phis,
        config.cluster_tolerance,
    )?;
    let z_axis = build_axis(
        AxisDirection::Z,
        z_spec,
        (-bounds.half_z(), bounds.half_z()),
        BinningOption::Open,
        &zs,
        config.cluster_tolerance,
    )?;

    let array = fill(BinningScheme::new(phi_axis, z_axis), &footprints);
    Ok(BinnedSurfaces {
        bounds,
        placement,
        extent,
        array,
    })
}

/// Bins surfaces for a disc layer (`r` x `phi`).
///
/// Every surface reference must describe a finite surface; this is not
/// checked.
///
/// # Errors
///
/// Returns an error if `surfaces` is empty, an envelope is negative, the
/// padded extent is degenerate, explicit bounds are inconsistent, or an axis
/// specification is invalid.
pub fn bin_disc(
    surfaces: &[SurfaceRef],
    sizing: &DiscSizing,
    r_spec: AxisSpec,
    phi_spec: AxisSpec,
    placement: Option<&Transform3>,
    config: &LayerCreatorConfig,
) -> Result<BinnedSurfaces<DiscBounds>> {
    let initial = measure(surfaces, placement, config)?;
    let use_z = config.center_of_gravity[2];
    let (placement, z_offset) = match (placement, sizing) {
        (Some(p), _) => (*p, 0.0),
        (None, DiscSizing::Bounds { z_min, z_max, .. }) => {
            let center = if use_z { 0.5 * (z_min + z_max) } else { 0.0 };
            (Transform3::translation(0.0, 0.0, center), center)
        }
        (None, DiscSizing::Envelope { .. }) => {
            let p = default_placement(&initial, [false, false, use_z]);
            (p, 0.0)
        }
    };
    let footprints = footprints(surfaces, &placement, config);
    let extent = total(&footprints);

    let bounds = match *sizing {
        DiscSizing::Envelope { r_min, r_max, z } => {
            check_envelope(AxisDirection::R, r_min)?;
            check_envelope(AxisDirection::R, r_max)?;
            check_envelope(AxisDirection::Z, z)?;
            let (lo, hi) = padded(&extent, AxisDirection::R, r_min, r_max)?;
            let (z_lo, z_hi) = padded(&extent, AxisDirection::Z, z, z)?;
            DiscBounds::new(lo.max(0.0), hi, z_lo, z_hi)?
        }
        DiscSizing::Bounds {
            z_min,
            z_max,
            r_min,
            r_max,
        } => {
            let bounds = DiscBounds::new(r_min, r_max, z_min - z_offset, z_max - z_offset)?;
            warn_outside(&extent, AxisDirection::R, r_min, r_max);
            warn_outside(&extent, AxisDirection::Z, bounds.z_min(), bounds.z_max());
            bounds
        }
    };

    let rs: Vec<f64> = footprints.iter().map(|f| perp(&f.position)).collect();
    let phis: Vec<f64> = footprints.iter().map(|f| phi(&f.position)).collect();
    let r_axis = build_axis(
        AxisDirection::R,
        r_spec,
        (bounds.r_min(), bounds.r_max()),
        BinningOption::Open,
        &rs,
        config.cluster_tolerance,
    )?;
    let phi_axis = build_axis(
        AxisDirection::Phi,
        phi_spec,
        (-PI, PI),
        BinningOption::Closed,
        &phis,
        config.cluster_tolerance,
    )?;

    let array = fill(BinningScheme::new(r_axis, phi_axis), &footprints);
    Ok(BinnedSurfaces {
        bounds,
        placement,
        extent,
        array,
    })
}

/// Bins surfaces for a planar layer (`x` x `y` of the layer frame).
///
/// Without a placement the layer frame is axis-aligned with the global frame.
/// Every surface reference must describe a finite surface; this is not
/// checked.
///
/// # Errors
///
/// Returns an error if `surfaces` is empty, an envelope is negative, the
/// padded extent is degenerate, explicit bounds are inconsistent, or an axis
/// specification is invalid.
pub fn bin_plane(
    surfaces: &[SurfaceRef],
    sizing: &PlaneSizing,
    x_spec: AxisSpec,
    y_spec: AxisSpec,
    placement: Option<&Transform3>,
    config: &LayerCreatorConfig,
) -> Result<BinnedSurfaces<PlaneBounds>> {
    let initial = measure(surfaces, placement, config)?;
    let placement = placement
        .copied()
        .unwrap_or_else(|| default_placement(&initial, config.center_of_gravity));
    let footprints = footprints(surfaces, &placement, config);
    let extent = total(&footprints);

    let bounds = match *sizing {
        PlaneSizing::Envelope { xy, z } => {
            check_envelope(AxisDirection::X, xy)?;
            check_envelope(AxisDirection::Z, z)?;
            PlaneBounds::new(
                symmetric_half(&extent, AxisDirection::X, xy)?,
                symmetric_half(&extent, AxisDirection::Y, xy)?,
                symmetric_half(&extent, AxisDirection::Z, z)?,
            )?
        }
        PlaneSizing::Bounds {
            half_x,
            half_y,
            half_z,
        } => {
            let bounds = PlaneBounds::new(half_x, half_y, half_z)?;
            warn_outside(&extent, AxisDirection::X, -half_x, half_x);
            warn_outside(&extent, AxisDirection::Y, -half_y, half_y);
            warn_outside(&extent, AxisDirection::Z, -half_z, half_z);
            bounds
        }
    };

    let xs: Vec<f64> = footprints.iter().map(|f| f.position.x).collect();
    let ys: Vec<f64> = footprints.iter().map(|f| f.position.y).collect();
    let x_axis = build_axis(
        AxisDirection::X,
        x_spec,
        (-bounds.half_x(), bounds.half_x()),
        BinningOption::Open,
        &xs,
        config.cluster_tolerance,
    )?;
    let y_axis = build_axis(
        AxisDirection::Y,
        y_spec,
        (-bounds.half_y(), bounds.half_y()),
        BinningOption::Open,
        &ys,
        config.cluster_tolerance,
    )?;

    let array = fill(BinningScheme::new(x_axis, y_axis), &footprints);
    Ok(BinnedSurfaces {
        bounds,
        placement,
        extent,
        array,
    })
}

/// Extent of the surfaces in the frame of `placement` (global without one).
fn measure(
    surfaces: &[SurfaceRef],
    placement: Option<&Transform3>,
    config: &LayerCreatorConfig,
) -> Result<Extent> {
    if surfaces.is_empty() {
        return Err(GeometryError::EmptySurfaceSet.into());
    }
    let frame = placement.copied().unwrap_or_else(Transform3::identity);
    Ok(total(&footprints(surfaces, &frame, config)))
}

fn footprints(
    surfaces: &[SurfaceRef],
    placement: &Transform3,
    config: &LayerCreatorConfig,
) -> Vec<Footprint> {
    let to_local = placement.inverse();
    surfaces
        .iter()
        .map(|surface| {
            let outline: Vec<Point3> = surface
                .polyhedron(config.arc_segments)
                .iter()
                .map(|p| to_local * p)
                .collect();
            Footprint {
                surface: surface.clone(),
                extent: Extent::from_outline(&outline),
                position: to_local * surface.binning_position(),
            }
        })
        .collect()
}

fn total(footprints: &[Footprint]) -> Extent {
    let mut extent = Extent::new();
    for footprint in footprints {
        extent.merge(&footprint.extent);
    }
    extent
}

/// Identity frame moved to the centre of `extent` along the selected axes.
fn default_placement(extent: &Extent, axes: [bool; 3]) -> Transform3 {
    let centre = |use_axis: bool, direction| {
        if use_axis {
            extent.medium(direction)
        } else {
            0.0
        }
    };
    Transform3::translation(
        centre(axes[0], AxisDirection::X),
        centre(axes[1], AxisDirection::Y),
        centre(axes[2], AxisDirection::Z),
    )
}

fn check_envelope(axis: AxisDirection, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GeometryError::NegativeEnvelope { axis, value }.into())
    }
}

/// Extent along `direction` widened by `below` and `above`.
fn padded(
    extent: &Extent,
    direction: AxisDirection,
    below: f64,
    above: f64,
) -> Result<(f64, f64)> {
    let lo = extent.min(direction) - below;
    let hi = extent.max(direction) + above;
    if hi - lo > TOLERANCE {
        Ok((lo, hi))
    } else {
        Err(GeometryError::Degenerate(format!("padded {direction} extent has zero width")).into())
    }
}

/// Half length of the smallest range symmetric about zero that holds the
/// extent along `direction`, plus `envelope`.
fn symmetric_half(extent: &Extent, direction: AxisDirection, envelope: f64) -> Result<f64> {
    let (lo, hi) = padded(extent, direction, envelope, envelope)?;
    Ok(lo.abs().max(hi.abs()))
}

fn warn_outside(extent: &Extent, direction: AxisDirection, min: f64, max: f64) {
    let (lo, hi) = (extent.min(direction), extent.max(direction));
    if lo < min - TOLERANCE || hi > max + TOLERANCE {
        warn!(
            axis = %direction,
            surfaces_min = lo,
            surfaces_max = hi,
            bounds_min = min,
            bounds_max = max,
            "surfaces reach outside explicit layer bounds"
        );
    }
}

fn build_axis(
    direction: AxisDirection,
    spec: AxisSpec,
    range: (f64, f64),
    option: BinningOption,
    positions: &[f64],
    tolerance: f64,
) -> Result<BinUtility> {
    let period = match option {
        BinningOption::Closed => Some(range.1 - range.0),
        BinningOption::Open => None,
    };
    let axis = match spec {
        AxisSpec::Bins(bins) => BinUtility::equidistant(direction, bins, range.0, range.1, option)?,
        AxisSpec::Boundaries(boundaries) => {
            let axis = BinUtility::arbitrary(direction, boundaries, option)?;
            if let Some(period) = period {
                let span = axis.max() - axis.min();
                if (span - period).abs() > TOLERANCE {
                    return Err(BinningError::PeriodMismatch {
                        axis: direction,
                        period,
                        span,
                    }
                    .into());
                }
            }
            axis
        }
        AxisSpec::Auto(BinningType::Equidistant) => {
            let bins = distinct_positions(positions, tolerance, period).len();
            BinUtility::equidistant(direction, bins, range.0, range.1, option)?
        }
        AxisSpec::Auto(BinningType::Arbitrary) => {
            let centres = distinct_positions(positions, tolerance, period);
            let mut boundaries = Vec::with_capacity(centres.len() + 1);
            boundaries.push(range.0);
            // Explicit bounds may leave positions outside the range.
            boundaries.extend(
                centres
                    .windows(2)
                    .map(|w| 0.5 * (w[0] + w[1]))
                    .filter(|m| *m > range.0 + TOLERANCE && *m < range.1 - TOLERANCE),
            );
            boundaries.push(range.1);
            BinUtility::arbitrary(direction, boundaries, option)?
        }
    };
    trace!(
        axis = %direction,
        bins = axis.bins(),
        binning_type = ?axis.binning_type(),
        min = axis.min(),
        max = axis.max(),
        "built binning axis"
    );
    Ok(axis)
}

/// Sorted representatives of the position clusters.
///
/// Values closer than `tolerance` to their neighbour join its cluster. On a
/// periodic axis a last cluster that meets the first across the seam is
/// folded into it.
fn distinct_positions(positions: &[f64], tolerance: f64, period: Option<f64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = positions.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    let mut clusters: Vec<Cluster> = Vec::new();
    for value in sorted {
        match clusters.last_mut() {
            Some(cluster) if value - cluster.last <= tolerance => cluster.push(value),
            _ => clusters.push(Cluster::new(value)),
        }
    }

    if let Some(period) = period {
        if clusters.len() > 1 {
            let first = clusters[0].first;
            let last = clusters[clusters.len() - 1].last;
            if first + period - last <= tolerance {
                clusters.pop();
            }
        }
    }
    clusters.iter().map(Cluster::centre).collect()
}

struct Cluster {
    sum: f64,
    count: usize,
    first: f64,
    last: f64,
}

impl Cluster {
    fn new(value: f64) -> Self {
        Self {
            sum: value,
            count: 1,
            first: value,
            last: value,
        }
    }

    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.last = value;
    }

    fn centre(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let count = self.count as f64;
        self.sum / count
    }
}

/// Assigns every footprint to the bins it overlaps.
fn fill(scheme: BinningScheme, footprints: &[Footprint]) -> SurfaceArray {
    let (d0, d1) = (scheme.first().direction(), scheme.second().direction());
    let mut array = SurfaceArray::new(scheme);
    for footprint in footprints {
        let bins0 = footprint_bins(array.scheme().first(), footprint, d0);
        let bins1 = footprint_bins(array.scheme().second(), footprint, d1);
        array.insert(footprint.surface.clone(), &bins0, &bins1);
    }
    array
}

fn footprint_bins(axis: &BinUtility, footprint: &Footprint, direction: AxisDirection) -> Vec<usize> {
    match footprint.extent.range(direction) {
        Some((lo, hi)) => axis.bins_overlapping(lo, hi),
        None => vec![axis.bin(coordinate(&footprint.position, direction))],
    }
}

fn coordinate(point: &Point3, direction: AxisDirection) -> f64 {
    match direction {
        AxisDirection::X => point.x,
        AxisDirection::Y => point.y,
        AxisDirection::Z => point.z,
        AxisDirection::R => perp(point),
        AxisDirection::Phi => phi(point),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::geometry::{CylinderSurface, DiscSurface, PlaneSurface};
    use crate::math::Vector3;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    /// Sixteen radial modules at r = 27.5, centred in the sixteen phi bins.
    fn ring() -> Vec<SurfaceRef> {
        (0..16)
            .map(|i| {
                let angle = -PI + (f64::from(i) + 0.5) * PI / 8.0;
                let radial = Vector3::new(angle.cos(), angle.sin(), 0.0);
                let surface = PlaneSurface::from_axes(
                    Point3::from(radial * 27.5),
                    radial,
                    Vector3::z(),
                    2.5,
                    10.0,
                )
                .unwrap();
                Arc::new(surface) as SurfaceRef
            })
            .collect()
    }

    fn config() -> LayerCreatorConfig {
        LayerCreatorConfig::default()
    }

    #[test]
    fn ring_fills_one_phi_bin_per_module() {
        let binned = bin_cylinder(
            &ring(),
            &CylinderSizing::Envelope { r: 2.0, z: 5.0 },
            AxisSpec::Bins(16),
            AxisSpec::Bins(1),
            None,
            &config(),
        )
        .unwrap();
        assert_relative_eq!(binned.bounds.r_min(), 23.0, epsilon = 1e-9);
        assert_relative_eq!(binned.bounds.r_max(), 32.0, epsilon = 1e-9);
        assert_relative_eq!(binned.bounds.half_z(), 15.0, epsilon = 1e-9);
        assert_eq!(binned.array.len(), 16);
        assert_eq!(binned.array.scheme().dimensions(), (16, 1));
        for b in 0..16 {
            assert_eq!(binned.array.bin_content(b, 0).len(), 1, "bin {b}");
        }
    }

    #[test]
    fn automatic_bin_count_follows_distinct_positions() {
        let binned = bin_cylinder(
            &ring(),
            &CylinderSizing::Envelope { r: 1.0, z: 1.0 },
            AxisSpec::Auto(BinningType::Equidistant),
            AxisSpec::Auto(BinningType::Equidistant),
            None,
            &config(),
        )
        .unwrap();
        assert_eq!(binned.array.scheme().dimensions(), (16, 1));
    }

    #[test]
    fn arbitrary_auto_boundaries_split_between_positions() {
        let surfaces: Vec<SurfaceRef> = [-20.0, 0.0, 30.0]
            .into_iter()
            .map(|z| {
                let t = Transform3::translation(0.0, 0.0, z);
                Arc::new(CylinderSurface::new(t, 50.0, 5.0).unwrap()) as SurfaceRef
            })
            .collect();
        let binned = bin_cylinder(
            &surfaces,
            &CylinderSizing::Envelope { r: 1.0, z: 0.0 },
            AxisSpec::Bins(1),
            AxisSpec::Auto(BinningType::Arbitrary),
            Some(&Transform3::identity()),
            &config(),
        )
        .unwrap();
        let z_axis = binned.array.scheme().second();
        assert_eq!(z_axis.binning_type(), BinningType::Arbitrary);
        assert_eq!(z_axis.boundaries(), &[-35.0, -10.0, 15.0, 35.0]);
        assert_eq!(binned.array.occupied_bins(), 3);
    }

    #[test]
    fn default_placement_centres_cylinder_in_z() {
        let surfaces: Vec<SurfaceRef> = vec![Arc::new(
            CylinderSurface::new(Transform3::translation(0.0, 0.0, 100.0), 10.0, 20.0).unwrap(),
        )];
        let binned = bin_cylinder(
            &surfaces,
            &CylinderSizing::Envelope { r: 1.0, z: 1.0 },
            AxisSpec::Bins(4),
            AxisSpec::Bins(2),
            None,
            &config(),
        )
        .unwrap();
        assert_relative_eq!(binned.placement.translation.vector.z, 100.0, epsilon = 1e-9);
        assert_relative_eq!(binned.bounds.half_z(), 21.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_surface_set_is_rejected() {
        let e = bin_disc(
            &[],
            &DiscSizing::Envelope {
                r_min: 1.0,
                r_max: 1.0,
                z: 1.0,
            },
            AxisSpec::Bins(2),
            AxisSpec::Bins(4),
            None,
            &config(),
        )
        .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidGeometryInput);
    }

    #[test]
    fn negative_envelope_is_rejected() {
        let e = bin_cylinder(
            &ring(),
            &CylinderSizing::Envelope { r: -1.0, z: 1.0 },
            AxisSpec::Bins(4),
            AxisSpec::Bins(1),
            None,
            &config(),
        )
        .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidGeometryInput);
    }

    #[test]
    fn bad_boundaries_are_a_binning_error() {
        let e = bin_cylinder(
            &ring(),
            &CylinderSizing::Envelope { r: 1.0, z: 1.0 },
            AxisSpec::Bins(4),
            AxisSpec::Boundaries(vec![-5.0, 0.0, 0.0, 5.0]),
            None,
            &config(),
        )
        .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidBinningSpec);
    }

    #[test]
    fn disc_sectors_bin_in_r_and_phi() {
        let z = Transform3::translation(0.0, 0.0, 250.0);
        let mut surfaces: Vec<SurfaceRef> = Vec::new();
        for i in 0..8 {
            let avg = -PI + (f64::from(i) + 0.5) * PI / 4.0;
            for (r_min, r_max) in [(10.0, 20.0), (20.0, 30.0)] {
                let s = DiscSurface::sector(z, r_min, r_max, avg, PI / 8.0).unwrap();
                surfaces.push(Arc::new(s));
            }
        }
        let binned = bin_disc(
            &surfaces,
            &DiscSizing::Envelope {
                r_min: 0.0,
                r_max: 0.0,
                z: 2.0,
            },
            AxisSpec::Auto(BinningType::Arbitrary),
            AxisSpec::Auto(BinningType::Equidistant),
            None,
            &config(),
        )
        .unwrap();
        assert_eq!(binned.array.scheme().dimensions(), (2, 8));
        assert_relative_eq!(binned.placement.translation.vector.z, 250.0, epsilon = 1e-9);
        assert_relative_eq!(binned.bounds.z_min(), -2.0, epsilon = 1e-9);
        assert_relative_eq!(binned.bounds.z_max(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(binned.bounds.r_max(), 30.0, epsilon = 1e-9);
        for b1 in 0..8 {
            assert_eq!(binned.array.bin_content(0, b1).len(), 1);
            assert_eq!(binned.array.bin_content(1, b1).len(), 1);
        }
    }

    #[test]
    fn disc_bounds_without_placement_are_centred() {
        let surfaces: Vec<SurfaceRef> = vec![Arc::new(
            DiscSurface::full(Transform3::translation(0.0, 0.0, 101.0), 5.0, 50.0).unwrap(),
        )];
        let binned = bin_disc(
            &surfaces,
            &DiscSizing::Bounds {
                z_min: 100.0,
                z_max: 104.0,
                r_min: 0.0,
                r_max: 60.0,
            },
            AxisSpec::Bins(3),
            AxisSpec::Bins(1),
            None,
            &config(),
        )
        .unwrap();
        assert_relative_eq!(binned.placement.translation.vector.z, 102.0, epsilon = 1e-9);
        assert_relative_eq!(binned.bounds.z_min(), -2.0, epsilon = 1e-9);
        assert_relative_eq!(binned.bounds.thickness(), 4.0, epsilon = 1e-9);
        assert_eq!(binned.array.scheme().first().boundaries(), &[0.0, 20.0, 40.0, 60.0]);
    }

    #[test]
    fn plane_layer_is_sized_symmetrically() {
        let surfaces: Vec<SurfaceRef> = [(-3.0, 0.0), (3.0, 0.0), (-3.0, 4.0), (3.0, 4.0)]
            .into_iter()
            .map(|(x, y)| {
                let t = Transform3::translation(x, y, 7.0);
                Arc::new(PlaneSurface::new(t, 1.0, 1.0).unwrap()) as SurfaceRef
            })
            .collect();
        let binned = bin_plane(
            &surfaces,
            &PlaneSizing::Envelope { xy: 0.5, z: 0.25 },
            AxisSpec::Auto(BinningType::Equidistant),
            AxisSpec::Auto(BinningType::Equidistant),
            None,
            &config(),
        )
        .unwrap();
        let centre = binned.placement.translation.vector;
        assert_relative_eq!(centre.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(centre.y, 2.0, epsilon = 1e-9);
        assert_relative_eq!(centre.z, 7.0, epsilon = 1e-9);
        assert_relative_eq!(binned.bounds.half_x(), 4.5, epsilon = 1e-9);
        assert_relative_eq!(binned.bounds.half_y(), 3.5, epsilon = 1e-9);
        assert_relative_eq!(binned.bounds.half_z(), 0.25, epsilon = 1e-9);
        assert_eq!(binned.array.scheme().dimensions(), (2, 2));
        assert_eq!(binned.array.occupied_bins(), 4);
    }

    #[test]
    fn clustering_folds_across_the_seam() {
        let positions = [-PI + 1e-4, 0.0, PI - 1e-4];
        assert_eq!(distinct_positions(&positions, 1e-3, Some(2.0 * PI)).len(), 2);
        assert_eq!(distinct_positions(&positions, 1e-3, None).len(), 3);
        assert_eq!(distinct_positions(&[1.0, 1.0005, 1.001], 1e-3, None).len(), 1);
    }

    fn sectors_at(phis: &[f64]) -> Vec<SurfaceRef> {
        phis.iter()
            .map(|&avg| {
                let t = Transform3::translation(0.0, 0.0, 40.0);
                Arc::new(DiscSurface::sector(t, 10.0, 20.0, avg, 0.1).unwrap()) as SurfaceRef
            })
            .collect()
    }

    fn disc_envelope() -> DiscSizing {
        DiscSizing::Envelope {
            r_min: 1.0,
            r_max: 1.0,
            z: 1.0,
        }
    }

    #[test]
    fn closed_boundaries_must_span_the_period() {
        let e = bin_disc(
            &sectors_at(&[3.0, -1.0]),
            &disc_envelope(),
            AxisSpec::Bins(1),
            AxisSpec::Boundaries(vec![-1.0, 0.0, 1.0]),
            None,
            &config(),
        )
        .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidBinningSpec);
    }

    #[test]
    fn closed_boundaries_may_start_anywhere() {
        let surfaces = sectors_at(&[3.0, -1.0]);
        let binned = bin_disc(
            &surfaces,
            &disc_envelope(),
            AxisSpec::Bins(1),
            AxisSpec::Boundaries(vec![0.0, PI, 2.0 * PI]),
            None,
            &config(),
        )
        .unwrap();
        let at = |b1: usize| {
            let ids = binned.array.bin_content(0, b1);
            assert_eq!(ids.len(), 1, "bin {b1}");
            binned.array.surface(ids[0]).unwrap().clone()
        };
        assert!(Arc::ptr_eq(&at(0), &surfaces[0]));
        assert!(Arc::ptr_eq(&at(1), &surfaces[1]));
    }

    #[test]
    fn arbitrary_auto_boundaries_stay_inside_explicit_bounds() {
        let surfaces: Vec<SurfaceRef> = [-20.0, 0.0, 30.0]
            .into_iter()
            .map(|z| {
                let t = Transform3::translation(0.0, 0.0, z);
                Arc::new(CylinderSurface::new(t, 50.0, 5.0).unwrap()) as SurfaceRef
            })
            .collect();
        let binned = bin_cylinder(
            &surfaces,
            &CylinderSizing::Bounds {
                r_min: 45.0,
                r_max: 55.0,
                half_z: 12.0,
            },
            AxisSpec::Bins(1),
            AxisSpec::Auto(BinningType::Arbitrary),
            Some(&Transform3::identity()),
            &config(),
        )
        .unwrap();
        assert_eq!(binned.array.scheme().second().boundaries(), &[-12.0, -10.0, 12.0]);
    }

    #[test]
    fn full_cylinder_fills_every_phi_bin() {
        let surfaces: Vec<SurfaceRef> =
            vec![Arc::new(CylinderSurface::new(Transform3::identity(), 30.0, 100.0).unwrap())];
        for bins in [64, 72, 100] {
            let binned = bin_cylinder(
                &surfaces,
                &CylinderSizing::Envelope { r: 1.0, z: 1.0 },
                AxisSpec::Bins(bins),
                AxisSpec::Bins(1),
                None,
                &config(),
            )
            .unwrap();
            assert_eq!(binned.array.occupied_bins(), bins);
        }
    }
}
