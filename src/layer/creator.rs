use tracing::debug;

use crate::binning::{
    bin_cylinder, bin_disc, bin_plane, AxisSpec, BinningType, CylinderSizing, DiscSizing,
    PlaneSizing, SurfaceArray,
};
use crate::config::LayerCreatorConfig;
use crate::error::Result;
use crate::geometry::SurfaceRef;
use crate::math::Transform3;

use super::{ApproachDescriptor, Layer, LayerShape};

/// Optional inputs shared by every layer constructor.
#[derive(Debug, Clone, Default)]
pub struct LayerOptions {
    /// Placement of the layer frame. Defaults to the centre of the surfaces.
    pub placement: Option<Transform3>,
    /// Approach surfaces. Defaults to the boundary surfaces of the shape.
    pub approach: Option<ApproachDescriptor>,
}

impl LayerOptions {
    /// Options with an explicit placement.
    #[must_use]
    pub fn placed(placement: Transform3) -> Self {
        Self {
            placement: Some(placement),
            approach: None,
        }
    }
}

/// Builds cylinder, disc and plane layers from collections of surfaces.
#[derive(Debug, Clone, Default)]
pub struct LayerCreator {
    config: LayerCreatorConfig,
}

impl LayerCreator {
    /// Creates a factory with the given settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: LayerCreatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the settings.
    #[must_use]
    pub fn config(&self) -> &LayerCreatorConfig {
        &self.config
    }

    /// Builds a cylindrical layer binned in `(phi, z)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surfaces are empty, the sizing is invalid, or
    /// an axis specification is malformed. No layer is built on error.
    pub fn cylinder_layer(
        &self,
        surfaces: &[SurfaceRef],
        sizing: CylinderSizing,
        phi: AxisSpec,
        z: AxisSpec,
        options: LayerOptions,
    ) -> Result<Layer> {
        let binned = bin_cylinder(
            surfaces,
            &sizing,
            phi,
            z,
            options.placement.as_ref(),
            &self.config,
        )?;
        let shape = LayerShape::Cylinder(binned.bounds);
        debug!(
            surfaces = binned.array.len(),
            r_min = binned.bounds.r_min(),
            r_max = binned.bounds.r_max(),
            half_z = binned.bounds.half_z(),
            bins = ?binned.array.scheme().dimensions(),
            "built cylinder layer"
        );
        finish(shape, binned.placement, binned.array, options.approach)
    }

    /// Builds a disc layer binned in `(r, phi)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surfaces are empty, the sizing is invalid, or
    /// an axis specification is malformed. No layer is built on error.
    pub fn disc_layer(
        &self,
        surfaces: &[SurfaceRef],
        sizing: DiscSizing,
        r: AxisSpec,
        phi: AxisSpec,
        options: LayerOptions,
    ) -> Result<Layer> {
        let binned = bin_disc(
            surfaces,
            &sizing,
            r,
            phi,
            options.placement.as_ref(),
            &self.config,
        )?;
        let shape = LayerShape::Disc(binned.bounds);
        debug!(
            surfaces = binned.array.len(),
            r_min = binned.bounds.r_min(),
            r_max = binned.bounds.r_max(),
            z = binned.placement.translation.vector.z,
            thickness = binned.bounds.thickness(),
            bins = ?binned.array.scheme().dimensions(),
            "built disc layer"
        );
        finish(shape, binned.placement, binned.array, options.approach)
    }

    /// Builds a planar layer binned in local `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surfaces are empty, the sizing is invalid, or
    /// an axis specification is malformed. No layer is built on error.
    pub fn plane_layer(
        &self,
        surfaces: &[SurfaceRef],
        sizing: PlaneSizing,
        x: AxisSpec,
        y: AxisSpec,
        options: LayerOptions,
    ) -> Result<Layer> {
        let binned = bin_plane(
            surfaces,
            &sizing,
            x,
            y,
            options.placement.as_ref(),
            &self.config,
        )?;
        let shape = LayerShape::Plane(binned.bounds);
        debug!(
            surfaces = binned.array.len(),
            half_x = binned.bounds.half_x(),
            half_y = binned.bounds.half_y(),
            half_z = binned.bounds.half_z(),
            bins = ?binned.array.scheme().dimensions(),
            "built plane layer"
        );
        finish(shape, binned.placement, binned.array, options.approach)
    }

    /// Cylinder layer sized by envelopes with fixed bin counts.
    ///
    /// # Errors
    ///
    /// See [`LayerCreator::cylinder_layer`].
    pub fn cylinder_layer_with_bins(
        &self,
        surfaces: &[SurfaceRef],
        envelope_r: f64,
        envelope_z: f64,
        bins_phi: usize,
        bins_z: usize,
        options: LayerOptions,
    ) -> Result<Layer> {
        self.cylinder_layer(
            surfaces,
            CylinderSizing::Envelope {
                r: envelope_r,
                z: envelope_z,
            },
            AxisSpec::Bins(bins_phi),
            AxisSpec::Bins(bins_z),
            options,
        )
    }

    /// Cylinder layer with explicit bounds and bins derived from the surfaces.
    ///
    /// # Errors
    ///
    /// See [`LayerCreator::cylinder_layer`].
    #[allow(clippy::too_many_arguments)]
    pub fn cylinder_layer_with_bounds(
        &self,
        surfaces: &[SurfaceRef],
        r_min: f64,
        r_max: f64,
        half_z: f64,
        type_phi: BinningType,
        type_z: BinningType,
        options: LayerOptions,
    ) -> Result<Layer> {
        self.cylinder_layer(
            surfaces,
            CylinderSizing::Bounds {
                r_min,
                r_max,
                half_z,
            },
            AxisSpec::Auto(type_phi),
            AxisSpec::Auto(type_z),
            options,
        )
    }

    /// Cylinder layer sized by envelopes with bins derived from the surfaces.
    ///
    /// # Errors
    ///
    /// See [`LayerCreator::cylinder_layer`].
    pub fn cylinder_layer_with_envelope(
        &self,
        surfaces: &[SurfaceRef],
        envelope_r: f64,
        envelope_z: f64,
        type_phi: BinningType,
        type_z: BinningType,
        options: LayerOptions,
    ) -> Result<Layer> {
        self.cylinder_layer(
            surfaces,
            CylinderSizing::Envelope {
                r: envelope_r,
                z: envelope_z,
            },
            AxisSpec::Auto(type_phi),
            AxisSpec::Auto(type_z),
            options,
        )
    }

    /// Disc layer sized by envelopes with fixed bin counts.
    ///
    /// # Errors
    ///
    /// See [`LayerCreator::disc_layer`].
    #[allow(clippy::too_many_arguments)]
    pub fn disc_layer_with_bins(
        &self,
        surfaces: &[SurfaceRef],
        envelope_r_min: f64,
        envelope_r_max: f64,
        envelope_z: f64,
        bins_r: usize,
        bins_phi: usize,
        options: LayerOptions,
    ) -> Result<Layer> {
        self.disc_layer(
            surfaces,
            DiscSizing::Envelope {
                r_min: envelope_r_min,
                r_max: envelope_r_max,
                z: envelope_z,
            },
            AxisSpec::Bins(bins_r),
            AxisSpec::Bins(bins_phi),
            options,
        )
    }

    /// Disc layer with explicit bounds and bins derived from the surfaces.
    ///
    /// # Errors
    ///
    /// See [`LayerCreator::disc_layer`].
    #[allow(clippy::too_many_arguments)]
    pub fn disc_layer_with_bounds(
        &self,
        surfaces: &[SurfaceRef],
        z_min: f64,
        z_max: f64,
        r_min: f64,
        r_max: f64,
        type_r: BinningType,
        type_phi: BinningType,
        options: LayerOptions,
    ) -> Result<Layer> {
        self.disc_layer(
            surfaces,
            DiscSizing::Bounds {
                z_min,
                z_max,
                r_min,
                r_max,
            },
            AxisSpec::Auto(type_r),
            AxisSpec::Auto(type_phi),
            options,
        )
    }

    /// Disc layer sized by envelopes with bins derived from the surfaces.
    ///
    /// # Errors
    ///
    /// See [`LayerCreator::disc_layer`].
    #[allow(clippy::too_many_arguments)]
    pub fn disc_layer_with_envelope(
        &self,
        surfaces: &[SurfaceRef],
        envelope_r_min: f64,
        envelope_r_max: f64,
        envelope_z: f64,
        type_r: BinningType,
        type_phi: BinningType,
        options: LayerOptions,
    ) -> Result<Layer> {
        self.disc_layer(
            surfaces,
            DiscSizing::Envelope {
                r_min: envelope_r_min,
                r_max: envelope_r_max,
                z: envelope_z,
            },
            AxisSpec::Auto(type_r),
            AxisSpec::Auto(type_phi),
            options,
        )
    }

    /// Plane layer sized by envelopes with fixed bin counts.
    ///
    /// # Errors
    ///
    /// See [`LayerCreator::plane_layer`].
    pub fn plane_layer_with_bins(
        &self,
        surfaces: &[SurfaceRef],
        envelope_xy: f64,
        envelope_z: f64,
        bins_x: usize,
        bins_y: usize,
        options: LayerOptions,
    ) -> Result<Layer> {
        self.plane_layer(
            surfaces,
            PlaneSizing::Envelope {
                xy: envelope_xy,
                z: envelope_z,
            },
            AxisSpec::Bins(bins_x),
            AxisSpec::Bins(bins_y),
            options,
        )
    }

    /// Plane layer with explicit half lengths and bins derived from the
    /// surfaces.
    ///
    /// # Errors
    ///
    /// See [`LayerCreator::plane_layer`].
    #[allow(clippy::too_many_arguments)]
    pub fn plane_layer_with_bounds(
        &self,
        surfaces: &[SurfaceRef],
        half_x: f64,
        half_y: f64,
        half_z: f64,
        type_x: BinningType,
        type_y: BinningType,
        options: LayerOptions,
    ) -> Result<Layer> {
        self.plane_layer(
            surfaces,
            PlaneSizing::Bounds {
                half_x,
                half_y,
                half_z,
            },
            AxisSpec::Auto(type_x),
            AxisSpec::Auto(type_y),
            options,
        )
    }

    /// Plane layer sized by envelopes with bins derived from the surfaces.
    ///
    /// # Errors
    ///
    /// See [`LayerCreator::plane_layer`].
    pub fn plane_layer_with_envelope(
        &self,
        surfaces: &[SurfaceRef],
        envelope_xy: f64,
        envelope_z: f64,
        type_x: BinningType,
        type_y: BinningType,
        options: LayerOptions,
    ) -> Result<Layer> {
        self.plane_layer(
            surfaces,
            PlaneSizing::Envelope {
                xy: envelope_xy,
                z: envelope_z,
            },
            AxisSpec::Auto(type_x),
            AxisSpec::Auto(type_y),
            options,
        )
    }
}

fn finish(
    shape: LayerShape,
    placement: Transform3,
    array: SurfaceArray,
    approach: Option<ApproachDescriptor>,
) -> Result<Layer> {
    let approach = match approach {
        Some(approach) => approach,
        None => ApproachDescriptor::for_shape(&shape, &placement)?,
    };
    Ok(Layer::new(shape, placement, array, approach))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::geometry::{DiscSurface, PlaneSurface};
    use crate::math::{Point3, Vector3};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;
    use std::sync::Arc;

    fn ring(radius: f64) -> Vec<SurfaceRef> {
        (0..16)
            .map(|i| {
                let angle = -PI + (f64::from(i) + 0.5) * PI / 8.0;
                let radial = Vector3::new(angle.cos(), angle.sin(), 0.0);
                let surface = PlaneSurface::from_axes(
                    Point3::from(radial * radius),
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

    #[test]
    fn cylinder_with_bins_builds_default_approach() {
        let creator = LayerCreator::default();
        let layer = creator
            .cylinder_layer_with_bins(&ring(27.5), 2.0, 5.0, 16, 1, LayerOptions::default())
            .unwrap();
        let LayerShape::Cylinder(bounds) = layer.shape() else {
            panic!("expected a cylinder layer");
        };
        assert_relative_eq!(bounds.r_min(), 23.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.r_max(), 32.0, epsilon = 1e-9);
        assert_relative_eq!(layer.thickness(), 9.0, epsilon = 1e-9);
        assert_eq!(layer.approach_descriptor().surfaces().len(), 2);
    }

    #[test]
    fn cylinder_with_bounds_keeps_given_bounds() {
        let creator = LayerCreator::default();
        let layer = creator
            .cylinder_layer_with_bounds(
                &ring(27.5),
                20.0,
                40.0,
                50.0,
                BinningType::Equidistant,
                BinningType::Equidistant,
                LayerOptions::default(),
            )
            .unwrap();
        let LayerShape::Cylinder(bounds) = layer.shape() else {
            panic!("expected a cylinder layer");
        };
        assert_relative_eq!(bounds.half_z(), 50.0);
        assert_eq!(layer.surface_array().scheme().dimensions(), (16, 1));
    }

    #[test]
    fn supplied_approach_is_attached_as_is() {
        let creator = LayerCreator::default();
        let approach = ApproachDescriptor::new(Vec::new());
        let layer = creator
            .cylinder_layer_with_envelope(
                &ring(27.5),
                1.0,
                1.0,
                BinningType::Equidistant,
                BinningType::Arbitrary,
                LayerOptions {
                    placement: None,
                    approach: Some(approach),
                },
            )
            .unwrap();
        assert!(layer.approach_descriptor().surfaces().is_empty());
    }

    #[test]
    fn explicit_placement_defines_the_frame() {
        let creator = LayerCreator::default();
        let placement = Transform3::translation(0.0, 0.0, 40.0);
        let layer = creator
            .cylinder_layer_with_bins(&ring(27.5), 1.0, 1.0, 8, 2, LayerOptions::placed(placement))
            .unwrap();
        let LayerShape::Cylinder(bounds) = layer.shape() else {
            panic!("expected a cylinder layer");
        };
        // Surfaces span z in [-50, -30] of the layer frame.
        assert_relative_eq!(bounds.half_z(), 51.0, epsilon = 1e-9);
        assert_relative_eq!(layer.placement().translation.vector.z, 40.0);
    }

    #[test]
    fn empty_disc_is_rejected() {
        let creator = LayerCreator::default();
        let e = creator
            .disc_layer_with_bins(&[], 1.0, 1.0, 1.0, 2, 8, LayerOptions::default())
            .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidGeometryInput);
    }

    #[test]
    fn disc_entry_points_agree_on_binning() {
        let surfaces: Vec<SurfaceRef> = (0..4)
            .map(|i| {
                let avg = -PI + (f64::from(i) + 0.5) * PI / 2.0;
                let t = Transform3::translation(0.0, 0.0, -300.0);
                Arc::new(DiscSurface::sector(t, 10.0, 40.0, avg, PI / 4.0).unwrap()) as SurfaceRef
            })
            .collect();
        let creator = LayerCreator::default();
        let by_bins = creator
            .disc_layer_with_bins(&surfaces, 0.0, 0.0, 1.0, 1, 4, LayerOptions::default())
            .unwrap();
        let by_envelope = creator
            .disc_layer_with_envelope(
                &surfaces,
                0.0,
                0.0,
                1.0,
                BinningType::Equidistant,
                BinningType::Equidistant,
                LayerOptions::default(),
            )
            .unwrap();
        let by_bounds = creator
            .disc_layer_with_bounds(
                &surfaces,
                -301.0,
                -299.0,
                5.0,
                45.0,
                BinningType::Equidistant,
                BinningType::Equidistant,
                LayerOptions::default(),
            )
            .unwrap();
        for layer in [&by_bins, &by_envelope, &by_bounds] {
            assert_eq!(layer.surface_array().scheme().dimensions(), (1, 4));
            assert_relative_eq!(layer.placement().translation.vector.z, -300.0, epsilon = 1e-9);
            assert_relative_eq!(layer.thickness(), 2.0, epsilon = 1e-9);
            assert_eq!(layer.approach_descriptor().surfaces().len(), 2);
        }
        let hit = by_bins.surfaces_at(&Point3::new(20.0, 1.0, -300.0));
        assert_eq!(hit.len(), 1);
    }

    #[test]
    fn plane_entry_points() {
        let surfaces: Vec<SurfaceRef> = [-2.0, 0.0, 2.0]
            .into_iter()
            .map(|x| {
                let t = Transform3::translation(x, 0.0, 0.0);
                Arc::new(PlaneSurface::new(t, 0.9, 3.0).unwrap()) as SurfaceRef
            })
            .collect();
        let creator = LayerCreator::default();
        let with_bins = creator
            .plane_layer_with_bins(&surfaces, 0.1, 0.5, 3, 1, LayerOptions::default())
            .unwrap();
        assert_eq!(with_bins.surface_array().scheme().dimensions(), (3, 1));
        let with_bounds = creator
            .plane_layer_with_bounds(
                &surfaces,
                3.0,
                3.0,
                0.5,
                BinningType::Arbitrary,
                BinningType::Equidistant,
                LayerOptions::default(),
            )
            .unwrap();
        assert_eq!(
            with_bounds.surface_array().scheme().first().boundaries(),
            &[-3.0, -1.0, 1.0, 3.0]
        );
        let with_envelope = creator
            .plane_layer_with_envelope(
                &surfaces,
                0.1,
                0.5,
                BinningType::Equidistant,
                BinningType::Equidistant,
                LayerOptions::default(),
            )
            .unwrap();
        assert_relative_eq!(with_envelope.thickness(), 1.0, epsilon = 1e-9);
        assert_eq!(with_envelope.surfaces_at(&Point3::new(2.1, 0.0, 0.0)).len(), 1);
    }

    #[test]
    fn full_disc_fills_every_phi_bin() {
        let t = Transform3::translation(0.0, 0.0, 120.0);
        let surfaces: Vec<SurfaceRef> = vec![Arc::new(DiscSurface::full(t, 5.0, 50.0).unwrap())];
        let creator = LayerCreator::default();
        for bins in [72, 100] {
            let layer = creator
                .disc_layer_with_bins(&surfaces, 1.0, 1.0, 1.0, 1, bins, LayerOptions::default())
                .unwrap();
            assert_eq!(layer.surface_array().occupied_bins(), bins);
            let hit = layer.surfaces_at(&Point3::new(-30.0, -0.01, 120.0));
            assert_eq!(hit.len(), 1);
        }
    }

    #[test]
    fn plane_bounds_narrower_than_the_surface_row() {
        let surfaces: Vec<SurfaceRef> = [-2.0, 0.0, 2.0]
            .into_iter()
            .map(|x| {
                let t = Transform3::translation(x, 0.0, 0.0);
                Arc::new(PlaneSurface::new(t, 0.9, 3.0).unwrap()) as SurfaceRef
            })
            .collect();
        let creator = LayerCreator::default();
        let build = |half_x: f64| {
            creator
                .plane_layer_with_bounds(
                    &surfaces,
                    half_x,
                    3.0,
                    0.5,
                    BinningType::Arbitrary,
                    BinningType::Equidistant,
                    LayerOptions::placed(Transform3::identity()),
                )
                .unwrap()
        };
        let tight = build(1.0);
        assert_eq!(tight.surface_array().scheme().first().boundaries(), &[-1.0, 1.0]);
        let wider = build(1.5);
        assert_eq!(
            wider.surface_array().scheme().first().boundaries(),
            &[-1.5, -1.0, 1.0, 1.5]
        );
        assert_eq!(wider.surface_array().occupied_bins(), 3);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = LayerCreatorConfig {
            arc_segments: 0,
            ..LayerCreatorConfig::default()
        };
        assert!(LayerCreator::new(config).is_err());
    }
}
