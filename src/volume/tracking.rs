use std::sync::Arc;

use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::layer::Layer;
use crate::math::{is_finite_transform, Transform3};

use super::{GeometrySignature, GeometryType, VolumeBounds};

/// A region of the detector confining layers and sub-volumes.
///
/// Children are shared: cloning a volume copies only the handles.
#[derive(Debug, Clone)]
pub struct TrackingVolume {
    name: String,
    placement: Transform3,
    bounds: VolumeBounds,
    layers: Vec<Arc<Layer>>,
    volumes: Vec<Arc<TrackingVolume>>,
    signature: GeometrySignature,
    geometry_type: GeometryType,
}

impl TrackingVolume {
    /// Creates an empty volume.
    ///
    /// # Errors
    ///
    /// Returns an error if `placement` is not finite.
    pub fn new(name: impl Into<String>, placement: Transform3, bounds: VolumeBounds) -> Result<Self> {
        if !is_finite_transform(&placement) {
            return Err(GeometryError::NonFiniteTransform.into());
        }
        Ok(Self {
            name: name.into(),
            placement,
            bounds,
            layers: Vec::new(),
            volumes: Vec::new(),
            signature: GeometrySignature::default(),
            geometry_type: GeometryType::default(),
        })
    }

    /// Adds confined layers.
    #[must_use]
    pub fn with_layers(mut self, layers: impl IntoIterator<Item = Arc<Layer>>) -> Self {
        self.layers.extend(layers);
        self
    }

    /// Adds confined sub-volumes.
    #[must_use]
    pub fn with_volumes(mut self, volumes: impl IntoIterator<Item = Arc<TrackingVolume>>) -> Self {
        self.volumes.extend(volumes);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn placement(&self) -> &Transform3 {
        &self.placement
    }

    #[must_use]
    pub fn bounds(&self) -> &VolumeBounds {
        &self.bounds
    }

    #[must_use]
    pub fn layers(&self) -> &[Arc<Layer>] {
        &self.layers
    }

    #[must_use]
    pub fn volumes(&self) -> &[Arc<TrackingVolume>] {
        &self.volumes
    }

    #[must_use]
    pub fn geometry_signature(&self) -> GeometrySignature {
        self.signature
    }

    #[must_use]
    pub fn geometry_type(&self) -> GeometryType {
        self.geometry_type
    }

    /// Copy of this volume and everything it confines moved by `shift`.
    ///
    /// # Errors
    ///
    /// Returns an error if `shift` is not finite.
    pub fn create_with_shift(&self, shift: &Transform3) -> Result<Self> {
        if !is_finite_transform(shift) {
            return Err(GeometryError::NonFiniteTransform.into());
        }
        let layers = self
            .layers
            .iter()
            .map(|layer| layer.clone_with_shift(shift).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        let volumes = self
            .volumes
            .iter()
            .map(|volume| volume.create_with_shift(shift).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            volume = %self.name,
            layers = layers.len(),
            volumes = volumes.len(),
            "shifted tracking volume"
        );
        Ok(Self {
            name: self.name.clone(),
            placement: shift * self.placement,
            bounds: self.bounds,
            layers,
            volumes,
            signature: self.signature,
            geometry_type: self.geometry_type,
        })
    }

    /// Tags this volume and all sub-volumes.
    ///
    /// Sub-volumes shared with other owners are copied before being tagged.
    pub fn sign(&mut self, signature: GeometrySignature, geometry_type: GeometryType) {
        self.signature = signature;
        self.geometry_type = geometry_type;
        for volume in &mut self.volumes {
            Arc::make_mut(volume).sign(signature, geometry_type);
        }
    }
}
