use std::sync::Arc;

use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::layer::Layer;
use crate::math::{is_finite_transform, is_identity, Transform3, TOLERANCE};

use super::{GeometrySignature, GeometryType, TrackingVolume};

/// A named tracking volume that can be cloned, moved and realigned
/// independently of the geometry around it.
///
/// The volume may carry a single-layer and a multi-layer representation for
/// fast navigation; both follow every move of the volume.
#[derive(Debug, Clone)]
pub struct DetachedTrackingVolume {
    name: String,
    volume: Arc<TrackingVolume>,
    layer: Option<Arc<Layer>>,
    multi_layer: Vec<Arc<Layer>>,
    base_transform: Option<Transform3>,
}

impl DetachedTrackingVolume {
    /// Wraps a tracking volume and its optional layer representations.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        volume: Arc<TrackingVolume>,
        layer: Option<Arc<Layer>>,
        multi_layer: Vec<Arc<Layer>>,
    ) -> Self {
        Self {
            name: name.into(),
            volume,
            layer,
            multi_layer,
            base_transform: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the wrapped tracking volume.
    #[must_use]
    pub fn tracking_volume(&self) -> &Arc<TrackingVolume> {
        &self.volume
    }

    /// Returns the single-layer representation, if any.
    #[must_use]
    pub fn layer_representation(&self) -> Option<&Arc<Layer>> {
        self.layer.as_ref()
    }

    /// Returns the multi-layer representation (possibly empty).
    #[must_use]
    pub fn multi_layer_representation(&self) -> &[Arc<Layer>] {
        &self.multi_layer
    }

    /// Returns the stored base transform, if any.
    #[must_use]
    pub fn base_transform(&self) -> Option<&Transform3> {
        self.base_transform.as_ref()
    }

    #[must_use]
    pub fn geometry_signature(&self) -> GeometrySignature {
        self.volume.geometry_signature()
    }

    #[must_use]
    pub fn geometry_type(&self) -> GeometryType {
        self.volume.geometry_type()
    }

    /// Creates a copy named `name` with the volume and every layer
    /// representation moved by `shift`.
    ///
    /// The copy starts without a base transform. `self` is not modified.
    ///
    /// # Errors
    ///
    /// Returns an error if `shift` is not finite.
    pub fn clone_with_shift(&self, name: impl Into<String>, shift: &Transform3) -> Result<Self> {
        let name = name.into();
        let (volume, layer, multi_layer) = self.shifted_parts(shift)?;
        debug!(
            source = %self.name,
            clone = %name,
            translation = ?shift.translation.vector,
            "cloned detached volume"
        );
        Ok(Self {
            name,
            volume,
            layer,
            multi_layer,
            base_transform: None,
        })
    }

    /// Moves the volume and every layer representation by `shift`.
    ///
    /// All shifted parts are built before any is swapped in, so on error
    /// nothing changes. Parts previously handed out keep their old placement.
    ///
    /// # Errors
    ///
    /// Returns an error if `shift` is not finite.
    pub fn move_by(&mut self, shift: &Transform3) -> Result<()> {
        let (volume, layer, multi_layer) = self.shifted_parts(shift)?;
        self.volume = volume;
        self.layer = layer;
        self.multi_layer = multi_layer;
        debug!(
            volume = %self.name,
            translation = ?shift.translation.vector,
            "moved detached volume"
        );
        Ok(())
    }

    /// Moves the volume so that its placement becomes `target`, or the stored
    /// base transform when `target` is `None`.
    ///
    /// Does nothing without a target, or when the volume already sits there.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is not finite.
    pub fn realign(&mut self, target: Option<&Transform3>) -> Result<()> {
        let Some(target) = target.or(self.base_transform.as_ref()).copied() else {
            return Ok(());
        };
        if !is_finite_transform(&target) {
            return Err(GeometryError::NonFiniteTransform.into());
        }
        let shift = target * self.volume.placement().inverse();
        if is_identity(&shift, TOLERANCE) {
            return Ok(());
        }
        debug!(volume = %self.name, "realigning detached volume");
        self.move_by(&shift)
    }

    /// Stores `transform` as the base transform, or the current placement of
    /// the tracking volume when `None`.
    pub fn set_base_transform(&mut self, transform: Option<Transform3>) {
        let base = transform.unwrap_or(*self.volume.placement());
        debug!(
            volume = %self.name,
            translation = ?base.translation.vector,
            "set base transform"
        );
        self.base_transform = Some(base);
    }

    /// Tags the tracking volume and its sub-volumes.
    ///
    /// A tracking volume shared with other holders is copied first.
    pub fn sign(&mut self, signature: GeometrySignature, geometry_type: GeometryType) {
        Arc::make_mut(&mut self.volume).sign(signature, geometry_type);
    }

    #[allow(clippy::type_complexity)]
    fn shifted_parts(
        &self,
        shift: &Transform3,
    ) -> Result<(Arc<TrackingVolume>, Option<Arc<Layer>>, Vec<Arc<Layer>>)> {
        let volume = Arc::new(self.volume.create_with_shift(shift)?);
        let layer = self
            .layer
            .as_ref()
            .map(|layer| layer.clone_with_shift(shift).map(Arc::new))
            .transpose()?;
        let multi_layer = self
            .multi_layer
            .iter()
            .map(|layer| layer.clone_with_shift(shift).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        Ok((volume, layer, multi_layer))
    }
}
