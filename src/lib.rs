//! Layer construction and rigid-body transform management for
//! tracking-detector geometry.
//!
//! Sensitive surfaces are collected into cylinder, disc or plane
//! [`layer::Layer`]s sized from their joint extent and binned in two
//! dimensions for constant-time lookup. Tracking volumes confining such
//! layers can be wrapped in a [`volume::DetachedTrackingVolume`] and then
//! cloned, moved and realigned as a unit.

pub mod binning;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod math;
pub mod volume;

pub use config::LayerCreatorConfig;
pub use error::{ErrorKind, Result, TrackGeoError};
