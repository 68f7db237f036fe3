use std::collections::BTreeSet;

use slotmap::SlotMap;

use crate::geometry::SurfaceRef;
use crate::math::Transform3;

use super::{BinUtility, BinningOption};

slotmap::new_key_type! {
    /// Identifier of a surface inside a [`SurfaceArray`].
    pub struct SurfaceId;
}

/// Two binning axes forming a 2-D grid.
///
/// Bins are addressed by `(b0, b1)` and stored row-major as `b0 + n0 * b1`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinningScheme {
    first: BinUtility,
    second: BinUtility,
}

impl BinningScheme {
    /// Combines two axes into a grid.
    #[must_use]
    pub fn new(first: BinUtility, second: BinUtility) -> Self {
        Self { first, second }
    }

    /// Returns the first axis.
    #[must_use]
    pub fn first(&self) -> &BinUtility {
        &self.first
    }

    /// Returns the second axis.
    #[must_use]
    pub fn second(&self) -> &BinUtility {
        &self.second
    }

    /// Returns the bin counts of both axes.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.first.bins(), self.second.bins())
    }

    /// Returns the total number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.first.bins() * self.second.bins()
    }

    /// Always `false`: each axis has at least one bin.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maps a coordinate pair to its bin.
    #[must_use]
    pub fn bin(&self, v0: f64, v1: f64) -> (usize, usize) {
        (self.first.bin(v0), self.second.bin(v1))
    }

    /// Flattens a bin pair into a grid index.
    #[must_use]
    pub fn global_index(&self, b0: usize, b1: usize) -> usize {
        b0 + self.first.bins() * b1
    }
}

/// Surfaces organised in a 2-D grid for constant-time lookup.
///
/// Each surface is stored once; every bin its footprint overlaps holds its
/// [`SurfaceId`].
#[derive(Debug, Clone)]
pub struct SurfaceArray {
    scheme: BinningScheme,
    surfaces: SlotMap<SurfaceId, SurfaceRef>,
    grid: Vec<Vec<SurfaceId>>,
}

impl SurfaceArray {
    /// Creates an empty grid for `scheme`.
    #[must_use]
    pub fn new(scheme: BinningScheme) -> Self {
        let grid = vec![Vec::new(); scheme.len()];
        Self {
            scheme,
            surfaces: SlotMap::with_key(),
            grid,
        }
    }

    /// Stores `surface` and references it from every bin in
    /// `bins0 x bins1`. Out-of-range bin indices are ignored.
    pub fn insert(&mut self, surface: SurfaceRef, bins0: &[usize], bins1: &[usize]) -> SurfaceId {
        let id = self.surfaces.insert(surface);
        let (n0, n1) = self.scheme.dimensions();
        for &b1 in bins1.iter().filter(|&&b| b < n1) {
            for &b0 in bins0.iter().filter(|&&b| b < n0) {
                let cell = &mut self.grid[self.scheme.global_index(b0, b1)];
                if !cell.contains(&id) {
                    cell.push(id);
                }
            }
        }
        id
    }

    /// Returns the binning scheme.
    #[must_use]
    pub fn scheme(&self) -> &BinningScheme {
        &self.scheme
    }

    /// Returns the number of distinct surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns `true` if no surface is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Returns the surface stored under `id`.
    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> Option<&SurfaceRef> {
        self.surfaces.get(id)
    }

    /// Iterates over all distinct surfaces with their ids.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &SurfaceRef)> {
        self.surfaces.iter()
    }

    /// Returns the ids stored in bin `(b0, b1)`; empty when out of range.
    #[must_use]
    pub fn bin_content(&self, b0: usize, b1: usize) -> &[SurfaceId] {
        let (n0, n1) = self.scheme.dimensions();
        if b0 >= n0 || b1 >= n1 {
            return &[];
        }
        &self.grid[self.scheme.global_index(b0, b1)]
    }

    /// Returns the surfaces in the bin containing `(v0, v1)`.
    #[must_use]
    pub fn surfaces_at(&self, v0: f64, v1: f64) -> Vec<&SurfaceRef> {
        let (b0, b1) = self.scheme.bin(v0, v1);
        self.resolve(self.bin_content(b0, b1).iter().copied())
    }

    /// Returns the de-duplicated surfaces of bin `(b0, b1)` and of its
    /// neighbours up to `expansion` bins away on each axis.
    ///
    /// Neighbours wrap on closed axes and are clipped on open ones.
    #[must_use]
    pub fn surfaces_near(&self, b0: usize, b1: usize, expansion: usize) -> Vec<&SurfaceRef> {
        let rows = neighbours(self.scheme.first(), b0, expansion);
        let cols = neighbours(self.scheme.second(), b1, expansion);
        let mut seen = BTreeSet::new();
        let mut ids = Vec::new();
        for &c in &cols {
            for &r in &rows {
                for &id in self.bin_content(r, c) {
                    if seen.insert(id) {
                        ids.push(id);
                    }
                }
            }
        }
        self.resolve(ids.into_iter())
    }

    /// Number of bins holding at least one surface.
    #[must_use]
    pub fn occupied_bins(&self) -> usize {
        self.grid.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Copy of this array with every surface moved by `shift`.
    ///
    /// Ids and bin assignments are preserved, so a surface shared by several
    /// bins stays a single shifted surface.
    #[must_use]
    pub fn with_shift(&self, shift: &Transform3) -> Self {
        let mut shifted = self.clone();
        for surface in shifted.surfaces.values_mut() {
            *surface = surface.shifted(shift);
        }
        shifted
    }

    fn resolve(&self, ids: impl Iterator<Item = SurfaceId>) -> Vec<&SurfaceRef> {
        ids.filter_map(|id| self.surfaces.get(id)).collect()
    }
}

/// Bin indices within `expansion` of `center` along one axis.
fn neighbours(axis: &BinUtility, center: usize, expansion: usize) -> Vec<usize> {
    let count = axis.bins();
    if center >= count {
        return Vec::new();
    }
    match axis.option() {
        BinningOption::Open => {
            let lo = center.saturating_sub(expansion);
            let hi = (center + expansion).min(count - 1);
            (lo..=hi).collect()
        }
        BinningOption::Closed => {
            if 2 * expansion + 1 >= count {
                return (0..count).collect();
            }
            (0..=2 * expansion)
                .map(|offset| (center + count + offset - expansion) % count)
                .collect()
        }
    }
}
