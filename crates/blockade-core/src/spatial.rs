//! Nearest-atom queries.
//!
//! Atoms are bulk-loaded into an R-tree. A query returns the atom whose
//! centre is closest to the query point, provided it lies within a distance
//! bound; points outside the bound are reported as unaffected.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// An atom centre stored in the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomEntry {
    pub position: [f64; 3],
    pub radius: f64,
    pub index: usize,
}

impl RTreeObject for AtomEntry {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for AtomEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// Nearest atom to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestAtom {
    pub entry: AtomEntry,
    /// Centre-to-point distance (Å).
    pub distance: f64,
}

impl NearestAtom {
    /// Distance to the atom surface, clamped at zero.
    pub fn surface_distance(&self) -> f64 {
        (self.distance - self.entry.radius).max(0.0)
    }
}

/// R-tree over atom centres with a precomputed bounding box.
pub struct AtomIndex {
    tree: RTree<AtomEntry>,
    lower: [f64; 3],
    upper: [f64; 3],
    max_radius: f64,
}

impl AtomIndex {
    pub fn build(positions: &[[f64; 3]], radii: &[f64]) -> Self {
        let entries: Vec<AtomEntry> = positions
            .iter()
            .zip(radii)
            .enumerate()
            .map(|(index, (&position, &radius))| AtomEntry {
                position,
                radius,
                index,
            })
            .collect();

        let mut lower = [f64::INFINITY; 3];
        let mut upper = [f64::NEG_INFINITY; 3];
        for e in &entries {
            for d in 0..3 {
                lower[d] = lower[d].min(e.position[d]);
                upper[d] = upper[d].max(e.position[d]);
            }
        }
        let max_radius = entries.iter().map(|e| e.radius).fold(0.0, f64::max);

        Self {
            tree: RTree::bulk_load(entries),
            lower,
            upper,
            max_radius,
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Whether `p` is within `bound` of the atoms' bounding box.
    #[inline]
    pub fn near_bounds(&self, p: [f64; 3], bound: f64) -> bool {
        (0..3).all(|d| p[d] >= self.lower[d] - bound && p[d] <= self.upper[d] + bound)
    }

    /// Nearest atom whose centre lies within `bound` of `p`.
    pub fn nearest_within(&self, p: [f64; 3], bound: f64) -> Option<NearestAtom> {
        if !self.near_bounds(p, bound) {
            return None;
        }
        self.tree
            .locate_within_distance(p, bound * bound)
            .map(|e| (e, e.distance_2(&p)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.index.cmp(&b.0.index)))
            .map(|(e, d2)| NearestAtom {
                entry: *e,
                distance: d2.sqrt(),
            })
    }
}
