//! Per-query k-d tree over feature vectors.

use std::fmt;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use timbre_core::model::FEATURE_COUNT;

/// Points held by a single tree leaf.
///
/// The tree is never asked to hold more points than this, so it stays a
/// single bucket and never has to split on a run of equal coordinates.
pub const LEAF_CAPACITY: usize = 1024;

type FeatureTree = KdTree<f64, u64, FEATURE_COUNT, LEAF_CAPACITY, u32>;

/// A point returned by [`NeighborIndex::nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the point in the slice the index was built from.
    pub index: usize,
    /// Euclidean distance to the query point.
    pub distance: f64,
}

/// Nearest-neighbour index over six-dimensional points.
pub struct NeighborIndex {
    tree: FeatureTree,
    len: usize,
}

impl NeighborIndex {
    /// Index `points`, which must number at most [`LEAF_CAPACITY`].
    pub fn build(points: &[[f64; FEATURE_COUNT]]) -> Self {
        debug_assert!(points.len() <= LEAF_CAPACITY);
        let mut tree = FeatureTree::new();
        for (i, point) in points.iter().enumerate() {
            tree.add(point, i as u64);
        }
        Self {
            tree,
            len: points.len(),
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every indexed point, nearest first.
    pub fn nearest(&self, query: &[f64; FEATURE_COUNT]) -> Vec<Neighbor> {
        self.nearest_n(query, self.len)
    }

    /// The `count` points closest to `query`, nearest first.
    pub fn nearest_n(&self, query: &[f64; FEATURE_COUNT], count: usize) -> Vec<Neighbor> {
        if self.len == 0 || count == 0 {
            return Vec::new();
        }
        self.tree
            .nearest_n::<SquaredEuclidean>(query, count.min(self.len))
            .into_iter()
            .map(|n| Neighbor {
                index: n.item as usize,
                distance: n.distance.sqrt(),
            })
            .collect()
    }
}

impl fmt::Debug for NeighborIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeighborIndex")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
