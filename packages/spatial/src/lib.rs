#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial index for crime location lookups.
//!
//! Builds an implicit kd-tree over `[lat, lng]` points once at startup and
//! answers inclusive bounding-box range queries against it. The tree is
//! never modified after construction, so it can be shared freely between
//! request handlers.
//!
//! The tree lives in a single `Vec`: each subslice's median element is the
//! node, the elements before it form the left subtree and the elements after
//! it the right subtree. The split dimension alternates with depth, latitude
//! at the root.

use std::cmp::Ordering;

/// Half a mile expressed in WGS84 degrees.
///
/// Derived from one degree being roughly 70 miles wide. That holds for
/// latitude everywhere but only near the dataset's latitude band for
/// longitude, so this is a flat-earth approximation suitable for a single
/// city's worth of data.
pub const HALF_MILE_DEGREES: f64 = 0.00714;

/// Half-widths of a search box, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRadius {
    /// Distance north and south of the query point.
    pub lat_delta: f64,
    /// Distance east and west of the query point.
    pub lng_delta: f64,
}

impl SearchRadius {
    /// The default half-mile search radius.
    pub const HALF_MILE: Self = Self::uniform(HALF_MILE_DEGREES);

    /// A radius with the same half-width in both dimensions.
    #[must_use]
    pub const fn uniform(degrees: f64) -> Self {
        Self {
            lat_delta: degrees,
            lng_delta: degrees,
        }
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self::HALF_MILE
    }
}

/// An axis-aligned bounding box in `[lat, lng]` space. Both edges are
/// inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// The box extending `radius` in each direction from `[lat, lng]`.
    #[must_use]
    pub fn around(center: [f64; 2], radius: SearchRadius) -> Self {
        let [lat, lng] = center;
        Self {
            west: lng - radius.lng_delta,
            south: lat - radius.lat_delta,
            east: lng + radius.lng_delta,
            north: lat + radius.lat_delta,
        }
    }

    /// Whether `[lat, lng]` lies inside the box or on its edge.
    #[must_use]
    pub fn contains(&self, point: [f64; 2]) -> bool {
        let [lat, lng] = point;
        self.south <= lat && lat <= self.north && self.west <= lng && lng <= self.east
    }

    /// Lower bound along `axis` (0 = latitude, 1 = longitude).
    const fn min(&self, axis: usize) -> f64 {
        if axis == 0 { self.south } else { self.west }
    }

    /// Upper bound along `axis` (0 = latitude, 1 = longitude).
    const fn max(&self, axis: usize) -> f64 {
        if axis == 0 { self.north } else { self.east }
    }
}

/// A point stored in the tree along with its insertion position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KdEntry {
    /// `[lat, lng]`.
    pub point: [f64; 2],
    /// Position of the point in the input sequence; breaks ties between
    /// points that share a split value.
    pub seq: usize,
}

/// Immutable 2-D kd-tree over `[lat, lng]` points.
#[derive(Debug, Clone, Default)]
pub struct KdTree {
    entries: Vec<KdEntry>,
}

impl KdTree {
    /// Builds a balanced tree by recursive median partitioning.
    ///
    /// Runs in O(n log n). The ordering used for partitioning is total
    /// (split value, then insertion position), so building from the same
    /// sequence of points always produces the same tree.
    #[must_use]
    pub fn build<I>(points: I) -> Self
    where
        I: IntoIterator<Item = [f64; 2]>,
    {
        let mut entries: Vec<KdEntry> = points
            .into_iter()
            .enumerate()
            .map(|(seq, point)| KdEntry { point, seq })
            .collect();

        partition(&mut entries, 0);
        log::debug!("Built kd-tree over {} points", entries.len());

        Self { entries }
    }

    /// Number of points in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates every entry in tree layout order.
    pub fn iter(&self) -> impl Iterator<Item = &KdEntry> {
        self.entries.iter()
    }

    /// Calls `visit` for every entry inside `bbox`, pruning subtrees that
    /// lie entirely on the far side of a split.
    pub fn for_each_in<'a, F>(&'a self, bbox: &BoundingBox, mut visit: F)
    where
        F: FnMut(&'a KdEntry),
    {
        search(&self.entries, 0, bbox, &mut visit);
    }

    /// Collects every entry inside `bbox`, in traversal order.
    #[must_use]
    pub fn range(&self, bbox: &BoundingBox) -> Vec<&KdEntry> {
        let mut hits = Vec::new();
        self.for_each_in(bbox, |entry| hits.push(entry));
        hits
    }
}

fn compare_on(axis: usize, a: &KdEntry, b: &KdEntry) -> Ordering {
    a.point[axis]
        .total_cmp(&b.point[axis])
        .then(a.seq.cmp(&b.seq))
}

fn partition(entries: &mut [KdEntry], depth: usize) {
    if entries.len() <= 1 {
        return;
    }

    let axis = depth % 2;
    let mid = entries.len() / 2;
    entries.select_nth_unstable_by(mid, |a, b| compare_on(axis, a, b));

    let (left, rest) = entries.split_at_mut(mid);
    partition(left, depth + 1);
    partition(&mut rest[1..], depth + 1);
}

fn search<'a, F>(entries: &'a [KdEntry], depth: usize, bbox: &BoundingBox, visit: &mut F)
where
    F: FnMut(&'a KdEntry),
{
    if entries.is_empty() {
        return;
    }

    let axis = depth % 2;
    let mid = entries.len() / 2;
    let node = &entries[mid];

    if bbox.contains(node.point) {
        visit(node);
    }

    // Left subtree holds values <= split, right subtree values >= split.
    let split = node.point[axis];
    if bbox.min(axis) <= split {
        search(&entries[..mid], depth + 1, bbox, visit);
    }
    if split <= bbox.max(axis) {
        search(&entries[mid + 1..], depth + 1, bbox, visit);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstar::{AABB, RTree};

    use super::*;

    fn random_points(seed: u64, count: usize) -> Vec<[f64; 2]> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| [rng.gen_range(45.4..45.7), rng.gen_range(-122.8..-122.4)])
            .collect()
    }

    fn sorted_seqs(entries: &[&KdEntry]) -> Vec<usize> {
        let mut seqs: Vec<usize> = entries.iter().map(|e| e.seq).collect();
        seqs.sort_unstable();
        seqs
    }

    #[test]
    fn box_extends_radius_on_each_axis() {
        let radius = SearchRadius {
            lat_delta: 0.25,
            lng_delta: 0.5,
        };
        let bbox = BoundingBox::around([45.5, -122.5], radius);
        assert_eq!(bbox.south, 45.25);
        assert_eq!(bbox.north, 45.75);
        assert_eq!(bbox.west, -123.0);
        assert_eq!(bbox.east, -122.0);
        assert!(bbox.contains([45.25, -123.0]));
        assert!(!bbox.contains([45.2, -122.5]));
    }

    #[test]
    fn empty_tree_returns_nothing() {
        let tree = KdTree::build(Vec::new());
        assert!(tree.is_empty());
        let bbox = BoundingBox::around([45.5, -122.6], SearchRadius::HALF_MILE);
        assert!(tree.range(&bbox).is_empty());
    }

    #[test]
    fn single_point_is_found() {
        let tree = KdTree::build([[45.5, -122.6]]);
        let bbox = BoundingBox::around([45.5, -122.6], SearchRadius::HALF_MILE);
        let hits = tree.range(&bbox);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].point, [45.5, -122.6]);
        assert_eq!(hits[0].seq, 0);
    }

    #[test]
    fn far_points_are_excluded() {
        let tree = KdTree::build([[45.5, -122.6], [45.6, -122.6], [45.5, -122.7]]);
        let bbox = BoundingBox::around([45.5, -122.6], SearchRadius::HALF_MILE);
        assert_eq!(sorted_seqs(&tree.range(&bbox)), vec![0]);
    }

    #[test]
    fn boundary_is_inclusive() {
        let center = [45.5, -122.6];
        let radius = SearchRadius::HALF_MILE;
        let bbox = BoundingBox::around(center, radius);

        let on_edge = [center[0] + radius.lat_delta, center[1] - radius.lng_delta];
        let past_north = [bbox.north.next_up(), center[1]];
        let past_west = [center[0], bbox.west.next_down()];

        let tree = KdTree::build([on_edge, past_north, past_west]);
        assert_eq!(sorted_seqs(&tree.range(&bbox)), vec![0]);
    }

    #[test]
    fn matches_brute_force_scan() {
        let points = random_points(17, 2_000);
        let tree = KdTree::build(points.iter().copied());
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..50 {
            let center = [rng.gen_range(45.4..45.7), rng.gen_range(-122.8..-122.4)];
            let bbox = BoundingBox::around(center, SearchRadius::uniform(0.02));

            let expected: Vec<usize> = points
                .iter()
                .enumerate()
                .filter(|(_, p)| bbox.contains(**p))
                .map(|(i, _)| i)
                .collect();

            assert_eq!(sorted_seqs(&tree.range(&bbox)), expected);
        }
    }

    #[test]
    fn matches_rtree_envelope_query() {
        let points = random_points(5, 1_000);
        let tree = KdTree::build(points.iter().copied());
        let rtree = RTree::bulk_load(points.clone());

        let bbox = BoundingBox::around([45.55, -122.6], SearchRadius::uniform(0.05));
        let envelope = AABB::from_corners([bbox.south, bbox.west], [bbox.north, bbox.east]);

        let mut expected: Vec<[f64; 2]> = rtree.locate_in_envelope(&envelope).copied().collect();
        let mut actual: Vec<[f64; 2]> = tree.range(&bbox).iter().map(|e| e.point).collect();

        expected.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
        actual.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
        assert_eq!(actual, expected);
    }

    #[test]
    fn shared_split_values_are_all_found() {
        let points: Vec<[f64; 2]> = (0..64_u32)
            .map(|i| [45.5, -122.6 + f64::from(i) * 0.0001])
            .collect();
        let tree = KdTree::build(points);
        let bbox = BoundingBox::around([45.5, -122.6], SearchRadius::uniform(0.01));
        assert_eq!(tree.range(&bbox).len(), 64);
    }

    #[test]
    fn rebuild_produces_identical_layout() {
        let points = random_points(3, 500);
        let a = KdTree::build(points.iter().copied());
        let b = KdTree::build(points.iter().copied());
        assert!(a.iter().eq(b.iter()));
    }

    #[test]
    fn for_each_in_visits_same_entries_as_range() {
        let points = random_points(11, 300);
        let tree = KdTree::build(points);
        let bbox = BoundingBox::around([45.55, -122.6], SearchRadius::uniform(0.03));

        let mut visited = Vec::new();
        tree.for_each_in(&bbox, |entry| visited.push(entry.seq));

        let ranged: Vec<usize> = tree.range(&bbox).iter().map(|e| e.seq).collect();
        assert_eq!(visited, ranged);
    }
}
