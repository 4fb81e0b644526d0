use std::fmt::{Display, Formatter};
use std::ops::AddAssign;

use geometry::bbox::{BBox, BOUND_HUGE};
use geometry::ray::Ray;
use math::hcm::{Point3, Vec3};

use crate::bvh::{BvhNodeContent, BvhTree, NodeId, ObjectRef};
use crate::intersection::Intersection;
use crate::queue::PriorityQueue;

/// Entry depth given to infinite nodes; sorts before any finite box.
pub const MAX_DISTANCE: f64 = 1.0e7;
/// Direction components at or below this magnitude are treated as zero, and boxes ending before
/// this depth are behind the ray.
pub const EPSILON: f64 = 1e-10;

/// Counters of one thread's traversal work.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TraversalStats {
    pub bbox_tests: u64,
    pub bbox_enqueued: u64,
    pub leaf_tests: u64,
    pub leaf_hits: u64,
    pub queue_peak: usize,
}

impl AddAssign for TraversalStats {
    fn add_assign(&mut self, rhs: Self) {
        self.bbox_tests += rhs.bbox_tests;
        self.bbox_enqueued += rhs.bbox_enqueued;
        self.leaf_tests += rhs.leaf_tests;
        self.leaf_hits += rhs.leaf_hits;
        self.queue_peak = self.queue_peak.max(rhs.queue_peak);
    }
}

impl Display for TraversalStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let ratio = |a: u64, b: u64| if b == 0 { 0.0 } else { a as f64 / b as f64 };
        write!(
            f,
            "bbox tests = {}, enqueued = {} ({:.1}%), leaf tests = {}, leaf hits = {} ({:.1}%), \
             queue peak = {}",
            self.bbox_tests,
            self.bbox_enqueued,
            100.0 * ratio(self.bbox_enqueued, self.bbox_tests),
            self.leaf_tests,
            self.leaf_hits,
            100.0 * ratio(self.leaf_hits, self.leaf_tests),
            self.queue_peak
        )
    }
}

/// Mutable state owned by one tracing thread. Create one per worker and pass it to every
/// traversal; the tree itself is only read.
#[derive(Default)]
pub struct TraceContext {
    pub queue: PriorityQueue,
    pub stats: TraversalStats,
}

impl TraceContext {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Per-ray values of the slab test, computed once per traversal.
struct SlabRay {
    origin: Point3,
    inv_dir: Vec3,
    nonzero: [bool; 3],
    positive: [bool; 3],
}

impl SlabRay {
    fn new(ray: &Ray) -> Self {
        let mut inv_dir = Vec3::ZERO;
        let mut nonzero = [false; 3];
        let mut positive = [false; 3];
        for axis in 0..3 {
            let d = ray.dir[axis];
            nonzero[axis] = d.abs() > EPSILON;
            positive[axis] = d > 0.0;
            if nonzero[axis] {
                inv_dir[axis] = 1.0 / d;
            }
        }
        SlabRay {
            origin: ray.origin,
            inv_dir,
            nonzero,
            positive,
        }
    }

    /// Returns the depth at which the ray enters `bbox`, or `None` if it misses the box or the box
    /// lies behind the origin. The depth is negative if the origin is inside the box.
    fn entry_depth(&self, bbox: &BBox) -> Option<f64> {
        let (mut dmin, mut dmax) = (-BOUND_HUGE, BOUND_HUGE);
        let lower_left = bbox.lower_left();
        let lengths = bbox.lengths();
        for axis in 0..3 {
            let (ll, len) = (lower_left[axis], lengths[axis]);
            if self.nonzero[axis] {
                let den = self.inv_dir[axis];
                let (tmin, tmax) = if self.positive[axis] {
                    let tmin = (ll - self.origin[axis]) * den;
                    (tmin, tmin + len * den)
                } else {
                    let tmax = (ll - self.origin[axis]) * den;
                    (tmax + len * den, tmax)
                };
                dmin = dmin.max(tmin);
                dmax = dmax.min(tmax);
                if dmin > dmax {
                    return None;
                }
            } else if self.origin[axis] < ll || self.origin[axis] > ll + len {
                return None;
            }
        }
        if dmax < EPSILON {
            None
        } else {
            Some(dmin)
        }
    }
}

impl BvhTree {
    /// Finds the nearest hit along `ray` among the indexed objects. `test_leaf` performs the exact
    /// test of one object, writing into the candidate record and returning whether it hit.
    ///
    /// `best` is only overwritten by strictly nearer hits. Its initial depth bounds the search, so
    /// passing `Intersection::none()` searches everything. Returns whether `best` was updated.
    pub fn find_nearest<T>(
        &self, ray: &Ray, best: &mut Intersection, ctx: &mut TraceContext, test_leaf: T,
    ) -> bool
    where
        T: Fn(&Ray, ObjectRef, &mut Intersection) -> bool,
    {
        self.find_nearest_filtered(ray, best, ctx, test_leaf, |_, _| true, |_, _| true)
    }

    /// Same as `find_nearest()`, but an object is skipped if `precondition` rejects it before the
    /// exact test, or if `postcondition` rejects it after a successful one.
    pub fn find_nearest_filtered<T, Pre, Post>(
        &self, ray: &Ray, best: &mut Intersection, ctx: &mut TraceContext, test_leaf: T,
        precondition: Pre, postcondition: Post,
    ) -> bool
    where
        T: Fn(&Ray, ObjectRef, &mut Intersection) -> bool,
        Pre: Fn(&Ray, ObjectRef) -> bool,
        Post: Fn(&Ray, ObjectRef) -> bool,
    {
        let slab_ray = SlabRay::new(ray);
        let TraceContext { queue, stats } = ctx;
        queue.clear();
        self.check_and_enqueue(&slab_ray, self.root, queue, stats);

        let mut found = false;
        while let Some(depth) = queue.peek_depth() {
            // Everything still queued starts at or beyond `depth`.
            if depth > best.depth {
                break;
            }
            let (_, id) = queue.extract_min();
            match &self.node(id).content {
                BvhNodeContent::Split(children) => {
                    for child in children.iter() {
                        self.check_and_enqueue(&slab_ray, *child, queue, stats);
                    }
                }
                BvhNodeContent::Leaf(object) => {
                    if !precondition(ray, *object) {
                        continue;
                    }
                    stats.leaf_tests += 1;
                    let mut candidate = Intersection::none();
                    if !test_leaf(ray, *object, &mut candidate) {
                        continue;
                    }
                    stats.leaf_hits += 1;
                    if !postcondition(ray, *object) {
                        continue;
                    }
                    if candidate.depth < best.depth {
                        *best = Intersection {
                            object: Some(*object),
                            ..candidate
                        };
                        found = true;
                    }
                }
            }
        }
        found
    }

    /// Calls `f` with every object whose leaf box contains `p`. Infinite nodes are always entered.
    pub fn for_each_containing<F>(&self, p: Point3, mut f: F)
    where
        F: FnMut(ObjectRef),
    {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if !node.infinite && !node.bbox.contains(p) {
                continue;
            }
            match &node.content {
                BvhNodeContent::Leaf(object) => f(*object),
                BvhNodeContent::Split(children) => stack.extend(children.iter().rev()),
            }
        }
    }

    fn check_and_enqueue(
        &self, slab_ray: &SlabRay, id: NodeId, queue: &mut PriorityQueue,
        stats: &mut TraversalStats,
    ) {
        let node = self.node(id);
        let depth = if node.infinite {
            -MAX_DISTANCE
        } else {
            stats.bbox_tests += 1;
            match slab_ray.entry_depth(&node.bbox) {
                Some(depth) => depth,
                None => return,
            }
        };
        stats.bbox_enqueued += 1;
        queue.insert(depth, id);
        stats.queue_peak = stats.queue_peak.max(queue.len());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use math::hcm::{point3, vec3};

    fn unit_box_at(x: f64) -> BBox {
        BBox::from_min_max(point3(x, 0.0, 0.0), point3(x + 1.0, 1.0, 1.0))
    }

    #[test]
    fn entry_depth_along_positive_and_negative_axes() {
        let b = unit_box_at(5.0);
        let forward = SlabRay::new(&Ray::new(point3(0.0, 0.5, 0.5), vec3(1.0, 0.0, 0.0)));
        assert_eq!(forward.entry_depth(&b), Some(5.0));
        let backward = SlabRay::new(&Ray::new(point3(10.0, 0.5, 0.5), vec3(-2.0, 0.0, 0.0)));
        assert_eq!(backward.entry_depth(&b), Some(2.0));
        let away = SlabRay::new(&Ray::new(point3(10.0, 0.5, 0.5), vec3(1.0, 0.0, 0.0)));
        assert_eq!(away.entry_depth(&b), None);
    }

    #[test]
    fn zero_direction_axis_misses_outside_slab() {
        let b = unit_box_at(5.0);
        let ray = SlabRay::new(&Ray::new(point3(0.0, 2.0, 0.5), vec3(1.0, 0.0, 0.0)));
        assert_eq!(ray.entry_depth(&b), None);
        // On the slab boundary counts as inside.
        let ray = SlabRay::new(&Ray::new(point3(0.0, 1.0, 0.5), vec3(1.0, 0.0, 0.0)));
        assert_eq!(ray.entry_depth(&b), Some(5.0));
    }

    #[test]
    fn origin_inside_gives_negative_entry() {
        let b = unit_box_at(5.0);
        let ray = SlabRay::new(&Ray::new(point3(5.25, 0.5, 0.5), vec3(1.0, 0.0, 0.0)));
        assert_eq!(ray.entry_depth(&b), Some(-0.25));
    }

    #[test]
    fn stats_merge() {
        let mut total = TraversalStats::default();
        let a = TraversalStats {
            bbox_tests: 3,
            bbox_enqueued: 2,
            leaf_tests: 1,
            leaf_hits: 1,
            queue_peak: 4,
        };
        total += a;
        total += TraversalStats {
            queue_peak: 2,
            ..a
        };
        assert_eq!(total.bbox_tests, 6);
        assert_eq!(total.leaf_hits, 2);
        assert_eq!(total.queue_peak, 4);
    }
}
