use geometry::bbox::{self, BBox, BOUND_HUGE};
use itertools::Itertools;
use math::hcm::Vec3;

use crate::bvh::{BvhNode, BvhNodeContent, BvhTree, NodeId, ObjectRef};

/// Maximum number of entries gathered into one split node instead of splitting further.
pub const BUNCHING_FACTOR: usize = 4;

/// Builds the hierarchy over `finite` objects, then grafts all `infinite` objects into the root
/// as one extra first child so that they are tested by every ray.
///
/// Returns `None` if both lists are empty: such a scene is missed by every ray.
pub fn build_tree(
    finite: Vec<(BBox, ObjectRef)>, infinite: Vec<(BBox, ObjectRef)>,
) -> Option<BvhTree> {
    let (num_finite, num_infinite) = (finite.len(), infinite.len());
    if num_finite + num_infinite == 0 {
        log::warn!("no objects to bound");
        return None;
    }
    let mut builder = Builder::new(num_finite);
    let finite_root = builder.build_finite(finite);
    let root = builder.graft_infinite(finite_root, infinite)?;
    let tree = BvhTree {
        nodes: builder.nodes,
        root,
    };
    log::info!(
        "bounding {} finite and {} infinite objects: {} nodes, height {}",
        num_finite,
        num_infinite,
        tree.nodes.len(),
        tree.height()
    );
    Some(tree)
}

enum Partition {
    Empty,
    /// The range was gathered into this node, which is appended to the worklist.
    Bucket(NodeId),
    /// The range should be split into `[first, mid)` and `[mid, last)`.
    Split(usize),
}

struct Builder {
    nodes: Vec<BvhNode>,
    /// Entries waiting to be bucketed: object leaves first, then every bucket in creation order.
    /// Each pass consumes a range of it and appends its output behind that range.
    worklist: Vec<NodeId>,
}

impl Builder {
    fn new(num_finite: usize) -> Self {
        Builder {
            nodes: Vec::with_capacity(2 * num_finite + 2),
            // A reasonable guess; `append_candidate()` grows it when the guess falls short.
            worklist: Vec::with_capacity(2 * num_finite),
        }
    }

    fn push_node(&mut self, node: BvhNode) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn append_candidate(&mut self, id: NodeId) {
        let capacity = self.worklist.capacity();
        if self.worklist.len() >= capacity {
            let grown = (capacity + capacity / 2).max(BUNCHING_FACTOR);
            log::debug!("growing the bounding worklist from {} to {}", capacity, grown);
            self.worklist.reserve_exact(grown - self.worklist.len());
        }
        self.worklist.push(id);
    }

    fn bbox_of(&self, id: NodeId) -> BBox {
        self.nodes[id.index()].bbox
    }

    fn union_of(&self, ids: &[NodeId]) -> BBox {
        ids.iter()
            .fold(BBox::empty(), |b, id| bbox::union(b, self.bbox_of(*id)))
    }

    /// Repeats bucketing passes until a pass gathers its whole range into a single node, which
    /// is the root of the finite hierarchy.
    fn build_finite(&mut self, finite: Vec<(BBox, ObjectRef)>) -> Option<NodeId> {
        if finite.is_empty() {
            return None;
        }
        for (bbox, object) in finite.into_iter() {
            let leaf = self.push_node(BvhNode::new_leaf(bbox, object, false));
            self.append_candidate(leaf);
        }

        let (mut first, mut last) = (0, self.worklist.len());
        loop {
            if let Some(root) = self.bucket_range(first, last) {
                return Some(root);
            }
            // The buckets just created become the entries of the next pass.
            first = last;
            last = self.worklist.len();
        }
    }

    /// Splits `[first, last)` depth-first until every piece becomes a bucket. Returns the bucket
    /// if the whole range went into one.
    fn bucket_range(&mut self, first: usize, last: usize) -> Option<NodeId> {
        let mut whole = None;
        let mut pending = vec![(first, last)];
        while let Some((lo, hi)) = pending.pop() {
            match self.sort_and_split(lo, hi) {
                Partition::Bucket(id) if (lo, hi) == (first, last) => whole = Some(id),
                Partition::Bucket(_) | Partition::Empty => (),
                Partition::Split(mid) => {
                    // Left half first, so buckets are appended in left-to-right order.
                    pending.push((mid, hi));
                    pending.push((lo, mid));
                }
            }
        }
        whole
    }

    /// Sorts the entries along the chosen axis and finds the split that minimizes the surface
    /// area heuristic. Small ranges, and ranges no split improves on, are gathered into a bucket.
    fn sort_and_split(&mut self, first: usize, last: usize) -> Partition {
        let size = last - first;
        if size == 0 {
            return Partition::Empty;
        }
        let axis = self.find_axis(first, last);
        let nodes = &self.nodes;
        // Sorts by the box center along the axis, doubled. The sort is stable on equal keys.
        self.worklist[first..last].sort_by(|a, b| {
            let key = |id: &NodeId| {
                let bbox = nodes[id.index()].bbox;
                2.0 * bbox.lower_left()[axis] + bbox.lengths()[axis]
            };
            key(a).total_cmp(&key(b))
        });

        // area_left[i]: area of the box around entries 0 through i;
        // area_right[i]: area of the box around entries i through size-1.
        let boxes = self.worklist[first..last]
            .iter()
            .map(|id| self.bbox_of(*id))
            .collect::<Vec<_>>();
        let area_left = accumulated_areas(boxes.iter());
        let mut area_right = accumulated_areas(boxes.iter().rev());
        area_right.reverse();

        // The fewer objects a side holds and the smaller it is, the cheaper the split. Not
        // splitting at all is priced at (size - 3) times the whole area.
        let no_split_cost = area_right[0] * (size as f64 - 3.0);
        let split_costs = (0..size - 1)
            .map(|i| (i + 1) as f64 * area_left[i] + (size - 1 - i) as f64 * area_right[i + 1])
            .collect::<Vec<_>>();
        let best_split = split_costs
            .iter()
            .position_min_by(|a, b| a.total_cmp(b))
            .filter(|i| split_costs[*i] < no_split_cost);

        let split = match best_split {
            _ if size <= BUNCHING_FACTOR => None,
            Some(i) => Some(i),
            // No split beats the bucket, but the bucket would be too big: splits at the median.
            None => Some(size / 2 - 1),
        };
        match split {
            Some(i) => Partition::Split(first + i + 1),
            None => {
                let children = self.worklist[first..last].to_vec();
                let bbox = self.union_of(&children);
                let bucket = self.push_node(BvhNode {
                    bbox,
                    infinite: false,
                    content: BvhNodeContent::Split(children),
                });
                self.append_candidate(bucket);
                Partition::Bucket(bucket)
            }
        }
    }

    /// Chooses the axis along which the entries' lower corners are spread the most. Ties go to
    /// the lower axis (X, then Y, then Z).
    ///
    /// The spread is measured between lower corners at both ends, not between the true box
    /// extents. This decides the tree shape, so it must stay that way.
    fn find_axis(&self, first: usize, last: usize) -> usize {
        let mut mins = Vec3::splat(BOUND_HUGE);
        let mut maxs = Vec3::splat(-BOUND_HUGE);
        for id in self.worklist[first..last].iter() {
            let lower_left = Vec3::from(self.bbox_of(*id).lower_left());
            mins = mins.min_by_component(lower_left);
            maxs = maxs.max_by_component(lower_left);
        }
        (maxs - mins).max_dimension()
    }

    /// Wraps the infinite objects into one node flagged infinite and inserts it as the first child
    /// of the finite root. Without a finite root the wrapper is the root.
    fn graft_infinite(
        &mut self, finite_root: Option<NodeId>, infinite: Vec<(BBox, ObjectRef)>,
    ) -> Option<NodeId> {
        if infinite.is_empty() {
            return finite_root;
        }
        let leaves = infinite
            .into_iter()
            .map(|(bbox, object)| self.push_node(BvhNode::new_leaf(bbox, object, true)))
            .collect::<Vec<_>>();
        let wrapper = self.push_node(BvhNode {
            bbox: self.union_of(&leaves),
            infinite: true,
            content: BvhNodeContent::Split(leaves),
        });

        let root = match finite_root {
            None => return Some(wrapper),
            Some(root) => root,
        };
        let mut children = match &self.nodes[root.index()].content {
            BvhNodeContent::Split(children) => children.clone(),
            BvhNodeContent::Leaf(_) => vec![root],
        };
        children.insert(0, wrapper);
        let node = BvhNode {
            bbox: self.union_of(&children),
            infinite: true,
            content: BvhNodeContent::Split(children),
        };
        if self.nodes[root.index()].is_leaf() {
            Some(self.push_node(node))
        } else {
            self.nodes[root.index()] = node;
            Some(root)
        }
    }
}

/// Surface areas of the running union of `boxes`.
fn accumulated_areas<'a, I>(boxes: I) -> Vec<f64>
where
    I: Iterator<Item = &'a BBox>,
{
    boxes
        .scan(BBox::empty(), |acc, b| {
            *acc = bbox::union(*acc, *b);
            Some(acc.surface_area())
        })
        .collect()
}
