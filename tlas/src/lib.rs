//! Top-level acceleration structure: a bounding volume hierarchy over scene objects, built with
//! the surface area heuristic and traversed nearest-first with a priority queue.

pub mod build;
pub mod bvh;
pub mod intersection;
pub mod queue;
pub mod traverse;

pub use build::{build_tree, BUNCHING_FACTOR};
pub use bvh::{BvhNode, BvhNodeContent, BvhTree, NodeId, ObjectRef};
pub use intersection::Intersection;
pub use queue::{PriorityQueue, INITIAL_QUEUE_SIZE};
pub use traverse::{TraceContext, TraversalStats, EPSILON, MAX_DISTANCE};
