pub mod object;
pub mod preset;

use geometry::bbox::BBox;
use geometry::camera::Camera;
use geometry::ray::Ray;
use math::hcm::Point3;
use tlas::{BvhTree, Intersection, ObjectRef, TraceContext};

pub use object::SceneObject;

/// Controls whether and when a scene builds its bounding hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// Builds the hierarchy at all. Without it every ray is tested against every object.
    pub bounding: bool,
    /// Minimum number of objects for which the hierarchy is worth building.
    pub bounding_threshold: usize,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            bounding: true,
            bounding_threshold: 3,
        }
    }
}

pub struct Scene {
    objects: Vec<SceneObject>,
    tree: Option<BvhTree>,
    pub camera: Camera,
}

impl Scene {
    /// Collects the objects and bounds them according to `options`. Objects are addressed by
    /// their position in `objects` from here on.
    pub fn new(objects: Vec<SceneObject>, camera: Camera, options: SceneOptions) -> Self {
        let tree = if options.bounding && objects.len() >= options.bounding_threshold {
            Self::bound(&objects)
        } else {
            log::info!(
                "intersecting {} objects by linear scan (bounding = {}, threshold = {})",
                objects.len(),
                options.bounding,
                options.bounding_threshold
            );
            None
        };
        Scene {
            objects,
            tree,
            camera,
        }
    }

    fn bound(objects: &[SceneObject]) -> Option<BvhTree> {
        let mut finite = vec![];
        let mut infinite = vec![];
        for (i, object) in objects.iter().enumerate() {
            let entry = (object.bbox(), ObjectRef::from(i));
            if object.is_infinite() {
                infinite.push(entry);
            } else {
                finite.push(entry);
            }
        }
        let tree = tlas::build_tree(finite, infinite)?;
        log::info!(
            "hierarchy over {} objects: {} leaves, {} nodes, height {}",
            objects.len(),
            tree.leaf_count(),
            tree.node_count(),
            tree.height()
        );
        Some(tree)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }
    pub fn object(&self, id: ObjectRef) -> &SceneObject {
        &self.objects[id.index()]
    }
    /// Returns the bounding hierarchy, or `None` if the scene is intersected by linear scan.
    pub fn tree(&self) -> Option<&BvhTree> {
        self.tree.as_ref()
    }
    pub fn bbox(&self) -> BBox {
        self.objects
            .iter()
            .fold(BBox::empty(), |b, object| b.union(object.bbox()))
    }

    fn test_object(&self, ray: &Ray, id: ObjectRef, candidate: &mut Intersection) -> bool {
        match self.object(id).intersect(ray) {
            Some(hit) => {
                *candidate = Intersection::new(hit.depth, hit.pos, hit.normal);
                true
            }
            None => false,
        }
    }

    /// Nearest-hit search shared by all queries. Without a hierarchy, every object passing
    /// `precondition` is tested.
    fn nearest_filtered<Pre>(
        &self, ray: &Ray, best: &mut Intersection, ctx: &mut TraceContext, precondition: Pre,
    ) -> bool
    where
        Pre: Fn(&Ray, ObjectRef) -> bool,
    {
        let test_leaf = |r: &Ray, id: ObjectRef, c: &mut Intersection| self.test_object(r, id, c);
        if let Some(tree) = &self.tree {
            let postcondition = |_: &Ray, _: ObjectRef| true;
            return tree.find_nearest_filtered(ray, best, ctx, test_leaf, precondition, postcondition);
        }
        let mut found = false;
        for id in (0..self.objects.len()).map(ObjectRef::from) {
            if !precondition(ray, id) {
                continue;
            }
            ctx.stats.leaf_tests += 1;
            let mut candidate = Intersection::none();
            if test_leaf(ray, id, &mut candidate) {
                ctx.stats.leaf_hits += 1;
                if candidate.depth < best.depth {
                    *best = Intersection {
                        object: Some(id),
                        ..candidate
                    };
                    found = true;
                }
            }
        }
        found
    }

    /// Finds the nearest object hit by `ray`.
    pub fn intersect(&self, ray: &Ray, ctx: &mut TraceContext) -> Option<Intersection> {
        let mut best = Intersection::none();
        if self.nearest_filtered(ray, &mut best, ctx, |_, _| true) {
            Some(best)
        } else {
            None
        }
    }

    /// Finds an object casting a shadow on `ray` closer than `max_depth`. Objects flagged
    /// `no_shadow` are skipped without being tested.
    pub fn shadow_hit(
        &self, ray: &Ray, max_depth: f64, ctx: &mut TraceContext,
    ) -> Option<Intersection> {
        let mut best = Intersection {
            depth: max_depth,
            ..Intersection::none()
        };
        self.nearest_filtered(ray, &mut best, ctx, |_, id| self.object(id).casts_shadow());
        best.within(max_depth)
    }

    /// Returns every object whose solid contains `p`, in ascending order.
    pub fn inside(&self, p: Point3) -> Vec<ObjectRef> {
        let mut found = vec![];
        match &self.tree {
            Some(tree) => tree.for_each_containing(p, |id| {
                if self.object(id).inside(p) {
                    found.push(id);
                }
            }),
            None => found.extend(
                (0..self.objects.len())
                    .map(ObjectRef::from)
                    .filter(|id| self.object(*id).inside(p)),
            ),
        }
        found.sort();
        found
    }
}
