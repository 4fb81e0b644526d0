use geometry::bbox::BBox;
use math::hcm::point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tlas::{build_tree, BvhNodeContent, BvhTree, ObjectRef, BUNCHING_FACTOR};

fn random_boxes(rng: &mut StdRng, n: usize) -> Vec<(BBox, ObjectRef)> {
    (0..n)
        .map(|i| {
            let p = point3(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            );
            let size = rng.gen_range(0.1..4.0);
            let q = point3(p.x + size, p.y + size * 0.5, p.z + size * 2.0);
            (BBox::from_min_max(p, q), ObjectRef::from(i))
        })
        .collect()
}

fn sorted_objects(tree: &BvhTree) -> Vec<ObjectRef> {
    let mut objects = tree.objects();
    objects.sort();
    objects
}

/// Checks that no split node holds more than `BUNCHING_FACTOR` children, except the root and the
/// infinite wrapper.
fn check_leaf_bound(tree: &BvhTree, id: tlas::NodeId) {
    let node = tree.node(id);
    if let BvhNodeContent::Split(children) = node.content() {
        if id != tree.root_id() && !node.is_infinite() {
            assert!(
                children.len() <= BUNCHING_FACTOR,
                "node with {} children",
                children.len()
            );
        }
        for child in children.iter() {
            check_leaf_bound(tree, *child);
        }
    }
}

#[test]
fn empty_scene_has_no_tree() {
    assert!(build_tree(vec![], vec![]).is_none());
}

#[test]
fn random_trees_are_sound_and_complete() {
    let mut rng = StdRng::seed_from_u64(1);
    for &n in [1usize, 2, 4, 5, 17, 100, 1000].iter() {
        let boxes = random_boxes(&mut rng, n);
        let tree = build_tree(boxes.clone(), vec![]).unwrap();
        assert!(tree.geometric_sound());
        check_leaf_bound(&tree, tree.root_id());
        assert_eq!(tree.leaf_count(), n);
        assert_eq!(sorted_objects(&tree), (0..n).map(ObjectRef::from).collect::<Vec<_>>());

        let all = boxes.iter().fold(BBox::empty(), |acc, (b, _)| acc.union(*b));
        assert!(tree.bbox().encloses(all, 1e-9));
        assert!(all.encloses(tree.bbox(), 1e-9));
        assert!(!tree.root().is_infinite());
    }
}

#[test]
fn root_of_small_scene_is_one_bucket() {
    let boxes = (0..3)
        .map(|i| {
            let x = i as f64 * 3.0;
            (BBox::from_min_max(point3(x, 0.0, 0.0), point3(x + 1.0, 1.0, 1.0)), ObjectRef(i))
        })
        .collect::<Vec<_>>();
    let tree = build_tree(boxes, vec![]).unwrap();
    assert_eq!(tree.root().children().len(), 3);
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.node_count(), 4);
}

#[test]
fn identical_boxes_still_respect_leaf_bound() {
    let b = BBox::from_min_max(point3(0.0, 0.0, 0.0), point3(1.0, 1.0, 1.0));
    let boxes = (0..50).map(|i| (b, ObjectRef(i))).collect::<Vec<_>>();
    let tree = build_tree(boxes, vec![]).unwrap();
    check_leaf_bound(&tree, tree.root_id());
    assert_eq!(tree.leaf_count(), 50);
    assert!(tree.geometric_sound());
}

#[test]
fn infinite_objects_are_grafted_first() {
    let mut rng = StdRng::seed_from_u64(2);
    let finite = random_boxes(&mut rng, 20);
    let infinite = vec![(BBox::infinite(), ObjectRef(20)), (BBox::infinite(), ObjectRef(21))];
    let tree = build_tree(finite, infinite).unwrap();

    let root = tree.root();
    assert!(root.is_infinite());
    assert!(root.bbox().is_unbounded());
    let wrapper = tree.node(root.children()[0]);
    assert!(wrapper.is_infinite());
    let wrapped = wrapper
        .children()
        .iter()
        .map(|c| tree.node(*c).object().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(wrapped, vec![ObjectRef(20), ObjectRef(21)]);
    for c in wrapper.children() {
        assert!(tree.node(*c).is_infinite());
    }
    // The remaining children of the root are finite.
    for c in root.children()[1..].iter() {
        assert!(!tree.node(*c).is_infinite());
    }
    assert_eq!(tree.leaf_count(), 22);
    assert!(tree.geometric_sound());
}

#[test]
fn infinite_only_scene_roots_at_wrapper() {
    let tree = build_tree(vec![], vec![(BBox::infinite(), ObjectRef(0))]).unwrap();
    let root = tree.root();
    assert!(root.is_infinite());
    assert_eq!(root.children().len(), 1);
    assert_eq!(tree.node(root.children()[0]).object(), Some(ObjectRef(0)));
    assert_eq!(tree.height(), 2);
}

#[test]
fn debug_output_lists_every_leaf() {
    let boxes = (0..6)
        .map(|i| {
            let x = i as f64 * 2.0;
            (BBox::from_min_max(point3(x, 0.0, 0.0), point3(x + 1.0, 1.0, 1.0)), ObjectRef(i))
        })
        .collect::<Vec<_>>();
    let tree = build_tree(boxes, vec![(BBox::infinite(), ObjectRef(6))]).unwrap();
    let rendered = format!("{:?}", tree);
    for i in 0..7 {
        assert!(rendered.contains(&format!("leaf #{} ", i)), "{}", rendered);
    }
    assert!(rendered.contains("(infinite)"));
}
