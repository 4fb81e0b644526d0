use geometry::bbox::{self, BBox, BOUND_HUGE};
use math::hcm::{point3, Point3};

fn unit_box_at(x: f64) -> BBox {
    BBox::from_min_max(point3(x, 0.0, 0.0), point3(x + 1.0, 1.0, 1.0))
}

#[test]
fn union_with_empty_is_identity() {
    let b = unit_box_at(3.0);
    assert_eq!(BBox::empty().union(b), b);
    assert_eq!(b.union(BBox::empty()), b);
    assert!(BBox::empty().union(BBox::empty()).is_empty());
}

#[test]
fn union_covers_both_boxes() {
    let b0 = unit_box_at(0.0);
    let b1 = BBox::from_min_max(point3(5.0, -2.0, 0.5), point3(6.0, 0.5, 3.0));
    let u = bbox::union(b0, b1);
    assert_eq!(u.min(), point3(0.0, -2.0, 0.0));
    assert_eq!(u.max(), point3(6.0, 1.0, 3.0));
    assert!(u.encloses(b0, 0.0));
    assert!(u.encloses(b1, 0.0));
    assert!(!b0.encloses(u, 0.0));
}

#[test]
fn surface_area_of_boxes() {
    assert_eq!(unit_box_at(-4.0).surface_area(), 6.0);
    let slab = BBox::from_min_max(point3(0.0, 0.0, 0.0), point3(2.0, 3.0, 0.0));
    assert_eq!(slab.surface_area(), 12.0);
    assert!(!slab.is_empty());
    assert_eq!(BBox::empty().surface_area(), 0.0);
}

#[test]
fn degenerate_boxes_are_empty() {
    let p = point3(1.0, 2.0, 3.0);
    assert!(BBox::from_min_max(p, p).is_empty());
    let inverted = BBox::from_min_max(point3(1.0, 0.0, 0.0), point3(0.0, 1.0, 1.0));
    assert!(inverted.is_empty());
    assert_eq!(inverted.union(unit_box_at(0.0)), unit_box_at(0.0));
}

#[test]
fn infinite_box_is_clamped() {
    let inf = BBox::infinite();
    assert!(inf.is_unbounded());
    assert_eq!(inf.max(), point3(BOUND_HUGE * 0.5, BOUND_HUGE * 0.5, BOUND_HUGE * 0.5));
    let clamped = BBox::from_min_max(
        point3(-1e30, 0.0, 0.0),
        Point3::new(f64::INFINITY, 1.0, 1.0),
    );
    assert_eq!(clamped.min().x, -BOUND_HUGE * 0.5);
    assert_eq!(clamped.max().x, BOUND_HUGE * 0.5);
    // Sums of two clamped coordinates stay finite.
    assert!((clamped.max().x + inf.max().x).is_finite());
    assert!(inf.union(unit_box_at(1e12)).max().x <= BOUND_HUGE * 0.5);
}

#[test]
fn contains_is_closed() {
    let b = unit_box_at(0.0);
    assert!(b.contains(point3(0.0, 0.0, 0.0)));
    assert!(b.contains(point3(1.0, 1.0, 1.0)));
    assert!(b.contains(b.center()));
    assert!(!b.contains(point3(1.0 + 1e-9, 0.5, 0.5)));
}

#[test]
fn from_corners_orders_points() {
    let b = BBox::from_corners(point3(2.0, -1.0, 4.0), point3(-2.0, 1.0, 0.0));
    assert_eq!(b.min(), point3(-2.0, -1.0, 0.0));
    assert_eq!(b.max(), point3(2.0, 1.0, 4.0));
    assert_eq!(b.lengths().x, 4.0);
}

#[test]
fn all_corners_span_the_box() {
    let b = BBox::from_min_max(point3(1.0, 2.0, 3.0), point3(2.0, 4.0, 6.0));
    let corners = b.all_corners();
    assert_eq!(corners[0], b.min());
    assert_eq!(corners[7], b.max());
    assert_eq!(corners[1], point3(2.0, 2.0, 3.0));
    assert_eq!(corners[6], point3(1.0, 4.0, 6.0));
    for c in corners.iter() {
        assert!(b.contains(*c), "corner {}", c);
    }
    let rebuilt = corners.iter().fold(BBox::empty(), |acc, c| acc.union_point(*c));
    assert_eq!(rebuilt, b);
}
