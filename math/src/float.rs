/// Returns `(a, b)` ordered so that the first element is the lesser one.
pub fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[macro_export]
macro_rules! assert_le {
    ($left:expr, $right:expr) => {
        if $left > $right {
            panic!(
                "Assertion failed: {} <= {} (values: {} vs. {})",
                stringify!($left),
                stringify!($right),
                $left,
                $right
            )
        }
    };
}

#[test]
fn min_max_orders_pairs() {
    assert_eq!(min_max(3.0, -1.0), (-1.0, 3.0));
    assert_eq!(min_max(-1.0, 3.0), (-1.0, 3.0));
}
