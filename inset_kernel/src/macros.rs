/// Panics unless `left` and `right` are fuzzy equal, optionally with an explicit tolerance.
#[doc(hidden)]
#[macro_export]
macro_rules! assert_fuzzy_eq {
    ($left:expr, $right:expr $(,)?) => {{
        let (left, right) = ($left, $right);
        assert!(
            left.fuzzy_eq(right),
            "fuzzy equality failed\n  left: {:?}\n right: {:?}",
            left,
            right
        );
    }};
    ($left:expr, $right:expr, $eps:expr $(,)?) => {{
        let (left, right, eps) = ($left, $right, $eps);
        assert!(
            left.fuzzy_eq_eps(right, eps),
            "fuzzy equality failed\n  left: {:?}\n right: {:?}\n   eps: {:?}",
            left,
            right,
            eps
        );
    }};
}

/// Construct a closed shape (`Vec<Segment>`) from a list of segment descriptions.
///
/// * `line(x, y)` - straight segment ending at `(x, y)`
/// * `cw(cx, cy, x, y)` - clockwise arc around `(cx, cy)` ending at `(x, y)`
/// * `ccw(cx, cy, x, y)` - counter clockwise arc around `(cx, cy)` ending at `(x, y)`
///
/// The first segment starts at the end of the last one.
///
/// # Examples
///
/// ```
/// # use inset_kernel::shape_closed;
/// # use inset_kernel::segment::*;
/// # use inset_kernel::core::math::Vector2;
/// let shape = shape_closed![line(10.0, 0.0), line(10.0, 10.0), cw(5.0, 10.0, 0.0, 10.0), line(0.0, 0.0)];
/// assert_eq!(shape.len(), 4);
/// assert_eq!(shape[0], Segment::Line { to: Vector2::new(10.0, 0.0) });
/// assert!(matches!(shape[2], Segment::Arc { clockwise: true, .. }));
/// ```
#[macro_export]
macro_rules! shape_closed {
    (@seg line($x:expr, $y:expr)) => {
        $crate::segment::Segment::Line {
            to: $crate::core::math::Vector2::new($x, $y),
        }
    };
    (@seg cw($cx:expr, $cy:expr, $x:expr, $y:expr)) => {
        $crate::segment::Segment::Arc {
            center: $crate::core::math::Vector2::new($cx, $cy),
            to: $crate::core::math::Vector2::new($x, $y),
            clockwise: true,
        }
    };
    (@seg ccw($cx:expr, $cy:expr, $x:expr, $y:expr)) => {
        $crate::segment::Segment::Arc {
            center: $crate::core::math::Vector2::new($cx, $cy),
            to: $crate::core::math::Vector2::new($x, $y),
            clockwise: false,
        }
    };
    ($($kind:ident($($arg:expr),+ $(,)?)),* $(,)?) => {
        vec![$($crate::shape_closed!(@seg $kind($($arg),+))),*]
    };
}
