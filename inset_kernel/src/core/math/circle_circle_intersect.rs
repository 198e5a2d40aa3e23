use super::Vector2;
use crate::core::traits::Real;

/// Result of intersecting two full circles.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CircleCircleIntr<T = f64>
where
    T: Real,
{
    /// Circles are apart or one is strictly nested in the other.
    NoIntersect,
    /// Circles touch at one point (externally or internally).
    Tangent(Vector2<T>),
    /// Circles cross at two points.
    TwoIntersects(Vector2<T>, Vector2<T>),
    /// Circles have the same center and radius.
    Overlapping,
}

/// Intersect the circle `(radius1, center1)` with the circle `(radius2, center2)`.
///
/// # Examples
///
/// ```
/// # use inset_kernel::core::math::*;
/// let r = circle_circle_intr(1.0, Vector2::new(0.0, 0.0), 1.0, Vector2::new(2.0, 0.0), 1e-6);
/// assert_eq!(r, CircleCircleIntr::Tangent(Vector2::new(1.0, 0.0)));
/// let r = circle_circle_intr(1.0, Vector2::new(-5.0, 0.0), 1.0, Vector2::new(2.0, 0.0), 1e-6);
/// assert_eq!(r, CircleCircleIntr::NoIntersect);
/// ```
pub fn circle_circle_intr<T>(
    radius1: T,
    center1: Vector2<T>,
    radius2: T,
    center2: Vector2<T>,
    eps: T,
) -> CircleCircleIntr<T>
where
    T: Real,
{
    let cv = center2 - center1;
    let d = cv.length();

    if d < eps {
        if radius1.fuzzy_eq_eps(radius2, eps) {
            return CircleCircleIntr::Overlapping;
        }
        return CircleCircleIntr::NoIntersect;
    }

    let radius_sum = radius1 + radius2;
    let radius_diff = (radius1 - radius2).abs();

    if d > radius_sum + eps || d < radius_diff - eps {
        return CircleCircleIntr::NoIntersect;
    }

    let dir = cv.scale(T::one() / d);

    if (d - radius_sum).abs() < eps {
        return CircleCircleIntr::Tangent(center1 + dir.scale(radius1));
    }

    if (d - radius_diff).abs() < eps {
        let p = if radius1 > radius2 {
            center1 + dir.scale(radius1)
        } else {
            center1 - dir.scale(radius1)
        };
        return CircleCircleIntr::Tangent(p);
    }

    let a = (radius1 * radius1 - radius2 * radius2 + d * d) / (T::two() * d);
    let h = num_traits::real::Real::max(radius1 * radius1 - a * a, T::zero()).sqrt();
    let mid = center1 + dir.scale(a);
    let offset = dir.perp().scale(h);

    CircleCircleIntr::TwoIntersects(mid + offset, mid - offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_unit_circles() {
        let r = circle_circle_intr(1.0, Vector2::new(0.0, 1.0), 1.0, Vector2::new(1.0, 0.0), 1e-6);
        match r {
            CircleCircleIntr::TwoIntersects(p1, p2) => {
                assert!(p1.fuzzy_eq(Vector2::new(1.0, 1.0)));
                assert!(p2.fuzzy_eq(Vector2::new(0.0, 0.0)));
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn internal_tangent() {
        let r = circle_circle_intr(1.0, Vector2::new(1.0, 0.0), 2.0, Vector2::new(0.0, 0.0), 1e-6);
        match r {
            CircleCircleIntr::Tangent(p) => assert!(p.fuzzy_eq(Vector2::new(2.0, 0.0))),
            r => panic!("unexpected result: {:?}", r),
        }
        let r = circle_circle_intr(2.0, Vector2::new(0.0, 0.0), 1.0, Vector2::new(1.0, 0.0), 1e-6);
        match r {
            CircleCircleIntr::Tangent(p) => assert!(p.fuzzy_eq(Vector2::new(2.0, 0.0))),
            r => panic!("unexpected result: {:?}", r),
        }
    }

    #[test]
    fn nested_and_same() {
        let c = Vector2::new(0.0, 0.0);
        assert_eq!(
            circle_circle_intr(3.0, c, 1.0, Vector2::new(0.5, 0.0), 1e-6),
            CircleCircleIntr::NoIntersect
        );
        assert_eq!(circle_circle_intr(1.0, c, 1.0, c, 1e-6), CircleCircleIntr::Overlapping);
        assert_eq!(circle_circle_intr(1.0, c, 2.0, c, 1e-6), CircleCircleIntr::NoIntersect);
    }
}
