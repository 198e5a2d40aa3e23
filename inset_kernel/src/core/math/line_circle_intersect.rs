use super::{LineEq, Vector2};
use crate::core::traits::Real;

/// Result of intersecting an infinite line with a full circle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LineCircleIntr<T = f64>
where
    T: Real,
{
    NoIntersect,
    /// Line touches the circle at exactly one point.
    Tangent(Vector2<T>),
    /// Line crosses the circle, points ordered along [LineEq::direction].
    TwoIntersects(Vector2<T>, Vector2<T>),
}

/// Intersect an infinite line with the circle defined by `radius` and `center`.
///
/// Works from the perpendicular foot of the center onto the line, which keeps vertical lines,
/// horizontal lines through a circle's extreme points and near tangency exact. Tangency is
/// detected with `eps` and always reported as a single point.
///
/// # Examples
///
/// ```
/// # use inset_kernel::core::math::*;
/// let center = Vector2::new(0.0, 0.0);
/// // horizontal line touching the top of the circle
/// let top = LineEq::Sloped { m: 0.0, b: -1.0 };
/// assert_eq!(line_circle_intr(&top, 1.0, center, 1e-6), LineCircleIntr::Tangent(Vector2::new(0.0, -1.0)));
/// let far = LineEq::Vertical { x: 3.0 };
/// assert_eq!(line_circle_intr(&far, 1.0, center, 1e-6), LineCircleIntr::NoIntersect);
/// ```
pub fn line_circle_intr<T>(
    line: &LineEq<T>,
    radius: T,
    center: Vector2<T>,
    eps: T,
) -> LineCircleIntr<T>
where
    T: Real,
{
    let foot = line.foot_point(center);
    let dist = (foot - center).length();

    if dist > radius + eps {
        return LineCircleIntr::NoIntersect;
    }

    if (dist - radius).abs() < eps {
        return LineCircleIntr::Tangent(foot);
    }

    let half_chord = num_traits::real::Real::max(radius * radius - dist * dist, T::zero()).sqrt();
    let dir = line.direction();
    LineCircleIntr::TwoIntersects(foot - dir.scale(half_chord), foot + dir.scale(half_chord))
}
