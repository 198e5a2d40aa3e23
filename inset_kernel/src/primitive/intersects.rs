use super::{dedup_points, CirclePrimitive, LinePrimitive, Primitive};
use crate::core::{
    math::{
        circle_circle_intr, line_circle_intr, line_line_intr, CircleCircleIntr, LineCircleIntr,
        LineLineIntr, Vector2,
    },
    traits::Real,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerances used when intersecting primitives.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct IntersectOptions<T = f64> {
    /// Fuzzy epsilon used for coincidence, tangency and limit tests.
    pub pos_equal_eps: T,
    /// Number of decimals kept by the coordinate keys used to deduplicate hits.
    pub key_decimals: u32,
}

impl<T> IntersectOptions<T>
where
    T: Real,
{
    pub fn new() -> Self {
        Self {
            pos_equal_eps: T::from(1e-6).unwrap(),
            key_decimals: 5,
        }
    }
}

impl<T> Default for IntersectOptions<T>
where
    T: Real,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Points where two primitives meet, restricted to both limits and deduplicated.
///
/// # Examples
///
/// ```
/// # use inset_kernel::primitive::*;
/// # use inset_kernel::core::math::*;
/// let opts = IntersectOptions::new();
/// let a = Primitive::Circle(CirclePrimitive::full(Vector2::new(0.0, 0.0), 1.0));
/// let b = Primitive::Circle(CirclePrimitive::full(Vector2::new(2.0, 0.0), 1.0));
/// assert_eq!(intersections(&a, &b, &opts), vec![Vector2::new(1.0, 0.0)]);
/// ```
pub fn intersections<T>(a: &Primitive<T>, b: &Primitive<T>, options: &IntersectOptions<T>) -> Vec<Vector2<T>>
where
    T: Real,
{
    match (a, b) {
        (Primitive::Line(l1), Primitive::Line(l2)) => line_line(l1, l2, options),
        (Primitive::Line(l), Primitive::Circle(c)) | (Primitive::Circle(c), Primitive::Line(l)) => {
            line_circle(l, c, options)
        }
        (Primitive::Circle(c1), Primitive::Circle(c2)) => circle_circle(c1, c2, options),
    }
}

/// Limit end points of `a` inside `b` plus those of `b` inside `a`, for overlapping primitives.
fn overlap_points<T, A, B>(
    a_points: Option<(Vector2<T>, Vector2<T>)>,
    a_within: A,
    b_points: Option<(Vector2<T>, Vector2<T>)>,
    b_within: B,
    options: &IntersectOptions<T>,
) -> Vec<Vector2<T>>
where
    T: Real,
    A: Fn(Vector2<T>) -> bool,
    B: Fn(Vector2<T>) -> bool,
{
    let mut result = Vec::new();
    if let Some((p0, p1)) = a_points {
        result.extend([p0, p1].into_iter().filter(|&p| b_within(p)));
    }
    if let Some((p0, p1)) = b_points {
        result.extend([p0, p1].into_iter().filter(|&p| a_within(p)));
    }
    dedup_points(&mut result, options.key_decimals, options.pos_equal_eps);
    result
}

/// Intersect two line primitives.
///
/// Coincident lines return the overlapping limit end points (nothing when either line is
/// unlimited on both sides of the overlap).
pub fn line_line<T>(l1: &LinePrimitive<T>, l2: &LinePrimitive<T>, options: &IntersectOptions<T>) -> Vec<Vector2<T>>
where
    T: Real,
{
    let eps = options.pos_equal_eps;
    match line_line_intr(&l1.eq, &l2.eq, eps) {
        LineLineIntr::Parallel => Vec::new(),
        LineLineIntr::Point(p) => {
            if l1.within_limit(p, eps) && l2.within_limit(p, eps) {
                vec![p]
            } else {
                Vec::new()
            }
        }
        LineLineIntr::Coincident => overlap_points(
            l1.limit_points(),
            |p| l1.within_limit(p, eps),
            l2.limit_points(),
            |p| l2.within_limit(p, eps),
            options,
        ),
    }
}

/// Intersect a line primitive with a circle primitive.
pub fn line_circle<T>(l: &LinePrimitive<T>, c: &CirclePrimitive<T>, options: &IntersectOptions<T>) -> Vec<Vector2<T>>
where
    T: Real,
{
    let eps = options.pos_equal_eps;
    let keep = |p: &Vector2<T>| l.within_limit(*p, eps) && c.within_limit(*p, eps);
    let mut result: Vec<Vector2<T>> = match line_circle_intr(&l.eq, c.radius, c.center, eps) {
        LineCircleIntr::NoIntersect => Vec::new(),
        LineCircleIntr::Tangent(p) => vec![p],
        LineCircleIntr::TwoIntersects(p1, p2) => vec![p1, p2],
    };
    result.retain(keep);
    dedup_points(&mut result, options.key_decimals, eps);
    result
}

/// Intersect two circle primitives.
///
/// Identical circles return the limit end points that fall on the other arc.
pub fn circle_circle<T>(
    c1: &CirclePrimitive<T>,
    c2: &CirclePrimitive<T>,
    options: &IntersectOptions<T>,
) -> Vec<Vector2<T>>
where
    T: Real,
{
    let eps = options.pos_equal_eps;
    let mut result = match circle_circle_intr(c1.radius, c1.center, c2.radius, c2.center, eps) {
        CircleCircleIntr::NoIntersect => Vec::new(),
        CircleCircleIntr::Tangent(p) => vec![p],
        CircleCircleIntr::TwoIntersects(p1, p2) => vec![p1, p2],
        CircleCircleIntr::Overlapping => {
            return overlap_points(
                c1.limit_points(),
                |p| c1.within_limit(p, eps),
                c2.limit_points(),
                |p| c2.within_limit(p, eps),
                options,
            );
        }
    };
    result.retain(|&p| c1.within_limit(p, eps) && c2.within_limit(p, eps));
    dedup_points(&mut result, options.key_decimals, eps);
    result
}
