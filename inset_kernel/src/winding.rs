//! Point membership by horizontal ray casting.
//!
//! A ray is cast from the query point toward +x and every boundary crossing is classified as
//! going `up` (boundary moving toward increasing y) or down. Crossings are counted with half open
//! rules so that a ray grazing a vertex or an extreme point of an arc counts consistently:
//!
//! * horizontal lines never count,
//! * a line crossing at its end point counts only when it moves down, at its start only when it
//!   moves up (so the end with the largest y is never counted),
//! * an arc touching the ray at its largest y (the bottom on screen) never counts,
//! * an arc touching the ray at its smallest y counts `+1` when it starts there and `-1` when it
//!   ends there.
//!
//! Clockwise shapes therefore have a positive winding number for points inside them.
use crate::{
    core::{math::Vector2, traits::Real},
    primitive::{shape_primitives, CirclePrimitive, Primitive},
    segment::{seg_closest_point, shape_spans, Segment},
};

/// One classified crossing of the ray with the boundary.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WindingCrossing<T = f64> {
    pub point: Vector2<T>,
    pub segment_index: usize,
    /// `true` when the boundary moves toward increasing y at the crossing.
    pub up: bool,
}

/// Crossings of the ray cast from `point` with a line segment from `start` to `end`.
fn line_crossing<T>(point: Vector2<T>, start: Vector2<T>, end: Vector2<T>, eps: T) -> Option<(Vector2<T>, bool)>
where
    T: Real,
{
    let dy = end.y - start.y;
    if dy.abs() < eps {
        return None;
    }

    let (min_y, max_y) = crate::core::math::min_max(start.y, end.y);
    if !point.y.fuzzy_in_range_eps(min_y, max_y, eps) {
        return None;
    }

    let up = dy > T::zero();
    let at_start = (point.y - start.y).abs() < eps;
    let at_end = (point.y - end.y).abs() < eps;
    if (at_end && up) || (at_start && !up) {
        return None;
    }

    let x = if at_start {
        start.x
    } else if at_end {
        end.x
    } else {
        start.x + (point.y - start.y) * (end.x - start.x) / dy
    };

    if x <= point.x {
        return None;
    }

    Some((Vector2::new(x, point.y), up))
}

/// Crossings of the ray cast from `point` with an arc (or full circle).
fn arc_crossings<T>(
    point: Vector2<T>,
    start: Vector2<T>,
    end: Vector2<T>,
    clockwise: bool,
    circle: &CirclePrimitive<T>,
    eps: T,
    out: &mut Vec<(Vector2<T>, bool)>,
) where
    T: Real,
{
    let center = circle.center;
    let r = circle.radius;
    let dy = point.y - center.y;
    if dy.abs() > r + eps {
        return;
    }

    let full = circle.limit.is_none();

    if (r - dy.abs()).abs() < eps {
        // ray touches the top or bottom of the circle
        let touch = Vector2::new(center.x, center.y + if dy > T::zero() { r } else { -r });
        if dy > T::zero() || full || touch.x <= point.x || !circle.within_limit(touch, eps) {
            return;
        }
        let starts_here = touch.fuzzy_eq_eps(start, eps);
        let ends_here = touch.fuzzy_eq_eps(end, eps);
        if starts_here && !ends_here {
            out.push((touch, true));
        } else if ends_here && !starts_here {
            out.push((touch, false));
        }
        return;
    }

    let half = num_traits::real::Real::max(r * r - dy * dy, T::zero()).sqrt();
    for hit in [
        Vector2::new(center.x - half, point.y),
        Vector2::new(center.x + half, point.y),
    ] {
        if hit.x <= point.x || !circle.within_limit(hit, eps) {
            continue;
        }
        // tangent y component is cos(angle) for clockwise travel
        let right_side = hit.x > center.x;
        let up = right_side == clockwise;
        if !full {
            let at_start = hit.fuzzy_eq_eps(start, eps);
            let at_end = hit.fuzzy_eq_eps(end, eps);
            if (at_end && up) || (at_start && !up) {
                continue;
            }
        }
        out.push((hit, up));
    }
}

/// All classified crossings of the +x ray from `point` with `shape` whose `primitives` were built
/// with [shape_primitives].
pub fn winding_crossings_with<T>(
    point: Vector2<T>,
    shape: &[Segment<T>],
    primitives: &[Primitive<T>],
    eps: T,
) -> Vec<WindingCrossing<T>>
where
    T: Real,
{
    let mut result = Vec::new();
    let mut hits = Vec::with_capacity(2);
    for (i, ((start, seg), prim)) in shape_spans(shape).zip(primitives).enumerate() {
        hits.clear();
        match (seg, prim) {
            (Segment::Line { to }, _) => {
                if let Some(hit) = line_crossing(point, start, *to, eps) {
                    hits.push(hit);
                }
            }
            (Segment::Arc { to, clockwise, .. }, Primitive::Circle(circle)) => {
                arc_crossings(point, start, *to, *clockwise, circle, eps, &mut hits);
            }
            (Segment::Arc { .. }, Primitive::Line(_)) => {
                debug_assert!(false, "arc segment paired with a line primitive");
            }
        }
        result.extend(hits.iter().map(|&(p, up)| WindingCrossing {
            point: p,
            segment_index: i,
            up,
        }));
    }

    result
}

/// All classified crossings of the +x ray from `point` with `shape`.
pub fn winding_crossings<T>(point: Vector2<T>, shape: &[Segment<T>], eps: T) -> Vec<WindingCrossing<T>>
where
    T: Real,
{
    let primitives = shape_primitives(shape, eps);
    winding_crossings_with(point, shape, &primitives, eps)
}

/// Signed sum of the crossings (`+1` up, `-1` down).
///
/// # Examples
///
/// ```
/// # use inset_kernel::shape_closed;
/// # use inset_kernel::core::math::*;
/// # use inset_kernel::winding::*;
/// let square = shape_closed![line(10.0, 0.0), line(10.0, 10.0), line(0.0, 10.0), line(0.0, 0.0)];
/// assert_eq!(winding_number(Vector2::new(5.0, 5.0), &square, 1e-6), 1);
/// assert_eq!(winding_number(Vector2::new(15.0, 5.0), &square, 1e-6), 0);
/// // ray passing exactly through two corners
/// assert_eq!(winding_number(Vector2::new(-5.0, 0.0), &square, 1e-6), 0);
/// ```
pub fn winding_number<T>(point: Vector2<T>, shape: &[Segment<T>], eps: T) -> i32
where
    T: Real,
{
    sum_crossings(&winding_crossings(point, shape, eps))
}

#[inline]
fn sum_crossings<T>(crossings: &[WindingCrossing<T>]) -> i32
where
    T: Real,
{
    crossings.iter().map(|c| if c.up { 1 } else { -1 }).sum()
}

/// Returns true if `point` is inside the clockwise `shape` (positive winding number).
///
/// Points on the boundary give an unspecified answer, see [point_on_boundary].
pub fn inside_path<T>(point: Vector2<T>, shape: &[Segment<T>], eps: T) -> bool
where
    T: Real,
{
    winding_number(point, shape, eps) > 0
}

/// Same as [inside_path] reusing prebuilt primitives.
pub fn inside_path_with<T>(
    point: Vector2<T>,
    shape: &[Segment<T>],
    primitives: &[Primitive<T>],
    eps: T,
) -> bool
where
    T: Real,
{
    sum_crossings(&winding_crossings_with(point, shape, primitives, eps)) > 0
}

/// Returns true if `point` lies within `eps` of the boundary of `shape`.
pub fn point_on_boundary<T>(point: Vector2<T>, shape: &[Segment<T>], eps: T) -> bool
where
    T: Real,
{
    shape_spans(shape).any(|(start, seg)| (seg_closest_point(start, seg, point) - point).length() < eps)
}

/// Returns true if `point` is inside `shape` and not on its boundary.
pub fn strictly_inside<T>(point: Vector2<T>, shape: &[Segment<T>], eps: T) -> bool
where
    T: Real,
{
    !point_on_boundary(point, shape, eps) && inside_path(point, shape, eps)
}
