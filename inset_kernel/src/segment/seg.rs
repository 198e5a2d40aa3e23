use super::Segment;
use crate::core::{
    math::{
        angle, angle_is_between, line_seg_closest_point, midpoint, min_max, normalize_radians,
        point_on_circle, Vector2,
    },
    traits::Real,
};
use static_aabb2d_index::AABB;

/// Radius of the arc `seg` starting at `start`, averaged over both end points.
#[inline]
pub fn arc_radius<T>(start: Vector2<T>, center: Vector2<T>, to: Vector2<T>) -> T
where
    T: Real,
{
    ((start - center).length() + (to - center).length()) / T::two()
}

/// Returns true if the segment is an arc closing on itself (start equals end).
#[inline]
pub fn seg_is_full_circle<T>(start: Vector2<T>, seg: &Segment<T>, eps: T) -> bool
where
    T: Real,
{
    match *seg {
        Segment::Line { .. } => false,
        Segment::Arc { center, to, .. } => {
            start.fuzzy_eq_eps(to, eps) && (to - center).length() > eps
        }
    }
}

/// Signed sweep angle of the segment, positive for clockwise arcs and zero for lines.
///
/// Full circles return `+-2PI`.
///
/// # Examples
///
/// ```
/// # use inset_kernel::segment::*;
/// # use inset_kernel::core::math::*;
/// # use inset_kernel::core::traits::*;
/// use std::f64::consts::PI;
/// // quarter circle going from the right of the center to below it
/// let seg = Segment::arc(Vector2::new(0.0, 0.0), Vector2::new(0.0, 1.0), true);
/// assert!(seg_sweep(Vector2::new(1.0, 0.0), &seg).fuzzy_eq(PI / 2.0));
/// let seg = Segment::arc(Vector2::new(0.0, 0.0), Vector2::new(0.0, 1.0), false);
/// assert!(seg_sweep(Vector2::new(1.0, 0.0), &seg).fuzzy_eq(-3.0 * PI / 2.0));
/// ```
pub fn seg_sweep<T>(start: Vector2<T>, seg: &Segment<T>) -> T
where
    T: Real,
{
    match *seg {
        Segment::Line { .. } => T::zero(),
        Segment::Arc {
            center,
            to,
            clockwise,
        } => {
            if start.fuzzy_eq(to) {
                return if clockwise { T::tau() } else { -T::tau() };
            }
            let a0 = angle(center, start);
            let a1 = angle(center, to);
            if clockwise {
                normalize_radians(a1 - a0)
            } else {
                -normalize_radians(a0 - a1)
            }
        }
    }
}

/// Path length of the segment.
pub fn seg_length<T>(start: Vector2<T>, seg: &Segment<T>) -> T
where
    T: Real,
{
    match *seg {
        Segment::Line { to } => (to - start).length(),
        Segment::Arc { center, to, .. } => {
            arc_radius(start, center, to) * seg_sweep(start, seg).abs()
        }
    }
}

/// Point at the fraction `t` (0 = start, 1 = end) of the segment's length.
pub fn seg_point_at<T>(start: Vector2<T>, seg: &Segment<T>, t: T) -> Vector2<T>
where
    T: Real,
{
    match *seg {
        Segment::Line { to } => start + (to - start).scale(t),
        Segment::Arc { center, to, .. } => {
            let r = arc_radius(start, center, to);
            point_on_circle(r, center, angle(center, start) + seg_sweep(start, seg) * t)
        }
    }
}

/// Midpoint along the segment's path.
///
/// # Examples
///
/// ```
/// # use inset_kernel::segment::*;
/// # use inset_kernel::core::math::*;
/// // counter clockwise half circle from (0, 0) to (2, 0) dips below its center on screen
/// let seg = Segment::arc(Vector2::new(1.0, 0.0), Vector2::new(2.0, 0.0), false);
/// assert!(seg_midpoint(Vector2::new(0.0, 0.0), &seg).fuzzy_eq(Vector2::new(1.0, 1.0)));
/// ```
pub fn seg_midpoint<T>(start: Vector2<T>, seg: &Segment<T>) -> Vector2<T>
where
    T: Real,
{
    match *seg {
        Segment::Line { to } => midpoint(start, to),
        Segment::Arc { .. } => seg_point_at(start, seg, T::half()),
    }
}

/// Direction of travel (angle in `[0, 2PI)`) when passing through `point` on the segment.
pub fn seg_tangent_at<T>(start: Vector2<T>, seg: &Segment<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    match *seg {
        Segment::Line { to } => normalize_radians(angle(start, to)) % T::tau(),
        Segment::Arc {
            center, clockwise, ..
        } => {
            let radial = angle(center, point);
            let dir = if clockwise {
                radial + T::half_pi()
            } else {
                radial - T::half_pi()
            };
            normalize_radians(dir) % T::tau()
        }
    }
}

/// Direction of travel leaving the start of the segment.
#[inline]
pub fn seg_start_tangent<T>(start: Vector2<T>, seg: &Segment<T>) -> T
where
    T: Real,
{
    seg_tangent_at(start, seg, start)
}

/// Direction of travel arriving at the end of the segment.
#[inline]
pub fn seg_end_tangent<T>(start: Vector2<T>, seg: &Segment<T>) -> T
where
    T: Real,
{
    seg_tangent_at(start, seg, seg.to())
}

/// Axis aligned bounding box of the segment, exact for arcs.
pub fn seg_bounding_box<T>(start: Vector2<T>, seg: &Segment<T>) -> AABB<T>
where
    T: Real,
{
    let to = seg.to();
    let (min_x, max_x) = min_max(start.x, to.x);
    let (min_y, max_y) = min_max(start.y, to.y);
    let Segment::Arc {
        center, clockwise, ..
    } = *seg
    else {
        return AABB::new(min_x, min_y, max_x, max_y);
    };

    let r = arc_radius(start, center, to);
    if start.fuzzy_eq(to) {
        return AABB::new(center.x - r, center.y - r, center.x + r, center.y + r);
    }

    // swept range always expressed toward increasing angle
    let (lo, hi) = if clockwise {
        (angle(center, start), angle(center, to))
    } else {
        (angle(center, to), angle(center, start))
    };
    let crosses = |a: T| angle_is_between(a, lo, hi);

    let min_x = if crosses(T::pi()) {
        center.x - r
    } else {
        min_x
    };
    let min_y = if crosses(-T::half_pi()) {
        center.y - r
    } else {
        min_y
    };
    let max_x = if crosses(T::zero()) {
        center.x + r
    } else {
        max_x
    };
    let max_y = if crosses(T::half_pi()) {
        center.y + r
    } else {
        max_y
    };

    AABB::new(min_x, min_y, max_x, max_y)
}

/// Tests if the polar angle `a` (around the arc's center) is covered by the arc.
fn arc_covers_angle<T>(start: Vector2<T>, center: Vector2<T>, to: Vector2<T>, clockwise: bool, a: T) -> bool
where
    T: Real,
{
    if start.fuzzy_eq(to) {
        return true;
    }
    let a0 = angle(center, start);
    let a1 = angle(center, to);
    if clockwise {
        angle_is_between(a, a0, a1)
    } else {
        angle_is_between(a, a1, a0)
    }
}

/// Closest point on the segment to `point`.
pub fn seg_closest_point<T>(start: Vector2<T>, seg: &Segment<T>, point: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    match *seg {
        Segment::Line { to } => line_seg_closest_point(start, to, point),
        Segment::Arc {
            center,
            to,
            clockwise,
        } => {
            let r = arc_radius(start, center, to);
            let v = point - center;
            if v.length() < T::fuzzy_epsilon() {
                return start;
            }
            if arc_covers_angle(start, center, to, clockwise, v.angle()) {
                return center + v.normalize().scale(r);
            }
            if (start - point).length_squared() < (to - point).length_squared() {
                start
            } else {
                to
            }
        }
    }
}

/// Returns true if `point` lies on the segment within `eps`.
#[inline]
pub fn seg_contains_point<T>(start: Vector2<T>, seg: &Segment<T>, point: Vector2<T>, eps: T) -> bool
where
    T: Real,
{
    (seg_closest_point(start, seg, point) - point).length() < eps
}

/// Path distance from the start of the segment to `point`, which is assumed to lie on it.
pub fn seg_dist_along<T>(start: Vector2<T>, seg: &Segment<T>, point: Vector2<T>, eps: T) -> T
where
    T: Real,
{
    if point.fuzzy_eq_eps(start, eps) {
        return T::zero();
    }

    match *seg {
        Segment::Line { .. } => (point - start).length(),
        Segment::Arc {
            center,
            to,
            clockwise,
        } => {
            if !start.fuzzy_eq_eps(to, eps) && point.fuzzy_eq_eps(to, eps) {
                return seg_length(start, seg);
            }
            let r = arc_radius(start, center, to);
            let a0 = angle(center, start);
            let ap = angle(center, point);
            let sweep = if clockwise {
                normalize_radians(ap - a0)
            } else {
                normalize_radians(a0 - ap)
            };
            r * (sweep % T::tau())
        }
    }
}

/// Split the segment at `point` (assumed to lie on it) into the piece before and the piece after.
///
/// A side is `None` when `point` sits on that end of the segment. Splitting a full circle at its
/// start leaves the whole circle after the split.
pub fn seg_split_at<T>(
    start: Vector2<T>,
    seg: &Segment<T>,
    point: Vector2<T>,
    eps: T,
) -> (Option<Segment<T>>, Option<Segment<T>>)
where
    T: Real,
{
    let to = seg.to();
    if point.fuzzy_eq_eps(start, eps) {
        return (None, Some(*seg));
    }
    if point.fuzzy_eq_eps(to, eps) {
        return (Some(*seg), None);
    }

    (Some(seg.with_to(point)), Some(*seg))
}

/// Twice the signed area contribution of the segment (shoelace term for lines, including the
/// circular sector for arcs).
pub fn seg_area_term<T>(start: Vector2<T>, seg: &Segment<T>) -> T
where
    T: Real,
{
    match *seg {
        Segment::Line { to } => start.x * to.y - to.x * start.y,
        Segment::Arc { center, to, .. } => {
            let r = arc_radius(start, center, to);
            let sweep = seg_sweep(start, seg);
            r * r * sweep + center.x * (to.y - start.y) - center.y * (to.x - start.x)
        }
    }
}

/// Same curve traversed backwards, ending at `start`.
#[inline]
pub fn seg_reverse<T>(start: Vector2<T>, seg: &Segment<T>) -> Segment<T>
where
    T: Real,
{
    match *seg {
        Segment::Line { .. } => Segment::Line { to: start },
        Segment::Arc {
            center, clockwise, ..
        } => Segment::Arc {
            center,
            to: start,
            clockwise: !clockwise,
        },
    }
}

/// Signed curvature of the segment as seen when leaving a point along it.
///
/// Positive values bend toward increasing angle. `forward` is false when travelling the segment
/// backwards.
#[inline]
pub fn seg_bend<T>(start: Vector2<T>, seg: &Segment<T>, forward: bool) -> T
where
    T: Real,
{
    match *seg {
        Segment::Line { .. } => T::zero(),
        Segment::Arc {
            center,
            to,
            clockwise,
        } => {
            let r = arc_radius(start, center, to);
            if r == T::zero() {
                return T::zero();
            }
            let k = T::one() / r;
            if clockwise == forward {
                k
            } else {
                -k
            }
        }
    }
}
