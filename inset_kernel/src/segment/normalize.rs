use super::{
    arc_radius, reverse_shape, seg_is_full_circle, seg_length, seg_sweep, shape_area, Path,
    Segment,
};
use crate::core::{
    math::{side_of, Vector2},
    traits::Real,
};

/// Single segment covering `a` (starting at `a_start`) followed by `b`, if both lie on the same
/// line or circle and travel the same way.
pub fn merge_segments<T>(a_start: Vector2<T>, a: &Segment<T>, b: &Segment<T>, eps: T) -> Option<Segment<T>>
where
    T: Real,
{
    match (*a, *b) {
        (Segment::Line { to: a_to }, Segment::Line { to: b_to }) => {
            let full = b_to - a_start;
            let full_len = full.length();
            if full_len < eps {
                return None;
            }
            let d1 = a_to - a_start;
            let d2 = b_to - a_to;
            if d1.dot(d2) <= T::zero() {
                return None;
            }
            if (side_of(a_start, b_to, a_to) / full_len).abs() < eps {
                Some(Segment::Line { to: b_to })
            } else {
                None
            }
        }
        (
            Segment::Arc {
                center: c1,
                to: a_to,
                clockwise: cw1,
            },
            Segment::Arc {
                center: c2,
                to: b_to,
                clockwise: cw2,
            },
        ) => {
            if cw1 != cw2 || !c1.fuzzy_eq_eps(c2, eps) {
                return None;
            }
            if seg_is_full_circle(a_start, a, eps) || seg_is_full_circle(a_to, b, eps) {
                return None;
            }
            let r1 = arc_radius(a_start, c1, a_to);
            let r2 = arc_radius(a_to, c2, b_to);
            if !r1.fuzzy_eq_eps(r2, eps) {
                return None;
            }
            let total = seg_sweep(a_start, a) + seg_sweep(a_to, b);
            if total.abs() >= T::tau() - eps {
                return None;
            }
            Some(Segment::Arc {
                center: c1,
                to: b_to,
                clockwise: cw1,
            })
        }
        _ => None,
    }
}

/// Append `seg` (starting at `cursor`) unless it is degenerate, merging it into the previous
/// segment when possible.
fn push_segment<T>(
    result: &mut Vec<Segment<T>>,
    starts: &mut Vec<Vector2<T>>,
    cursor: &mut Vector2<T>,
    seg: Segment<T>,
    eps: T,
) where
    T: Real,
{
    let full_circle = seg_is_full_circle(*cursor, &seg, eps);
    if !full_circle && seg_length(*cursor, &seg) < eps {
        return;
    }
    if let Segment::Arc { center, to, .. } = seg {
        if (to - center).length() < eps {
            return;
        }
    }

    if let (Some(last), Some(&last_start)) = (result.last_mut(), starts.last()) {
        if let Some(merged) = merge_segments(last_start, last, &seg, eps) {
            *last = merged;
            *cursor = merged.to();
            return;
        }
    }

    starts.push(*cursor);
    *cursor = seg.to();
    result.push(seg);
}

/// Clean up raw segment input so intersection math never sees degenerate pieces.
///
/// Zero length segments are dropped (which also collapses nearly duplicate consecutive points),
/// consecutive collinear lines and consecutive arcs on the same circle are merged. Closed input is
/// closed back to its origin when needed and merged across the seam.
///
/// Returns the (possibly moved) origin and the cleaned segments.
pub fn normalize_segments<T>(
    origin: Vector2<T>,
    segments: &[Segment<T>],
    open: bool,
    eps: T,
) -> (Vector2<T>, Vec<Segment<T>>)
where
    T: Real,
{
    let mut result: Vec<Segment<T>> = Vec::with_capacity(segments.len() + 1);
    // start point of each segment in `result`
    let mut starts: Vec<Vector2<T>> = Vec::with_capacity(segments.len() + 1);
    let mut cursor = origin;

    for seg in segments {
        push_segment(&mut result, &mut starts, &mut cursor, *seg, eps);
    }

    if open {
        return (origin, result);
    }

    if result.is_empty() {
        return (origin, result);
    }

    if !cursor.fuzzy_eq_eps(origin, eps) {
        push_segment(
            &mut result,
            &mut starts,
            &mut cursor,
            Segment::Line { to: origin },
            eps,
        );
    } else if let Some(last) = result.last_mut() {
        // snap the seam exactly onto the origin
        *last = last.with_to(origin);
    }

    let mut origin = origin;
    if result.len() >= 2 {
        let last_index = result.len() - 1;
        if let Some(merged) = merge_segments(starts[last_index], &result[last_index], &result[0], eps) {
            origin = starts[last_index];
            result.pop();
            result[0] = merged;
        }
    }

    if shape_area(&result) < T::zero() {
        result = reverse_shape(&result);
        origin = result.last().map(|s| s.to()).unwrap_or(origin);
    }

    (origin, result)
}

/// Normalized copy of `path`, see [normalize_segments].
pub fn normalize_path<T>(path: &Path<T>, eps: T) -> Path<T>
where
    T: Real,
{
    let (origin, segments) = normalize_segments(path.origin, &path.segments, path.open, eps);
    Path {
        origin,
        segments,
        ..path.clone()
    }
}
