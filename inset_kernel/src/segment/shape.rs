use super::{
    seg_area_term, seg_bounding_box, seg_closest_point, seg_reverse, Segment,
};
use crate::core::{math::Vector2, traits::Real};
use static_aabb2d_index::{StaticAABB2DIndex, StaticAABB2DIndexBuildError, StaticAABB2DIndexBuilder, AABB};

/// Start point of segment `index` in the closed shape (the end of the previous segment).
#[inline]
pub fn shape_seg_start<T>(shape: &[Segment<T>], index: usize) -> Vector2<T>
where
    T: Real,
{
    let n = shape.len();
    shape[(index + n - 1) % n].to()
}

/// Iterate `(start, segment)` pairs of a closed shape.
pub fn shape_spans<T>(shape: &[Segment<T>]) -> impl Iterator<Item = (Vector2<T>, &Segment<T>)> + '_
where
    T: Real,
{
    (0..shape.len()).map(move |i| (shape_seg_start(shape, i), &shape[i]))
}

/// Signed area of the closed shape, positive when it is clockwise on screen.
///
/// # Examples
///
/// ```
/// # use inset_kernel::shape_closed;
/// # use inset_kernel::segment::*;
/// # use inset_kernel::core::traits::*;
/// let square = shape_closed![line(10.0, 0.0), line(10.0, 10.0), line(0.0, 10.0), line(0.0, 0.0)];
/// assert!(shape_area(&square).fuzzy_eq(100.0));
/// assert!(shape_area(&reverse_shape(&square)).fuzzy_eq(-100.0));
/// ```
pub fn shape_area<T>(shape: &[Segment<T>]) -> T
where
    T: Real,
{
    if shape.is_empty() {
        return T::zero();
    }

    let twice_area = shape_spans(shape)
        .map(|(start, seg)| seg_area_term(start, seg))
        .fold(T::zero(), |acc, a| acc + a);

    twice_area / T::two()
}

/// Returns true if the shape winds clockwise on screen.
#[inline]
pub fn shape_is_clockwise<T>(shape: &[Segment<T>]) -> bool
where
    T: Real,
{
    shape_area(shape) > T::zero()
}

/// Same closed shape traversed in the opposite direction.
pub fn reverse_shape<T>(shape: &[Segment<T>]) -> Vec<Segment<T>>
where
    T: Real,
{
    (0..shape.len())
        .rev()
        .map(|i| seg_reverse(shape_seg_start(shape, i), &shape[i]))
        .collect()
}

/// Bounding box of all segments, `None` for an empty shape.
pub fn shape_extents<T>(shape: &[Segment<T>]) -> Option<AABB<T>>
where
    T: Real,
{
    let mut spans = shape_spans(shape);
    let (start, seg) = spans.next()?;
    let mut result = seg_bounding_box(start, seg);
    for (start, seg) in spans {
        let bb = seg_bounding_box(start, seg);
        result.min_x = num_traits::real::Real::min(result.min_x, bb.min_x);
        result.min_y = num_traits::real::Real::min(result.min_y, bb.min_y);
        result.max_x = num_traits::real::Real::max(result.max_x, bb.max_x);
        result.max_y = num_traits::real::Real::max(result.max_y, bb.max_y);
    }

    Some(result)
}

/// Spatial index of segment bounding boxes (expanded by `eps`), keyed by segment index.
///
/// # Panics
///
/// Panics if `T` fails to cast to/from the index's internal numeric type.
pub fn shape_aabb_index<T>(shape: &[Segment<T>], eps: T) -> StaticAABB2DIndex<T>
where
    T: Real,
{
    let mut builder = StaticAABB2DIndexBuilder::new(shape.len());
    for (start, seg) in shape_spans(shape) {
        let bb = seg_bounding_box(start, seg);
        builder.add(bb.min_x - eps, bb.min_y - eps, bb.max_x + eps, bb.max_y + eps);
    }

    unwrap_spatial_index(builder)
}

/// Unwrap a spatial index from a builder, count mismatches are internal errors.
pub(crate) fn unwrap_spatial_index<T>(builder: StaticAABB2DIndexBuilder<T>) -> StaticAABB2DIndex<T>
where
    T: Real,
{
    match builder.build() {
        Ok(x) => x,
        Err(e) => match e {
            StaticAABB2DIndexBuildError::ItemCountError { .. } => {
                unreachable!("internal library error: count mismatch when building spatial index")
            }
            StaticAABB2DIndexBuildError::NumericCastError => {
                panic!("failed to cast numeric type: {e}")
            }
        },
    }
}

/// Smallest distance from `point` to the boundary of the shape.
pub fn shape_distance_to<T>(shape: &[Segment<T>], point: Vector2<T>) -> T
where
    T: Real,
{
    shape_spans(shape)
        .map(|(start, seg)| (seg_closest_point(start, seg, point) - point).length())
        .fold(<T as num_traits::Bounded>::max_value(), |acc, d| num_traits::real::Real::min(acc, d))
}

/// Map every point of the shape through the rigid motion `f`.
pub fn shape_map_points<T, F>(shape: &[Segment<T>], f: F) -> Vec<Segment<T>>
where
    T: Real,
    F: Fn(Vector2<T>) -> Vector2<T>,
{
    shape.iter().map(|s| s.map_points(&f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;
    use std::f64::consts::PI;

    #[test]
    fn circle_area_and_extents() {
        // two half circles around the origin, clockwise on screen
        let circle = shape_closed![cw(0.0, 0.0, -2.0, 0.0), cw(0.0, 0.0, 2.0, 0.0)];
        assert_fuzzy_eq!(shape_area(&circle), 4.0 * PI);
        let bb = shape_extents(&circle).unwrap();
        assert_fuzzy_eq!(bb.min_x, -2.0);
        assert_fuzzy_eq!(bb.max_y, 2.0);
        assert_fuzzy_eq!(bb.min_y, -2.0);
    }

    #[test]
    fn distance_to_lines_and_arcs() {
        let shape = shape_closed![
            line(10.0, 0.0),
            cw(10.0, 2.0, 10.0, 4.0),
            line(0.0, 4.0),
            line(0.0, 0.0)
        ];
        assert_fuzzy_eq!(shape_distance_to(&shape, Vector2::new(5.0, 1.0)), 1.0);
        assert_fuzzy_eq!(shape_distance_to(&shape, Vector2::new(15.0, 2.0)), 3.0);
        assert_fuzzy_eq!(shape_distance_to(&shape, Vector2::new(0.0, 4.0)), 0.0);
        assert_eq!(shape_distance_to::<f64>(&[], Vector2::new(1.0, 1.0)), f64::MAX);
    }

    #[test]
    fn rounded_end_area() {
        // 10 x 4 rectangle with a half disc of radius 2 bulging out on the right
        let shape = shape_closed![
            line(10.0, 0.0),
            cw(10.0, 2.0, 10.0, 4.0),
            line(0.0, 4.0),
            line(0.0, 0.0)
        ];
        assert_fuzzy_eq!(shape_area(&shape), 40.0 + 2.0 * PI);
        let rev = reverse_shape(&shape);
        assert_fuzzy_eq!(shape_area(&rev), -(40.0 + 2.0 * PI));
        assert!(!shape_is_clockwise(&rev));
    }

    #[test]
    fn distance_to_boundary() {
        let square = shape_closed![line(10.0, 0.0), line(10.0, 10.0), line(0.0, 10.0), line(0.0, 0.0)];
        assert_fuzzy_eq!(shape_distance_to(&square, Vector2::new(3.0, 5.0)), 3.0);
        assert_fuzzy_eq!(shape_distance_to(&square, Vector2::new(13.0, 5.0)), 3.0);
    }
}
