mod test_utils;

use inset_kernel::{
    assert_fuzzy_eq,
    clip::{clip_shape, clip_two, find_inside_start, ClipOptions},
    error::KernelError,
    core::{math::Vector2, traits::FuzzyEq},
    segment::{shape_area, shape_is_clockwise, Segment},
};
use std::f64::consts::PI;
use test_utils::{
    circle, create_property_set, init_logging, property_sets_match, rect, shape_is_normalized,
    ShapeProperties,
};

const EPS: f64 = 1e-6;

fn v(x: f64, y: f64) -> Vector2 {
    Vector2::new(x, y)
}

fn clipped_shapes(subject: &[Segment], clip: &[Segment]) -> Vec<Vec<Segment>> {
    let shapes: Vec<Vec<Segment>> = clip_shape(subject, clip, &ClipOptions::new())
        .unwrap()
        .into_iter()
        .map(|r| r.shape)
        .collect();
    for shape in &shapes {
        assert!(shape_is_normalized(shape, EPS), "unmerged pieces in {:?}", shape);
    }
    shapes
}

#[test]
fn overlapping_rectangles() {
    init_logging();
    let result = clipped_shapes(&rect(0.0, 0.0, 10.0, 10.0), &rect(5.0, 5.0, 15.0, 15.0));
    let expected = [ShapeProperties::new(4, 25.0, 20.0, 5.0, 5.0, 10.0, 10.0)];
    assert!(property_sets_match(&create_property_set(&result), &expected));
}

#[test]
fn clip_two_walks_from_inside_vertex() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let b = rect(5.0, 5.0, 15.0, 15.0);
    // vertex 2 of `a` (start of its bottom edge) is (10, 10), inside `b`
    assert_eq!(find_inside_start(&a, &b, EPS), Some(2));
    let r = clip_two(&a, &b, 2, &ClipOptions::new()).unwrap();
    assert_fuzzy_eq!(shape_area(&r.shape), 25.0);
    assert!(r.touches_clip());
    assert!(r.ambiguous.is_empty());
}

#[test]
fn overlapping_circles_clip_to_lens() {
    let result = clipped_shapes(&circle(5.0, v(0.0, 0.0)), &circle(5.0, v(6.0, 0.0)));
    assert_eq!(result.len(), 1);
    let lens = 50.0 * 0.6f64.acos() - 24.0;
    assert_fuzzy_eq!(shape_area(&result[0]), lens, 1e-5);
    assert!(result[0].iter().all(|s| s.is_arc()));
}

#[test]
fn rectangle_clipped_by_circle() {
    // circle covering the middle of a long bar
    let result = clipped_shapes(&rect(-20.0, -1.0, 20.0, 1.0), &circle(5.0, v(0.0, 0.0)));
    assert_eq!(result.len(), 1);
    let shape = &result[0];
    assert!(shape_is_clockwise(shape));
    // two straight edges, the caps are arcs
    assert_eq!(shape.iter().filter(|s| !s.is_arc()).count(), 2);
    // bar strip of half width 1 inside radius 5: 2 * integral of 2 * sqrt(25 - y^2) over [0, 1]
    let strip = 2.0 * (24f64.sqrt() + 25.0 * (0.2f64).asin());
    assert_fuzzy_eq!(shape_area(shape), strip, 1e-5);
}

#[test]
fn comb_clip_yields_separate_loops() {
    // three teeth hanging down from a bar, clipped to a band below the bar
    let comb = vec![
        Segment::line(10.0, 0.0),
        Segment::line(10.0, 10.0),
        Segment::line(8.0, 10.0),
        Segment::line(8.0, 3.0),
        Segment::line(6.0, 3.0),
        Segment::line(6.0, 10.0),
        Segment::line(4.0, 10.0),
        Segment::line(4.0, 3.0),
        Segment::line(2.0, 3.0),
        Segment::line(2.0, 10.0),
        Segment::line(0.0, 10.0),
        Segment::line(0.0, 0.0),
    ];
    let result = clipped_shapes(&comb, &rect(-1.0, 5.0, 11.0, 8.0));
    let expected = [
        ShapeProperties::new(4, 6.0, 10.0, 0.0, 5.0, 2.0, 8.0),
        ShapeProperties::new(4, 6.0, 10.0, 4.0, 5.0, 6.0, 8.0),
        ShapeProperties::new(4, 6.0, 10.0, 8.0, 5.0, 10.0, 8.0),
    ];
    assert!(property_sets_match(&create_property_set(&result), &expected));
}

#[test]
fn containment_and_disjoint_cases() {
    let big = rect(0.0, 0.0, 10.0, 10.0);
    let small = rect(2.0, 2.0, 4.0, 4.0);
    let far = rect(20.0, 20.0, 30.0, 30.0);

    let inner = clip_shape(&small, &big, &ClipOptions::new()).unwrap();
    assert_eq!(inner.len(), 1);
    assert!(!inner[0].touches_clip());
    assert_fuzzy_eq!(shape_area(&inner[0].shape), 4.0);

    let hole = clip_shape(&big, &small, &ClipOptions::new()).unwrap();
    assert_eq!(hole.len(), 1);
    assert!(hole[0].touches_clip());
    assert_fuzzy_eq!(shape_area(&hole[0].shape), 4.0);

    assert!(clip_shape(&big, &far, &ClipOptions::new()).unwrap().is_empty());
    assert!(clip_shape(&[], &big, &ClipOptions::new()).unwrap().is_empty());
}

#[test]
fn clipping_is_symmetric_in_area() {
    let a = rect(0.0, 0.0, 10.0, 6.0);
    let b = circle(4.0, v(9.0, 5.0));
    let ab: f64 = clipped_shapes(&a, &b).iter().map(|s| shape_area(s)).sum();
    let ba: f64 = clipped_shapes(&b, &a).iter().map(|s| shape_area(s)).sum();
    assert!(ab > 0.0);
    assert!(ab.fuzzy_eq_eps(ba, 1e-5));
}

#[test]
fn walk_started_mid_edge_has_no_extra_vertex() {
    // every loop here is traced from the middle of a boundary piece
    let result = clipped_shapes(&rect(0.0, 0.0, 10.0, 10.0), &rect(5.0, 5.0, 15.0, 15.0));
    assert_eq!(result.len(), 1);
    let mut corners: Vec<(i64, i64)> = result[0]
        .iter()
        .map(|s| (s.to().x.round() as i64, s.to().y.round() as i64))
        .collect();
    corners.sort_unstable();
    assert_eq!(corners, vec![(5, 5), (5, 10), (10, 5), (10, 10)]);
}

#[test]
fn tangent_circles_touch_without_crossing() {
    let outer = circle(5.0, v(0.0, 0.0));
    // touches the outer circle from inside at (0, 5), halfway along a segment of both
    let inner = circle(2.0, v(0.0, 3.0));
    let start = find_inside_start(&inner, &outer, EPS).unwrap();
    let r = clip_two(&inner, &outer, start, &ClipOptions::new()).unwrap();
    assert_fuzzy_eq!(shape_area(&r.shape), 4.0 * PI, 1e-5);
    assert!(!r.touches_clip());
    assert!(r.ambiguous.is_empty());
    assert!(shape_is_normalized(&r.shape, EPS));

    let kept = clipped_shapes(&outer, &inner);
    assert_eq!(kept.len(), 1);
    assert_fuzzy_eq!(shape_area(&kept[0]), 4.0 * PI, 1e-5);

    // touching from outside leaves nothing
    let outside = circle(2.0, v(0.0, 7.0));
    assert!(clipped_shapes(&outside, &outer).is_empty());
}

#[test]
fn walk_stops_at_iteration_cap() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    let b = rect(5.0, 5.0, 15.0, 15.0);
    let options = ClipOptions {
        max_iterations: 3,
        ..ClipOptions::new()
    };
    assert_eq!(
        clip_two(&a, &b, 2, &options),
        Err(KernelError::ClipIterationLimit { limit: 3 })
    );
    assert_eq!(
        clip_shape(&a, &b, &options),
        Err(KernelError::ClipIterationLimit { limit: 3 })
    );
}
