use inset_kernel::{
    core::math::Vector2,
    error::{KernelError, UntangleFailure},
    segment::Segment,
    untangle::{untangle_hit, HitPair, SegmentIntersection},
};

const EPS: f64 = 1e-6;

fn v(x: f64, y: f64) -> Vector2 {
    Vector2::new(x, y)
}

#[test]
fn single_segment_pairs_with_itself() {
    let hit = v(2.0, 2.0);
    let si = SegmentIntersection::new(0, 4, v(0.0, 0.0), &Segment::line(4.0, 4.0), hit, EPS);
    assert!(si.enter && si.exit);

    let r = untangle_hit(hit, &[si], EPS).unwrap();
    assert_eq!(r.pairs, vec![HitPair { entries: vec![0], exits: vec![0] }]);
    assert_eq!(r.sides.len(), 2);
}

#[test]
fn crossing_lines_pair_each_entry_with_adjacent_exit() {
    let hit = v(0.0, 0.0);
    let horizontal = SegmentIntersection::new(0, 0, v(-5.0, 0.0), &Segment::line(5.0, 0.0), hit, EPS);
    let vertical = SegmentIntersection::new(1, 0, v(0.0, -5.0), &Segment::line(0.0, 5.0), hit, EPS);

    let r = untangle_hit(hit, &[horizontal, vertical], EPS).unwrap();
    assert_eq!(r.sides.len(), 4);
    assert_eq!(r.pairs.len(), 2);
    for pair in &r.pairs {
        assert_eq!(pair.entries.len(), 1);
        assert_eq!(pair.exits.len(), 1);
        // each pair combines one shape's entry with the other shape's exit
        assert_ne!(pair.entries[0], pair.exits[0]);
    }
    assert_eq!(r.exits.len(), 2);
    assert!(r.exits.iter().all(|e| e.going_inside.is_some()));
}

#[test]
fn sides_are_sorted_by_angle() {
    let hit = v(0.0, 0.0);
    let a = SegmentIntersection::new(0, 0, v(-5.0, 0.0), &Segment::line(5.0, 0.0), hit, EPS);
    let b = SegmentIntersection::new(1, 0, v(0.0, -5.0), &Segment::line(0.0, 5.0), hit, EPS);
    let r = untangle_hit(hit, &[a, b], EPS).unwrap();
    assert!(r.sides.windows(2).all(|w| w[0].angle <= w[1].angle));
}

#[test]
fn arc_touching_line_from_inside() {
    // arc bottoming out on the line y = 1 (screen down) at (0, 1)
    let hit = v(0.0, 1.0);
    let line = SegmentIntersection::new(0, 0, v(-3.0, 1.0), &Segment::line(3.0, 1.0), hit, EPS);
    let arc = SegmentIntersection::new(
        1,
        0,
        v(1.0, 0.0),
        &Segment::arc(v(0.0, 0.0), v(-1.0, 0.0), true),
        hit,
        EPS,
    );
    let r = untangle_hit(hit, &[line, arc], EPS).unwrap();
    assert_eq!(r.sides.len(), 4);
    assert_eq!(r.pairs.len(), 2);
}

#[test]
fn untangle_errors_carry_sides() {
    let hit = v(0.0, 0.0);
    let segs = [
        SegmentIntersection::new(0, 0, v(-1.0, 0.0), &Segment::line(1.0, 0.0), hit, EPS),
        SegmentIntersection::new(1, 2, v(0.0, -1.0), &Segment::line(0.0, 1.0), hit, EPS),
        SegmentIntersection::new(2, 0, v(-1.0, -1.0), &Segment::line(1.0, 1.0), hit, EPS),
    ];
    let err = untangle_hit(hit, &segs, EPS).unwrap_err();
    assert_eq!(err.reason, UntangleFailure::UnexpectedSideCount(6));
    assert!(err.sides.iter().any(|s| s.shape == 1 && s.segment_index == 2));

    let kernel_err: KernelError = err.into();
    assert!(kernel_err.to_string().contains("cannot untangle hit at (0, 0)"));
}
