use super::{InsetOptions, OffsetPiece, PieceKind, RawOffsetSeg, SegmentInset, Span};
use crate::{
    core::{
        math::{
            angle, circle_circle_intr, delta_angle, dist_squared, line_circle_intr, line_line_intr,
            midpoint, side_of, CircleCircleIntr, LineCircleIntr, LineEq, LineLineIntr, Vector2,
        },
        traits::Real,
    },
    segment::{arc_radius, seg_end_tangent, seg_is_full_circle, seg_start_tangent, seg_sweep, Segment},
};

/// Parallel shifted form of one segment before trimming at its corners.
#[derive(Debug, Copy, Clone)]
struct OffsetCurve<T> {
    start: Vector2<T>,
    end: Vector2<T>,
    form: CurveForm<T>,
}

#[derive(Debug, Copy, Clone)]
enum CurveForm<T> {
    Line {
        dir: Vector2<T>,
    },
    Circle {
        center: Vector2<T>,
        radius: T,
        clockwise: bool,
    },
    /// Arc whose shifted radius shrank to zero or below.
    Collapsed,
}

/// Shift `span` sideways by `amount`, positive moves it away from the interior (the left of
/// travel on screen).
fn offset_curve<T>(span: &Span<T>, amount: T, eps: T) -> OffsetCurve<T>
where
    T: Real,
{
    match span.seg {
        Segment::Line { to } => {
            let dir = (to - span.start).normalize();
            let outward = Vector2::new(dir.y, -dir.x).scale(amount);
            OffsetCurve {
                start: span.start + outward,
                end: to + outward,
                form: CurveForm::Line { dir },
            }
        }
        Segment::Arc {
            center,
            to,
            clockwise,
        } => {
            let r = arc_radius(span.start, center, to);
            let radius = if clockwise { r + amount } else { r - amount };
            let start = center + (span.start - center).normalize().scale(radius);
            let end = center + (to - center).normalize().scale(radius);
            let form = if radius > eps {
                CurveForm::Circle {
                    center,
                    radius,
                    clockwise,
                }
            } else {
                CurveForm::Collapsed
            };
            OffsetCurve { start, end, form }
        }
    }
}

/// How the offsets of two consecutive segments are joined at their shared vertex.
#[derive(Debug, Clone)]
struct CornerJoin<T> {
    /// Where the offset of the first segment ends.
    end: Vector2<T>,
    /// Pieces leading from `end` to `next_start`.
    connectors: Vec<Segment<T>>,
    /// Where the offset of the second segment starts.
    next_start: Vector2<T>,
}

impl<T> CornerJoin<T>
where
    T: Real,
{
    fn meet(point: Vector2<T>) -> Self {
        Self {
            end: point,
            connectors: Vec::new(),
            next_start: point,
        }
    }

    fn bridge(end: Vector2<T>, next_start: Vector2<T>, eps: T) -> Self {
        let mut connectors = Vec::new();
        if !end.fuzzy_eq_eps(next_start, eps) {
            connectors.push(Segment::Line { to: next_start });
        }
        Self {
            end,
            connectors,
            next_start,
        }
    }

    /// Straight segments through the original vertex.
    fn pass_through(end: Vector2<T>, vertex: Vector2<T>, next_start: Vector2<T>, eps: T) -> Self {
        let mut connectors = Vec::with_capacity(2);
        if !end.fuzzy_eq_eps(vertex, eps) {
            connectors.push(Segment::Line { to: vertex });
        }
        if !vertex.fuzzy_eq_eps(next_start, eps) {
            connectors.push(Segment::Line { to: next_start });
        }
        Self {
            end,
            connectors,
            next_start,
        }
    }

    /// Half circle from `t1` to `t2` bulging toward `vertex`.
    fn semicircle(t1: Vector2<T>, t2: Vector2<T>, vertex: Vector2<T>, eps: T) -> Self {
        if t1.fuzzy_eq_eps(t2, eps) {
            return Self::meet(t1);
        }
        let center = midpoint(t1, t2);
        let clockwise = (t1 - center).perp().dot(vertex - center) >= T::zero();
        Self {
            end: t1,
            connectors: vec![Segment::Arc {
                center,
                to: t2,
                clockwise,
            }],
            next_start: t2,
        }
    }
}

/// Candidate closest to `vertex`.
fn nearest<T>(candidates: impl Iterator<Item = Vector2<T>>, vertex: Vector2<T>) -> Option<Vector2<T>>
where
    T: Real,
{
    candidates.fold(None, |best: Option<Vector2<T>>, p| match best {
        Some(b) if dist_squared(b, vertex) <= dist_squared(p, vertex) => Some(b),
        _ => Some(p),
    })
}

fn circle_points<T>(intr: LineCircleIntr<T>) -> Vec<Vector2<T>>
where
    T: Real,
{
    match intr {
        LineCircleIntr::NoIntersect => Vec::new(),
        LineCircleIntr::Tangent(p) => vec![p],
        LineCircleIntr::TwoIntersects(p, q) => vec![p, q],
    }
}

/// Join between a shifted line and a shifted circle. `line_first` is true when the line comes
/// before the arc.
fn line_circle_join<T>(
    line_point: Vector2<T>,
    dir: Vector2<T>,
    center: Vector2<T>,
    radius: T,
    vertex: Vector2<T>,
    line_first: bool,
    eps: T,
) -> CornerJoin<T>
where
    T: Real,
{
    let line = LineEq::from_point_dir(line_point, dir, eps);
    // only the half disc facing the original vertex holds a join consistent with the corner
    let vertex_angle = angle(center, vertex);
    let candidates = circle_points(line_circle_intr(&line, radius, center, eps))
        .into_iter()
        .filter(|&p| delta_angle(vertex_angle, angle(center, p)).abs() <= T::half_pi() + eps);

    if let Some(p) = nearest(candidates, vertex) {
        return CornerJoin::meet(p);
    }

    let foot = line.foot_point(center);
    let radial = if foot.fuzzy_eq_eps(center, eps) {
        center + Vector2::from_angle(vertex_angle).scale(radius)
    } else {
        center + (foot - center).normalize().scale(radius)
    };

    if line_first {
        CornerJoin::bridge(foot, radial, eps)
    } else {
        CornerJoin::bridge(radial, foot, eps)
    }
}

/// Join between two shifted circles.
fn circle_circle_join<T>(
    first: (Vector2<T>, T),
    second: (Vector2<T>, T),
    end: Vector2<T>,
    next_start: Vector2<T>,
    vertex: Vector2<T>,
    eps: T,
) -> CornerJoin<T>
where
    T: Real,
{
    let (c1, r1) = first;
    let (c2, r2) = second;
    if c1.fuzzy_eq_eps(c2, eps) {
        return CornerJoin::bridge(end, next_start, eps);
    }

    let points = match circle_circle_intr(r1, c1, r2, c2, eps) {
        CircleCircleIntr::NoIntersect => Vec::new(),
        CircleCircleIntr::Tangent(p) => vec![p],
        CircleCircleIntr::TwoIntersects(p, q) => vec![p, q],
        CircleCircleIntr::Overlapping => return CornerJoin::bridge(end, next_start, eps),
    };

    // keep the intersect on the same side of the center line as the original vertex
    let vertex_side = side_of(c1, c2, vertex);
    let candidates = points.into_iter().filter(|&p| {
        let s = side_of(c1, c2, p);
        vertex_side.abs() < eps || s.abs() < eps || (s > T::zero()) == (vertex_side > T::zero())
    });
    if let Some(p) = nearest(candidates, vertex) {
        return CornerJoin::meet(p);
    }

    let d = (c2 - c1).length();
    let dir = (c2 - c1).scale(T::one() / d);
    let (t1, t2) = if r1 >= d + r2 {
        (c1 + dir.scale(r1), c2 + dir.scale(r2))
    } else if r2 >= d + r1 {
        (c1 - dir.scale(r1), c2 - dir.scale(r2))
    } else {
        (c1 + dir.scale(r1), c2 - dir.scale(r2))
    };

    CornerJoin::semicircle(t1, t2, vertex, eps)
}

/// Join the offsets of `a` and `b` at the vertex they share.
fn corner_join<T>(a: &Span<T>, b: &Span<T>, amount: T, eps: T) -> CornerJoin<T>
where
    T: Real,
{
    let ca = offset_curve(a, amount, eps);
    let cb = offset_curve(b, amount, eps);
    let vertex = a.end();

    if matches!(ca.form, CurveForm::Collapsed) || matches!(cb.form, CurveForm::Collapsed) {
        return CornerJoin::pass_through(ca.end, vertex, cb.start, eps);
    }

    let turn = delta_angle(seg_end_tangent(a.start, &a.seg), seg_start_tangent(b.start, &b.seg));
    if turn.abs() < eps {
        return CornerJoin::bridge(ca.end, cb.start, eps);
    }

    // turning toward increasing angle grows the corner for positive amounts
    let contracting = turn.abs() >= T::pi() - eps || (turn > T::zero()) != (amount > T::zero());
    if contracting {
        return CornerJoin::pass_through(ca.end, vertex, cb.start, eps);
    }

    match (ca.form, cb.form) {
        (CurveForm::Line { dir: d1 }, CurveForm::Line { dir: d2 }) => {
            let l1 = LineEq::from_point_dir(ca.end, d1, eps);
            let l2 = LineEq::from_point_dir(cb.start, d2, eps);
            match line_line_intr(&l1, &l2, eps) {
                LineLineIntr::Point(p) => CornerJoin::meet(p),
                LineLineIntr::Parallel | LineLineIntr::Coincident => {
                    CornerJoin::bridge(ca.end, cb.start, eps)
                }
            }
        }
        (CurveForm::Line { dir }, CurveForm::Circle { center, radius, .. }) => {
            line_circle_join(ca.end, dir, center, radius, vertex, true, eps)
        }
        (CurveForm::Circle { center, radius, .. }, CurveForm::Line { dir }) => {
            line_circle_join(cb.start, dir, center, radius, vertex, false, eps)
        }
        (
            CurveForm::Circle {
                center: c1,
                radius: r1,
                ..
            },
            CurveForm::Circle {
                center: c2,
                radius: r2,
                ..
            },
        ) => circle_circle_join((c1, r1), (c2, r2), ca.end, cb.start, vertex, eps),
        (CurveForm::Collapsed, _) | (_, CurveForm::Collapsed) => {
            CornerJoin::pass_through(ca.end, vertex, cb.start, eps)
        }
    }
}

/// Sweep left on an arc of `span` after trimming it to run from `start` to `end` on the shifted
/// circle around `center`. Zero or negative when the trims overlap.
fn remaining_sweep<T>(span: &Span<T>, center: Vector2<T>, clockwise: bool, start: Vector2<T>, end: Vector2<T>) -> T
where
    T: Real,
{
    let sign = if clockwise { T::one() } else { -T::one() };
    let a0 = angle(center, span.start);
    let a1 = angle(center, span.end());
    let trim_start = delta_angle(a0, angle(center, start)) * sign;
    let trim_end = delta_angle(angle(center, end), a1) * sign;
    seg_sweep(span.start, &span.seg).abs() - trim_start - trim_end
}

/// Offset of `seg` by `amount` (positive is outward for a clockwise shape), trimmed or extended
/// to meet the offsets of its neighbours `prev` and `next`.
///
/// The result holds the shifted segment followed by whatever joins it to the offset of `next`.
/// Contracting corners (the offsets overlap) are joined by straight segments through the original
/// vertex, expanding corners by intersecting the shifted curves.
///
/// # Examples
///
/// ```
/// # use inset_kernel::offset::*;
/// # use inset_kernel::segment::*;
/// # use inset_kernel::core::math::*;
/// # use inset_kernel::core::traits::*;
/// let v = |x, y| Vector2::new(x, y);
/// // top edge of a clockwise square, growing outward by 1
/// let prev = Span::new(v(0.0, 10.0), Segment::line(0.0, 0.0));
/// let seg = Span::new(v(0.0, 0.0), Segment::line(10.0, 0.0));
/// let next = Span::new(v(10.0, 0.0), Segment::line(10.0, 10.0));
/// let inset = inset_segment(&prev, &seg, &next, 1.0, &InsetOptions::new());
/// assert!(inset.start.fuzzy_eq(v(-1.0, -1.0)));
/// assert_eq!(inset.pieces.len(), 1);
/// assert!(inset.pieces[0].seg.to().fuzzy_eq(v(11.0, -1.0)));
/// ```
pub fn inset_segment<T>(prev: &Span<T>, seg: &Span<T>, next: &Span<T>, amount: T, options: &InsetOptions<T>) -> SegmentInset<T>
where
    T: Real,
{
    let eps = options.pos_equal_eps;
    if amount.abs() < eps {
        return SegmentInset {
            start: seg.start,
            pieces: vec![OffsetPiece::main(seg.seg)],
        };
    }

    let start_join = corner_join(prev, seg, amount, eps);
    let end_join = corner_join(seg, next, amount, eps);
    let start = start_join.next_start;
    let end = end_join.end;

    let main = match offset_curve(seg, amount, eps).form {
        CurveForm::Circle {
            center, clockwise, ..
        } => {
            if remaining_sweep(seg, center, clockwise, start, end) > eps {
                Segment::Arc {
                    center,
                    to: end,
                    clockwise,
                }
            } else {
                // the trims crossed, the arc flipped direction
                Segment::Line { to: end }
            }
        }
        CurveForm::Line { .. } | CurveForm::Collapsed => Segment::Line { to: end },
    };

    let mut pieces = Vec::with_capacity(1 + end_join.connectors.len());
    if !start.fuzzy_eq_eps(end, eps) || main.is_arc() {
        pieces.push(OffsetPiece::main(main));
    }
    pieces.extend(end_join.connectors.into_iter().map(OffsetPiece::connector));

    SegmentInset { start, pieces }
}

/// Untrimmed, possibly self intersecting closed offset loop of a clockwise shape.
///
/// Piece `i` of the result starts where piece `i - 1` ends.
pub fn raw_offset_shape<T>(shape: &[Segment<T>], amount: T, options: &InsetOptions<T>) -> Vec<RawOffsetSeg<T>>
where
    T: Real,
{
    let eps = options.pos_equal_eps;
    let n = shape.len();
    if n == 0 {
        return Vec::new();
    }

    if n == 1 {
        let span = Span::of(shape, 0);
        if !seg_is_full_circle(span.start, &span.seg, eps) {
            return Vec::new();
        }
        let curve = offset_curve(&span, amount, eps);
        return match curve.form {
            CurveForm::Circle {
                center, clockwise, ..
            } => vec![RawOffsetSeg {
                start: curve.start,
                seg: Segment::Arc {
                    center,
                    to: curve.start,
                    clockwise,
                },
                kind: PieceKind::Main,
                source: 0,
            }],
            _ => Vec::new(),
        };
    }

    let mut result = Vec::with_capacity(n * 2);
    for i in 0..n {
        let inset = inset_segment(
            &Span::of(shape, (i + n - 1) % n),
            &Span::of(shape, i),
            &Span::of(shape, (i + 1) % n),
            amount,
            options,
        );
        let mut current = inset.start;
        for piece in inset.pieces {
            result.push(RawOffsetSeg {
                start: current,
                seg: piece.seg,
                kind: piece.kind,
                source: i,
            });
            current = piece.seg.to();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;

    fn v(x: f64, y: f64) -> Vector2 {
        Vector2::new(x, y)
    }

    fn square() -> Vec<Segment> {
        vec![
            Segment::line(10.0, 0.0),
            Segment::line(10.0, 10.0),
            Segment::line(0.0, 10.0),
            Segment::line(0.0, 0.0),
        ]
    }

    #[test]
    fn zero_amount_returns_segment() {
        let shape = square();
        let inset = inset_segment(
            &Span::of(&shape, 3),
            &Span::of(&shape, 0),
            &Span::of(&shape, 1),
            0.0,
            &InsetOptions::new(),
        );
        assert_eq!(inset.start, v(0.0, 0.0));
        assert_eq!(inset.pieces, vec![OffsetPiece::main(shape[0])]);
    }

    #[test]
    fn inward_square_corner_passes_through_vertex() {
        let shape = square();
        let inset = inset_segment(
            &Span::of(&shape, 3),
            &Span::of(&shape, 0),
            &Span::of(&shape, 1),
            -1.0,
            &InsetOptions::new(),
        );
        assert!(inset.start.fuzzy_eq(v(0.0, 1.0)));
        let ends: Vec<_> = inset.pieces.iter().map(|p| p.seg.to()).collect();
        assert_eq!(ends.len(), 3);
        assert!(ends[0].fuzzy_eq(v(10.0, 1.0)));
        assert!(ends[1].fuzzy_eq(v(10.0, 0.0)));
        assert!(ends[2].fuzzy_eq(v(9.0, 0.0)));
        assert_eq!(inset.pieces[0].kind, PieceKind::Main);
        assert_eq!(inset.pieces[1].kind, PieceKind::Connector);
        assert_eq!(inset.pieces[2].kind, PieceKind::Connector);
    }

    #[test]
    fn raw_offset_loop_is_connected() {
        let shape = vec![
            Segment::line(10.0, 0.0),
            Segment::arc(v(10.0, 5.0), v(10.0, 10.0), true),
            Segment::line(0.0, 10.0),
            Segment::line(0.0, 0.0),
        ];
        for amount in [-2.0, -0.5, 0.5, 3.0] {
            let raw = raw_offset_shape(&shape, amount, &InsetOptions::new());
            assert!(!raw.is_empty());
            for i in 0..raw.len() {
                let next = &raw[(i + 1) % raw.len()];
                assert!(raw[i].seg.to().fuzzy_eq(next.start), "amount {amount} piece {i}");
            }
        }
    }

    #[test]
    fn outward_line_arc_corner_meets() {
        // line into a clockwise quarter arc continuing smoothly
        let shape = vec![
            Segment::line(10.0, 0.0),
            Segment::arc(v(10.0, 5.0), v(15.0, 5.0), true),
            Segment::line(15.0, 10.0),
            Segment::line(0.0, 10.0),
            Segment::line(0.0, 0.0),
        ];
        let raw = raw_offset_shape(&shape, 1.0, &InsetOptions::new());
        let arc = raw
            .iter()
            .find(|r| r.source == 1 && r.kind == PieceKind::Main)
            .unwrap();
        assert!(arc.start.fuzzy_eq(v(10.0, -1.0)));
        assert!(arc.seg.to().fuzzy_eq(v(16.0, 5.0)));
        assert!(arc.seg.is_arc());
    }

    #[test]
    fn single_circle_offsets_radius() {
        let circle = vec![Segment::arc(v(0.0, 0.0), v(5.0, 0.0), true)];
        let raw = raw_offset_shape(&circle, -2.0, &InsetOptions::new());
        assert_eq!(raw.len(), 1);
        assert!(raw[0].start.fuzzy_eq(v(3.0, 0.0)));
        assert!(raw[0].seg.to().fuzzy_eq(v(3.0, 0.0)));

        assert!(raw_offset_shape(&circle, -6.0, &InsetOptions::new()).is_empty());
    }

    #[test]
    fn separated_circles_bridge_with_semicircle() {
        // two counter clockwise arcs meeting at a convex corner, growing outward shrinks both
        // radii to 0.2 so the shifted circles no longer meet
        let a = Span::new(v(-1.0, 1.0), Segment::arc(v(-1.0, 0.0), v(0.0, 0.0), false));
        let b = Span::new(v(0.0, 0.0), Segment::arc(v(0.0, -1.0), v(1.0, -1.0), false));
        let join = corner_join(&a, &b, 0.8, 1e-6);
        let k = 0.2 / 2.0f64.sqrt();
        assert!(join.end.fuzzy_eq(v(-1.0 + k, -k)));
        assert!(join.next_start.fuzzy_eq(v(-k, -1.0 + k)));
        assert_eq!(join.connectors.len(), 1);
        match join.connectors[0] {
            Segment::Arc {
                center, clockwise, ..
            } => {
                assert!(center.fuzzy_eq(v(-0.5, -0.5)));
                assert!(!clockwise);
            }
            Segment::Line { .. } => panic!("expected a bridging arc"),
        }
    }

    #[test]
    fn collapsed_arc_passes_through_vertex() {
        let a = Span::new(v(0.0, 0.0), Segment::line(10.0, 0.0));
        let b = Span::new(v(10.0, 0.0), Segment::arc(v(11.0, 0.0), v(12.0, 0.0), true));
        let join = corner_join(&a, &b, -2.0, 1e-6);
        assert_eq!(join.connectors.first(), Some(&Segment::line(10.0, 0.0)));
    }
}
