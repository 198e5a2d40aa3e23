//! Classification of a hit shared by several segments into entry/exit transitions.
//!
//! Every segment passing through a hit contributes an entry side (pointing back the way it came)
//! unless the hit is its start, and an exit side (pointing the way it leaves) unless the hit is
//! its end. Sides are sorted by angle, which turns clockwise on screen, and paired up with
//! adjacent sides.
use crate::{
    core::{
        math::{normalize_radians, Vector2},
        traits::Real,
    },
    error::{SideDiagnostic, UntangleError, UntangleFailure},
    segment::{seg_bend, seg_dist_along, seg_is_full_circle, seg_tangent_at, Segment},
};
use std::cmp::Ordering;

/// One segment's contribution to a hit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SegmentIntersection<T = f64> {
    /// Identifier of the shape the segment belongs to.
    pub shape: usize,
    pub segment_index: usize,
    pub point: Vector2<T>,
    /// Segment arrives at the hit (hit is not its start).
    pub enter: bool,
    /// Segment leaves the hit (hit is not its end).
    pub exit: bool,
    /// Direction pointing back along the segment, toward where it came from.
    pub entry_angle: T,
    /// Direction of travel leaving the hit.
    pub exit_angle: T,
    /// Signed curvature seen from the hit along the entry side (positive bends toward increasing
    /// angle).
    pub entry_bend: T,
    /// Signed curvature seen from the hit along the exit side.
    pub exit_bend: T,
    /// Path distance from the segment start to the hit.
    pub dist: T,
}

impl<T> SegmentIntersection<T>
where
    T: Real,
{
    /// Describe how the segment `seg` (starting at `start`) passes through `point`.
    pub fn new(
        shape: usize,
        segment_index: usize,
        start: Vector2<T>,
        seg: &Segment<T>,
        point: Vector2<T>,
        eps: T,
    ) -> Self {
        let full = seg_is_full_circle(start, seg, eps);
        let at_start = !full && point.fuzzy_eq_eps(start, eps);
        let at_end = !full && point.fuzzy_eq_eps(seg.to(), eps);
        let tangent = seg_tangent_at(start, seg, point);
        Self {
            shape,
            segment_index,
            point,
            enter: !at_start,
            exit: !at_end,
            entry_angle: normalize_radians(tangent + T::pi()) % T::tau(),
            exit_angle: tangent,
            entry_bend: seg_bend(start, seg, false),
            exit_bend: seg_bend(start, seg, true),
            dist: seg_dist_along(start, seg, point, eps),
        }
    }
}

/// One side of a hit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HitSide<T = f64> {
    /// Index of the [SegmentIntersection] the side belongs to.
    pub intersection: usize,
    pub shape: usize,
    /// `true` for exit sides, `false` for entry sides.
    pub exit: bool,
    pub angle: T,
    pub bend: T,
}

/// Entries and exits joined at a hit. Indices refer to the untangled intersection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitPair {
    pub entries: Vec<usize>,
    pub exits: Vec<usize>,
}

/// Classification of one exit side.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExitTransition {
    pub intersection: usize,
    /// Whether the exit heads into the nearest other shape met clockwise from it. `None` when the
    /// exit doubles back along its paired entry or no other shape meets at the hit.
    pub going_inside: Option<bool>,
}

/// Result of [untangle_hit].
#[derive(Debug, Clone, PartialEq)]
pub struct UntangledHit<T = f64> {
    pub point: Vector2<T>,
    /// Sides in clockwise (increasing angle) order.
    pub sides: Vec<HitSide<T>>,
    pub pairs: Vec<HitPair>,
    pub exits: Vec<ExitTransition>,
}

impl<T> UntangledHit<T>
where
    T: Real,
{
    /// Classification of the exit side of intersection `intersection`, if it has one.
    pub fn exit_of(&self, intersection: usize) -> Option<&ExitTransition> {
        self.exits.iter().find(|e| e.intersection == intersection)
    }
}

fn diagnostics<T>(intersections: &[SegmentIntersection<T>], sides: &[HitSide<T>]) -> Vec<SideDiagnostic>
where
    T: Real,
{
    sides
        .iter()
        .map(|s| SideDiagnostic {
            shape: s.shape,
            segment_index: intersections[s.intersection].segment_index,
            exit: s.exit,
            angle: s.angle.as_f64(),
        })
        .collect()
}

/// Build and sort the sides of a hit.
fn sorted_sides<T>(intersections: &[SegmentIntersection<T>], eps: T) -> Vec<HitSide<T>>
where
    T: Real,
{
    let wrap = |a: T| if a > T::tau() - eps { T::zero() } else { a };
    let mut sides = Vec::with_capacity(intersections.len() * 2);
    for (i, si) in intersections.iter().enumerate() {
        if si.enter {
            sides.push(HitSide {
                intersection: i,
                shape: si.shape,
                exit: false,
                angle: wrap(si.entry_angle),
                bend: si.entry_bend,
            });
        }
        if si.exit {
            sides.push(HitSide {
                intersection: i,
                shape: si.shape,
                exit: true,
                angle: wrap(si.exit_angle),
                bend: si.exit_bend,
            });
        }
    }

    let cmp = |a: &T, b: &T| a.partial_cmp(b).unwrap_or(Ordering::Equal);
    sides.sort_by(|a, b| cmp(&a.angle, &b.angle));

    // sides sharing an angle are ordered by how sharply they bend clockwise
    let mut group_start = 0;
    while group_start < sides.len() {
        let group_angle = sides[group_start].angle;
        let mut group_end = group_start + 1;
        while group_end < sides.len() && sides[group_end].angle.fuzzy_eq_eps(group_angle, eps) {
            group_end += 1;
        }
        sides[group_start..group_end].sort_by(|a, b| cmp(&a.bend, &b.bend));
        group_start = group_end;
    }

    sides
}

fn pair_is_valid<T>(a: &HitSide<T>, b: &HitSide<T>) -> bool {
    a.exit != b.exit
}

fn make_pair<T>(sides: &[&HitSide<T>]) -> HitPair {
    HitPair {
        entries: sides.iter().filter(|s| !s.exit).map(|s| s.intersection).collect(),
        exits: sides.iter().filter(|s| s.exit).map(|s| s.intersection).collect(),
    }
}

/// Classify all segments meeting at one hit into paired transitions.
///
/// # Examples
///
/// ```
/// # use inset_kernel::untangle::*;
/// # use inset_kernel::segment::*;
/// # use inset_kernel::core::math::*;
/// // one segment passing through a point it also touches elsewhere
/// let seg = Segment::line(2.0, 0.0);
/// let si = SegmentIntersection::new(0, 0, Vector2::new(0.0, 0.0), &seg, Vector2::new(1.0, 0.0), 1e-6);
/// let hit = untangle_hit(Vector2::new(1.0, 0.0), &[si], 1e-6).unwrap();
/// assert_eq!(hit.pairs, vec![HitPair { entries: vec![0], exits: vec![0] }]);
/// ```
pub fn untangle_hit<T>(
    point: Vector2<T>,
    intersections: &[SegmentIntersection<T>],
    eps: T,
) -> Result<UntangledHit<T>, UntangleError>
where
    T: Real,
{
    let sides = sorted_sides(intersections, eps);
    let fail = |reason: UntangleFailure| UntangleError {
        reason,
        point: (point.x.as_f64(), point.y.as_f64()),
        sides: diagnostics(intersections, &sides),
    };

    let exit_count = sides.iter().filter(|s| s.exit).count();
    let entry_count = sides.len() - exit_count;

    let pairs = match sides.len() {
        2 => {
            if !pair_is_valid(&sides[0], &sides[1]) {
                return Err(fail(UntangleFailure::NoValidPairing));
            }
            vec![make_pair(&[&sides[0], &sides[1]])]
        }
        3 => {
            if entry_count == 0 || exit_count == 0 {
                return Err(fail(UntangleFailure::NoValidPairing));
            }
            vec![make_pair(&[&sides[0], &sides[1], &sides[2]])]
        }
        4 => {
            let m1 = [(0, 1), (2, 3)];
            let m2 = [(1, 2), (3, 0)];
            let valid = |m: &[(usize, usize); 2]| {
                m.iter().all(|&(i, j)| pair_is_valid(&sides[i], &sides[j]))
            };
            let entry_first =
                |m: &[(usize, usize); 2]| m.iter().all(|&(i, _)| !sides[i].exit);
            let chosen = match (valid(&m1), valid(&m2)) {
                (true, true) => {
                    if !entry_first(&m1) && entry_first(&m2) {
                        m2
                    } else {
                        m1
                    }
                }
                (true, false) => m1,
                (false, true) => m2,
                (false, false) => return Err(fail(UntangleFailure::NoValidPairing)),
            };
            chosen
                .iter()
                .map(|&(i, j)| make_pair(&[&sides[i], &sides[j]]))
                .collect()
        }
        n => return Err(fail(UntangleFailure::UnexpectedSideCount(n))),
    };

    let exits = classify_exits(&sides, &pairs, eps);

    Ok(UntangledHit {
        point,
        sides,
        pairs,
        exits,
    })
}

/// Determine `going_inside` for every exit side.
fn classify_exits<T>(sides: &[HitSide<T>], pairs: &[HitPair], eps: T) -> Vec<ExitTransition>
where
    T: Real,
{
    let n = sides.len();
    let mut result = Vec::new();
    for (k, side) in sides.iter().enumerate() {
        if !side.exit {
            continue;
        }

        let doubles_back = pairs
            .iter()
            .filter(|p| p.exits.contains(&side.intersection))
            .flat_map(|p| p.entries.iter())
            .filter_map(|&e| sides.iter().find(|s| !s.exit && s.intersection == e))
            .any(|entry| entry.angle.fuzzy_eq_eps(side.angle, eps));

        let going_inside = if doubles_back {
            None
        } else {
            (1..n)
                .map(|step| &sides[(k + step) % n])
                .find(|other| other.shape != side.shape)
                .map(|other| !other.exit)
        };

        result.push(ExitTransition {
            intersection: side.intersection,
            going_inside,
        });
    }

    result
}
