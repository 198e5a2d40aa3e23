//! Clipping one closed shape against another by walking both boundaries.
//!
//! Both shapes must be clockwise. The walk starts on a vertex of the subject known to be inside
//! the clip shape and follows the subject until a hit where the clip boundary heads inside the
//! subject, then continues on the clip boundary, switching back the same way, until it returns to
//! its start. The traced loop bounds the intersection of the two shapes.
use crate::{
    core::{math::Vector2, traits::Real},
    error::KernelError,
    primitive::{intersections, shape_primitives, CoordKey, IntersectOptions, PointSnapper},
    segment::{
        merge_segments, seg_bounding_box, seg_is_full_circle, seg_length, seg_point_at,
        shape_aabb_index, shape_seg_start, shape_spans, Segment,
    },
    untangle::{untangle_hit, SegmentIntersection, UntangledHit},
    winding::{inside_path, point_on_boundary, strictly_inside},
};
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options for [clip_two] and [clip_shape].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ClipOptions<T = f64> {
    /// Fuzzy epsilon used for point comparisons.
    pub pos_equal_eps: T,
    /// Decimals kept by the coordinate keys identifying hits and emitted points.
    pub key_decimals: u32,
    /// Maximum number of steps of a single walk. A step emits one piece, so a walk needs at most
    /// the number of segments of both shapes plus twice the number of hits.
    pub max_iterations: usize,
}

impl<T> ClipOptions<T>
where
    T: Real,
{
    pub fn new() -> Self {
        Self {
            pos_equal_eps: T::from(1e-6).unwrap(),
            key_decimals: 5,
            max_iterations: 100_000,
        }
    }

    fn intersect_options(&self) -> IntersectOptions<T> {
        IntersectOptions {
            pos_equal_eps: self.pos_equal_eps,
            key_decimals: self.key_decimals,
        }
    }
}

impl<T> Default for ClipOptions<T>
where
    T: Real,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Shape traced by a clip walk.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipResult<T = f64> {
    /// Closed clockwise result shape.
    pub shape: Vec<Segment<T>>,
    /// For each segment of `shape`, whether it runs along the clip boundary.
    pub on_clip: Vec<bool>,
    /// Hits where the switch decision was indeterminate (the walk stayed on its shape).
    pub ambiguous: Vec<Vector2<T>>,
}

impl<T> ClipResult<T>
where
    T: Real,
{
    /// Returns true if any segment ran along the clip boundary.
    #[inline]
    pub fn touches_clip(&self) -> bool {
        self.on_clip.iter().any(|&c| c)
    }
}

/// Index of the first vertex of `a` strictly inside `b` (vertex `i` is the start of segment `i`).
pub fn find_inside_start<T>(a: &[Segment<T>], b: &[Segment<T>], eps: T) -> Option<usize>
where
    T: Real,
{
    (0..a.len()).find(|&i| strictly_inside(shape_seg_start(a, i), b, eps))
}

/// Hit position along one segment.
#[derive(Debug, Copy, Clone)]
struct SegHit<T> {
    node: usize,
    dist: T,
    point: Vector2<T>,
}

/// Walk state: the shape the cursor is on, the segment and the next hit to visit on it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ClipCursor {
    OnShape {
        which: usize,
        segment_index: usize,
        hit_index: usize,
    },
}

impl ClipCursor {
    #[inline]
    fn which(&self) -> usize {
        let ClipCursor::OnShape { which, .. } = *self;
        which
    }
}

/// Where a walk starts: a point on a segment of one shape, before hit `hit_index` of that segment.
#[derive(Debug, Copy, Clone)]
struct WalkStart<T> {
    cursor: ClipCursor,
    point: Vector2<T>,
    dist: T,
}

/// Outcome of consulting the untangled hit under the cursor.
enum SwitchDecision {
    Switch { segment_index: usize },
    Stay,
    Ambiguous,
}

/// All hits between two shapes with their untangled transitions.
struct ClipGraph<'a, T>
where
    T: Real,
{
    shapes: [&'a [Segment<T>]; 2],
    records: Vec<Vec<SegmentIntersection<T>>>,
    hits: Vec<UntangledHit<T>>,
    seg_hits: [Vec<Vec<SegHit<T>>>; 2],
}

impl<'a, T> ClipGraph<'a, T>
where
    T: Real,
{
    fn build(
        a: &'a [Segment<T>],
        b: &'a [Segment<T>],
        options: &ClipOptions<T>,
    ) -> Result<Self, KernelError> {
        let eps = options.pos_equal_eps;
        let intr_opts = options.intersect_options();
        let shapes = [a, b];
        let prims = [shape_primitives(a, eps), shape_primitives(b, eps)];
        let indexes = [shape_aabb_index(a, eps), shape_aabb_index(b, eps)];

        let mut snapper = PointSnapper::new(options.key_decimals, eps);
        for (i, (start, seg)) in shape_spans(a).enumerate() {
            let bb = seg_bounding_box(start, seg);
            let candidates =
                indexes[1].query(bb.min_x - eps, bb.min_y - eps, bb.max_x + eps, bb.max_y + eps);
            for j in candidates {
                for p in intersections(&prims[0][i], &prims[1][j], &intr_opts) {
                    snapper.snap(p);
                }
            }
        }

        let mut records = Vec::with_capacity(snapper.len());
        let mut hits = Vec::with_capacity(snapper.len());
        let mut seg_hits = [vec![Vec::new(); a.len()], vec![Vec::new(); b.len()]];
        for node in 0..snapper.len() {
            let point = snapper.point(node);
            let mut node_records = Vec::new();
            for which in 0..2 {
                let shape = shapes[which];
                let mut candidates = indexes[which].query(point.x, point.y, point.x, point.y);
                candidates.sort_unstable();
                for i in candidates {
                    if !prims[which][i].contains_point(point, eps) {
                        continue;
                    }
                    let start = shape_seg_start(shape, i);
                    let si = SegmentIntersection::new(which, i, start, &shape[i], point, eps);
                    if si.enter {
                        seg_hits[which][i].push(SegHit {
                            node,
                            dist: si.dist,
                            point,
                        });
                    }
                    node_records.push(si);
                }
            }
            let hit = untangle_hit(point, &node_records, eps)?;
            records.push(node_records);
            hits.push(hit);
        }

        for list in seg_hits.iter_mut().flat_map(|s| s.iter_mut()) {
            list.sort_by(|x, y| x.dist.partial_cmp(&y.dist).unwrap_or(Ordering::Equal));
        }

        Ok(Self {
            shapes,
            records,
            hits,
            seg_hits,
        })
    }

    fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    fn switch_decision(&self, node: usize, which: usize) -> SwitchDecision {
        let records = &self.records[node];
        let mut ambiguous = false;
        for exit in &self.hits[node].exits {
            let record = &records[exit.intersection];
            if record.shape == which {
                continue;
            }
            match exit.going_inside {
                Some(true) => {
                    return SwitchDecision::Switch {
                        segment_index: record.segment_index,
                    }
                }
                Some(false) => {}
                None => ambiguous = true,
            }
        }

        if ambiguous {
            SwitchDecision::Ambiguous
        } else {
            SwitchDecision::Stay
        }
    }

    /// Path positions splitting segment `i` of shape `which` into pieces: its start, every hit
    /// and its end.
    fn piece_stops(&self, which: usize, i: usize) -> Vec<T> {
        let shape = self.shapes[which];
        let len = seg_length(shape_seg_start(shape, i), &shape[i]);
        let mut stops = vec![T::zero()];
        stops.extend(self.seg_hits[which][i].iter().map(|h| h.dist));
        stops.push(len);
        stops
    }

    /// Midpoints of all pieces of shape `which` as walk starts.
    fn piece_starts(&self, which: usize, eps: T) -> Vec<WalkStart<T>> {
        let shape = self.shapes[which];
        let mut result = Vec::new();
        for (i, (start, seg)) in shape_spans(shape).enumerate() {
            let stops = self.piece_stops(which, i);
            let len = stops[stops.len() - 1];
            if len <= eps {
                continue;
            }
            for (k, w) in stops.windows(2).enumerate() {
                if w[1] - w[0] <= eps {
                    continue;
                }
                let dist = (w[0] + w[1]) / T::two();
                result.push(WalkStart {
                    cursor: ClipCursor::OnShape {
                        which,
                        segment_index: i,
                        hit_index: k,
                    },
                    point: seg_point_at(start, seg, dist / len),
                    dist,
                });
            }
        }

        result
    }

    /// Walk both boundaries from `start` until the walk comes back to it.
    fn walk(&self, start: WalkStart<T>, options: &ClipOptions<T>) -> Result<ClipResult<T>, KernelError> {
        let eps = options.pos_equal_eps;
        let decimals = options.key_decimals;
        let limit = options.max_iterations;

        let mut result = Trace::new();
        let mut cursor = start.cursor;
        let mut current = start.point;
        let mut current_dist = start.dist;

        for step in 0..limit {
            let ClipCursor::OnShape {
                which,
                segment_index,
                hit_index,
            } = cursor;
            let shape = self.shapes[which];
            let seg = &shape[segment_index];
            let on_clip = which == 1;

            if step > 0 && cursor == start.cursor && current_dist <= start.dist + eps {
                result.push(current, seg.with_to(start.point), on_clip, false, eps, decimals);
                return Ok(result.finish(eps));
            }

            let list = &self.seg_hits[which][segment_index];
            if hit_index >= list.len() {
                let whole = current_dist <= eps;
                result.push(current, *seg, on_clip, whole, eps, decimals);
                current = seg.to();
                current_dist = T::zero();
                cursor = ClipCursor::OnShape {
                    which,
                    segment_index: (segment_index + 1) % shape.len(),
                    hit_index: 0,
                };
                continue;
            }

            let hit = list[hit_index];
            result.push(current, seg.with_to(hit.point), on_clip, false, eps, decimals);
            current = hit.point;
            current_dist = hit.dist;

            cursor = match self.switch_decision(hit.node, which) {
                SwitchDecision::Switch {
                    segment_index: other_index,
                } => {
                    let other = 1 - which;
                    let other_list = &self.seg_hits[other][other_index];
                    let (next_hit, dist) = match other_list.iter().position(|h| h.node == hit.node) {
                        Some(p) => (p + 1, other_list[p].dist),
                        None => (0, T::zero()),
                    };
                    current_dist = dist;
                    log::trace!(
                        "clip walk switched to shape {} segment {} at ({:?}, {:?})",
                        other,
                        other_index,
                        current.x,
                        current.y
                    );
                    ClipCursor::OnShape {
                        which: other,
                        segment_index: other_index,
                        hit_index: next_hit,
                    }
                }
                SwitchDecision::Stay => ClipCursor::OnShape {
                    which,
                    segment_index,
                    hit_index: hit_index + 1,
                },
                SwitchDecision::Ambiguous => {
                    log::warn!(
                        "indeterminate clip transition at ({:?}, {:?}), staying on shape {}",
                        current.x,
                        current.y,
                        which
                    );
                    result.result.ambiguous.push(current);
                    ClipCursor::OnShape {
                        which,
                        segment_index,
                        hit_index: hit_index + 1,
                    }
                }
            };
        }

        Err(KernelError::ClipIterationLimit { limit })
    }
}

/// Clip result under construction, with the start point of every emitted segment.
struct Trace<T> {
    result: ClipResult<T>,
    starts: Vec<Vector2<T>>,
}

impl<T> Trace<T>
where
    T: Real,
{
    fn new() -> Self {
        Self {
            result: ClipResult {
                shape: Vec::new(),
                on_clip: Vec::new(),
                ambiguous: Vec::new(),
            },
            starts: Vec::new(),
        }
    }

    /// Append the piece from `from` along `seg`, dropping pieces that collapse to a single key and
    /// extending the previous segment when `seg` continues it on the same boundary.
    fn push(&mut self, from: Vector2<T>, seg: Segment<T>, on_clip: bool, whole: bool, eps: T, decimals: u32) {
        let collapsed = CoordKey::new(from, decimals) == CoordKey::new(seg.to(), decimals);
        if collapsed && !(whole && seg_is_full_circle(from, &seg, eps)) {
            return;
        }

        let shape = &mut self.result.shape;
        if let (Some(last), Some(&last_start), Some(&last_on_clip)) =
            (shape.last_mut(), self.starts.last(), self.result.on_clip.last())
        {
            if last_on_clip == on_clip {
                if let Some(merged) = merge_segments(last_start, last, &seg, eps) {
                    *last = merged;
                    return;
                }
            }
        }

        shape.push(seg);
        self.result.on_clip.push(on_clip);
        self.starts.push(from);
    }

    /// Close the loop, joining the last and first segment when the walk started partway along one
    /// boundary segment.
    fn finish(mut self, eps: T) -> ClipResult<T> {
        let n = self.result.shape.len();
        if n >= 2 && self.result.on_clip[0] == self.result.on_clip[n - 1] {
            let shape = &mut self.result.shape;
            if let Some(merged) = merge_segments(self.starts[n - 1], &shape[n - 1], &shape[0], eps) {
                shape[0] = merged;
                shape.pop();
                self.result.on_clip.pop();
            }
        }

        self.result
    }
}

impl<T> ClipResult<T>
where
    T: Real,
{
    fn whole(shape: &[Segment<T>], on_clip: bool) -> Self {
        Self {
            shape: shape.to_vec(),
            on_clip: vec![on_clip; shape.len()],
            ambiguous: Vec::new(),
        }
    }
}

/// Clip `a` against `b` starting at vertex `start_index` of `a`, which must lie strictly inside
/// `b` (see [find_inside_start]). Both shapes must be clockwise.
///
/// The walk follows `a` until the boundary of `b` turns inside `a`, follows `b` until `a` turns
/// inside `b` and so on until it is back at the start vertex. Only the loop through the start
/// vertex is traced, [clip_shape] collects every loop.
///
/// # Examples
///
/// ```
/// # use inset_kernel::shape_closed;
/// # use inset_kernel::clip::*;
/// # use inset_kernel::segment::*;
/// # use inset_kernel::core::traits::*;
/// let a = shape_closed![line(10.0, 0.0), line(10.0, 10.0), line(0.0, 10.0), line(0.0, 0.0)];
/// let b = shape_closed![line(15.0, 5.0), line(15.0, 15.0), line(5.0, 15.0), line(5.0, 5.0)];
/// let options = ClipOptions::new();
/// let start = find_inside_start(&a, &b, options.pos_equal_eps).unwrap();
/// let result = clip_two(&a, &b, start, &options).unwrap();
/// assert!(shape_area(&result.shape).fuzzy_eq(25.0));
/// assert!(result.touches_clip());
/// ```
pub fn clip_two<T>(
    a: &[Segment<T>],
    b: &[Segment<T>],
    start_index: usize,
    options: &ClipOptions<T>,
) -> Result<ClipResult<T>, KernelError>
where
    T: Real,
{
    let graph = ClipGraph::build(a, b, options)?;
    graph.walk(
        WalkStart {
            cursor: ClipCursor::OnShape {
                which: 0,
                segment_index: start_index,
                hit_index: 0,
            },
            point: shape_seg_start(a, start_index),
            dist: T::zero(),
        },
        options,
    )
}

/// Returns true if every piece of shape `which` lies inside or on the other shape.
fn pieces_within<T>(graph: &ClipGraph<'_, T>, which: usize, eps: T) -> bool
where
    T: Real,
{
    let other = graph.shapes[1 - which];
    graph
        .piece_starts(which, eps)
        .iter()
        .all(|s| point_on_boundary(s.point, other, eps) || inside_path(s.point, other, eps))
}

/// Intersection of the clockwise shapes `subject` and `clip` as zero or more clockwise loops.
///
/// Handles containment without crossings, touching boundaries and results made of several
/// disjoint loops.
///
/// # Examples
///
/// ```
/// # use inset_kernel::shape_closed;
/// # use inset_kernel::clip::*;
/// # use inset_kernel::segment::*;
/// # use inset_kernel::core::traits::*;
/// // a wide bar clipped by a narrow tall one leaves a square in the middle
/// let bar = shape_closed![line(10.0, 4.0), line(10.0, 6.0), line(0.0, 6.0), line(0.0, 4.0)];
/// let clip = shape_closed![line(6.0, 0.0), line(6.0, 10.0), line(4.0, 10.0), line(4.0, 0.0)];
/// let loops = clip_shape(&bar, &clip, &ClipOptions::new()).unwrap();
/// assert_eq!(loops.len(), 1);
/// assert!(shape_area(&loops[0].shape).fuzzy_eq(4.0));
/// ```
pub fn clip_shape<T>(
    subject: &[Segment<T>],
    clip: &[Segment<T>],
    options: &ClipOptions<T>,
) -> Result<Vec<ClipResult<T>>, KernelError>
where
    T: Real,
{
    if subject.is_empty() || clip.is_empty() {
        return Ok(Vec::new());
    }

    let eps = options.pos_equal_eps;
    let graph = ClipGraph::build(subject, clip, options)?;

    if pieces_within(&graph, 0, eps) {
        return Ok(vec![ClipResult::whole(subject, false)]);
    }
    if pieces_within(&graph, 1, eps) {
        return Ok(vec![ClipResult::whole(clip, true)]);
    }
    if graph.is_empty() {
        return Ok(Vec::new());
    }

    let mut results: Vec<ClipResult<T>> = Vec::new();
    for which in 0..2 {
        let other = graph.shapes[1 - which];
        for start in graph.piece_starts(which, eps) {
            if !strictly_inside(start.point, other, eps) {
                continue;
            }
            if results
                .iter()
                .any(|r| point_on_boundary(start.point, &r.shape, eps))
            {
                continue;
            }
            log::trace!(
                "clip walk starting on shape {} at ({:?}, {:?})",
                start.cursor.which(),
                start.point.x,
                start.point.y
            );
            let traced = graph.walk(start, options)?;
            if !traced.shape.is_empty() {
                results.push(traced);
            }
        }
    }

    Ok(results)
}
