use super::{raw_offset_shape, InsetOptions, PieceKind, RawOffsetSeg};
use crate::{
    core::{
        math::{angle_is_between_eps, delta_angle, normalize_radians, Vector2},
        traits::Real,
    },
    error::KernelError,
    primitive::{intersections, shape_primitives, IntersectOptions, PointSnapper, Primitive},
    segment::{
        normalize_segments, seg_bounding_box, seg_closest_point, seg_dist_along, seg_end_tangent,
        seg_length, seg_midpoint, seg_start_tangent, shape_aabb_index, shape_area, shape_extents,
        shape_seg_start, unwrap_spatial_index, Segment,
    },
    winding::inside_path_with,
    AABB,
};
use static_aabb2d_index::StaticAABB2DIndexBuilder;
use std::{cmp::Ordering, collections::HashMap};

/// Simple closed loop extracted from an offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Region<T = f64> {
    pub segments: Vec<Segment<T>>,
    /// Primitive of each segment, see [shape_primitives].
    pub primitives: Vec<Primitive<T>>,
    pub bbox: AABB<T>,
    /// Signed area, positive for clockwise loops.
    pub area: T,
    /// Turn angle at the start of each segment (from the previous segment's end tangent).
    pub corner_turns: Vec<T>,
}

impl<T> Region<T>
where
    T: Real,
{
    pub fn new(segments: Vec<Segment<T>>, eps: T) -> Self {
        let primitives = shape_primitives(&segments, eps);
        let bbox = shape_extents(&segments)
            .unwrap_or_else(|| AABB::new(T::zero(), T::zero(), T::zero(), T::zero()));
        let area = shape_area(&segments);
        let n = segments.len();
        let corner_turns = (0..n)
            .map(|i| {
                let prev = (i + n - 1) % n;
                let prev_start = shape_seg_start(&segments, prev);
                let start = segments[prev].to();
                delta_angle(
                    seg_end_tangent(prev_start, &segments[prev]),
                    seg_start_tangent(start, &segments[i]),
                )
            })
            .collect();

        Self {
            segments,
            primitives,
            bbox,
            area,
            corner_turns,
        }
    }

    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.area > T::zero()
    }

    /// Returns true if `point` has a positive winding number against the region.
    #[inline]
    pub fn contains_point(&self, point: Vector2<T>, eps: T) -> bool {
        inside_path_with(point, &self.segments, &self.primitives, eps)
    }
}

/// Interior wedge at vertex `index` (the start of segment `index`) of a clockwise shape as the
/// leaving direction and the wedge's angular width toward increasing angle.
fn interior_wedge<T>(shape: &[Segment<T>], index: usize) -> (T, T)
where
    T: Real,
{
    let n = shape.len();
    let prev = (index + n - 1) % n;
    let vertex = shape_seg_start(shape, index);
    let out = seg_start_tangent(vertex, &shape[index]);
    let back = seg_end_tangent(shape_seg_start(shape, prev), &shape[prev]) + T::pi();
    (out, normalize_radians(back - out))
}

/// Point just inside a clockwise shape near vertex `index`, moved off the vertex along the bisector
/// of the interior angle by at most `nudge`.
///
/// # Examples
///
/// ```
/// # use inset_kernel::shape_closed;
/// # use inset_kernel::offset::*;
/// # use inset_kernel::core::math::*;
/// # use inset_kernel::core::traits::*;
/// let square = shape_closed![line(10.0, 0.0), line(10.0, 10.0), line(0.0, 10.0), line(0.0, 0.0)];
/// let p = find_inside_point(&square, 0, 2.0f64.sqrt());
/// assert!(p.fuzzy_eq(Vector2::new(1.0, 1.0)));
/// ```
pub fn find_inside_point<T>(shape: &[Segment<T>], index: usize, nudge: T) -> Vector2<T>
where
    T: Real,
{
    let n = shape.len();
    let prev = (index + n - 1) % n;
    let vertex = shape_seg_start(shape, index);
    let (out, width) = interior_wedge(shape, index);
    let quarter = |i: usize| seg_length(shape_seg_start(shape, i), &shape[i]) / T::four();
    let dist = num_traits::real::Real::min(nudge, num_traits::real::Real::min(quarter(index), quarter(prev)));
    vertex + Vector2::from_angle(out + width / T::two()).scale(dist)
}

/// Up to `options.max_samples` points from [find_inside_point] spread over the vertices.
pub fn inside_samples<T>(shape: &[Segment<T>], options: &InsetOptions<T>) -> Vec<Vector2<T>>
where
    T: Real,
{
    let n = shape.len();
    if n == 0 || options.max_samples == 0 {
        return Vec::new();
    }
    let step = n.div_ceil(options.max_samples).max(1);
    (0..n)
        .step_by(step)
        .map(|i| find_inside_point(shape, i, options.inside_nudge))
        .collect()
}

/// Piece of a raw offset between two consecutive nodes.
#[derive(Debug, Copy, Clone)]
struct SubSeg<T> {
    start: Vector2<T>,
    seg: Segment<T>,
    from: usize,
    to: usize,
    start_angle: T,
    end_angle: T,
    kind: PieceKind,
    source: usize,
}

/// Split every raw piece at its intersections with the other pieces.
fn split_at_intersects<T>(raw: &[RawOffsetSeg<T>], options: &InsetOptions<T>) -> Vec<SubSeg<T>>
where
    T: Real,
{
    let eps = options.pos_equal_eps;
    let n = raw.len();
    let intr_opts = IntersectOptions {
        pos_equal_eps: eps,
        key_decimals: options.resolve_key_decimals,
    };
    let prims: Vec<_> = raw
        .iter()
        .map(|r| Primitive::from_segment(r.start, &r.seg, eps))
        .collect();

    let mut builder = StaticAABB2DIndexBuilder::new(n);
    for r in raw {
        let bb = seg_bounding_box(r.start, &r.seg);
        builder.add(bb.min_x - eps, bb.min_y - eps, bb.max_x + eps, bb.max_y + eps);
    }
    let index = unwrap_spatial_index(builder);

    let mut snapper = PointSnapper::new(options.resolve_key_decimals, eps);
    let start_nodes: Vec<usize> = raw.iter().map(|r| snapper.snap(r.start)).collect();

    // the joint shared by two consecutive pieces is not an intersect
    let is_joint = |i: usize, j: usize, p: Vector2<T>| {
        ((i + 1) % n == j && p.fuzzy_eq_eps(raw[i].seg.to(), eps))
            || ((j + 1) % n == i && p.fuzzy_eq_eps(raw[j].seg.to(), eps))
    };

    let mut splits: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        let bb = seg_bounding_box(raw[i].start, &raw[i].seg);
        let candidates = index.query(bb.min_x - eps, bb.min_y - eps, bb.max_x + eps, bb.max_y + eps);
        for j in candidates {
            if j <= i {
                continue;
            }
            for p in intersections(&prims[i], &prims[j], &intr_opts) {
                if is_joint(i, j, p) {
                    continue;
                }
                let node = snapper.snap(p);
                splits[i].push(node);
                splits[j].push(node);
            }
        }
    }

    let mut result = Vec::with_capacity(n * 2);
    for (i, r) in raw.iter().enumerate() {
        let from_node = start_nodes[i];
        let to_node = start_nodes[(i + 1) % n];
        let mut stops: Vec<(T, usize)> = vec![(T::zero(), from_node)];
        for &node in &splits[i] {
            if node == from_node || node == to_node || stops.iter().any(|s| s.1 == node) {
                continue;
            }
            stops.push((seg_dist_along(r.start, &r.seg, snapper.point(node), eps), node));
        }
        stops.push((seg_length(r.start, &r.seg), to_node));
        stops.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        for w in stops.windows(2) {
            let (d0, n0) = w[0];
            let (d1, n1) = w[1];
            if n0 == n1 && d1 - d0 <= eps {
                continue;
            }
            let start = snapper.point(n0);
            let seg = r.seg.with_to(snapper.point(n1));
            result.push(SubSeg {
                start,
                seg,
                from: n0,
                to: n1,
                start_angle: seg_start_tangent(start, &seg),
                end_angle: seg_end_tangent(start, &seg),
                kind: r.kind,
                source: r.source,
            });
        }
    }

    result
}

/// Follow sub segments into closed loops, each returned as indices into `subs`.
///
/// At every node the walk takes the unvisited exit turning furthest toward increasing angle
/// (the interior side of a clockwise loop). Exits doubling back are taken last and equal turns
/// prefer the next sub segment of the raw loop. Arriving at a node already on the current walk
/// closes the loop formed since that node.
fn walk_loops<T>(subs: &[SubSeg<T>], options: &InsetOptions<T>) -> Result<Vec<Vec<usize>>, KernelError>
where
    T: Real,
{
    let eps = options.pos_equal_eps;
    let m = subs.len();
    let mut exits: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, s) in subs.iter().enumerate() {
        exits.entry(s.from).or_default().push(i);
    }

    let limit = options.max_loop_iterations.max(4 * m + 16);
    let mut steps = 0;
    let mut visited = vec![false; m];
    let mut loops = Vec::new();

    let choose_next = |current: usize, node: usize, visited: &[bool]| -> Option<usize> {
        let final_angle = subs[current].end_angle;
        let successor = (current + 1) % m;
        let mut best: Option<(usize, T, bool)> = None;
        for &cand in exits.get(&node)?.iter().filter(|&&c| !visited[c]) {
            let turn = delta_angle(final_angle, subs[cand].start_angle);
            let reverses = turn.abs() >= T::pi() - eps;
            let take = match best {
                None => true,
                Some((b, best_turn, best_reverses)) => {
                    if reverses != best_reverses {
                        !reverses
                    } else if turn.fuzzy_eq_eps(best_turn, eps) {
                        cand == successor && b != successor
                    } else {
                        turn > best_turn
                    }
                }
            };
            if take {
                best = Some((cand, turn, reverses));
            }
        }
        best.map(|b| b.0)
    };

    for first in 0..m {
        if visited[first] {
            continue;
        }

        let mut path = vec![first];
        let mut on_path: HashMap<usize, usize> = HashMap::new();
        on_path.insert(subs[first].from, 0);
        visited[first] = true;

        while let Some(&last) = path.last() {
            steps += 1;
            if steps > limit {
                return Err(KernelError::RegionIterationLimit { limit });
            }

            let node = subs[last].to;
            if let Some(&pos) = on_path.get(&node) {
                let cycle: Vec<usize> = path.drain(pos..).collect();
                for &c in &cycle {
                    on_path.remove(&subs[c].from);
                }
                loops.push(cycle);
                continue;
            }

            match choose_next(last, node, &visited) {
                Some(next) => {
                    visited[next] = true;
                    on_path.insert(node, path.len());
                    path.push(next);
                }
                None => {
                    log::debug!("discarding open walk of {} pieces ending at node {}", path.len(), node);
                    break;
                }
            }
        }
    }

    Ok(loops)
}

/// Returns true if every main piece of the loop keeps at least `|amount|` from the original shape.
fn loop_keeps_distance<T>(
    subs: &[SubSeg<T>],
    cycle: &[usize],
    original: &[Segment<T>],
    original_index: &static_aabb2d_index::StaticAABB2DIndex<T>,
    amount: T,
    options: &InsetOptions<T>,
) -> bool
where
    T: Real,
{
    let min_dist = amount.abs() - options.offset_dist_eps;
    let min_dist_sq = min_dist * min_dist;
    let mut has_main = false;
    for sub in cycle.iter().map(|&c| &subs[c]) {
        if sub.kind != PieceKind::Main {
            continue;
        }
        has_main = true;
        if min_dist <= T::zero() {
            continue;
        }
        let mid = seg_midpoint(sub.start, &sub.seg);
        let too_close = original_index
            .query(mid.x - min_dist, mid.y - min_dist, mid.x + min_dist, mid.y + min_dist)
            .into_iter()
            .any(|i| {
                let start = shape_seg_start(original, i);
                let closest = seg_closest_point(start, &original[i], mid);
                (closest - mid).length_squared() < min_dist_sq
            });
        if too_close {
            return false;
        }
    }

    has_main
}

/// Returns true if `inner` lies within `outer`.
fn region_contains<T>(outer: &Region<T>, inner: &Region<T>, options: &InsetOptions<T>) -> bool
where
    T: Real,
{
    let eps = options.pos_equal_eps;
    let (ob, ib) = (&outer.bbox, &inner.bbox);
    if ib.min_x < ob.min_x - eps || ib.min_y < ob.min_y - eps || ib.max_x > ob.max_x + eps || ib.max_y > ob.max_y + eps {
        return false;
    }

    // loops sharing a corner compare their interior wedges there
    for i in 0..inner.segments.len() {
        let v = shape_seg_start(&inner.segments, i);
        let shared = (0..outer.segments.len())
            .find(|&j| shape_seg_start(&outer.segments, j).fuzzy_eq_eps(v, eps));
        if let Some(j) = shared {
            let (inner_out, inner_width) = interior_wedge(&inner.segments, i);
            let (outer_out, outer_width) = interior_wedge(&outer.segments, j);
            let bisector = inner_out + inner_width / T::two();
            return angle_is_between_eps(bisector, outer_out, outer_out + outer_width, eps);
        }
    }

    let inner_point = find_inside_point(&inner.segments, 0, options.inside_nudge);
    let outer_point = find_inside_point(&outer.segments, 0, options.inside_nudge);
    outer.contains_point(inner_point, eps) && !inner.contains_point(outer_point, eps)
}

/// Every closed loop followed along the pieces of `raw` once they are split at their crossings, in
/// either orientation.
pub(crate) fn simple_loops<T>(raw: &[RawOffsetSeg<T>], options: &InsetOptions<T>) -> Result<Vec<Vec<Segment<T>>>, KernelError>
where
    T: Real,
{
    let subs = split_at_intersects(raw, options);
    let loops = walk_loops(&subs, options)?;
    if loops.is_empty() {
        return Err(KernelError::UnresolvedOffset);
    }
    Ok(loops
        .iter()
        .map(|cycle| cycle.iter().map(|&c| subs[c].seg).collect())
        .collect())
}

/// Split a closed raw offset loop of `original` into the simple clockwise regions that are valid
/// offsets by `amount`.
///
/// A loop is kept when it winds clockwise, every main piece on it keeps `|amount|` from the
/// original shape, for insets some point just inside it is inside the original, and no larger kept
/// loop contains it.
///
/// # Errors
///
/// [KernelError::RegionIterationLimit] if following loops exceeds the iteration cap and
/// [KernelError::UnresolvedOffset] if no closed loop could be followed at all.
pub fn resolve_regions<T>(
    original: &[Segment<T>],
    raw: &[RawOffsetSeg<T>],
    amount: T,
    options: &InsetOptions<T>,
) -> Result<Vec<Region<T>>, KernelError>
where
    T: Real,
{
    let eps = options.pos_equal_eps;
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let subs = split_at_intersects(raw, options);
    let loops = walk_loops(&subs, options)?;
    if loops.is_empty() {
        return Err(KernelError::UnresolvedOffset);
    }

    let original_index = shape_aabb_index(original, eps);
    let original_prims = shape_primitives(original, eps);

    let mut candidates = Vec::with_capacity(loops.len());
    for cycle in &loops {
        let region = Region::new(cycle.iter().map(|&c| subs[c].seg).collect(), eps);
        if region.area <= eps {
            log::debug!("discarding loop with area {:?}", region.area);
            continue;
        }
        if !loop_keeps_distance(&subs, cycle, original, &original_index, amount, options) {
            log::debug!(
                "discarding loop from segments {:?} too close to the original",
                cycle.iter().map(|&c| subs[c].source).collect::<Vec<_>>()
            );
            continue;
        }
        if amount < T::zero()
            && !inside_samples(&region.segments, options)
                .into_iter()
                .any(|p| inside_path_with(p, original, &original_prims, eps))
        {
            log::debug!("discarding loop outside the original shape");
            continue;
        }
        candidates.push(region);
    }

    candidates.sort_by(|a, b| b.area.partial_cmp(&a.area).unwrap_or(Ordering::Equal));
    let mut kept: Vec<Region<T>> = Vec::with_capacity(candidates.len());
    for region in candidates {
        if kept.iter().any(|outer| region_contains(outer, &region, options)) {
            log::debug!("discarding loop contained in a larger region");
            continue;
        }
        kept.push(region);
    }

    Ok(kept
        .into_iter()
        .map(|r| {
            let origin = r.segments[r.segments.len() - 1].to();
            let (_, segments) = normalize_segments(origin, &r.segments, false, eps);
            Region::new(segments, eps)
        })
        .collect())
}

/// Shrink a clockwise shape by `inset` (negative grows it) and return the resulting regions.
///
/// An inset of zero returns the shape unchanged. Insetting by at least the shape's inradius
/// returns no regions.
///
/// # Examples
///
/// ```
/// # use inset_kernel::shape_closed;
/// # use inset_kernel::offset::*;
/// # use inset_kernel::core::traits::*;
/// let square = shape_closed![line(10.0, 0.0), line(10.0, 10.0), line(0.0, 10.0), line(0.0, 0.0)];
/// let regions = inset_shape(&square, 1.0, &InsetOptions::new()).unwrap();
/// assert_eq!(regions.len(), 1);
/// assert!(regions[0].area.fuzzy_eq(64.0));
/// assert!(inset_shape(&square, 6.0, &InsetOptions::new()).unwrap().is_empty());
/// ```
pub fn inset_shape<T>(shape: &[Segment<T>], inset: T, options: &InsetOptions<T>) -> Result<Vec<Region<T>>, KernelError>
where
    T: Real,
{
    let eps = options.pos_equal_eps;
    if shape.is_empty() {
        return Ok(Vec::new());
    }
    if inset.abs() < eps {
        return Ok(vec![Region::new(shape.to_vec(), eps)]);
    }

    let amount = -inset;
    let raw = raw_offset_shape(shape, amount, options);
    resolve_regions(shape, &raw, amount, options)
}
