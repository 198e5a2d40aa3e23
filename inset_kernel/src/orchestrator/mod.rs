//! Drives insets and clips over a whole set of styled paths.
//!
//! [render_paths] visits visible paths in render order, projects each onto its individual style
//! entries, clips and insets every projection and returns the flattened list of simple paths. A
//! path whose processing fails falls back to its original geometry so one malformed shape never
//! blocks the rest.
mod cache;
mod engine;

pub use cache::*;
pub use engine::*;

use crate::{
    clip::{clip_shape, ClipOptions},
    core::{math::Vector2, traits::Real},
    error::KernelError,
    offset::{InsetOptions, Region},
    segment::{normalize_path, normalize_segments, shape_area, ClipMode, GroupId, Path, PathId, Segment},
};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options for [render_paths].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct KernelOptions<T = f64> {
    /// Fuzzy epsilon used for input normalization and area comparisons.
    pub pos_equal_eps: T,
    pub clip: ClipOptions<T>,
    pub inset: InsetOptions<T>,
    /// Decimals kept by [InsetCache] keys when the cache is created through
    /// [KernelOptions::new_cache].
    pub cache_decimals: u32,
}

impl<T> KernelOptions<T>
where
    T: Real,
{
    pub fn new() -> Self {
        Self {
            pos_equal_eps: T::from(1e-6).unwrap(),
            clip: ClipOptions::new(),
            inset: InsetOptions::new(),
            cache_decimals: 6,
        }
    }

    /// Empty cache matching these options.
    pub fn new_cache(&self) -> InsetCache<T> {
        InsetCache::new(self.cache_decimals)
    }
}

impl<T> Default for KernelOptions<T>
where
    T: Real,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Metadata shared by the paths of a group.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct Group {
    pub hidden: bool,
    /// Render order of the group's paths, replaces each path's own order as primary sort key.
    pub order: i64,
    /// Clip mode for member paths that do not set one.
    pub clip_mode: Option<ClipMode>,
    /// Overrides [Clip::default_inset_before] for member paths.
    pub insert_clip_before: Option<bool>,
}

/// Active clip region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Clip<T = f64> {
    /// Closed clockwise clip shape.
    pub shape: Vec<Segment<T>>,
    /// Keep what lies outside the shape instead of inside.
    #[cfg_attr(feature = "serde", serde(default))]
    pub outside: bool,
    /// Apply the clip before insetting (otherwise after).
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_inset_before: bool,
}

impl<T> Clip<T>
where
    T: Real,
{
    pub fn inside(shape: Vec<Segment<T>>) -> Self {
        Self {
            shape,
            outside: false,
            default_inset_before: false,
        }
    }

    pub fn outside(shape: Vec<Segment<T>>) -> Self {
        Self {
            shape,
            outside: true,
            default_inset_before: false,
        }
    }

    pub fn with_inset_before(mut self, before: bool) -> Self {
        self.default_inset_before = before;
        self
    }
}

/// Everything [render_paths] draws from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        rename_all = "camelCase",
        bound(deserialize = "T: Real + Deserialize<'de>")
    )
)]
pub struct RenderInput<T = f64> {
    pub paths: HashMap<PathId, Path<T>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub groups: HashMap<GroupId, Group>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub clips: Vec<Clip<T>>,
}

impl<T> RenderInput<T>
where
    T: Real,
{
    pub fn new() -> Self {
        Self {
            paths: HashMap::new(),
            groups: HashMap::new(),
            clips: Vec::new(),
        }
    }

    pub fn with_path(mut self, id: PathId, path: Path<T>) -> Self {
        self.paths.insert(id, path);
        self
    }

    pub fn with_group(mut self, id: GroupId, group: Group) -> Self {
        self.groups.insert(id, group);
        self
    }

    pub fn with_clip(mut self, clip: Clip<T>) -> Self {
        self.clips.push(clip);
        self
    }
}

impl<T> Default for RenderInput<T>
where
    T: Real,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Single style output path tagged with the id of the path it came from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RenderPath<T = f64> {
    pub source: PathId,
    pub path: Path<T>,
}

/// Clip mode in effect for `path`.
pub fn effective_clip_mode<T>(path: &Path<T>, group: Option<&Group>) -> ClipMode
where
    T: Real,
{
    path.clip_mode
        .or_else(|| group.and_then(|g| g.clip_mode))
        .unwrap_or_default()
}

fn clip_applies(mode: ClipMode, fill: bool) -> bool {
    match mode {
        ClipMode::Normal | ClipMode::Remove => true,
        ClipMode::None => false,
        ClipMode::Fills => fill,
    }
}

/// Clip each shape by every clip in `clips`. In remove mode any shape touching a clip boundary is
/// dropped instead.
fn apply_clips<T>(
    shapes: Vec<Vec<Segment<T>>>,
    clips: &[&Clip<T>],
    mode: ClipMode,
    engine: &dyn BooleanEngine<T>,
    options: &KernelOptions<T>,
) -> Result<Vec<Vec<Segment<T>>>, KernelError>
where
    T: Real,
{
    if clips.is_empty() {
        return Ok(shapes);
    }

    let eps = options.pos_equal_eps;
    let mut result = Vec::with_capacity(shapes.len());
    for shape in shapes {
        let (clipped, touched) = match clips {
            [only] if !only.outside => {
                let loops = clip_shape(&shape, &only.shape, &options.clip)?;
                let touched = loops.iter().any(|l| l.touches_clip());
                (loops.into_iter().map(|l| l.shape).collect::<Vec<_>>(), touched)
            }
            _ => {
                let operands: Vec<ClipOperand<T>> = clips
                    .iter()
                    .map(|c| ClipOperand {
                        commands: shape_to_commands(&c.shape),
                        outside: c.outside,
                    })
                    .collect();
                let commands = engine.clip(&shape_to_commands(&shape), &operands)?;
                let loops = commands_to_shapes(&commands, eps)?;
                let area: T = loops.iter().fold(T::zero(), |acc, l| acc + shape_area(l));
                let touched = (area - shape_area(&shape)).abs() > eps;
                (loops, touched)
            }
        };

        if mode == ClipMode::Remove && touched {
            log::debug!("removing shape touching a clip boundary");
            continue;
        }
        result.extend(clipped);
    }

    Ok(result)
}

/// Inset `shape` through the cache, retrying on simplified geometry when its offset cannot be
/// resolved.
fn inset_with_fallback<T>(
    shape: Vec<Segment<T>>,
    inset: T,
    engine: &dyn BooleanEngine<T>,
    cache: &mut InsetCache<T>,
    options: &KernelOptions<T>,
) -> Result<Vec<Vec<Segment<T>>>, KernelError>
where
    T: Real,
{
    if inset.abs() < options.pos_equal_eps {
        return Ok(vec![shape]);
    }

    let to_shapes = |regions: Vec<Region<T>>| regions.into_iter().map(|r| r.segments);
    match cache.inset(&shape, inset, &options.inset) {
        Ok(regions) => Ok(to_shapes(regions).collect()),
        Err(e @ (KernelError::UnresolvedOffset | KernelError::RegionIterationLimit { .. })) => {
            log::debug!("{e}, retrying inset on simplified geometry");
            let simplified = engine.simplify(&shape_to_commands(&shape))?;
            let mut result = Vec::new();
            for s in commands_to_shapes(&simplified, options.pos_equal_eps)? {
                result.extend(to_shapes(cache.inset(&s, inset, &options.inset)?));
            }
            Ok(result)
        }
        Err(e) => Err(e),
    }
}

/// Single style paths drawn for `path`, one group of results per style entry in style order.
///
/// `clips` are the active clips, `group` the path's group metadata if any.
///
/// # Errors
///
/// Any kernel or boolean engine failure met while clipping or insetting one of the entries.
pub fn render_path<T>(
    path: &Path<T>,
    group: Option<&Group>,
    clips: &[Clip<T>],
    engine: &dyn BooleanEngine<T>,
    cache: &mut InsetCache<T>,
    options: &KernelOptions<T>,
) -> Result<Vec<Path<T>>, KernelError>
where
    T: Real,
{
    let path = normalize_path(path, options.pos_equal_eps);
    let mode = effective_clip_mode(&path, group);
    let is_before = |c: &Clip<T>| {
        group
            .and_then(|g| g.insert_clip_before)
            .unwrap_or(c.default_inset_before)
    };
    let before: Vec<&Clip<T>> = clips.iter().filter(|c| is_before(c)).collect();
    let after: Vec<&Clip<T>> = clips.iter().filter(|c| !is_before(c)).collect();

    let mut result = Vec::new();
    for (i, entry) in path.style.iter().enumerate() {
        let Some(single) = path.single_style(i) else {
            continue;
        };
        if path.open || path.segments.is_empty() {
            result.push(single);
            continue;
        }

        let clipped = clip_applies(mode, entry.is_fill());
        let mut shapes = vec![path.segments.clone()];
        if clipped {
            shapes = apply_clips(shapes, &before, mode, engine, options)?;
        }

        let mut inset_shapes = Vec::with_capacity(shapes.len());
        for shape in shapes {
            inset_shapes.extend(inset_with_fallback(
                shape,
                entry.inset_amount(),
                engine,
                cache,
                options,
            )?);
        }

        if clipped {
            inset_shapes = apply_clips(inset_shapes, &after, mode, engine, options)?;
        }

        result.extend(inset_shapes.into_iter().map(|s| single.with_shape(s)));
    }

    Ok(result)
}

/// Inset and clip every visible path of `input`, returning the resulting single style paths in
/// render order.
///
/// Paths are ordered by their group's order (their own order when ungrouped), then their own order,
/// then id. Hidden paths, paths in hidden groups and paths without style entries produce nothing.
/// A path whose processing fails is logged and drawn with its original geometry instead.
///
/// # Examples
///
/// ```
/// # use inset_kernel::shape_closed;
/// # use inset_kernel::orchestrator::*;
/// # use inset_kernel::segment::*;
/// # use inset_kernel::core::traits::*;
/// let square = shape_closed![line(10.0, 0.0), line(10.0, 10.0), line(0.0, 10.0), line(0.0, 0.0)];
/// let path = Path::closed(square).with_style(vec![
///     StyleEntry::fill(0),
///     StyleEntry::line(1.0, 1).with_inset(1.0),
/// ]);
/// let input = RenderInput::new().with_path(7, path);
/// let options = KernelOptions::new();
/// let mut cache = options.new_cache();
/// let output = render_paths(&input, &KernelBooleanEngine::new(), &mut cache, &options);
/// assert_eq!(output.len(), 2);
/// assert!(shape_area(&output[0].path.segments).fuzzy_eq(100.0));
/// assert!(shape_area(&output[1].path.segments).fuzzy_eq(64.0));
/// assert_eq!(output[1].path.style[0].original_index, 1);
/// ```
pub fn render_paths<T>(
    input: &RenderInput<T>,
    engine: &dyn BooleanEngine<T>,
    cache: &mut InsetCache<T>,
    options: &KernelOptions<T>,
) -> Vec<RenderPath<T>>
where
    T: Real,
{
    let group_of = |path: &Path<T>| path.group.and_then(|g| input.groups.get(&g));

    let mut visible: Vec<(PathId, &Path<T>)> = input
        .paths
        .iter()
        .map(|(&id, path)| (id, path))
        .filter(|&(id, path)| {
            let hidden = path.hidden || group_of(path).is_some_and(|g| g.hidden);
            if hidden {
                log::trace!("skipping hidden path {id}");
            }
            !hidden
        })
        .collect();
    visible.sort_by_key(|&(id, path)| {
        let primary = group_of(path).map_or(path.order, |g| g.order);
        (primary, path.order, id)
    });

    let eps = options.pos_equal_eps;
    let clips: Vec<Clip<T>> = input
        .clips
        .iter()
        .map(|c| {
            let origin = c.shape.last().map_or_else(Vector2::zero, |s| s.to());
            Clip {
                shape: normalize_segments(origin, &c.shape, false, eps).1,
                ..c.clone()
            }
        })
        .collect();

    let mut result = Vec::new();
    for (id, path) in visible {
        if path.style.is_empty() {
            log::debug!("path {id} has no style entries");
            continue;
        }

        match render_path(path, group_of(path), &clips, engine, cache, options) {
            Ok(paths) => result.extend(paths.into_iter().map(|p| RenderPath { source: id, path: p })),
            Err(e) => {
                log::warn!("path {id} drawn without inset or clip: {e}");
                result.extend(
                    (0..path.style.len())
                        .filter_map(|i| path.single_style(i))
                        .map(|p| RenderPath { source: id, path: p }),
                );
            }
        }
    }

    log::debug!(
        "rendered {} paths, inset cache {} hits / {} misses",
        result.len(),
        cache.hits(),
        cache.misses()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;
    use crate::error::BooleanEngineError;
    use crate::segment::{shape_extents, StyleEntry};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Segment> {
        vec![
            Segment::line(x1, y0),
            Segment::line(x1, y1),
            Segment::line(x0, y1),
            Segment::line(x0, y0),
        ]
    }

    fn filled(shape: Vec<Segment>, inset: f64) -> Path {
        Path::closed(shape).with_style(vec![StyleEntry::fill(0).with_inset(inset)])
    }

    fn render(input: &RenderInput) -> Vec<RenderPath> {
        let options = KernelOptions::new();
        let mut cache = options.new_cache();
        render_paths(input, &KernelBooleanEngine::new(), &mut cache, &options)
    }

    fn areas(output: &[RenderPath]) -> Vec<f64> {
        output.iter().map(|r| shape_area(&r.path.segments)).collect()
    }

    struct FailingEngine;

    impl BooleanEngine for FailingEngine {
        fn clip(
            &self,
            _subject: &[PathCommand],
            _clips: &[ClipOperand],
        ) -> Result<Vec<PathCommand>, BooleanEngineError> {
            Err(BooleanEngineError::Failed("offline".to_string()))
        }

        fn simplify(&self, _subject: &[PathCommand]) -> Result<Vec<PathCommand>, BooleanEngineError> {
            Err(BooleanEngineError::Failed("offline".to_string()))
        }
    }

    #[test]
    fn hidden_paths_and_groups_are_skipped() {
        let mut hidden = filled(rect(0.0, 0.0, 10.0, 10.0), 0.0);
        hidden.hidden = true;
        let input = RenderInput::new()
            .with_path(1, hidden)
            .with_path(2, filled(rect(0.0, 0.0, 10.0, 10.0), 0.0).with_group(9))
            .with_path(3, filled(rect(0.0, 0.0, 5.0, 5.0), 0.0))
            .with_group(
                9,
                Group {
                    hidden: true,
                    ..Group::default()
                },
            );

        let output = render(&input);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].source, 3);
    }

    #[test]
    fn render_order_follows_group_then_path_then_id() {
        let input = RenderInput::new()
            .with_path(1, filled(rect(0.0, 0.0, 1.0, 1.0), 0.0).with_order(5))
            .with_path(2, filled(rect(0.0, 0.0, 1.0, 1.0), 0.0).with_group(4).with_order(1))
            .with_path(3, filled(rect(0.0, 0.0, 1.0, 1.0), 0.0).with_group(4).with_order(0))
            .with_path(4, filled(rect(0.0, 0.0, 1.0, 1.0), 0.0).with_order(5))
            .with_group(
                4,
                Group {
                    order: 2,
                    ..Group::default()
                },
            );

        let order: Vec<PathId> = render(&input).iter().map(|r| r.source).collect();
        assert_eq!(order, vec![3, 2, 1, 4]);
    }

    #[test]
    fn each_style_entry_is_projected_and_inset() {
        let path = Path::closed(rect(0.0, 0.0, 10.0, 10.0)).with_style(vec![
            StyleEntry::fill(0).with_inset(2.0),
            StyleEntry::line(0.5, 1),
        ]);
        let output = render(&RenderInput::new().with_path(1, path));
        assert_eq!(output.len(), 2);
        assert_fuzzy_eq!(shape_area(&output[0].path.segments), 36.0);
        assert_fuzzy_eq!(shape_area(&output[1].path.segments), 100.0);
        assert_eq!(output[0].path.style.len(), 1);
        assert_eq!(output[1].path.style[0].original_index, 1);
        assert!(output.iter().all(|r| r.source == 1));
    }

    #[test]
    fn insetting_past_the_inradius_draws_nothing() {
        let output = render(&RenderInput::new().with_path(1, filled(rect(0.0, 0.0, 10.0, 10.0), 5.5)));
        assert!(output.is_empty());
    }

    #[test]
    fn paths_without_style_are_skipped() {
        let output = render(&RenderInput::new().with_path(1, Path::closed(rect(0.0, 0.0, 10.0, 10.0))));
        assert!(output.is_empty());
    }

    #[test]
    fn open_paths_pass_through() {
        let path = Path::open(
            Vector2::new(0.0, 0.0),
            vec![Segment::line(10.0, 0.0), Segment::line(10.0, 10.0)],
        )
        .with_style(vec![StyleEntry::line(1.0, 0).with_inset(2.0)]);
        let input = RenderInput::new()
            .with_path(1, path.clone())
            .with_clip(Clip::inside(rect(5.0, -5.0, 15.0, 15.0)));
        let output = render(&input);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].path.segments, path.segments);
    }

    #[test]
    fn clip_order_before_and_after_inset() {
        let clip = Clip::inside(rect(5.0, -5.0, 15.0, 15.0));

        // inset to 1..9 first, then cut at x = 5
        let after = RenderInput::new()
            .with_path(1, filled(rect(0.0, 0.0, 10.0, 10.0), 1.0))
            .with_clip(clip.clone());
        assert_eq!(areas(&render(&after)).len(), 1);
        assert_fuzzy_eq!(areas(&render(&after))[0], 32.0);

        // cut to 5..10 first, then inset
        let before = RenderInput::new()
            .with_path(1, filled(rect(0.0, 0.0, 10.0, 10.0), 1.0))
            .with_clip(clip.clone().with_inset_before(true));
        assert_fuzzy_eq!(areas(&render(&before))[0], 24.0);

        // group flag overrides the clip default
        let overridden = RenderInput::new()
            .with_path(1, filled(rect(0.0, 0.0, 10.0, 10.0), 1.0).with_group(1))
            .with_group(
                1,
                Group {
                    insert_clip_before: Some(true),
                    ..Group::default()
                },
            )
            .with_clip(clip);
        let output = render(&overridden);
        assert_fuzzy_eq!(shape_area(&output[0].path.segments), 24.0);
        let bb = shape_extents(&output[0].path.segments).unwrap();
        assert_fuzzy_eq!(bb.min_x, 6.0);
        assert_fuzzy_eq!(bb.max_x, 9.0);
    }

    #[test]
    fn clip_modes() {
        let path = Path::closed(rect(0.0, 0.0, 10.0, 10.0))
            .with_style(vec![StyleEntry::fill(0), StyleEntry::line(1.0, 1)]);
        let with_mode = |mode: ClipMode| {
            RenderInput::new()
                .with_path(1, path.clone().with_clip_mode(mode))
                .with_clip(Clip::inside(rect(5.0, -5.0, 15.0, 15.0)))
        };

        let normal = areas(&render(&with_mode(ClipMode::Normal)));
        assert_eq!(normal.len(), 2);
        assert_fuzzy_eq!(normal[0], 50.0);
        assert_fuzzy_eq!(normal[1], 50.0);

        let none = areas(&render(&with_mode(ClipMode::None)));
        assert_fuzzy_eq!(none[0], 100.0);
        assert_fuzzy_eq!(none[1], 100.0);

        let fills = areas(&render(&with_mode(ClipMode::Fills)));
        assert_fuzzy_eq!(fills[0], 50.0);
        assert_fuzzy_eq!(fills[1], 100.0);

        assert!(render(&with_mode(ClipMode::Remove)).is_empty());
    }

    #[test]
    fn remove_mode_keeps_shapes_clear_of_the_clip_boundary() {
        let input = RenderInput::new()
            .with_path(1, filled(rect(0.0, 0.0, 4.0, 4.0), 0.0).with_clip_mode(ClipMode::Remove))
            .with_clip(Clip::inside(rect(-5.0, -5.0, 15.0, 15.0)));
        let output = render(&input);
        assert_eq!(output.len(), 1);
        assert_fuzzy_eq!(shape_area(&output[0].path.segments), 16.0);
    }

    #[test]
    fn group_clip_mode_applies_to_members() {
        let input = RenderInput::new()
            .with_path(1, filled(rect(0.0, 0.0, 10.0, 10.0), 0.0).with_group(3))
            .with_group(
                3,
                Group {
                    clip_mode: Some(ClipMode::None),
                    ..Group::default()
                },
            )
            .with_clip(Clip::inside(rect(5.0, -5.0, 15.0, 15.0)));
        assert_fuzzy_eq!(areas(&render(&input))[0], 100.0);
    }

    #[test]
    fn multiple_clips_go_through_the_engine() {
        let input = RenderInput::new()
            .with_path(1, filled(rect(0.0, 0.0, 10.0, 10.0), 0.0))
            .with_clip(Clip::inside(rect(5.0, -5.0, 15.0, 15.0)))
            .with_clip(Clip::inside(rect(-5.0, 5.0, 15.0, 15.0)));
        let output = areas(&render(&input));
        assert_eq!(output.len(), 1);
        assert_fuzzy_eq!(output[0], 25.0);
    }

    #[test]
    fn failures_fall_back_to_original_geometry() {
        let input = RenderInput::new()
            .with_path(1, filled(rect(0.0, 0.0, 10.0, 10.0), 1.0))
            .with_clip(Clip::inside(rect(5.0, -5.0, 15.0, 15.0)))
            .with_clip(Clip::inside(rect(-5.0, 5.0, 15.0, 15.0)));
        let options = KernelOptions::new();
        let mut cache = options.new_cache();
        let output = render_paths(&input, &FailingEngine, &mut cache, &options);
        assert_eq!(output.len(), 1);
        assert_fuzzy_eq!(shape_area(&output[0].path.segments), 100.0);

        // the built in engine cannot subtract
        let outside = RenderInput::new()
            .with_path(1, filled(rect(0.0, 0.0, 10.0, 10.0), 0.0))
            .with_clip(Clip::outside(rect(5.0, 5.0, 15.0, 15.0)));
        assert_fuzzy_eq!(areas(&render(&outside))[0], 100.0);
    }

    #[test]
    fn repeated_shapes_hit_the_cache() {
        let input = RenderInput::new()
            .with_path(1, filled(rect(0.0, 0.0, 10.0, 10.0), 1.0))
            .with_path(2, filled(rect(30.0, 30.0, 40.0, 40.0), 1.0));
        let options = KernelOptions::new();
        let mut cache = options.new_cache();
        let output = render_paths(&input, &KernelBooleanEngine::new(), &mut cache, &options);
        assert_eq!(output.len(), 2);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
        let bb = shape_extents(&output[1].path.segments).unwrap();
        assert_fuzzy_eq!(bb.min_x, 31.0);
        assert_fuzzy_eq!(bb.max_y, 39.0);
    }
}
