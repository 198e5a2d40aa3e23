use crate::{
    clip::{clip_shape, ClipOptions},
    core::{
        math::{angle, midpoint, point_on_circle, Vector2},
        traits::Real,
    },
    error::{BooleanEngineError, KernelError},
    offset::{inside_samples, simple_loops, InsetOptions, RawOffsetSeg},
    segment::{arc_radius, normalize_segments, seg_sweep, shape_area, shape_seg_start, Segment},
    winding::inside_path,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Drawing command exchanged with a [BooleanEngine].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase", tag = "command")
)]
pub enum PathCommand<T = f64> {
    MoveTo { to: Vector2<T> },
    LineTo { to: Vector2<T> },
    /// Quadratic curve, not representable by line and arc segments.
    QuadTo { control: Vector2<T>, to: Vector2<T> },
    /// Rational quadratic, an exact circular arc when `weight` is the cosine of half its sweep.
    ConicTo {
        control: Vector2<T>,
        to: Vector2<T>,
        weight: T,
    },
    Close,
}

/// Clip region handed to [BooleanEngine::clip].
#[derive(Debug, Clone, PartialEq)]
pub struct ClipOperand<T = f64> {
    pub commands: Vec<PathCommand<T>>,
    /// Subtract the region instead of intersecting with it.
    pub outside: bool,
}

/// General polygon boolean engine used for clip compositions the kernel clipper does not cover.
pub trait BooleanEngine<T = f64>
where
    T: Real,
{
    /// Intersect `subject` with every inside operand and subtract every outside operand.
    fn clip(
        &self,
        subject: &[PathCommand<T>],
        clips: &[ClipOperand<T>],
    ) -> Result<Vec<PathCommand<T>>, BooleanEngineError>;

    /// Same area as `subject` without self intersections. Lobes a self crossing loop traces
    /// counter-clockwise come back as clockwise shapes of their own.
    fn simplify(&self, subject: &[PathCommand<T>]) -> Result<Vec<PathCommand<T>>, BooleanEngineError>;
}

/// Conic pieces (each at most a quarter turn) tracing the arc from `start` to `to`.
pub fn arc_to_conics<T>(start: Vector2<T>, seg: &Segment<T>) -> Vec<PathCommand<T>>
where
    T: Real,
{
    let Segment::Arc { center, to, .. } = *seg else {
        return vec![PathCommand::LineTo { to: seg.to() }];
    };

    let sweep = seg_sweep(start, seg);
    let quarter = T::half_pi() + T::lit(1e-9);
    let count = (sweep.abs() / quarter).ceil().to_usize().unwrap_or(1).max(1);
    let step = sweep / T::from(count).unwrap();
    let r = arc_radius(start, center, to);
    let a0 = angle(center, start);
    let half = step / T::two();
    let weight = half.abs().cos();

    (0..count)
        .map(|k| {
            let kf = T::from(k).unwrap();
            let mid = a0 + step * kf + half;
            let end = if k + 1 == count {
                to
            } else {
                point_on_circle(r, center, a0 + step * (kf + T::one()))
            };
            PathCommand::ConicTo {
                control: point_on_circle(r / weight, center, mid),
                to: end,
                weight,
            }
        })
        .collect()
}

/// Line or arc segment tracing the conic from `from` through `control` to `to`.
///
/// Weights that do not describe a circular arc below half a turn give a line.
pub fn conic_to_segment<T>(from: Vector2<T>, control: Vector2<T>, to: Vector2<T>, weight: T, eps: T) -> Segment<T>
where
    T: Real,
{
    let chord = (to - from).length();
    if chord < eps || weight <= eps || weight >= T::one() - eps {
        return Segment::Line { to };
    }

    let half = weight.acos();
    let r = (chord / T::two()) / half.sin();
    let m = midpoint(from, to);
    let toward_center = m - control;
    if toward_center.length() < eps {
        return Segment::Line { to };
    }
    let center = control + toward_center.normalize().scale(r / half.cos());
    let clockwise = (control - from).perp_dot(to - control) > T::zero();

    Segment::Arc {
        center,
        to,
        clockwise,
    }
}

/// Commands for a closed shape: a move to its start, one command per line, conics for arcs.
pub fn shape_to_commands<T>(shape: &[Segment<T>]) -> Vec<PathCommand<T>>
where
    T: Real,
{
    if shape.is_empty() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(shape.len() + 2);
    result.push(PathCommand::MoveTo {
        to: shape_seg_start(shape, 0),
    });
    for i in 0..shape.len() {
        match shape[i] {
            Segment::Line { to } => result.push(PathCommand::LineTo { to }),
            Segment::Arc { .. } => result.extend(arc_to_conics(shape_seg_start(shape, i), &shape[i])),
        }
    }
    result.push(PathCommand::Close);
    result
}

/// Closed clockwise shapes described by `commands`. Every sub path is closed back to its move.
///
/// # Errors
///
/// [KernelError::UnsupportedCurve] for quadratic commands.
pub fn commands_to_shapes<T>(commands: &[PathCommand<T>], eps: T) -> Result<Vec<Vec<Segment<T>>>, KernelError>
where
    T: Real,
{
    let mut shapes = Vec::new();
    let mut origin = Vector2::zero();
    let mut current = origin;
    let mut segments = Vec::new();

    let mut finish = |origin: Vector2<T>, segments: &mut Vec<Segment<T>>| {
        if segments.is_empty() {
            return;
        }
        let (_, shape) = normalize_segments(origin, segments, false, eps);
        segments.clear();
        if shape.len() > 1 || shape.iter().any(|s| s.is_arc()) {
            shapes.push(shape);
        }
    };

    for command in commands {
        match *command {
            PathCommand::MoveTo { to } => {
                finish(origin, &mut segments);
                origin = to;
                current = to;
            }
            PathCommand::LineTo { to } => {
                segments.push(Segment::Line { to });
                current = to;
            }
            PathCommand::ConicTo {
                control,
                to,
                weight,
            } => {
                segments.push(conic_to_segment(current, control, to, weight, eps));
                current = to;
            }
            PathCommand::QuadTo { .. } => {
                return Err(KernelError::UnsupportedCurve { command: "quadTo" })
            }
            PathCommand::Close => {
                finish(origin, &mut segments);
                current = origin;
            }
        }
    }
    finish(origin, &mut segments);

    Ok(shapes)
}

fn engine_failure(e: KernelError) -> BooleanEngineError {
    BooleanEngineError::Failed(e.to_string())
}

/// [BooleanEngine] built on the kernel itself.
///
/// Handles any number of inside clips by clipping with each in turn. Outside clips are reported as
/// unsupported.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct KernelBooleanEngine<T = f64>
where
    T: Real,
{
    pub clip_options: ClipOptions<T>,
    pub inset_options: InsetOptions<T>,
}

impl<T> KernelBooleanEngine<T>
where
    T: Real,
{
    pub fn new() -> Self {
        Self {
            clip_options: ClipOptions::new(),
            inset_options: InsetOptions::new(),
        }
    }
}

impl<T> BooleanEngine<T> for KernelBooleanEngine<T>
where
    T: Real,
{
    fn clip(
        &self,
        subject: &[PathCommand<T>],
        clips: &[ClipOperand<T>],
    ) -> Result<Vec<PathCommand<T>>, BooleanEngineError> {
        if clips.iter().any(|c| c.outside) {
            return Err(BooleanEngineError::Unsupported(
                "outside clips need a general boolean engine".to_string(),
            ));
        }

        let eps = self.clip_options.pos_equal_eps;
        let mut shapes = commands_to_shapes(subject, eps).map_err(engine_failure)?;
        for operand in clips {
            let clip_shapes = commands_to_shapes(&operand.commands, eps).map_err(engine_failure)?;
            let mut next = Vec::new();
            for shape in &shapes {
                for clip in &clip_shapes {
                    let loops = clip_shape(shape, clip, &self.clip_options).map_err(engine_failure)?;
                    next.extend(loops.into_iter().map(|l| l.shape));
                }
            }
            shapes = next;
        }

        Ok(shapes.iter().flat_map(|s| shape_to_commands(s)).collect())
    }

    fn simplify(&self, subject: &[PathCommand<T>]) -> Result<Vec<PathCommand<T>>, BooleanEngineError> {
        let eps = self.inset_options.pos_equal_eps;
        let shapes = commands_to_shapes(subject, eps).map_err(engine_failure)?;
        let mut result = Vec::new();
        for shape in &shapes {
            let raw = RawOffsetSeg::from_shape(shape);
            let loops = simple_loops(&raw, &self.inset_options).map_err(engine_failure)?;

            let (clockwise, reversed): (Vec<_>, Vec<_>) = loops
                .into_iter()
                .filter(|l| shape_area(l).abs() > eps)
                .partition(|l| shape_area(l) > T::zero());
            let mut kept: Vec<Vec<Segment<T>>> = clockwise
                .iter()
                .map(|l| normalize_segments(l[l.len() - 1].to(), l, false, eps).1)
                .collect();

            for lobe in &reversed {
                let (_, lobe) = normalize_segments(lobe[lobe.len() - 1].to(), lobe, false, eps);
                // a reversed loop inside a clockwise one is a hole under the nonzero rule
                let hole = inside_samples(&lobe, &self.inset_options)
                    .into_iter()
                    .any(|p| kept.iter().any(|k| inside_path(p, k, eps)));
                if hole {
                    log::debug!("dropping counter-clockwise loop inside a clockwise one");
                    continue;
                }
                kept.push(lobe);
            }

            for shape in &kept {
                result.extend(shape_to_commands(shape));
            }
        }

        Ok(result)
    }
}
