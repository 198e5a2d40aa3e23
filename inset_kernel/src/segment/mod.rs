//! Segment and path data model plus per segment geometry helpers.
mod normalize;
mod path;
mod seg;
mod shape;

pub use normalize::*;
pub use path::*;
pub use seg::*;
pub use shape::*;
pub(crate) use shape::unwrap_spatial_index;

use crate::core::{math::Vector2, traits::Real};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Directed edge of a path ending at `to`.
///
/// A segment does not store its start point, it starts at the `to` of the previous segment in its
/// path (cyclically for closed shapes). An arc whose start and end coincide is a full circle.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase", tag = "kind")
)]
pub enum Segment<T = f64> {
    Line {
        to: Vector2<T>,
    },
    /// Circular arc around `center`. Clockwise arcs sweep toward increasing polar angle (clockwise
    /// on screen).
    Arc {
        center: Vector2<T>,
        to: Vector2<T>,
        clockwise: bool,
    },
}

impl<T> Segment<T>
where
    T: Real,
{
    #[inline]
    pub fn line(x: T, y: T) -> Self {
        Segment::Line {
            to: Vector2::new(x, y),
        }
    }

    #[inline]
    pub fn arc(center: Vector2<T>, to: Vector2<T>, clockwise: bool) -> Self {
        Segment::Arc {
            center,
            to,
            clockwise,
        }
    }

    /// End point of the segment.
    #[inline]
    pub fn to(&self) -> Vector2<T> {
        match self {
            Segment::Line { to } | Segment::Arc { to, .. } => *to,
        }
    }

    #[inline]
    pub fn is_arc(&self) -> bool {
        matches!(self, Segment::Arc { .. })
    }

    /// Same curve ending at `to` instead.
    #[inline]
    pub fn with_to(&self, to: Vector2<T>) -> Self {
        match *self {
            Segment::Line { .. } => Segment::Line { to },
            Segment::Arc {
                center, clockwise, ..
            } => Segment::Arc {
                center,
                to,
                clockwise,
            },
        }
    }

    /// Map every point of the segment through `f`.
    ///
    /// `f` must be a rigid motion (rotation and/or translation) for arcs to stay valid.
    #[inline]
    pub fn map_points<F>(&self, f: F) -> Self
    where
        F: Fn(Vector2<T>) -> Vector2<T>,
    {
        match *self {
            Segment::Line { to } => Segment::Line { to: f(to) },
            Segment::Arc {
                center,
                to,
                clockwise,
            } => Segment::Arc {
                center: f(center),
                to: f(to),
                clockwise,
            },
        }
    }
}
