//! Parallel offsets (insets) of closed shapes.
//!
//! [inset_segment] offsets one segment of a shape given its neighbours, [raw_offset_shape]
//! concatenates those into a closed loop that may cross itself, and [resolve_regions] splits such a
//! loop into the simple regions that are valid offsets of the original shape.
mod inset_seg;
mod resolve;

pub use inset_seg::*;
pub use resolve::*;

use crate::{
    core::{math::Vector2, traits::Real},
    segment::{shape_seg_start, Segment},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options for generating and resolving offsets.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct InsetOptions<T = f64> {
    /// Fuzzy comparison epsilon used for determining if two positions are equal.
    pub pos_equal_eps: T,
    /// Decimals kept when identifying self intersections of a raw offset loop. Higher than the
    /// general key precision so distinct near coincident hits stay apart.
    pub resolve_key_decimals: u32,
    /// Fuzzy comparison epsilon used when testing distance of offset pieces to the original shape
    /// for validity.
    pub offset_dist_eps: T,
    /// Distance a sample point is moved off a region's vertex into the region.
    pub inside_nudge: T,
    /// Maximum number of vertices sampled when testing a region against the original shape.
    pub max_samples: usize,
    /// Lower bound of the region walk's iteration cap, the cap grows with the input size.
    pub max_loop_iterations: usize,
}

impl<T> InsetOptions<T>
where
    T: Real,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            pos_equal_eps: T::from(1e-6).unwrap(),
            resolve_key_decimals: 8,
            offset_dist_eps: T::from(1e-4).unwrap(),
            inside_nudge: T::from(1e-3).unwrap(),
            max_samples: 8,
            max_loop_iterations: 100_000,
        }
    }
}

impl<T> Default for InsetOptions<T>
where
    T: Real,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// A segment together with its start point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Span<T = f64> {
    pub start: Vector2<T>,
    pub seg: Segment<T>,
}

impl<T> Span<T>
where
    T: Real,
{
    #[inline]
    pub fn new(start: Vector2<T>, seg: Segment<T>) -> Self {
        Self { start, seg }
    }

    /// Span of segment `index` of a closed shape.
    #[inline]
    pub fn of(shape: &[Segment<T>], index: usize) -> Self {
        Self {
            start: shape_seg_start(shape, index),
            seg: shape[index],
        }
    }

    #[inline]
    pub fn end(&self) -> Vector2<T> {
        self.seg.to()
    }
}

/// Role of an offset piece.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    /// Parallel shifted copy of (part of) the original segment.
    Main,
    /// Joint added at a corner to keep the offset loop connected.
    Connector,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OffsetPiece<T = f64> {
    pub seg: Segment<T>,
    pub kind: PieceKind,
}

impl<T> OffsetPiece<T> {
    #[inline]
    pub fn main(seg: Segment<T>) -> Self {
        Self {
            seg,
            kind: PieceKind::Main,
        }
    }

    #[inline]
    pub fn connector(seg: Segment<T>) -> Self {
        Self {
            seg,
            kind: PieceKind::Connector,
        }
    }
}

/// Offset of one segment: the shifted segment followed by the joint toward the next segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentInset<T = f64> {
    /// Start point of the first piece.
    pub start: Vector2<T>,
    pub pieces: Vec<OffsetPiece<T>>,
}

/// Piece of a raw offset loop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RawOffsetSeg<T = f64> {
    pub start: Vector2<T>,
    pub seg: Segment<T>,
    pub kind: PieceKind,
    /// Index of the original segment the piece was generated from.
    pub source: usize,
}

impl<T> RawOffsetSeg<T>
where
    T: Real,
{
    /// Every segment of `shape` as a main piece, used to resolve a shape's own self intersections.
    pub fn from_shape(shape: &[Segment<T>]) -> Vec<Self> {
        (0..shape.len())
            .map(|i| RawOffsetSeg {
                start: shape_seg_start(shape, i),
                seg: shape[i],
                kind: PieceKind::Main,
                source: i,
            })
            .collect()
    }
}
