use super::Segment;
use crate::core::{math::Vector2, traits::Real};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a path in the input mapping.
pub type PathId = u64;

/// Identifier of a group in the input mapping.
pub type GroupId = u64;

/// How active clips apply to a path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum ClipMode {
    /// Every style entry is clipped.
    #[default]
    Normal,
    /// Clips are ignored.
    None,
    /// Shapes touching a clip boundary are dropped entirely.
    Remove,
    /// Only fill entries are clipped.
    Fills,
}

/// Kind of a single style entry.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase", tag = "kind")
)]
pub enum StyleKind<T = f64> {
    Fill,
    Line { width: T },
}

/// One fill or line definition of a path's style.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        rename_all = "camelCase",
        bound(deserialize = "T: Real + Deserialize<'de>")
    )
)]
pub struct StyleEntry<T = f64> {
    pub kind: StyleKind<T>,
    /// Inset distance applied before rendering this entry, positive shrinks the shape.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inset: Option<T>,
    /// Position of the entry in the source path's style list.
    pub original_index: usize,
}

impl<T> StyleEntry<T>
where
    T: Real,
{
    pub fn fill(original_index: usize) -> Self {
        Self {
            kind: StyleKind::Fill,
            inset: None,
            original_index,
        }
    }

    pub fn line(width: T, original_index: usize) -> Self {
        Self {
            kind: StyleKind::Line { width },
            inset: None,
            original_index,
        }
    }

    pub fn with_inset(mut self, inset: T) -> Self {
        self.inset = Some(inset);
        self
    }

    #[inline]
    pub fn is_fill(&self) -> bool {
        matches!(self.kind, StyleKind::Fill)
    }

    /// Inset amount, zero when unset.
    #[inline]
    pub fn inset_amount(&self) -> T {
        self.inset.unwrap_or_else(T::zero)
    }
}

/// Path made of segments starting at `origin`.
///
/// For closed paths the last segment returns to `origin`, so `segments` alone describes the closed
/// shape.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        rename_all = "camelCase",
        bound(deserialize = "T: Real + Deserialize<'de>")
    )
)]
pub struct Path<T = f64> {
    pub origin: Vector2<T>,
    pub segments: Vec<Segment<T>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub open: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub clip_mode: Option<ClipMode>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub style: Vec<StyleEntry<T>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub group: Option<GroupId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub order: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hidden: bool,
}

impl<T> Path<T>
where
    T: Real,
{
    /// Closed path from a closed shape (origin is the end of the last segment).
    pub fn closed(segments: Vec<Segment<T>>) -> Self {
        let origin = segments.last().map(|s| s.to()).unwrap_or_else(Vector2::zero);
        Self {
            origin,
            segments,
            open: false,
            clip_mode: None,
            style: Vec::new(),
            group: None,
            order: 0,
            hidden: false,
        }
    }

    /// Open path starting at `origin`.
    pub fn open(origin: Vector2<T>, segments: Vec<Segment<T>>) -> Self {
        Self {
            origin,
            segments,
            open: true,
            clip_mode: None,
            style: Vec::new(),
            group: None,
            order: 0,
            hidden: false,
        }
    }

    pub fn with_style(mut self, style: Vec<StyleEntry<T>>) -> Self {
        self.style = style;
        self
    }

    pub fn with_clip_mode(mut self, clip_mode: ClipMode) -> Self {
        self.clip_mode = Some(clip_mode);
        self
    }

    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Copy of this path carrying only the style entry at `index`.
    pub fn single_style(&self, index: usize) -> Option<Self> {
        let entry = *self.style.get(index)?;
        Some(Self {
            style: vec![entry],
            ..self.clone()
        })
    }

    /// Copy of this path with its geometry replaced by the closed `shape`.
    pub fn with_shape(&self, shape: Vec<Segment<T>>) -> Self {
        let origin = shape.last().map(|s| s.to()).unwrap_or(self.origin);
        Self {
            origin,
            segments: shape,
            open: false,
            ..self.clone()
        }
    }
}
