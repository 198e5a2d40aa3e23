//! 2D boundary geometry kernel for closed shapes made of line and circular arc segments.
//!
//! Coordinates are screen oriented (y grows downward). A closed shape is clockwise on screen when
//! its shoelace area is positive, which is the orientation every clipping, winding and inset
//! routine expects.
//!
//! The main entry points are:
//!
//! * [primitive::intersections] for analytic line/circle intersections,
//! * [winding::inside_path] for point membership,
//! * [untangle::untangle_hit] and [clip::clip_shape] for clipping one shape against another,
//! * [offset::inset_segment], [offset::resolve_regions] and [offset::inset_shape] for
//!   parallel offsets,
//! * [orchestrator::render_paths] to drive insets and clips over a whole path list.
#[macro_use]
mod macros;
pub mod clip;
pub mod core;
pub mod error;
pub mod offset;
pub mod orchestrator;
pub mod primitive;
pub mod segment;
pub mod untangle;
pub mod winding;

pub use error::KernelError;
pub use static_aabb2d_index::AABB;
