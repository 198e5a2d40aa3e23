//! Analytic line/circle primitives used by every intersection routine.
mod coord_key;
mod intersects;

pub use coord_key::*;
pub use intersects::*;

use crate::{
    core::{
        math::{angle, angle_is_between_eps, min_max, LineEq, Vector2},
        traits::Real,
    },
    segment::{arc_radius, shape_spans, Segment},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed range `[min, max]` restricting a line primitive, in x for sloped lines or y for vertical
/// lines.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineLimit<T = f64> {
    pub min: T,
    pub max: T,
}

/// Angular range restricting a circle primitive to an arc.
///
/// The arc runs from `start` toward increasing angle (clockwise on screen) until `end`.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AngleLimit<T = f64> {
    pub start: T,
    pub end: T,
}

#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinePrimitive<T = f64> {
    pub eq: LineEq<T>,
    pub limit: Option<LineLimit<T>>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CirclePrimitive<T = f64> {
    pub center: Vector2<T>,
    pub radius: T,
    pub limit: Option<AngleLimit<T>>,
}

/// Analytic form of a segment: an infinite line or full circle, optionally limited.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primitive<T = f64> {
    Line(LinePrimitive<T>),
    Circle(CirclePrimitive<T>),
}

impl<T> LinePrimitive<T>
where
    T: Real,
{
    /// Line primitive limited to the segment `p0` to `p1`.
    pub fn segment(p0: Vector2<T>, p1: Vector2<T>, eps: T) -> Self {
        let eq = LineEq::through(p0, p1, eps);
        let (min, max) = min_max(eq.param_of(p0), eq.param_of(p1));
        Self {
            eq,
            limit: Some(LineLimit { min, max }),
        }
    }

    /// Unlimited line.
    pub fn infinite(eq: LineEq<T>) -> Self {
        Self { eq, limit: None }
    }

    /// Tests if `point` (assumed on the infinite line) is inside the limit.
    #[inline]
    pub fn within_limit(&self, point: Vector2<T>, eps: T) -> bool {
        match self.limit {
            None => true,
            Some(LineLimit { min, max }) => self.eq.param_of(point).fuzzy_in_range_eps(min, max, eps),
        }
    }

    /// End points of the limit (`None` when unlimited).
    pub fn limit_points(&self) -> Option<(Vector2<T>, Vector2<T>)> {
        self.limit
            .map(|l| (self.eq.point_at(l.min), self.eq.point_at(l.max)))
    }
}

impl<T> CirclePrimitive<T>
where
    T: Real,
{
    /// Circle primitive limited to the arc from `start` to `end` around `center`.
    ///
    /// Counter clockwise arcs are stored with their range flipped so the limit always runs toward
    /// increasing angle. Arcs closing on themselves get no limit.
    pub fn arc(start: Vector2<T>, center: Vector2<T>, end: Vector2<T>, clockwise: bool, eps: T) -> Self {
        let radius = arc_radius(start, center, end);
        if start.fuzzy_eq_eps(end, eps) {
            return Self::full(center, radius);
        }
        let a0 = angle(center, start);
        let a1 = angle(center, end);
        let limit = if clockwise {
            AngleLimit { start: a0, end: a1 }
        } else {
            AngleLimit { start: a1, end: a0 }
        };
        Self {
            center,
            radius,
            limit: Some(limit),
        }
    }

    pub fn full(center: Vector2<T>, radius: T) -> Self {
        Self {
            center,
            radius,
            limit: None,
        }
    }

    /// Tests if `point` (assumed on the circle) is inside the angular limit.
    pub fn within_limit(&self, point: Vector2<T>, eps: T) -> bool {
        let Some(limit) = self.limit else {
            return true;
        };
        let (start, end) = self.limit_points_of(limit);
        if point.fuzzy_eq_eps(start, eps) || point.fuzzy_eq_eps(end, eps) {
            return true;
        }
        let angle_eps = if self.radius > eps {
            eps / self.radius
        } else {
            eps
        };
        angle_is_between_eps(angle(self.center, point), limit.start, limit.end, angle_eps)
    }

    /// Tests if the polar `a` is inside the angular limit.
    pub fn covers_angle(&self, a: T, eps: T) -> bool {
        match self.limit {
            None => true,
            Some(limit) => angle_is_between_eps(a, limit.start, limit.end, eps),
        }
    }

    fn limit_points_of(&self, limit: AngleLimit<T>) -> (Vector2<T>, Vector2<T>) {
        (
            self.point_at_angle(limit.start),
            self.point_at_angle(limit.end),
        )
    }

    /// End points of the limit in increasing angle order (`None` for full circles).
    pub fn limit_points(&self) -> Option<(Vector2<T>, Vector2<T>)> {
        self.limit.map(|l| self.limit_points_of(l))
    }

    #[inline]
    pub fn point_at_angle(&self, a: T) -> Vector2<T> {
        crate::core::math::point_on_circle(self.radius, self.center, a)
    }
}

impl<T> Primitive<T>
where
    T: Real,
{
    /// Analytic form of `seg` starting at `start`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inset_kernel::primitive::*;
    /// # use inset_kernel::segment::*;
    /// # use inset_kernel::core::math::*;
    /// let p = Primitive::from_segment(Vector2::new(1.0, 0.0), &Segment::line(1.0, 4.0), 1e-6);
    /// match p {
    ///     Primitive::Line(l) => {
    ///         assert_eq!(l.eq, LineEq::Vertical { x: 1.0 });
    ///         assert_eq!(l.limit, Some(LineLimit { min: 0.0, max: 4.0 }));
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn from_segment(start: Vector2<T>, seg: &Segment<T>, eps: T) -> Self {
        match *seg {
            Segment::Line { to } => Primitive::Line(LinePrimitive::segment(start, to, eps)),
            Segment::Arc {
                center,
                to,
                clockwise,
            } => Primitive::Circle(CirclePrimitive::arc(start, center, to, clockwise, eps)),
        }
    }

    /// Tests if `point` (assumed on the unlimited primitive) is inside the limit.
    #[inline]
    pub fn within_limit(&self, point: Vector2<T>, eps: T) -> bool {
        match self {
            Primitive::Line(l) => l.within_limit(point, eps),
            Primitive::Circle(c) => c.within_limit(point, eps),
        }
    }

    /// Tests if `point` lies on the limited primitive.
    pub fn contains_point(&self, point: Vector2<T>, eps: T) -> bool {
        let on_base = match self {
            Primitive::Line(l) => l.eq.distance_to(point) < eps,
            Primitive::Circle(c) => ((point - c.center).length() - c.radius).abs() < eps,
        };
        on_base && self.within_limit(point, eps)
    }
}

/// Primitives for every segment of a closed shape, in segment order.
pub fn shape_primitives<T>(shape: &[Segment<T>], eps: T) -> Vec<Primitive<T>>
where
    T: Real,
{
    shape_spans(shape)
        .map(|(start, seg)| Primitive::from_segment(start, seg, eps))
        .collect()
}
