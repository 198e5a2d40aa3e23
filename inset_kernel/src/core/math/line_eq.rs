use super::Vector2;
use crate::core::traits::Real;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Infinite line in slope-intercept form.
///
/// Vertical lines have no finite slope and carry their x value instead.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LineEq<T = f64> {
    /// `y = m * x + b`
    Sloped { m: T, b: T },
    /// `x = x`
    Vertical { x: T },
}

impl<T> LineEq<T>
where
    T: Real,
{
    /// Line through `p0` and `p1`. Points whose x values are within `eps` give a vertical line.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inset_kernel::core::math::*;
    /// let l = LineEq::through(Vector2::new(0.0, 1.0), Vector2::new(2.0, 5.0), 1e-6);
    /// assert_eq!(l, LineEq::Sloped { m: 2.0, b: 1.0 });
    /// let v = LineEq::through(Vector2::new(3.0, 1.0), Vector2::new(3.0, 5.0), 1e-6);
    /// assert_eq!(v, LineEq::Vertical { x: 3.0 });
    /// ```
    pub fn through(p0: Vector2<T>, p1: Vector2<T>, eps: T) -> Self {
        let dx = p1.x - p0.x;
        if dx.abs() < eps {
            return LineEq::Vertical {
                x: (p0.x + p1.x) / T::two(),
            };
        }

        let m = (p1.y - p0.y) / dx;
        let b = p0.y - m * p0.x;
        LineEq::Sloped { m, b }
    }

    /// Line through `point` running along `direction`.
    pub fn from_point_dir(point: Vector2<T>, direction: Vector2<T>, eps: T) -> Self {
        let dir = direction.normalize();
        if dir.x.abs() < eps {
            return LineEq::Vertical { x: point.x };
        }

        let m = dir.y / dir.x;
        LineEq::Sloped {
            m,
            b: point.y - m * point.x,
        }
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        matches!(self, LineEq::Vertical { .. })
    }

    /// Unit direction along the line (x increasing, or y increasing for vertical lines).
    pub fn direction(&self) -> Vector2<T> {
        match *self {
            LineEq::Sloped { m, .. } => Vector2::new(T::one(), m).normalize(),
            LineEq::Vertical { .. } => Vector2::new(T::zero(), T::one()),
        }
    }

    /// Some point lying on the line.
    pub fn anchor(&self) -> Vector2<T> {
        match *self {
            LineEq::Sloped { b, .. } => Vector2::new(T::zero(), b),
            LineEq::Vertical { x } => Vector2::new(x, T::zero()),
        }
    }

    /// Value used to restrict the line to a segment: x for sloped lines, y for vertical lines.
    #[inline]
    pub fn param_of(&self, point: Vector2<T>) -> T {
        match self {
            LineEq::Sloped { .. } => point.x,
            LineEq::Vertical { .. } => point.y,
        }
    }

    /// Point on the line at the restriction value `t` (see [LineEq::param_of]).
    #[inline]
    pub fn point_at(&self, t: T) -> Vector2<T> {
        match *self {
            LineEq::Sloped { m, b } => Vector2::new(t, m * t + b),
            LineEq::Vertical { x } => Vector2::new(x, t),
        }
    }

    /// Foot of the perpendicular from `point` onto the line.
    pub fn foot_point(&self, point: Vector2<T>) -> Vector2<T> {
        super::line_foot_point(self.anchor(), self.direction(), point)
    }

    /// Perpendicular distance from `point` to the line.
    pub fn distance_to(&self, point: Vector2<T>) -> T {
        (point - self.foot_point(point)).length()
    }
}
