use crate::core::traits::Real;
use std::ops;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2D point or direction vector.
///
/// Coordinates follow the screen convention: x grows to the right and y grows downward, so an
/// increasing polar angle turns clockwise on screen.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector2<T = f64> {
    pub x: T,
    pub y: T,
}

impl<T> Vector2<T>
where
    T: Real,
{
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Vector2 { x, y }
    }

    /// The origin.
    #[inline]
    pub fn zero() -> Self {
        Vector2::new(T::zero(), T::zero())
    }

    /// Unit vector pointing at polar `angle` (radians).
    #[inline]
    pub fn from_angle(angle: T) -> Self {
        let (s, c) = angle.sin_cos();
        Vector2::new(c, s)
    }

    #[inline]
    pub fn scale(&self, factor: T) -> Self {
        vec2(self.x * factor, self.y * factor)
    }

    #[inline]
    pub fn dot(&self, other: Self) -> T {
        self.x * other.x + self.y * other.y
    }

    /// Perpendicular dot product (`self.x * other.y - self.y * other.x`).
    ///
    /// Positive when `other` points at a larger polar angle than `self` (a clockwise turn on
    /// screen).
    #[inline]
    pub fn perp_dot(&self, other: Self) -> T {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length_squared(&self) -> T {
        self.dot(*self)
    }

    #[inline]
    pub fn length(&self) -> T {
        self.dot(*self).sqrt()
    }

    /// Unit length copy of the vector, the zero vector stays zero.
    #[inline]
    pub fn normalize(&self) -> Self {
        match self.length() {
            len if len == T::zero() => *self,
            len => self.scale(T::one() / len),
        }
    }

    /// Polar angle of the vector in radians, in `(-PI, PI]`.
    #[inline]
    pub fn angle(&self) -> T {
        self.y.atan2(self.x)
    }

    /// Component wise fuzzy comparison.
    #[inline]
    pub fn fuzzy_eq_eps(&self, other: Self, eps: T) -> bool {
        self.x.fuzzy_eq_eps(other.x, eps) && self.y.fuzzy_eq_eps(other.y, eps)
    }

    /// [Vector2::fuzzy_eq_eps] with the default tolerance.
    #[inline]
    pub fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, T::fuzzy_epsilon())
    }

    /// Perpendicular vector rotated a quarter turn toward increasing angle.
    #[inline]
    pub fn perp(&self) -> Self {
        vec2(-self.y, self.x)
    }

    /// Rotate the vector about the origin by `angle` radians.
    #[inline]
    pub fn rotate(&self, angle: T) -> Self {
        let (s, c) = angle.sin_cos();
        vec2(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// Rotate the point around `pivot`.
    #[inline]
    pub fn rotate_about(&self, pivot: Self, angle: T) -> Self {
        (self - pivot).rotate(angle) + pivot
    }
}

#[inline(always)]
pub fn vec2<T>(x: T, y: T) -> Vector2<T>
where
    T: Real,
{
    Vector2::new(x, y)
}

macro_rules! impl_binary_op {
    ($op_trait:ident, $op_func:ident, $op:tt) => {
        impl<T: Real> ops::$op_trait<Vector2<T>> for Vector2<T> {
            type Output = Vector2<T>;
            fn $op_func(self, rhs: Vector2<T>) -> Self::Output {
                Vector2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }

        impl<T: Real> ops::$op_trait<&Vector2<T>> for Vector2<T> {
            type Output = Vector2<T>;
            fn $op_func(self, rhs: &Vector2<T>) -> Self::Output {
                Vector2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }

        impl<'a, 'b, T: Real> ops::$op_trait<&'b Vector2<T>> for &'a Vector2<T> {
            type Output = Vector2<T>;
            fn $op_func(self, rhs: &'b Vector2<T>) -> Self::Output {
                Vector2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }

        impl<T: Real> ops::$op_trait<Vector2<T>> for &Vector2<T> {
            type Output = Vector2<T>;
            fn $op_func(self, rhs: Vector2<T>) -> Self::Output {
                Vector2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }
    };
}

impl_binary_op!(Add, add, +);
impl_binary_op!(Sub, sub, -);

impl<T: Real> ops::Neg for Vector2<T> {
    type Output = Vector2<T>;
    fn neg(self) -> Self::Output {
        Vector2::new(-self.x, -self.y)
    }
}

impl<T: Real> ops::Neg for &Vector2<T> {
    type Output = Vector2<T>;
    fn neg(self) -> Self::Output {
        Vector2::new(-self.x, -self.y)
    }
}
