use super::Vector2;
use crate::core::traits::Real;

/// `(v1, v2)` ordered so the smaller value comes first.
#[inline]
pub fn min_max<T>(v1: T, v2: T) -> (T, T)
where
    T: PartialOrd,
{
    if v1 < v2 {
        (v1, v2)
    } else {
        (v2, v1)
    }
}

/// Wrap an angle into `[0, 2PI]`. Angles already in range (including `2PI`) are returned as is.
///
/// # Examples
///
/// ```
/// # use inset_kernel::core::math::*;
/// # use inset_kernel::core::traits::*;
/// use std::f64::consts::PI;
/// assert!(normalize_radians(5.0 * PI).fuzzy_eq(PI));
/// assert!(normalize_radians(-PI / 4.0).fuzzy_eq(7.0 * PI / 4.0));
/// assert!(normalize_radians(2.0 * PI).fuzzy_eq(2.0 * PI));
/// ```
#[inline]
pub fn normalize_radians<T>(angle: T) -> T
where
    T: Real,
{
    if angle >= T::zero() && angle <= T::tau() {
        return angle;
    }

    angle - (angle / T::tau()).floor() * T::tau()
}

/// Signed turn from `angle1` to `angle2` in `(-PI, PI]`.
///
/// Positive results turn toward increasing angle, which is clockwise on screen.
///
/// # Examples
///
/// ```
/// # use inset_kernel::core::math::*;
/// # use inset_kernel::core::traits::*;
/// use std::f64::consts::PI;
/// assert!(delta_angle(0.25 * PI, 0.5 * PI).fuzzy_eq(0.25 * PI));
/// assert!(delta_angle(0.5 * PI, 0.25 * PI).fuzzy_eq(-0.25 * PI));
/// assert!(delta_angle(4.0 * PI, 5.0 * PI).fuzzy_eq(PI));
/// ```
#[inline]
pub fn delta_angle<T>(angle1: T, angle2: T) -> T
where
    T: Real,
{
    let mut diff = normalize_radians(angle2 - angle1);
    if diff > T::pi() {
        diff = diff - T::tau();
    }

    diff
}

/// Tests if `test_angle` lies on the sweep going from `start_angle` toward increasing angle until
/// `end_angle`, inclusive by `epsilon`.
///
/// # Examples
///
/// ```
/// # use inset_kernel::core::math::*;
/// use std::f64::consts::PI;
/// assert!(angle_is_between_eps(PI / 2.0, 0.0, PI, 1e-5));
/// assert!(angle_is_between_eps(0.0, 0.0, PI, 1e-5));
/// // sweeping from PI to PI / 2 passes through 0
/// assert!(angle_is_between_eps(0.0, PI, PI / 2.0, 1e-5));
/// assert!(!angle_is_between_eps(3.0 * PI / 4.0, PI, PI / 2.0, 1e-5));
/// ```
#[inline]
pub fn angle_is_between_eps<T>(test_angle: T, start_angle: T, end_angle: T, epsilon: T) -> bool
where
    T: Real,
{
    let end_sweep = normalize_radians(end_angle - start_angle);
    let mid_sweep = normalize_radians(test_angle - start_angle);

    mid_sweep < end_sweep + epsilon || mid_sweep > T::tau() - epsilon
}

/// [angle_is_between_eps] with the default tolerance.
#[inline]
pub fn angle_is_between<T>(test_angle: T, start_angle: T, end_angle: T) -> bool
where
    T: Real,
{
    angle_is_between_eps(test_angle, start_angle, end_angle, T::fuzzy_epsilon())
}

/// Squared length of `p1 - p0`.
#[inline]
pub fn dist_squared<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    let d = p0 - p1;
    d.dot(d)
}

/// Polar angle of the direction from `p0` toward `p1`.
#[inline]
pub fn angle<T>(p0: Vector2<T>, p1: Vector2<T>) -> T
where
    T: Real,
{
    T::atan2(p1.y - p0.y, p1.x - p0.x)
}

#[inline]
pub fn midpoint<T>(p0: Vector2<T>, p1: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    Vector2::new((p0.x + p1.x) / T::two(), (p0.y + p1.y) / T::two())
}

/// Point at polar `angle` on the circle around `center`.
#[inline]
pub fn point_on_circle<T>(radius: T, center: Vector2<T>, angle: T) -> Vector2<T>
where
    T: Real,
{
    let (s, c) = angle.sin_cos();
    Vector2::new(center.x + radius * c, center.y + radius * s)
}

/// Nearest point to `point` on the bounded segment `p0 -> p1`.
#[inline]
pub fn line_seg_closest_point<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    let v = p1 - p0;
    let w = point - p0;
    let c1 = w.dot(v);
    if c1 <= T::zero() {
        return p0;
    }

    let c2 = v.length_squared();
    if c2 <= c1 {
        return p1;
    }

    p0 + v.scale(c1 / c2)
}

/// Foot of the perpendicular dropped from `point` onto the infinite line through `p0` with
/// direction `dir`.
#[inline]
pub fn line_foot_point<T>(p0: Vector2<T>, dir: Vector2<T>, point: Vector2<T>) -> Vector2<T>
where
    T: Real,
{
    let len_sq = dir.length_squared();
    if len_sq == T::zero() {
        return p0;
    }
    p0 + dir.scale((point - p0).dot(dir) / len_sq)
}

/// Signed side of `point` relative to the direction `p0 -> p1`.
///
/// Positive values are on the increasing angle side (right of travel on screen), negative values
/// on the other side and values near zero are collinear.
#[inline]
pub fn side_of<T>(p0: Vector2<T>, p1: Vector2<T>, point: Vector2<T>) -> T
where
    T: Real,
{
    (p1 - p0).perp_dot(point - p0)
}
