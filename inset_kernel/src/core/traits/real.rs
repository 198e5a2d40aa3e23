use super::FuzzyOrd;
use static_aabb2d_index::IndexableNum;

/// Real number type the kernel is generic over (`f64` by default, `f32` also implemented).
///
/// Bundles the numeric operations from `num_traits`, fuzzy comparison and the bounds required to
/// put values into a `StaticAABB2DIndex`.
pub trait Real:
    num_traits::real::Real
    + num_traits::Bounded
    + FuzzyOrd
    + std::default::Default
    + std::fmt::Debug
    + IndexableNum
    + 'static
{
    #[inline]
    fn pi() -> Self {
        Self::from(std::f64::consts::PI).unwrap()
    }

    #[inline]
    fn tau() -> Self {
        Self::from(std::f64::consts::TAU).unwrap()
    }

    #[inline]
    fn half_pi() -> Self {
        Self::from(std::f64::consts::FRAC_PI_2).unwrap()
    }

    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    #[inline]
    fn four() -> Self {
        Self::two() + Self::two()
    }

    #[inline]
    fn half() -> Self {
        Self::one() / Self::two()
    }

    /// Lossy conversion used for quantized keys and diagnostics.
    #[inline]
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    /// Conversion from a literal constant.
    #[inline]
    fn lit(value: f64) -> Self {
        Self::from(value).unwrap()
    }
}

impl Real for f32 {
    #[inline]
    fn pi() -> Self {
        std::f32::consts::PI
    }

    #[inline]
    fn tau() -> Self {
        std::f32::consts::TAU
    }

    #[inline]
    fn half_pi() -> Self {
        std::f32::consts::FRAC_PI_2
    }

    #[inline]
    fn two() -> Self {
        2.0f32
    }

    #[inline]
    fn four() -> Self {
        4.0f32
    }

    #[inline]
    fn half() -> Self {
        0.5f32
    }
}

impl Real for f64 {
    #[inline]
    fn pi() -> Self {
        std::f64::consts::PI
    }

    #[inline]
    fn tau() -> Self {
        std::f64::consts::TAU
    }

    #[inline]
    fn half_pi() -> Self {
        std::f64::consts::FRAC_PI_2
    }

    #[inline]
    fn two() -> Self {
        2.0f64
    }

    #[inline]
    fn four() -> Self {
        4.0f64
    }

    #[inline]
    fn half() -> Self {
        0.5f64
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}
