/// Fuzzy equality for floating point values.
///
/// Every comparison in the kernel goes through this trait so that a single tolerance governs
/// when two coordinates, radii or angles are "the same". The default tolerance is `1e-6`, callers
/// that need a different one pass it explicitly through the `_eps` variants.
///
/// # Examples
///
/// ```
/// # use inset_kernel::core::traits::*;
/// let a = 0.1 + 0.2;
/// assert_ne!(a, 0.3);
/// assert!(a.fuzzy_eq(0.3));
/// assert!(!1.0.fuzzy_eq(1.001));
/// assert!(1.0.fuzzy_eq_eps(1.001, 0.01));
/// ```
pub trait FuzzyEq: Sized + Copy {
    /// Default tolerance used by the non `_eps` methods.
    fn fuzzy_epsilon() -> Self;

    /// `true` when `self` and `other` differ by less than `eps`.
    fn fuzzy_eq_eps(&self, other: Self, eps: Self) -> bool;

    /// Same as [FuzzyEq::fuzzy_eq_eps] using [FuzzyEq::fuzzy_epsilon].
    #[inline]
    fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, Self::fuzzy_epsilon())
    }
}

macro_rules! impl_fuzzy_eq {
    ($ty:ty, $eps:expr) => {
        impl FuzzyEq for $ty {
            #[inline]
            fn fuzzy_epsilon() -> Self {
                $eps
            }

            #[inline]
            fn fuzzy_eq_eps(&self, other: Self, eps: Self) -> bool {
                (*self - other).abs() < eps
            }
        }
    };
}

impl_fuzzy_eq!(f32, 1.0e-6);
impl_fuzzy_eq!(f64, 1.0e-6);
