use super::FuzzyEq;

/// Ordering comparisons that treat values within a tolerance as equal.
///
/// `a.fuzzy_gt(b)` is true when `a` is greater than *or fuzzy equal to* `b`, which makes range
/// tests inclusive at both ends. Limits of primitives rely on this so that a hit sitting exactly
/// on a segment end point is never lost to rounding.
pub trait FuzzyOrd: FuzzyEq {
    /// `self >= other - eps`.
    fn fuzzy_gt_eps(&self, other: Self, eps: Self) -> bool;

    /// Fuzzy greater than (inclusive).
    #[inline]
    fn fuzzy_gt(&self, other: Self) -> bool {
        self.fuzzy_gt_eps(other, Self::fuzzy_epsilon())
    }

    /// `self <= other + eps`.
    fn fuzzy_lt_eps(&self, other: Self, eps: Self) -> bool;

    /// Fuzzy less than (inclusive).
    #[inline]
    fn fuzzy_lt(&self, other: Self) -> bool {
        self.fuzzy_lt_eps(other, Self::fuzzy_epsilon())
    }

    /// Test if `self` lies in `[min, max]` with both ends widened by `eps`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inset_kernel::core::traits::*;
    /// assert!(0.99f64.fuzzy_in_range_eps(1.0, 2.0, 0.05));
    /// assert!(2.0f64.fuzzy_in_range_eps(1.0, 2.0, 1e-6));
    /// assert!(!2.1f64.fuzzy_in_range_eps(1.0, 2.0, 1e-6));
    /// ```
    #[inline]
    fn fuzzy_in_range_eps(&self, min: Self, max: Self, eps: Self) -> bool {
        self.fuzzy_gt_eps(min, eps) && self.fuzzy_lt_eps(max, eps)
    }

    /// Same as [FuzzyOrd::fuzzy_in_range_eps] using the default epsilon.
    #[inline]
    fn fuzzy_in_range(&self, min: Self, max: Self) -> bool {
        self.fuzzy_in_range_eps(min, max, Self::fuzzy_epsilon())
    }
}

macro_rules! impl_fuzzy_ord {
    ($ty:ty) => {
        impl FuzzyOrd for $ty {
            #[inline]
            fn fuzzy_gt_eps(&self, other: $ty, eps: $ty) -> bool {
                self + eps > other
            }

            #[inline]
            fn fuzzy_lt_eps(&self, other: $ty, eps: $ty) -> bool {
                *self < other + eps
            }
        }
    };
}

impl_fuzzy_ord!(f32);
impl_fuzzy_ord!(f64);
