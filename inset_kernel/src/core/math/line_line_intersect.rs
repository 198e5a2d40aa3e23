use super::{LineEq, Vector2};
use crate::core::traits::Real;

/// Result of intersecting two infinite lines.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LineLineIntr<T = f64>
where
    T: Real,
{
    /// Lines have equal slope and different intercepts.
    Parallel,
    /// Lines are the same line.
    Coincident,
    /// Lines cross at a single point.
    Point(Vector2<T>),
}

/// Intersect two infinite lines, slopes and intercepts are compared using `eps`.
///
/// # Examples
///
/// ```
/// # use inset_kernel::core::math::*;
/// let l1 = LineEq::Sloped { m: 1.0, b: 0.0 };
/// let l2 = LineEq::Vertical { x: 2.0 };
/// assert_eq!(line_line_intr(&l1, &l2, 1e-6), LineLineIntr::Point(Vector2::new(2.0, 2.0)));
/// let l3 = LineEq::Sloped { m: 1.0, b: 3.0 };
/// assert_eq!(line_line_intr(&l1, &l3, 1e-6), LineLineIntr::Parallel);
/// ```
pub fn line_line_intr<T>(l1: &LineEq<T>, l2: &LineEq<T>, eps: T) -> LineLineIntr<T>
where
    T: Real,
{
    match (*l1, *l2) {
        (LineEq::Vertical { x: x1 }, LineEq::Vertical { x: x2 }) => {
            if x1.fuzzy_eq_eps(x2, eps) {
                LineLineIntr::Coincident
            } else {
                LineLineIntr::Parallel
            }
        }
        (LineEq::Vertical { x }, LineEq::Sloped { m, b })
        | (LineEq::Sloped { m, b }, LineEq::Vertical { x }) => {
            LineLineIntr::Point(Vector2::new(x, m * x + b))
        }
        (LineEq::Sloped { m: m1, b: b1 }, LineEq::Sloped { m: m2, b: b2 }) => {
            if m1.fuzzy_eq_eps(m2, eps) {
                if b1.fuzzy_eq_eps(b2, eps) {
                    return LineLineIntr::Coincident;
                }
                return LineLineIntr::Parallel;
            }

            let x = (b2 - b1) / (m1 - m2);
            // evaluate with the flatter line to limit error growth
            let y = if m1.abs() < m2.abs() {
                m1 * x + b1
            } else {
                m2 * x + b2
            };
            LineLineIntr::Point(Vector2::new(x, y))
        }
    }
}
