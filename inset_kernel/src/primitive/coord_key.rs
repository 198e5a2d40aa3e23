use crate::core::{math::Vector2, traits::Real};
use std::collections::HashMap;

/// Coordinate quantized to a fixed number of decimals, used to identify hits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordKey {
    pub x: i64,
    pub y: i64,
}

impl CoordKey {
    /// Quantize `point` keeping `decimals` decimal places.
    ///
    /// # Examples
    ///
    /// ```
    /// # use inset_kernel::primitive::*;
    /// # use inset_kernel::core::math::*;
    /// let a = CoordKey::new(Vector2::new(1.0000001, 2.0), 5);
    /// let b = CoordKey::new(Vector2::new(0.9999999, 2.0), 5);
    /// assert_eq!(a, b);
    /// assert_ne!(a, CoordKey::new(Vector2::new(1.001, 2.0), 5));
    /// ```
    pub fn new<T>(point: Vector2<T>, decimals: u32) -> Self
    where
        T: Real,
    {
        let scale = 10f64.powi(decimals as i32);
        let q = |v: T| (v.as_f64() * scale).round() as i64;
        CoordKey {
            x: q(point.x),
            y: q(point.y),
        }
    }

    fn offset(&self, dx: i64, dy: i64) -> Self {
        CoordKey {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Assigns stable node ids to points, merging points that quantize to the same or a neighboring
/// key.
///
/// Plain quantization splits two nearly equal points that straddle a rounding boundary, looking at
/// the neighboring keys closes that gap.
#[derive(Debug, Clone)]
pub struct PointSnapper<T = f64> {
    decimals: u32,
    eps: T,
    lookup: HashMap<CoordKey, Vec<usize>>,
    points: Vec<Vector2<T>>,
}

impl<T> PointSnapper<T>
where
    T: Real,
{
    pub fn new(decimals: u32, eps: T) -> Self {
        Self {
            decimals,
            eps,
            lookup: HashMap::new(),
            points: Vec::new(),
        }
    }

    /// Node id of `point`, allocating a new node when no existing one is close enough.
    pub fn snap(&mut self, point: Vector2<T>) -> usize {
        if let Some(id) = self.find(point) {
            return id;
        }

        let id = self.points.len();
        self.points.push(point);
        self.lookup
            .entry(CoordKey::new(point, self.decimals))
            .or_default()
            .push(id);
        id
    }

    /// Node id of an existing node close to `point`.
    pub fn find(&self, point: Vector2<T>) -> Option<usize> {
        let key = CoordKey::new(point, self.decimals);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(ids) = self.lookup.get(&key.offset(dx, dy)) else {
                    continue;
                };
                if let Some(&id) = ids
                    .iter()
                    .find(|&&id| self.points[id].fuzzy_eq_eps(point, self.eps))
                {
                    return Some(id);
                }
            }
        }
        None
    }

    /// Position of node `id` (the first point snapped to it).
    #[inline]
    pub fn point(&self, id: usize) -> Vector2<T> {
        self.points[id]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Remove points sharing a coordinate key, keeping first occurrences in order.
pub fn dedup_points<T>(points: &mut Vec<Vector2<T>>, decimals: u32, eps: T)
where
    T: Real,
{
    let mut snapper = PointSnapper::new(decimals, eps);
    points.retain(|&p| {
        let before = snapper.len();
        snapper.snap(p) == before
    });
}
