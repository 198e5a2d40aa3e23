use crate::{
    core::{math::Vector2, traits::Real},
    error::KernelError,
    offset::{InsetOptions, Region},
    segment::{seg_start_tangent, shape_map_points, shape_seg_start, Segment},
};
use std::collections::HashMap;

/// Quantized description of a shape in its normalized frame plus the inset amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct InsetKey {
    amount: i64,
    data: Vec<i64>,
}

/// Rigid motion taking a shape into its normalized frame (first start at the origin, first start
/// tangent along +x).
#[derive(Debug, Copy, Clone)]
struct Frame<T> {
    origin: Vector2<T>,
    rotation: T,
}

impl<T> Frame<T>
where
    T: Real,
{
    fn of(shape: &[Segment<T>]) -> Self {
        let origin = shape_seg_start(shape, 0);
        Self {
            origin,
            rotation: seg_start_tangent(origin, &shape[0]),
        }
    }

    fn to_local(&self, p: Vector2<T>) -> Vector2<T> {
        (p - self.origin).rotate(-self.rotation)
    }

    fn to_world(&self, p: Vector2<T>) -> Vector2<T> {
        p.rotate(self.rotation) + self.origin
    }
}

fn quantize<T>(value: T, scale: f64) -> i64
where
    T: Real,
{
    (value.as_f64() * scale).round() as i64
}

fn inset_key<T>(local: &[Segment<T>], amount: T, decimals: u32) -> InsetKey
where
    T: Real,
{
    let scale = 10f64.powi(decimals as i32);
    let mut data = Vec::with_capacity(local.len() * 5);
    for seg in local {
        match *seg {
            Segment::Line { to } => {
                data.push(0);
                data.push(quantize(to.x, scale));
                data.push(quantize(to.y, scale));
            }
            Segment::Arc {
                center,
                to,
                clockwise,
            } => {
                data.push(if clockwise { 1 } else { 2 });
                data.push(quantize(center.x, scale));
                data.push(quantize(center.y, scale));
                data.push(quantize(to.x, scale));
                data.push(quantize(to.y, scale));
            }
        }
    }

    InsetKey {
        amount: quantize(amount, scale),
        data,
    }
}

/// Memoizes shape insets across calls.
///
/// Shapes are keyed by their geometry after moving the first start point to the origin and turning
/// the first start tangent onto the +x axis, so translated or rotated copies of a shape share an
/// entry. Failed insets are never cached.
#[derive(Debug, Clone)]
pub struct InsetCache<T = f64> {
    decimals: u32,
    entries: HashMap<InsetKey, Vec<Vec<Segment<T>>>>,
    hits: usize,
    misses: usize,
}

impl<T> InsetCache<T>
where
    T: Real,
{
    /// Cache keying coordinates to `decimals` decimal places.
    pub fn new(decimals: u32) -> Self {
        Self {
            decimals,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    #[inline]
    pub fn hits(&self) -> usize {
        self.hits
    }

    #[inline]
    pub fn misses(&self) -> usize {
        self.misses
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Regions of `shape` inset by `inset`, computed with `compute` on a miss.
    ///
    /// `compute` receives the shape in its normalized frame and must be a pure function of it.
    pub fn get_or_insert_with<F>(
        &mut self,
        shape: &[Segment<T>],
        inset: T,
        eps: T,
        compute: F,
    ) -> Result<Vec<Region<T>>, KernelError>
    where
        F: FnOnce(&[Segment<T>], T) -> Result<Vec<Region<T>>, KernelError>,
    {
        if shape.is_empty() {
            return compute(shape, inset);
        }

        let frame = Frame::of(shape);
        let local = shape_map_points(shape, |p| frame.to_local(p));
        let key = inset_key(&local, inset, self.decimals);

        let stored = match self.entries.get(&key) {
            Some(stored) => {
                self.hits += 1;
                log::trace!("inset cache hit ({} segments)", shape.len());
                stored.clone()
            }
            None => {
                self.misses += 1;
                let regions = compute(&local, inset)?;
                let stored: Vec<Vec<Segment<T>>> = regions.into_iter().map(|r| r.segments).collect();
                self.entries.insert(key, stored.clone());
                stored
            }
        };

        Ok(stored
            .iter()
            .map(|segments| Region::new(shape_map_points(segments, |p| frame.to_world(p)), eps))
            .collect())
    }

    /// Cached [inset_shape](crate::offset::inset_shape).
    pub fn inset(
        &mut self,
        shape: &[Segment<T>],
        inset: T,
        options: &InsetOptions<T>,
    ) -> Result<Vec<Region<T>>, KernelError> {
        self.get_or_insert_with(shape, inset, options.pos_equal_eps, |local, inset| {
            crate::offset::inset_shape(local, inset, options)
        })
    }
}

impl<T> Default for InsetCache<T>
where
    T: Real,
{
    fn default() -> Self {
        Self::new(6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FuzzyEq;
    use crate::segment::shape_extents;
    use std::f64::consts::PI;

    fn square_at(x: f64, y: f64, size: f64) -> Vec<Segment> {
        vec![
            Segment::line(x + size, y),
            Segment::line(x + size, y + size),
            Segment::line(x, y + size),
            Segment::line(x, y),
        ]
    }

    #[test]
    fn translated_copies_share_an_entry() {
        let mut cache = InsetCache::default();
        let options = InsetOptions::new();

        let first = cache.inset(&square_at(0.0, 0.0, 10.0), 1.0, &options).unwrap();
        let second = cache.inset(&square_at(50.0, -20.0, 10.0), 1.0, &options).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_fuzzy_eq!(second[0].area, 64.0);
        let bb = shape_extents(&second[0].segments).unwrap();
        assert_fuzzy_eq!(bb.min_x, 51.0);
        assert_fuzzy_eq!(bb.min_y, -19.0);
        assert_fuzzy_eq!(bb.max_x, 59.0);
        assert_fuzzy_eq!(bb.max_y, -11.0);
    }

    #[test]
    fn rotated_copy_maps_back() {
        let mut cache = InsetCache::default();
        let options = InsetOptions::new();
        let square = square_at(0.0, 0.0, 10.0);
        cache.inset(&square, 2.0, &options).unwrap();

        let turned: Vec<Segment> = shape_map_points(&square, |p| p.rotate_about(Vector2::new(5.0, 5.0), PI / 6.0));
        let regions = cache.inset(&turned, 2.0, &options).unwrap();
        assert_eq!(cache.hits(), 1);
        assert_eq!(regions.len(), 1);
        assert_fuzzy_eq!(regions[0].area, 36.0, 1e-5);
        // inset square is still centered on the rotation center
        let bb = shape_extents(&regions[0].segments).unwrap();
        assert_fuzzy_eq!((bb.min_x + bb.max_x) / 2.0, 5.0, 1e-5);
        assert_fuzzy_eq!((bb.min_y + bb.max_y) / 2.0, 5.0, 1e-5);
    }

    #[test]
    fn different_amounts_are_separate_entries() {
        let mut cache = InsetCache::default();
        let options = InsetOptions::new();
        let square = square_at(0.0, 0.0, 10.0);
        cache.inset(&square, 1.0, &options).unwrap();
        cache.inset(&square, 2.0, &options).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.hits(), 0);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.misses(), 0);
    }

    #[test]
    fn errors_are_not_cached() {
        let mut cache = InsetCache::default();
        let square = square_at(0.0, 0.0, 10.0);
        let failing = cache.get_or_insert_with(&square, 1.0, 1e-6, |_, _| Err(KernelError::UnresolvedOffset));
        assert_eq!(failing, Err(KernelError::UnresolvedOffset));
        assert!(cache.is_empty());
    }
}
