use inset_kernel::{
    core::traits::FuzzyEq,
    segment::{
        merge_segments, seg_is_full_circle, seg_length, shape_area, shape_extents, shape_seg_start,
        shape_spans, Segment,
    },
    AABB,
};

/// Fuzzy compare AABB values
pub fn aabb_fuzzy_eq_eps(a: &AABB<f64>, b: &AABB<f64>, eps: f64) -> bool {
    a.min_x.fuzzy_eq_eps(b.min_x, eps)
        && a.min_y.fuzzy_eq_eps(b.min_y, eps)
        && a.max_x.fuzzy_eq_eps(b.max_x, eps)
        && a.max_y.fuzzy_eq_eps(b.max_y, eps)
}

/// Returns true if the closed shape has no zero length segments and no consecutive pair
/// (including the last and first segment) that could be merged into one segment.
pub fn shape_is_normalized(shape: &[Segment], eps: f64) -> bool {
    let n = shape.len();
    let no_degenerate = shape_spans(shape)
        .all(|(start, seg)| seg_is_full_circle(start, seg, eps) || seg_length(start, seg) >= eps);
    let no_mergeable = n < 2
        || (0..n).all(|i| merge_segments(shape_seg_start(shape, i), &shape[i], &shape[(i + 1) % n], eps).is_none());
    no_degenerate && no_mergeable
}

/// Holds a set of properties of a closed shape for comparison in tests
#[derive(Debug, Copy, Clone)]
pub struct ShapeProperties {
    pub segment_count: usize,
    pub area: f64,
    pub path_length: f64,
    pub extents: AABB<f64>,
}

impl ShapeProperties {
    // property comparer epsilon
    pub const PROP_CMP_EPS: f64 = 1e-4;

    pub fn new(
        segment_count: usize,
        area: f64,
        path_length: f64,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    ) -> Self {
        Self {
            segment_count,
            area,
            path_length,
            extents: AABB::new(min_x, min_y, max_x, max_y),
        }
    }

    pub fn from_shape(shape: &[Segment]) -> Self {
        Self {
            segment_count: shape.len(),
            area: shape_area(shape),
            path_length: shape_spans(shape).map(|(start, seg)| seg_length(start, seg)).sum(),
            extents: shape_extents(shape).unwrap(),
        }
    }

    pub fn fuzzy_eq_eps(&self, other: &Self, eps: f64) -> bool {
        self.segment_count == other.segment_count
            && self.area.fuzzy_eq_eps(other.area, eps)
            && self.path_length.fuzzy_eq_eps(other.path_length, eps)
            && aabb_fuzzy_eq_eps(&self.extents, &other.extents, eps)
    }
}

pub fn create_property_set<'a, I>(shapes: I) -> Vec<ShapeProperties>
where
    I: IntoIterator<Item = &'a Vec<Segment>>,
{
    shapes
        .into_iter()
        .map(|s| ShapeProperties::from_shape(s))
        .collect()
}

pub fn property_sets_match(result_set: &[ShapeProperties], expected_set: &[ShapeProperties]) -> bool {
    let mut sets_match = result_set.len() == expected_set.len();
    if sets_match {
        // sets are small, compare every pair
        for expected in expected_set {
            let match_count = result_set
                .iter()
                .filter(|result| expected.fuzzy_eq_eps(result, ShapeProperties::PROP_CMP_EPS))
                .count();

            if match_count != 1 {
                sets_match = false;
                break;
            }
        }
    }

    if !sets_match {
        eprintln!("result:\n{:?}", result_set);
        eprintln!("expected:\n{:?}", expected_set);
    }

    sets_match
}
