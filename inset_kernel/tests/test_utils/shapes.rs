use inset_kernel::{
    core::math::{point_on_circle, Vector2},
    segment::Segment,
};
use std::f64::consts::TAU;

/// Clockwise (on screen) axis aligned rectangle starting at its top left corner.
pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Segment> {
    vec![
        Segment::line(x1, y0),
        Segment::line(x1, y1),
        Segment::line(x0, y1),
        Segment::line(x0, y0),
    ]
}

/// Clockwise regular polygon with `n` vertices on the circle of `radius` around `center`.
pub fn regular_polygon(n: usize, radius: f64, center: Vector2) -> Vec<Segment> {
    (1..=n)
        .map(|i| Segment::Line {
            to: point_on_circle(radius, center, TAU * (i % n) as f64 / n as f64),
        })
        .collect()
}

/// Clockwise full circle made of two half arcs, starting at its rightmost point.
pub fn circle(radius: f64, center: Vector2) -> Vec<Segment> {
    vec![
        Segment::arc(center, center + Vector2::new(-radius, 0.0), true),
        Segment::arc(center, center + Vector2::new(radius, 0.0), true),
    ]
}

/// Clockwise rectangle with corners rounded by `radius`.
pub fn rounded_rect(x0: f64, y0: f64, x1: f64, y1: f64, radius: f64) -> Vec<Segment> {
    let v = Vector2::new;
    vec![
        Segment::line(x1 - radius, y0),
        Segment::arc(v(x1 - radius, y0 + radius), v(x1, y0 + radius), true),
        Segment::line(x1, y1 - radius),
        Segment::arc(v(x1 - radius, y1 - radius), v(x1 - radius, y1), true),
        Segment::line(x0 + radius, y1),
        Segment::arc(v(x0 + radius, y1 - radius), v(x0, y1 - radius), true),
        Segment::line(x0, y0 + radius),
        Segment::arc(v(x0 + radius, y0 + radius), v(x0 + radius, y0), true),
    ]
}
