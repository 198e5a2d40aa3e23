use inset_kernel::{
    clip::{clip_shape, ClipOptions},
    core::math::Vector2,
    segment::{shape_area, Segment},
    shape_closed,
};

fn main() {
    env_logger::init();

    let options = ClipOptions::new();
    let square = shape_closed![line(10.0, 0.0), line(10.0, 10.0), line(0.0, 10.0), line(0.0, 0.0)];

    println!("Clipping a square by an offset square...");
    let offset = shape_closed![line(15.0, 5.0), line(15.0, 15.0), line(5.0, 15.0), line(5.0, 5.0)];
    report(&square, &offset, &options);

    println!("\nClipping a square by a circle on its right edge...");
    let center = Vector2::new(10.0, 5.0);
    let circle = vec![
        Segment::arc(center, Vector2::new(6.0, 5.0), true),
        Segment::arc(center, Vector2::new(14.0, 5.0), true),
    ];
    report(&square, &circle, &options);

    println!("\nClipping a U shape by a horizontal band...");
    let u = shape_closed![
        line(3.0, 0.0),
        line(3.0, 7.0),
        line(7.0, 7.0),
        line(7.0, 0.0),
        line(10.0, 0.0),
        line(10.0, 10.0),
        line(0.0, 10.0),
        line(0.0, 0.0),
    ];
    let band = shape_closed![line(12.0, 2.0), line(12.0, 5.0), line(-2.0, 5.0), line(-2.0, 2.0)];
    report(&u, &band, &options);
}

fn report(subject: &[Segment], clip: &[Segment], options: &ClipOptions) {
    match clip_shape(subject, clip, options) {
        Ok(results) => {
            println!("  Number of result shapes: {}", results.len());
            for (i, r) in results.iter().enumerate() {
                println!(
                    "  Result {}: Area: {:.3}, Segments: {}, Along clip: {}",
                    i,
                    shape_area(&r.shape),
                    r.shape.len(),
                    r.on_clip.iter().filter(|&&c| c).count()
                );
                for p in &r.ambiguous {
                    log::warn!("  ambiguous crossing at ({:.3}, {:.3})", p.x, p.y);
                }
            }
        }
        Err(e) => log::error!("clip failed: {e}"),
    }
}
