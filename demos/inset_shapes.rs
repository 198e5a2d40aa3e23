use inset_kernel::{
    core::math::Vector2,
    offset::{inset_shape, InsetOptions},
    segment::{shape_area, shape_extents, Segment},
    shape_closed,
};

fn main() {
    env_logger::init();
    square_insets();
    rounded_insets();
    split_inset();
}

fn print_regions(label: &str, regions: &[inset_kernel::offset::Region]) {
    println!("{label}: {} region(s)", regions.len());
    for (i, r) in regions.iter().enumerate() {
        let bb = r.bbox;
        println!(
            "  Region {}: Area: {:.3}, Segments: {}, Extents: ({:.2}, {:.2}) - ({:.2}, {:.2})",
            i,
            r.area,
            r.segments.len(),
            bb.min_x,
            bb.min_y,
            bb.max_x,
            bb.max_y
        );
    }
}

fn square_insets() {
    println!("Insetting a 10 x 10 square...");
    let square = shape_closed![line(10.0, 0.0), line(10.0, 10.0), line(0.0, 10.0), line(0.0, 0.0)];
    println!("Original area: {:.2}", shape_area(&square));

    let options = InsetOptions::new();
    for inset in [1.0, 2.5, -2.0, 5.5] {
        match inset_shape(&square, inset, &options) {
            Ok(regions) => print_regions(&format!("inset {inset}"), &regions),
            Err(e) => log::error!("inset {inset} failed: {e}"),
        }
    }

    let shrunk = inset_shape(&square, 1.0, &options).unwrap_or_default();
    assert_eq!(shrunk.len(), 1, "inset square should stay one region");
    assert!(
        inset_shape(&square, 5.5, &options).unwrap_or_default().is_empty(),
        "insetting past the inradius should remove the shape"
    );
}

fn rounded_insets() {
    println!("\nInsetting a rounded rectangle...");
    let v = Vector2::new;
    let rounded = vec![
        Segment::line(17.0, 0.0),
        Segment::arc(v(17.0, 3.0), v(20.0, 3.0), true),
        Segment::line(20.0, 7.0),
        Segment::arc(v(17.0, 7.0), v(17.0, 10.0), true),
        Segment::line(3.0, 10.0),
        Segment::arc(v(3.0, 7.0), v(0.0, 7.0), true),
        Segment::line(0.0, 3.0),
        Segment::arc(v(3.0, 3.0), v(3.0, 0.0), true),
    ];
    if let Some(bb) = shape_extents(&rounded) {
        println!(
            "Original extents: ({:.1}, {:.1}) - ({:.1}, {:.1})",
            bb.min_x, bb.min_y, bb.max_x, bb.max_y
        );
    }

    let options = InsetOptions::new();
    for inset in [1.0, 2.0, 3.0] {
        match inset_shape(&rounded, inset, &options) {
            Ok(regions) => {
                let arcs: usize = regions
                    .iter()
                    .map(|r| r.segments.iter().filter(|s| s.is_arc()).count())
                    .sum();
                print_regions(&format!("inset {inset} ({arcs} arcs)"), &regions);
            }
            Err(e) => log::error!("inset {inset} failed: {e}"),
        }
    }
}

fn split_inset() {
    println!("\nInsetting two squares joined by a thin bar...");
    let dumbbell = shape_closed![
        line(10.0, 0.0),
        line(10.0, 4.0),
        line(20.0, 4.0),
        line(20.0, 0.0),
        line(30.0, 0.0),
        line(30.0, 10.0),
        line(20.0, 10.0),
        line(20.0, 6.0),
        line(10.0, 6.0),
        line(10.0, 10.0),
        line(0.0, 10.0),
        line(0.0, 0.0),
    ];

    let options = InsetOptions::new();
    for inset in [0.5, 2.0] {
        match inset_shape(&dumbbell, inset, &options) {
            Ok(regions) => print_regions(&format!("inset {inset}"), &regions),
            Err(e) => log::error!("inset {inset} failed: {e}"),
        }
    }
}
