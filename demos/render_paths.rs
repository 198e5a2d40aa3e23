use inset_kernel::{
    core::math::Vector2,
    orchestrator::{render_paths, Clip, Group, KernelBooleanEngine, KernelOptions, RenderInput},
    segment::{shape_area, ClipMode, Path, Segment, StyleEntry},
    shape_closed,
};

fn main() {
    env_logger::init();

    let card = shape_closed![line(40.0, 0.0), line(40.0, 20.0), line(0.0, 20.0), line(0.0, 0.0)];
    let badge = {
        let c = Vector2::new(35.0, 5.0);
        vec![
            Segment::arc(c, Vector2::new(31.0, 5.0), true),
            Segment::arc(c, Vector2::new(39.0, 5.0), true),
        ]
    };
    let window = shape_closed![line(30.0, -5.0), line(30.0, 25.0), line(-5.0, 25.0), line(-5.0, -5.0)];

    let input = RenderInput::new()
        .with_path(
            1,
            Path::closed(card).with_style(vec![
                StyleEntry::fill(0),
                StyleEntry::line(0.5, 1).with_inset(1.0),
            ]),
        )
        .with_path(
            2,
            Path::closed(badge)
                .with_style(vec![StyleEntry::fill(0).with_inset(0.5)])
                .with_group(7),
        )
        .with_group(
            7,
            Group {
                order: 1,
                clip_mode: Some(ClipMode::None),
                ..Group::default()
            },
        )
        .with_clip(Clip::inside(window));

    let options = KernelOptions::new();
    let mut cache = options.new_cache();
    let engine = KernelBooleanEngine::new();

    for pass in 0..2 {
        let output = render_paths(&input, &engine, &mut cache, &options);
        println!("Pass {pass}: {} output path(s)", output.len());
        for r in &output {
            println!(
                "  from path {}: style #{}, {} segment(s), area {:.3}",
                r.source,
                r.path.style[0].original_index,
                r.path.segments.len(),
                shape_area(&r.path.segments)
            );
        }
    }

    log::info!("inset cache: {} hit(s), {} miss(es)", cache.hits(), cache.misses());
}
