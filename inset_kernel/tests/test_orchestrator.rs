mod test_utils;

use inset_kernel::{
    assert_fuzzy_eq,
    core::{math::Vector2, traits::FuzzyEq},
    error::BooleanEngineError,
    orchestrator::{
        render_paths, BooleanEngine, Clip, ClipOperand, Group, KernelBooleanEngine, KernelOptions, PathCommand,
        RenderInput, RenderPath,
    },
    segment::{shape_area, ClipMode, Path, Segment, StyleEntry},
};
use std::cell::Cell;
use test_utils::{circle, init_logging, rect, regular_polygon};

/// Kernel engine that counts how often it is called.
#[derive(Default)]
struct CountingEngine {
    inner: KernelBooleanEngine,
    clips: Cell<usize>,
    simplifies: Cell<usize>,
}

impl BooleanEngine for CountingEngine {
    fn clip(&self, subject: &[PathCommand], clips: &[ClipOperand]) -> Result<Vec<PathCommand>, BooleanEngineError> {
        self.clips.set(self.clips.get() + 1);
        self.inner.clip(subject, clips)
    }

    fn simplify(&self, subject: &[PathCommand]) -> Result<Vec<PathCommand>, BooleanEngineError> {
        self.simplifies.set(self.simplifies.get() + 1);
        self.inner.simplify(subject)
    }
}

fn run(input: &RenderInput, engine: &dyn BooleanEngine) -> Vec<RenderPath> {
    init_logging();
    let options = KernelOptions::new();
    let mut cache = options.new_cache();
    render_paths(input, engine, &mut cache, &options)
}

#[test]
fn zero_inset_round_trips_normalized_geometry() {
    // counter clockwise input with a duplicate point
    let shape = vec![
        Segment::line(0.0, 10.0),
        Segment::line(0.0, 10.0),
        Segment::line(10.0, 10.0),
        Segment::line(10.0, 0.0),
        Segment::line(0.0, 0.0),
    ];
    let path = Path::closed(shape).with_style(vec![StyleEntry::fill(0)]);
    let output = run(&RenderInput::new().with_path(1, path), &KernelBooleanEngine::new());
    assert_eq!(output.len(), 1);
    assert_eq!(output[0].path.segments.len(), 4);
    assert_fuzzy_eq!(shape_area(&output[0].path.segments), 100.0);
}

#[test]
fn single_inside_clip_stays_in_the_kernel() {
    let engine = CountingEngine::default();
    let input = RenderInput::new()
        .with_path(1, Path::closed(rect(0.0, 0.0, 10.0, 10.0)).with_style(vec![StyleEntry::fill(0)]))
        .with_clip(Clip::inside(circle(4.0, Vector2::new(10.0, 5.0))));
    let output = run(&input, &engine);
    assert_eq!(engine.clips.get(), 0);
    assert_eq!(output.len(), 1);
    // half disc inside the square
    assert_fuzzy_eq!(shape_area(&output[0].path.segments), 8.0 * std::f64::consts::PI, 1e-5);
}

#[test]
fn several_clips_use_the_engine_once_per_shape() {
    let engine = CountingEngine::default();
    let input = RenderInput::new()
        .with_path(
            1,
            Path::closed(rect(0.0, 0.0, 10.0, 10.0)).with_style(vec![StyleEntry::fill(0), StyleEntry::line(1.0, 1)]),
        )
        .with_clip(Clip::inside(rect(2.0, -5.0, 15.0, 15.0)))
        .with_clip(Clip::inside(rect(-5.0, 2.0, 15.0, 15.0)));
    let output = run(&input, &engine);
    assert_eq!(engine.clips.get(), 2);
    assert_eq!(engine.simplifies.get(), 0);
    assert_eq!(output.len(), 2);
    for r in &output {
        assert_fuzzy_eq!(shape_area(&r.path.segments), 64.0);
    }
}

#[test]
fn mixed_scene_in_render_order() {
    let input = RenderInput::new()
        .with_path(
            10,
            Path::closed(regular_polygon(6, 10.0, Vector2::new(0.0, 0.0)))
                .with_style(vec![StyleEntry::fill(0).with_inset(1.0)])
                .with_order(2),
        )
        .with_path(
            11,
            Path::closed(circle(3.0, Vector2::new(50.0, 0.0)))
                .with_style(vec![StyleEntry::line(0.5, 0).with_inset(-1.0)])
                .with_group(1),
        )
        .with_path(
            12,
            Path::open(Vector2::new(0.0, 0.0), vec![Segment::line(5.0, 5.0)])
                .with_style(vec![StyleEntry::line(1.0, 0)])
                .with_order(-1),
        )
        .with_group(
            1,
            Group {
                order: 0,
                clip_mode: Some(ClipMode::None),
                ..Group::default()
            },
        );
    let output = run(&input, &KernelBooleanEngine::new());
    let sources: Vec<u64> = output.iter().map(|r| r.source).collect();
    assert_eq!(sources, vec![12, 11, 10]);

    assert!(output[0].path.open);
    assert_fuzzy_eq!(shape_area(&output[1].path.segments), 16.0 * std::f64::consts::PI, 1e-6);
    // hexagon apothem shrinks by one
    let apothem = 10.0 * (std::f64::consts::PI / 6.0).cos() - 1.0;
    let expected = 6.0 * apothem * apothem * (std::f64::consts::PI / 6.0).tan();
    assert!(shape_area(&output[2].path.segments).fuzzy_eq_eps(expected, 1e-6));
}

#[test]
fn group_clip_mode_and_path_override() {
    let input = RenderInput::new()
        .with_path(
            1,
            Path::closed(rect(0.0, 0.0, 10.0, 10.0))
                .with_style(vec![StyleEntry::fill(0)])
                .with_group(1),
        )
        .with_path(
            2,
            Path::closed(rect(0.0, 20.0, 10.0, 30.0))
                .with_style(vec![StyleEntry::fill(0)])
                .with_group(1)
                .with_clip_mode(ClipMode::Normal),
        )
        .with_group(
            1,
            Group {
                clip_mode: Some(ClipMode::None),
                ..Group::default()
            },
        )
        .with_clip(Clip::inside(rect(5.0, -5.0, 15.0, 35.0)));
    let output = run(&input, &KernelBooleanEngine::new());
    assert_eq!(output.len(), 2);
    assert_fuzzy_eq!(shape_area(&output[0].path.segments), 100.0);
    assert_fuzzy_eq!(shape_area(&output[1].path.segments), 50.0);
}

#[cfg(feature = "serde")]
#[test]
fn render_input_from_json() {
    let json = r#"{
        "paths": {
            "3": {
                "origin": { "x": 0.0, "y": 0.0 },
                "segments": [
                    { "kind": "line", "to": { "x": 10.0, "y": 0.0 } },
                    { "kind": "line", "to": { "x": 10.0, "y": 10.0 } },
                    { "kind": "line", "to": { "x": 0.0, "y": 10.0 } },
                    { "kind": "line", "to": { "x": 0.0, "y": 0.0 } }
                ],
                "style": [
                    { "kind": { "kind": "fill" }, "inset": 1.0, "originalIndex": 0 },
                    { "kind": { "kind": "line", "width": 2.0 }, "originalIndex": 1 }
                ]
            }
        }
    }"#;
    let input: RenderInput = serde_json::from_str(json).unwrap();
    let output = run(&input, &KernelBooleanEngine::new());
    assert_eq!(output.len(), 2);
    assert_eq!(output[0].source, 3);
    assert_fuzzy_eq!(shape_area(&output[0].path.segments), 64.0);
    // missing fields take their defaults
    assert!(!input.paths[&3].open);
    assert_eq!(input.paths[&3].style[1].inset, None);
    assert!(input.groups.is_empty() && input.clips.is_empty());
    assert_fuzzy_eq!(shape_area(&output[1].path.segments), 100.0);
    assert_eq!(output[1].path.style[0].original_index, 1);
    let round_trip: Path = serde_json::from_str(&serde_json::to_string(&output[0].path).unwrap()).unwrap();
    assert_eq!(round_trip, output[0].path);
}
