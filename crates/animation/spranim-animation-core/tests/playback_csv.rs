use spranim_animation_core::{
    AnimationDecoder, AnimationEncoder, AnimationModel, Config, Coordinate, EditorBus, RowLayout,
    SceneDescription, KEYFRAMES,
};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

#[test]
fn fixture_table_loads_two_objects() {
    let csv = spranim_test_fixtures::playback::csv("two-shapes").unwrap();
    let model = AnimationModel::from_csv_str(&csv, RowLayout::PositionAndRotation).unwrap();
    assert_eq!(model.len(), 2);

    let first = model.object(0).unwrap();
    assert_eq!(first.x.len(), KEYFRAMES);
    approx(first.x[16], 0.0, 1e-9);
    approx(first.y[16], -20.0, 1e-9);

    // Second object: single x keyframe holds everywhere, NaN cell is ignored.
    let second = model.object(1).unwrap();
    assert!(second.x.iter().all(|&x| x == 0.0));
    assert!(second.y.iter().all(|&y| y == 50.0));
    approx(second.rotation[25], 0.0, 1e-9);
}

#[test]
fn fractional_frames_blend_neighbours() {
    let csv = spranim_test_fixtures::playback::csv("two-shapes").unwrap();
    let model = AnimationModel::from_csv_str(&csv, RowLayout::PositionAndRotation).unwrap();
    let (pos, _) = model.sample(0, 0.5).unwrap();
    approx(pos.x(), -60.0 + 120.0 / 32.0 * 0.5, 1e-9);
    let (end, _) = model.sample(0, 80.0).unwrap();
    assert_eq!(end, Coordinate::new(-60.0, 0.0));
}

#[test]
fn decoder_output_feeds_the_playback_model() {
    let text = spranim_test_fixtures::scenes::json("two-shapes").unwrap();
    let editor = SceneDescription::from_json_str(&text)
        .unwrap()
        .build(Config::default(), EditorBus::new())
        .unwrap();
    let bytes = AnimationEncoder::new(&editor).encode_bytes().unwrap();
    let decoded = AnimationDecoder::default().decode_bytes(&bytes).unwrap();

    let viewer =
        AnimationModel::from_csv_str(&decoded.animation_csv(), RowLayout::PositionAndRotation)
            .unwrap();
    assert_eq!(viewer.len(), editor.polygon_count());

    // Positions survive quantization exactly for integer keyframes.
    for (i, id) in editor.polygon_ids().into_iter().enumerate() {
        for frame in 0..KEYFRAMES {
            let expected = editor.polygon_position_at(id, frame);
            let (got, _) = viewer.sample(i, frame as f64).unwrap();
            approx(got.x(), expected.x(), 1e-9);
            approx(got.y(), expected.y(), 1e-9);
        }
    }

    let polygons = decoded.polygons_csv();
    assert_eq!(polygons.lines().count(), 2);
    assert!(polygons.starts_with("3,-20,200,20,120,60,200"));
}
