use std::f64::consts::PI;

use spranim_animation_core::{
    Angle, Config, Coordinate, EditorBus, FrameModel, PolygonId, START_POSITION, START_ROTATION,
};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn model_with_polygon() -> (FrameModel, PolygonId) {
    let mut model = FrameModel::new(Config::default(), EditorBus::new());
    let id = model.add_polygon();
    (model, id)
}

#[test]
fn no_keyframes_gives_start_pose() {
    let (model, id) = model_with_polygon();
    for frame in [0, 31, 63] {
        assert_eq!(model.polygon_position_at(id, frame), START_POSITION);
        assert_eq!(model.polygon_rotation_at(id, frame), START_ROTATION);
    }
}

#[test]
fn edges_hold_flat_and_keyframes_are_exact() {
    let (mut model, id) = model_with_polygon();
    let a = Coordinate::new(-17.3, 4.1);
    let b = Coordinate::new(33.7, -90.9);
    model.add_position_keyframe(10, id, Some(a)).unwrap();
    model.add_position_keyframe(50, id, Some(b)).unwrap();

    assert_eq!(model.polygon_position_at(id, 0), a);
    assert_eq!(model.polygon_position_at(id, 10), a);
    assert_eq!(model.polygon_position_at(id, 50), b);
    assert_eq!(model.polygon_position_at(id, 63), b);

    let mid = model.polygon_position_at(id, 30);
    approx(mid.x(), (a.x() + b.x()) / 2.0, 1e-9);
    approx(mid.y(), (a.y() + b.y()) / 2.0, 1e-9);
}

#[test]
fn current_frame_queries_follow_the_cursor() {
    let (mut model, id) = model_with_polygon();
    model.add_position_keyframe(0, id, Some(Coordinate::new(0.0, 0.0))).unwrap();
    model.add_position_keyframe(8, id, Some(Coordinate::new(80.0, 0.0))).unwrap();
    model.set_current_frame(2);
    assert_eq!(model.polygon_position(id), Coordinate::new(20.0, 0.0));
    assert_eq!(model.polygon_center(id), Some(Coordinate::new(148.0, 128.0)));
}

#[test]
fn rotation_wraps_the_short_way() {
    let (mut model, id) = model_with_polygon();
    let near_full = Angle::from_radians(1.9 * PI);
    let just_past_zero = Angle::from_radians(0.1 * PI);
    model.add_rotation_keyframe(0, id, Some(near_full)).unwrap();
    model.add_rotation_keyframe(4, id, Some(just_past_zero)).unwrap();

    // Halfway crosses 2π (≡ 0), never sweeping back through π.
    let half = model.polygon_rotation_at(id, 2);
    let wrapped = half.radians().rem_euclid(2.0 * PI);
    assert!(wrapped < 0.01 || wrapped > 2.0 * PI - 0.01, "got {}", half.radians());

    let quarter = model.polygon_rotation_at(id, 1);
    approx(quarter.radians().rem_euclid(2.0 * PI), 1.95 * PI, 1e-9);
}

#[test]
fn interpolation_is_per_polygon() {
    let mut model = FrameModel::new(Config::default(), EditorBus::new());
    let a = model.add_polygon();
    let b = model.add_polygon();
    model.add_position_keyframe(5, a, Some(Coordinate::new(10.0, 10.0))).unwrap();
    assert_eq!(model.polygon_position_at(b, 5), START_POSITION);
    assert_eq!(model.position_keyframes_for(a).len(), 1);
    assert!(model.position_keyframes_for(b).is_empty());
}
