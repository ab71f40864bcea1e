use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spranim_animation_core::{
    AnimationDecoder, AnimationEncoder, Angle, Config, Coordinate, EditorBus, FrameModel,
};

/// Fifteen polygons with a keyframe on every other frame, close to the largest scene
/// the stream format can carry.
fn dense_model() -> FrameModel {
    let mut model = FrameModel::new(Config::default(), EditorBus::new());
    for p in 0..15 {
        let points: Vec<Coordinate> = (0..15)
            .map(|i| {
                let a = i as f64 / 15.0 * std::f64::consts::TAU;
                Coordinate::new(128.0 + 60.0 * a.cos(), 128.0 + 60.0 * a.sin())
            })
            .collect();
        let id = model.add_polygon_with(&points);
        for frame in (0..64).step_by(2) {
            let t = frame as f64 + p as f64;
            model
                .add_position_keyframe(frame, id, Some(Coordinate::new(t.sin() * 100.0, t.cos() * 100.0)))
                .unwrap();
            model
                .add_rotation_keyframe(frame, id, Some(Angle::from_radians(t * 0.1)))
                .unwrap();
        }
    }
    model
}

fn bench_codec(c: &mut Criterion) {
    let model = dense_model();
    c.bench_function("encode_dense_scene", |b| {
        b.iter(|| AnimationEncoder::new(black_box(&model)).encode_bytes().unwrap())
    });

    let bytes = AnimationEncoder::new(&model).encode_bytes().unwrap();
    let decoder = AnimationDecoder::default();
    c.bench_function("decode_dense_scene", |b| {
        b.iter(|| decoder.decode_bytes(black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
