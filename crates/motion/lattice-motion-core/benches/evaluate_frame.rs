use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lattice_motion_core::{
    evaluate_layer, process_recorded_motion, AnimatableProperty, Keyframe, Layer, MotionEngine,
    MotionSample, PropertyPath, PropertyValue, RecordedMotion, Vec2,
};

fn animated_layer(i: usize) -> Layer {
    let id = format!("layer-{i}");
    let mut layer = Layer::new(&id, &id).with_property(AnimatableProperty::with_keyframes(
        format!("{id}.blur"),
        "blur",
        PropertyValue::Number(0.0),
        (0..12).map(|k| Keyframe::with_id(format!("b{k}"), k * 10, PropertyValue::Number(k as f64))),
    ));
    layer.transform.position.replace_keyframes(
        (0..24).map(|k| Keyframe::with_id(format!("p{k}"), k * 5, Vec2::new(k as f64 * 10.0, i as f64))),
    );
    layer
}

fn scene(layers: usize) -> Vec<Layer> {
    (0..layers).map(animated_layer).collect()
}

fn drag(samples: usize) -> RecordedMotion {
    RecordedMotion::new(
        "bench-pin",
        (0..samples)
            .map(|i| {
                let t = i as f64 * 8.0;
                MotionSample::new(t, t * 0.5, (t / 90.0).sin() * 120.0)
            })
            .collect(),
    )
}

fn bench_evaluate(c: &mut Criterion) {
    let layers = scene(100);

    c.bench_function("evaluate_100_layers_uncached", |b| {
        b.iter(|| {
            for layer in &layers {
                black_box(evaluate_layer(layer, black_box(57.5)));
            }
        })
    });

    c.bench_function("evaluate_100_layers_warm_cache", |b| {
        let mut engine = MotionEngine::default();
        engine.load_layers(scene(100)).unwrap();
        engine.evaluate_frame(57.5);
        b.iter(|| black_box(engine.evaluate_frame(black_box(57.5))))
    });

    c.bench_function("evaluate_100_layers_one_dirty", |b| {
        let mut engine = MotionEngine::default();
        engine.load_layers(scene(100)).unwrap();
        engine.evaluate_frame(57.5);
        let mut rotation = 0.0;
        b.iter(|| {
            rotation += 1.0;
            engine
                .set_base_value("layer-42", &PropertyPath::Rotation, rotation)
                .unwrap();
            black_box(engine.evaluate_frame(57.5))
        })
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let motion = drag(600);
    c.bench_function("process_recorded_motion_600_samples", |b| {
        b.iter(|| black_box(process_recorded_motion(black_box(&motion), 30.0, 0, 50.0, 1.0)))
    });
}

criterion_group!(benches, bench_evaluate, bench_pipeline);
criterion_main!(benches);
