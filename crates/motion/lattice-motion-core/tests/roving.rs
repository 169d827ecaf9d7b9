use lattice_motion_core::motion::roving::arc_length_table;
use lattice_motion_core::{
    apply_roving_keyframes, convert_motion_to_keyframes, would_roving_change, Keyframe,
    RecordedMotion, RovingOptions, Vec2,
};

fn line(points: &[(i32, f64)]) -> Vec<Keyframe<Vec2>> {
    points
        .iter()
        .map(|&(f, x)| Keyframe::with_id(format!("k{f}"), f, Vec2::new(x, 0.0)))
        .collect()
}

#[test]
fn straight_line_frames_follow_distance() {
    let ks = line(&[(0, 0.0), (2, 50.0), (3, 60.0), (20, 100.0)]);
    let out = apply_roving_keyframes(&ks, &RovingOptions::default())
        .into_result()
        .expect("roving succeeds");
    let frames: Vec<i32> = out.iter().map(|k| k.frame).collect();
    assert_eq!(frames, vec![0, 10, 12, 20]);
    for (a, b) in out.iter().zip(&ks) {
        assert_eq!(a.value, b.value);
        assert_eq!(a.id, b.id);
    }
}

#[test]
fn anchors_hold_on_recorded_arc() {
    let motion: RecordedMotion =
        lattice_test_fixtures::motions::load("quarter-arc").expect("load quarter-arc");
    let dense = convert_motion_to_keyframes(&motion, 30.0, 0);
    let sparse: Vec<Keyframe<Vec2>> = dense.iter().step_by(4).cloned().collect();
    assert!(sparse.len() >= 3);

    let result = apply_roving_keyframes(&sparse, &RovingOptions::default());
    assert!(result.success, "{:?}", result.error);
    let out = result.keyframes;
    assert_eq!(out.first().map(|k| k.frame), sparse.first().map(|k| k.frame));
    assert_eq!(out.last().map(|k| k.frame), sparse.last().map(|k| k.frame));
    assert!(out.windows(2).all(|w| w[0].frame < w[1].frame));
}

#[test]
fn arc_length_of_straight_path_is_exact() {
    let values = [Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0), Vec2::new(6.0, 8.0)];
    let table = arc_length_table(&values, 16);
    assert_eq!(table.len(), 3);
    assert!((table[1] - 5.0).abs() < 1e-9);
    assert!((table[2] - 10.0).abs() < 1e-9);
}

#[test]
fn evenly_timed_path_is_left_alone() {
    let ks = line(&[(0, 0.0), (5, 25.0), (10, 50.0), (20, 100.0)]);
    assert!(!would_roving_change(&ks, &RovingOptions::default()));
    let short = line(&[(0, 0.0), (9, 10.0)]);
    assert!(!would_roving_change(&short, &RovingOptions::default()));
}
