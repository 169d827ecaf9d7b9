//! Curve math: evaluate one keyframe segment, or a whole keyframe list, at a frame.
//!
//! Segment semantics are taken from the left keyframe's interpolation:
//! - hold: left value until the right keyframe's frame
//! - linear: component-wise lerp
//! - bezier: cubic in (frame, value) space; the frame axis is inverted to find
//!   the curve parameter before the value axis is evaluated

pub mod functions;

use crate::keyframe::{Interpolation, Keyframe};
use crate::value::Animatable;
use functions::{cubic_bezier_value, solve_cubic_for_x};

/// Evaluate the segment `k0 -> k1` at `frame` (`k0.frame <= frame <= k1.frame`).
/// Frames outside the segment are clamped to it.
pub fn evaluate_segment<T: Animatable>(k0: &Keyframe<T>, k1: &Keyframe<T>, frame: f64) -> T {
    let f0 = k0.frame as f64;
    let f1 = k1.frame as f64;
    let span = f1 - f0;
    if span <= 0.0 || frame <= f0 {
        return k0.value.clone();
    }
    if frame >= f1 {
        return k1.value.clone();
    }

    match k0.interpolation {
        Interpolation::Hold => k0.value.clone(),
        Interpolation::Linear => k0.value.lerp(&k1.value, (frame - f0) / span),
        Interpolation::Bezier => bezier_segment(k0, k1, frame),
    }
}

fn bezier_segment<T: Animatable>(k0: &Keyframe<T>, k1: &Keyframe<T>, frame: f64) -> T {
    let f0 = k0.frame as f64;
    let f1 = k1.frame as f64;

    if k0.out_handle.is_zero() && k1.in_handle.is_zero() {
        return k0.value.lerp(&k1.value, (frame - f0) / (f1 - f0));
    }

    let (out_frame, out_value) = k0.out_handle.effective();
    let (in_frame, in_value) = k1.in_handle.effective();

    // Keep the frame curve monotone so frame -> t has a single solution.
    let x1 = (f0 + out_frame).clamp(f0, f1);
    let x2 = (f1 + in_frame).clamp(f0, f1);
    let t = solve_cubic_for_x(f0, x1, x2, f1, frame);

    let p1 = k0.value.add(&out_value);
    let p2 = k1.value.add(&in_value);
    cubic_bezier_value(&k0.value, &p1, &p2, &k1.value, t)
}

/// Index `i` such that `keyframes[i].frame <= frame < keyframes[i + 1].frame`.
/// Caller guarantees `frame` lies strictly inside the keyframe range.
#[inline]
fn segment_index<T>(keyframes: &[Keyframe<T>], frame: f64) -> usize {
    let upper = keyframes.partition_point(|k| (k.frame as f64) <= frame);
    upper.saturating_sub(1).min(keyframes.len() - 2)
}

/// Evaluate a sorted keyframe list at `frame` with hold-extrapolation on both
/// ends. Returns `None` for an empty list.
pub fn evaluate_keyframes<T: Animatable>(keyframes: &[Keyframe<T>], frame: f64) -> Option<T> {
    let first = keyframes.first()?;
    let last = keyframes.last()?;
    if keyframes.len() == 1 || frame <= first.frame as f64 {
        return Some(first.value.clone());
    }
    if frame >= last.frame as f64 {
        return Some(last.value.clone());
    }
    let i = segment_index(keyframes, frame);
    Some(evaluate_segment(&keyframes[i], &keyframes[i + 1], frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::BezierHandle;
    use crate::value::Vec2;

    fn kf(frame: i32, value: f64, interp: Interpolation) -> Keyframe<f64> {
        Keyframe::with_id(format!("k{frame}"), frame, value).interpolation(interp)
    }

    #[test]
    fn hold_keeps_left_until_right_frame() {
        let a = kf(0, 1.0, Interpolation::Hold);
        let b = kf(10, 5.0, Interpolation::Hold);
        assert_eq!(evaluate_segment(&a, &b, 0.0), 1.0);
        assert_eq!(evaluate_segment(&a, &b, 9.99), 1.0);
        assert_eq!(evaluate_segment(&a, &b, 10.0), 5.0);
    }

    #[test]
    fn linear_midpoint() {
        let a = kf(0, 0.0, Interpolation::Linear);
        let b = kf(10, 100.0, Interpolation::Linear);
        assert!((evaluate_segment(&a, &b, 2.5) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn bezier_with_zero_handles_matches_linear() {
        let a = kf(0, 0.0, Interpolation::Bezier).handles(
            BezierHandle::new(0.0, 0.0),
            BezierHandle::new(0.0, 0.0),
        );
        let b = kf(20, 40.0, Interpolation::Bezier);
        let lin_a = kf(0, 0.0, Interpolation::Linear);
        for f in [0.0, 3.0, 7.5, 10.0, 19.0, 20.0] {
            let bez = evaluate_segment(&a, &b, f);
            let lin = evaluate_segment(&lin_a, &b, f);
            assert!((bez - lin).abs() < 1e-9, "frame {f}: {bez} vs {lin}");
        }
    }

    #[test]
    fn bezier_ease_in_lags_linear() {
        // Flat departure: out handle moves along frames only.
        let a = kf(0, 0.0, Interpolation::Bezier).handles(
            BezierHandle::new(0.0, 0.0),
            BezierHandle::new(6.0, 0.0),
        );
        let b = kf(10, 100.0, Interpolation::Linear).handles(
            BezierHandle::new(-3.0, 0.0),
            BezierHandle::new(0.0, 0.0),
        );
        let v = evaluate_segment(&a, &b, 2.0);
        assert!(v < 20.0, "eased value {v} should trail linear 20");
        assert!((evaluate_segment(&a, &b, 10.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn bezier_vec2_endpoints() {
        let a = Keyframe::with_id("a", 0, Vec2::new(0.0, 0.0))
            .interpolation(Interpolation::Bezier)
            .handles(
                BezierHandle::disabled(&Vec2::ZERO),
                BezierHandle::new(3.0, Vec2::new(10.0, -10.0)),
            );
        let b = Keyframe::with_id("b", 9, Vec2::new(90.0, 90.0));
        assert_eq!(evaluate_segment(&a, &b, 0.0), Vec2::new(0.0, 0.0));
        assert_eq!(evaluate_segment(&a, &b, 9.0), Vec2::new(90.0, 90.0));
    }

    #[test]
    fn list_extrapolates_and_brackets() {
        let ks = vec![
            kf(10, 1.0, Interpolation::Linear),
            kf(20, 2.0, Interpolation::Linear),
            kf(30, 0.0, Interpolation::Linear),
        ];
        assert_eq!(evaluate_keyframes(&ks, 0.0), Some(1.0));
        assert_eq!(evaluate_keyframes(&ks, 99.0), Some(0.0));
        assert!((evaluate_keyframes(&ks, 15.0).unwrap() - 1.5).abs() < 1e-12);
        assert!((evaluate_keyframes(&ks, 25.0).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(evaluate_keyframes(&ks, 20.0), Some(2.0));
        assert_eq!(evaluate_keyframes::<f64>(&[], 5.0), None);
    }
}
