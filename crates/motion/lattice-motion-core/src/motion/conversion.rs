//! Recorded samples -> one linear keyframe per playback frame.

use super::{MotionSample, RecordedMotion};
use crate::interp::functions::lerp_f64;
use crate::keyframe::Keyframe;
use crate::value::Vec2;

// Absorbs float noise in `duration * fps / 1000` before the ceiling.
const FRAME_COUNT_EPSILON: f64 = 1e-9;

// Upper bound on frames emitted for one motion (over an hour at 240 fps).
const MAX_FRAME_COUNT: i64 = 1_000_000;

/// Position at `time` (ms), linearly interpolated between the bracketing
/// samples and clamped to the first/last sample outside the recorded range.
fn position_at(samples: &[MotionSample], time: f64) -> Vec2 {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Vec2::ZERO,
    };
    if time <= first.time {
        return first.position();
    }
    if time >= last.time {
        return last.position();
    }
    let upper = samples.partition_point(|s| s.time <= time);
    let a = &samples[upper - 1];
    let b = &samples[upper];
    let span = b.time - a.time;
    if span <= 0.0 {
        return b.position();
    }
    let t = (time - a.time) / span;
    Vec2::new(lerp_f64(a.x, b.x, t), lerp_f64(a.y, b.y, t))
}

fn keyframe_for(pin_id: &str, frame: i32, value: Vec2) -> Keyframe<Vec2> {
    Keyframe::with_id(format!("{pin_id}_kf_{frame}"), frame, value)
}

/// Convert a recorded motion into keyframes at `frame_rate`, starting at
/// `start_frame`.
///
/// Frame count is `ceil(playback_duration / (1000 / frame_rate))`; frames
/// `start_frame ..= start_frame + count` each get one keyframe. Playback time
/// maps back to recorded time through `recording_speed`. The count is capped
/// and never runs past `i32::MAX`.
pub fn convert_motion_to_keyframes(
    motion: &RecordedMotion,
    frame_rate: f64,
    start_frame: i32,
) -> Vec<Keyframe<Vec2>> {
    let samples = &motion.samples;
    let first = match samples.first() {
        Some(first) => first,
        None => return Vec::new(),
    };
    let valid_rate = frame_rate.is_finite() && frame_rate > 0.0;
    let valid_speed = motion.recording_speed.is_finite() && motion.recording_speed > 0.0;
    if !valid_rate || !valid_speed {
        log::debug!(
            "motion '{}' skipped: frame_rate={} recording_speed={}",
            motion.pin_id,
            frame_rate,
            motion.recording_speed
        );
        return Vec::new();
    }
    if samples.len() == 1 {
        return vec![keyframe_for(&motion.pin_id, start_frame, first.position())];
    }

    let frame_duration = 1000.0 / frame_rate;
    let playback_duration = motion.playback_duration();
    let wanted = (playback_duration * frame_rate / 1000.0 - FRAME_COUNT_EPSILON)
        .ceil()
        .max(0.0);
    // The last frame must stay representable as `i32`.
    let room = i64::from(i32::MAX) - i64::from(start_frame);
    let frame_count = (wanted.min(MAX_FRAME_COUNT as f64) as i64).min(room) as i32;
    if f64::from(frame_count) < wanted {
        log::debug!(
            "motion '{}' truncated to {} frames (wanted {})",
            motion.pin_id,
            frame_count,
            wanted
        );
    }

    (0..=frame_count)
        .map(|i| {
            let playback_time = i as f64 * frame_duration;
            let recorded_time = playback_time * motion.recording_speed + first.time;
            keyframe_for(
                &motion.pin_id,
                start_frame + i,
                position_at(samples, recorded_time),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_sample() {
        let empty = RecordedMotion::new("p", vec![]);
        assert!(convert_motion_to_keyframes(&empty, 30.0, 0).is_empty());

        let single = RecordedMotion::new("p", vec![MotionSample::new(5.0, 7.0, 8.0)]);
        let out = convert_motion_to_keyframes(&single, 30.0, 12);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].frame, 12);
        assert_eq!(out[0].value, Vec2::new(7.0, 8.0));
        assert_eq!(out[0].id, "p_kf_12");
    }

    #[test]
    fn start_frame_offsets_all_frames() {
        let m = RecordedMotion::new(
            "p",
            vec![MotionSample::new(0.0, 0.0, 0.0), MotionSample::new(100.0, 10.0, 0.0)],
        );
        let out = convert_motion_to_keyframes(&m, 30.0, 100);
        // 100 ms at 30 fps -> ceil(3.0) = 3 frames past the start.
        let frames: Vec<i32> = out.iter().map(|k| k.frame).collect();
        assert_eq!(frames, vec![100, 101, 102, 103]);
        assert!((out[3].value.x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn start_near_i32_max_stops_at_last_frame() {
        let m = RecordedMotion::new(
            "p",
            vec![MotionSample::new(0.0, 0.0, 0.0), MotionSample::new(100.0, 10.0, 0.0)],
        );
        let out = convert_motion_to_keyframes(&m, 30.0, i32::MAX - 1);
        let frames: Vec<i32> = out.iter().map(|k| k.frame).collect();
        assert_eq!(frames, vec![i32::MAX - 1, i32::MAX]);

        let long = RecordedMotion::new(
            "p",
            vec![MotionSample::new(0.0, 0.0, 0.0), MotionSample::new(1e15, 10.0, 0.0)],
        );
        let out = convert_motion_to_keyframes(&long, 30.0, i32::MAX);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].frame, i32::MAX);
        assert_eq!(out[0].value, Vec2::ZERO);
    }

    #[test]
    fn non_positive_rates_yield_nothing() {
        let m = RecordedMotion::new(
            "p",
            vec![MotionSample::new(0.0, 0.0, 0.0), MotionSample::new(100.0, 1.0, 1.0)],
        );
        assert!(convert_motion_to_keyframes(&m, 0.0, 0).is_empty());
        assert!(convert_motion_to_keyframes(&m.clone().with_speed(0.0), 30.0, 0).is_empty());
    }

    #[test]
    fn interpolates_between_samples() {
        let m = RecordedMotion::new(
            "p",
            vec![
                MotionSample::new(0.0, 0.0, 0.0),
                MotionSample::new(50.0, 100.0, 0.0),
                MotionSample::new(100.0, 100.0, 100.0),
            ],
        );
        let out = convert_motion_to_keyframes(&m, 40.0, 0);
        // 25 ms frames: 0, 25, 50, 75, 100
        assert_eq!(out.len(), 5);
        assert!((out[1].value.x - 50.0).abs() < 1e-9);
        assert!((out[3].value.y - 50.0).abs() < 1e-9);
    }
}
