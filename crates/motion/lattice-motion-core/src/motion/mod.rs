//! Recorded motion: raw samples -> smoothed samples -> per-frame keyframes ->
//! simplified keyframes, plus roving redistribution and sample capture.

pub mod conversion;
pub mod recorder;
pub mod roving;
pub mod simplify;
pub mod smoothing;

use serde::{Deserialize, Serialize};

use crate::keyframe::Keyframe;
use crate::value::Vec2;

pub use conversion::convert_motion_to_keyframes;
pub use recorder::MotionRecorder;
pub use roving::{apply_roving_keyframes, would_roving_change, RovingError, RovingOptions, RovingResult};
pub use simplify::{remove_redundant_keyframes, simplify_keyframes};
pub use smoothing::{smooth_motion, smooth_motion_moving_average};

/// One raw position observation; `time` is in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub time: f64,
    pub x: f64,
    pub y: f64,
}

impl MotionSample {
    #[inline]
    pub const fn new(time: f64, x: f64, y: f64) -> Self {
        Self { time, x, y }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A captured drag of one pin. `recording_speed` scales elapsed time on
/// playback: playback duration = recorded duration / recording_speed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedMotion {
    pub pin_id: String,
    pub samples: Vec<MotionSample>,
    pub recording_speed: f64,
}

impl RecordedMotion {
    pub fn new(pin_id: impl Into<String>, samples: Vec<MotionSample>) -> Self {
        Self {
            pin_id: pin_id.into(),
            samples,
            recording_speed: 1.0,
        }
    }

    pub fn with_speed(mut self, recording_speed: f64) -> Self {
        self.recording_speed = recording_speed;
        self
    }

    /// Recorded duration in milliseconds (0 for fewer than two samples).
    pub fn recorded_duration(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (last.time - first.time).max(0.0),
            _ => 0.0,
        }
    }

    /// Playback duration in milliseconds after applying the recording speed.
    pub fn playback_duration(&self) -> f64 {
        if self.recording_speed <= 0.0 {
            return 0.0;
        }
        self.recorded_duration() / self.recording_speed
    }
}

/// Parameters of the recorded-motion pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MotionPipelineConfig {
    pub frame_rate: f64,
    pub start_frame: i32,
    /// Gaussian smoothing amount in [0, 100]; 0 disables smoothing.
    pub smoothing_amount: f64,
    /// Douglas-Peucker tolerance in value-space units.
    pub simplify_tolerance: f64,
}

impl Default for MotionPipelineConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            start_frame: 0,
            smoothing_amount: 50.0,
            simplify_tolerance: 1.0,
        }
    }
}

/// Smooth, convert and simplify a recorded motion, in that order.
pub fn process_recorded_motion(
    motion: &RecordedMotion,
    frame_rate: f64,
    start_frame: i32,
    smoothing_amount: f64,
    simplify_tolerance: f64,
) -> Vec<Keyframe<Vec2>> {
    let smoothed = smooth_motion(motion, smoothing_amount);
    let keyframes = convert_motion_to_keyframes(&smoothed, frame_rate, start_frame);
    let simplified = simplify_keyframes(&keyframes, simplify_tolerance);
    log::debug!(
        "processed motion '{}': {} samples -> {} keyframes -> {} after simplification",
        motion.pin_id,
        motion.samples.len(),
        keyframes.len(),
        simplified.len()
    );
    simplified
}

/// `process_recorded_motion` driven by a config.
pub fn process_with_config(motion: &RecordedMotion, cfg: &MotionPipelineConfig) -> Vec<Keyframe<Vec2>> {
    process_recorded_motion(
        motion,
        cfg.frame_rate,
        cfg.start_frame,
        cfg.smoothing_amount,
        cfg.simplify_tolerance,
    )
}
