//! Sample capture during interactive dragging: one `record` call per input
//! event, in event order, never concurrent with evaluation.

use super::{MotionSample, RecordedMotion};

#[derive(Debug)]
pub struct MotionRecorder {
    active: Option<RecordedMotion>,
    recording_speed: f64,
}

impl Default for MotionRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionRecorder {
    pub fn new() -> Self {
        Self {
            active: None,
            recording_speed: 1.0,
        }
    }

    /// Speed stamped on recordings started after this call. Non-positive or
    /// non-finite speeds are ignored.
    pub fn set_recording_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed > 0.0 {
            self.recording_speed = speed;
        }
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Begin a recording for `pin_id` at the pin's current position. Any
    /// recording in progress is discarded.
    pub fn start(&mut self, pin_id: impl Into<String>, time: f64, x: f64, y: f64) {
        let motion = RecordedMotion::new(pin_id, vec![MotionSample::new(time, x, y)])
            .with_speed(self.recording_speed);
        if let Some(previous) = self.active.replace(motion) {
            log::debug!("discarding unfinished recording for '{}'", previous.pin_id);
        }
    }

    /// Append a sample. Samples older than the last one are dropped so the
    /// sequence stays sorted. Returns whether the sample was kept.
    pub fn record(&mut self, time: f64, x: f64, y: f64) -> bool {
        let Some(motion) = self.active.as_mut() else {
            return false;
        };
        if !(time.is_finite() && x.is_finite() && y.is_finite()) {
            return false;
        }
        if let Some(last) = motion.samples.last() {
            if time < last.time {
                log::trace!("dropping out-of-order sample at {time} (last {})", last.time);
                return false;
            }
        }
        motion.samples.push(MotionSample::new(time, x, y));
        true
    }

    /// Finish and hand back the recording, if one was active.
    pub fn stop(&mut self) -> Option<RecordedMotion> {
        self.active.take()
    }

    /// Abandon the current recording.
    pub fn cancel(&mut self) {
        self.active = None;
    }
}
