//! Roving keyframes: retime intermediate keyframes so a spatial path is
//! traversed at constant speed.
//!
//! The path passes through every keyframe value; each segment is a cubic
//! whose inner control points sit at 1/3 and 2/3 of the segment. A dense
//! arc-length table over that path gives the cumulative distance at every
//! keyframe, and intermediate frames are placed proportionally between the
//! first and last frame. Values never change, only frames.

use serde::{Deserialize, Serialize};

use crate::interp::functions::cubic_bezier_value;
use crate::keyframe::Keyframe;
use crate::value::Animatable;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RovingOptions {
    pub anchor_first: bool,
    pub anchor_last: bool,
    pub min_keyframes: usize,
    /// Arc-length table resolution per path segment.
    pub samples_per_segment: usize,
}

impl Default for RovingOptions {
    fn default() -> Self {
        Self {
            anchor_first: true,
            anchor_last: true,
            min_keyframes: 3,
            samples_per_segment: 32,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RovingError {
    #[error("roving needs at least {required} keyframes, got {actual}")]
    TooFewKeyframes { required: usize, actual: usize },

    #[error("first and last keyframes share frame {frame}")]
    EqualAnchorFrames { frame: i32 },

    #[error("path has zero length")]
    ZeroPathLength,

    #[error("{keyframes} keyframes do not fit on distinct frames in {first}..={last}")]
    InsufficientFrameSpan { keyframes: usize, first: i32, last: i32 },
}

/// Outcome of a roving pass. On failure `keyframes` is the unchanged input;
/// check `success` before relying on new frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RovingResult<T> {
    pub success: bool,
    pub keyframes: Vec<Keyframe<T>>,
    pub error: Option<RovingError>,
}

impl<T> RovingResult<T> {
    fn ok(keyframes: Vec<Keyframe<T>>) -> Self {
        Self {
            success: true,
            keyframes,
            error: None,
        }
    }

    fn failed(keyframes: Vec<Keyframe<T>>, error: RovingError) -> Self {
        Self {
            success: false,
            keyframes,
            error: Some(error),
        }
    }

    pub fn into_result(self) -> Result<Vec<Keyframe<T>>, RovingError> {
        match self.error {
            None => Ok(self.keyframes),
            Some(e) => Err(e),
        }
    }
}

/// Inner control points of the pass-through segment `a -> b`.
fn segment_controls<T: Animatable>(a: &T, b: &T) -> (T, T) {
    (a.lerp(b, 1.0 / 3.0), a.lerp(b, 2.0 / 3.0))
}

/// Cumulative arc length at every keyframe value (first entry 0), measured
/// on the pass-through cubic path with `samples_per_segment` chords per segment.
pub fn arc_length_table<T: Animatable>(values: &[T], samples_per_segment: usize) -> Vec<f64> {
    let steps = samples_per_segment.max(1);
    let mut table = Vec::with_capacity(values.len());
    let mut total = 0.0;
    if values.is_empty() {
        return table;
    }
    table.push(0.0);
    for pair in values.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (c1, c2) = segment_controls(a, b);
        let mut prev = a.clone();
        for s in 1..=steps {
            let t = s as f64 / steps as f64;
            let p = cubic_bezier_value(a, &c1, &c2, b, t);
            total += p.distance(&prev);
            prev = p;
        }
        table.push(total);
    }
    table
}

fn validate<T>(keyframes: &[Keyframe<T>], options: &RovingOptions) -> Result<(i32, i32), RovingError> {
    let required = options.min_keyframes.max(2);
    if keyframes.len() < required {
        return Err(RovingError::TooFewKeyframes {
            required,
            actual: keyframes.len(),
        });
    }
    let first = keyframes[0].frame;
    let last = keyframes[keyframes.len() - 1].frame;
    if first == last {
        return Err(RovingError::EqualAnchorFrames { frame: first });
    }
    Ok((first, last))
}

/// Redistribute intermediate keyframe frames by arc length.
///
/// Retimed frames are rounded to integers. Where rounding makes neighbours
/// collide, frames are nudged forward and then pulled back from the end so
/// the result stays strictly ascending. If `last - first` is too small to give
/// every keyframe its own frame, nothing is retimed and the result carries
/// [`RovingError::InsufficientFrameSpan`].
pub fn apply_roving_keyframes<T: Animatable>(
    keyframes: &[Keyframe<T>],
    options: &RovingOptions,
) -> RovingResult<T> {
    let (first, last) = match validate(keyframes, options) {
        Ok(range) => range,
        Err(e) => {
            log::debug!("roving skipped: {e}");
            return RovingResult::failed(keyframes.to_vec(), e);
        }
    };

    let values: Vec<T> = keyframes.iter().map(|k| k.value.clone()).collect();
    let cumulative = arc_length_table(&values, options.samples_per_segment);
    let total = cumulative.last().copied().unwrap_or(0.0);
    if total.is_nan() || total <= f64::EPSILON {
        log::debug!("roving skipped: zero-length path");
        return RovingResult::failed(keyframes.to_vec(), RovingError::ZeroPathLength);
    }

    let n = keyframes.len();
    if ((last - first).unsigned_abs() as usize) < n - 1 {
        return RovingResult::failed(
            keyframes.to_vec(),
            RovingError::InsufficientFrameSpan {
                keyframes: n,
                first,
                last,
            },
        );
    }

    let span = (last - first) as f64;
    let mut frames: Vec<i32> = cumulative
        .iter()
        .map(|c| (first as f64 + c / total * span).round() as i32)
        .collect();
    if options.anchor_first {
        frames[0] = first;
    }
    if options.anchor_last {
        frames[n - 1] = last;
    }

    // Rounding can collide neighbouring frames; push them forward, then pull
    // back from the end so everything stays strictly ascending inside the span.
    let dir = if last > first { 1 } else { -1 };
    for i in 1..n {
        if (frames[i] - frames[i - 1]) * dir < 1 {
            frames[i] = frames[i - 1] + dir;
        }
    }
    for i in (0..n - 1).rev() {
        if (frames[i + 1] - frames[i]) * dir < 1 {
            frames[i] = frames[i + 1] - dir;
        }
    }

    let out = keyframes
        .iter()
        .zip(frames)
        .map(|(k, frame)| {
            let mut k = k.clone();
            k.frame = frame;
            k
        })
        .collect();
    log::debug!("roving applied to {n} keyframes over {first}..={last}");
    RovingResult::ok(out)
}

/// Whether roving would move any keyframe.
pub fn would_roving_change<T: Animatable>(keyframes: &[Keyframe<T>], options: &RovingOptions) -> bool {
    let result = apply_roving_keyframes(keyframes, options);
    result.success
        && result
            .keyframes
            .iter()
            .zip(keyframes)
            .any(|(a, b)| a.frame != b.frame)
}
