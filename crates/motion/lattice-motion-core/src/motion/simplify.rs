//! Keyframe reduction: Douglas-Peucker over (frame, value) and a greedy
//! redundant-frame pass.
//!
//! Frame is the independent axis. The distance of an interior keyframe is
//! measured in value space against the linear interpolation of the segment
//! endpoints at that keyframe's frame, so `tolerance` is in value units
//! (pixels for positions). Frames and values are not normalized against each
//! other.

use crate::keyframe::Keyframe;
use crate::value::Animatable;

/// Value-space distance of `k` from the chord `a -> b` at `k.frame`.
fn chord_distance<T: Animatable>(a: &Keyframe<T>, b: &Keyframe<T>, k: &Keyframe<T>) -> f64 {
    let span = (b.frame - a.frame) as f64;
    let expected = if span == 0.0 {
        a.value.clone()
    } else {
        a.value.lerp(&b.value, (k.frame - a.frame) as f64 / span)
    };
    k.value.distance(&expected)
}

/// Douglas-Peucker simplification. First and last keyframes are always kept;
/// inputs of two or fewer keyframes are returned verbatim.
pub fn simplify_keyframes<T: Animatable>(keyframes: &[Keyframe<T>], tolerance: f64) -> Vec<Keyframe<T>> {
    let n = keyframes.len();
    if n <= 2 {
        return keyframes.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    // Explicit stack of (start, end) index ranges instead of recursion.
    let mut stack = vec![(0usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (a, b) = (&keyframes[start], &keyframes[end]);
        let mut max_distance = 0.0;
        let mut split = start;
        for (i, k) in keyframes.iter().enumerate().take(end).skip(start + 1) {
            let d = chord_distance(a, b, k);
            if d > max_distance {
                max_distance = d;
                split = i;
            }
        }
        // `split == start` means no interior point beat zero distance; a
        // negative tolerance must not re-push the same range.
        if split != start && max_distance > tolerance {
            keep[split] = true;
            stack.push((start, split));
            stack.push((split, end));
        }
    }

    keyframes
        .iter()
        .zip(keep)
        .filter_map(|(k, kept)| kept.then(|| k.clone()))
        .collect()
}

/// Greedy pass: keep the first keyframe, then every keyframe whose value is at
/// least `min_distance` from the last kept one. The last keyframe is always kept.
pub fn remove_redundant_keyframes<T: Animatable>(
    keyframes: &[Keyframe<T>],
    min_distance: f64,
) -> Vec<Keyframe<T>> {
    let n = keyframes.len();
    if n <= 2 {
        return keyframes.to_vec();
    }

    let mut out: Vec<Keyframe<T>> = Vec::with_capacity(n);
    out.push(keyframes[0].clone());
    for k in &keyframes[1..n - 1] {
        let last_kept = &out[out.len() - 1];
        if k.value.distance(&last_kept.value) >= min_distance {
            out.push(k.clone());
        }
    }
    out.push(keyframes[n - 1].clone());
    out
}
