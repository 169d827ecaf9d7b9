//! Motion smoothing: Gaussian and moving-average filters over raw samples.
//!
//! Both filters act on x and y independently and never touch `time` or the
//! sample count.

use super::{MotionSample, RecordedMotion};

const MAX_GAUSSIAN_RADIUS: f64 = 10.0;

/// Normalized Gaussian weights for offsets `-radius..=radius`.
fn gaussian_kernel(radius: usize) -> Vec<f64> {
    let sigma = radius as f64 / 3.0;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let r = radius as isize;
    let mut kernel: Vec<f64> = (-r..=r)
        .map(|i| (-((i * i) as f64) / two_sigma_sq).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Convolve the positions with `kernel` (centered, odd length). Weights that
/// fall outside the sequence are dropped and the rest re-normalized.
fn convolve(samples: &[MotionSample], kernel: &[f64]) -> Vec<MotionSample> {
    let radius = (kernel.len() / 2) as isize;
    let n = samples.len() as isize;
    samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let i = i as isize;
            let mut x = 0.0;
            let mut y = 0.0;
            let mut weight = 0.0;
            for (k, w) in kernel.iter().enumerate() {
                let j = i + k as isize - radius;
                if j < 0 || j >= n {
                    continue;
                }
                let neighbour = &samples[j as usize];
                x += neighbour.x * w;
                y += neighbour.y * w;
                weight += w;
            }
            if weight > 0.0 {
                MotionSample::new(s.time, x / weight, y / weight)
            } else {
                *s
            }
        })
        .collect()
}

/// Gaussian smoothing with `smoothing_amount` in `[0, 100]`.
///
/// Radius is `max(1, floor(amount / 100 * 10))`, sigma is `radius / 3`.
/// Amounts `<= 0` or fewer than three samples return an unmodified copy.
pub fn smooth_motion(motion: &RecordedMotion, smoothing_amount: f64) -> RecordedMotion {
    if smoothing_amount.is_nan() || smoothing_amount <= 0.0 || motion.samples.len() < 3 {
        return motion.clone();
    }
    let amount = smoothing_amount.min(100.0);
    let radius = ((amount / 100.0 * MAX_GAUSSIAN_RADIUS).floor() as usize).max(1);
    let kernel = gaussian_kernel(radius);

    RecordedMotion {
        pin_id: motion.pin_id.clone(),
        samples: convolve(&motion.samples, &kernel),
        recording_speed: motion.recording_speed,
    }
}

/// Symmetric moving average over `window_size` samples (half-width
/// `window_size / 2`), clamped to the neighbours available at the edges.
pub fn smooth_motion_moving_average(motion: &RecordedMotion, window_size: usize) -> RecordedMotion {
    if window_size <= 1 || motion.samples.len() < 3 {
        return motion.clone();
    }
    let half = (window_size / 2).max(1);
    let kernel = vec![1.0; 2 * half + 1];

    RecordedMotion {
        pin_id: motion.pin_id.clone(),
        samples: convolve(&motion.samples, &kernel),
        recording_speed: motion.recording_speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motion(points: &[(f64, f64, f64)]) -> RecordedMotion {
        RecordedMotion::new(
            "pin",
            points.iter().map(|&(t, x, y)| MotionSample::new(t, x, y)).collect(),
        )
    }

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        for radius in 1..=10 {
            let k = gaussian_kernel(radius);
            assert_eq!(k.len(), 2 * radius + 1);
            assert!((k.iter().sum::<f64>() - 1.0).abs() < 1e-12);
            assert!((k[0] - k[k.len() - 1]).abs() < 1e-15);
            assert!(k[radius] >= k[0]);
        }
    }

    #[test]
    fn short_motion_is_copied() {
        let m = motion(&[(0.0, 0.0, 0.0), (10.0, 50.0, 50.0)]);
        assert_eq!(smooth_motion(&m, 100.0), m);
        assert_eq!(smooth_motion_moving_average(&m, 5), m);
    }

    #[test]
    fn constant_signal_is_fixed_point() {
        let m = motion(&[(0.0, 3.0, 4.0), (1.0, 3.0, 4.0), (2.0, 3.0, 4.0), (3.0, 3.0, 4.0)]);
        let s = smooth_motion(&m, 60.0);
        for p in &s.samples {
            assert!((p.x - 3.0).abs() < 1e-12 && (p.y - 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn moving_average_clamps_at_edges() {
        let m = motion(&[(0.0, 0.0, 0.0), (1.0, 3.0, 0.0), (2.0, 6.0, 0.0), (3.0, 9.0, 0.0)]);
        let s = smooth_motion_moving_average(&m, 3);
        // Edge sample averages itself and its one neighbour.
        assert!((s.samples[0].x - 1.5).abs() < 1e-12);
        assert!((s.samples[1].x - 3.0).abs() < 1e-12);
        assert!((s.samples[3].x - 7.5).abs() < 1e-12);
        assert_eq!(s.samples[2].time, 2.0);
    }

    #[test]
    fn spike_is_attenuated() {
        let mut pts: Vec<(f64, f64, f64)> = (0..11).map(|i| (i as f64, 0.0, 0.0)).collect();
        pts[5].2 = 100.0;
        let s = smooth_motion(&motion(&pts), 50.0);
        assert!(s.samples[5].y < 100.0);
        assert!(s.samples[4].y > 0.0);
    }
}
