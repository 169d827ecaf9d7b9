//! Interpolation helpers:
//! - cubic Bezier basis and derivative (scalar and `Animatable`)
//! - frame-axis inversion (Newton-Raphson with bisection fallback)

use crate::value::Animatable;

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 48;
const SOLVE_EPSILON: f64 = 1e-9;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Cubic Bezier basis: B(t) = (1-t)^3 p0 + 3(1-t)^2 t p1 + 3(1-t) t^2 p2 + t^3 p3
#[inline]
pub fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

#[inline]
pub fn cubic_bezier_derivative(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * (p1 - p0) + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (p3 - p2)
}

/// Cubic Bezier over any `Animatable` value.
pub fn cubic_bezier_value<T: Animatable>(p0: &T, p1: &T, p2: &T, p3: &T, t: f64) -> T {
    let u = 1.0 - t;
    p0.scale(u * u * u)
        .add(&p1.scale(3.0 * u * u * t))
        .add(&p2.scale(3.0 * u * t * t))
        .add(&p3.scale(t * t * t))
}

/// Find the curve parameter `t` whose x-coordinate equals `target`, for a cubic
/// with x-control points `x0..x3` that is monotone on `[0, 1]`.
pub fn solve_cubic_for_x(x0: f64, x1: f64, x2: f64, x3: f64, target: f64) -> f64 {
    let span = x3 - x0;
    if span.abs() <= f64::EPSILON {
        return 0.0;
    }
    let mut t = ((target - x0) / span).clamp(0.0, 1.0);

    for _ in 0..NEWTON_ITERATIONS {
        let err = cubic_bezier(x0, x1, x2, x3, t) - target;
        if err.abs() < SOLVE_EPSILON {
            return t;
        }
        let dx = cubic_bezier_derivative(x0, x1, x2, x3, t);
        if dx.abs() < 1e-12 {
            break;
        }
        t = (t - err / dx).clamp(0.0, 1.0);
    }

    // Bisection for flat regions where Newton stalls.
    let mut lo = 0.0;
    let mut hi = 1.0;
    t = ((target - x0) / span).clamp(0.0, 1.0);
    for _ in 0..BISECTION_ITERATIONS {
        let x = cubic_bezier(x0, x1, x2, x3, t);
        if (x - target).abs() < SOLVE_EPSILON {
            break;
        }
        if (x < target) == (span > 0.0) {
            lo = t;
        } else {
            hi = t;
        }
        t = 0.5 * (lo + hi);
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_hits_endpoints() {
        assert_eq!(cubic_bezier(1.0, 5.0, -3.0, 7.0, 0.0), 1.0);
        assert_eq!(cubic_bezier(1.0, 5.0, -3.0, 7.0, 1.0), 7.0);
    }

    #[test]
    fn solver_inverts_ease_curve() {
        // Strong ease: x control points bunched at the ends.
        let (x0, x1, x2, x3) = (0.0, 8.0, 2.0, 10.0);
        for target in [0.0, 1.0, 2.5, 5.0, 7.5, 9.9, 10.0] {
            let t = solve_cubic_for_x(x0, x1, x2, x3, target);
            let x = cubic_bezier(x0, x1, x2, x3, t);
            assert!((x - target).abs() < 1e-6, "target={target} x={x}");
        }
    }

    #[test]
    fn solver_handles_flat_start() {
        // Derivative is zero at t=0 when x1 == x0.
        let t = solve_cubic_for_x(0.0, 0.0, 10.0, 10.0, 0.01);
        assert!((cubic_bezier(0.0, 0.0, 10.0, 10.0, t) - 0.01).abs() < 1e-6);
    }
}
