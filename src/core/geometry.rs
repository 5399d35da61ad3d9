//! Time-of-impact queries under uniform straight-line motion.
//!
//! These functions never fail and never mutate. "No collision under current
//! motion" is reported as `f64::INFINITY`; the engine decides what to do with it.

use crate::core::ball::{Ball, DIM};
use crate::core::event::{Axis, Wall};

/// Earliest wall contact for `ball` inside a square container of side `size`.
///
/// Returns the wall and the time until the disc touches it. Ties between the
/// two axes go to X. Only an exactly zero component means "never" on that
/// axis; if the ball is at rest the time is infinite and the returned wall is
/// meaningless.
pub fn wall_time(ball: &Ball, size: f64) -> (Wall, f64) {
    let mut best_t = f64::INFINITY;
    let mut best_wall = Wall::new(Axis::X, false);

    for axis in [Axis::X, Axis::Y] {
        let k = axis.index();
        let (x, v) = (ball.r[k], ball.v[k]);
        let candidate = if v > 0.0 {
            // x + v t = size - radius
            Some(((size - ball.radius - x) / v, true))
        } else if v < 0.0 {
            // x + v t = radius
            Some(((x - ball.radius) / v.abs(), false))
        } else {
            None
        };
        if let Some((t, is_max)) = candidate {
            if t < best_t {
                best_t = t;
                best_wall = Wall::new(axis, is_max);
            }
        }
    }

    (best_wall, best_t)
}

/// Time until two equal-radius balls are exactly `2 * radius` apart while approaching.
///
/// Uses the radius of `a`. Returns the earlier quadratic root, or infinity when
/// the pair is receding, has identical velocities, or the paths pass wide.
/// Slow approaches are not cut off: any non-zero relative velocity counts.
pub fn pair_time(a: &Ball, b: &Ball) -> f64 {
    let mut dl = [0.0_f64; DIM];
    let mut dv = [0.0_f64; DIM];
    for (k, dv_k) in dv.iter_mut().enumerate() {
        dl[k] = b.r[k] - a.r[k];
        *dv_k = b.v[k] - a.v[k];
    }
    let dv_sq = dot(&dv, &dv);
    if dv_sq == 0.0 {
        return f64::INFINITY;
    }
    let s = dot(&dv, &dl);
    if s >= 0.0 {
        return f64::INFINITY;
    }
    let sigma = 2.0 * a.radius;
    let disc = s * s - dv_sq * (dot(&dl, &dl) - sigma * sigma);
    if disc <= 0.0 {
        return f64::INFINITY;
    }
    -(s + disc.sqrt()) / dv_sq
}

#[inline]
pub(crate) fn dot(a: &[f64; DIM], b: &[f64; DIM]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Squared distance between two ball centres.
#[inline]
pub(crate) fn distance_sq(a: &Ball, b: &Ball) -> f64 {
    let mut d = [0.0_f64; DIM];
    for ((dk, &bk), &ak) in d.iter_mut().zip(b.r.iter()).zip(a.r.iter()) {
        *dk = bk - ak;
    }
    dot(&d, &d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use approx::assert_relative_eq;

    #[test]
    fn wall_time_toward_min_wall() -> Result<()> {
        let b = Ball::new("b", [0.5, 0.2], [0.0, -1.0], 0.1)?;
        let (wall, t) = wall_time(&b, 1.0);
        assert_eq!(wall, Wall::new(Axis::Y, false));
        assert_relative_eq!(t, 0.1, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn wall_time_toward_max_wall_uses_size() -> Result<()> {
        let b = Ball::new("b", [2.0, 5.0], [2.0, 0.0], 0.5)?;
        let (wall, t) = wall_time(&b, 10.0);
        assert_eq!(wall, Wall::new(Axis::X, true));
        // 10 - 0.5 - 2 = 7.5 at speed 2
        assert_relative_eq!(t, 3.75, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn wall_time_picks_nearer_axis() -> Result<()> {
        let b = Ball::new("b", [0.5, 0.8], [0.1, 1.0], 0.1)?;
        let (wall, t) = wall_time(&b, 1.0);
        assert_eq!(wall, Wall::new(Axis::Y, true));
        assert_relative_eq!(t, 0.1, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn wall_time_tie_goes_to_x() -> Result<()> {
        let b = Ball::new("b", [0.25, 0.25], [-1.0, -1.0], 0.1)?;
        let (wall, t) = wall_time(&b, 1.0);
        assert_eq!(wall.axis, Axis::X);
        assert_relative_eq!(t, 0.15, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn wall_time_at_rest_is_infinite() -> Result<()> {
        let b = Ball::new("b", [0.5, 0.5], [0.0, 0.0], 0.1)?;
        assert!(wall_time(&b, 1.0).1.is_infinite());
        Ok(())
    }

    #[test]
    fn pair_time_head_on() -> Result<()> {
        // Distance 4.0, contact at 0.4, closing speed 2 => t = 1.8
        let a = Ball::new("a", [3.0, 5.0], [1.0, 0.0], 0.2)?;
        let b = Ball::new("b", [7.0, 5.0], [-1.0, 0.0], 0.2)?;
        assert_relative_eq!(pair_time(&a, &b), 1.8, epsilon = 1e-12);
        assert_relative_eq!(pair_time(&b, &a), 1.8, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn pair_time_already_touching_is_zero() -> Result<()> {
        let a = Ball::new("a", [0.4, 0.5], [1.0, 0.0], 0.1)?;
        let b = Ball::new("b", [0.6, 0.5], [-1.0, 0.0], 0.1)?;
        assert_relative_eq!(pair_time(&a, &b), 0.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn pair_time_receding_is_infinite() -> Result<()> {
        let a = Ball::new("a", [0.4, 0.5], [-1.0, 0.0], 0.1)?;
        let b = Ball::new("b", [0.6, 0.5], [1.0, 0.0], 0.1)?;
        assert!(pair_time(&a, &b).is_infinite());
        Ok(())
    }

    #[test]
    fn pair_time_same_velocity_is_infinite() -> Result<()> {
        let a = Ball::new("a", [0.2, 0.5], [1.0, 1.0], 0.1)?;
        let b = Ball::new("b", [0.6, 0.5], [1.0, 1.0], 0.1)?;
        assert!(pair_time(&a, &b).is_infinite());
        Ok(())
    }

    #[test]
    fn pair_time_slow_approach_is_finite() -> Result<()> {
        // Closing speed 5e-7 over a 0.2 gap
        let a = Ball::new("a", [0.3, 0.5], [2.5e-7, 0.0], 0.1)?;
        let b = Ball::new("b", [0.7, 0.5], [-2.5e-7, 0.0], 0.1)?;
        assert_relative_eq!(pair_time(&a, &b), 4.0e5, max_relative = 1e-9);
        Ok(())
    }

    #[test]
    fn wall_time_tiny_component_still_counts() -> Result<()> {
        let b = Ball::new("b", [0.9 - 1e-12, 0.5], [5e-13, 1e-4], 0.1)?;
        let (wall, t) = wall_time(&b, 1.0);
        assert_eq!(wall, Wall::new(Axis::X, true));
        assert!(t.is_finite() && t >= 0.0 && t < 4000.0);
        Ok(())
    }

    #[test]
    fn pair_time_near_miss_is_infinite() -> Result<()> {
        // Offset in y by more than 2r: paths never come within contact distance
        let a = Ball::new("a", [0.2, 0.3], [1.0, 0.0], 0.1)?;
        let b = Ball::new("b", [0.8, 0.6], [-1.0, 0.0], 0.1)?;
        assert!(pair_time(&a, &b).is_infinite());
        Ok(())
    }

    #[test]
    fn pair_time_glancing_contact() -> Result<()> {
        // y offset 0.1 with 2r = 0.2: contact when dx = sqrt(0.04 - 0.01)
        let a = Ball::new("a", [0.2, 0.5], [1.0, 0.0], 0.1)?;
        let b = Ball::new("b", [0.8, 0.6], [0.0, 0.0], 0.1)?;
        let expected = 0.6 - 0.03_f64.sqrt();
        assert_relative_eq!(pair_time(&a, &b), expected, epsilon = 1e-12);
        Ok(())
    }
}
