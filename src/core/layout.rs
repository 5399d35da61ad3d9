//! Starting configurations.

use crate::core::ball::{Ball, DIM};
use crate::core::geometry::distance_sq;
use crate::error::{Error, Result};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

/// Four balls at the quadrant centres with unit diagonal velocities.
///
/// Named `ball1`..`ball4`; the lower-left ball heads up-right, and the others
/// are arranged so the initial momentum sums to zero.
pub fn quadrants(size: f64, radius: f64) -> Result<Vec<Ball>> {
    if !size.is_finite() || size <= 0.0 {
        return Err(Error::InvalidParam("size must be finite and > 0".into()));
    }
    let (lo, hi) = (0.25 * size, 0.75 * size);
    if radius > lo {
        return Err(Error::InvalidParam(
            "radius must not exceed a quarter of the container size".into(),
        ));
    }
    Ok(vec![
        Ball::new("ball1", [lo, lo], [1.0, 1.0], radius)?,
        Ball::new("ball2", [lo, hi], [-1.0, -1.0], radius)?,
        Ball::new("ball3", [hi, lo], [-1.0, 1.0], radius)?,
        Ball::new("ball4", [hi, hi], [1.0, -1.0], radius)?,
    ])
}

/// `num_balls` non-overlapping balls placed by rejection sampling.
///
/// Positions are uniform in `[radius, size - radius]`; velocity components
/// are uniform in `[-1, 1]`. A `seed` makes the layout reproducible.
pub fn random(num_balls: usize, size: f64, radius: f64, seed: Option<u64>) -> Result<Vec<Ball>> {
    if num_balls == 0 {
        return Err(Error::InvalidParam("num_balls must be > 0".into()));
    }
    if !size.is_finite() || size <= 0.0 {
        return Err(Error::InvalidParam("size must be finite and > 0".into()));
    }
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::InvalidParam("radius must be finite and > 0".into()));
    }
    if size < 2.0 * radius {
        return Err(Error::InvalidParam(
            "size must be at least 2 * radius".into(),
        ));
    }

    let mut rng: StdRng = match seed {
        Some(s) => SeedableRng::seed_from_u64(s),
        None => SeedableRng::seed_from_u64(rng().random()),
    };

    let mut balls: Vec<Ball> = Vec::with_capacity(num_balls);
    let max_attempts = 1_000_000usize;
    for id in 0..num_balls {
        let mut attempts = 0usize;
        let candidate = loop {
            if attempts >= max_attempts {
                return Err(Error::InvalidParam(format!(
                    "failed to place ball {} without overlap; try fewer balls or smaller radius",
                    id
                )));
            }
            attempts += 1;
            let mut r = [0.0_f64; DIM];
            for r_k in r.iter_mut() {
                *r_k = rng.random_range(radius..=size - radius);
            }
            let candidate = Ball::new(format!("ball{}", id + 1), r, [0.0; DIM], radius)?;
            if !overlaps_existing(&balls, &candidate) {
                break candidate;
            }
        };

        let mut v = [0.0_f64; DIM];
        v.iter_mut().for_each(|x| *x = rng.random_range(-1.0..=1.0));
        let mut ball = candidate;
        ball.set_velocity(v)?;
        balls.push(ball);
    }
    Ok(balls)
}

fn overlaps_existing(existing: &[Ball], candidate: &Ball) -> bool {
    let sigma = 2.0 * candidate.radius;
    existing
        .iter()
        .any(|b| distance_sq(b, candidate) < sigma * sigma)
}
