//! Velocity updates applied at the instant of a collision.

use crate::core::ball::{Ball, DIM};
use crate::core::event::Axis;
use crate::core::geometry::dot;
use crate::error::{Error, Result};

/// Centre separations at or below this have no usable normal.
const EPS_NORMAL: f64 = 1e-12;

/// Specular reflection off a wall on `axis`: flip the normal velocity component.
#[inline]
pub fn reflect_wall(ball: &mut Ball, axis: Axis) {
    let k = axis.index();
    ball.v[k] = -ball.v[k];
}

/// Elastic equal-mass collision between two touching balls.
///
/// Exchanges the velocity components along the line of centres and leaves
/// tangential components unchanged.
///
/// Errors: `Error::DegenerateGeometry` if the centres coincide.
pub fn collide_pair(a: &mut Ball, b: &mut Ball) -> Result<()> {
    // Unit normal from a -> b
    let mut n = [0.0_f64; DIM];
    for ((nk, &bk), &ak) in n.iter_mut().zip(b.r.iter()).zip(a.r.iter()) {
        *nk = bk - ak;
    }
    let dist = dot(&n, &n).sqrt();
    if dist <= EPS_NORMAL {
        return Err(Error::DegenerateGeometry(format!(
            "coincident centres for {} and {}",
            a.name, b.name
        )));
    }
    for nk in &mut n {
        *nk /= dist;
    }

    let mut u = [0.0_f64; DIM];
    for ((uk, &vb), &va) in u.iter_mut().zip(b.v.iter()).zip(a.v.iter()) {
        *uk = vb - va;
    }
    let u_n = dot(&u, &n);

    for (k, &nk) in n.iter().enumerate() {
        a.v[k] += u_n * nk;
        b.v[k] -= u_n * nk;
    }
    Ok(())
}

/// Mutable references to two distinct elements of `balls`.
pub(crate) fn pair_mut(balls: &mut [Ball], i: usize, j: usize) -> Result<(&mut Ball, &mut Ball)> {
    if i == j || i >= balls.len() || j >= balls.len() {
        return Err(Error::InvalidParam(format!(
            "invalid ball pair ({i}, {j}) for {} balls",
            balls.len()
        )));
    }
    if i < j {
        let (lo, hi) = balls.split_at_mut(j);
        Ok((&mut lo[i], &mut hi[0]))
    } else {
        let (lo, hi) = balls.split_at_mut(i);
        Ok((&mut hi[0], &mut lo[j]))
    }
}
