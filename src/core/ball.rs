use crate::error::{Error, Result};

/// Fixed spatial dimension (2D).
pub const DIM: usize = 2;

/// A hard disc moving in a straight line between collisions.
///
/// Fields:
/// - `name`: label used in logs and history
/// - `r`: centre position [x, y]
/// - `v`: velocity [vx, vy]
/// - `radius`: disc radius (> 0), constant for the lifetime of a simulation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ball {
    /// Human-readable label.
    pub name: String,
    /// Position (x, y).
    pub r: [f64; DIM],
    /// Velocity (vx, vy).
    pub v: [f64; DIM],
    /// Disc radius (> 0).
    pub radius: f64,
}

impl Ball {
    /// Create a new ball after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` is non-positive or any component is NaN/inf.
    pub fn new(name: impl Into<String>, r: [f64; DIM], v: [f64; DIM], radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            name: name.into(),
            r,
            v,
            radius,
        })
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.r[0]
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.r[1]
    }

    #[inline]
    pub fn vx(&self) -> f64 {
        self.v[0]
    }

    #[inline]
    pub fn vy(&self) -> f64 {
        self.v[1]
    }

    /// Squared speed |v|^2.
    #[inline]
    pub fn speed_squared(&self) -> f64 {
        self.v.iter().map(|&c| c * c).sum()
    }

    /// Speed |v|.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed_squared().sqrt()
    }

    /// Kinetic energy with unit mass: 1/2 |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.speed_squared()
    }

    /// Move the centre along the current velocity for `dt`.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        for (rk, &vk) in self.r.iter_mut().zip(self.v.iter()) {
            *rk += vk * dt;
        }
    }

    /// Set velocity (validated as finite).
    pub fn set_velocity(&mut self, v: [f64; DIM]) -> Result<()> {
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        self.v = v;
        Ok(())
    }
}

impl std::fmt::Display for Ball {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(x={}, y={}, vx={}, vy={}, radius={})",
            self.name, self.r[0], self.r[1], self.v[0], self.v[1], self.radius
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ball_ok() -> Result<()> {
        let b = Ball::new("b", [0.25, 0.75], [1.0, -1.0], 0.1)?;
        assert_eq!(b.name, "b");
        assert_eq!(b.x(), 0.25);
        assert_eq!(b.y(), 0.75);
        assert_eq!(b.vx(), 1.0);
        assert_eq!(b.vy(), -1.0);
        assert_eq!(b.radius, 0.1);
        Ok(())
    }

    #[test]
    fn invalid_radius_rejected() {
        let err = Ball::new("b", [0.5, 0.5], [0.0, 0.0], 0.0).unwrap_err();
        assert!(err.to_string().contains("radius"));
    }

    #[test]
    fn non_finite_velocity_rejected() {
        let err = Ball::new("b", [0.5, 0.5], [f64::NAN, 0.0], 0.1).unwrap_err();
        assert!(err.to_string().contains("velocity"));
    }

    #[test]
    fn speed_and_energy() -> Result<()> {
        // v = (3,4), |v| = 5, KE = 12.5
        let b = Ball::new("b", [0.0, 0.0], [3.0, 4.0], 1.0)?;
        assert!((b.speed() - 5.0).abs() < 1e-12);
        assert!((b.kinetic_energy() - 12.5).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn advance_moves_along_velocity() -> Result<()> {
        let mut b = Ball::new("b", [0.5, 0.5], [1.0, -2.0], 0.1)?;
        b.advance(0.1);
        assert!((b.x() - 0.6).abs() < 1e-12);
        assert!((b.y() - 0.3).abs() < 1e-12);
        assert_eq!(b.v, [1.0, -2.0]);
        Ok(())
    }

    #[test]
    fn display_includes_name_and_state() -> Result<()> {
        let b = Ball::new("ball1", [0.25, 0.25], [1.0, 1.0], 0.1)?;
        let s = b.to_string();
        assert!(s.starts_with("ball1("));
        assert!(s.contains("radius=0.1"));
        Ok(())
    }
}
