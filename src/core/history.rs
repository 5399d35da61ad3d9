//! Snapshot storage for later inspection or plotting.

use crate::core::ball::Ball;

/// All balls at one instant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelState {
    pub balls: Vec<Ball>,
    pub time: f64,
}

/// Ordered sequence of snapshots with per-ball series accessors.
///
/// Accessors take a ball index; indices past the number of balls yield an
/// empty series.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelData {
    pub model_states: Vec<ModelState>,
}

impl ModelData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, balls: &[Ball], time: f64) {
        self.model_states.push(ModelState {
            balls: balls.to_vec(),
            time,
        });
    }

    pub fn len(&self) -> usize {
        self.model_states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model_states.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.model_states.iter().map(|s| s.time).collect()
    }

    pub fn x(&self, ball: usize) -> Vec<f64> {
        self.series(ball, Ball::x)
    }

    pub fn y(&self, ball: usize) -> Vec<f64> {
        self.series(ball, Ball::y)
    }

    pub fn vx(&self, ball: usize) -> Vec<f64> {
        self.series(ball, Ball::vx)
    }

    pub fn vy(&self, ball: usize) -> Vec<f64> {
        self.series(ball, Ball::vy)
    }

    pub fn speed(&self, ball: usize) -> Vec<f64> {
        self.series(ball, Ball::speed)
    }

    fn series(&self, ball: usize, f: impl Fn(&Ball) -> f64) -> Vec<f64> {
        self.model_states
            .iter()
            .filter_map(|s| s.balls.get(ball).map(&f))
            .collect()
    }
}
