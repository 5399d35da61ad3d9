use crate::config::{HistoryMode, SimConfig};
use crate::core::ball::DIM;
use crate::core::geometry::{distance_sq, dot, pair_time, wall_time};
use crate::core::history::ModelData;
use crate::core::resolve::{collide_pair, pair_mut, reflect_wall};
use crate::core::{Ball, CollisionEvent};
use crate::error::{Error, Result};
use tracing::{debug, info, trace, warn};

/// Tolerance for boundary, overlap and past-event checks.
pub const EPS_GEOM: f64 = 1e-9;

/// Event-driven simulation of equal-radius elastic balls in a square box `[0, size]^2`.
///
/// The simulation owns its balls. Each step finds the earliest wall or pair
/// collision, drifts every ball to that instant and resolves the collision.
#[derive(Debug)]
pub struct Simulation {
    time_now: f64,
    size: f64,
    radius: f64,
    balls: Vec<Ball>,
    events_processed: u64,
    history_mode: HistoryMode,
    history: ModelData,
    samples_taken: u64,
}

impl Simulation {
    /// Create a simulation from an explicit layout in a container of side `size`.
    ///
    /// The shared radius is taken from the first ball. History recording is off.
    ///
    /// Errors:
    /// - `Error::InvalidParam` for an empty layout or a bad `size`.
    /// - `Error::InvalidInitialState` if radii differ, a ball sticks out of the
    ///   container, or two balls overlap.
    pub fn new(balls: Vec<Ball>, size: f64) -> Result<Self> {
        let radius = balls
            .first()
            .map(|b| b.radius)
            .ok_or_else(|| Error::InvalidParam("at least one ball is required".into()))?;
        let config = SimConfig {
            size,
            radius,
            history: HistoryMode::Off,
        };
        Self::with_config(balls, &config)
    }

    /// Create a simulation using container size, radius and history mode from `config`.
    pub fn with_config(balls: Vec<Ball>, config: &SimConfig) -> Result<Self> {
        config.validate()?;
        if balls.is_empty() {
            return Err(Error::InvalidParam("at least one ball is required".into()));
        }
        validate_layout(&balls, config.size, config.radius)?;

        let mut sim = Self {
            time_now: 0.0,
            size: config.size,
            radius: config.radius,
            balls,
            events_processed: 0,
            history_mode: config.history,
            history: ModelData::new(),
            samples_taken: 0,
        };
        match sim.history_mode {
            HistoryMode::Off => {}
            HistoryMode::PerEvent => sim.history.push(&sim.balls, sim.time_now),
            HistoryMode::Uniform { .. } => sim.record_samples_until(sim.time_now),
        }
        Ok(sim)
    }

    /// Returns elapsed simulated time.
    pub fn time(&self) -> f64 {
        self.time_now
    }

    /// Container side length.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Shared ball radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of balls.
    pub fn num_balls(&self) -> usize {
        self.balls.len()
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    /// Total number of collisions resolved so far.
    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Positions as a Vec of fixed-size arrays.
    pub fn positions(&self) -> Vec<[f64; DIM]> {
        self.balls.iter().map(|b| b.r).collect()
    }

    /// Velocities as a Vec of fixed-size arrays.
    pub fn velocities(&self) -> Vec<[f64; DIM]> {
        self.balls.iter().map(|b| b.v).collect()
    }

    /// Replace all velocities between runs.
    ///
    /// Errors: `Error::InvalidParam` on a length mismatch or non-finite values;
    /// no ball is modified in that case.
    pub fn set_velocities(&mut self, velocities: &[[f64; DIM]]) -> Result<()> {
        if velocities.len() != self.balls.len() {
            return Err(Error::InvalidParam(format!(
                "expected {} velocities, got {}",
                self.balls.len(),
                velocities.len()
            )));
        }
        if !velocities.iter().flatten().all(|c| c.is_finite()) {
            return Err(Error::InvalidParam("velocity values must be finite".into()));
        }
        for (b, &v) in self.balls.iter_mut().zip(velocities) {
            b.v = v;
        }
        Ok(())
    }

    /// Total kinetic energy with unit masses (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.balls.iter().map(|b| b.kinetic_energy()).sum()
    }

    /// Total momentum with unit masses (diagnostic).
    pub fn momentum(&self) -> [f64; DIM] {
        let mut p = [0.0_f64; DIM];
        for b in &self.balls {
            for (pk, &vk) in p.iter_mut().zip(b.v.iter()) {
                *pk += vk;
            }
        }
        p
    }

    /// Recorded snapshots (empty when history is off).
    pub fn history(&self) -> &ModelData {
        &self.history
    }

    /// Move the recorded snapshots out, leaving an empty store behind.
    pub fn take_history(&mut self) -> ModelData {
        std::mem::take(&mut self.history)
    }

    /// Every candidate event under current motion: all pairs (i < j) first,
    /// then one wall event per ball.
    pub fn candidate_events(&self) -> Result<Vec<CollisionEvent>> {
        let n = self.balls.len();
        let mut events = Vec::with_capacity(n * (n + 1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                let dt = pair_time(&self.balls[i], &self.balls[j]);
                events.push(CollisionEvent::balls(i, j, dt)?);
            }
        }
        for (i, ball) in self.balls.iter().enumerate() {
            let (wall, dt) = wall_time(ball, self.size);
            events.push(CollisionEvent::wall(i, wall, dt)?);
        }
        Ok(events)
    }

    /// The earliest upcoming event, or `None` if nothing will ever happen.
    pub fn next_event(&self) -> Result<Option<CollisionEvent>> {
        let next = self.candidate_events()?.into_iter().min();
        Ok(next.filter(|ev| !ev.is_never()))
    }

    /// Process exactly one collision.
    ///
    /// Returns the resolved event with its (non-negative) time step, or `None`
    /// when every ball is at rest relative to everything, in which case no
    /// state changes.
    ///
    /// Errors: `Error::NegativeTime` if the earliest event lies in the past,
    /// `Error::Penetration` if advancing broke the no-overlap invariant, and
    /// `Error::DegenerateGeometry` for coincident centres.
    pub fn step(&mut self) -> Result<Option<CollisionEvent>> {
        let Some(event) = self.next_event()? else {
            return Ok(None);
        };

        let raw_dt = event.dt();
        // Rounding can push a contact slightly into the past; the overlap it
        // implies must stay within EPS_GEOM
        if raw_dt < 0.0 && -raw_dt * self.closing_speed(&event) > EPS_GEOM {
            return Err(Error::NegativeTime {
                dt: raw_dt,
                event: event.to_string(),
            });
        }
        let event = if raw_dt < 0.0 {
            event.with_dt(0.0)?
        } else {
            event
        };
        let dt = event.dt();

        self.record_samples_until(self.time_now + dt);
        self.drift_all(dt);
        self.check_invariants()?;

        match event {
            CollisionEvent::Wall { ball, wall, .. } => {
                reflect_wall(&mut self.balls[ball], wall.axis);
            }
            CollisionEvent::Balls { ball_1, ball_2, .. } => {
                let (a, b) = pair_mut(&mut self.balls, ball_1, ball_2)?;
                collide_pair(a, b)?;
            }
        }

        self.events_processed += 1;
        if self.history_mode == HistoryMode::PerEvent {
            self.history.push(&self.balls, self.time_now);
        }

        trace!(time = self.time_now, %event, "resolved collision");
        if self.events_processed % 10 == 0 {
            debug!(
                step = self.events_processed,
                time = self.time_now,
                %event,
                "collision"
            );
        }
        Ok(Some(event))
    }

    /// Process up to `event_count` collisions.
    ///
    /// Returns how many were processed; fewer than requested only if the
    /// system became static.
    pub fn run(&mut self, event_count: usize) -> Result<usize> {
        self.run_with(event_count, |_, _, _| {})
    }

    /// Like [`run`](Self::run), calling `sink(event, time, balls)` after each
    /// resolved collision with the post-collision state.
    pub fn run_with<F>(&mut self, event_count: usize, mut sink: F) -> Result<usize>
    where
        F: FnMut(&CollisionEvent, f64, &[Ball]),
    {
        info!(
            event_count,
            balls = self.balls.len(),
            time = self.time_now,
            "starting run"
        );
        let mut done = 0usize;
        while done < event_count {
            let Some(event) = self.step()? else {
                warn!(
                    remaining = event_count - done,
                    time = self.time_now,
                    "no future collisions; system is static"
                );
                break;
            };
            done += 1;
            sink(&event, self.time_now, &self.balls);
        }
        info!(processed = done, time = self.time_now, "run finished");
        Ok(done)
    }

    /// Verify that every ball lies inside the container and no two balls overlap,
    /// within `EPS_GEOM`.
    pub fn check_invariants(&self) -> Result<()> {
        let (lo, hi) = (self.radius - EPS_GEOM, self.size - self.radius + EPS_GEOM);
        for b in &self.balls {
            if b.r.iter().any(|&c| c < lo || c > hi) {
                return Err(Error::Penetration {
                    time: self.time_now,
                    detail: format!("{b} is outside the container"),
                });
            }
        }
        let min_dist = 2.0 * self.radius - EPS_GEOM;
        for (i, a) in self.balls.iter().enumerate() {
            for b in &self.balls[i + 1..] {
                if distance_sq(a, b) < min_dist * min_dist {
                    return Err(Error::Penetration {
                        time: self.time_now,
                        detail: format!("{a} overlaps {b}"),
                    });
                }
            }
        }
        Ok(())
    }

    // ============ Internal helpers ============

    /// Speed at which the participants of `event` approach each other
    /// along the contact normal.
    fn closing_speed(&self, event: &CollisionEvent) -> f64 {
        match *event {
            CollisionEvent::Wall { ball, wall, .. } => self.balls[ball].v[wall.axis.index()].abs(),
            CollisionEvent::Balls { ball_1, ball_2, .. } => {
                let (a, b) = (&self.balls[ball_1], &self.balls[ball_2]);
                let mut dv = [0.0_f64; DIM];
                for ((dk, &vb), &va) in dv.iter_mut().zip(b.v.iter()).zip(a.v.iter()) {
                    *dk = vb - va;
                }
                dot(&dv, &dv).sqrt()
            }
        }
    }

    fn drift_all(&mut self, dt: f64) {
        for b in &mut self.balls {
            b.advance(dt);
        }
        self.time_now += dt;
    }

    /// Store uniform-interval snapshots falling in `[.., t_end]`, interpolated
    /// from the current (pre-drift) state.
    fn record_samples_until(&mut self, t_end: f64) {
        let HistoryMode::Uniform { interval } = self.history_mode else {
            return;
        };
        loop {
            let t_sample = self.samples_taken as f64 * interval;
            if t_sample > t_end {
                break;
            }
            let lag = t_sample - self.time_now;
            let snapshot: Vec<Ball> = self
                .balls
                .iter()
                .cloned()
                .map(|mut b| {
                    b.advance(lag);
                    b
                })
                .collect();
            self.history.push(&snapshot, t_sample);
            self.samples_taken += 1;
        }
    }
}

fn validate_layout(balls: &[Ball], size: f64, radius: f64) -> Result<()> {
    for b in balls {
        if (b.radius - radius).abs() > EPS_GEOM {
            return Err(Error::InvalidInitialState(format!(
                "{} has radius {}, expected shared radius {}",
                b.name, b.radius, radius
            )));
        }
        if b.r.iter().any(|&c| c < radius - EPS_GEOM || c > size - radius + EPS_GEOM) {
            return Err(Error::InvalidInitialState(format!(
                "{b} is not fully inside the container of size {size}"
            )));
        }
    }
    let min_dist = 2.0 * radius - EPS_GEOM;
    for (i, a) in balls.iter().enumerate() {
        for b in &balls[i + 1..] {
            if distance_sq(a, b) < min_dist * min_dist {
                return Err(Error::InvalidInitialState(format!(
                    "{} and {} overlap",
                    a.name, b.name
                )));
            }
        }
    }
    Ok(())
}
