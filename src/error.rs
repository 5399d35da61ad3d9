use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// Geometry queries never fail; they report "no collision" as an infinite
/// time. Everything here is either a rejected input or a broken engine
/// invariant that stops the run.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Balls outside the container or overlapping when the simulation is built.
    #[error("invalid initial state: {0}")]
    InvalidInitialState(String),

    /// Coincident centres or a similar case where the collision normal is undefined.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The selected event lies in the past beyond rounding tolerance.
    #[error("negative event time {dt} selected for {event}")]
    NegativeTime { dt: f64, event: String },

    /// A ball crossed a wall or another ball after advancing.
    #[error("penetration at t={time}: {detail}")]
    Penetration { time: f64, detail: String },
}
