//! # ballsim
//!
//! Event-driven simulation of perfectly elastic, equal-radius discs in a
//! square container. Instead of fixed time steps the engine jumps straight
//! from one collision to the next.
//!
//! ```
//! use ballsim::core::{layout, Simulation};
//!
//! let balls = layout::quadrants(1.0, 0.1)?;
//! let mut sim = Simulation::new(balls, 1.0)?;
//! let processed = sim.run(100)?;
//! assert_eq!(processed, 100);
//! sim.check_invariants()?;
//! # Ok::<(), ballsim::error::Error>(())
//! ```
//!
//! Enable the `python` feature to build the `ballsim` extension module and
//! `serde` to (de)serialize configuration and snapshots.

pub mod config;
pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::config::{HistoryMode, SimConfig};
pub use crate::core::{Ball, CollisionEvent, Simulation};
pub use crate::error::{Error, Result};
