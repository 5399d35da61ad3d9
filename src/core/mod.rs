//! Event-driven engine for elastic hard discs in a square container.
//!
//! Leaves first: [`ball`] holds kinematic state, [`geometry`] computes
//! time-of-impact, [`event`] names the candidate collisions, [`resolve`]
//! applies the velocity update and [`sim`] runs the event loop.

pub mod ball;
pub mod event;
pub mod geometry;
pub mod history;
pub mod layout;
pub mod resolve;
pub mod sim;

pub use ball::Ball;
pub use event::{Axis, CollisionEvent, Wall};
pub use history::{ModelData, ModelState};
pub use sim::Simulation;
