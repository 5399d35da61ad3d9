//! Run configuration.

use crate::error::{Error, Result};

/// What the engine records into its [`ModelData`](crate::core::ModelData).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HistoryMode {
    /// Record nothing.
    #[default]
    Off,
    /// Initial state, then one snapshot right after every resolved event.
    PerEvent,
    /// Snapshots at `0, interval, 2*interval, ...`, interpolated along free flight.
    Uniform { interval: f64 },
}

/// Container and ball parameters for a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Side length of the square container.
    pub size: f64,
    /// Shared ball radius used by the built-in layouts.
    pub radius: f64,
    /// History recording.
    pub history: HistoryMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            size: 1.0,
            radius: 0.1,
            history: HistoryMode::Off,
        }
    }
}

impl SimConfig {
    /// Check parameter ranges.
    ///
    /// Errors: `Error::InvalidParam` for non-finite or non-positive size or
    /// radius, a container narrower than one ball, or a non-positive interval.
    pub fn validate(&self) -> Result<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(Error::InvalidParam("size must be finite and > 0".into()));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if self.size < 2.0 * self.radius {
            return Err(Error::InvalidParam(
                "size must be at least 2 * radius".into(),
            ));
        }
        if let HistoryMode::Uniform { interval } = self.history {
            if !interval.is_finite() || interval <= 0.0 {
                return Err(Error::InvalidParam(
                    "history interval must be finite and > 0".into(),
                ));
            }
        }
        Ok(())
    }
}
