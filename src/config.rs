//! Run configuration and the serializable simulation report.
//!
//! Both derive Serialize + Deserialize so a run can go through the
//! JSON interchange format end to end.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::forest::ForestParams;
use crate::observer::OBSERVER_RADIUS;
use crate::sampler::DEFAULT_MAX_ATTEMPTS;
use crate::stats::Summary;

/// Upper bound on spatial index cells, whatever the rectangle size.
pub const MAX_GRID_CELLS: u64 = 1 << 22;

/// Cell counts of the optional spatial index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub columns: u32,
    pub rows: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub seed: u64,
    pub density: f64,
    pub radius: f64,
    pub trials: u32,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_observer_radius")]
    pub observer_radius: f64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridSpec>,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

fn default_observer_radius() -> f64 {
    OBSERVER_RADIUS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_parallel() -> bool {
    true
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

impl SimConfig {
    /// 800x600 rectangle, observer radius 2, 1000 attempts, seed 0.
    pub fn new(density: f64, radius: f64, trials: u32) -> Self {
        SimConfig {
            seed: 0,
            density,
            radius,
            trials,
            width: default_width(),
            height: default_height(),
            observer_radius: default_observer_radius(),
            max_attempts: default_max_attempts(),
            grid: None,
            parallel: default_parallel(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.density) {
            return Err(ConfigError::DensityOutOfRange { value: self.density });
        }
        check_positive("radius", self.radius)?;
        check_positive("width", self.width)?;
        check_positive("height", self.height)?;
        check_positive("observer_radius", self.observer_radius)?;
        if self.trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        if let Some(g) = self.grid {
            if g.columns == 0 || g.rows == 0 {
                return Err(ConfigError::EmptyGrid {
                    columns: g.columns,
                    rows: g.rows,
                });
            }
            // No more cells than unit squares of the rectangle.
            let area = (self.width * self.height).min(MAX_GRID_CELLS as f64) as u64;
            let max = area.max(1);
            if g.columns as u64 * g.rows as u64 > max {
                return Err(ConfigError::GridTooFine {
                    columns: g.columns,
                    rows: g.rows,
                    max,
                });
            }
        }
        Ok(())
    }

    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            density: self.density,
            radius: self.radius,
            width: self.width,
            height: self.height,
            max_attempts: self.max_attempts,
            grid: self.grid,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimReport {
    pub config: SimConfig,
    pub completed: usize,
    pub skipped: usize,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}
