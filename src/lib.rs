//! Forest line-of-sight simulation.
//!
//! Scatters non-overlapping circular trees over a rectangle, drops two
//! observers into the gaps and checks whether they can see each other,
//! repeating the trial to estimate how often they can and how far apart
//! they stand when they do.

pub mod config;
pub mod error;
pub mod forest;
pub mod geometry;
pub mod observer;
pub mod prng;
pub mod sampler;
pub mod spatial;
pub mod stats;
pub mod trial;
pub mod visibility;

pub use config::{GridSpec, SimConfig, SimReport};
pub use error::SimError;

/// Validate `config`, run the batch and summarize it.
///
/// Fails with `SimError::Stats` when every trial was skipped.
pub fn simulate(config: &SimConfig) -> Result<SimReport, SimError> {
    config.validate()?;
    log::info!(
        "starting {} trials: density {}, radius {}, {}x{}",
        config.trials,
        config.density,
        config.radius,
        config.width,
        config.height
    );
    let batch = trial::run_batch(config);
    let summary = stats::summarize(&batch.results)?;
    log::info!("seen {:.3}% of {} trials", summary.seen_percent, summary.trials);
    Ok(SimReport {
        config: config.clone(),
        completed: batch.results.len(),
        skipped: batch.skipped,
        summary,
        notices: batch.notices.iter().map(ToString::to_string).collect(),
    })
}

/// Run a simulation from a JSON config and return the JSON report.
pub fn simulate_json(config_json: &str) -> Result<String, SimError> {
    let config: SimConfig = serde_json::from_str(config_json)?;
    let report = simulate(&config)?;
    Ok(serde_json::to_string(&report)?)
}
