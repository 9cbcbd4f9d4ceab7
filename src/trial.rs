//! Trial driver: one trial is forest, two observers, one sight check.
//! A batch repeats it with an independent random stream per trial.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::PlacementError;
use crate::forest::{generate_forest, Forest};
use crate::geometry::{distance, Circle};
use crate::observer::place_observer;
use crate::prng::{Pcg32, RandomSource};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub visible: bool,
    pub distance: f64,
}

/// Everything one trial produced, for callers that want to draw it.
#[derive(Debug, Clone)]
pub struct Trial {
    pub forest: Forest,
    pub observers: [Circle; 2],
    pub visible: bool,
    pub distance: f64,
}

impl Trial {
    pub fn result(&self) -> TrialResult {
        TrialResult {
            visible: self.visible,
            distance: self.distance,
        }
    }
}

/// Informational events of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    ForestHalted {
        placed: usize,
        requested_density: f64,
        achieved_density: f64,
    },
    TrialSkipped {
        error: PlacementError,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ForestHalted {
                placed,
                requested_density,
                achieved_density,
            } => write!(
                f,
                "Halting forest generation after {} trees. Actual density: {:.2}% (requested {:.2}%)",
                placed,
                achieved_density * 100.0,
                requested_density * 100.0
            ),
            Notice::TrialSkipped { error } => {
                write!(f, "{}. Unable to place person, skipping this trial.", error)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrialNotice {
    pub trial: usize,
    pub notice: Notice,
}

impl fmt::Display for TrialNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trial {}: {}", self.trial, self.notice)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Completed trials in trial order.
    pub results: Vec<TrialResult>,
    pub skipped: usize,
    /// Notices ordered by trial index.
    pub notices: Vec<TrialNotice>,
}

/// Run one trial. Forest exhaustion degrades to a partial forest;
/// observer exhaustion is returned to the caller.
pub fn run_trial<R>(config: &SimConfig, rng: &mut R) -> Result<Trial, PlacementError>
where
    R: RandomSource + ?Sized,
{
    let forest = generate_forest(rng, &config.forest_params());
    place_observers(config, forest, rng)
}

/// Second half of a trial: drop both observers into `forest` and check
/// whether they see each other. The forest is consumed either way.
pub fn place_observers<R>(
    config: &SimConfig,
    forest: Forest,
    rng: &mut R,
) -> Result<Trial, PlacementError>
where
    R: RandomSource + ?Sized,
{
    let a = place_observer(rng, &forest, config.observer_radius, config.max_attempts)?;
    let b = place_observer(rng, &forest, config.observer_radius, config.max_attempts)?;
    let visible = forest.can_see(&a, &b);
    Ok(Trial {
        distance: distance(a.center(), b.center()),
        observers: [a, b],
        visible,
        forest,
    })
}

fn halt_notice(index: usize, forest: &Forest) -> Option<TrialNotice> {
    forest.halted().map(|e| {
        let notice = TrialNotice {
            trial: index,
            notice: Notice::ForestHalted {
                placed: forest.len(),
                requested_density: forest.requested_density(),
                achieved_density: forest.achieved_density(),
            },
        };
        log::info!("trial {}: {}", index, e);
        log::info!("{}", notice);
        notice
    })
}

/// Outcome of trial `index`, with the notices it raised. The forest
/// halt is reported before observers are placed, so it survives a skip.
fn run_indexed(config: &SimConfig, index: usize) -> (Option<TrialResult>, Vec<TrialNotice>) {
    let mut rng = Pcg32::for_trial(config.seed, index);
    let forest = generate_forest(&mut rng, &config.forest_params());
    let mut notices: Vec<TrialNotice> = halt_notice(index, &forest).into_iter().collect();

    match place_observers(config, forest, &mut rng) {
        Ok(trial) => {
            log::debug!(
                "trial {}: {} trees, visible={}, distance={:.2}",
                index,
                trial.forest.len(),
                trial.visible,
                trial.distance
            );
            (Some(trial.result()), notices)
        }
        Err(error) => {
            let notice = TrialNotice {
                trial: index,
                notice: Notice::TrialSkipped { error },
            };
            log::warn!("{}", notice);
            notices.push(notice);
            (None, notices)
        }
    }
}

/// Run `config.trials` independent trials. Skipped trials contribute
/// nothing to `results`; the batch itself never fails.
pub fn run_batch(config: &SimConfig) -> BatchReport {
    let n = config.trials as usize;
    let outcomes: Vec<(Option<TrialResult>, Vec<TrialNotice>)> = if config.parallel {
        (0..n)
            .into_par_iter()
            .map(|i| run_indexed(config, i))
            .collect()
    } else {
        (0..n).map(|i| run_indexed(config, i)).collect()
    };

    let mut report = BatchReport::default();
    for (result, notices) in outcomes {
        match result {
            Some(r) => report.results.push(r),
            None => report.skipped += 1,
        }
        report.notices.extend(notices);
    }
    log::info!(
        "{} trials completed, {} skipped",
        report.results.len(),
        report.skipped
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSpec;
    use crate::geometry::overlaps;
    use crate::stats::summarize;

    fn small_config(density: f64, trials: u32) -> SimConfig {
        let mut c = SimConfig::new(density, 5.0, trials);
        c.width = 300.0;
        c.height = 200.0;
        c.seed = 42;
        c
    }

    #[test]
    fn single_trial_is_consistent() {
        let config = small_config(0.2, 1);
        let mut rng = Pcg32::new(1, 0);
        let trial = run_trial(&config, &mut rng).unwrap();
        let [a, b] = trial.observers;
        for o in &trial.observers {
            assert_eq!(o.r, 2.0);
            assert!(trial.forest.trees().iter().all(|t| !overlaps(o, t)));
        }
        assert_eq!(trial.distance, distance(a.center(), b.center()));
        assert_eq!(
            trial.visible,
            crate::visibility::can_see(&a, &b, trial.forest.trees())
        );
    }

    #[test]
    fn zero_density_always_visible() {
        let report = run_batch(&small_config(0.0, 50));
        assert_eq!(report.results.len(), 50);
        assert_eq!(report.skipped, 0);
        assert!(report.notices.is_empty());
        assert!(report.results.iter().all(|r| r.visible));
        assert_eq!(summarize(&report.results).unwrap().seen_percent, 100.0);
    }

    #[test]
    fn deterministic() {
        let config = small_config(0.25, 30);
        let r1 = run_batch(&config);
        let r2 = run_batch(&config);
        assert_eq!(r1.results, r2.results);
    }

    #[test]
    fn parallel_matches_serial() {
        let mut config = small_config(0.25, 40);
        let par = run_batch(&config);
        config.parallel = false;
        let ser = run_batch(&config);
        assert_eq!(par.results, ser.results);
        assert_eq!(par.notices, ser.notices);
    }

    #[test]
    fn grid_matches_linear_scan() {
        let mut config = small_config(0.3, 40);
        let plain = run_batch(&config);
        config.grid = Some(GridSpec { columns: 30, rows: 20 });
        let indexed = run_batch(&config);
        assert_eq!(plain.results, indexed.results);
    }

    #[test]
    fn different_seeds() {
        let mut config = small_config(0.25, 20);
        let r1 = run_batch(&config);
        config.seed = 43;
        let r2 = run_batch(&config);
        assert_ne!(r1.results, r2.results);
    }

    #[test]
    fn unplaceable_observers_skip_every_trial() {
        let mut config = small_config(0.1, 10);
        config.observer_radius = 1000.0;
        let report = run_batch(&config);
        assert!(report.results.is_empty());
        assert_eq!(report.skipped, 10);
        let skips: Vec<usize> = report
            .notices
            .iter()
            .filter(|n| matches!(n.notice, Notice::TrialSkipped { .. }))
            .map(|n| n.trial)
            .collect();
        assert_eq!(skips, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn infeasible_density_reports_halt_and_continues() {
        let mut config = SimConfig::new(0.95, 50.0, 5);
        config.seed = 3;
        let report = run_batch(&config);
        assert_eq!(report.results.len() + report.skipped, 5);
        let halts: Vec<&TrialNotice> = report
            .notices
            .iter()
            .filter(|n| matches!(n.notice, Notice::ForestHalted { .. }))
            .collect();
        assert_eq!(halts.len(), 5);
        for n in halts {
            if let Notice::ForestHalted {
                achieved_density,
                requested_density,
                ..
            } = n.notice
            {
                assert!(achieved_density < requested_density);
            }
        }
    }

    #[test]
    fn halt_is_reported_even_when_trial_is_skipped() {
        let mut config = SimConfig::new(0.95, 50.0, 3);
        config.seed = 3;
        config.observer_radius = 1000.0;
        let report = run_batch(&config);
        assert!(report.results.is_empty());
        assert_eq!(report.skipped, 3);
        for trial in 0..3 {
            let kinds: Vec<&Notice> = report
                .notices
                .iter()
                .filter(|n| n.trial == trial)
                .map(|n| &n.notice)
                .collect();
            assert_eq!(kinds.len(), 2, "trial {}", trial);
            assert!(matches!(kinds[0], Notice::ForestHalted { .. }));
            assert!(matches!(kinds[1], Notice::TrialSkipped { .. }));
        }
    }

    #[test]
    fn split_trial_matches_run_trial() {
        let config = small_config(0.3, 1);
        let mut rng_a = Pcg32::new(12, 0);
        let mut rng_b = Pcg32::new(12, 0);
        let whole = run_trial(&config, &mut rng_a).unwrap();
        let forest = generate_forest(&mut rng_b, &config.forest_params());
        let split = place_observers(&config, forest, &mut rng_b).unwrap();
        assert_eq!(whole.result(), split.result());
        assert_eq!(whole.observers, split.observers);
    }

    #[test]
    fn standard_parameters_neither_extreme() {
        // Seen pairs are rare at this density (about one in a hundred),
        // so the batch needs the full thousand trials.
        let mut config = SimConfig::new(0.3, 5.0, 1000);
        config.seed = 2024;
        config.grid = Some(GridSpec { columns: 80, rows: 60 });
        let report = run_batch(&config);
        assert!(report.results.len() >= 100);
        let s = summarize(&report.results).unwrap();
        assert!(s.seen_percent > 0.0 && s.seen_percent < 100.0);
    }

    #[test]
    fn notice_wording() {
        let n = Notice::ForestHalted {
            placed: 30,
            requested_density: 0.95,
            achieved_density: 0.4909,
        };
        assert_eq!(
            n.to_string(),
            "Halting forest generation after 30 trees. Actual density: 49.09% (requested 95.00%)"
        );
        let skip = TrialNotice {
            trial: 4,
            notice: Notice::TrialSkipped {
                error: PlacementError::Exhausted { attempts: 1000, radius: 2.0 },
            },
        };
        assert!(skip.to_string().starts_with("trial 4: Unable to place non-overlapping circle"));
        assert!(skip.to_string().ends_with("skipping this trial."));
    }
}
