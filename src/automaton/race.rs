//! Racing several independent runs in lockstep.
//!
//! Each round advances every still-running simulation once. Runners share no
//! state, so a round is a parallel map over the runner list on the race's
//! own rayon pool; collecting the results is the only barrier.

use rayon::prelude::*;
use serde::Serialize;

use super::grid::Cell;
use super::run::{RunStatus, SimulationRun};
use crate::error::Result;

struct Runner {
    name: String,
    run: SimulationRun,
}

/// What one runner did in one round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundOutcome {
    pub name: String,
    /// Cells added this round, or `None` if the runner was already finished
    /// before the round started.
    pub added: Option<Vec<Cell>>,
    pub status: RunStatus,
}

/// Final position of one finished runner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub name: String,
    pub generations: u32,
    pub status: RunStatus,
}

/// Finished runners, best first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RaceResult {
    pub standings: Vec<Standing>,
}

impl RaceResult {
    /// First place, if it saturated its grid.
    pub fn winner(&self) -> Option<&Standing> {
        self.standings
            .first()
            .filter(|s| s.status == RunStatus::Saturated)
    }

    /// Zero-based rank of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.standings.iter().position(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Standing> {
        self.standings.iter()
    }
}

/// An ordered set of named simulations advanced together.
pub struct Race {
    runners: Vec<Runner>,
    rounds: u32,
    pool: rayon::ThreadPool,
}

impl Race {
    /// Create an empty race with `worker_threads` workers (0 lets rayon
    /// pick). Falls back to a single worker if the pool cannot be built at
    /// the requested size.
    pub fn new(worker_threads: usize) -> Result<Self> {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(worker_threads)
            .build()
        {
            Ok(pool) => pool,
            Err(err) => {
                log::warn!("falling back to one race worker: {err}");
                rayon::ThreadPoolBuilder::new().num_threads(1).build()?
            }
        };

        Ok(Race {
            runners: Vec::new(),
            rounds: 0,
            pool,
        })
    }

    /// Register a runner. Registration order breaks ranking ties.
    pub fn add(&mut self, name: impl Into<String>, run: SimulationRun) {
        self.runners.push(Runner {
            name: name.into(),
            run,
        });
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// Rounds played so far.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn get(&self, name: &str) -> Option<&SimulationRun> {
        self.runners.iter().find(|r| r.name == name).map(|r| &r.run)
    }

    /// Runners in registration order.
    pub fn runs(&self) -> impl Iterator<Item = (&str, &SimulationRun)> {
        self.runners.iter().map(|r| (r.name.as_str(), &r.run))
    }

    pub fn all_terminal(&self) -> bool {
        self.runners.iter().all(|r| r.run.is_terminal())
    }

    /// Advance every running simulation by one generation.
    ///
    /// Outcomes come back in registration order.
    pub fn advance_all(&mut self) -> Vec<RoundOutcome> {
        let runners = &mut self.runners;
        let outcomes: Vec<RoundOutcome> = self.pool.install(|| {
            runners
                .par_iter_mut()
                .map(|runner| {
                    let added = if runner.run.is_terminal() {
                        None
                    } else {
                        runner.run.advance().ok().map(|step| step.added)
                    };
                    RoundOutcome {
                        name: runner.name.clone(),
                        added,
                        status: runner.run.status(),
                    }
                })
                .collect()
        });
        self.rounds += 1;
        outcomes
    }

    /// Play rounds until every runner is finished or `max_rounds` rounds
    /// have been played in this call. Returns the rounds played.
    pub fn run_to_completion(&mut self, max_rounds: u32) -> u32 {
        let mut played = 0;
        while !self.all_terminal() && played < max_rounds {
            self.advance_all();
            played += 1;
        }

        if self.all_terminal() {
            log::info!(
                "race of {} runners finished after {} rounds",
                self.runners.len(),
                self.rounds
            );
        } else {
            log::info!(
                "race stopped at round limit {max_rounds} with {} runners still going",
                self.runners.iter().filter(|r| !r.run.is_terminal()).count()
            );
        }
        played
    }

    /// Finished runners ranked by generations elapsed.
    ///
    /// Saturated runs come before every other terminal status regardless of
    /// generation count. Equal keys keep registration order.
    pub fn rank(&self) -> RaceResult {
        let mut standings: Vec<Standing> = self
            .runners
            .iter()
            .filter(|r| r.run.is_terminal())
            .map(|r| Standing {
                name: r.name.clone(),
                generations: r.run.generations_elapsed(),
                status: r.run.status(),
            })
            .collect();

        standings.sort_by_key(|s| (s.status != RunStatus::Saturated, s.generations));
        RaceResult { standings }
    }
}
