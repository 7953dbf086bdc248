//! Serde-backed race configuration and engine limits.

use serde::{Deserialize, Serialize};

use crate::automaton::{seed, GridShape, Race, RaceResult, SeedSpec, SimulationRun};
use crate::error::Result;

/// Limits and resources shared by every run of a race.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Safety cap on generations per run.
    pub max_generations: u32,
    /// Round limit for `Race::run_to_completion`.
    pub max_rounds: u32,
    /// Race worker threads. 0 lets rayon choose.
    pub worker_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_generations: 50,
            max_rounds: 1000,
            worker_threads: 0,
        }
    }
}

/// One named seed configuration in a race.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryConfig {
    pub name: String,
    pub seeds: Vec<SeedSpec>,
}

/// A complete race: one grid and rule, several competing seed tables.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RaceConfig {
    pub shape: Vec<usize>,
    pub threshold: u32,
    #[serde(default)]
    pub engine: EngineConfig,
    pub entries: Vec<EntryConfig>,
}

impl RaceConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate every entry and register it in a new race.
    ///
    /// Nothing is built unless all entries are valid.
    pub fn build(&self) -> Result<Race> {
        let shape = GridShape::new(&self.shape)?;
        let runs = self
            .entries
            .iter()
            .map(|entry| -> Result<(String, SimulationRun)> {
                let initial = seed::build(&entry.seeds, &shape)?;
                let run = SimulationRun::new(
                    shape,
                    self.threshold,
                    initial,
                    self.engine.max_generations,
                )?;
                Ok((entry.name.clone(), run))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut race = Race::new(self.engine.worker_threads)?;
        for (name, run) in runs {
            race.add(name, run);
        }
        Ok(race)
    }

    /// Build the race, play it out within `engine.max_rounds`, and rank it.
    pub fn run(&self) -> Result<RaceResult> {
        let mut race = self.build()?;
        race.run_to_completion(self.engine.max_rounds);
        Ok(race.rank())
    }
}
