//! Simulation lifecycle: one grid advancing generation by generation.

use std::fmt;
use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use super::grid::{Cell, GridShape};
use super::infected::InfectedSet;
use super::seed::{self, SeedSpec};
use super::stepping::{newly_infected_indices, Threshold};
use crate::error::{EngineError, Result};

/// Where a run is in its lifecycle. Every status but `Running` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    /// A generation produced no new cells before the grid filled up.
    Fixpoint,
    /// Every cell is infected.
    Saturated,
    /// The generation cap was reached first.
    Capped,
}

impl RunStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != RunStatus::Running
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStatus::Running => "running",
            RunStatus::Fixpoint => "fixpoint",
            RunStatus::Saturated => "saturated",
            RunStatus::Capped => "capped",
        };
        f.write_str(name)
    }
}

/// Result of one `advance()` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Advance {
    /// Cells infected by this generation, in index order. Empty means no
    /// progress (the run just hit its fixpoint).
    pub added: Vec<Cell>,
    pub status: RunStatus,
}

/// One entry of a generation sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationEvent {
    pub generation: u32,
    pub added: Vec<Cell>,
    pub infected: InfectedSet,
    pub status: RunStatus,
}

/// The mutable state of a single simulation.
///
/// Owns its infected set outright; nothing else reads or writes it while
/// the run advances.
#[derive(Clone, Debug)]
pub struct SimulationRun {
    threshold: Threshold,
    infected: InfectedSet,
    generation: u32,
    max_generations: u32,
    status: RunStatus,
}

/// Check that `initial` was built for `shape`.
fn check_initial(shape: &GridShape, initial: &InfectedSet) -> Result<()> {
    let seeded = initial.shape();
    if seeded.dims() != shape.dims() {
        return Err(EngineError::InvalidDimension {
            expected: shape.dims(),
            actual: seeded.dims(),
        });
    }
    if seeded != shape {
        return Err(EngineError::InvalidShape(format!(
            "seed set is {seeded}, grid is {shape}"
        )));
    }
    Ok(())
}

impl SimulationRun {
    /// Start a run at generation 0.
    ///
    /// If `initial` already covers the grid the run is born `Saturated`.
    pub fn new(
        shape: GridShape,
        threshold: u32,
        initial: InfectedSet,
        max_generations: u32,
    ) -> Result<Self> {
        let threshold = Threshold::new(threshold)?;
        check_initial(&shape, &initial)?;
        Ok(Self::from_parts(threshold, initial, max_generations))
    }

    fn from_parts(threshold: Threshold, infected: InfectedSet, max_generations: u32) -> Self {
        let status = if infected.is_saturated() {
            RunStatus::Saturated
        } else {
            RunStatus::Running
        };
        SimulationRun {
            threshold,
            infected,
            generation: 0,
            max_generations,
            status,
        }
    }

    /// Compute and apply one generation.
    ///
    /// Fails with `AlreadyTerminal` once the run has finished; the state is
    /// left untouched in that case.
    pub fn advance(&mut self) -> Result<Advance> {
        if self.status.is_terminal() {
            return Err(EngineError::AlreadyTerminal(self.status));
        }

        let newly = newly_infected_indices(&self.infected, self.threshold);
        if newly.is_empty() {
            self.status = RunStatus::Fixpoint;
            log::debug!(
                "run on {} reached fixpoint after {} generations ({} cells)",
                self.infected.shape(),
                self.generation,
                self.infected.len()
            );
            return Ok(Advance {
                added: Vec::new(),
                status: self.status,
            });
        }

        for &i in &newly {
            self.infected.insert_index(i);
        }
        self.generation += 1;

        if self.infected.is_saturated() {
            self.status = RunStatus::Saturated;
            log::debug!(
                "run on {} saturated after {} generations",
                self.infected.shape(),
                self.generation
            );
        } else if self.generation >= self.max_generations {
            self.status = RunStatus::Capped;
            log::debug!(
                "run on {} capped at {} generations ({} cells)",
                self.infected.shape(),
                self.generation,
                self.infected.len()
            );
        }

        log::trace!(
            "generation {}: +{} cells, {} total",
            self.generation,
            newly.len(),
            self.infected.len()
        );

        let shape = *self.infected.shape();
        Ok(Advance {
            added: newly.into_iter().map(|i| shape.cell_at(i)).collect(),
            status: self.status,
        })
    }

    /// Advance until terminal, collecting one event per `advance()` call.
    pub fn advance_to_completion(&mut self) -> Vec<GenerationEvent> {
        let mut events = Vec::new();
        while let Ok(step) = self.advance() {
            events.push(self.event(step.added));
        }
        events
    }

    fn event(&self, added: Vec<Cell>) -> GenerationEvent {
        GenerationEvent {
            generation: self.generation,
            added,
            infected: self.infected.clone(),
            status: self.status,
        }
    }

    #[inline]
    pub fn generations_elapsed(&self) -> u32 {
        self.generation
    }

    #[inline]
    pub fn status(&self) -> RunStatus {
        self.status
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Read-only view of the current infected set.
    #[inline]
    pub fn snapshot(&self) -> &InfectedSet {
        &self.infected
    }

    #[inline]
    pub fn shape(&self) -> &GridShape {
        self.infected.shape()
    }

    #[inline]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    #[inline]
    pub fn max_generations(&self) -> u32 {
        self.max_generations
    }
}

/// A validated simulation definition that can be started any number of
/// times.
#[derive(Clone, Debug)]
pub struct Simulation {
    threshold: Threshold,
    initial: InfectedSet,
    max_generations: u32,
}

impl Simulation {
    /// Validate the grid, threshold and seeds up front.
    pub fn new(
        shape: GridShape,
        threshold: u32,
        seeds: &[SeedSpec],
        max_generations: u32,
    ) -> Result<Self> {
        let threshold = Threshold::new(threshold)?;
        let initial = seed::build(seeds, &shape)?;
        Ok(Simulation {
            threshold,
            initial,
            max_generations,
        })
    }

    /// Like [`new`](Self::new) but from an already built seed set.
    pub fn from_initial(
        shape: GridShape,
        threshold: u32,
        initial: InfectedSet,
        max_generations: u32,
    ) -> Result<Self> {
        let threshold = Threshold::new(threshold)?;
        check_initial(&shape, &initial)?;
        Ok(Simulation {
            threshold,
            initial,
            max_generations,
        })
    }

    /// A fresh run at generation 0.
    pub fn start(&self) -> SimulationRun {
        SimulationRun::from_parts(self.threshold, self.initial.clone(), self.max_generations)
    }

    /// Lazy generation sequence from the seed onward.
    ///
    /// Each call starts over from generation 0.
    pub fn generations(&self) -> Generations {
        Generations {
            run: self.start(),
            seeded: false,
            done: false,
        }
    }

    /// The whole history at once, seed event included.
    pub fn run_to_completion(&self) -> Vec<GenerationEvent> {
        self.generations().collect()
    }

    #[inline]
    pub fn initial(&self) -> &InfectedSet {
        &self.initial
    }

    #[inline]
    pub fn shape(&self) -> &GridShape {
        self.initial.shape()
    }

    #[inline]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    #[inline]
    pub fn max_generations(&self) -> u32 {
        self.max_generations
    }
}

/// Pull-based event sequence over one run.
///
/// The first event is generation 0 with the seed cells as `added`. Each
/// further event is one `advance()`; the sequence ends after the first
/// event whose status is terminal. A fixpoint event carries no added cells
/// and repeats the previous generation number.
pub struct Generations {
    run: SimulationRun,
    seeded: bool,
    done: bool,
}

impl Generations {
    /// The run driving this sequence.
    pub fn run(&self) -> &SimulationRun {
        &self.run
    }
}

impl Iterator for Generations {
    type Item = GenerationEvent;

    fn next(&mut self) -> Option<GenerationEvent> {
        if self.done {
            return None;
        }

        if !self.seeded {
            self.seeded = true;
            self.done = self.run.is_terminal();
            let added = self.run.snapshot().iter().collect();
            return Some(self.run.event(added));
        }

        match self.run.advance() {
            Ok(step) => {
                self.done = step.status.is_terminal();
                Some(self.run.event(step.added))
            }
            Err(_) => {
                self.done = true;
                None
            }
        }
    }
}

impl FusedIterator for Generations {}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal_run(n: usize, max_generations: u32) -> SimulationRun {
        let shape = GridShape::square(n).unwrap();
        let initial = seed::build(&[SeedSpec::diagonal(0, 0, n as u32)], &shape).unwrap();
        SimulationRun::new(shape, 2, initial, max_generations).unwrap()
    }

    #[test]
    fn test_new_run_starts_at_zero() {
        let run = diagonal_run(4, 50);
        assert_eq!(run.generations_elapsed(), 0);
        assert_eq!(run.status(), RunStatus::Running);
        assert_eq!(run.snapshot().len(), 4);
    }

    #[test]
    fn test_new_rejects_bad_input() {
        let shape = GridShape::square(4).unwrap();
        assert!(matches!(
            SimulationRun::new(shape, 0, InfectedSet::new(shape), 10),
            Err(EngineError::InvalidThreshold(0))
        ));

        let cube = GridShape::cube(4).unwrap();
        assert!(matches!(
            SimulationRun::new(shape, 2, InfectedSet::new(cube), 10),
            Err(EngineError::InvalidDimension {
                expected: 2,
                actual: 3
            })
        ));

        let other = GridShape::square(5).unwrap();
        assert!(matches!(
            SimulationRun::new(shape, 2, InfectedSet::new(other), 10),
            Err(EngineError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_born_saturated() {
        let shape = GridShape::square(3).unwrap();
        let full = InfectedSet::from_cells(shape, shape.cells()).unwrap();
        let mut run = SimulationRun::new(shape, 2, full, 10).unwrap();
        assert_eq!(run.status(), RunStatus::Saturated);
        assert!(matches!(
            run.advance(),
            Err(EngineError::AlreadyTerminal(RunStatus::Saturated))
        ));
        assert_eq!(run.generations_elapsed(), 0);
    }

    #[test]
    fn test_advance_generation_increments() {
        let mut run = diagonal_run(4, 50);
        let step = run.advance().unwrap();
        assert_eq!(run.generations_elapsed(), 1);
        assert_eq!(step.status, RunStatus::Running);
        // Both off-diagonals of a 4x4 grid fill in at once
        assert_eq!(step.added.len(), 6);
        assert_eq!(run.snapshot().len(), 10);
    }

    #[test]
    fn test_fixpoint_keeps_generation() {
        let shape = GridShape::square(5).unwrap();
        let initial = InfectedSet::from_cells(shape, [Cell::d2(0, 0), Cell::d2(0, 1)]).unwrap();
        let mut run = SimulationRun::new(shape, 2, initial, 50).unwrap();

        let step = run.advance().unwrap();
        assert!(step.added.is_empty());
        assert_eq!(step.status, RunStatus::Fixpoint);
        assert_eq!(run.generations_elapsed(), 0);
    }

    #[test]
    fn test_fixpoint_after_progress() {
        // The diagonal fills its 3x3 square; the last column only ever
        // touches one infected cell each.
        let shape = GridShape::new(&[3, 4]).unwrap();
        let initial = seed::build(&[SeedSpec::diagonal(0, 0, 3)], &shape).unwrap();
        let mut run = SimulationRun::new(shape, 2, initial, 50).unwrap();

        let events = run.advance_to_completion();
        assert_eq!(run.status(), RunStatus::Fixpoint);
        assert_eq!(run.generations_elapsed(), 2);
        assert_eq!(run.snapshot().len(), 9);
        assert_eq!(events.len(), 3);
        assert!(events[2].added.is_empty());
    }

    #[test]
    fn test_capped() {
        let mut run = diagonal_run(8, 3);
        run.advance_to_completion();
        assert_eq!(run.status(), RunStatus::Capped);
        assert_eq!(run.generations_elapsed(), 3);
        assert!(!run.snapshot().is_saturated());
    }

    #[test]
    fn test_saturation_beats_cap_on_same_generation() {
        let mut run = diagonal_run(8, 7);
        run.advance_to_completion();
        assert_eq!(run.status(), RunStatus::Saturated);
        assert_eq!(run.generations_elapsed(), 7);
    }

    #[test]
    fn test_advance_after_terminal_fails_without_mutation() {
        let mut run = diagonal_run(4, 50);
        run.advance_to_completion();
        let before = run.snapshot().clone();
        let generation = run.generations_elapsed();

        assert!(matches!(
            run.advance(),
            Err(EngineError::AlreadyTerminal(RunStatus::Saturated))
        ));
        assert_eq!(run.snapshot(), &before);
        assert_eq!(run.generations_elapsed(), generation);
    }

    #[test]
    fn test_generations_sequence_shape() {
        let shape = GridShape::square(4).unwrap();
        let sim = Simulation::new(shape, 2, &[SeedSpec::diagonal(0, 0, 4)], 50).unwrap();

        let events: Vec<GenerationEvent> = sim.generations().collect();
        assert_eq!(events.len(), 4);

        assert_eq!(events[0].generation, 0);
        assert_eq!(events[0].added.len(), 4);
        assert_eq!(events[0].status, RunStatus::Running);

        let last = events.last().unwrap();
        assert_eq!(last.generation, 3);
        assert_eq!(last.status, RunStatus::Saturated);
        assert!(last.infected.is_saturated());

        for pair in events.windows(2) {
            assert_eq!(
                pair[1].infected.len(),
                pair[0].infected.len() + pair[1].added.len()
            );
        }
    }

    #[test]
    fn test_generations_restart_from_seed() {
        let shape = GridShape::square(6).unwrap();
        let sim = Simulation::new(shape, 2, &[SeedSpec::diagonal(0, 0, 6)], 50).unwrap();

        let mut first = sim.generations();
        first.next();
        first.next();
        assert_eq!(first.run().generations_elapsed(), 1);

        let replay = sim.generations().next().unwrap();
        assert_eq!(replay.generation, 0);
        assert_eq!(&replay.infected, sim.initial());
    }

    #[test]
    fn test_generations_seed_only_when_born_saturated() {
        let shape = GridShape::square(2).unwrap();
        let sim = Simulation::new(
            shape,
            2,
            &[SeedSpec::Cells {
                cells: shape.cells().collect(),
            }],
            50,
        )
        .unwrap();
        let events = sim.run_to_completion();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, RunStatus::Saturated);
    }

    #[test]
    fn test_simulation_propagates_seed_errors() {
        let cube = GridShape::cube(6).unwrap();
        let bad = SeedSpec::PermutationLayers {
            perms: vec![vec![0, 1, 2, 2, 4, 5]; 6],
        };
        assert!(matches!(
            Simulation::new(cube, 3, &[bad], 50),
            Err(EngineError::InvalidPermutation(_))
        ));
        assert!(matches!(
            Simulation::new(cube, 0, &[], 50),
            Err(EngineError::InvalidThreshold(0))
        ));
    }
}
