//! Grid evolution engine.
//!
//! [`Simulation`] owns the space-time grid, the rule table and the time
//! cursor. A host drives it with [`Simulation::reset`] and repeated calls to
//! [`Simulation::step`] until `step` reports completion:
//!
//! ```text
//! Uninitialized --reset--> Ready (t = 0) --step--> Evolving (0 < t < height)
//!                                                     |
//!                                        step (t >= height)
//!                                                     v
//!                                                   Done
//! ```
//!
//! Configuration changes made through [`Simulation::config_mut`] or
//! [`Simulation::set_param`] take effect on the next reset.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::error::AutomatonResult;
use crate::grid::{wrapped_columns, SpaceTimeGrid};
use crate::rule::{neighborhood_size, Cell, RuleTable};

/// Lifecycle phase of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Constructed, never reset. There is no grid yet.
    Uninitialized,
    /// Reset; only row 0 is meaningful.
    Ready,
    /// Rows `0..=t` are computed.
    Evolving,
    /// Time reached the grid height; further steps are no-ops.
    Done,
}

/// A single, independently owned cellular automaton run.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Parameters applied on the next reset.
    config: SimulationConfig,

    /// Transition table built on the last reset.
    table: RuleTable,

    /// Space-time diagram; row `t` is the state at time `t`.
    grid: SpaceTimeGrid,

    /// Time cursor, in `0..=height`.
    time: usize,

    phase: Phase,
}

impl Simulation {
    /// Create an uninitialized simulation. Call [`Simulation::reset`] before
    /// stepping.
    pub fn new(config: SimulationConfig) -> Self {
        let table = RuleTable::empty(config.states(), config.radius());
        Self {
            config,
            table,
            grid: SpaceTimeGrid::default(),
            time: 0,
            phase: Phase::Uninitialized,
        }
    }

    /// Create a simulation and reset it, ready to step.
    pub fn ready(config: SimulationConfig) -> Self {
        let mut simulation = Self::new(config);
        simulation.reset();
        simulation
    }

    /// Configuration used by the next reset.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Mutable configuration. Changes apply on the next reset.
    pub fn config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.config
    }

    /// Set a configuration parameter by name. Applies on the next reset.
    pub fn set_param(&mut self, name: &str, value: &str) -> AutomatonResult<()> {
        self.config.set_param(name, value)
    }

    /// Current space-time grid.
    pub fn grid(&self) -> &SpaceTimeGrid {
        &self.grid
    }

    /// Current time cursor.
    pub fn time(&self) -> usize {
        self.time
    }

    /// Rule table built on the last reset.
    pub fn rule_table(&self) -> &RuleTable {
        &self.table
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once time has reached the grid height.
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// The most recently computed row.
    pub fn current_row(&self) -> Option<&[Cell]> {
        let last = self.grid.height().checked_sub(1)?;
        self.grid.row(self.time.min(last))
    }

    /// Reallocate the grid, seed row 0, rebuild the rule table and rewind
    /// time to 0.
    pub fn reset(&mut self) {
        let width = self.config.width();
        let height = self.config.height();

        self.grid = SpaceTimeGrid::new(width, height);
        self.grid
            .set_first_row(&self.config.initial_row().cells(width));
        self.table = RuleTable::from_config(&self.config);
        self.time = 0;
        self.phase = Phase::Ready;

        debug!(
            k = self.config.states(),
            r = self.config.radius(),
            width,
            height,
            rule = %self.config.rule(),
            "simulation_reset"
        );
    }

    /// Advance time by one row.
    ///
    /// Returns `true` once time has reached the grid height; from then on
    /// every call returns `true` without touching the grid. A simulation that
    /// was never reset also returns `true`, since there is nothing to evolve.
    pub fn step(&mut self) -> bool {
        match self.phase {
            Phase::Uninitialized => {
                warn!("simulation_step_before_reset");
                return true;
            }
            Phase::Done => return true,
            Phase::Ready | Phase::Evolving => {}
        }

        self.time += 1;
        if self.time >= self.grid.height() {
            self.phase = Phase::Done;
            debug!(t = self.time, "simulation_done");
            return true;
        }

        let started = Instant::now();
        let (previous, current) = self.grid.previous_and_current(self.time);
        evolve_row(&self.table, previous, current);
        self.phase = Phase::Evolving;

        debug!(
            t = self.time,
            duration_us = started.elapsed().as_micros() as u64,
            "simulation_step"
        );

        false
    }

    /// Step until done. Returns the number of rows computed.
    pub fn run(&mut self) -> usize {
        info!(height = self.grid.height(), t = self.time, "simulation_run_start");

        let mut rows = 0;
        while !self.step() {
            rows += 1;
        }

        info!(rows, t = self.time, "simulation_run_complete");
        rows
    }

    /// Step at most `n` times, stopping early once done. Returns whether the
    /// simulation is done.
    pub fn run_steps(&mut self, n: usize) -> bool {
        for _ in 0..n {
            if self.step() {
                return true;
            }
        }
        self.is_done()
    }
}

/// Next state of `column`, read from its wrapped neighborhood in `previous`.
fn next_cell(table: &RuleTable, previous: &[Cell], column: usize, hood: &mut Vec<Cell>) -> Cell {
    hood.clear();
    hood.extend(wrapped_columns(column, table.radius(), previous.len()).map(|c| previous[c]));
    table.lookup(hood)
}

/// Compute `current` from `previous`, one column at a time.
#[cfg(not(feature = "parallel"))]
fn evolve_row(table: &RuleTable, previous: &[Cell], current: &mut [Cell]) {
    let mut hood = Vec::with_capacity(neighborhood_size(table.radius()));
    for (column, cell) in current.iter_mut().enumerate() {
        *cell = next_cell(table, previous, column, &mut hood);
    }
}

/// Parallel variant: columns only read `previous`, so each can be computed
/// independently.
#[cfg(feature = "parallel")]
fn evolve_row(table: &RuleTable, previous: &[Cell], current: &mut [Cell]) {
    use rayon::prelude::*;

    let r = table.radius();
    current.par_iter_mut().enumerate().for_each_init(
        || Vec::with_capacity(neighborhood_size(r)),
        |hood, (column, cell)| *cell = next_cell(table, previous, column, hood),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InitialRow;
    #[cfg(feature = "parallel")]
    use num_bigint::BigUint;

    fn rule_30(width: usize, height: usize) -> Simulation {
        Simulation::ready(SimulationConfig::new(2, 1, width, height, 30).unwrap())
    }

    #[test]
    fn test_new_is_uninitialized() {
        let mut sim = Simulation::new(SimulationConfig::default());
        assert_eq!(sim.phase(), Phase::Uninitialized);
        assert!(sim.rule_table().is_empty());
        assert!(sim.current_row().is_none());

        // Nothing to evolve
        assert!(sim.step());
        assert_eq!(sim.time(), 0);
        assert_eq!(sim.phase(), Phase::Uninitialized);
    }

    #[test]
    fn test_reset_seeds_row_and_builds_table() {
        let sim = rule_30(7, 4);
        assert_eq!(sim.phase(), Phase::Ready);
        assert_eq!(sim.time(), 0);
        assert_eq!(sim.grid().row(0).unwrap(), &[0, 0, 0, 1, 0, 0, 0]);
        assert!(sim.grid().rows().skip(1).all(|row| row.iter().all(|&c| c == 0)));
        assert_eq!(sim.rule_table().entries(), &[0, 0, 0, 1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_single_step() {
        let mut sim = rule_30(7, 4);
        assert!(!sim.step());
        assert_eq!(sim.time(), 1);
        assert_eq!(sim.phase(), Phase::Evolving);
        assert_eq!(sim.grid().row(1).unwrap(), &[0, 0, 1, 1, 1, 0, 0]);
        assert_eq!(sim.current_row().unwrap(), &[0, 0, 1, 1, 1, 0, 0]);
    }

    #[test]
    fn test_completion_and_idempotence() {
        let mut sim = rule_30(7, 4);
        for _ in 0..3 {
            assert!(!sim.step());
        }
        assert_eq!(sim.time(), 3);

        assert!(sim.step());
        assert!(sim.is_done());
        assert_eq!(sim.time(), 4);

        let grid = sim.grid().clone();
        assert!(sim.step());
        assert_eq!(sim.time(), 4);
        assert_eq!(sim.grid(), &grid);
    }

    #[test]
    fn test_height_one_is_done_on_first_step() {
        let mut sim = rule_30(5, 1);
        assert!(sim.step());
        assert_eq!(sim.time(), 1);
        assert_eq!(sim.current_row().unwrap(), &[0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_run_counts_rows() {
        let mut sim = rule_30(11, 6);
        assert_eq!(sim.run(), 5);
        assert!(sim.is_done());
        assert_eq!(sim.run(), 0);
    }

    #[test]
    fn test_run_steps_stops_at_done() {
        let mut sim = rule_30(5, 3);
        assert!(!sim.run_steps(1));
        assert!(sim.run_steps(10));
        assert_eq!(sim.time(), 3);
    }

    #[test]
    fn test_reset_after_run_rewinds() {
        let mut sim = rule_30(7, 4);
        sim.run();
        sim.reset();
        assert_eq!(sim.phase(), Phase::Ready);
        assert_eq!(sim.time(), 0);
        assert_eq!(sim.grid().row(1).unwrap(), &[0; 7]);
    }

    #[test]
    fn test_config_changes_apply_on_reset() {
        let mut sim = rule_30(7, 4);
        sim.set_param("width", "9").unwrap();
        sim.set_param("rule", "90").unwrap();
        assert_eq!(sim.grid().width(), 7);

        sim.step();
        assert_eq!(sim.grid().row(1).unwrap(), &[0, 0, 1, 1, 1, 0, 0]);

        sim.reset();
        assert_eq!(sim.grid().width(), 9);
        sim.step();
        // Rule 90: XOR of the two outer neighbors
        assert_eq!(sim.grid().row(1).unwrap(), &[0, 0, 0, 1, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_wraparound_at_edges() {
        // Rule 2 maps only 001 to 1, so each live cell moves one column left
        let config = SimulationConfig::new(2, 1, 5, 3, 2)
            .unwrap()
            .with_initial_row(InitialRow::Explicit(vec![1, 0, 0, 0, 0]))
            .unwrap();
        let mut sim = Simulation::ready(config);

        sim.step();
        assert_eq!(sim.grid().row(1).unwrap(), &[0, 0, 0, 0, 1]);
        sim.step();
        assert_eq!(sim.grid().row(2).unwrap(), &[0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_multi_state_rows_stay_in_range() {
        let config = SimulationConfig::new(3, 1, 13, 8, 7_625_597_484_986_u64 / 3).unwrap();
        let mut sim = Simulation::ready(config);
        sim.run();
        assert!(sim
            .grid()
            .rows()
            .all(|row| row.iter().all(|&c| (c as usize) < 3)));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_row_matches_sequential() {
        // Wide enough to be split across several rayon jobs
        let table = RuleTable::build(3, 2, &BigUint::from(0x5eed_cafe_f00d_u64)).unwrap();
        let previous: Vec<Cell> = (0..4099).map(|i| ((i * 7 + i / 3) % 3) as Cell).collect();

        let mut hood = Vec::new();
        let expected: Vec<Cell> = (0..previous.len())
            .map(|column| next_cell(&table, &previous, column, &mut hood))
            .collect();

        let mut current = vec![0; previous.len()];
        evolve_row(&table, &previous, &mut current);
        assert_eq!(current, expected);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_rule_30_fixture() {
        let mut sim = rule_30(7, 4);
        sim.run();
        let rows: Vec<&[Cell]> = sim.grid().rows().collect();
        assert_eq!(
            rows,
            vec![
                &[0, 0, 0, 1, 0, 0, 0][..],
                &[0, 0, 1, 1, 1, 0, 0][..],
                &[0, 1, 1, 0, 0, 1, 0][..],
                &[1, 1, 0, 1, 1, 1, 1][..],
            ]
        );
    }
}
