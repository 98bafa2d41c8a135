//! One-dimensional cellular automata driven by rule numbers.
//!
//! A row of cells with `k` possible states evolves in discrete time steps.
//! Each cell's next state depends on the `2r + 1` cells around it (wrapping
//! at the edges), and the complete transition table is encoded by a single
//! integer, the rule number. Successive rows stack into a space-time grid.
//!
//! ## Core Concepts
//!
//! - **Rule number**: base-`k` digits of the number form the transition table
//! - **RuleTable**: output state for each of the `k^(2r+1)` neighborhoods
//! - **SimulationConfig**: validated `(k, r, width, height, rule)`, clamp-on-write
//! - **Simulation**: owns the grid, the table and the time cursor
//!
//! ## Example
//!
//! ```
//! use casim_automaton::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::new(2, 1, 7, 4, 30)?;
//! let mut sim = Simulation::ready(config);
//! while !sim.step() {}
//!
//! assert_eq!(sim.grid().row(3).unwrap(), &[1, 1, 0, 1, 1, 1, 1]);
//! # Ok::<(), casim_automaton::AutomatonError>(())
//! ```
//!
//! ## Limits
//!
//! Rule tables are capped at [`MAX_TABLE_SIZE`] (2^20) entries, so rule spaces
//! such as `k = 2, r = 10` (2^21 neighborhoods) are rejected with
//! [`AutomatonError::RuleSpaceTooLarge`] rather than allocated. The cap also
//! bounds `k` to 101, which keeps every cell state in a byte.
//!
//! ## Features
//!
//! - `parallel` - compute the cells of each row on the [rayon](https://docs.rs/rayon) thread pool

mod automaton;
pub mod config;
mod error;
mod grid;
pub mod radix;
mod rule;

pub use automaton::{Phase, Simulation};
pub use config::{seed_column, InitialRow, Param, SimulationConfig};
pub use error::{AutomatonError, AutomatonResult};
pub use grid::{wrapped_columns, SpaceTimeGrid};
pub use radix::{digits_base_k, pad_left, MAX_RADIX};
pub use rule::{
    clamp_rule, max_rule, neighborhood_size, table_size, validate_rule_space, Cell, RuleTable,
    MAX_TABLE_SIZE,
};

/// Re-exported so callers can build rule numbers without naming `num-bigint`.
pub use num_bigint::{BigInt, BigUint};
