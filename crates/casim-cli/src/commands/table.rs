//! Table command: print the transition table of a rule.

use anyhow::Result;
use casim_automaton::RuleTable;

use crate::commands::run::SimulationArgs;
use crate::config::Config;

/// Execute the table command.
pub fn execute(config: &Config, args: &SimulationArgs) -> Result<()> {
    let simulation = args.apply(&config.simulation)?;
    let table = RuleTable::from_config(&simulation);

    println!(
        "rule {} (k = {}, r = {}, {} neighborhoods)",
        simulation.rule(),
        table.states(),
        table.radius(),
        table.len()
    );
    print!("{table}");
    Ok(())
}
