//! Config command implementation.
//!
//! Inspects and edits the persisted simulation defaults.

use anyhow::Result;
use casim_automaton::{InitialRow, Param};

use crate::config::{env_var_name, Config};

/// Show the effective configuration (file plus environment) as JSON.
pub fn show(config: &Config) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// List every parameter with its current value and override variable.
pub fn params(config: &Config) -> Result<()> {
    for (param, value) in config.simulation.params() {
        println!("{:<8} = {:<12} ({})", param.name(), value, env_var_name(param));
    }
    Ok(())
}

/// Set a parameter (or `palette` / `initial`) and save the config file.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "palette" => config.palette = Some(value.to_string()),
        "initial" => {
            let row: InitialRow = value.parse()?;
            config.simulation.set_initial_row(row)?;
        }
        _ => config.simulation.set_param(key, value)?,
    }

    let path = config.save()?;
    // Echo the stored value; a clamped rule differs from the input
    if let Ok(param) = key.parse::<Param>() {
        println!("{} = {}", param, config.simulation.get_param(param.name())?);
    } else {
        println!("{key} = {value}");
    }
    println!("Saved to {}", path.display());
    Ok(())
}

/// Print a single parameter value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    let value = match key {
        "palette" => config.palette.clone().unwrap_or_default(),
        _ => config.simulation.get_param(key)?,
    };
    println!("{value}");
    Ok(())
}

/// Reset the config file to defaults.
pub fn reset(config: &Config) -> Result<()> {
    let fresh = Config {
        source: config.source.clone(),
        ..Config::default()
    };
    let path = fresh.save()?;
    println!("Configuration reset: {}", path.display());
    Ok(())
}
