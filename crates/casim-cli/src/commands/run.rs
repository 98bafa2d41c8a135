//! Run command: evolve a grid and print it.

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use casim_automaton::{InitialRow, Param, Simulation, SimulationConfig};
use clap::Args;
use tracing::info;

use crate::config::Config;
use crate::render::{render_frame, Palette};

/// Simulation parameters accepted on the command line.
///
/// These take precedence over the config file and environment.
#[derive(Args, Debug, Clone, Default)]
pub struct SimulationArgs {
    /// Number of states per cell.
    #[arg(short = 'k', long = "k")]
    pub states: Option<usize>,

    /// Neighborhood radius.
    #[arg(short = 'r', long = "r")]
    pub radius: Option<usize>,

    /// Row length.
    #[arg(short = 'W', long)]
    pub width: Option<usize>,

    /// Number of rows, including the initial one.
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Rule number; clamped into the rule space of k and r.
    #[arg(long, allow_hyphen_values = true)]
    pub rule: Option<String>,

    /// Set any parameter as name=value (can be specified multiple times).
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Initial row: "center" or one base-36 digit per cell, e.g. 0010100.
    #[arg(long)]
    pub initial: Option<String>,
}

impl SimulationArgs {
    /// Layer these arguments over `base`.
    ///
    /// Structural parameters (`r`, `k`, `width`, `height`) from flags and
    /// `--set` are all applied before any `rule`, so the rule is clamped
    /// against the final rule space.
    pub fn apply(&self, base: &SimulationConfig) -> Result<SimulationConfig> {
        let mut config = base.clone();

        let mut pairs: Vec<(String, String)> = Vec::new();
        if let Some(r) = self.radius {
            pairs.push(("r".into(), r.to_string()));
        }
        if let Some(k) = self.states {
            pairs.push(("k".into(), k.to_string()));
        }
        if let Some(width) = self.width {
            pairs.push(("width".into(), width.to_string()));
        }
        if let Some(height) = self.height {
            pairs.push(("height".into(), height.to_string()));
        }
        if let Some(rule) = &self.rule {
            pairs.push(("rule".into(), rule.clone()));
        }
        for assignment in &self.set {
            let (name, value) = assignment
                .split_once('=')
                .with_context(|| format!("Expected NAME=VALUE, got {assignment:?}"))?;
            pairs.push((name.trim().to_string(), value.trim().to_string()));
        }

        // Stable partition keeps the command-line order within each group
        let (rules, structural): (Vec<_>, Vec<_>) = pairs
            .into_iter()
            .partition(|(name, _)| name.parse::<Param>().ok() == Some(Param::Rule));
        for (name, value) in structural.into_iter().chain(rules) {
            config
                .set_param(&name, &value)
                .with_context(|| format!("Failed to set {name}"))?;
        }

        if let Some(initial) = &self.initial {
            let row: InitialRow = initial.parse()?;
            config.set_initial_row(row)?;
        }

        Ok(config)
    }
}

/// Arguments of the `run` command.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub simulation: SimulationArgs,

    /// Stop after this many steps instead of running to completion.
    #[arg(long)]
    pub steps: Option<usize>,

    /// Print every frame while stepping.
    #[arg(long)]
    pub animate: bool,

    /// Delay between animated frames, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,

    /// Characters for each state, lowest first (e.g. " #").
    #[arg(long)]
    pub palette: Option<String>,
}

/// Execute the run command.
pub fn execute(config: &Config, args: &RunArgs) -> Result<()> {
    let simulation = args.simulation.apply(&config.simulation)?;
    let palette = match args.palette.as_deref().or(config.palette.as_deref()) {
        Some(text) => Palette::parse(text, simulation.states())?,
        None => Palette::for_states(simulation.states()),
    };

    info!(
        k = simulation.states(),
        r = simulation.radius(),
        width = simulation.width(),
        height = simulation.height(),
        rule = %simulation.rule(),
        "run_start"
    );

    let mut sim = Simulation::ready(simulation);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let limit = args.steps.unwrap_or(usize::MAX);
    if args.animate {
        write!(out, "{}", render_frame(&sim, &palette))?;
        out.flush()?;
        for _ in 0..limit {
            if args.delay_ms > 0 {
                thread::sleep(Duration::from_millis(args.delay_ms));
            }
            let done = sim.step();
            writeln!(out)?;
            write!(out, "{}", render_frame(&sim, &palette))?;
            out.flush()?;
            if done {
                break;
            }
        }
    } else {
        match args.steps {
            Some(n) => {
                sim.run_steps(n);
            }
            None => {
                sim.run();
            }
        }
        write!(out, "{}", render_frame(&sim, &palette))?;
    }

    out.flush()?;
    Ok(())
}
