//! Simulation configuration and the named-parameter surface.
//!
//! [`SimulationConfig`] is the only way to describe a run. Its setters keep the
//! invariants at the point of mutation: structural parameters are validated
//! and the rule number is clamped into the rule space of the current `k` and
//! `r`, so the engine never sees an invalid configuration.

use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AutomatonError, AutomatonResult};
use crate::rule::{clamp_to_space, max_rule_for_size, validate_rule_space, Cell};

const DEFAULT_RADIUS: usize = 1;
const DEFAULT_STATES: usize = 2;
const DEFAULT_WIDTH: usize = 50;
const DEFAULT_HEIGHT: usize = 50;
const DEFAULT_RULE: u32 = 30;

/// Column of the single seed cell in a row of `width` cells.
///
/// Odd widths put the seed exactly in the middle; even widths put it one
/// column left of the midpoint.
pub fn seed_column(width: usize) -> usize {
    if width % 2 == 1 {
        width / 2
    } else {
        (width / 2).saturating_sub(1)
    }
}

/// How row 0 of the grid is filled on reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialRow {
    /// A single cell in state 1 at [`seed_column`], everything else 0.
    #[default]
    CenterSeed,
    /// A caller-supplied row.
    Explicit(Vec<Cell>),
}

impl InitialRow {
    /// Materialize the row for `width` cells.
    pub fn cells(&self, width: usize) -> Vec<Cell> {
        match self {
            InitialRow::CenterSeed => {
                let mut row = vec![0; width];
                if let Some(seed) = row.get_mut(seed_column(width)) {
                    *seed = 1;
                }
                row
            }
            InitialRow::Explicit(cells) => cells.clone(),
        }
    }

    fn validate(&self, k: usize, width: usize) -> AutomatonResult<()> {
        let InitialRow::Explicit(cells) = self else {
            return Ok(());
        };
        if cells.len() != width {
            return Err(AutomatonError::InvalidInitialRow {
                message: format!("expected {width} cells, got {}", cells.len()),
            });
        }
        if let Some((column, state)) = cells.iter().enumerate().find(|(_, &s)| s as usize >= k) {
            return Err(AutomatonError::InvalidInitialRow {
                message: format!("state {state} at column {column} is not below k = {k}"),
            });
        }
        Ok(())
    }
}

impl FromStr for InitialRow {
    type Err = AutomatonError;

    /// Parses `center` or a string of base-36 digits such as `0010100`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("center") {
            return Ok(InitialRow::CenterSeed);
        }
        let invalid = || AutomatonError::InvalidParameterValue {
            name: "initial_row".to_string(),
            value: s.to_string(),
        };
        if s.is_empty() {
            return Err(invalid());
        }
        s.chars()
            .map(|c| c.to_digit(36).map(|d| d as Cell).ok_or_else(invalid))
            .collect::<AutomatonResult<Vec<_>>>()
            .map(InitialRow::Explicit)
    }
}

/// Configuration of a single run: `(k, r, width, height, rule)` plus the
/// initial-row policy.
///
/// Fields are private; construct through [`SimulationConfig::new`] or
/// deserialization, both of which validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSimulationConfig", into = "RawSimulationConfig")]
pub struct SimulationConfig {
    k: usize,
    r: usize,
    width: usize,
    height: usize,
    rule: BigUint,
    initial_row: InitialRow,
    /// Cached `k^(2r+1)`.
    table_size: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_STATES,
            r: DEFAULT_RADIUS,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            rule: BigUint::from(DEFAULT_RULE),
            initial_row: InitialRow::CenterSeed,
            table_size: 8,
        }
    }
}

impl SimulationConfig {
    /// Create a validated configuration. `rule` is clamped, never rejected.
    pub fn new(
        k: usize,
        r: usize,
        width: usize,
        height: usize,
        rule: impl Into<BigInt>,
    ) -> AutomatonResult<Self> {
        let table_size = validate_rule_space(k, r)?;
        validate_width(width)?;
        validate_height(height)?;

        let mut config = Self {
            k,
            r,
            width,
            height,
            rule: BigUint::default(),
            initial_row: InitialRow::CenterSeed,
            table_size,
        };
        config.set_rule(rule);
        Ok(config)
    }

    /// Number of states `k`.
    pub fn states(&self) -> usize {
        self.k
    }

    /// Neighborhood radius `r`.
    pub fn radius(&self) -> usize {
        self.r
    }

    /// Row length.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows, including the initial one.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Rule number, always within the rule space of `(k, r)`.
    pub fn rule(&self) -> &BigUint {
        &self.rule
    }

    /// Initial-row policy.
    pub fn initial_row(&self) -> &InitialRow {
        &self.initial_row
    }

    /// Size of the rule table, `k^(2r+1)`.
    pub fn table_size(&self) -> usize {
        self.table_size
    }

    /// Largest rule number for the current `k` and `r`.
    pub fn max_rule(&self) -> BigUint {
        max_rule_for_size(self.k, self.table_size)
    }

    /// Set the rule number, clamping it into `[0, k^(k^(2r+1)) - 1]`.
    pub fn set_rule(&mut self, rule: impl Into<BigInt>) {
        let requested = rule.into();
        let clamped = clamp_to_space(&requested, self.k, self.table_size);
        if BigInt::from(clamped.clone()) != requested {
            debug!(requested = %requested, clamped = %clamped, "rule_clamped");
        }
        self.rule = clamped;
    }

    /// Set `k`. The rule is re-clamped against the new rule space.
    pub fn set_states(&mut self, k: usize) -> AutomatonResult<()> {
        self.table_size = validate_rule_space(k, self.r)?;
        self.k = k;
        self.reclamp_rule();
        self.fit_initial_row();
        Ok(())
    }

    /// Set `r`. The rule is re-clamped against the new rule space.
    pub fn set_radius(&mut self, r: usize) -> AutomatonResult<()> {
        self.table_size = validate_rule_space(self.k, r)?;
        self.r = r;
        self.reclamp_rule();
        Ok(())
    }

    /// Set the row length.
    pub fn set_width(&mut self, width: usize) -> AutomatonResult<()> {
        validate_width(width)?;
        self.width = width;
        self.fit_initial_row();
        Ok(())
    }

    /// Set the number of rows.
    pub fn set_height(&mut self, height: usize) -> AutomatonResult<()> {
        validate_height(height)?;
        self.height = height;
        Ok(())
    }

    /// Set the initial-row policy. Explicit rows must match `width` and `k`.
    pub fn set_initial_row(&mut self, initial_row: InitialRow) -> AutomatonResult<()> {
        initial_row.validate(self.k, self.width)?;
        self.initial_row = initial_row;
        Ok(())
    }

    /// Builder-style [`SimulationConfig::set_initial_row`].
    pub fn with_initial_row(mut self, initial_row: InitialRow) -> AutomatonResult<Self> {
        self.set_initial_row(initial_row)?;
        Ok(self)
    }

    /// Set a parameter by name, parsing `value`.
    pub fn set_param(&mut self, name: &str, value: &str) -> AutomatonResult<()> {
        let param: Param = name.parse()?;
        let invalid = || AutomatonError::InvalidParameterValue {
            name: param.to_string(),
            value: value.to_string(),
        };
        let value = value.trim();
        let count = || value.parse::<usize>().map_err(|_| invalid());

        match param {
            Param::Radius => self.set_radius(count()?),
            Param::States => self.set_states(count()?),
            Param::Width => self.set_width(count()?),
            Param::Height => self.set_height(count()?),
            Param::Rule => {
                let rule = BigInt::from_str(value).map_err(|_| invalid())?;
                self.set_rule(rule);
                Ok(())
            }
        }
    }

    /// Current value of a parameter, formatted as text.
    pub fn get_param(&self, name: &str) -> AutomatonResult<String> {
        let param: Param = name.parse()?;
        Ok(self.param_value(param))
    }

    /// All parameters with their current values, in declaration order.
    pub fn params(&self) -> Vec<(Param, String)> {
        Param::ALL
            .iter()
            .map(|&param| (param, self.param_value(param)))
            .collect()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> AutomatonResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn param_value(&self, param: Param) -> String {
        match param {
            Param::Radius => self.r.to_string(),
            Param::States => self.k.to_string(),
            Param::Width => self.width.to_string(),
            Param::Height => self.height.to_string(),
            Param::Rule => self.rule.to_string(),
        }
    }

    fn reclamp_rule(&mut self) {
        let current = BigInt::from(self.rule.clone());
        self.set_rule(current);
    }

    fn fit_initial_row(&mut self) {
        if self.initial_row.validate(self.k, self.width).is_err() {
            warn!(
                width = self.width,
                k = self.k,
                "initial_row_reset_to_center_seed"
            );
            self.initial_row = InitialRow::CenterSeed;
        }
    }
}

fn validate_width(width: usize) -> AutomatonResult<()> {
    if width < 1 {
        return Err(AutomatonError::InvalidWidth { width });
    }
    Ok(())
}

fn validate_height(height: usize) -> AutomatonResult<()> {
    if height < 1 {
        return Err(AutomatonError::InvalidHeight { height });
    }
    Ok(())
}

/// A named, settable simulation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// `r`, the neighborhood radius.
    Radius,
    /// `k`, the number of states.
    States,
    /// `width`, the row length.
    Width,
    /// `height`, the number of rows.
    Height,
    /// `rule`, the rule number.
    Rule,
}

impl Param {
    /// Every parameter, in declaration order.
    pub const ALL: [Param; 5] = [
        Param::Radius,
        Param::States,
        Param::Width,
        Param::Height,
        Param::Rule,
    ];

    /// Short name used on the configuration surface.
    pub fn name(&self) -> &'static str {
        match self {
            Param::Radius => "r",
            Param::States => "k",
            Param::Width => "width",
            Param::Height => "height",
            Param::Rule => "rule",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Param {
    type Err = AutomatonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Param::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s.trim())
            .ok_or_else(|| AutomatonError::UnknownParameter {
                name: s.to_string(),
            })
    }
}

/// A rule number as it appears in JSON: a plain number or a decimal string
/// for values past 64 bits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RuleNumber {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl Default for RuleNumber {
    fn default() -> Self {
        RuleNumber::Unsigned(DEFAULT_RULE as u64)
    }
}

impl TryFrom<RuleNumber> for BigInt {
    type Error = AutomatonError;

    fn try_from(value: RuleNumber) -> Result<Self, Self::Error> {
        match value {
            RuleNumber::Unsigned(n) => Ok(BigInt::from(n)),
            RuleNumber::Signed(n) => Ok(BigInt::from(n)),
            RuleNumber::Text(text) => BigInt::from_str(text.trim()).map_err(|_| {
                AutomatonError::InvalidParameterValue {
                    name: Param::Rule.to_string(),
                    value: text,
                }
            }),
        }
    }
}

/// Wire form of [`SimulationConfig`]; every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSimulationConfig {
    #[serde(default = "default_radius")]
    r: usize,
    #[serde(default = "default_states")]
    k: usize,
    #[serde(default = "default_width")]
    width: usize,
    #[serde(default = "default_height")]
    height: usize,
    #[serde(default)]
    rule: RuleNumber,
    #[serde(default)]
    initial_row: InitialRow,
}

fn default_radius() -> usize {
    DEFAULT_RADIUS
}

fn default_states() -> usize {
    DEFAULT_STATES
}

fn default_width() -> usize {
    DEFAULT_WIDTH
}

fn default_height() -> usize {
    DEFAULT_HEIGHT
}

impl TryFrom<RawSimulationConfig> for SimulationConfig {
    type Error = AutomatonError;

    fn try_from(raw: RawSimulationConfig) -> Result<Self, Self::Error> {
        let rule = BigInt::try_from(raw.rule)?;
        SimulationConfig::new(raw.k, raw.r, raw.width, raw.height, rule)?
            .with_initial_row(raw.initial_row)
    }
}

impl From<SimulationConfig> for RawSimulationConfig {
    fn from(config: SimulationConfig) -> Self {
        Self {
            r: config.r,
            k: config.k,
            width: config.width,
            height: config.height,
            rule: RuleNumber::Text(config.rule.to_string()),
            initial_row: config.initial_row,
        }
    }
}
