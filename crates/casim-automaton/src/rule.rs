//! Rule numbers and the transition tables they encode.
//!
//! A rule for a `k`-state, radius-`r` automaton is a table with one output
//! state per neighborhood. There are `k^(2r+1)` neighborhoods, so the rule
//! space holds `k^(k^(2r+1))` rules and a rule number is the table read as a
//! base-`k` number:
//!
//! ```text
//! k = 2, r = 1, rule 30 = 0b00011110
//!
//! neighborhood  111 110 101 100 011 010 001 000
//! output          0   0   0   1   1   1   1   0
//! ```
//!
//! Index 0 of the table holds the most significant digit, which is the output
//! for the largest neighborhood.

use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::config::SimulationConfig;
use crate::error::{AutomatonError, AutomatonResult};
use crate::radix::{fits_in_digits, pad_left, radix_digits};

/// State of a single cell, always below the configured `k`.
pub type Cell = u8;

/// Largest rule table the engine will allocate.
///
/// Since a neighborhood has at least three cells this also bounds `k` to
/// 101, so every state fits in a [`Cell`].
pub const MAX_TABLE_SIZE: usize = 1 << 20;

/// Number of cells in a radius-`r` neighborhood.
pub fn neighborhood_size(r: usize) -> usize {
    2 * r + 1
}

/// Number of neighborhoods for `k` states and radius `r`, if it is within
/// [`MAX_TABLE_SIZE`].
pub fn table_size(k: usize, r: usize) -> Option<usize> {
    let cells = r.checked_mul(2)?.checked_add(1)?;
    let exponent = u32::try_from(cells).ok()?;
    k.checked_pow(exponent).filter(|&size| size <= MAX_TABLE_SIZE)
}

/// Checks `k` and `r` and returns the table size they imply.
pub fn validate_rule_space(k: usize, r: usize) -> AutomatonResult<usize> {
    if k < 2 {
        return Err(AutomatonError::InvalidStates { k });
    }
    if r < 1 {
        return Err(AutomatonError::InvalidRadius { r });
    }
    table_size(k, r).ok_or(AutomatonError::RuleSpaceTooLarge {
        k,
        r,
        max: MAX_TABLE_SIZE,
    })
}

/// Largest valid rule number, `k^(k^(2r+1)) - 1`.
pub fn max_rule(k: usize, r: usize) -> AutomatonResult<BigUint> {
    let size = validate_rule_space(k, r)?;
    Ok(max_rule_for_size(k, size))
}

/// Clamps `rule` into `[0, max_rule(k, r)]`.
///
/// Negative input maps to 0. The function is idempotent.
pub fn clamp_rule(rule: &BigInt, k: usize, r: usize) -> AutomatonResult<BigUint> {
    let size = validate_rule_space(k, r)?;
    Ok(clamp_to_space(rule, k, size))
}

/// `k^size - 1` for an already validated table size.
pub(crate) fn max_rule_for_size(k: usize, size: usize) -> BigUint {
    // size <= MAX_TABLE_SIZE, which fits in u32
    BigUint::from(k).pow(size as u32) - BigUint::one()
}

/// Clamps into `[0, k^size - 1]` for an already validated table size.
///
/// The maximum is only computed when `rule` is above it.
pub(crate) fn clamp_to_space(rule: &BigInt, k: usize, size: usize) -> BigUint {
    match rule.to_biguint() {
        None => BigUint::zero(),
        Some(value) if fits_in_digits(&value, k as u32, size) => value,
        Some(_) => max_rule_for_size(k, size),
    }
}

/// Transition table of a `k`-state, radius-`r` rule.
///
/// Built once per reset and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    k: usize,
    r: usize,
    entries: Vec<Cell>,
}

impl RuleTable {
    /// Build the table for `rule`.
    ///
    /// A rule above the valid range behaves as the maximum rule, matching
    /// [`clamp_rule`].
    pub fn build(k: usize, r: usize, rule: &BigUint) -> AutomatonResult<Self> {
        let size = validate_rule_space(k, r)?;
        Ok(Self::with_size(k, r, size, rule))
    }

    /// Build from a configuration, whose rule space is already validated.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::with_size(
            config.states(),
            config.radius(),
            config.table_size(),
            config.rule(),
        )
    }

    fn with_size(k: usize, r: usize, size: usize, rule: &BigUint) -> Self {
        // k <= 101 once the rule space is validated
        let mut digits = radix_digits(rule, k as u32);
        if digits.len() > size {
            digits = vec![(k - 1) as Cell; size];
        }

        Self {
            k,
            r,
            entries: pad_left(digits, size),
        }
    }

    /// Placeholder table used before the first reset.
    pub(crate) fn empty(k: usize, r: usize) -> Self {
        Self {
            k,
            r,
            entries: Vec::new(),
        }
    }

    /// Number of states.
    pub fn states(&self) -> usize {
        self.k
    }

    /// Neighborhood radius.
    pub fn radius(&self) -> usize {
        self.r
    }

    /// Number of entries (`k^(2r+1)` once built).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before the first reset.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Output states, most significant first.
    pub fn entries(&self) -> &[Cell] {
        &self.entries
    }

    /// Next state of the center cell of `neighborhood`.
    ///
    /// The rightmost cell is the least significant digit. Every state must be
    /// below `k`; otherwise the result is unspecified.
    pub fn lookup(&self, neighborhood: &[Cell]) -> Cell {
        debug_assert_eq!(neighborhood.len(), neighborhood_size(self.r));
        debug_assert!(neighborhood.iter().all(|&s| (s as usize) < self.k));

        let decimal = neighborhood.iter().fold(0usize, |acc, &s| {
            acc.wrapping_mul(self.k).wrapping_add(s as usize)
        });

        self.entries
            .len()
            .checked_sub(decimal.wrapping_add(1))
            .and_then(|i| self.entries.get(i).copied())
            .unwrap_or_default()
    }

    /// The neighborhood whose output lives at `index`.
    pub fn neighborhood_for_index(&self, index: usize) -> Vec<Cell> {
        let decimal = self.entries.len().saturating_sub(index + 1);
        let digits = radix_digits(&BigUint::from(decimal), self.k as u32);
        pad_left(digits, neighborhood_size(self.r))
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, output) in self.entries.iter().enumerate() {
            let hood = self.neighborhood_for_index(index);
            if self.k <= 36 {
                for digit in &hood {
                    let c = char::from_digit(*digit as u32, 36).unwrap_or('?');
                    write!(f, "{c}")?;
                }
            } else {
                let parts: Vec<String> = hood.iter().map(|d| d.to_string()).collect();
                write!(f, "{}", parts.join(","))?;
            }
            writeln!(f, " -> {output}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(value: u64) -> BigUint {
        BigUint::from(value)
    }

    #[test]
    fn test_rule_30_table() {
        let table = RuleTable::build(2, 1, &rule(30)).unwrap();
        assert_eq!(table.entries(), &[0, 0, 0, 1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_rule_30_lookup() {
        let table = RuleTable::build(2, 1, &rule(30)).unwrap();
        assert_eq!(table.lookup(&[1, 1, 1]), 0);
        assert_eq!(table.lookup(&[0, 1, 0]), 1);
        assert_eq!(table.lookup(&[1, 0, 0]), 1);
        assert_eq!(table.lookup(&[0, 0, 0]), 0);
    }

    #[test]
    fn test_rule_zero_is_all_zero() {
        let table = RuleTable::build(3, 1, &BigUint::zero()).unwrap();
        assert_eq!(table.len(), 27);
        assert!(table.entries().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_ternary_lookup_reads_rightmost_as_least_significant() {
        // 5 in base 3 is "12": (0,0,0) -> 2, (0,0,1) -> 1, everything else 0
        let table = RuleTable::build(3, 1, &rule(5)).unwrap();
        assert_eq!(table.lookup(&[0, 0, 0]), 2);
        assert_eq!(table.lookup(&[0, 0, 1]), 1);
        assert_eq!(table.lookup(&[1, 0, 0]), 0);
    }

    #[test]
    fn test_table_size_and_range() {
        for (k, r, value) in [(2, 1, 110), (2, 2, 123_456_789), (3, 1, 7_625_597_484_986), (4, 1, 42)] {
            let table = RuleTable::build(k, r, &rule(value)).unwrap();
            assert_eq!(table.len(), table_size(k, r).unwrap());
            assert!(table.entries().iter().all(|&s| (s as usize) < k));
        }
    }

    #[test]
    fn test_build_above_range_saturates() {
        let table = RuleTable::build(2, 1, &rule(10_000)).unwrap();
        assert_eq!(table.entries(), &[1; 8]);
    }

    #[test]
    fn test_max_rule() {
        assert_eq!(max_rule(2, 1).unwrap(), rule(255));
        assert_eq!(max_rule(2, 2).unwrap(), rule(u32::MAX as u64));
        assert_eq!(max_rule(3, 1).unwrap(), BigUint::from(3u32).pow(27) - 1u32);
    }

    #[test]
    fn test_clamp_rule() {
        assert_eq!(clamp_rule(&BigInt::from(30), 2, 1).unwrap(), rule(30));
        assert_eq!(clamp_rule(&BigInt::from(1000), 2, 1).unwrap(), rule(255));
        assert_eq!(clamp_rule(&BigInt::from(-5), 2, 1).unwrap(), rule(0));
    }

    #[test]
    fn test_clamp_rule_at_largest_alphabet() {
        // k = 101 has a 1030301-entry table; in-range rules must not need
        // the full maximum
        let big = BigInt::from(10u32).pow(500);
        assert_eq!(clamp_rule(&big, 101, 1).unwrap(), big.to_biguint().unwrap());
        assert_eq!(clamp_rule(&BigInt::from(-1), 101, 1).unwrap(), rule(0));
    }

    #[test]
    fn test_clamp_rule_idempotent() {
        for value in [-100i64, 0, 1, 30, 255, 256, 1 << 40] {
            let once = clamp_rule(&BigInt::from(value), 2, 1).unwrap();
            let twice = clamp_rule(&BigInt::from(once.clone()), 2, 1).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_invalid_rule_space() {
        assert!(matches!(
            validate_rule_space(1, 1),
            Err(AutomatonError::InvalidStates { k: 1 })
        ));
        assert!(matches!(
            validate_rule_space(2, 0),
            Err(AutomatonError::InvalidRadius { r: 0 })
        ));
        assert!(matches!(
            validate_rule_space(2, 10),
            Err(AutomatonError::RuleSpaceTooLarge { .. })
        ));
        assert_eq!(validate_rule_space(2, 9).unwrap(), 1 << 19);
    }

    #[test]
    fn test_neighborhood_for_index() {
        let table = RuleTable::build(2, 1, &rule(30)).unwrap();
        assert_eq!(table.neighborhood_for_index(0), vec![1, 1, 1]);
        assert_eq!(table.neighborhood_for_index(5), vec![0, 1, 0]);
        assert_eq!(table.neighborhood_for_index(7), vec![0, 0, 0]);
    }

    #[test]
    fn test_display() {
        let table = RuleTable::build(2, 1, &rule(30)).unwrap();
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "111 -> 0");
        assert_eq!(lines[3], "100 -> 1");
        assert_eq!(lines[7], "000 -> 0");
    }
}
