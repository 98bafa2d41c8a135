//! Text rendering of the space-time grid.

use anyhow::{bail, Result};
use casim_automaton::{Cell, Simulation};

/// Glyphs for the default two-state palette.
const BINARY_GLYPHS: &str = ".#";

/// Glyphs for larger alphabets, one per state.
const DIGIT_GLYPHS: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

/// One display character per cell state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    glyphs: Vec<char>,
}

impl Palette {
    /// Default palette for `k` states.
    pub fn for_states(k: usize) -> Self {
        let glyphs = if k <= 2 {
            BINARY_GLYPHS.chars().collect()
        } else {
            DIGIT_GLYPHS.chars().take(k).collect()
        };
        Self { glyphs }
    }

    /// Palette from user text; needs at least one glyph per state.
    pub fn parse(text: &str, k: usize) -> Result<Self> {
        let glyphs: Vec<char> = text.chars().collect();
        if glyphs.len() < k {
            bail!(
                "palette {:?} has {} glyphs but k = {} states need one each",
                text,
                glyphs.len(),
                k
            );
        }
        Ok(Self { glyphs })
    }

    /// Glyph for `state`; states past the palette render as `?`.
    pub fn glyph(&self, state: Cell) -> char {
        self.glyphs.get(state as usize).copied().unwrap_or('?')
    }
}

/// Render the rows computed so far, titled with the time cursor.
pub fn render_frame(sim: &Simulation, palette: &Palette) -> String {
    let mut out = format!("t = {}\n", sim.time());

    let grid = sim.grid();
    let visible = (sim.time() + 1).min(grid.height());
    for row in grid.rows().take(visible) {
        out.extend(row.iter().map(|&state| palette.glyph(state)));
        out.push('\n');
    }
    out
}
