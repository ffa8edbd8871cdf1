use super::RowWord;
use std::sync::OnceLock;

/// The number of arrangements of a 3x3 neighbourhood
const PERMUTATIONS: usize = 1 << 9;
const CENTER: usize = 0b000_010_000;
type RuleTable = [bool; PERMUTATIONS];

/// Returns the shared B3/S23 lookup table, building it on first use
pub(super) fn rule_table() -> &'static RuleTable {
    static CELL: OnceLock<RuleTable> = OnceLock::new();
    CELL.get_or_init(build_rule_table)
}

/// Packs the three row windows of a neighbourhood into a table index
///
/// `above` lands in bits 0..=2, `current` in 3..=5 and `below` in 6..=8, which
/// puts the cell itself on [`CENTER`].
#[inline]
pub(super) fn neighbourhood(above: usize, current: usize, below: usize) -> usize {
    above | (current << 3) | (below << 6)
}

/// Whether column `col` of `current` is alive in the next generation
///
/// `above` and `below` are the neighbouring row words, dead words for rows
/// outside the grid.
#[inline]
pub(super) fn next_state<W: RowWord>(above: W, current: W, below: W, col: usize) -> bool {
    let n = neighbourhood(above.window(col), current.window(col), below.window(col));
    rule_table()[n]
}

/// Creates a lookup table for Conway's ruleset
///
/// The table is indexed by a 9-bit neighbourhood (see [`neighbourhood`]) and
/// answers whether the centre cell is alive in the next generation.
pub(super) fn build_rule_table() -> RuleTable {
    let mut table = [false; PERMUTATIONS];
    for (i, next) in table.iter_mut().enumerate() {
        let neighbours = (i & !CENTER).count_ones();
        let alive = i & CENTER != 0;
        *next = matches!((alive, neighbours), (true, 2) | (_, 3));
    }
    table
}
