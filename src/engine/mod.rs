mod index;
mod row;

pub use self::row::RowWord;
use crate::{Cell, Pattern};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::fmt;

/// Rows of the reference board
pub const DEFAULT_ROWS: usize = 48;
/// Columns of the reference board, one full `u64` per row
pub const DEFAULT_COLS: usize = 64;

/// The grid most callers want: one `u64` per row
pub type Grid = PackedGrid<u64>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("a grid needs at least one row")]
    NoRows,
    #[error("a grid needs at least one column")]
    NoColumns,
    #[error("{cols} columns do not fit in a {bits}-bit row word")]
    TooManyColumns { cols: usize, bits: usize },
    #[error("row {row} has live cells at or beyond column {cols}")]
    StrayBits { row: usize, cols: usize },
    #[error("a {width}x{height} pattern at {at:?} does not fit in a {cols}x{rows} grid")]
    OutOfBounds {
        width: usize,
        height: usize,
        at: Cell,
        cols: usize,
        rows: usize,
    },
}

/// A fixed-size Game of Life board with hard (non-wrapping) edges
///
/// Every row is a single [`RowWord`]; bit `b` of row `r` is the cell `(r, b)`.
/// Bits at or beyond [`PackedGrid::cols`] are always zero.
///
/// Generations are double buffered: [`PackedGrid::step`] reads only the frozen
/// previous generation and writes into a scratch buffer, which is swapped in
/// once every row has been computed.
#[derive(Debug, Clone)]
pub struct PackedGrid<W: RowWord> {
    rows: Vec<W>,
    scratch: Vec<W>,
    cols: usize,
    mask: W,
    generation: u64,
    rng: ChaCha8Rng,
}

impl<W: RowWord> PackedGrid<W> {
    fn check_size(rows: usize, cols: usize) -> Result<(), GridError> {
        if rows == 0 {
            return Err(GridError::NoRows);
        }
        if cols == 0 {
            return Err(GridError::NoColumns);
        }
        if cols > W::WIDTH {
            return Err(GridError::TooManyColumns {
                cols,
                bits: W::WIDTH,
            });
        }
        Ok(())
    }

    fn build(rows: Vec<W>, cols: usize, rng: ChaCha8Rng) -> Self {
        Self {
            scratch: vec![W::default(); rows.len()],
            rows,
            cols,
            mask: W::mask(cols),
            generation: 0,
            rng,
        }
    }

    /// Creates an all-dead grid whose random fills are seeded from entropy
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        Self::with_seed(rows, cols, rand::random())
    }

    /// Creates an all-dead grid whose random fills are reproducible from `seed`
    pub fn with_seed(rows: usize, cols: usize, seed: u64) -> Result<Self, GridError> {
        Self::check_size(rows, cols)?;
        Ok(Self::build(
            vec![W::default(); rows],
            cols,
            ChaCha8Rng::seed_from_u64(seed),
        ))
    }

    /// Adopts existing row words, rejecting any word with bits outside `cols`
    pub fn from_rows(cols: usize, words: Vec<W>) -> Result<Self, GridError> {
        Self::check_size(words.len(), cols)?;
        let mask = W::mask(cols);
        if let Some(row) = words.iter().position(|&w| w.and(mask) != w) {
            return Err(GridError::StrayBits { row, cols });
        }
        Ok(Self::build(
            words,
            cols,
            ChaCha8Rng::seed_from_u64(rand::random()),
        ))
    }

    /// Overwrites every row with random bits from the grid's own generator
    pub fn randomize(&mut self) {
        let mask = self.mask;
        for row in self.rows.iter_mut() {
            *row = W::random(&mut self.rng).and(mask);
        }
        self.generation = 0;
    }

    /// Overwrites every row with random bits drawn from `rng`
    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mask = self.mask;
        for row in self.rows.iter_mut() {
            *row = W::random(rng).and(mask);
        }
        self.generation = 0;
    }

    /// Restarts the grid's generator from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Kills every cell
    pub fn clear(&mut self) {
        self.rows.fill(W::default());
        self.generation = 0;
    }

    /// Whether the cell at (`row`, `col`) is alive
    ///
    /// # Panics
    /// If the coordinate lies outside the grid. Use [`PackedGrid::get`] for a
    /// checked query.
    #[inline]
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.assert_inside(row, col);
        self.rows[row].get(col)
    }

    /// Checked variant of [`PackedGrid::is_alive`]
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        if col >= self.cols {
            return None;
        }
        self.rows.get(row).map(|w| w.get(col))
    }

    /// Sets the state of the cell at (`row`, `col`)
    ///
    /// # Panics
    /// If the coordinate lies outside the grid.
    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        self.assert_inside(row, col);
        self.rows[row] = self.rows[row].with(col, alive);
    }

    fn assert_inside(&self, row: usize, col: usize) {
        assert!(
            row < self.rows.len() && col < self.cols,
            "cell ({row}, {col}) is outside the {}x{} grid",
            self.rows.len(),
            self.cols,
        );
    }

    /// Places the live cells of `pattern` with its top-left corner on `at`
    ///
    /// Cells already alive stay alive. Nothing is written if the pattern's
    /// bounding box does not fit.
    pub fn stamp(&mut self, pattern: &Pattern, at: Cell) -> Result<(), GridError> {
        let fits = at
            .row
            .checked_add(pattern.height())
            .is_some_and(|end| end <= self.rows.len())
            && at
                .col
                .checked_add(pattern.width())
                .is_some_and(|end| end <= self.cols);
        if !fits {
            return Err(GridError::OutOfBounds {
                width: pattern.width(),
                height: pattern.height(),
                at,
                cols: self.cols,
                rows: self.rows.len(),
            });
        }
        for &cell in pattern.cells() {
            let cell = cell + at;
            self.rows[cell.row] = self.rows[cell.row].with(cell.col, true);
        }
        Ok(())
    }

    /// Computes row `i` of the next generation from the frozen `rows`
    fn next_row(rows: &[W], cols: usize, i: usize) -> W {
        let current = rows[i];
        // rows outside the grid are dead
        let above = match i {
            0 => W::default(),
            _ => rows[i - 1],
        };
        let below = rows.get(i + 1).copied().unwrap_or_default();

        let dead = W::default();
        if above == dead && current == dead && below == dead {
            return dead;
        }

        (0..cols)
            .filter(|&col| index::next_state(above, current, below, col))
            .fold(dead, |next, col| next.with(col, true))
    }

    /// Advances the grid by one generation
    pub fn step(&mut self) {
        for (i, next) in self.scratch.iter_mut().enumerate() {
            *next = Self::next_row(&self.rows, self.cols, i);
        }
        std::mem::swap(&mut self.rows, &mut self.scratch);
        self.generation += 1;
    }

    /// Advances the grid by one generation, computing rows on the rayon pool
    ///
    /// Produces exactly the same generation as [`PackedGrid::step`].
    pub fn step_parallel(&mut self) {
        let rows = &self.rows;
        let cols = self.cols;
        self.scratch
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, next)| *next = Self::next_row(rows, cols, i));
        std::mem::swap(&mut self.rows, &mut self.scratch);
        self.generation += 1;
    }

    /// Advances the grid by `n` generations
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The packed row words, top row first
    #[inline]
    pub fn words(&self) -> &[W] {
        &self.rows
    }

    /// Generations stepped since construction or the last reset
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.rows.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Live cells in row-major order
    pub fn alive_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.cols;
        self.rows.iter().enumerate().flat_map(move |(row, &word)| {
            (0..cols)
                .filter(move |&col| word.get(col))
                .map(move |col| Cell::new(row, col))
        })
    }

    /// The whole board as a [`Pattern`] anchored at (0, 0)
    pub fn to_pattern(&self) -> Pattern {
        Pattern::new(self.alive_cells().collect(), self.cols, self.rows.len())
    }
}

impl<W: RowWord> fmt::Display for PackedGrid<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &word in &self.rows {
            for col in 0..self.cols {
                f.write_str(if word.get(col) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
