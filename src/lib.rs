//! Bit-packed Conway's Game of Life on a fixed, hard-edged grid.
//!
//! Each row of the board is a single machine word ([`RowWord`]) and a
//! generation is computed from a frozen copy of the previous one.

pub mod cell;
pub mod enc;
pub mod engine;

pub use cell::Cell;
pub use enc::{Pattern, PatternError};
pub use engine::{DEFAULT_COLS, DEFAULT_ROWS, Grid, GridError, PackedGrid, RowWord};
