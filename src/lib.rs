//! Minesweeper solver-and-generator core.
//!
//! Answers two coupled questions about a board of configurable size:
//! whether a partially revealed board can be finished by logical
//! deduction alone (no guessing), and how to randomly place mines,
//! under per-cell constraints, so that the result is deducible from a
//! given starting configuration.
//!
//! Deduction divides the unknown frontier into independent regions,
//! reduces each region's adjacency constraints by Gaussian elimination
//! over rationals, and enumerates free-variable assignments when
//! elimination alone forces nothing. Generation samples mine
//! permutations in parallel workers under a cooperative deadline until
//! a candidate passes the solvability check.

pub mod board;
pub mod gaussian;
pub mod generate;
pub mod rng;
pub mod solver;
pub mod timer;

pub use board::{Board, Cell, CellState, Situation, MAX_COLUMN_COUNT, MAX_ROW_COUNT};
pub use generate::{
    generate, generate_from_start, max_thread_count, GenerateMode, Restriction, RestrictionMap,
    StateMap, MAX_GENERATE_TIME_LIMIT_MS,
};
pub use rng::GameRng;
pub use solver::{solvable, solvable_within, solve_one_step};
pub use timer::{Timer, MAX_TIME_LIMIT_MS};
