//! Game core: deck, state machine, and the presentation-sink contract.
//!
//! Everything in this module is UI-free and runs entirely on whatever
//! single-threaded event source drives it. The widgets live in `crate::ui`
//! and only ever talk to the core through [`GameController`] and
//! [`BoardView`].

mod controller;
mod deck;

pub use controller::{BoardView, GameController, SetupError, TileState};
pub use deck::Symbol;

/// Number of cells on the board. Must stay even.
pub const BOARD_CELLS: usize = 16;

/// Number of distinct symbols, each dealt twice.
pub const PAIR_COUNT: usize = BOARD_CELLS / 2;

/// How long a mismatched pair stays revealed before flipping back.
pub const HIDE_DELAY_MS: u64 = 1000;

/// Interval of the elapsed-time tick source.
pub const TICK_INTERVAL_MS: u64 = 1000;
