use log::{debug, info};
use thiserror::Error;

use super::deck::{Symbol, build_deck};
use super::HIDE_DELAY_MS;

/// Resting state of a cell. "Revealed but not yet matched" is transient and
/// lives in the pending buffer instead, so a cell can never be left stuck
/// face-up by a forgotten flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileState {
    Hidden,
    Matched,
}

/// Board construction rejected at startup. These are programmer errors in the
/// fixed configuration, not runtime conditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("board needs an even, non-zero cell count, got {0}")]
    OddBoard(usize),
    #[error("{cells} cells need {expected} symbols, got {got}")]
    SymbolCount {
        cells: usize,
        expected: usize,
        got: usize,
    },
    #[error("symbol {0:?} appears more than once in the symbol set")]
    DuplicateSymbol(Symbol),
}

/// Everything the core asks of the presentation layer.
///
/// Render callbacks plus two resource requests: running the 1 Hz tick source
/// and scheduling the one-shot mismatch hide. `schedule_hide` carries the
/// generation it was issued under; the view hands it back unchanged through
/// [`GameController::finish_hide`], where a stale generation is dropped.
pub trait BoardView {
    fn show_face(&mut self, pos: usize, symbol: Symbol);
    fn hide_face(&mut self, pos: usize);
    fn time_updated(&mut self, seconds: u32);
    fn board_reset(&mut self);
    fn game_complete(&mut self, seconds: u32);
    fn start_ticking(&mut self);
    fn stop_ticking(&mut self);
    fn schedule_hide(&mut self, delay_ms: u64, pos: usize, generation: u64);
}

#[derive(Clone, Copy, Debug)]
struct Pick {
    pos: usize,
    symbol: Symbol,
}

/// The game-state machine.
///
/// Owns the deck and all per-round state; driven by `activate_cell`, `tick`,
/// `restart`, and `finish_hide` from a single-threaded event source. Holds no
/// widget handles: every visible consequence goes out through the
/// [`BoardView`] passed into each operation.
#[derive(Debug)]
pub struct GameController {
    deck: Vec<Symbol>,
    states: Vec<TileState>,
    symbols: Vec<Symbol>,
    pending: Option<Pick>,
    lock_input: bool,
    timer_started: bool,
    seconds_elapsed: u32,
    generation: u64,
}

impl GameController {
    /// Builds a controller with a freshly shuffled deck.
    ///
    /// Fails fast if the cell count is odd or the symbol set does not cover
    /// exactly half the board with distinct symbols.
    pub fn new(cells: usize, symbols: &[Symbol]) -> Result<Self, SetupError> {
        if cells == 0 || cells % 2 != 0 {
            return Err(SetupError::OddBoard(cells));
        }
        if symbols.len() * 2 != cells {
            return Err(SetupError::SymbolCount {
                cells,
                expected: cells / 2,
                got: symbols.len(),
            });
        }
        for (i, symbol) in symbols.iter().enumerate() {
            if symbols[i + 1..].contains(symbol) {
                return Err(SetupError::DuplicateSymbol(*symbol));
            }
        }

        Ok(GameController {
            deck: build_deck(symbols, &mut rand::rng()),
            states: vec![TileState::Hidden; cells],
            symbols: symbols.to_vec(),
            pending: None,
            lock_input: false,
            timer_started: false,
            seconds_elapsed: 0,
            generation: 0,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.states.iter().all(|s| *s == TileState::Matched)
    }

    /// A cell was clicked. Out-of-range positions, matched cells, re-clicks
    /// of the pending cell, and anything during the mismatch-hide window are
    /// all silent no-ops.
    pub fn activate_cell<V: BoardView>(&mut self, pos: usize, view: &mut V) {
        if pos >= self.deck.len() {
            return;
        }
        if self.lock_input || self.states[pos] == TileState::Matched {
            return;
        }
        if self.pending.is_some_and(|p| p.pos == pos) {
            return;
        }

        if !self.timer_started {
            self.timer_started = true;
            view.start_ticking();
        }

        let symbol = self.deck[pos];
        debug!("cell {pos} activated");
        view.show_face(pos, symbol);

        let Some(first) = self.pending else {
            self.pending = Some(Pick { pos, symbol });
            return;
        };

        if symbol == first.symbol {
            self.states[pos] = TileState::Matched;
            self.states[first.pos] = TileState::Matched;
            self.pending = None;
            if self.is_complete() {
                self.timer_started = false;
                view.stop_ticking();
                info!("round complete in {} s", self.seconds_elapsed);
                view.game_complete(self.seconds_elapsed);
            }
        } else {
            // Keep the first pick around until the scheduled hide flips both
            // cells back; the lock shields it from further input meanwhile.
            self.lock_input = true;
            view.schedule_hide(HIDE_DELAY_MS, pos, self.generation);
        }
    }

    /// The delayed mismatch hide fired. Drops stale callbacks from before a
    /// restart by comparing generations.
    pub fn finish_hide<V: BoardView>(&mut self, pos: usize, generation: u64, view: &mut V) {
        if generation != self.generation || !self.lock_input {
            return;
        }
        view.hide_face(pos);
        if let Some(first) = self.pending.take() {
            view.hide_face(first.pos);
        }
        self.lock_input = false;
    }

    /// One second of wall clock passed. Ignored before the first activation
    /// and after the round is complete.
    pub fn tick<V: BoardView>(&mut self, view: &mut V) {
        if !self.timer_started {
            return;
        }
        self.seconds_elapsed += 1;
        view.time_updated(self.seconds_elapsed);
    }

    /// Reshuffles and resets the whole round. Refused while a mismatch hide
    /// is in flight so the delayed callback cannot land on fresh state.
    pub fn restart<V: BoardView>(&mut self, view: &mut V) {
        if self.lock_input {
            return;
        }
        self.generation = self.generation.wrapping_add(1);
        self.deck = build_deck(&self.symbols, &mut rand::rng());
        for state in &mut self.states {
            *state = TileState::Hidden;
        }
        self.pending = None;
        self.timer_started = false;
        self.seconds_elapsed = 0;
        view.stop_ticking();
        view.board_reset();
        view.time_updated(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Event {
        Show(usize, Symbol),
        Hide(usize),
        Time(u32),
        Reset,
        Complete(u32),
    }

    /// Recording double for the presentation layer. Scheduled hides are
    /// captured instead of executed; tests fire them explicitly.
    #[derive(Default)]
    struct RecordingView {
        events: Vec<Event>,
        scheduled: Vec<(u64, usize, u64)>,
        ticking: bool,
    }

    impl RecordingView {
        fn completions(&self) -> usize {
            self.events
                .iter()
                .filter(|e| matches!(e, Event::Complete(_)))
                .count()
        }
    }

    impl BoardView for RecordingView {
        fn show_face(&mut self, pos: usize, symbol: Symbol) {
            self.events.push(Event::Show(pos, symbol));
        }
        fn hide_face(&mut self, pos: usize) {
            self.events.push(Event::Hide(pos));
        }
        fn time_updated(&mut self, seconds: u32) {
            self.events.push(Event::Time(seconds));
        }
        fn board_reset(&mut self) {
            self.events.push(Event::Reset);
        }
        fn game_complete(&mut self, seconds: u32) {
            self.events.push(Event::Complete(seconds));
        }
        fn start_ticking(&mut self) {
            self.ticking = true;
        }
        fn stop_ticking(&mut self) {
            self.ticking = false;
        }
        fn schedule_hide(&mut self, delay_ms: u64, pos: usize, generation: u64) {
            self.scheduled.push((delay_ms, pos, generation));
        }
    }

    fn symbols(count: u8) -> Vec<Symbol> {
        (0..count).map(Symbol).collect()
    }

    fn game() -> GameController {
        GameController::new(16, &symbols(8)).unwrap()
    }

    /// Positions of one full pair in the shuffled deck.
    fn pair_of(game: &GameController, symbol: Symbol) -> (usize, usize) {
        let mut found = game
            .deck
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == symbol)
            .map(|(i, _)| i);
        (found.next().unwrap(), found.next().unwrap())
    }

    /// Two positions guaranteed to carry different symbols.
    fn mismatch_of(game: &GameController) -> (usize, usize) {
        let second = game
            .deck
            .iter()
            .position(|s| *s != game.deck[0])
            .unwrap();
        (0, second)
    }

    #[test]
    fn construction_rejects_odd_board() {
        assert_eq!(
            GameController::new(15, &symbols(8)).unwrap_err(),
            SetupError::OddBoard(15)
        );
        assert_eq!(
            GameController::new(0, &[]).unwrap_err(),
            SetupError::OddBoard(0)
        );
    }

    #[test]
    fn construction_rejects_wrong_symbol_count() {
        assert_eq!(
            GameController::new(16, &symbols(7)).unwrap_err(),
            SetupError::SymbolCount {
                cells: 16,
                expected: 8,
                got: 7
            }
        );
    }

    #[test]
    fn construction_rejects_duplicate_symbols() {
        let mut set = symbols(8);
        set[7] = set[0];
        assert_eq!(
            GameController::new(16, &set).unwrap_err(),
            SetupError::DuplicateSymbol(set[0])
        );
    }

    #[test]
    fn first_activation_starts_the_timer() {
        let mut game = game();
        let mut view = RecordingView::default();
        assert!(!view.ticking);
        game.activate_cell(0, &mut view);
        assert!(view.ticking);
        assert_eq!(view.events, vec![Event::Show(0, game.deck[0])]);
    }

    #[test]
    fn reactivating_the_pending_cell_is_idempotent() {
        let mut game = game();
        let mut view = RecordingView::default();
        game.activate_cell(3, &mut view);
        game.activate_cell(3, &mut view);
        assert_eq!(view.events, vec![Event::Show(3, game.deck[3])]);
        assert_eq!(game.pending.unwrap().pos, 3);
    }

    #[test]
    fn out_of_range_activation_is_a_no_op() {
        let mut game = game();
        let mut view = RecordingView::default();
        game.activate_cell(16, &mut view);
        assert!(view.events.is_empty());
        assert!(!view.ticking);
    }

    #[test]
    fn matching_pair_stays_matched() {
        let mut game = game();
        let mut view = RecordingView::default();
        let (a, b) = pair_of(&game, Symbol(0));
        game.activate_cell(a, &mut view);
        game.activate_cell(b, &mut view);
        assert_eq!(game.states[a], TileState::Matched);
        assert_eq!(game.states[b], TileState::Matched);
        assert!(game.pending.is_none());
        assert!(view.scheduled.is_empty());
        assert_eq!(view.completions(), 0);
    }

    #[test]
    fn activating_a_matched_cell_changes_nothing() {
        let mut game = game();
        let mut view = RecordingView::default();
        let (a, b) = pair_of(&game, Symbol(0));
        game.activate_cell(a, &mut view);
        game.activate_cell(b, &mut view);
        game.tick(&mut view);
        let elapsed = game.seconds_elapsed;
        let events_before = view.events.len();

        game.activate_cell(a, &mut view);
        assert_eq!(view.events.len(), events_before);
        assert_eq!(game.seconds_elapsed, elapsed);
        assert!(game.pending.is_none());
        assert_eq!(game.states[a], TileState::Matched);
    }

    #[test]
    fn mismatch_locks_until_the_scheduled_hide_fires() {
        let mut game = game();
        let mut view = RecordingView::default();
        let (a, b) = mismatch_of(&game);
        game.activate_cell(a, &mut view);
        game.activate_cell(b, &mut view);

        assert!(game.lock_input);
        assert_eq!(view.scheduled, vec![(HIDE_DELAY_MS, b, game.generation)]);

        // Every activation inside the window is swallowed.
        let events_before = view.events.len();
        for pos in 0..16 {
            game.activate_cell(pos, &mut view);
        }
        assert_eq!(view.events.len(), events_before);

        let (_, pos, generation) = view.scheduled[0];
        game.finish_hide(pos, generation, &mut view);
        assert!(!game.lock_input);
        assert!(game.pending.is_none());
        let hides: Vec<_> = view
            .events
            .iter()
            .filter(|e| matches!(e, Event::Hide(_)))
            .collect();
        assert_eq!(hides, vec![&Event::Hide(b), &Event::Hide(a)]);
    }

    #[test]
    fn mismatch_schedules_exactly_one_hide() {
        let mut game = game();
        let mut view = RecordingView::default();
        let (a, b) = mismatch_of(&game);
        game.activate_cell(a, &mut view);
        game.activate_cell(b, &mut view);
        game.activate_cell(a, &mut view);
        game.activate_cell(b, &mut view);
        assert_eq!(view.scheduled.len(), 1);
    }

    #[test]
    fn stale_hide_callback_is_ignored() {
        let mut game = game();
        let mut view = RecordingView::default();
        let (a, b) = mismatch_of(&game);
        game.activate_cell(a, &mut view);
        game.activate_cell(b, &mut view);
        let (_, pos, generation) = view.scheduled[0];

        game.finish_hide(pos, generation, &mut view);
        game.restart(&mut view);
        let events_after_restart = view.events.len();

        // Firing the old callback again, now against the new round.
        game.finish_hide(pos, generation, &mut view);
        assert_eq!(view.events.len(), events_after_restart);
        assert!(!game.lock_input);
    }

    #[test]
    fn restart_is_refused_while_a_hide_is_in_flight() {
        let mut game = game();
        let mut view = RecordingView::default();
        let (a, b) = mismatch_of(&game);
        game.activate_cell(a, &mut view);
        game.activate_cell(b, &mut view);
        game.tick(&mut view);

        let deck_before = game.deck.clone();
        game.restart(&mut view);
        assert!(game.lock_input);
        assert_eq!(game.deck, deck_before);
        assert_eq!(game.seconds_elapsed, 1);
        assert!(!view.events.contains(&Event::Reset));

        // Once the hide lands, restart goes through.
        let (_, pos, generation) = view.scheduled[0];
        game.finish_hide(pos, generation, &mut view);
        game.restart(&mut view);
        assert!(view.events.contains(&Event::Reset));
        assert_eq!(game.seconds_elapsed, 0);
        assert!(game.pending.is_none());
        assert!(game.states.iter().all(|s| *s == TileState::Hidden));
    }

    #[test]
    fn restart_resets_timer_and_emits_zero() {
        let mut game = game();
        let mut view = RecordingView::default();
        game.activate_cell(0, &mut view);
        game.tick(&mut view);
        game.tick(&mut view);
        assert_eq!(game.seconds_elapsed, 2);

        game.restart(&mut view);
        assert!(!view.ticking);
        assert!(!game.timer_started);
        assert_eq!(*view.events.last().unwrap(), Event::Time(0));

        // Timer only rearms on the next activation.
        game.tick(&mut view);
        assert_eq!(game.seconds_elapsed, 0);
    }

    #[test]
    fn tick_is_ignored_before_the_first_activation() {
        let mut game = game();
        let mut view = RecordingView::default();
        game.tick(&mut view);
        assert_eq!(game.seconds_elapsed, 0);
        assert!(view.events.is_empty());
    }

    #[test]
    fn completing_the_board_signals_once_with_elapsed_time() {
        let mut game = game();
        let mut view = RecordingView::default();
        game.tick(&mut view); // pre-game tick, must not count

        for i in 0..8 {
            let (a, b) = pair_of(&game, Symbol(i));
            game.activate_cell(a, &mut view);
            game.tick(&mut view);
            game.activate_cell(b, &mut view);
        }

        assert!(game.is_complete());
        assert_eq!(view.completions(), 1);
        assert!(view.events.contains(&Event::Complete(8)));
        assert!(!view.ticking);

        // Frozen after the win: no more time, no more reveals.
        game.tick(&mut view);
        assert_eq!(game.seconds_elapsed, 8);
        let events_before = view.events.len();
        game.activate_cell(0, &mut view);
        assert_eq!(view.events.len(), events_before);
    }

    #[test]
    fn restart_after_completion_starts_a_fresh_round() {
        let mut game = game();
        let mut view = RecordingView::default();
        for i in 0..8 {
            let (a, b) = pair_of(&game, Symbol(i));
            game.activate_cell(a, &mut view);
            game.activate_cell(b, &mut view);
        }
        assert!(game.is_complete());

        game.restart(&mut view);
        assert!(!game.is_complete());
        assert_eq!(game.seconds_elapsed, 0);

        let (a, b) = pair_of(&game, Symbol(0));
        game.activate_cell(a, &mut view);
        game.activate_cell(b, &mut view);
        assert_eq!(game.states[a], TileState::Matched);
    }
}
