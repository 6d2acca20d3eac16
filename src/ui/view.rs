use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;

use super::dialogs::show_victory_dialog;
use crate::game::{BoardView, GameController, PAIR_COUNT, Symbol, TICK_INTERVAL_MS};

/// On-screen faces, one per symbol. The core never sees these; it speaks in
/// [`Symbol`] indices and this table is the last-mile translation.
pub(super) const CARD_FACES: [&str; PAIR_COUNT] = ["🐶", "🦊", "🐼", "🐸", "🦄", "🐙", "🦀", "🐢"];

/// GTK side of the presentation contract.
///
/// Tracks only which face is currently visible per cell; the truth about
/// matches and locks stays in the core. All fields are shared handles, so the
/// view clones freely into the closures the core's scheduling requests spawn.
#[derive(Clone)]
pub(super) struct GtkView {
    game: Weak<RefCell<GameController>>,
    pub(super) buttons: Rc<RefCell<Vec<gtk::Button>>>,
    pub(super) faces: Rc<RefCell<Vec<Option<Symbol>>>>,
    timer_label: gtk::Label,
    window: Rc<RefCell<Option<adw::ApplicationWindow>>>,
    tick_source: Rc<RefCell<Option<glib::SourceId>>>,
}

impl GtkView {
    pub(super) fn new(game: &Rc<RefCell<GameController>>, cells: usize, timer_label: gtk::Label) -> Self {
        GtkView {
            game: Rc::downgrade(game),
            buttons: Rc::new(RefCell::new(Vec::new())),
            faces: Rc::new(RefCell::new(vec![None; cells])),
            timer_label,
            window: Rc::new(RefCell::new(None)),
            tick_source: Rc::new(RefCell::new(None)),
        }
    }

    pub(super) fn set_window(&self, window: &adw::ApplicationWindow) {
        *self.window.borrow_mut() = Some(window.clone());
    }

    fn redraw(&self, pos: usize) {
        if let Some(button) = self.buttons.borrow().get(pos)
            && let Some(child) = button.child()
        {
            child.queue_draw();
        }
    }
}

impl BoardView for GtkView {
    fn show_face(&mut self, pos: usize, symbol: Symbol) {
        if let Some(face) = self.faces.borrow_mut().get_mut(pos) {
            *face = Some(symbol);
        }
        if let Some(button) = self.buttons.borrow().get(pos) {
            button.add_css_class("active");
        }
        self.redraw(pos);
    }

    fn hide_face(&mut self, pos: usize) {
        if let Some(face) = self.faces.borrow_mut().get_mut(pos) {
            *face = None;
        }
        if let Some(button) = self.buttons.borrow().get(pos) {
            button.remove_css_class("active");
        }
        self.redraw(pos);
    }

    fn time_updated(&mut self, seconds: u32) {
        self.timer_label
            .set_text(&format!("{:02}:{:02}", seconds / 60, seconds % 60));
    }

    fn board_reset(&mut self) {
        for face in self.faces.borrow_mut().iter_mut() {
            *face = None;
        }
        for button in self.buttons.borrow().iter() {
            button.remove_css_class("active");
            if let Some(child) = button.child() {
                child.queue_draw();
            }
        }
    }

    fn game_complete(&mut self, seconds: u32) {
        let window = self.window.borrow().clone();
        let dialog = show_victory_dialog(window.as_ref(), seconds);
        let game = self.game.clone();
        let view = self.clone();
        dialog.connect_response(Some("again"), move |_, _| {
            if let Some(game) = game.upgrade() {
                let mut view = view.clone();
                game.borrow_mut().restart(&mut view);
            }
        });
    }

    fn start_ticking(&mut self) {
        self.stop_ticking();
        let game = self.game.clone();
        let mut view = self.clone();
        let source = glib::timeout_add_local(
            std::time::Duration::from_millis(TICK_INTERVAL_MS),
            move || {
                let Some(game) = game.upgrade() else {
                    return glib::ControlFlow::Break;
                };
                game.borrow_mut().tick(&mut view);
                glib::ControlFlow::Continue
            },
        );
        *self.tick_source.borrow_mut() = Some(source);
    }

    fn stop_ticking(&mut self) {
        if let Some(source) = self.tick_source.borrow_mut().take() {
            source.remove();
        }
    }

    fn schedule_hide(&mut self, delay_ms: u64, pos: usize, generation: u64) {
        let game = self.game.clone();
        let mut view = self.clone();
        glib::timeout_add_local_once(std::time::Duration::from_millis(delay_ms), move || {
            if let Some(game) = game.upgrade() {
                game.borrow_mut().finish_hide(pos, generation, &mut view);
            }
        });
    }
}
