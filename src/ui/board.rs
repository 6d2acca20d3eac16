use std::cell::RefCell;
use std::rc::Rc;

use cairo::Antialias;
use gtk4 as gtk;
use gtk4::pango;
use gtk4::prelude::*;

use super::view::{CARD_FACES, GtkView};
use crate::game::GameController;

pub(super) const CONTENT_MARGIN: i32 = 12;
pub(super) const TILE_GAP: i32 = 6;

pub(super) const GRID_COLS: i32 = 4;
pub(super) const GRID_ROWS: i32 = 4;

/// Builds the 4×4 card grid. Each button dispatches its index through the one
/// shared activation handler; what the button shows is read back from the
/// view's visible-face table at draw time.
pub(super) fn build_board_grid(game: &Rc<RefCell<GameController>>, view: &GtkView) -> gtk::Grid {
    let grid = gtk::Grid::new();
    grid.add_css_class("pairs-board");
    grid.set_row_spacing(TILE_GAP as u32);
    grid.set_column_spacing(TILE_GAP as u32);
    grid.set_halign(gtk::Align::Fill);
    grid.set_valign(gtk::Align::Fill);
    grid.set_hexpand(true);
    grid.set_vexpand(true);

    let mut buttons = Vec::new();

    for i in 0..(GRID_ROWS * GRID_COLS) {
        let index = i as usize;
        let aspect_frame = gtk::AspectFrame::builder()
            .ratio(1.0)
            .obey_child(false)
            .halign(gtk::Align::Fill)
            .valign(gtk::Align::Fill)
            .hexpand(true)
            .vexpand(true)
            .build();

        let button = gtk::Button::builder()
            .css_classes(vec!["pairs-card"])
            .build();
        button.set_hexpand(true);
        button.set_vexpand(true);

        let drawing_area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .build();

        let faces = view.faces.clone();
        drawing_area.set_draw_func(move |area, cr, width, height| {
            let face = faces.borrow().get(index).copied().flatten();
            let text = match face {
                Some(symbol) => CARD_FACES[symbol.0 as usize % CARD_FACES.len()],
                None => "?",
            };

            let min_dim = width.min(height) as f64;
            let font_size = if face.is_some() {
                min_dim * 0.40
            } else {
                min_dim * 0.34
            };

            cr.set_antialias(Antialias::Best);

            let layout = pangocairo::functions::create_layout(cr);
            let mut font_desc = pango::FontDescription::new();
            if face.is_some() {
                font_desc.set_family("Noto Color Emoji, Apple Color Emoji, Segoe UI Emoji, sans");
            } else {
                font_desc.set_family("Cantarell, Noto Sans, sans");
                font_desc.set_weight(pango::Weight::Bold);
            }
            font_desc.set_size((font_size * pango::SCALE as f64) as i32);
            layout.set_font_description(Some(&font_desc));
            layout.set_text(text);

            let fg = area.style_context().color();
            cr.set_source_rgba(
                fg.red() as f64,
                fg.green() as f64,
                fg.blue() as f64,
                fg.alpha() as f64,
            );

            let (text_width, text_height) = layout.pixel_size();
            cr.move_to(
                (width as f64 - text_width as f64) / 2.0,
                (height as f64 - text_height as f64) / 2.0,
            );

            pangocairo::functions::show_layout(cr, &layout);
        });

        button.set_child(Some(&drawing_area));

        let game = game.clone();
        let click_view = view.clone();
        button.connect_clicked(move |_| {
            // connect_clicked wants Fn, so take a local handle clone to
            // satisfy the &mut the core expects.
            let mut view = click_view.clone();
            game.borrow_mut().activate_cell(index, &mut view);
        });

        aspect_frame.set_child(Some(&button));

        let x = i % GRID_COLS;
        let y = i / GRID_COLS;
        grid.attach(&aspect_frame, x, y, 1, 1);
        buttons.push(button);
    }

    *view.buttons.borrow_mut() = buttons;

    grid
}
