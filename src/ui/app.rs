use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;
use gio::SimpleAction;

use super::board::{CONTENT_MARGIN, GRID_COLS, GRID_ROWS, build_board_grid};
use super::dialogs::{show_about_dialog, show_instructions_dialog};
use super::view::GtkView;
use crate::game::{BOARD_CELLS, GameController, PAIR_COUNT, Symbol};

const APP_ID: &str = "io.github.pairsgame.Pairs";

pub fn run() {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        load_css();

        let symbols: Vec<Symbol> = (0..PAIR_COUNT as u8).map(Symbol).collect();
        let game = Rc::new(RefCell::new(
            GameController::new(BOARD_CELLS, &symbols).expect("invalid board configuration"),
        ));

        let instructions_action = SimpleAction::new("instructions", None);
        instructions_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_instructions_dialog(&app);
            }
        });
        app.add_action(&instructions_action);

        let about_action = SimpleAction::new("about", None);
        about_action.connect_activate({
            let app = app.clone();
            move |_, _| {
                show_about_dialog(&app);
            }
        });
        app.add_action(&about_action);

        let quit_action = SimpleAction::new("quit", None);
        quit_action.connect_activate({
            let app = app.clone();
            move |_, _| app.quit()
        });
        app.add_action(&quit_action);

        let title_box = gtk::Box::new(gtk::Orientation::Vertical, 0);
        title_box.set_valign(gtk::Align::Center);
        title_box.set_halign(gtk::Align::Center);

        let title_main = gtk::Label::builder()
            .label("Pairs")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-main"])
            .build();

        let timer_label = gtk::Label::builder()
            .label("00:00")
            .halign(gtk::Align::Center)
            .css_classes(vec!["game-title-subtitle", "caption"])
            .build();

        title_box.append(&title_main);
        title_box.append(&timer_label);

        let view = GtkView::new(&game, BOARD_CELLS, timer_label);

        let header = adw::HeaderBar::builder().title_widget(&title_box).build();
        header.add_css_class("app-header");
        header.add_css_class("flat");

        let menu_model = gio::Menu::new();
        menu_model.append(Some("Instructions"), Some("app.instructions"));
        menu_model.append(Some("About Pairs"), Some("app.about"));
        menu_model.append(Some("Quit"), Some("app.quit"));
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&menu_model)
            .build();

        let restart_button = gtk::Button::builder()
            .icon_name("view-refresh-symbolic")
            .build();
        restart_button.set_tooltip_text(Some("New Game"));
        restart_button.connect_clicked({
            let game = game.clone();
            let view = view.clone();
            move |_| {
                let mut view = view.clone();
                game.borrow_mut().restart(&mut view);
            }
        });

        let end_box = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        end_box.append(&restart_button);
        end_box.append(&menu_button);
        header.pack_end(&end_box);

        let game_view = build_game_view(&game, &view);

        let toolbar = adw::ToolbarView::new();
        toolbar.set_hexpand(true);
        toolbar.set_vexpand(true);
        toolbar.add_top_bar(&header);
        toolbar.set_content(Some(&game_view));

        let win = adw::ApplicationWindow::builder()
            .application(app)
            .title("Pairs")
            .default_width(640)
            .default_height(720)
            .content(&toolbar)
            .build();
        win.set_size_request(360, 460);
        win.add_css_class("app-window");
        view.set_window(&win);

        win.present();
    });

    app.run();
}

fn load_css() {
    let Some(display) = gtk::gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_data(include_str!("../../data/style.css"));
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn build_game_view(game: &Rc<RefCell<GameController>>, view: &GtkView) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");

    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_hexpand(true);
    content.set_vexpand(true);
    content.set_halign(gtk::Align::Fill);
    content.set_valign(gtk::Align::Fill);
    content.set_margin_top(CONTENT_MARGIN);
    content.set_margin_bottom(CONTENT_MARGIN);
    content.set_margin_start(CONTENT_MARGIN);
    content.set_margin_end(CONTENT_MARGIN);

    let board_grid = build_board_grid(game, view);

    let board_card = gtk::Box::new(gtk::Orientation::Vertical, 0);
    board_card.set_halign(gtk::Align::Fill);
    board_card.set_valign(gtk::Align::Fill);
    board_card.set_hexpand(true);
    board_card.set_vexpand(true);
    board_card.add_css_class("pairs-card-container");

    let grid_ratio = GRID_COLS as f32 / GRID_ROWS as f32;
    let grid_frame = gtk::AspectFrame::new(0.5, 0.5, grid_ratio, false);
    grid_frame.set_halign(gtk::Align::Fill);
    grid_frame.set_valign(gtk::Align::Fill);
    grid_frame.set_hexpand(true);
    grid_frame.set_vexpand(true);
    grid_frame.set_child(Some(&board_grid));
    board_card.append(&grid_frame);

    content.append(&board_card);
    root.append(&content);

    root
}
