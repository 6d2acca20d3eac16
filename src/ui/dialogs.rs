use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

pub(super) fn show_victory_dialog(
    parent: Option<&adw::ApplicationWindow>,
    seconds: u32,
) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(
        Some("You Won!"),
        Some(&format!(
            "Every pair found in {:02}:{:02}.",
            seconds / 60,
            seconds % 60
        )),
    );
    dialog.add_response("close", "Close");
    dialog.add_response("again", "Play Again");
    dialog.set_response_appearance("again", adw::ResponseAppearance::Suggested);
    dialog.set_default_response(Some("again"));
    dialog.set_close_response("close");
    dialog.present(parent);
    dialog
}

pub(super) fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(
        Some("Instructions"),
        Some(
            "Reveal cards two at a time to find matching pairs.\n\
Matches stay face up; mismatches flip back after a moment.\n\
Clear the board in the best time you can.",
        ),
    );
    dialog.add_response("ok", "Got it");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub(super) fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Pairs")
        .application_icon("io.github.pairsgame.Pairs")
        .version("0.1.0")
        .comments("A memory game for finding pairs.")
        .build();
    dialog.add_legal_section("Pairs", None, gtk::License::MitX11, None);
    dialog.present(app.active_window().as_ref());
    dialog
}
