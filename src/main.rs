mod game;
mod ui;

fn main() {
    env_logger::init();
    ui::app::run();
}
