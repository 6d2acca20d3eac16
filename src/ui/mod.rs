pub mod app;
mod board;
mod dialogs;
mod view;
