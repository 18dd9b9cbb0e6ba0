//! Ratatui front-end: a two-month booking calendar with membership switching,
//! the progressive booking wizard and the outbox listing.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
