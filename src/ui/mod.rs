//! Terminal front-end: a song gallery beside the ceremony timeline, with
//! modal overlays for choosing moments, reading lyrics, confirming, and
//! sending the selection.

mod app;
mod forms;
mod helpers;
mod preview;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
