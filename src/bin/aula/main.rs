//! aula - terminal front-end for the classroom audio core
//!
//! Keyboard keys play notes with the selected instrument, `c` strums a chord,
//! `t` toggles the chromatic tuner.
//!
//! Run with: cargo run

mod app;
mod ui;

use app::App;

fn main() -> color_eyre::Result<()> {
    env_logger::init();
    color_eyre::install()?;

    App::new().run()
}
