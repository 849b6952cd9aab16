//! stepfind — an interactive A* pathfinding visualizer for the terminal.
//!
//! Keys 1-5 arm an editing mode (clear all, paint obstacles, erase
//! obstacles, move start, move end); clicks apply it. Enter starts the
//! search; Escape, q or Ctrl+C quit.

use stepfind_core::app::{App, AppConfig};
use stepfind_crossterm::CrosstermDriver;

use stepfind_lib::{UI_HEIGHT, UI_WIDTH, VizModel};

fn main() {
    let model = VizModel::new();
    let driver = CrosstermDriver::new();
    let mut app = App::new(AppConfig {
        model,
        driver,
        width: UI_WIDTH,
        height: UI_HEIGHT,
    });
    if let Err(e) = app.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
