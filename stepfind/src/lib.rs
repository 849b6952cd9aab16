//! stepfind — an interactive A* pathfinding visualizer for the terminal.

pub mod colors;
pub mod model;
pub mod session;

pub use model::{UI_HEIGHT, UI_WIDTH, VizModel};
pub use session::{Mode, Outcome, Phase, Session, VisualState};
