//! Color palette for the visualizer.
//!
//! Hues follow the classic pathfinding-demo scheme: green frontier, red
//! visited cells, blue endpoints and path. RGB values are chosen to read
//! well on a dark terminal background.

use stepfind_core::style::Color;

// -- Backgrounds --

/// Default terminal background (reset).
pub const BG: Color = Color::DEFAULT;
/// Status and hint rows — a visible-but-subtle dark shade.
pub const BG_STATUS: Color = Color::from_rgb(40, 42, 54);

// -- Foregrounds --

/// Default terminal foreground (reset).
pub const FG: Color = Color::DEFAULT;
/// Dimmed foreground for empty cells and hints.
pub const FG_DIM: Color = Color::from_rgb(98, 100, 106);
/// Bright white for emphasis.
pub const FG_EMPH: Color = Color::from_rgb(248, 248, 242);

// -- Cell states --

/// Obstacle '#' — light blue-grey, bold.
pub const OBSTACLE_FG: Color = Color::from_rgb(150, 155, 170);
/// Frontier (open set) — green.
pub const FRONTIER_FG: Color = Color::from_rgb(80, 200, 80);
/// Visited (closed set) — red.
pub const VISITED_FG: Color = Color::from_rgb(255, 85, 85);
/// Revealed path — blue.
pub const PATH_FG: Color = Color::from_rgb(100, 130, 255);
/// Start and end markers — bright blue.
pub const MARK_FG: Color = Color::from_rgb(100, 160, 255);
