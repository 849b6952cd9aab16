//! Incremental A* search over an obstacle board.
//!
//! This crate provides the pathfinding half of the *stepfind* workspace:
//!
//! - **[`Board`]** — an arena of per-cell search state (obstacle flag, cost
//!   triple, parent link, open/closed membership) with designated start and
//!   end cells.
//! - **[`Astar`]** — a steppable A* engine: each [`Astar::step`] call expands
//!   exactly one cell and reports a [`StepResult`], so an external scheduler
//!   can animate the search.
//! - **[`Backtrack`]** / **[`reconstruct`]** — walk parent links from the
//!   goal back to the start, stepwise or in one go.
//!
//! Movement is 8-connected with octile costs (straight 10, diagonal 14); the
//! same metric serves as the heuristic.

mod astar;
mod backtrack;
mod board;
mod distance;

pub use astar::{Astar, StepResult};
pub use backtrack::{Backtrack, reconstruct};
pub use board::{Board, OutOfBounds, SearchSet, Tile};
pub use distance::{chebyshev, octile};
