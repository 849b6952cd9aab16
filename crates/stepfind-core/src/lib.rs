//! **stepfind-core** — Grid visualizer framework (core types).
//!
//! This crate provides the foundational types used across the *stepfind*
//! workspace: geometry primitives, styled cells, a shared-buffer canvas,
//! input events, and the Elm-architecture application loop.

pub mod app;
pub mod canvas;
pub mod cell;
pub mod geom;
pub mod messages;
pub mod style;

pub use app::{App, AppConfig, Context, Driver, Effect, Model, cmd};
pub use canvas::{Canvas, Frame, FrameCell, compute_frame};
pub use cell::Cell;
pub use geom::{Point, Range};
pub use messages::*;
pub use style::{AttrMask, Color, Style};
