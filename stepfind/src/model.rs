//! Elm-architecture Model implementation.

use std::thread;
use std::time::Duration;

use stepfind_core::{
    Cell, Point, Range,
    app::{Effect, cmd},
    canvas::Canvas,
    messages::{Key, ModMask, Msg, MouseAction},
    style::{AttrMask, Style},
};

use crate::colors::*;
use crate::session::{Mode, Outcome, Phase, Session, VisualState};

pub const BOARD_WIDTH: i32 = 40;
pub const BOARD_HEIGHT: i32 = 20;
pub const UI_WIDTH: i32 = BOARD_WIDTH;
/// Board plus a status row and a key-hint row.
pub const UI_HEIGHT: i32 = BOARD_HEIGHT + 2;

const SEARCH_TICK: Duration = Duration::from_millis(90);
const BACKTRACK_TICK: Duration = Duration::from_millis(35);

/// The visualizer model: a [`Session`] plus the tick schedule around it.
pub struct VizModel {
    session: Session,
    /// Identifies the current tick chain; ticks from a superseded chain are
    /// discarded so a restarted run never double-steps.
    token: u64,
}

impl Default for VizModel {
    fn default() -> Self {
        Self::new()
    }
}

impl VizModel {
    pub fn new() -> Self {
        Self {
            session: Session::new(BOARD_WIDTH, BOARD_HEIGHT),
            token: 0,
        }
    }
}

impl stepfind_core::app::Model for VizModel {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init => None,
            Msg::KeyDown { key, modifiers, .. } => self.handle_key(key, modifiers),
            Msg::Mouse { action, pos, .. } => {
                if action == MouseAction::Main {
                    self.session.click(pos);
                }
                None
            }
            Msg::Tick { token, .. } => {
                if token != self.token {
                    return None;
                }
                self.session.tick();
                self.schedule_next()
            }
            Msg::Quit => Some(Effect::End),
            Msg::Screen { .. } => None,
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.fill(Cell::default());
        self.draw_board(canvas);
        self.draw_status(canvas);
        self.draw_hints(canvas);
    }
}

impl VizModel {
    // -------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------

    fn handle_key(&mut self, key: Key, modifiers: ModMask) -> Option<Effect> {
        if modifiers.contains(ModMask::CTRL) {
            if key == Key::Char('c') {
                return Some(Effect::End);
            }
            return None;
        }
        match key {
            Key::Char('1') => self.arm(Mode::ClearAll),
            Key::Char('2') => self.arm(Mode::PaintObstacle),
            Key::Char('3') => self.arm(Mode::EraseObstacle),
            Key::Char('4') => self.arm(Mode::SetStart),
            Key::Char('5') => self.arm(Mode::SetEnd),
            Key::Enter => {
                self.session.begin_search();
                // supersede any tick still in flight from a previous run
                self.token = self.token.wrapping_add(1);
                Some(self.schedule(SEARCH_TICK))
            }
            Key::Escape | Key::Char('q') => Some(Effect::End),
            _ => None,
        }
    }

    fn arm(&mut self, mode: Mode) -> Option<Effect> {
        self.session.set_mode(mode);
        None
    }

    /// A one-shot command that sleeps, then delivers the next tick.
    fn schedule(&self, delay: Duration) -> Effect {
        let token = self.token;
        cmd(move || {
            thread::sleep(delay);
            Some(Msg::tick(token))
        })
    }

    fn schedule_next(&self) -> Option<Effect> {
        match self.session.phase() {
            Phase::Searching(_) => Some(self.schedule(SEARCH_TICK)),
            Phase::Backtracking(_) => Some(self.schedule(BACKTRACK_TICK)),
            Phase::Editing | Phase::Done(_) => None,
        }
    }

    // -------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------

    fn draw_board(&self, canvas: &mut Canvas) {
        let area = canvas.slice(Range::new(0, 0, BOARD_WIDTH, BOARD_HEIGHT));
        for (p, _) in self.session.board().iter() {
            let (ch, style) = cell_look(self.session.visual_at(p));
            area.set(p, Cell::default().with_char(ch).with_style(style));
        }
    }

    fn draw_status(&self, canvas: &mut Canvas) {
        let mode = match self.session.mode() {
            Some(m) => m.label(),
            None => "none",
        };
        let phase = match self.session.phase() {
            Phase::Editing => "editing".to_string(),
            Phase::Searching(_) => "searching...".to_string(),
            Phase::Backtracking(_) => "tracing path...".to_string(),
            Phase::Done(Outcome::Found) => {
                format!("path found ({} cells)", self.session.path().len())
            }
            Phase::Done(Outcome::NoPath) => "no path".to_string(),
        };
        let text = format!(" mode:{mode:<6} {phase}");
        let style = Style::default().with_fg(FG_EMPH).with_bg(BG_STATUS);
        draw_row(canvas, BOARD_HEIGHT, &text, style);
    }

    fn draw_hints(&self, canvas: &mut Canvas) {
        let style = Style::default().with_fg(FG_DIM).with_bg(BG_STATUS);
        draw_row(
            canvas,
            BOARD_HEIGHT + 1,
            " 1-5 mode  click edit  enter run  q quit",
            style,
        );
    }
}

/// Fill row `y` with `style` and write `text` from the left edge.
fn draw_row(canvas: &mut Canvas, y: i32, text: &str, style: Style) {
    let row = canvas.slice(Range::new(0, y, UI_WIDTH, y + 1));
    row.fill(Cell::default().with_style(style));
    for (x, ch) in text.chars().enumerate() {
        if x >= UI_WIDTH as usize {
            break;
        }
        row.set(
            Point::new(x as i32, y),
            Cell::default().with_char(ch).with_style(style),
        );
    }
}

/// Glyph and style for each cell state.
fn cell_look(state: VisualState) -> (char, Style) {
    match state {
        VisualState::Default => ('·', Style::default().with_fg(FG_DIM)),
        VisualState::Obstacle => (
            '#',
            Style::default().with_fg(OBSTACLE_FG).with_attrs(AttrMask::BOLD),
        ),
        VisualState::Start => (
            'S',
            Style::default().with_fg(MARK_FG).with_attrs(AttrMask::BOLD),
        ),
        VisualState::End => (
            'E',
            Style::default().with_fg(MARK_FG).with_attrs(AttrMask::BOLD),
        ),
        VisualState::Frontier => ('+', Style::default().with_fg(FRONTIER_FG)),
        VisualState::Visited => ('x', Style::default().with_fg(VISITED_FG)),
        VisualState::Path => (
            'o',
            Style::default().with_fg(PATH_FG).with_attrs(AttrMask::BOLD),
        ),
    }
}
