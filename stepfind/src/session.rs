//! Session control: editing modes, search orchestration, per-cell visual
//! state (separate from the UI model).

use stepfind_core::Point;
use stepfind_paths::{Astar, Backtrack, Board, SearchSet, StepResult};

/// What a click on the board does. No mode is active until the user picks
/// one; clicks before that are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Wipe the whole board back to its default state.
    ClearAll,
    /// Mark the clicked cell as an obstacle.
    PaintObstacle,
    /// Unmark the clicked cell.
    EraseObstacle,
    /// Move the start designation to the clicked cell.
    SetStart,
    /// Move the end designation to the clicked cell.
    SetEnd,
}

impl Mode {
    /// Short label for the status row.
    pub fn label(self) -> &'static str {
        match self {
            Mode::ClearAll => "clear",
            Mode::PaintObstacle => "wall",
            Mode::EraseObstacle => "erase",
            Mode::SetStart => "start",
            Mode::SetEnd => "end",
        }
    }
}

/// Where the session is in its lifecycle. The engine and the walk live
/// inside their phases, so a phase change drops their state wholesale.
pub enum Phase {
    /// Accepting board edits; no run in progress.
    Editing,
    /// A search is stepping toward the goal.
    Searching(Astar),
    /// The goal was reached; the path is being revealed cell by cell.
    Backtracking(Backtrack),
    /// A run finished with this outcome.
    Done(Outcome),
}

/// Terminal outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The goal was reached and the full path has been revealed.
    Found,
    /// The open set ran dry; no route exists.
    NoPath,
}

/// How a single cell should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    Default,
    Obstacle,
    Start,
    End,
    Frontier,
    Visited,
    Path,
}

/// Owns the board and drives search runs from external triggers: mode
/// selection, clicks, a begin-search key, and scheduled ticks.
pub struct Session {
    board: Board,
    mode: Option<Mode>,
    phase: Phase,
    path: Vec<Point>,
}

impl Session {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            board: Board::new(width, height),
            mode: None,
            phase: Phase::Editing,
            path: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Cells of the path revealed so far, goal first.
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Arm an editing mode. Selecting a mode never touches the board; only
    /// the next click acts on it.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = Some(mode);
    }

    /// Apply the armed mode at `p`. Returns whether anything was applied.
    ///
    /// Any applied edit cancels an active run and drops stale search
    /// visuals, so the board a new search starts from is always the board
    /// the user sees. Painting an obstacle on the current start or end cell
    /// is rejected.
    pub fn click(&mut self, p: Point) -> bool {
        if !self.board.contains(p) {
            return false;
        }
        let Some(mode) = self.mode else {
            return false;
        };
        match mode {
            Mode::ClearAll => {
                self.cancel_run();
                self.board.reset_all();
                true
            }
            Mode::PaintObstacle => {
                if p == self.board.start() || p == self.board.end() {
                    return false;
                }
                self.cancel_run();
                self.board.set_obstacle(p, true).is_ok()
            }
            Mode::EraseObstacle => {
                self.cancel_run();
                self.board.set_obstacle(p, false).is_ok()
            }
            Mode::SetStart => {
                self.cancel_run();
                self.board.set_start(p).is_ok()
            }
            Mode::SetEnd => {
                self.cancel_run();
                self.board.set_end(p).is_ok()
            }
        }
    }

    /// Start (or restart) a search run from the current board.
    pub fn begin_search(&mut self) {
        self.path.clear();
        self.phase = Phase::Searching(Astar::begin(&mut self.board));
        log::debug!(
            "search started: {} -> {}",
            self.board.start(),
            self.board.end()
        );
    }

    /// Advance one unit of work: one expansion while searching, one revealed
    /// path cell while backtracking. A no-op in other phases.
    pub fn tick(&mut self) {
        let phase = std::mem::replace(&mut self.phase, Phase::Editing);
        self.phase = match phase {
            Phase::Searching(mut search) => match search.step(&mut self.board) {
                StepResult::Expanded(_) => Phase::Searching(search),
                StepResult::GoalReached => {
                    log::debug!("goal reached, revealing path");
                    Phase::Backtracking(Backtrack::new(search.goal()))
                }
                StepResult::Exhausted => {
                    log::debug!("open set exhausted, no path");
                    Phase::Done(Outcome::NoPath)
                }
            },
            Phase::Backtracking(mut walk) => match walk.step(&self.board) {
                Some(p) => {
                    self.path.push(p);
                    Phase::Backtracking(walk)
                }
                None => {
                    log::debug!("path revealed ({} cells)", self.path.len());
                    Phase::Done(Outcome::Found)
                }
            },
            other => other,
        };
    }

    /// The render state of the cell at `p`. Start and end win over every
    /// search marking, the revealed path over set membership.
    pub fn visual_at(&self, p: Point) -> VisualState {
        if p == self.board.start() {
            return VisualState::Start;
        }
        if p == self.board.end() {
            return VisualState::End;
        }
        if self.path.contains(&p) {
            return VisualState::Path;
        }
        let Ok(tile) = self.board.tile(p) else {
            return VisualState::Default;
        };
        if tile.obstacle {
            return VisualState::Obstacle;
        }
        match tile.set {
            Some(SearchSet::Closed) => VisualState::Visited,
            Some(SearchSet::Open) => VisualState::Frontier,
            None => VisualState::Default,
        }
    }

    /// Back to `Editing`, dropping the active run's state and scratch.
    fn cancel_run(&mut self) {
        self.phase = Phase::Editing;
        self.path.clear();
        self.board.clear_search();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive ticks until the session settles in `Done`, with a safety bound.
    fn run_to_done(s: &mut Session) -> Outcome {
        let bound = 4 * s.board().bounds().len();
        for _ in 0..bound {
            s.tick();
            if let Phase::Done(outcome) = s.phase() {
                return *outcome;
            }
        }
        panic!("session did not finish within {bound} ticks");
    }

    #[test]
    fn clicks_require_a_mode() {
        let mut s = Session::new(6, 6);
        assert!(!s.click(Point::new(2, 2)));
        assert!(!s.board().tile(Point::new(2, 2)).unwrap().obstacle);
    }

    #[test]
    fn paint_and_erase() {
        let mut s = Session::new(6, 6);
        s.set_mode(Mode::PaintObstacle);
        assert!(s.click(Point::new(2, 2)));
        assert!(s.board().tile(Point::new(2, 2)).unwrap().obstacle);
        assert_eq!(s.visual_at(Point::new(2, 2)), VisualState::Obstacle);

        s.set_mode(Mode::EraseObstacle);
        assert!(s.click(Point::new(2, 2)));
        assert!(!s.board().tile(Point::new(2, 2)).unwrap().obstacle);
    }

    #[test]
    fn painting_start_or_end_is_rejected() {
        let mut s = Session::new(6, 6);
        s.set_mode(Mode::PaintObstacle);
        assert!(!s.click(s.board().start()));
        assert!(!s.click(s.board().end()));
        assert!(!s.board().tile(s.board().start()).unwrap().obstacle);
        assert!(!s.board().tile(s.board().end()).unwrap().obstacle);
    }

    #[test]
    fn clicks_off_the_board_are_ignored() {
        let mut s = Session::new(6, 6);
        s.set_mode(Mode::PaintObstacle);
        assert!(!s.click(Point::new(6, 0)));
        assert!(!s.click(Point::new(-1, 3)));
    }

    #[test]
    fn moving_designations() {
        let mut s = Session::new(6, 6);
        s.set_mode(Mode::SetStart);
        assert!(s.click(Point::new(3, 3)));
        assert_eq!(s.board().start(), Point::new(3, 3));
        assert_eq!(s.visual_at(Point::new(3, 3)), VisualState::Start);
        // the old start cell went back to normal
        assert_eq!(s.visual_at(Point::new(0, 0)), VisualState::Default);

        s.set_mode(Mode::SetEnd);
        assert!(s.click(Point::new(1, 1)));
        assert_eq!(s.board().end(), Point::new(1, 1));
        assert_eq!(s.visual_at(Point::new(1, 1)), VisualState::End);
    }

    #[test]
    fn clear_all_restores_defaults() {
        let mut s = Session::new(6, 6);
        s.set_mode(Mode::PaintObstacle);
        s.click(Point::new(2, 2));
        s.set_mode(Mode::SetStart);
        s.click(Point::new(4, 4));

        s.set_mode(Mode::ClearAll);
        assert!(s.click(Point::new(0, 0)));
        assert_eq!(s.board().start(), Point::new(0, 0));
        assert_eq!(s.board().end(), Point::new(5, 5));
        assert!(!s.board().tile(Point::new(2, 2)).unwrap().obstacle);
        assert!(matches!(s.phase(), Phase::Editing));
    }

    #[test]
    fn run_finds_a_path() {
        let mut s = Session::new(6, 6);
        s.begin_search();
        assert!(matches!(s.phase(), Phase::Searching(_)));
        assert_eq!(run_to_done(&mut s), Outcome::Found);

        let path = s.path();
        assert_eq!(path.first(), Some(&Point::new(5, 5)));
        assert_eq!(path.last(), Some(&Point::new(0, 0)));
        // endpoints keep their markers, interior path cells show as path
        assert_eq!(s.visual_at(Point::new(0, 0)), VisualState::Start);
        assert_eq!(s.visual_at(Point::new(5, 5)), VisualState::End);
        assert_eq!(s.visual_at(path[1]), VisualState::Path);
    }

    #[test]
    fn run_reports_no_path() {
        let mut s = Session::new(3, 3);
        s.set_mode(Mode::SetStart);
        s.click(Point::new(0, 1));
        s.set_mode(Mode::SetEnd);
        s.click(Point::new(2, 1));
        s.set_mode(Mode::PaintObstacle);
        for y in 0..3 {
            s.click(Point::new(1, y));
        }
        s.begin_search();
        assert_eq!(run_to_done(&mut s), Outcome::NoPath);
        assert!(s.path().is_empty());
    }

    #[test]
    fn start_equals_end_run() {
        let mut s = Session::new(5, 5);
        s.set_mode(Mode::SetEnd);
        s.click(Point::new(0, 0));
        s.begin_search();
        assert_eq!(run_to_done(&mut s), Outcome::Found);
        assert_eq!(s.path(), &[Point::new(0, 0)]);
    }

    #[test]
    fn edits_cancel_an_active_run() {
        let mut s = Session::new(8, 8);
        s.begin_search();
        for _ in 0..5 {
            s.tick();
        }
        s.set_mode(Mode::PaintObstacle);
        assert!(s.click(Point::new(4, 4)));
        assert!(matches!(s.phase(), Phase::Editing));
        // search scratch is gone, the edit and designations remain
        assert_eq!(s.visual_at(Point::new(1, 1)), VisualState::Default);
        assert_eq!(s.visual_at(Point::new(4, 4)), VisualState::Obstacle);
        assert_eq!(s.visual_at(Point::new(0, 0)), VisualState::Start);
        // ticks are a no-op until the next begin
        s.tick();
        assert!(matches!(s.phase(), Phase::Editing));
    }

    #[test]
    fn begin_restarts_a_finished_run() {
        let mut s = Session::new(5, 5);
        s.begin_search();
        assert_eq!(run_to_done(&mut s), Outcome::Found);
        let first_path: Vec<Point> = s.path().to_vec();

        s.begin_search();
        assert!(matches!(s.phase(), Phase::Searching(_)));
        assert!(s.path().is_empty());
        assert_eq!(run_to_done(&mut s), Outcome::Found);
        assert_eq!(s.path(), first_path);
    }

    #[test]
    fn frontier_and_visited_show_during_a_run() {
        let mut s = Session::new(6, 6);
        s.begin_search();
        s.tick();
        // the first expansion closes the start and discovers its neighbors
        assert_eq!(s.visual_at(Point::new(1, 0)), VisualState::Frontier);
        assert_eq!(s.visual_at(Point::new(1, 1)), VisualState::Frontier);
        // the start cell's marker wins over its closed membership
        assert_eq!(s.visual_at(Point::new(0, 0)), VisualState::Start);
        // the diagonal neighbor has the lowest f and is expanded next
        s.tick();
        assert_eq!(s.visual_at(Point::new(1, 1)), VisualState::Visited);
    }
}
