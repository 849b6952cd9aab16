//! Incremental A* search: one expansion per [`Astar::step`] call.
//!
//! The caller drives the search on its own cadence (a UI tick, a loop) and
//! reacts to the returned [`StepResult`]. The engine itself never sleeps and
//! never raises an error; a missing path is the normal `Exhausted` outcome.

use std::collections::BinaryHeap;

use stepfind_core::Point;

use crate::board::{Board, SearchSet};
use crate::distance::octile;

// ---------------------------------------------------------------------------
// OpenRef
// ---------------------------------------------------------------------------

/// Reference into the board, ordered by `f` for use in `BinaryHeap`.
#[derive(Clone, Copy, PartialEq, Eq)]
struct OpenRef {
    pos: Point,
    f: i32,
}

impl Ord for OpenRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first; ties break
        // toward the lowest row-major position so expansion order is
        // reproducible.
        other.f.cmp(&self.f).then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for OpenRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// StepResult
// ---------------------------------------------------------------------------

/// The outcome of a single search step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepResult {
    /// A cell moved from the open set to the closed set; the search goes on.
    Expanded(Point),
    /// The goal cell was expanded; a path exists and can be reconstructed.
    GoalReached,
    /// The open set ran empty; no path exists.
    Exhausted,
}

// ---------------------------------------------------------------------------
// Astar
// ---------------------------------------------------------------------------

/// Steppable A* over a [`Board`], from its designated start to its end.
///
/// Membership bookkeeping lives on the board's tiles; the heap here only
/// ranks open cells by `f`. A rediscovery with a cheaper `f` pushes a second
/// heap entry and the stale one is skipped when popped.
pub struct Astar {
    open: BinaryHeap<OpenRef>,
    goal: Point,
    nbuf: Vec<Point>,
    done: Option<StepResult>,
}

impl Astar {
    /// Begin a search on `board`, dropping any scratch left from a previous
    /// run. The start enters the open set with its full cost triple.
    pub fn begin(board: &mut Board) -> Self {
        board.clear_search();
        let start = board.start();
        let goal = board.end();
        let h = octile(start, goal);
        if let Ok(t) = board.tile_mut(start) {
            t.g = Some(0);
            t.h = Some(h);
            t.f = Some(h);
            t.set = Some(SearchSet::Open);
        }
        let mut open = BinaryHeap::new();
        open.push(OpenRef { pos: start, f: h });
        Self {
            open,
            goal,
            nbuf: Vec::with_capacity(8),
            done: None,
        }
    }

    /// The goal this search is heading for.
    #[inline]
    pub fn goal(&self) -> Point {
        self.goal
    }

    /// Perform one expansion.
    ///
    /// Pops the open cell with the lowest `f`, closes it, and relaxes its
    /// 8-connected neighbors: a neighbor not yet in the open set, or one
    /// whose tentative `f` is strictly lower than its current `f`, gets the
    /// tentative costs and `current` as its parent. Obstacles and closed
    /// cells are never relaxed.
    ///
    /// Once the search has terminated, further calls return the terminal
    /// result unchanged.
    pub fn step(&mut self, board: &mut Board) -> StepResult {
        if let Some(terminal) = self.done {
            return terminal;
        }
        let result = self.advance(board);
        if !matches!(result, StepResult::Expanded(_)) {
            self.done = Some(result);
        }
        result
    }

    fn advance(&mut self, board: &mut Board) -> StepResult {
        let current = loop {
            let Some(entry) = self.open.pop() else {
                return StepResult::Exhausted;
            };
            // Skip entries superseded by a cheaper rediscovery or already
            // expanded.
            let fresh = board
                .tile(entry.pos)
                .is_ok_and(|t| t.set == Some(SearchSet::Open) && t.f == Some(entry.f));
            if fresh {
                break entry.pos;
            }
        };

        let cur_g = {
            let Ok(t) = board.tile_mut(current) else {
                return StepResult::Exhausted;
            };
            t.set = Some(SearchSet::Closed);
            let Some(g) = t.g else {
                return StepResult::Exhausted;
            };
            g
        };

        if current == self.goal {
            return StepResult::GoalReached;
        }

        board.neighbors(current, &mut self.nbuf);
        for &np in self.nbuf.iter() {
            let Ok(t) = board.tile_mut(np) else {
                continue;
            };
            if t.obstacle || t.set == Some(SearchSet::Closed) {
                continue;
            }
            let tentative_g = cur_g + octile(current, np);
            let tentative_h = octile(np, self.goal);
            let tentative_f = tentative_g + tentative_h;

            let in_open = t.set == Some(SearchSet::Open);
            let improved = match t.f {
                Some(f) => tentative_f < f,
                None => true,
            };
            if !in_open || improved {
                t.g = Some(tentative_g);
                t.h = Some(tentative_h);
                t.f = Some(tentative_f);
                t.parent = Some(current);
                t.set = Some(SearchSet::Open);
                self.open.push(OpenRef {
                    pos: np,
                    f: tentative_f,
                });
            }
        }

        StepResult::Expanded(current)
    }

    /// Run `step` to termination, returning the terminal result.
    pub fn run_to_end(&mut self, board: &mut Board) -> StepResult {
        loop {
            match self.step(board) {
                StepResult::Expanded(_) => continue,
                terminal => return terminal,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backtrack::reconstruct;
    use std::collections::HashSet;

    fn run(board: &mut Board) -> (StepResult, Vec<Point>) {
        let mut search = Astar::begin(board);
        let mut expanded = Vec::new();
        let bound = board.bounds().len() + 1;
        for _ in 0..bound {
            match search.step(board) {
                StepResult::Expanded(p) => expanded.push(p),
                terminal => return (terminal, expanded),
            }
        }
        panic!("search did not terminate within {bound} steps");
    }

    #[test]
    fn open_field_diagonal() {
        let mut b = Board::new(5, 5);
        let (result, _) = run(&mut b);
        assert_eq!(result, StepResult::GoalReached);
        let path = reconstruct(&b, b.end());
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&Point::new(4, 4)));
        assert_eq!(path.last(), Some(&Point::new(0, 0)));
        for pair in path.windows(2) {
            assert_eq!(pair[0] - pair[1], Point::new(1, 1));
        }
    }

    #[test]
    fn full_wall_exhausts() {
        let mut b = Board::new(3, 3);
        for y in 0..3 {
            b.set_obstacle(Point::new(1, y), true).unwrap();
        }
        b.set_start(Point::new(0, 1)).unwrap();
        b.set_end(Point::new(2, 1)).unwrap();
        let (result, expanded) = run(&mut b);
        assert_eq!(result, StepResult::Exhausted);
        // only the start column was reachable
        assert!(expanded.iter().all(|p| p.x == 0));
    }

    #[test]
    fn start_equals_end() {
        let mut b = Board::new(5, 5);
        b.set_end(Point::new(0, 0)).unwrap();
        let mut search = Astar::begin(&mut b);
        assert_eq!(search.step(&mut b), StepResult::GoalReached);
        assert_eq!(reconstruct(&b, b.end()), vec![Point::new(0, 0)]);
    }

    #[test]
    fn goal_on_obstacle_exhausts() {
        let mut b = Board::new(4, 4);
        b.set_obstacle(Point::new(3, 3), true).unwrap();
        let (result, _) = run(&mut b);
        assert_eq!(result, StepResult::Exhausted);
    }

    #[test]
    fn closed_cells_never_reexpanded() {
        let mut b = Board::new(8, 8);
        for p in [
            Point::new(3, 0),
            Point::new(3, 1),
            Point::new(3, 2),
            Point::new(3, 3),
            Point::new(5, 7),
            Point::new(5, 6),
            Point::new(5, 5),
            Point::new(1, 4),
        ] {
            b.set_obstacle(p, true).unwrap();
        }
        let (result, expanded) = run(&mut b);
        assert_eq!(result, StepResult::GoalReached);
        let mut seen = HashSet::new();
        for p in &expanded {
            assert!(seen.insert(*p), "cell {p} expanded twice");
        }
    }

    #[test]
    fn expansion_order_is_deterministic() {
        let obstacles = [Point::new(2, 1), Point::new(2, 2), Point::new(4, 3)];
        let run_once = || {
            let mut b = Board::new(6, 6);
            for &p in &obstacles {
                b.set_obstacle(p, true).unwrap();
            }
            run(&mut b).1
        };
        assert_eq!(run_once(), run_once());
    }

    #[test]
    fn goal_tile_lands_in_closed() {
        let mut b = Board::new(4, 4);
        let mut search = Astar::begin(&mut b);
        assert_eq!(search.run_to_end(&mut b), StepResult::GoalReached);
        let goal = b.tile(b.end()).unwrap();
        assert_eq!(goal.set, Some(SearchSet::Closed));
        assert!(goal.parent.is_some());
    }

    #[test]
    fn begin_reseeds_start_costs() {
        let mut b = Board::new(5, 5);
        let search = Astar::begin(&mut b);
        assert_eq!(search.goal(), Point::new(4, 4));
        let s = b.tile(b.start()).unwrap();
        assert_eq!(s.g, Some(0));
        assert_eq!(s.h, Some(56));
        assert_eq!(s.f, Some(56));
        assert_eq!(s.set, Some(SearchSet::Open));
    }

    #[test]
    fn terminal_result_is_sticky() {
        let mut b = Board::new(4, 4);
        let mut search = Astar::begin(&mut b);
        assert_eq!(search.run_to_end(&mut b), StepResult::GoalReached);
        // the frontier is not empty, but the search is over
        assert_eq!(search.step(&mut b), StepResult::GoalReached);
        assert_eq!(search.step(&mut b), StepResult::GoalReached);

        let mut blocked = Board::new(2, 2);
        blocked.set_obstacle(Point::new(1, 1), true).unwrap();
        blocked.set_obstacle(Point::new(0, 1), true).unwrap();
        blocked.set_obstacle(Point::new(1, 0), true).unwrap();
        blocked.set_end(Point::new(1, 1)).unwrap();
        let mut search = Astar::begin(&mut blocked);
        assert_eq!(search.run_to_end(&mut blocked), StepResult::Exhausted);
        assert_eq!(search.step(&mut blocked), StepResult::Exhausted);
    }

    #[test]
    fn diagonal_squeeze_is_allowed() {
        // corner-cutting between two obstacles is deliberately legal
        let mut b = Board::new(3, 3);
        b.set_obstacle(Point::new(1, 0), true).unwrap();
        b.set_obstacle(Point::new(0, 1), true).unwrap();
        b.set_end(Point::new(2, 2)).unwrap();
        let (result, _) = run(&mut b);
        assert_eq!(result, StepResult::GoalReached);
        let path = reconstruct(&b, b.end());
        assert!(path.contains(&Point::new(1, 1)));
    }
}
