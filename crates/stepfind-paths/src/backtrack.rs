//! Path reconstruction by walking parent links from the goal to the start.
//!
//! [`Backtrack`] mirrors the search engine's one-unit-of-work-per-call style
//! so the route can be revealed cell by cell; [`reconstruct`] runs the same
//! walk in one go.

use stepfind_core::Point;

use crate::board::Board;

/// Stepwise walk along parent links, starting at the goal.
pub struct Backtrack {
    next: Option<Point>,
}

impl Backtrack {
    /// Start a walk at `goal`. Meaningful once a search has reported that
    /// the goal was reached.
    pub fn new(goal: Point) -> Self {
        Self { next: Some(goal) }
    }

    /// Advance one cell. Returns the cell reached, or `None` once the walk
    /// has already yielded the parentless start cell.
    pub fn step(&mut self, board: &Board) -> Option<Point> {
        let current = self.next?;
        self.next = board.tile(current).ok().and_then(|t| t.parent);
        Some(current)
    }
}

/// Walk parent links from `goal` to the start, collecting the route in
/// end-to-start order. The start cell (the one without a parent) is the
/// final element.
pub fn reconstruct(board: &Board, goal: Point) -> Vec<Point> {
    let mut walk = Backtrack::new(goal);
    let mut path = Vec::new();
    while let Some(p) = walk.step(board) {
        path.push(p);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astar::{Astar, StepResult};
    use crate::distance::chebyshev;

    fn searched_board() -> Board {
        let mut b = Board::new(6, 5);
        for p in [Point::new(2, 0), Point::new(2, 1), Point::new(2, 2)] {
            b.set_obstacle(p, true).unwrap();
        }
        let mut search = Astar::begin(&mut b);
        assert_eq!(search.run_to_end(&mut b), StepResult::GoalReached);
        b
    }

    #[test]
    fn stepwise_matches_batch() {
        let b = searched_board();
        let batch = reconstruct(&b, b.end());

        let mut walk = Backtrack::new(b.end());
        let mut stepped = Vec::new();
        while let Some(p) = walk.step(&b) {
            stepped.push(p);
        }
        assert_eq!(stepped, batch);
        // the walk stays exhausted
        assert_eq!(walk.step(&b), None);
    }

    #[test]
    fn path_runs_from_goal_to_start() {
        let b = searched_board();
        let path = reconstruct(&b, b.end());
        assert_eq!(path.first(), Some(&b.end()));
        assert_eq!(path.last(), Some(&b.start()));
        for pair in path.windows(2) {
            assert_eq!(chebyshev(pair[0], pair[1]), 1);
        }
    }

    #[test]
    fn parentless_goal_yields_single_cell() {
        let b = Board::new(4, 4);
        // no search ran, the goal has no parent
        assert_eq!(reconstruct(&b, b.end()), vec![b.end()]);
    }
}
