//! The [`Board`]: an arena of per-cell search state with obstacle flags and
//! the designated start / end cells.
//!
//! The board owns every [`Tile`]; parent links are plain coordinates into the
//! same arena, so resetting tiles can never leave a dangling reference.

use stepfind_core::{Point, Range};

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// Which search collection a tile currently belongs to, if any.
///
/// A tile is a member of at most one of the two; obstacles are members of
/// neither.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchSet {
    /// Discovered but not yet expanded (the frontier).
    Open,
    /// Already expanded.
    Closed,
}

/// Per-cell pathfinding scratch state.
///
/// Cost fields stay `None` until the search discovers the cell. `parent` is
/// the coordinate the cell was cheapest to reach from, rewritten whenever a
/// cheaper route is found.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub obstacle: bool,
    /// Cost from the start cell.
    pub g: Option<i32>,
    /// Heuristic estimate to the goal.
    pub h: Option<i32>,
    /// `g + h`, the ranking key of the open set.
    pub f: Option<i32>,
    /// Back-pointer for path reconstruction.
    pub parent: Option<Point>,
    /// Open / closed membership.
    pub set: Option<SearchSet>,
}

impl Tile {
    /// Drop all search scratch, keeping the obstacle flag.
    pub(crate) fn clear_scratch(&mut self) {
        self.g = None;
        self.h = None;
        self.f = None;
        self.parent = None;
        self.set = None;
    }
}

// ---------------------------------------------------------------------------
// OutOfBounds
// ---------------------------------------------------------------------------

/// A coordinate lookup fell outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("coordinate {point} is outside the board bounds {bounds}")]
pub struct OutOfBounds {
    pub point: Point,
    pub bounds: Range,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A rectangular arena of [`Tile`]s with exactly one designated start and one
/// designated end cell at all times.
///
/// Start and end may coincide; the search then succeeds on its first step.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    tiles: Vec<Tile>,
    bounds: Range,
    width: usize,
    start: Point,
    end: Point,
}

impl Board {
    /// Create a board of the given dimensions (clamped to at least 1×1) with
    /// the default designations: start at the top-left corner, end at the
    /// bottom-right.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(1), height.max(1));
        let mut board = Self {
            tiles: vec![Tile::default(); bounds.len()],
            bounds,
            width: bounds.width() as usize,
            start: Point::ZERO,
            end: Point::ZERO,
        };
        board.reset_all();
        board
    }

    /// The bounding range of the board.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Size as a `Point`.
    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Whether `p` lies on the board.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// The designated start cell.
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// The designated end cell.
    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Read the tile at `p`.
    pub fn tile(&self, p: Point) -> Result<&Tile, OutOfBounds> {
        match self.idx(p) {
            Some(i) => Ok(&self.tiles[i]),
            None => Err(self.oob(p)),
        }
    }

    pub(crate) fn tile_mut(&mut self, p: Point) -> Result<&mut Tile, OutOfBounds> {
        match self.idx(p) {
            Some(i) => Ok(&mut self.tiles[i]),
            None => Err(self.oob(p)),
        }
    }

    /// Row-major iterator over `(Point, &Tile)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &Tile)> {
        self.tiles.iter().enumerate().map(|(i, t)| (self.point(i), t))
    }

    /// Collect the 8-connected neighborhood of `p` into `out` (cleared
    /// first): every in-bounds cell within Chebyshev distance 1, excluding
    /// `p` itself. Obstacles are included; filtering them is the search's
    /// concern.
    pub fn neighbors(&self, p: Point, out: &mut Vec<Point>) {
        out.clear();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let n = p.shift(dx, dy);
                if self.bounds.contains(n) {
                    out.push(n);
                }
            }
        }
    }

    /// Set or clear the obstacle flag at `p`.
    ///
    /// Marking a cell as an obstacle also drops its search scratch, so an
    /// obstacle is never a member of the open or closed sets.
    pub fn set_obstacle(&mut self, p: Point, obstacle: bool) -> Result<(), OutOfBounds> {
        let t = self.tile_mut(p)?;
        t.obstacle = obstacle;
        if obstacle {
            t.clear_scratch();
        }
        Ok(())
    }

    /// Move the start designation to `p`.
    ///
    /// The previous start's `g` and `f` are cleared and it leaves the open
    /// set; the new start gets `g = 0`, `f = 0` and enters the open set. A
    /// cell designated as start stops being an obstacle. Designating the
    /// current end cell is allowed and simply overlaps the two.
    pub fn set_start(&mut self, p: Point) -> Result<(), OutOfBounds> {
        let prev = self.start;
        self.tile_mut(p)?;
        if let Some(i) = self.idx(prev) {
            let t = &mut self.tiles[i];
            t.g = None;
            t.f = None;
            if t.set == Some(SearchSet::Open) {
                t.set = None;
            }
        }
        self.start = p;
        self.seed_start_tile();
        Ok(())
    }

    /// Move the end designation to `p`. The tile itself is untouched;
    /// distinctness from the start is not validated.
    pub fn set_end(&mut self, p: Point) -> Result<(), OutOfBounds> {
        self.tile_mut(p)?;
        self.end = p;
        Ok(())
    }

    /// Restore the board to its freshly-created state: no obstacles, no
    /// search scratch, start at the top-left corner, end at the bottom-right.
    pub fn reset_all(&mut self) {
        for t in &mut self.tiles {
            *t = Tile::default();
        }
        self.start = self.bounds.min;
        self.end = self.bounds.max.shift(-1, -1);
        self.seed_start_tile();
    }

    /// Drop all search scratch (costs, parents, set membership) while keeping
    /// obstacles and designations, then re-seed the start's bookkeeping.
    pub fn clear_search(&mut self) {
        for t in &mut self.tiles {
            t.clear_scratch();
        }
        self.seed_start_tile();
    }

    /// Write the start designation's bookkeeping: `g = 0`, `f = 0`, member
    /// of the open set, never an obstacle.
    fn seed_start_tile(&mut self) {
        if let Some(i) = self.idx(self.start) {
            let t = &mut self.tiles[i];
            t.obstacle = false;
            t.g = Some(0);
            t.f = Some(0);
            t.set = Some(SearchSet::Open);
        }
    }

    fn oob(&self, p: Point) -> OutOfBounds {
        OutOfBounds {
            point: p,
            bounds: self.bounds,
        }
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat index. Returns `None` if out of bounds.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some((p.y as usize) * self.width + (p.x as usize))
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        Point::new((idx % self.width) as i32, (idx / self.width) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_default_designations() {
        let b = Board::new(6, 4);
        assert_eq!(b.start(), Point::new(0, 0));
        assert_eq!(b.end(), Point::new(5, 3));
        let s = b.tile(b.start()).unwrap();
        assert_eq!(s.g, Some(0));
        assert_eq!(s.f, Some(0));
        assert_eq!(s.set, Some(SearchSet::Open));
        // end designation is a pointer only, its tile carries no scratch
        let e = b.tile(b.end()).unwrap();
        assert_eq!(e.set, None);
        assert_eq!(e.g, None);
    }

    #[test]
    fn dimensions_clamp_to_one() {
        let b = Board::new(0, -3);
        assert_eq!(b.size(), Point::new(1, 1));
        assert_eq!(b.start(), b.end());
    }

    #[test]
    fn tile_out_of_bounds() {
        let b = Board::new(3, 3);
        let err = b.tile(Point::new(3, 0)).unwrap_err();
        assert_eq!(err.point, Point::new(3, 0));
        assert_eq!(err.bounds, Range::new(0, 0, 3, 3));
        assert!(b.tile(Point::new(-1, 1)).is_err());
        assert!(b.tile(Point::new(2, 2)).is_ok());
    }

    #[test]
    fn neighbors_interior_edge_corner() {
        let b = Board::new(5, 5);
        let mut buf = Vec::new();

        b.neighbors(Point::new(2, 2), &mut buf);
        assert_eq!(buf.len(), 8);

        b.neighbors(Point::new(0, 2), &mut buf);
        assert_eq!(buf.len(), 5);

        b.neighbors(Point::new(4, 4), &mut buf);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn neighbors_are_adjacent_in_bounds_and_distinct() {
        let b = Board::new(4, 3);
        let mut buf = Vec::new();
        for (p, _) in b.iter() {
            b.neighbors(p, &mut buf);
            assert!(buf.len() <= 8);
            for &n in &buf {
                assert_ne!(n, p);
                assert!(b.contains(n));
                assert!((n.x - p.x).abs() <= 1 && (n.y - p.y).abs() <= 1);
            }
        }
    }

    #[test]
    fn obstacle_marking_drops_scratch() {
        let mut b = Board::new(4, 4);
        {
            let t = b.tile_mut(Point::new(1, 1)).unwrap();
            t.g = Some(10);
            t.h = Some(20);
            t.f = Some(30);
            t.set = Some(SearchSet::Open);
        }
        b.set_obstacle(Point::new(1, 1), true).unwrap();
        let t = b.tile(Point::new(1, 1)).unwrap();
        assert!(t.obstacle);
        assert_eq!(t.set, None);
        assert_eq!(t.f, None);

        b.set_obstacle(Point::new(1, 1), false).unwrap();
        assert!(!b.tile(Point::new(1, 1)).unwrap().obstacle);
        assert!(b.set_obstacle(Point::new(9, 9), true).is_err());
    }

    #[test]
    fn set_start_moves_bookkeeping() {
        let mut b = Board::new(5, 5);
        b.set_start(Point::new(2, 3)).unwrap();
        assert_eq!(b.start(), Point::new(2, 3));

        let old = b.tile(Point::new(0, 0)).unwrap();
        assert_eq!(old.g, None);
        assert_eq!(old.f, None);
        assert_eq!(old.set, None);

        let new = b.tile(Point::new(2, 3)).unwrap();
        assert_eq!(new.g, Some(0));
        assert_eq!(new.f, Some(0));
        assert_eq!(new.set, Some(SearchSet::Open));
    }

    #[test]
    fn set_start_clears_obstacle_on_target() {
        let mut b = Board::new(5, 5);
        b.set_obstacle(Point::new(3, 3), true).unwrap();
        b.set_start(Point::new(3, 3)).unwrap();
        assert!(!b.tile(Point::new(3, 3)).unwrap().obstacle);
        assert_eq!(b.tile(Point::new(3, 3)).unwrap().set, Some(SearchSet::Open));
    }

    #[test]
    fn start_may_overlap_end() {
        let mut b = Board::new(5, 5);
        b.set_start(b.end()).unwrap();
        assert_eq!(b.start(), b.end());
    }

    #[test]
    fn set_end_repoints_only() {
        let mut b = Board::new(5, 5);
        b.set_obstacle(Point::new(1, 2), true).unwrap();
        b.set_end(Point::new(1, 2)).unwrap();
        assert_eq!(b.end(), Point::new(1, 2));
        // the tile itself is untouched
        assert!(b.tile(Point::new(1, 2)).unwrap().obstacle);
        assert!(b.set_end(Point::new(-1, 0)).is_err());
    }

    #[test]
    fn reset_all_is_idempotent() {
        let mut b = Board::new(6, 6);
        b.set_obstacle(Point::new(2, 2), true).unwrap();
        b.set_start(Point::new(4, 4)).unwrap();
        b.set_end(Point::new(1, 1)).unwrap();

        b.reset_all();
        let once = b.clone();
        b.reset_all();
        assert_eq!(b, once);
        assert_eq!(b.start(), Point::new(0, 0));
        assert_eq!(b.end(), Point::new(5, 5));
        assert!(!b.tile(Point::new(2, 2)).unwrap().obstacle);
    }

    #[test]
    fn clear_search_keeps_obstacles_and_designations() {
        let mut b = Board::new(4, 4);
        b.set_obstacle(Point::new(2, 1), true).unwrap();
        {
            let t = b.tile_mut(Point::new(1, 1)).unwrap();
            t.g = Some(14);
            t.parent = Some(Point::new(0, 0));
            t.set = Some(SearchSet::Closed);
        }
        b.clear_search();
        assert!(b.tile(Point::new(2, 1)).unwrap().obstacle);
        let t = b.tile(Point::new(1, 1)).unwrap();
        assert_eq!(t.parent, None);
        assert_eq!(t.set, None);
        // start bookkeeping is re-seeded
        assert_eq!(b.tile(b.start()).unwrap().set, Some(SearchSet::Open));
    }

    #[test]
    fn idx_point_round_trip() {
        let b = Board::new(7, 3);
        for (p, _) in b.iter() {
            let i = b.idx(p).unwrap();
            assert_eq!(b.point(i), p);
        }
        assert_eq!(b.idx(Point::new(7, 0)), None);
    }
}
