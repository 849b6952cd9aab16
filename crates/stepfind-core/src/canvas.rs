//! The [`Canvas`] type — a 2D surface of [`Cell`]s with slice semantics.
//!
//! A `Canvas` is a *view* into a shared backing buffer. Cloning a `Canvas`
//! yields another view of the **same** storage. Use [`slice`](Canvas::slice)
//! to obtain sub-views (a status line, the board area).

use std::cell::RefCell;
use std::rc::Rc;

use crate::cell::Cell;
use crate::geom::{Point, Range};

// ---------------------------------------------------------------------------
// Internal shared buffer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct CanvasBuffer {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl CanvasBuffer {
    fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![Cell::default(); width * height],
            width,
            height,
        }
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height {
            Some((p.y as usize) * self.width + (p.x as usize))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// A 2D surface of [`Cell`]s backed by shared storage.
///
/// Cloning produces another view into the same buffer.
#[derive(Debug, Clone)]
pub struct Canvas {
    buffer: Rc<RefCell<CanvasBuffer>>,
    bounds: Range,
}

impl Canvas {
    /// Create a new canvas of the given dimensions, filled with default cells.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self {
            buffer: Rc::new(RefCell::new(CanvasBuffer::new(w as usize, h as usize))),
            bounds: Range::new(0, 0, w, h),
        }
    }

    /// The bounding range of this canvas / sub-view.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Size of the canvas as a `Point`.
    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    /// Width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Whether `p` is inside this view’s bounds.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Get a sub-view. The returned `Canvas` shares the same backing buffer
    /// but has narrower bounds (the intersection of the requested range and
    /// the current bounds).
    pub fn slice(&self, r: Range) -> Canvas {
        Canvas {
            buffer: Rc::clone(&self.buffer),
            bounds: self.bounds.intersect(r),
        }
    }

    /// Read the cell at `p`. Returns `Cell::default()` if `p` is outside
    /// bounds.
    pub fn at(&self, p: Point) -> Cell {
        if !self.bounds.contains(p) {
            return Cell::default();
        }
        let buf = self.buffer.borrow();
        buf.index(p).map(|i| buf.cells[i]).unwrap_or_default()
    }

    /// Set the cell at `p`. No-op if `p` is outside bounds.
    pub fn set(&self, p: Point, cell: Cell) {
        if !self.bounds.contains(p) {
            return;
        }
        let mut buf = self.buffer.borrow_mut();
        if let Some(i) = buf.index(p) {
            buf.cells[i] = cell;
        }
    }

    /// Fill every cell in the view with `cell`.
    pub fn fill(&self, cell: Cell) {
        let mut buf = self.buffer.borrow_mut();
        for p in self.bounds.iter() {
            if let Some(i) = buf.index(p) {
                buf.cells[i] = cell;
            }
        }
    }

    /// Copy cells from `src` into `self`, aligning `src.bounds.min` with
    /// `self.bounds.min`. Returns the size actually copied.
    pub fn copy_from(&self, src: &Canvas) -> Point {
        let w = src.bounds.width().min(self.bounds.width());
        let h = src.bounds.height().min(self.bounds.height());
        let src_buf = src.buffer.borrow();
        let mut dst_buf = self.buffer.borrow_mut();
        for dy in 0..h {
            for dx in 0..w {
                let sp = src.bounds.min + Point::new(dx, dy);
                let dp = self.bounds.min + Point::new(dx, dy);
                if let (Some(si), Some(di)) = (src_buf.index(sp), dst_buf.index(dp)) {
                    dst_buf.cells[di] = src_buf.cells[si];
                }
            }
        }
        Point::new(w, h)
    }

    /// Row-major iterator over `(Point, Cell)` pairs.
    pub fn iter(&self) -> CanvasIter<'_> {
        CanvasIter {
            canvas: self,
            inner: self.bounds.iter(),
        }
    }
}

// ---------------------------------------------------------------------------
// CanvasIter
// ---------------------------------------------------------------------------

/// Iterator over `(Point, Cell)` pairs in a [`Canvas`].
pub struct CanvasIter<'a> {
    canvas: &'a Canvas,
    inner: crate::geom::RangeIter,
}

impl Iterator for CanvasIter<'_> {
    type Item = (Point, Cell);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let p = self.inner.next()?;
        Some((p, self.canvas.at(p)))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameCell / compute_frame
// ---------------------------------------------------------------------------

/// A single cell that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Point,
}

/// A set of cell changes (a diff frame).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Compute the difference between two same-sized canvases.
///
/// Returns a [`Frame`] containing only the cells that differ.
pub fn compute_frame(prev: &Canvas, curr: &Canvas) -> Frame {
    let bounds = curr.bounds();
    let mut cells = Vec::new();
    for p in bounds.iter() {
        let pc = prev.at(p);
        let cc = curr.at(p);
        if pc != cc {
            cells.push(FrameCell { cell: cc, pos: p });
        }
    }
    Frame {
        cells,
        width: bounds.width(),
        height: bounds.height(),
    }
}
