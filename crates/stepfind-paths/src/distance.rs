use stepfind_core::Point;

/// Octile distance between two points, scaled ×10 for integer arithmetic:
/// a straight step costs 10, a diagonal step 14 (≈ 10√2).
///
/// Used both as the step cost between adjacent cells and as the admissible
/// heuristic toward the goal.
#[inline]
pub fn octile(a: Point, b: Point) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    14 * dx.min(dy) + 10 * (dx - dy).abs()
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}
