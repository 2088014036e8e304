//! Polygon helpers over grid coordinates.
//!
//! A loop boundary is read as a closed polygon with one vertex per
//! coordinate, `row` as the first axis and `col` as the second.

use crate::board::Coord;

fn xy(c: Coord) -> (i64, i64) {
    (c.row as i64, c.col as i64)
}

/// Shoelace area of the closed polygon through `points`, sign given by orientation.
pub fn signed_area(points: &[Coord]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(&a, &b)| {
            let (ax, ay) = xy(a);
            let (bx, by) = xy(b);
            ax * by - bx * ay
        })
        .sum();
    twice as f64 / 2.0
}

/// Whether `p` lies on the segment `a`-`b`.
fn on_segment(a: (i64, i64), b: (i64, i64), p: (i64, i64)) -> bool {
    let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
    cross == 0
        && p.0 >= a.0.min(b.0)
        && p.0 <= a.0.max(b.0)
        && p.1 >= a.1.min(b.1)
        && p.1 <= a.1.max(b.1)
}

/// Strict interior test (even-odd ray casting). Points on the boundary are outside.
pub fn contains(polygon: &[Coord], p: Coord) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let (px, py) = xy(p);

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = xy(polygon[i]);
        let (xj, yj) = xy(polygon[j]);
        if on_segment((xi, yi), (xj, yj), (px, py)) {
            return false;
        }
        if (yi > py) != (yj > py) {
            // px < xi + (py - yi) * (xj - xi) / (yj - yi), without division
            let lhs = (px - xi) * (yj - yi);
            let rhs = (py - yi) * (xj - xi);
            let crosses = if yj > yi { lhs < rhs } else { lhs > rhs };
            if crosses {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Inclusive `(min_row, max_row, min_col, max_col)` of a non-empty point list.
pub fn bounds(points: &[Coord]) -> Option<(usize, usize, usize, usize)> {
    let first = points.first()?;
    Some(points.iter().fold(
        (first.row, first.row, first.col, first.col),
        |(r0, r1, c0, c1), p| (r0.min(p.row), r1.max(p.row), c0.min(p.col), c1.max(p.col)),
    ))
}
