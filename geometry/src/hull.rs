//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Convex hull construction and polygon area
//!
//! Pure, stateless routines consumed by [`crate::Graph`]. The hull is the
//! *strict* convex hull: collinear boundary points are dropped during
//! construction, so no three consecutive output vertices are collinear.

use crate::Point;

/// Cross product of the vectors `o -> a` and `o -> b`.
///
/// Positive for a left turn, negative for a right turn, zero when the
/// three points are collinear.
pub(crate) fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Compute the convex hull of a point set via Andrew's monotone chain.
///
/// Returns the hull vertices in counter-clockwise order. The polygon is
/// closed implicitly: the first vertex is not repeated at the end. For
/// zero or one input points the result is that same set; duplicated or
/// collinear inputs produce a degenerate hull with no enclosed area.
///
/// # Example
///
/// ```
/// use hullgraph_geometry::{convex_hull, Point};
///
/// let square = [
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(0.5, 0.5), // interior, excluded
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ];
/// assert_eq!(convex_hull(&square).len(), 4);
/// ```
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts = points.to_vec();
    pts.sort_unstable_by(Point::cmp_xy);
    if pts.len() <= 1 {
        return pts;
    }

    let mut hull: Vec<Point> = Vec::with_capacity(pts.len() * 2);

    // Lower chain: drop the middle point while the last two segments do
    // not make a strict left turn.
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    // Upper chain over the reverse-sorted sequence, never popping into
    // the lower chain.
    let lower = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    // The first vertex is duplicated as the closing point of the upper chain.
    hull.pop();
    hull
}

/// Shoelace area of an ordered polygon vertex list.
///
/// Sums `x_i * y_{i+1} - x_{i+1} * y_i` over the cyclic vertex sequence
/// and halves the absolute value, so the result is orientation
/// independent. Fewer than three vertices enclose nothing and yield `0.0`.
pub fn polygon_area(vertices: &[Point]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, p) in vertices.iter().enumerate() {
        let q = vertices[(i + 1) % vertices.len()];
        sum += p.x * q.y - q.x * p.y;
    }
    sum.abs() * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_hull_of_empty_and_single() {
        assert!(convex_hull(&[]).is_empty());
        assert_eq!(convex_hull(&[pt(2.0, 3.0)]), vec![pt(2.0, 3.0)]);
    }

    #[test]
    fn test_hull_unit_square_excludes_interior() {
        let pts = [
            pt(0.0, 0.0),
            pt(1.0, 0.0),
            pt(1.0, 1.0),
            pt(0.0, 1.0),
            pt(0.5, 0.5),
        ];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        assert!((polygon_area(&hull) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hull_is_counter_clockwise() {
        let pts = [pt(0.0, 0.0), pt(4.0, 0.0), pt(4.0, 3.0), pt(0.0, 3.0)];
        let hull = convex_hull(&pts);
        // Every consecutive triple turns left.
        let n = hull.len();
        for i in 0..n {
            let c = cross(hull[i], hull[(i + 1) % n], hull[(i + 2) % n]);
            assert!(c > 0.0, "vertex {} is not a left turn: {}", i, c);
        }
    }

    #[test]
    fn test_hull_drops_collinear_boundary_points() {
        let pts = [
            pt(0.0, 0.0),
            pt(1.0, 0.0), // midpoint of the bottom edge
            pt(2.0, 0.0),
            pt(2.0, 2.0),
            pt(0.0, 2.0),
        ];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&pt(1.0, 0.0)));
    }

    #[test]
    fn test_hull_of_collinear_points_has_no_area() {
        let pts = [pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 2.0)];
        let hull = convex_hull(&pts);
        assert_eq!(polygon_area(&hull), 0.0);
    }

    #[test]
    fn test_area_below_three_vertices_is_zero() {
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(polygon_area(&[pt(1.0, 1.0)]), 0.0);
        assert_eq!(polygon_area(&[pt(0.0, 0.0), pt(5.0, 5.0)]), 0.0);
    }

    #[test]
    fn test_area_triangle() {
        let tri = [pt(0.0, 0.0), pt(4.0, 0.0), pt(0.0, 3.0)];
        assert!((polygon_area(&tri) - 6.0).abs() < 1e-12);
    }
}
