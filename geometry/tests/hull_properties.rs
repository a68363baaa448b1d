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

//! Property tests for hull construction and area
//!
//! Coordinates are drawn from a small integer grid so every cross product
//! and shoelace term is exactly representable in f64; the assertions hold
//! in exact arithmetic, not just within a tolerance.

use hullgraph_geometry::{Point, convex_hull, polygon_area};
use proptest::prelude::*;

fn arb_points() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((-1000i32..1000, -1000i32..1000), 0..48).prop_map(|coords| {
        coords
            .into_iter()
            .map(|(x, y)| Point::new(f64::from(x), f64::from(y)))
            .collect()
    })
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

proptest! {
    #[test]
    fn hull_is_strictly_convex(points in arb_points()) {
        let hull = convex_hull(&points);
        let n = hull.len();
        if n >= 3 {
            for i in 0..n {
                let c = cross(hull[i], hull[(i + 1) % n], hull[(i + 2) % n]);
                prop_assert!(c > 0.0, "triple at {} is not a strict left turn: {}", i, c);
            }
        }
    }

    #[test]
    fn hull_contains_every_input_point(points in arb_points()) {
        let hull = convex_hull(&points);
        let n = hull.len();
        if n >= 3 {
            for p in &points {
                for i in 0..n {
                    let c = cross(hull[i], hull[(i + 1) % n], *p);
                    prop_assert!(c >= 0.0, "{} lies outside hull edge {}", p, i);
                }
            }
        }
    }

    #[test]
    fn area_invariant_under_rotation_and_reversal(points in arb_points()) {
        let hull = convex_hull(&points);
        let area = polygon_area(&hull);
        if !hull.is_empty() {
            let mut rotated = hull.clone();
            rotated.rotate_left(1);
            prop_assert!((polygon_area(&rotated) - area).abs() < 1e-9);

            let mut reversed = hull;
            reversed.reverse();
            prop_assert!((polygon_area(&reversed) - area).abs() < 1e-9);
        }
    }

    #[test]
    fn degenerate_hulls_enclose_nothing(points in prop::collection::vec(-100i32..100, 0..16)) {
        // All points on the line y = x.
        let pts: Vec<Point> = points
            .into_iter()
            .map(|v| Point::new(f64::from(v), f64::from(v)))
            .collect();
        let hull = convex_hull(&pts);
        prop_assert!(hull.len() <= 2);
        prop_assert_eq!(polygon_area(&hull), 0.0);
    }
}
