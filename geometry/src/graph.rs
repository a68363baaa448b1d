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

//! Mutable planar point/edge graph

use crate::{Point, convex_hull, polygon_area};
use thiserror::Error;

/// Rejection reasons for graph mutations.
///
/// The display form is the bare reason text, suitable for embedding in a
/// protocol failure reply such as `Failed to add edge (self loop)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The point or edge is already present
    #[error("duplicate")]
    Duplicate,

    /// The point or edge is not present
    #[error("not found")]
    NotFound,

    /// Both edge endpoints are the same point
    #[error("self loop")]
    SelfLoop,

    /// An edge endpoint is not a point of the graph
    #[error("unknown endpoint")]
    UnknownEndpoint,
}

/// An unordered collection of unique points plus undirected edges.
///
/// Points have no identity beyond their coordinates; no two equal points
/// coexist. An edge is an unordered pair of two *distinct* points that
/// both exist in the graph at insertion time. The graph is exclusively
/// owned by the service's geometry store, which serializes all access.
///
/// Note: [`Graph::remove_point`] deliberately does not cascade-remove
/// edges referencing the removed point, so an edge may outlive one of its
/// endpoints. Callers that need edge consistency must remove the edges
/// themselves first.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    points: Vec<Point>,
    edges: Vec<(Point, Point)>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole point set, discarding all edges.
    ///
    /// No validation is performed: duplicates in `points` are accepted
    /// as-is and are the caller's responsibility, in contrast to
    /// [`Graph::add_point`]. Always succeeds.
    pub fn replace(&mut self, points: Vec<Point>) {
        self.points = points;
        self.edges.clear();
    }

    /// Insert a point; rejects an exact duplicate.
    pub fn add_point(&mut self, p: Point) -> Result<(), GraphError> {
        if self.has_point(p) {
            return Err(GraphError::Duplicate);
        }
        self.points.push(p);
        Ok(())
    }

    /// Remove a point; rejects a point that is not present.
    ///
    /// Edges referencing the removed point are left in place.
    pub fn remove_point(&mut self, p: Point) -> Result<(), GraphError> {
        if !self.has_point(p) {
            return Err(GraphError::NotFound);
        }
        self.points.retain(|q| *q != p);
        Ok(())
    }

    /// Insert an undirected edge between two existing, distinct points.
    pub fn add_edge(&mut self, a: Point, b: Point) -> Result<(), GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop);
        }
        if !self.has_point(a) || !self.has_point(b) {
            return Err(GraphError::UnknownEndpoint);
        }
        if self.has_edge(a, b) {
            return Err(GraphError::Duplicate);
        }
        self.edges.push((a, b));
        Ok(())
    }

    /// Remove an edge; endpoint order does not matter.
    pub fn remove_edge(&mut self, a: Point, b: Point) -> Result<(), GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop);
        }
        if !self.has_point(a) || !self.has_point(b) {
            return Err(GraphError::UnknownEndpoint);
        }
        if !self.has_edge(a, b) {
            return Err(GraphError::NotFound);
        }
        self.edges
            .retain(|&(p, q)| !((p == a && q == b) || (p == b && q == a)));
        Ok(())
    }

    /// Current point set, in insertion order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Current edge set, in insertion order
    pub fn edges(&self) -> &[(Point, Point)] {
        &self.edges
    }

    /// Convex hull of the current point set, counter-clockwise
    pub fn convex_hull(&self) -> Vec<Point> {
        convex_hull(&self.points)
    }

    /// Area enclosed by the convex hull
    pub fn area(&self) -> f64 {
        polygon_area(&self.convex_hull())
    }

    fn has_point(&self, p: Point) -> bool {
        self.points.contains(&p)
    }

    fn has_edge(&self, a: Point, b: Point) -> bool {
        self.edges
            .iter()
            .any(|&(p, q)| (p == a && q == b) || (p == b && q == a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_add_point_rejects_duplicate() {
        let mut g = Graph::new();
        g.add_point(pt(1.0, 2.0)).unwrap();
        assert_eq!(g.add_point(pt(1.0, 2.0)), Err(GraphError::Duplicate));
        assert_eq!(g.points().len(), 1);
    }

    #[test]
    fn test_remove_point_rejects_absent() {
        let mut g = Graph::new();
        assert_eq!(g.remove_point(pt(1.0, 2.0)), Err(GraphError::NotFound));
        g.add_point(pt(1.0, 2.0)).unwrap();
        g.remove_point(pt(1.0, 2.0)).unwrap();
        assert!(g.points().is_empty());
    }

    #[test]
    fn test_add_edge_validation() {
        let mut g = Graph::new();
        let a = pt(0.0, 0.0);
        let b = pt(1.0, 1.0);

        // Neither endpoint exists yet.
        assert_eq!(g.add_edge(a, b), Err(GraphError::UnknownEndpoint));

        g.add_point(a).unwrap();
        assert_eq!(g.add_edge(a, b), Err(GraphError::UnknownEndpoint));

        g.add_point(b).unwrap();
        assert_eq!(g.add_edge(a, a), Err(GraphError::SelfLoop));
        g.add_edge(a, b).unwrap();

        // Duplicate in either endpoint order.
        assert_eq!(g.add_edge(a, b), Err(GraphError::Duplicate));
        assert_eq!(g.add_edge(b, a), Err(GraphError::Duplicate));
        assert_eq!(g.edges().len(), 1);
    }

    #[test]
    fn test_remove_edge_either_order() {
        let mut g = Graph::new();
        let a = pt(0.0, 0.0);
        let b = pt(1.0, 1.0);
        g.add_point(a).unwrap();
        g.add_point(b).unwrap();

        assert_eq!(g.remove_edge(a, b), Err(GraphError::NotFound));
        g.add_edge(a, b).unwrap();
        g.remove_edge(b, a).unwrap();
        assert!(g.edges().is_empty());
    }

    #[test]
    fn test_remove_point_does_not_cascade_edges() {
        // Removing a point leaves its edges dangling, deliberately.
        let mut g = Graph::new();
        let a = pt(0.0, 0.0);
        let b = pt(1.0, 1.0);
        g.add_point(a).unwrap();
        g.add_point(b).unwrap();
        g.add_edge(a, b).unwrap();

        g.remove_point(a).unwrap();
        assert_eq!(g.edges(), &[(a, b)]);
    }

    #[test]
    fn test_replace_discards_points_and_edges() {
        let mut g = Graph::new();
        let a = pt(0.0, 0.0);
        let b = pt(1.0, 1.0);
        g.add_point(a).unwrap();
        g.add_point(b).unwrap();
        g.add_edge(a, b).unwrap();

        g.replace(vec![pt(5.0, 5.0)]);
        assert_eq!(g.points(), &[pt(5.0, 5.0)]);
        assert!(g.edges().is_empty());
    }

    #[test]
    fn test_area_of_unit_square() {
        let mut g = Graph::new();
        g.replace(vec![
            pt(0.0, 0.0),
            pt(1.0, 0.0),
            pt(1.0, 1.0),
            pt(0.0, 1.0),
        ]);
        assert!((g.area() - 1.0).abs() < 1e-12);
    }
}
