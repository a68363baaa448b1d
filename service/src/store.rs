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

//! Thread-safe geometry store
//!
//! [`GeometryStore`] is the one piece of state shared across all
//! connection handlers. Every operation holds the lock only for the
//! duration of the pure graph call — never across network I/O — so a
//! slow peer cannot stall unrelated connections.

use hullgraph_geometry::{Graph, GraphError, Point};
use hullgraph_protocol::{Command, Reply};
use std::sync::{Mutex, MutexGuard};

/// Exclusive owner of the planar graph, serializing all access.
#[derive(Debug, Default)]
pub struct GeometryStore {
    graph: Mutex<Graph>,
}

impl GeometryStore {
    /// Create a store with an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the graph in a torn
    // state (every mutation is a single Vec operation), so a poisoned
    // lock is safe to recover.
    fn graph(&self) -> MutexGuard<'_, Graph> {
        self.graph
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Replace the whole point set, discarding all edges
    pub fn replace(&self, points: Vec<Point>) {
        self.graph().replace(points);
    }

    /// Insert a point
    pub fn add_point(&self, p: Point) -> Result<(), GraphError> {
        self.graph().add_point(p)
    }

    /// Remove a point (edges referencing it are left in place)
    pub fn remove_point(&self, p: Point) -> Result<(), GraphError> {
        self.graph().remove_point(p)
    }

    /// Insert an undirected edge between two existing points
    pub fn add_edge(&self, a: Point, b: Point) -> Result<(), GraphError> {
        self.graph().add_edge(a, b)
    }

    /// Remove an undirected edge
    pub fn remove_edge(&self, a: Point, b: Point) -> Result<(), GraphError> {
        self.graph().remove_edge(a, b)
    }

    /// Snapshot of the current point set
    pub fn points(&self) -> Vec<Point> {
        self.graph().points().to_vec()
    }

    /// Snapshot of the current edge set
    pub fn edges(&self) -> Vec<(Point, Point)> {
        self.graph().edges().to_vec()
    }

    /// Convex hull and enclosed area, computed under one lock acquisition
    pub fn hull_area(&self) -> (Vec<Point>, f64) {
        let graph = self.graph();
        let hull = graph.convex_hull();
        let area = hullgraph_geometry::polygon_area(&hull);
        (hull, area)
    }

    /// Execute a decoded command and produce its wire reply.
    ///
    /// This is the dispatch path shared by both server variants; semantic
    /// rejections come back as failure replies, never as errors.
    pub fn execute(&self, command: Command) -> Reply {
        match command {
            Command::Replace(points) => {
                self.replace(points);
                Reply::GraphCreated
            }
            Command::AddPoint(p) => match self.add_point(p) {
                Ok(()) => Reply::PointAdded(p),
                Err(e) => Reply::AddPointFailed(e),
            },
            Command::RemovePoint(p) => match self.remove_point(p) {
                Ok(()) => Reply::PointRemoved(p),
                Err(e) => Reply::RemovePointFailed(e),
            },
            Command::AddEdge(a, b) => match self.add_edge(a, b) {
                Ok(()) => Reply::EdgeAdded(a, b),
                Err(e) => Reply::AddEdgeFailed(e),
            },
            Command::RemoveEdge(a, b) => match self.remove_edge(a, b) {
                Ok(()) => Reply::EdgeRemoved(a, b),
                Err(e) => Reply::RemoveEdgeFailed(e),
            },
            Command::Hull => {
                let (_, area) = self.hull_area();
                Reply::Area(area)
            }
        }
    }
}
