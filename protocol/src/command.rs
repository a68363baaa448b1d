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

//! Decoded commands and reply encoding

use hullgraph_geometry::{GraphError, Point};
use std::fmt;

/// A fully assembled geometry store command.
///
/// Produced by the [`CommandMachine`](crate::CommandMachine) once a
/// complete (possibly multi-line) command has been parsed; executed by
/// the dispatcher under the store lock.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace the whole graph with the given point set
    Replace(Vec<Point>),
    /// Insert a single point
    AddPoint(Point),
    /// Remove a single point
    RemovePoint(Point),
    /// Insert an undirected edge
    AddEdge(Point, Point),
    /// Remove an undirected edge
    RemoveEdge(Point, Point),
    /// Query the convex hull and its area
    Hull,
}

/// A single-line reply to the client.
///
/// The [`fmt::Display`] form is the exact wire text, without the line
/// terminator (the codec appends it).
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A `NewGraph` batch was installed
    GraphCreated,
    /// Result of a `CH` query
    Area(f64),
    /// A point was inserted
    PointAdded(Point),
    /// A point was removed
    PointRemoved(Point),
    /// An edge was inserted
    EdgeAdded(Point, Point),
    /// An edge was removed
    EdgeRemoved(Point, Point),
    /// The store rejected a `NewPoint`
    AddPointFailed(GraphError),
    /// The store rejected a `RemovePoint`
    RemovePointFailed(GraphError),
    /// The store rejected an `AddEdge`
    AddEdgeFailed(GraphError),
    /// The store rejected a `RemoveEdge`
    RemoveEdgeFailed(GraphError),
    /// A line could not be parsed as `x,y` (aborts a pending batch)
    InvalidPoint(String),
    /// The `NewGraph` count was not a non-negative integer
    InvalidCount(String),
    /// Unrecognized command keyword
    UnknownCommand,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::GraphCreated => write!(f, "New graph created"),
            Reply::Area(area) => write!(f, "Area = {}", area),
            Reply::PointAdded(p) => write!(f, "Point added: {}", p),
            Reply::PointRemoved(p) => write!(f, "Point removed: {}", p),
            Reply::EdgeAdded(a, b) => write!(f, "Edge added: ({}) - ({})", a, b),
            Reply::EdgeRemoved(a, b) => write!(f, "Edge removed: ({}) - ({})", a, b),
            Reply::AddPointFailed(e) => write!(f, "Failed to add point ({})", e),
            Reply::RemovePointFailed(e) => write!(f, "Failed to remove point ({})", e),
            Reply::AddEdgeFailed(e) => write!(f, "Failed to add edge ({})", e),
            Reply::RemoveEdgeFailed(e) => write!(f, "Failed to remove edge ({})", e),
            Reply::InvalidPoint(line) => write!(f, "Invalid point format: {}", line),
            Reply::InvalidCount(arg) => write!(f, "Invalid point count: {}", arg),
            Reply::UnknownCommand => write!(f, "Unknown command"),
        }
    }
}
