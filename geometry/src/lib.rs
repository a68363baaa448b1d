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

//! Planar geometry primitives for the hullgraph service
//!
//! This crate owns the mutable point/edge graph and the pure numeric
//! routines it is queried through:
//!
//! - [`Point`] — an immutable planar point with exact coordinate equality
//! - [`Graph`] — an unordered set of unique points plus undirected edges
//! - [`convex_hull`] — Andrew's monotone chain over a point slice
//! - [`polygon_area`] — shoelace area of an ordered vertex list
//!
//! Everything here is synchronous and free of I/O; thread safety is the
//! responsibility of the owning service layer.

mod graph;
mod hull;
mod point;

pub use graph::{Graph, GraphError};
pub use hull::{convex_hull, polygon_area};
pub use point::{ParsePointError, Point};
