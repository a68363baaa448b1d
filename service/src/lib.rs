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

//! Hullgraph Service
//!
//! Networked graph service over the line protocol, offered in two
//! dispatch flavors that share every layer above the socket:
//!
//! * [`ReactorServer`] — one loop task multiplexes the listener and all
//!   client connections through a watch table it owns exclusively.
//! * [`ProactorServer`] — an accept task spawns a detached worker per
//!   connection.
//!
//! Both mint a [`ConnectionHandler`] per connection from a
//! [`SessionFactory`] (production: [`GraphService`]), execute decoded
//! commands against one shared [`GeometryStore`], and publish hull areas
//! for the [`AreaMonitor`] to latch against its threshold.

mod config;
mod error;
mod metrics;
mod monitor;
mod proactor;
mod reactor;
mod session;
mod store;
mod types;

pub use self::config::{
    DEFAULT_AREA_THRESHOLD, DEFAULT_PORT, DispatchMode, ParseDispatchModeError, ServerConfig,
};
pub use self::error::{Result, ServiceError};
pub use self::metrics::{MetricsSnapshot, ServerMetrics};
pub use self::monitor::{AreaMonitor, AreaNotice};
pub use self::proactor::ProactorServer;
pub use self::reactor::{ReactorHandle, ReactorServer};
pub use self::session::{ConnectionHandler, GraphService, GraphSession, SessionFactory};
pub use self::store::GeometryStore;
pub use self::types::ConnectionId;
