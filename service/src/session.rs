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

//! Per-connection sessions and the handler capability interface
//!
//! Both dispatchers route decoded lines through the same seam: a
//! [`ConnectionHandler`] minted per connection by a [`SessionFactory`].
//! The production implementation, [`GraphSession`], runs the protocol
//! state machine and executes completed commands against the shared
//! [`GeometryStore`], publishing the area after each hull query so the
//! monitor can observe transitions.

use crate::{ConnectionId, GeometryStore};
use async_trait::async_trait;
use hullgraph_protocol::{Command, CommandMachine, LineOutcome, Reply};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::trace;

/// Capability interface for one connection's protocol handling.
///
/// The dispatcher calls [`ConnectionHandler::on_line`] once per complete
/// decoded line; the returned string, if any, is written back to the
/// peer. Implementations own their connection state exclusively and are
/// never shared between tasks.
#[async_trait]
pub trait ConnectionHandler: Send {
    /// Handle one decoded line and produce at most one reply line.
    async fn on_line(&mut self, line: &str) -> Option<String>;
}

/// Mints a [`ConnectionHandler`] for each accepted connection.
pub trait SessionFactory: Send + Sync {
    /// Called by the dispatcher when a connection is accepted.
    fn create(&self, id: ConnectionId, peer: SocketAddr) -> Box<dyn ConnectionHandler>;
}

/// Shared application state behind both dispatchers: the geometry store
/// plus the latest-area channel the monitor subscribes to.
///
/// # Example
///
/// ```no_run
/// use hullgraph_service::{GraphService, ProactorServer, ServerConfig};
/// use std::sync::Arc;
///
/// # async fn run() -> hullgraph_service::Result<()> {
/// let service = Arc::new(GraphService::new());
/// let server = ProactorServer::new(ServerConfig::default(), service).await?;
/// server.start()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GraphService {
    store: Arc<GeometryStore>,
    areas: watch::Sender<f64>,
}

impl GraphService {
    /// Create a service with an empty graph
    pub fn new() -> Self {
        let (areas, _) = watch::channel(0.0);
        Self {
            store: Arc::new(GeometryStore::new()),
            areas,
        }
    }

    /// The shared geometry store
    pub fn store(&self) -> Arc<GeometryStore> {
        self.store.clone()
    }

    /// Subscribe to the latest published hull area
    pub fn subscribe_area(&self) -> watch::Receiver<f64> {
        self.areas.subscribe()
    }
}

impl Default for GraphService {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionFactory for GraphService {
    fn create(&self, id: ConnectionId, peer: SocketAddr) -> Box<dyn ConnectionHandler> {
        Box::new(GraphSession {
            id,
            peer,
            machine: CommandMachine::new(),
            store: self.store.clone(),
            areas: self.areas.clone(),
        })
    }
}

/// One connection's protocol session: state machine plus store access.
pub struct GraphSession {
    id: ConnectionId,
    peer: SocketAddr,
    machine: CommandMachine,
    store: Arc<GeometryStore>,
    areas: watch::Sender<f64>,
}

#[async_trait]
impl ConnectionHandler for GraphSession {
    async fn on_line(&mut self, line: &str) -> Option<String> {
        trace!(id = %self.id, peer = %self.peer, line, "line received");
        match self.machine.feed(line) {
            LineOutcome::Silent => None,
            LineOutcome::Reply(reply) => Some(reply.to_string()),
            LineOutcome::Dispatch(command) => {
                let is_hull_query = matches!(command, Command::Hull);
                let reply = self.store.execute(command);
                if is_hull_query {
                    if let Reply::Area(area) = reply {
                        // Signal the monitor; receivers may conflate to
                        // the latest value.
                        let _ = self.areas.send_replace(area);
                    }
                }
                Some(reply.to_string())
            }
        }
    }
}
