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

//! Proactor dispatcher: one detached worker task per connection
//!
//! An accept task hands each new connection its own worker. Workers run
//! independently of the accept loop and of each other; the only state
//! they share is the [`GeometryStore`](crate::GeometryStore) behind the
//! session factory and the connection registry. Shutdown interrupts the
//! accept task only — in-flight workers keep serving their peers until
//! those connections close.

use crate::{
    ConnectionHandler, ConnectionId, Result, ServerConfig, ServerMetrics, ServiceError,
    SessionFactory,
};
use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use hullgraph_protocol::LineCodec;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// Per-connection-task server.
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
/// // ... serve until shutdown ...
/// server.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct ProactorServer {
    config: ServerConfig,
    factory: Arc<dyn SessionFactory>,
    listener: std::sync::Mutex<Option<TcpListener>>,
    connections: Arc<DashMap<ConnectionId, SocketAddr>>,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_task: std::sync::Mutex<Option<JoinHandle<()>>>,
    next_id: Arc<AtomicU64>,
    metrics: Arc<ServerMetrics>,
    bind_address: SocketAddr,
}

impl ProactorServer {
    /// Bind the listener; accepting does not begin until [`ProactorServer::start`].
    pub async fn new(config: ServerConfig, factory: Arc<dyn SessionFactory>) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_address).await?;
        let bind_address = listener.local_addr()?;
        info!("proactor bound to {}", bind_address);
        Ok(Self {
            config,
            factory,
            listener: std::sync::Mutex::new(Some(listener)),
            connections: Arc::new(DashMap::new()),
            running: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(Notify::new()),
            accept_task: std::sync::Mutex::new(None),
            next_id: Arc::new(AtomicU64::new(1)),
            metrics: Arc::new(ServerMetrics::new()),
            bind_address,
        })
    }

    /// Spawn the accept task
    pub fn start(&self) -> Result<()> {
        let listener = self
            .listener
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
            .ok_or(ServiceError::AlreadyRunning)?;
        self.running.store(true, Ordering::SeqCst);

        let task = tokio::spawn(accept_loop(
            listener,
            self.factory.clone(),
            self.connections.clone(),
            self.running.clone(),
            self.shutdown.clone(),
            self.next_id.clone(),
            self.metrics.clone(),
            self.config.clone(),
        ));
        *self
            .accept_task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(task);
        info!("proactor accepting on {}", self.bind_address);
        Ok(())
    }

    /// Stop accepting and join the accept task.
    ///
    /// Connection workers are not interrupted; each finishes with its
    /// own peer.
    pub async fn shutdown(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(ServiceError::NotRunning);
        }
        // notify_one stores a permit, so the wakeup is not lost even if
        // the accept task is mid-iteration rather than parked in select.
        self.shutdown.notify_one();
        let task = self
            .accept_task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            let _ = task.await;
        }
        info!(
            "proactor shut down ({} workers still serving)",
            self.connections.len()
        );
        Ok(())
    }

    /// Address the listener actually bound to
    pub fn bind_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Connections currently served by a worker
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Server counters
    pub fn metrics(&self) -> Arc<ServerMetrics> {
        self.metrics.clone()
    }
}

async fn accept_loop(
    listener: TcpListener,
    factory: Arc<dyn SessionFactory>,
    connections: Arc<DashMap<ConnectionId, SocketAddr>>,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    next_id: Arc<AtomicU64>,
    metrics: Arc<ServerMetrics>,
    config: ServerConfig,
) {
    loop {
        // Covers shutdowns landing during the error backoff below.
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let accepted = tokio::select! {
            accepted = listener.accept() => accepted,
            _ = shutdown.notified() => break,
        };
        match accepted {
            Ok((stream, peer)) => {
                let id = ConnectionId::new(next_id.fetch_add(1, Ordering::Relaxed));
                metrics.connection_accepted();
                connections.insert(id, peer);
                info!(%id, %peer, "connection accepted");
                let handler = factory.create(id, peer);
                tokio::spawn(connection_worker(
                    id,
                    stream,
                    handler,
                    connections.clone(),
                    metrics.clone(),
                    config.max_line_length,
                ));
            }
            Err(error) => {
                metrics.io_error();
                warn!(%error, "accept failed");
                // Transient resource errors (EMFILE and friends) resolve
                // once a connection closes; back off instead of spinning.
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
    debug!("accept loop stopped");
}

/// Serve one connection to completion
async fn connection_worker(
    id: ConnectionId,
    stream: TcpStream,
    mut handler: Box<dyn ConnectionHandler>,
    connections: Arc<DashMap<ConnectionId, SocketAddr>>,
    metrics: Arc<ServerMetrics>,
    max_line_length: usize,
) {
    let mut framed = Framed::new(stream, LineCodec::with_max_line_length(max_line_length));
    loop {
        match framed.next().await {
            Some(Ok(line)) => {
                metrics.line_dispatched();
                if let Some(reply) = handler.on_line(&line).await {
                    match framed.send(reply).await {
                        Ok(()) => metrics.reply_sent(),
                        Err(error) => {
                            metrics.io_error();
                            warn!(%id, %error, "reply write failed");
                            break;
                        }
                    }
                }
            }
            Some(Err(error)) => {
                metrics.io_error();
                warn!(%id, %error, "connection failed");
                break;
            }
            None => {
                debug!(%id, "peer closed connection");
                break;
            }
        }
    }
    connections.remove(&id);
    metrics.connection_closed();
}
