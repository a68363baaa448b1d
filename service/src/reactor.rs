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

//! Reactor dispatcher: a single-task multiplexed event loop
//!
//! One loop task exclusively owns the watch table; nothing else touches
//! it. Other tasks request changes — register, deregister, stop — by
//! queueing [`ReactorCommand`]s on the wake channel held by a cloneable
//! [`ReactorHandle`]. Each tick drains and applies every queued command
//! *before* dispatching readiness, so fresh registrations are polled the
//! same tick and watches removed this tick are never dispatched. Dispatch
//! itself runs synchronously on the loop task; handlers must not block.
//!
//! Stop is an ordinary queued command: once applied the loop exits after
//! the current pass and the owner joins the task.

use crate::{
    ConnectionHandler, ConnectionId, Result, ServerConfig, ServerMetrics, ServiceError,
    SessionFactory,
};
use futures::{SinkExt, StreamExt};
use hullgraph_protocol::{CodecError, LineCodec};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

type ClientFramed = Framed<TcpStream, LineCodec>;

/// A source watched by the loop
enum Watch {
    /// The listening socket; readiness means a connection to accept
    Listener(TcpListener),
    /// An established connection and its protocol handler
    Client {
        framed: ClientFramed,
        handler: Box<dyn ConnectionHandler>,
        peer: SocketAddr,
    },
}

/// Table mutations queued on the wake channel
enum ReactorCommand {
    Register(ConnectionId, Watch),
    Deregister(ConnectionId),
    Stop,
}

/// One readiness event, consumed from a watch
enum WatchEvent {
    Incoming(std::io::Result<(TcpStream, SocketAddr)>),
    Line(String),
    Failed(CodecError),
    Closed,
}

/// Thread-safe handle for requesting watch-table changes.
///
/// The handle never touches the table directly; every request is queued
/// and applied by the loop between dispatch passes. Requests fail with
/// [`ServiceError::DispatcherStopped`] once the loop has exited.
#[derive(Clone)]
pub struct ReactorHandle {
    commands: mpsc::UnboundedSender<ReactorCommand>,
    next_id: Arc<AtomicU64>,
}

impl ReactorHandle {
    fn allocate_id(&self) -> ConnectionId {
        ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn send(&self, command: ReactorCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| ServiceError::DispatcherStopped)
    }

    fn register(&self, id: ConnectionId, watch: Watch) -> Result<()> {
        self.send(ReactorCommand::Register(id, watch))
    }

    /// Queue removal of a watched connection
    pub fn deregister(&self, id: ConnectionId) -> Result<()> {
        self.send(ReactorCommand::Deregister(id))
    }

    /// Queue a stop request; the loop exits after its current pass
    pub fn stop(&self) -> Result<()> {
        self.send(ReactorCommand::Stop)
    }
}

/// Multiplexed single-task server.
///
/// # Example
///
/// ```no_run
/// use hullgraph_service::{GraphService, ReactorServer, ServerConfig};
/// use std::sync::Arc;
///
/// # async fn run() -> hullgraph_service::Result<()> {
/// let service = Arc::new(GraphService::new());
/// let server = ReactorServer::new(ServerConfig::default(), service).await?;
/// server.start()?;
/// // ... serve until shutdown ...
/// server.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct ReactorServer {
    config: ServerConfig,
    factory: Arc<dyn SessionFactory>,
    handle: ReactorHandle,
    commands: std::sync::Mutex<Option<mpsc::UnboundedReceiver<ReactorCommand>>>,
    listener: std::sync::Mutex<Option<TcpListener>>,
    loop_task: std::sync::Mutex<Option<JoinHandle<()>>>,
    metrics: Arc<ServerMetrics>,
    bind_address: SocketAddr,
}

impl ReactorServer {
    /// Bind the listener; the loop does not run until [`ReactorServer::start`].
    pub async fn new(config: ServerConfig, factory: Arc<dyn SessionFactory>) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_address).await?;
        let bind_address = listener.local_addr()?;
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ReactorHandle {
            commands: tx,
            next_id: Arc::new(AtomicU64::new(1)),
        };
        info!("reactor bound to {}", bind_address);
        Ok(Self {
            config,
            factory,
            handle,
            commands: std::sync::Mutex::new(Some(rx)),
            listener: std::sync::Mutex::new(Some(listener)),
            loop_task: std::sync::Mutex::new(None),
            metrics: Arc::new(ServerMetrics::new()),
            bind_address,
        })
    }

    /// Spawn the loop task with the listener as its first watch
    pub fn start(&self) -> Result<()> {
        let listener = self
            .listener
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
            .ok_or(ServiceError::AlreadyRunning)?;
        let commands = self
            .commands
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
            .ok_or(ServiceError::AlreadyRunning)?;

        let listener_id = self.handle.allocate_id();
        self.handle.register(listener_id, Watch::Listener(listener))?;

        let task = tokio::spawn(reactor_loop(
            commands,
            self.handle.clone(),
            self.factory.clone(),
            self.metrics.clone(),
            self.config.clone(),
        ));
        *self
            .loop_task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(task);
        info!("reactor loop started on {}", self.bind_address);
        Ok(())
    }

    /// Queue a stop command and join the loop task
    pub async fn shutdown(&self) -> Result<()> {
        self.handle.stop()?;
        let task = self
            .loop_task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        match task {
            Some(task) => {
                let _ = task.await;
            }
            None => return Err(ServiceError::NotRunning),
        }
        info!("reactor shut down");
        Ok(())
    }

    /// Address the listener actually bound to
    pub fn bind_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Registration handle (usable from any task)
    pub fn handle(&self) -> ReactorHandle {
        self.handle.clone()
    }

    /// Server counters
    pub fn metrics(&self) -> Arc<ServerMetrics> {
        self.metrics.clone()
    }
}

/// The loop task: owns the watch table exclusively.
async fn reactor_loop(
    mut commands: mpsc::UnboundedReceiver<ReactorCommand>,
    handle: ReactorHandle,
    factory: Arc<dyn SessionFactory>,
    metrics: Arc<ServerMetrics>,
    config: ServerConfig,
) {
    let mut watches: HashMap<ConnectionId, Watch> = HashMap::new();

    loop {
        // Apply every queued table change before dispatching readiness.
        let mut stopping = false;
        loop {
            match commands.try_recv() {
                Ok(command) => stopping |= apply(&mut watches, command, &metrics),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    stopping = true;
                    break;
                }
            }
        }
        if stopping {
            break;
        }

        let (id, event) = tokio::select! {
            biased;
            command = commands.recv() => {
                match command {
                    // Loop back so any further queued commands are also
                    // applied before the next dispatch pass.
                    Some(command) => {
                        if apply(&mut watches, command, &metrics) {
                            break;
                        }
                        continue;
                    }
                    None => break,
                }
            }
            ready = futures::future::poll_fn(|cx| poll_watches(&mut watches, cx)) => ready,
        };

        dispatch(id, event, &mut watches, &handle, &factory, &metrics, &config).await;
    }

    info!("reactor loop terminated ({} watches dropped)", watches.len());
}

/// Apply one queued command; returns true on stop.
fn apply(
    watches: &mut HashMap<ConnectionId, Watch>,
    command: ReactorCommand,
    metrics: &ServerMetrics,
) -> bool {
    match command {
        ReactorCommand::Register(id, watch) => {
            if let Watch::Client { peer, .. } = &watch {
                debug!(%id, %peer, "watch registered");
            }
            watches.insert(id, watch);
            false
        }
        ReactorCommand::Deregister(id) => {
            if let Some(Watch::Client { .. }) = watches.remove(&id) {
                metrics.connection_closed();
                debug!(%id, "watch removed");
            }
            false
        }
        ReactorCommand::Stop => true,
    }
}

/// Poll every watch for readiness; the first ready event wins this tick.
///
/// Table iteration order is the map's, which is effectively random per
/// process — good enough fairness for this loop. Every watch is polled
/// on every pass so each registers its waker before we return Pending.
fn poll_watches(
    watches: &mut HashMap<ConnectionId, Watch>,
    cx: &mut Context<'_>,
) -> Poll<(ConnectionId, WatchEvent)> {
    for (id, watch) in watches.iter_mut() {
        match watch {
            Watch::Listener(listener) => {
                if let Poll::Ready(result) = listener.poll_accept(cx) {
                    return Poll::Ready((*id, WatchEvent::Incoming(result)));
                }
            }
            Watch::Client { framed, .. } => match framed.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(line))) => {
                    return Poll::Ready((*id, WatchEvent::Line(line)));
                }
                Poll::Ready(Some(Err(error))) => {
                    return Poll::Ready((*id, WatchEvent::Failed(error)));
                }
                Poll::Ready(None) => return Poll::Ready((*id, WatchEvent::Closed)),
                Poll::Pending => {}
            },
        }
    }
    Poll::Pending
}

/// Handle one readiness event on the loop task.
///
/// Table changes triggered here (a new connection, a finished one) go
/// through the wake channel and take effect next tick, never by mutating
/// the table in-place.
async fn dispatch(
    id: ConnectionId,
    event: WatchEvent,
    watches: &mut HashMap<ConnectionId, Watch>,
    handle: &ReactorHandle,
    factory: &Arc<dyn SessionFactory>,
    metrics: &Arc<ServerMetrics>,
    config: &ServerConfig,
) {
    match event {
        WatchEvent::Incoming(Ok((stream, peer))) => {
            metrics.connection_accepted();
            let client_id = handle.allocate_id();
            let watch = Watch::Client {
                framed: Framed::new(
                    stream,
                    LineCodec::with_max_line_length(config.max_line_length),
                ),
                handler: factory.create(client_id, peer),
                peer,
            };
            if handle.register(client_id, watch).is_err() {
                warn!(%peer, "reactor stopping, dropping accepted connection");
                return;
            }
            info!(%client_id, %peer, "connection accepted");
        }
        WatchEvent::Incoming(Err(error)) => {
            metrics.io_error();
            warn!(%error, "accept failed");
        }
        WatchEvent::Line(line) => {
            let Some(Watch::Client { framed, handler, .. }) = watches.get_mut(&id) else {
                return;
            };
            metrics.line_dispatched();
            if let Some(reply) = handler.on_line(&line).await {
                match framed.send(reply).await {
                    Ok(()) => metrics.reply_sent(),
                    Err(error) => {
                        metrics.io_error();
                        warn!(%id, %error, "reply write failed");
                        let _ = handle.deregister(id);
                    }
                }
            }
        }
        WatchEvent::Failed(error) => {
            metrics.io_error();
            warn!(%id, %error, "connection failed");
            let _ = handle.deregister(id);
        }
        WatchEvent::Closed => {
            debug!(%id, "peer closed connection");
            let _ = handle.deregister(id);
        }
    }
}
