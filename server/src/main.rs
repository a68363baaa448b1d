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

//! Convex hull graph service daemon
//!
//! Usage: `hullgraphd [reactor|proactor] [bind-address]`
//!
//! Defaults to the proactor dispatcher on `0.0.0.0:9034`. Runs until
//! Ctrl-C, then stops accepting; area notices print to stdout as the
//! monitor observes threshold crossings.

use hullgraph_service::{
    AreaMonitor, DispatchMode, GraphService, ProactorServer, ReactorServer, ServerConfig,
};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

fn parse_args() -> Result<(DispatchMode, SocketAddr), String> {
    let mut args = std::env::args().skip(1);
    let mode = match args.next() {
        Some(arg) => arg
            .parse::<DispatchMode>()
            .map_err(|e| e.to_string())?,
        None => DispatchMode::Proactor,
    };
    let bind_address = match args.next() {
        Some(arg) => arg
            .parse::<SocketAddr>()
            .map_err(|e| format!("invalid bind address `{arg}`: {e}"))?,
        None => ServerConfig::default().bind_address,
    };
    if args.next().is_some() {
        return Err("usage: hullgraphd [reactor|proactor] [bind-address]".to_string());
    }
    Ok((mode, bind_address))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

    let (mode, bind_address) = match parse_args() {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let config = ServerConfig::new(bind_address);
    let threshold = config.area_threshold;
    let service = Arc::new(GraphService::new());

    let (monitor, mut notices) = AreaMonitor::spawn(service.subscribe_area(), threshold);
    let notice_task = tokio::spawn(async move {
        while let Some(notice) = notices.recv().await {
            println!("{notice}");
        }
    });

    info!(%mode, %bind_address, "starting hullgraphd");
    let outcome = match mode {
        DispatchMode::Reactor => run_reactor(config, service).await,
        DispatchMode::Proactor => run_proactor(config, service).await,
    };

    monitor.shutdown().await;
    notice_task.abort();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run_reactor(
    config: ServerConfig,
    service: Arc<GraphService>,
) -> hullgraph_service::Result<()> {
    let server = ReactorServer::new(config, service).await?;
    server.start()?;
    wait_for_ctrl_c().await;
    server.shutdown().await
}

async fn run_proactor(
    config: ServerConfig,
    service: Arc<GraphService>,
) -> hullgraph_service::Result<()> {
    let server = ProactorServer::new(config, service).await?;
    server.start()?;
    wait_for_ctrl_c().await;
    server.shutdown().await
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("interrupt received, shutting down"),
        Err(error) => error!(%error, "failed to listen for interrupt"),
    }
}
