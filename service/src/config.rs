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

//! Server configuration

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use thiserror::Error;

/// Default listening port
pub const DEFAULT_PORT: u16 = 9034;

/// Area threshold the monitor watches for crossings
pub const DEFAULT_AREA_THRESHOLD: f64 = 100.0;

/// Server configuration shared by both dispatcher variants
///
/// # Example
///
/// ```
/// use hullgraph_service::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1:0".parse().unwrap())
///     .with_max_line_length(1024);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub bind_address: SocketAddr,
    /// Cap on a single protocol line, in bytes
    pub max_line_length: usize,
    /// Hull area at or above which the monitor latches "large"
    pub area_threshold: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            max_line_length: hullgraph_protocol::DEFAULT_MAX_LINE_LENGTH,
            area_threshold: DEFAULT_AREA_THRESHOLD,
        }
    }
}

impl ServerConfig {
    /// Create a configuration listening on the given address
    pub fn new(bind_address: SocketAddr) -> Self {
        Self {
            bind_address,
            ..Self::default()
        }
    }

    /// Set the per-line length cap
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Set the monitor's area threshold
    pub fn with_area_threshold(mut self, area_threshold: f64) -> Self {
        self.area_threshold = area_threshold;
        self
    }
}

/// Which dispatch architecture to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Single-threaded multiplexed event loop
    Reactor,
    /// One worker task per accepted connection
    Proactor,
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchMode::Reactor => write!(f, "reactor"),
            DispatchMode::Proactor => write!(f, "proactor"),
        }
    }
}

/// Error parsing a [`DispatchMode`]
#[derive(Debug, Error)]
#[error("unknown dispatch mode `{0}`, expected `reactor` or `proactor`")]
pub struct ParseDispatchModeError(String);

impl FromStr for DispatchMode {
    type Err = ParseDispatchModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "reactor" => Ok(DispatchMode::Reactor),
            "proactor" => Ok(DispatchMode::Proactor),
            other => Err(ParseDispatchModeError(other.to_string())),
        }
    }
}
