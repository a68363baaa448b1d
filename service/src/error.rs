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

//! Error types for the hullgraph service

use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Service error types
#[derive(Debug, Error)]
pub enum ServiceError {
    /// I/O error from a socket or the listener
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol error from the codec layer
    #[error("protocol error: {0}")]
    Codec(#[from] hullgraph_protocol::CodecError),

    /// The server has not been started
    #[error("server not running")]
    NotRunning,

    /// The server was already started
    #[error("server already running")]
    AlreadyRunning,

    /// The dispatch loop has stopped and no longer accepts registrations
    #[error("dispatcher stopped")]
    DispatcherStopped,
}

impl ServiceError {
    /// Check whether the error terminates a single connection rather
    /// than the whole service.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, ServiceError::Io(_) | ServiceError::Codec(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_classification() {
        let io = ServiceError::Io(std::io::Error::other("boom"));
        assert!(io.is_connection_error());
        assert!(!ServiceError::NotRunning.is_connection_error());
        assert!(!ServiceError::DispatcherStopped.is_connection_error());
    }
}
