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

//! Wire protocol for the hullgraph service
//!
//! Two layers live here, both free of sockets and shared state:
//!
//! - [`LineCodec`] — a tokio-util [`Decoder`]/[`Encoder`] pair that
//!   assembles newline-terminated ASCII lines across arbitrary TCP
//!   fragmentation and tolerates a trailing carriage return.
//! - [`CommandMachine`] — the per-connection protocol state machine: a
//!   pure transition from (state, raw line) to a new state plus at most
//!   one [`Reply`] or one [`Command`] to run against the geometry store.
//!
//! Multi-line commands (`NewGraph <n>` followed by `n` point lines) are
//! assembled incrementally by the machine; the protocol intentionally
//! produces no output until the whole batch has been consumed.
//!
//! [`Decoder`]: tokio_util::codec::Decoder
//! [`Encoder`]: tokio_util::codec::Encoder

mod codec;
mod command;
mod machine;

pub use codec::{CodecError, DEFAULT_MAX_LINE_LENGTH, LineCodec};
pub use command::{Command, Reply};
pub use machine::{CommandMachine, LineOutcome, SessionState};
