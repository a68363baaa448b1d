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

//! Per-connection protocol state machine
//!
//! [`CommandMachine`] decodes the command grammar one line at a time. It
//! holds no sockets and touches no shared state: feeding a line yields at
//! most one reply or one store command, which makes fragmentation and
//! abort behavior testable without any I/O.

use crate::{Command, Reply};
use hullgraph_geometry::Point;

/// Protocol decoding state for one connection.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Waiting for a command keyword line
    #[default]
    AwaitingCommand,
    /// Collecting the point lines of a `NewGraph` batch.
    ///
    /// `remaining` is at least 1 and strictly decreases by one per
    /// accepted point line.
    CollectingPoints {
        /// Point lines still expected
        remaining: usize,
        /// Points accepted so far
        pending: Vec<Point>,
    },
}

/// Result of feeding one line to the machine
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Nothing to do yet (blank line, or a batch still collecting)
    Silent,
    /// Answer the client without touching the store
    Reply(Reply),
    /// Run this command against the store and reply from its outcome
    Dispatch(Command),
}

/// Incremental decoder for the line-oriented command grammar.
///
/// # Example
///
/// ```
/// use hullgraph_protocol::{Command, CommandMachine, LineOutcome};
///
/// let mut machine = CommandMachine::new();
/// assert_eq!(machine.feed("NewGraph 1"), LineOutcome::Silent);
/// let LineOutcome::Dispatch(Command::Replace(points)) = machine.feed("2,3") else {
///     panic!("expected a replace command");
/// };
/// assert_eq!(points.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandMachine {
    state: SessionState,
}

impl CommandMachine {
    /// Create a machine awaiting its first command
    pub fn new() -> Self {
        Self::default()
    }

    /// Current decoding state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Consume one raw line (terminator already stripped) and advance.
    pub fn feed(&mut self, line: &str) -> LineOutcome {
        match std::mem::take(&mut self.state) {
            SessionState::AwaitingCommand => self.command_line(line),
            SessionState::CollectingPoints { remaining, pending } => {
                self.point_line(line, remaining, pending)
            }
        }
    }

    fn command_line(&mut self, line: &str) -> LineOutcome {
        let line = line.trim();
        if line.is_empty() {
            // Blank lines are ignored between commands only.
            return LineOutcome::Silent;
        }
        let (keyword, args) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };
        match keyword {
            "NewGraph" => self.new_graph(args),
            "CH" => LineOutcome::Dispatch(Command::Hull),
            "NewPoint" => Self::point_command(args, Command::AddPoint),
            "RemovePoint" => Self::point_command(args, Command::RemovePoint),
            "AddEdge" => Self::edge_command(args, Command::AddEdge),
            "RemoveEdge" => Self::edge_command(args, Command::RemoveEdge),
            _ => LineOutcome::Reply(Reply::UnknownCommand),
        }
    }

    fn new_graph(&mut self, args: &str) -> LineOutcome {
        match args.parse::<usize>() {
            Ok(0) => LineOutcome::Dispatch(Command::Replace(Vec::new())),
            Ok(count) => {
                self.state = SessionState::CollectingPoints {
                    remaining: count,
                    pending: Vec::with_capacity(count.min(1024)),
                };
                LineOutcome::Silent
            }
            Err(_) => LineOutcome::Reply(Reply::InvalidCount(args.to_string())),
        }
    }

    fn point_command(args: &str, build: fn(Point) -> Command) -> LineOutcome {
        match args.parse::<Point>() {
            Ok(point) => LineOutcome::Dispatch(build(point)),
            Err(_) => LineOutcome::Reply(Reply::InvalidPoint(args.to_string())),
        }
    }

    /// Parse `x1,y1,x2,y2`; the space-separated form `x1,y1 x2,y2` is
    /// accepted as well.
    fn edge_command(args: &str, build: fn(Point, Point) -> Command) -> LineOutcome {
        if let Some((first, second)) = args.split_once(char::is_whitespace) {
            if let (Ok(a), Ok(b)) = (first.trim().parse(), second.trim().parse()) {
                return LineOutcome::Dispatch(build(a, b));
            }
            return LineOutcome::Reply(Reply::InvalidPoint(args.to_string()));
        }
        let fields: Vec<&str> = args.split(',').collect();
        if fields.len() == 4 {
            let a = format!("{},{}", fields[0], fields[1]).parse();
            let b = format!("{},{}", fields[2], fields[3]).parse();
            if let (Ok(a), Ok(b)) = (a, b) {
                return LineOutcome::Dispatch(build(a, b));
            }
        }
        LineOutcome::Reply(Reply::InvalidPoint(args.to_string()))
    }

    fn point_line(&mut self, line: &str, remaining: usize, mut pending: Vec<Point>) -> LineOutcome {
        // Inside a batch every line is data, blank ones included, so the
        // declared count is preserved.
        match line.trim().parse::<Point>() {
            Ok(point) => {
                pending.push(point);
                if remaining == 1 {
                    LineOutcome::Dispatch(Command::Replace(pending))
                } else {
                    self.state = SessionState::CollectingPoints {
                        remaining: remaining - 1,
                        pending,
                    };
                    LineOutcome::Silent
                }
            }
            Err(_) => {
                // Abort the whole batch; the graph is left unmodified.
                LineOutcome::Reply(Reply::InvalidPoint(line.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_blank_lines_between_commands_are_ignored() {
        let mut m = CommandMachine::new();
        assert_eq!(m.feed(""), LineOutcome::Silent);
        assert_eq!(m.feed("   "), LineOutcome::Silent);
        assert_eq!(m.state(), &SessionState::AwaitingCommand);
    }

    #[test]
    fn test_unknown_keyword() {
        let mut m = CommandMachine::new();
        assert_eq!(
            m.feed("Frobnicate 1,2"),
            LineOutcome::Reply(Reply::UnknownCommand)
        );
        // Keywords are case-sensitive.
        assert_eq!(m.feed("ch"), LineOutcome::Reply(Reply::UnknownCommand));
    }

    #[test]
    fn test_ch_dispatches_hull_query() {
        let mut m = CommandMachine::new();
        assert_eq!(m.feed("CH"), LineOutcome::Dispatch(Command::Hull));
    }

    #[test]
    fn test_point_commands() {
        let mut m = CommandMachine::new();
        assert_eq!(
            m.feed("NewPoint 1,2"),
            LineOutcome::Dispatch(Command::AddPoint(pt(1.0, 2.0)))
        );
        assert_eq!(
            m.feed("RemovePoint 1,2"),
            LineOutcome::Dispatch(Command::RemovePoint(pt(1.0, 2.0)))
        );
        assert_eq!(
            m.feed("NewPoint 1;2"),
            LineOutcome::Reply(Reply::InvalidPoint("1;2".to_string()))
        );
    }

    #[test]
    fn test_edge_commands_both_forms() {
        let mut m = CommandMachine::new();
        let expected = LineOutcome::Dispatch(Command::AddEdge(pt(1.0, 2.0), pt(3.0, 4.0)));
        assert_eq!(m.feed("AddEdge 1,2,3,4"), expected);
        assert_eq!(m.feed("AddEdge 1,2 3,4"), expected);
        assert_eq!(
            m.feed("RemoveEdge 1,2 3,4"),
            LineOutcome::Dispatch(Command::RemoveEdge(pt(1.0, 2.0), pt(3.0, 4.0)))
        );
        assert_eq!(
            m.feed("AddEdge 1,2,3"),
            LineOutcome::Reply(Reply::InvalidPoint("1,2,3".to_string()))
        );
    }

    #[test]
    fn test_new_graph_batch() {
        let mut m = CommandMachine::new();
        assert_eq!(m.feed("NewGraph 2"), LineOutcome::Silent);
        assert!(matches!(
            m.state(),
            SessionState::CollectingPoints { remaining: 2, .. }
        ));
        assert_eq!(m.feed("0,0"), LineOutcome::Silent);
        assert_eq!(
            m.feed("1,1"),
            LineOutcome::Dispatch(Command::Replace(vec![pt(0.0, 0.0), pt(1.0, 1.0)]))
        );
        assert_eq!(m.state(), &SessionState::AwaitingCommand);
    }

    #[test]
    fn test_new_graph_zero_replaces_immediately() {
        let mut m = CommandMachine::new();
        assert_eq!(
            m.feed("NewGraph 0"),
            LineOutcome::Dispatch(Command::Replace(Vec::new()))
        );
    }

    #[test]
    fn test_new_graph_malformed_count() {
        let mut m = CommandMachine::new();
        assert_eq!(
            m.feed("NewGraph two"),
            LineOutcome::Reply(Reply::InvalidCount("two".to_string()))
        );
        assert_eq!(
            m.feed("NewGraph -3"),
            LineOutcome::Reply(Reply::InvalidCount("-3".to_string()))
        );
        assert_eq!(m.state(), &SessionState::AwaitingCommand);
    }

    #[test]
    fn test_bad_point_line_aborts_batch() {
        let mut m = CommandMachine::new();
        m.feed("NewGraph 3");
        assert_eq!(m.feed("0,0"), LineOutcome::Silent);
        assert_eq!(
            m.feed("oops"),
            LineOutcome::Reply(Reply::InvalidPoint("oops".to_string()))
        );
        // Pending points were discarded and we are back to commands.
        assert_eq!(m.state(), &SessionState::AwaitingCommand);
        assert_eq!(m.feed("CH"), LineOutcome::Dispatch(Command::Hull));
    }

    #[test]
    fn test_blank_line_inside_batch_is_data() {
        let mut m = CommandMachine::new();
        m.feed("NewGraph 2");
        assert_eq!(
            m.feed(""),
            LineOutcome::Reply(Reply::InvalidPoint("".to_string()))
        );
        assert_eq!(m.state(), &SessionState::AwaitingCommand);
    }

    #[test]
    fn test_remaining_strictly_decreases() {
        let mut m = CommandMachine::new();
        m.feed("NewGraph 3");
        for expected in [2usize, 1] {
            m.feed("5,5");
            match m.state() {
                SessionState::CollectingPoints { remaining, .. } => {
                    assert_eq!(*remaining, expected);
                }
                other => panic!("unexpected state: {:?}", other),
            }
        }
    }
}
