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

//! Codec + state machine integration: full command streams through the
//! line codec, delivered with arbitrary fragmentation.

use futures::StreamExt;
use hullgraph_geometry::Point;
use hullgraph_protocol::{Command, CommandMachine, LineCodec, LineOutcome};
use tokio::io::AsyncWriteExt;
use tokio_util::codec::FramedRead;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

#[tokio::test]
async fn test_fragmented_new_graph_parses_as_three_lines() {
    let (mut tx, rx) = tokio::io::duplex(64);
    let mut lines = FramedRead::new(rx, LineCodec::new());

    let writer = tokio::spawn(async move {
        // Mid-line splits across several transport deliveries.
        for chunk in [&b"NewGra"[..], b"ph 2\n0,0", b"\n3", b",3\n"] {
            tx.write_all(chunk).await.unwrap();
            tx.flush().await.unwrap();
            tokio::task::yield_now().await;
        }
    });

    let mut machine = CommandMachine::new();
    let mut dispatched = Vec::new();
    while let Some(line) = lines.next().await {
        if let LineOutcome::Dispatch(command) = machine.feed(&line.unwrap()) {
            dispatched.push(command);
        }
    }
    writer.await.unwrap();

    assert_eq!(
        dispatched,
        vec![Command::Replace(vec![pt(0.0, 0.0), pt(3.0, 3.0)])]
    );
}

#[tokio::test]
async fn test_command_stream_with_crlf_and_blank_lines() {
    let (mut tx, rx) = tokio::io::duplex(256);
    let mut lines = FramedRead::new(rx, LineCodec::new());

    tokio::spawn(async move {
        tx.write_all(b"\r\nNewPoint 1,2\r\nCH\r\n\r\nAddEdge 1,2,3,4\r\n")
            .await
            .unwrap();
    });

    let mut machine = CommandMachine::new();
    let mut outcomes = Vec::new();
    while let Some(line) = lines.next().await {
        outcomes.push(machine.feed(&line.unwrap()));
    }

    assert_eq!(
        outcomes,
        vec![
            LineOutcome::Silent,
            LineOutcome::Dispatch(Command::AddPoint(pt(1.0, 2.0))),
            LineOutcome::Dispatch(Command::Hull),
            LineOutcome::Silent,
            LineOutcome::Dispatch(Command::AddEdge(pt(1.0, 2.0), pt(3.0, 4.0))),
        ]
    );
}

#[tokio::test]
async fn test_aborted_batch_resynchronizes() {
    let (mut tx, rx) = tokio::io::duplex(256);
    let mut lines = FramedRead::new(rx, LineCodec::new());

    tokio::spawn(async move {
        tx.write_all(b"NewGraph 3\n1,1\nnot-a-point\nCH\n")
            .await
            .unwrap();
    });

    let mut machine = CommandMachine::new();
    let mut outcomes = Vec::new();
    while let Some(line) = lines.next().await {
        outcomes.push(machine.feed(&line.unwrap()));
    }

    // The bad point line aborts the batch; the following CH is decoded
    // as a fresh command, not as batch data.
    assert_eq!(outcomes.len(), 4);
    assert!(matches!(outcomes[2], LineOutcome::Reply(_)));
    assert_eq!(outcomes[3], LineOutcome::Dispatch(Command::Hull));
}
