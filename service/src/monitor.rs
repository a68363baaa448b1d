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

//! Background area monitor
//!
//! A dedicated task observes the latest hull area published by the
//! dispatch path and emits a notice on each *transition* across the
//! configured threshold — edge-triggered, not level-triggered: repeated
//! queries landing on the same side of the threshold produce nothing.

use std::fmt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A threshold-crossing notification
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AreaNotice {
    /// The hull area reached or exceeded the threshold
    RoseAbove {
        /// Observed area
        area: f64,
        /// Configured threshold
        threshold: f64,
    },
    /// The hull area dropped back below the threshold
    FellBelow {
        /// Observed area
        area: f64,
        /// Configured threshold
        threshold: f64,
    },
}

impl fmt::Display for AreaNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaNotice::RoseAbove { threshold, .. } => {
                write!(f, "At Least {} units belongs to CH", threshold)
            }
            AreaNotice::FellBelow { threshold, .. } => {
                write!(f, "At Least {} units no longer belongs to CH", threshold)
            }
        }
    }
}

/// Handle to the monitor task.
///
/// The task ends on its own once every area publisher is gone; call
/// [`AreaMonitor::shutdown`] to stop it earlier.
#[derive(Debug)]
pub struct AreaMonitor {
    task: JoinHandle<()>,
}

impl AreaMonitor {
    /// Spawn the monitor over a latest-area channel.
    ///
    /// Crossing notices are logged and delivered on the returned channel;
    /// if the receiver is dropped the monitor keeps latching silently.
    pub fn spawn(
        areas: watch::Receiver<f64>,
        threshold: f64,
    ) -> (Self, mpsc::UnboundedReceiver<AreaNotice>) {
        let (notices, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(monitor_loop(areas, threshold, notices));
        (Self { task }, receiver)
    }

    /// Stop the monitor task and wait for it to finish
    pub async fn shutdown(self) {
        self.task.abort();
        let _ = self.task.await;
    }
}

async fn monitor_loop(
    mut areas: watch::Receiver<f64>,
    threshold: f64,
    notices: mpsc::UnboundedSender<AreaNotice>,
) {
    // Latch starts "below": the service begins with an empty graph.
    let mut at_threshold = false;
    while areas.changed().await.is_ok() {
        let area = *areas.borrow_and_update();
        let now_at_threshold = area >= threshold;
        if now_at_threshold == at_threshold {
            debug!(area, "area update without crossing");
            continue;
        }
        at_threshold = now_at_threshold;
        let notice = if now_at_threshold {
            AreaNotice::RoseAbove { area, threshold }
        } else {
            AreaNotice::FellBelow { area, threshold }
        };
        info!("{}", notice);
        let _ = notices.send(notice);
    }
    debug!("area monitor stopped: all publishers gone");
}
