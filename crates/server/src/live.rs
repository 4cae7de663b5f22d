// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live review event streaming.
//!
//! Connected clients receive a JSON event for every successful review
//! operation. Events are informational only: they are derived from
//! committed changes, carry no commands and are never audited. Clients
//! must read the review over HTTP for its authoritative state.
//!
//! Reminder events carry the subject and manager ids so a notification
//! consumer can deliver them.

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use perfdesk_domain::AdhocReview;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::session::StreamPrincipal;

/// Maximum number of events to buffer in the broadcast channel.
/// Slow clients lose the oldest events.
const EVENT_BUFFER_SIZE: usize = 100;

/// A change to a review, as streamed to live clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReviewEvent {
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (RFC 3339).
        timestamp: String,
    },
    /// A review was triggered.
    ReviewCreated {
        review_id: i64,
        employee_id: i64,
        manager_id: Option<i64>,
        triggered_by: i64,
    },
    /// The subject submitted their self review.
    SelfReviewSubmitted {
        review_id: i64,
        /// The aggregate status afterwards.
        status: String,
    },
    /// The manager submitted the manager review.
    ManagerReviewSubmitted {
        review_id: i64,
        /// The aggregate status afterwards.
        status: String,
    },
    ReviewAcknowledged {
        review_id: i64,
    },
    ReviewCompleted {
        review_id: i64,
    },
    ReviewCancelled {
        review_id: i64,
    },
    /// Someone asked for the open tracks to be chased.
    ReminderRequested {
        review_id: i64,
        employee_id: i64,
        manager_id: Option<i64>,
        /// The status the review is waiting in.
        status: String,
    },
    ReviewDeleted {
        review_id: i64,
    },
}

impl ReviewEvent {
    /// Builds the reminder event for a review.
    #[must_use]
    pub fn reminder(review: &AdhocReview) -> Self {
        Self::ReminderRequested {
            review_id: review.review_id.unwrap_or_default(),
            employee_id: review.employee_id,
            manager_id: review.manager_id,
            status: review.status().as_str().to_string(),
        }
    }

    fn connected(now: OffsetDateTime) -> Self {
        Self::Connected {
            timestamp: now
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| String::from("unknown")),
        }
    }
}

/// Broadcaster for live review events.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    tx: broadcast::Sender<ReviewEvent>,
}

impl LiveEventBroadcaster {
    /// Creates a new event broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Broadcasts an event to all connected clients.
    ///
    /// Without subscribers the event is dropped. Never blocks.
    pub fn broadcast(&self, event: &ReviewEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast review event");
            }
            Err(_) => {
                debug!(?event, "No receivers for review event");
            }
        }
    }

    /// Subscribes to events sent from now on.
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ReviewEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Upgrades the connection to a WebSocket streaming review events.
///
/// The caller is authenticated before the upgrade.
pub async fn live_events_handler(
    StreamPrincipal(principal): StreamPrincipal,
    AxumState(broadcaster): AxumState<Arc<LiveEventBroadcaster>>,
    ws: WebSocketUpgrade,
) -> Response {
    let account_id: i64 = principal.account_id;
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster, account_id))
}

/// Sends a connection confirmation, then streams events until the client
/// disconnects or a send fails.
async fn handle_socket(
    socket: WebSocket,
    broadcaster: Arc<LiveEventBroadcaster>,
    account_id: i64,
) {
    info!(account_id, "Client connected to live event stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<ReviewEvent> = broadcaster.subscribe();

    let connected_event = ReviewEvent::connected(OffsetDateTime::now_utc());
    if let Ok(json) = serde_json::to_string(&connected_event)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!(?e, "Failed to serialize review event");
                    }
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live client lagged; events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Clients only listen; anything they send is ignored.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!(account_id, "Client disconnected from live event stream");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use perfdesk_domain::ReviewSettings;

    #[test]
    fn test_broadcast_no_receivers() {
        let broadcaster = LiveEventBroadcaster::new();
        assert_eq!(broadcaster.tx.receiver_count(), 0);
        broadcaster.broadcast(&ReviewEvent::ReviewCompleted { review_id: 1 });
    }

    #[test]
    fn test_multiple_receivers() {
        let broadcaster = LiveEventBroadcaster::new();
        let mut rx1 = broadcaster.subscribe();
        let mut rx2 = broadcaster.subscribe();

        broadcaster.broadcast(&ReviewEvent::ReviewCancelled { review_id: 7 });

        assert_eq!(
            rx1.try_recv().unwrap(),
            ReviewEvent::ReviewCancelled { review_id: 7 }
        );
        assert!(matches!(
            rx2.try_recv(),
            Ok(ReviewEvent::ReviewCancelled { review_id: 7 })
        ));
    }

    #[test]
    fn test_reminder_carries_recipients() {
        let mut review = AdhocReview::new(
            10,
            Some(20),
            1,
            None,
            None,
            None,
            ReviewSettings::default(),
            OffsetDateTime::now_utc(),
        );
        review.review_id = Some(5);

        let json = serde_json::to_value(ReviewEvent::reminder(&review)).unwrap();

        assert_eq!(json["type"], "reminder_requested");
        assert_eq!(json["review_id"], 5);
        assert_eq!(json["employee_id"], 10);
        assert_eq!(json["manager_id"], 20);
        assert_eq!(json["status"], "initiated");
    }

    #[test]
    fn test_connected_event_uses_rfc3339() {
        let event = ReviewEvent::connected(OffsetDateTime::UNIX_EPOCH);
        assert_eq!(
            event,
            ReviewEvent::Connected {
                timestamp: String::from("1970-01-01T00:00:00Z")
            }
        );
    }
}
