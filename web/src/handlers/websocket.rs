//! WebSocket handler for resource rooms.
//!
//! Clients browsing a resource's availability join its room and are told
//! when one of its slots gets booked.
//!
//! # Architecture
//!
//! ```text
//! Client              WebSocket Handler            RoomBroadcaster
//!   │                        │                            │
//!   ├─ Connect ─────────────>│                            │
//!   ├─ join-resource-room ──>│                            │
//!   │                        ├─ join("resource-{id}") ───>│
//!   │<─ joined ──────────────┤                            │
//!   │                        │<── SlotBooked ─────────────┤
//!   │<─ slot-booked ─────────┤                            │
//! ```
//!
//! # Message Protocol
//!
//! **Client → Server:**
//! ```json
//! { "type": "join-resource-room", "resourceId": "…" }
//! { "type": "leave-resource-room", "resourceId": "…" }
//! { "type": "ping" }
//! ```
//!
//! **Server → Client:**
//! ```json
//! { "type": "joined", "resourceId": "…" }
//! { "type": "left", "resourceId": "…" }
//! { "type": "slot-booked", "resourceId": "…", "date": "2025-01-02", "startTime": "09:00", "bookingCode": "BK…" }
//! { "type": "pong" }
//! { "type": "error", "message": "…" }
//! ```

use crate::rooms::{RoomBroadcaster, resource_room};
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use slotbook_core::notifier::SlotBooked;
use slotbook_core::types::ResourceId;
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Outbound messages buffered per connection.
const OUTBOUND_BUFFER: usize = 64;

/// Message sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Start receiving slot updates for a resource
    #[serde(alias = "join-expert-room")]
    JoinResourceRoom {
        /// Resource to watch
        #[serde(rename = "resourceId", alias = "expertId")]
        resource_id: ResourceId,
    },
    /// Stop receiving slot updates for a resource
    #[serde(alias = "leave-expert-room")]
    LeaveResourceRoom {
        /// Resource to stop watching
        #[serde(rename = "resourceId", alias = "expertId")]
        resource_id: ResourceId,
    },
    /// Keep-alive
    Ping,
}

/// Message sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Subscription confirmed
    Joined {
        /// Resource now watched
        #[serde(rename = "resourceId")]
        resource_id: ResourceId,
    },
    /// Unsubscription confirmed
    Left {
        /// Resource no longer watched
        #[serde(rename = "resourceId")]
        resource_id: ResourceId,
    },
    /// A slot on a watched resource was booked
    SlotBooked(SlotBooked),
    /// Keep-alive response
    Pong,
    /// The last client message could not be handled
    Error {
        /// Error description
        message: String,
    },
}

/// WebSocket upgrade handler for resource rooms.
///
/// # Example
///
/// ```ignore
/// use slotbook_web::handlers::websocket;
/// use axum::{Router, routing::get};
///
/// let app = Router::new()
///     .route("/ws", get(websocket::handle))
///     .with_state(RoomBroadcaster::<SlotBooked>::default());
/// ```
#[allow(clippy::unused_async)] // Axum handler signature requires async
pub async fn handle(
    ws: WebSocketUpgrade,
    State(rooms): State<RoomBroadcaster<SlotBooked>>,
) -> Response {
    debug!("WebSocket connection requested");
    ws.on_upgrade(move |socket| handle_socket(socket, rooms))
}

/// Connection lifecycle.
///
/// A writer task drains the outbound queue into the socket. Each joined
/// room gets a forwarding task feeding that queue. All of them stop when
/// the client disconnects.
async fn handle_socket(socket: WebSocket, rooms: RoomBroadcaster<SlotBooked>) {
    info!("WebSocket connection established");

    let (mut sink, stream) = socket.split();
    let (outbound, mut queue) = mpsc::channel::<ServerMessage>(OUTBOUND_BUFFER);

    let mut writer = tokio::spawn(async move {
        while let Some(message) = queue.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize WebSocket message");
                    continue;
                }
            };
            if sink.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let mut subscriptions = HashMap::new();

    tokio::select! {
        () = receive_loop(stream, &rooms, &outbound, &mut subscriptions) => {
            debug!("Client stopped sending");
        },
        _ = &mut writer => {
            debug!("Client stopped receiving");
        },
    }

    for (resource_id, forwarder) in subscriptions.drain() {
        forwarder.abort();
        // Awaiting the aborted task drops its receiver before leave() runs.
        let _ = forwarder.await;
        rooms.leave(&resource_room(resource_id)).await;
    }
    writer.abort();

    info!("WebSocket connection closed");
}

async fn receive_loop<S>(
    mut stream: S,
    rooms: &RoomBroadcaster<SlotBooked>,
    outbound: &mpsc::Sender<ServerMessage>,
    subscriptions: &mut HashMap<ResourceId, JoinHandle<()>>,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    while let Some(Ok(message)) = stream.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            Message::Binary(_) => {
                warn!("Received unexpected binary message");
                continue;
            }
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        let reply = match serde_json::from_str::<ClientMessage>(&text) {
            Ok(ClientMessage::JoinResourceRoom { resource_id }) => {
                if !subscriptions.contains_key(&resource_id) {
                    let receiver = rooms.join(&resource_room(resource_id)).await;
                    subscriptions.insert(resource_id, forward(receiver, outbound.clone(), resource_id));
                }
                debug!(%resource_id, "Client joined resource room");
                ServerMessage::Joined { resource_id }
            }
            Ok(ClientMessage::LeaveResourceRoom { resource_id }) => {
                if let Some(forwarder) = subscriptions.remove(&resource_id) {
                    forwarder.abort();
                    let _ = forwarder.await;
                    rooms.leave(&resource_room(resource_id)).await;
                }
                debug!(%resource_id, "Client left resource room");
                ServerMessage::Left { resource_id }
            }
            Ok(ClientMessage::Ping) => ServerMessage::Pong,
            Err(e) => {
                debug!(error = %e, "Failed to parse WebSocket message");
                ServerMessage::Error {
                    message: format!("Invalid message: {e}"),
                }
            }
        };

        if outbound.send(reply).await.is_err() {
            break;
        }
    }
}

/// Forward room events to one connection's outbound queue.
fn forward(
    mut receiver: broadcast::Receiver<SlotBooked>,
    outbound: mpsc::Sender<ServerMessage>,
    resource_id: ResourceId,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if outbound.send(ServerMessage::SlotBooked(event)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(%resource_id, skipped, "Client lagging, skipped slot updates");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
