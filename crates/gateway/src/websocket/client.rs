//! Per-connection chat client actor.
//!
//! Each accepted socket runs two cooperating tasks bridged only by the
//! bounded outbound queue the hub hands out at registration: a read loop
//! that decodes and dispatches inbound frames, and a write loop that
//! drains the queue to the socket and runs the heartbeat. Either loop
//! exiting tears the connection down; unregistering is idempotent so the
//! paths can race freely.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};
use uuid::Uuid;

use reelhub_chat::{ChatUserInfo, SendMessageRequest};
use reelhub_database::UserProfile;

use super::frame::{ClientFrame, ErrorMessage, ServerFrame, UserEvent};
use super::health::{ConnectionHealth, HealthConfig};
use super::hub::ConnectionId;
use crate::state::GatewayState;

/// Drive one authenticated chat connection to completion.
pub async fn handle_socket(socket: WebSocket, state: GatewayState, profile: UserProfile) {
    let user_info = ChatUserInfo::from_profile(&profile);
    let user_id = profile.id;

    // History is fetched up front and replayed as the client's first
    // frame, ahead of the join/count announcements.
    let history = match state
        .chat_service
        .get_messages(Some(state.chat_config.history_limit), None)
        .await
    {
        Ok(messages) => Some(messages),
        Err(error) => {
            warn!(user_id = %user_id, %error, "failed to load chat history");
            None
        }
    };

    let registration = state.hub.register(user_id, user_info.clone(), history).await;
    let conn_id = registration.conn_id;

    let (ws_tx, ws_rx) = socket.split();
    let health = Arc::new(ConnectionHealth::new(HealthConfig::from_config(
        state.chat_config.heartbeat_interval_secs,
        state.chat_config.idle_timeout_secs,
    )));

    let mut write_task = tokio::spawn(write_loop(
        ws_tx,
        registration.frames,
        registration.shutdown,
        Arc::clone(&health),
        conn_id,
    ));
    let mut read_task = tokio::spawn(read_loop(
        ws_rx,
        state.clone(),
        conn_id,
        user_id,
        user_info,
        health,
    ));

    // Whichever side finishes first takes the other one down with it.
    tokio::select! {
        _ = &mut write_task => read_task.abort(),
        _ = &mut read_task => write_task.abort(),
    }

    state.hub.unregister(conn_id).await;
    debug!(conn_id = %conn_id, user_id = %user_id, "chat connection closed");
}

/// Drain the outbound queue to the socket, run the heartbeat, and honour
/// the out-of-band shutdown signal (which works even when the queue is
/// saturated).
async fn write_loop(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut frames: mpsc::Receiver<ServerFrame>,
    mut shutdown: watch::Receiver<bool>,
    health: Arc<ConnectionHealth>,
    conn_id: ConnectionId,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            _ = shutdown.changed() => {
                debug!(conn_id = %conn_id, "connection shut down by hub");
                let _ = ws_tx.send(Message::Close(None)).await;
                break;
            }

            maybe_frame = frames.recv() => {
                match maybe_frame {
                    Some(frame) => {
                        let payload = match serde_json::to_string(&frame) {
                            Ok(payload) => payload,
                            Err(error) => {
                                warn!(conn_id = %conn_id, %error, "failed to serialize frame");
                                continue;
                            }
                        };
                        if let Err(error) = ws_tx.send(Message::Text(payload)).await {
                            debug!(conn_id = %conn_id, %error, "write failed");
                            break;
                        }
                    }
                    None => {
                        // Hub dropped our handle; close out gracefully.
                        let _ = ws_tx.send(Message::Close(None)).await;
                        break;
                    }
                }
            }

            _ = ticker.tick() => {
                if health.is_idle() {
                    debug!(
                        conn_id = %conn_id,
                        idle_secs = health.seconds_since_activity(),
                        "closing idle connection"
                    );
                    break;
                }
                if health.is_pong_overdue() {
                    debug!(conn_id = %conn_id, "closing connection, pong overdue");
                    break;
                }
                if health.needs_ping() {
                    if ws_tx.send(Message::Ping(Vec::new())).await.is_err() {
                        break;
                    }
                    health.record_ping();
                }
            }
        }
    }
}

/// Decode inbound frames and dispatch them until the socket closes or
/// errors. Failures here only ever end this one connection.
async fn read_loop(
    mut ws_rx: SplitStream<WebSocket>,
    state: GatewayState,
    conn_id: ConnectionId,
    user_id: Uuid,
    user_info: ChatUserInfo,
    health: Arc<ConnectionHealth>,
) {
    let typing_min_interval = Duration::from_millis(state.chat_config.typing_min_interval_ms);
    let mut last_typing: Option<Instant> = None;

    while let Some(message) = ws_rx.next().await {
        match message {
            Ok(Message::Text(text)) => {
                health.record_activity();
                dispatch_frame(&text, &state, conn_id, user_id, &user_info, typing_min_interval, &mut last_typing).await;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                health.record_activity();
            }
            Ok(Message::Close(_)) => {
                debug!(conn_id = %conn_id, "client closed connection");
                break;
            }
            Ok(Message::Binary(_)) => {
                // Text protocol only
            }
            Err(error) => {
                debug!(conn_id = %conn_id, %error, "read failed");
                break;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn dispatch_frame(
    text: &str,
    state: &GatewayState,
    conn_id: ConnectionId,
    user_id: Uuid,
    user_info: &ChatUserInfo,
    typing_min_interval: Duration,
    last_typing: &mut Option<Instant>,
) {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(error) => {
            debug!(conn_id = %conn_id, %error, "invalid inbound frame");
            state
                .hub
                .send_to(
                    conn_id,
                    ServerFrame::Error(ErrorMessage {
                        message: "invalid message format".to_string(),
                    }),
                )
                .await;
            return;
        }
    };

    match frame {
        ClientFrame::Message {
            content,
            reply_to,
            video_id,
        } => {
            let request = SendMessageRequest {
                content,
                reply_to,
                video_id,
            };
            match state.chat_service.send_message(user_id, &request).await {
                Ok(view) => {
                    state.hub.broadcast(ServerFrame::Message(view)).await;
                }
                Err(error) => {
                    // Validation, moderation, and persistence failures all
                    // surface to the sender alone; the connection stays open.
                    state
                        .hub
                        .send_to(
                            conn_id,
                            ServerFrame::Error(ErrorMessage {
                                message: error.to_string(),
                            }),
                        )
                        .await;
                }
            }
        }

        ClientFrame::Typing => {
            // Ephemeral, never persisted; rate-limited per client.
            let now = Instant::now();
            let too_soon = last_typing
                .map(|previous| now.duration_since(previous) < typing_min_interval)
                .unwrap_or(false);
            if too_soon {
                return;
            }
            *last_typing = Some(now);

            state
                .hub
                .broadcast(ServerFrame::Typing(UserEvent {
                    user: user_info.clone(),
                }))
                .await;
        }

        ClientFrame::Ping => {
            state.hub.send_to(conn_id, ServerFrame::Pong).await;
        }
    }
}
