//! Chat connection registry and broadcast fan-out.
//!
//! The hub owns the set of live connections and is the only place the set
//! is mutated. Each connection gets a bounded outbound queue; broadcasting
//! never blocks on a slow consumer. A client whose queue stays full for
//! `max_consecutive_drops` broadcasts in a row is presumed dead and is
//! force-unregistered, with its shutdown signal fired out-of-band so the
//! close takes effect even when the queue is saturated.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, watch, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use reelhub_chat::{ChatMessageView, ChatUserInfo};
use reelhub_config::ChatConfig;

use super::frame::{History, OnlineCount, ServerFrame, UserEvent, UserLeave};

/// Connection ID (unique per WebSocket connection)
pub type ConnectionId = Uuid;

/// Hub tuning, taken from the chat section of the app config.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Capacity of each client's outbound queue.
    pub queue_capacity: usize,
    /// Consecutive broadcast drops after which a client is force-unregistered.
    pub max_consecutive_drops: u32,
}

impl HubConfig {
    pub fn from_chat_config(config: &ChatConfig) -> Self {
        Self {
            queue_capacity: config.client_queue_capacity.max(1),
            max_consecutive_drops: config.max_consecutive_drops.max(1),
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self::from_chat_config(&ChatConfig::default())
    }
}

/// One registered connection as the hub sees it.
struct ClientHandle {
    conn_id: ConnectionId,
    user_id: Uuid,
    user_info: ChatUserInfo,
    sender: mpsc::Sender<ServerFrame>,
    shutdown: watch::Sender<bool>,
    consecutive_drops: AtomicU32,
}

/// What a freshly registered connection's actor receives: its id, the
/// receiving end of its outbound queue, and the out-of-band close signal.
pub struct ClientRegistration {
    pub conn_id: ConnectionId,
    pub frames: mpsc::Receiver<ServerFrame>,
    pub shutdown: watch::Receiver<bool>,
}

/// Central chat hub
pub struct ChatHub {
    clients: RwLock<HashMap<ConnectionId, Arc<ClientHandle>>>,
    config: HubConfig,
}

impl ChatHub {
    /// Create a new hub
    pub fn new(config: HubConfig) -> Arc<Self> {
        Arc::new(Self {
            clients: RwLock::new(HashMap::new()),
            config,
        })
    }

    /// Register a new connection and announce it: everyone, the new client
    /// included, gets a `user_join` and the updated `online_count`.
    ///
    /// History replay is enqueued before the announcements so the new
    /// client's first frame is the `history` frame, which only it
    /// receives. `None` (history unavailable) skips the replay.
    pub async fn register(
        &self,
        user_id: Uuid,
        user_info: ChatUserInfo,
        history: Option<Vec<ChatMessageView>>,
    ) -> ClientRegistration {
        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.config.queue_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = Arc::new(ClientHandle {
            conn_id,
            user_id,
            user_info: user_info.clone(),
            sender: tx,
            shutdown: shutdown_tx,
            consecutive_drops: AtomicU32::new(0),
        });

        self.clients.write().await.insert(conn_id, handle);
        debug!(conn_id = %conn_id, user_id = %user_id, "chat connection registered");

        if let Some(messages) = history {
            self.send_history(conn_id, messages).await;
        }

        self.broadcast(ServerFrame::UserJoin(UserEvent { user: user_info })).await;
        self.broadcast_online_count().await;

        ClientRegistration {
            conn_id,
            frames: rx,
            shutdown: shutdown_rx,
        }
    }

    /// Unregister a connection and announce the departure. Safe to call
    /// repeatedly: a connection that is already gone triggers no broadcast
    /// and no double-decrement.
    pub async fn unregister(&self, conn_id: ConnectionId) {
        let Some(handle) = self.remove(conn_id).await else {
            return;
        };

        debug!(conn_id = %conn_id, user_id = %handle.user_id, "chat connection unregistered");
        let _ = handle.shutdown.send(true);

        self.broadcast(ServerFrame::UserLeave(UserLeave {
            user_id: handle.user_id,
        }))
        .await;
        self.broadcast_online_count().await;
    }

    /// Deliver a frame to every registered connection without ever blocking
    /// on a slow consumer. Clients that keep dropping frames (or whose
    /// queue is closed) are force-unregistered.
    pub async fn broadcast(&self, frame: ServerFrame) {
        let mut stale = self.fan_out(&frame).await;

        // Force-unregistering a client means announcing its departure,
        // which is itself a fan-out that may find more dead clients.
        while !stale.is_empty() {
            let mut next = Vec::new();
            for conn_id in stale {
                let Some(handle) = self.remove(conn_id).await else {
                    continue;
                };
                warn!(conn_id = %conn_id, user_id = %handle.user_id, "force-unregistering unresponsive chat client");
                let _ = handle.shutdown.send(true);

                next.extend(
                    self.fan_out(&ServerFrame::UserLeave(UserLeave {
                        user_id: handle.user_id,
                    }))
                    .await,
                );
                let count = self.online_count().await;
                next.extend(
                    self.fan_out(&ServerFrame::OnlineCount(OnlineCount { count }))
                        .await,
                );
            }
            next.sort_unstable();
            next.dedup();
            stale = next;
        }
    }

    /// Send a frame to a single connection. Returns false when the
    /// connection is unknown or its queue rejected the frame.
    pub async fn send_to(&self, conn_id: ConnectionId, frame: ServerFrame) -> bool {
        let clients = self.clients.read().await;
        let Some(handle) = clients.get(&conn_id) else {
            return false;
        };
        handle.sender.try_send(frame).is_ok()
    }

    /// Replay history to one client: exactly one `history` frame, never
    /// broadcast.
    async fn send_history(&self, conn_id: ConnectionId, messages: Vec<ChatMessageView>) {
        self.send_to(conn_id, ServerFrame::History(History { messages })).await;
    }

    /// Number of currently registered connections.
    pub async fn online_count(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Force-disconnect every connection belonging to a user (moderation).
    /// The shutdown signal is delivered outside the outbound queue, so it
    /// works even when that queue is saturated. Returns the number of
    /// connections dropped.
    pub async fn disconnect_user(&self, user_id: Uuid) -> usize {
        let conn_ids: Vec<ConnectionId> = {
            let clients = self.clients.read().await;
            clients
                .values()
                .filter(|handle| handle.user_id == user_id)
                .map(|handle| handle.conn_id)
                .collect()
        };

        let mut dropped = 0;
        for conn_id in &conn_ids {
            let Some(handle) = self.remove(*conn_id).await else {
                continue;
            };
            debug!(conn_id = %conn_id, user_id = %user_id, "disconnecting banned user");
            let _ = handle.shutdown.send(true);
            dropped += 1;

            self.broadcast(ServerFrame::UserLeave(UserLeave { user_id })).await;
        }

        if dropped > 0 {
            self.broadcast_online_count().await;
        }
        dropped
    }

    async fn remove(&self, conn_id: ConnectionId) -> Option<Arc<ClientHandle>> {
        self.clients.write().await.remove(&conn_id)
    }

    async fn broadcast_online_count(&self) {
        let count = self.online_count().await;
        self.broadcast(ServerFrame::OnlineCount(OnlineCount { count })).await;
    }

    /// Non-blocking enqueue to every client. Returns the connections that
    /// should be force-unregistered: queues closed, or full for the
    /// configured number of consecutive broadcasts.
    async fn fan_out(&self, frame: &ServerFrame) -> Vec<ConnectionId> {
        let clients = self.clients.read().await;
        let mut stale = Vec::new();

        for (conn_id, handle) in clients.iter() {
            match handle.sender.try_send(frame.clone()) {
                Ok(()) => {
                    handle.consecutive_drops.store(0, Ordering::Relaxed);
                }
                Err(mpsc::error::TrySendError::Full(_)) => {
                    let drops = handle.consecutive_drops.fetch_add(1, Ordering::Relaxed) + 1;
                    debug!(conn_id = %conn_id, drops, "dropped frame for slow chat client");
                    if drops >= self.config.max_consecutive_drops {
                        stale.push(*conn_id);
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    stale.push(*conn_id);
                }
            }
        }

        stale
    }
}
