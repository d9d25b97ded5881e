use crate::{
    BroadcastHub, ConnectionConfig, ConnectionId, Metrics, Result as WsErrorResult, ShutdownGuard,
    Subscriber, WsError,
};

use relay_core::Record;

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use error_location::ErrorLocation;
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, timeout};

/// Hub-facing handle for one WebSocket: records become JSON text frames on
/// a bounded outbound queue drained by the connection's writer task.
pub struct WebSocketSubscriber {
    connection_id: ConnectionId,
    sender: mpsc::Sender<Message>,
    send_timeout: Duration,
    closed: Arc<Notify>,
}

impl WebSocketSubscriber {
    pub fn new(
        connection_id: ConnectionId,
        sender: mpsc::Sender<Message>,
        send_timeout: Duration,
        closed: Arc<Notify>,
    ) -> Self {
        Self {
            connection_id,
            sender,
            send_timeout,
            closed,
        }
    }
}

#[async_trait]
impl Subscriber for WebSocketSubscriber {
    fn id(&self) -> ConnectionId {
        self.connection_id
    }

    async fn send(&self, record: &Record) -> WsErrorResult<()> {
        let text = serde_json::to_string(record)?;

        match timeout(self.send_timeout, self.sender.send(Message::Text(text.into()))).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(WsError::ConnectionClosed {
                reason: "outbound queue closed".into(),
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(_) => Err(WsError::SendTimeout {
                timeout_secs: self.send_timeout.as_secs(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    fn close(&self) {
        // notify_one stores a permit, so a close issued before the
        // connection loop starts waiting is not lost
        self.closed.notify_one();
    }
}

/// Drain the outbound queue into `sink` until the queue closes or a write fails.
/// On exit `closed` is notified, so a dead socket also ends the watch loop and
/// its registry entry.
pub(crate) fn spawn_writer<S>(
    mut sink: S,
    mut rx: mpsc::Receiver<Message>,
    closed: Arc<Notify>,
) -> JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
        closed.notify_one();
    })
}

/// Manages a single WebSocket connection
pub struct WebSocketConnection {
    connection_id: ConnectionId,
    config: ConnectionConfig,
    metrics: Metrics,
    hub: BroadcastHub,
}

impl WebSocketConnection {
    pub fn new(
        connection_id: ConnectionId,
        config: ConnectionConfig,
        metrics: Metrics,
        hub: BroadcastHub,
    ) -> Self {
        Self {
            connection_id,
            config,
            metrics,
            hub,
        }
    }

    /// Handle the WebSocket connection lifecycle: replay, register, then
    /// watch for closure until the peer leaves, the hub drops us, the
    /// heartbeat lapses, or the server shuts down.
    pub async fn handle(
        self,
        socket: WebSocket,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        log::info!("WebSocket connection {} established", self.connection_id);
        self.metrics.connection_established();

        let (ws_sender, mut ws_receiver) = socket.split();

        // Bounded channel for outgoing messages (backpressure handling)
        let (tx, rx) = mpsc::channel::<Message>(self.config.send_buffer_size);
        let closed = Arc::new(Notify::new());

        let mut send_task = spawn_writer(ws_sender, rx, Arc::clone(&closed));

        let subscriber = Arc::new(WebSocketSubscriber::new(
            self.connection_id,
            tx.clone(),
            self.config.send_timeout(),
            Arc::clone(&closed),
        ));

        let result = match self.hub.subscribe(subscriber).await {
            Ok(()) => {
                self.watch(&mut ws_receiver, &tx, &closed, &mut shutdown_guard)
                    .await
            }
            Err(e) => Err(e),
        };

        // Cleanup
        self.hub.unsubscribe(self.connection_id).await;
        drop(tx); // Close channel to terminate send task
        if timeout(self.config.send_timeout(), &mut send_task)
            .await
            .is_err()
        {
            log::warn!(
                "Writer for connection {} did not finish, aborting",
                self.connection_id
            );
            send_task.abort();
        }

        self.metrics
            .connection_closed(if result.is_ok() { "normal" } else { "error" });
        log::info!("WebSocket connection {} closed", self.connection_id);

        result
    }

    async fn watch(
        &self,
        ws_receiver: &mut futures::stream::SplitStream<WebSocket>,
        tx: &mpsc::Sender<Message>,
        closed: &Notify,
        shutdown_guard: &mut ShutdownGuard,
    ) -> WsErrorResult<()> {
        let mut heartbeat = tokio::time::interval_at(
            Instant::now() + self.config.heartbeat_interval(),
            self.config.heartbeat_interval(),
        );
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_seen = Instant::now();

        loop {
            tokio::select! {
                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(Message::Close(_))) | None => {
                            log::info!("Connection {} closed by client", self.connection_id);
                            return Ok(());
                        }
                        Some(Ok(Message::Ping(data))) => {
                            last_seen = Instant::now();
                            if tx.try_send(Message::Pong(data)).is_err() {
                                log::debug!("Pong skipped for {}, outbound queue full", self.connection_id);
                            }
                        }
                        Some(Ok(_)) => {
                            // Inbound data is not part of the protocol; it only proves liveness
                            last_seen = Instant::now();
                        }
                        Some(Err(e)) => {
                            log::warn!("WebSocket error on connection {}: {}", self.connection_id, e);
                            return Err(WsError::ConnectionClosed {
                                reason: format!("WebSocket error: {e}"),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                    }
                }

                _ = heartbeat.tick() => {
                    if last_seen.elapsed() > self.config.heartbeat_timeout() {
                        log::warn!("Connection {} missed heartbeat", self.connection_id);
                        return Err(WsError::HeartbeatTimeout {
                            timeout_secs: self.config.heartbeat_timeout_secs,
                            location: ErrorLocation::from(Location::caller()),
                        });
                    }
                    if tx.try_send(Message::Ping(Bytes::new())).is_err() {
                        log::debug!("Ping skipped for {}, outbound queue full", self.connection_id);
                    }
                }

                _ = closed.notified() => {
                    log::info!("Connection {} closed after failed delivery or write", self.connection_id);
                    return Ok(());
                }

                _ = shutdown_guard.wait() => {
                    log::info!("Shutting down connection {} gracefully", self.connection_id);
                    return Ok(());
                }
            }
        }
    }
}
