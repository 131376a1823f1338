//! WebSocket gateway server.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, error, info, warn};

use fanout_engine::FanoutEngine;
use identity_auth::{resolve_identity, ResolvedIdentity, TokenVerifier, UserDirectory};
use presence_registry::PresenceRegistry;
use realtime_wire::ClientFrame;
use tracker_core::{ConnectionId, PresenceRecord};

use crate::error::GatewayResult;
use crate::table::{ConnectionTable, OUTBOUND_BUFFER};

/// Seconds a fresh connection gets to present its auth frame.
pub const AUTH_TIMEOUT_SECS: u64 = 10;

/// Everything a connection task needs, cloned per connection.
#[derive(Clone)]
pub struct GatewayContext {
    pub verifier: Arc<TokenVerifier>,
    pub directory: Arc<dyn UserDirectory>,
    pub registry: PresenceRegistry,
    pub engine: FanoutEngine,
    pub table: ConnectionTable,
}

impl GatewayContext {
    pub fn new(
        verifier: TokenVerifier,
        directory: Arc<dyn UserDirectory>,
        registry: PresenceRegistry,
        engine: FanoutEngine,
        table: ConnectionTable,
    ) -> Self {
        Self {
            verifier: Arc::new(verifier),
            directory,
            registry,
            engine,
            table,
        }
    }
}

/// Accepts WebSocket connections and runs one task per client.
pub struct GatewayServer {
    listener: TcpListener,
    ctx: GatewayContext,
    shutdown_tx: broadcast::Sender<()>,
}

impl GatewayServer {
    /// Bind the listener. `addr` may use port 0 to pick an ephemeral port.
    pub async fn bind(addr: &str, ctx: GatewayContext) -> GatewayResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        let (shutdown_tx, _) = broadcast::channel(1);
        Ok(Self {
            listener,
            ctx,
            shutdown_tx,
        })
    }

    pub fn local_addr(&self) -> GatewayResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Get a shutdown sender (for the daemon's signal handling).
    pub fn shutdown_sender(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Trigger shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Accept connections until shutdown.
    pub async fn run(&self) -> GatewayResult<()> {
        info!(addr = %self.local_addr()?, "gateway listening");
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer)) => {
                            let ctx = self.ctx.clone();
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, peer, ctx).await {
                                    error!(peer = %peer, error = %e, "connection error");
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "accept error");
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("gateway shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Handle one client: authenticate, register presence, pump frames.
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    ctx: GatewayContext,
) -> GatewayResult<()> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut write, mut read) = ws_stream.split();
    debug!(peer = %peer, "websocket accepted");

    // First frame must authenticate, within the deadline.
    let token = match timeout(Duration::from_secs(AUTH_TIMEOUT_SECS), read.next()).await {
        Err(_) => {
            debug!(peer = %peer, "auth deadline passed");
            return close_with(&mut write, "Authentication error").await;
        }
        Ok(None) => return Ok(()),
        Ok(Some(Err(e))) => return Err(e.into()),
        Ok(Some(Ok(Message::Text(text)))) => match ClientFrame::from_json(&text) {
            Ok(ClientFrame::Auth { token }) => token,
            Ok(frame) => {
                debug!(peer = %peer, kind = frame.kind(), "first frame was not auth");
                return close_with(&mut write, "Authentication error").await;
            }
            Err(e) => {
                debug!(peer = %peer, error = %e, "unparseable first frame");
                return close_with(&mut write, "Authentication error").await;
            }
        },
        Ok(Some(Ok(_))) => {
            return close_with(&mut write, "Authentication error").await;
        }
    };

    let identity = match resolve_identity(&ctx.verifier, ctx.directory.as_ref(), &token).await {
        Ok(identity) => identity,
        Err(e) => {
            debug!(peer = %peer, error = %e, "handshake refused");
            return close_with(&mut write, &e.to_string()).await;
        }
    };

    let connection_id = ConnectionId::new();
    let (tx, mut rx) = mpsc::channel::<Message>(OUTBOUND_BUFFER);
    ctx.table.insert(connection_id.clone(), tx.clone());

    let record = PresenceRecord::new(
        identity.user_id.clone(),
        connection_id.clone(),
        identity.role,
        identity.display_name.clone(),
    );
    if let Some(superseded) = ctx.registry.upsert(record).await {
        ctx.table.remove(&superseded.connection_id);
    }
    info!(
        user_id = %identity.user_id,
        connection_id = %connection_id,
        peer = %peer,
        "client authenticated"
    );
    ctx.engine.broadcast_presence().await;

    // Writer task: drains the outbound channel onto the socket.
    let writer_handle = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if write.send(message).await.is_err() {
                break;
            }
        }
    });

    // Rooms the client joined. Tracked per connection; events are
    // addressed to connections, so membership has no consumer yet.
    let mut rooms: HashSet<String> = HashSet::new();

    while let Some(msg_result) = read.next().await {
        match msg_result {
            Ok(Message::Text(text)) => match ClientFrame::from_json(&text) {
                Ok(frame) => {
                    handle_frame(frame, &identity, &connection_id, &ctx, &mut rooms).await;
                }
                Err(e) => {
                    warn!(connection_id = %connection_id, error = %e, "unparseable client frame");
                }
            },
            Ok(Message::Close(_)) => {
                debug!(connection_id = %connection_id, "client sent close");
                break;
            }
            Ok(Message::Ping(data)) => {
                let _ = tx.send(Message::Pong(data)).await;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(connection_id = %connection_id, error = %e, "websocket error");
                break;
            }
        }
    }

    ctx.table.remove(&connection_id);
    // Guarded removal: if this connection was superseded, the registry
    // keeps the newer record and presence stays as-is.
    if ctx.registry.remove(&identity.user_id, &connection_id).await {
        ctx.engine.broadcast_presence().await;
    }
    writer_handle.abort();
    debug!(connection_id = %connection_id, "client disconnected");

    Ok(())
}

async fn handle_frame(
    frame: ClientFrame,
    identity: &ResolvedIdentity,
    connection_id: &ConnectionId,
    ctx: &GatewayContext,
    rooms: &mut HashSet<String>,
) {
    match frame {
        ClientFrame::Auth { .. } => {
            debug!(connection_id = %connection_id, "duplicate auth frame ignored");
        }
        ClientFrame::Register { id, .. } => {
            if id != identity.user_id {
                warn!(
                    connection_id = %connection_id,
                    claimed = %id,
                    "register frame for another user ignored"
                );
                return;
            }
            // Role and name come from the directory again, so a promotion
            // since the handshake takes effect here.
            let Some(profile) = ctx.directory.find(&id).await else {
                warn!(user_id = %id, "registered user missing from directory");
                return;
            };
            let display_name = if profile.name.trim().is_empty() {
                identity.display_name.clone()
            } else {
                profile.name.clone()
            };
            let record =
                PresenceRecord::new(id, connection_id.clone(), profile.role, display_name);
            if let Some(superseded) = ctx.registry.upsert(record).await {
                if superseded.connection_id != *connection_id {
                    ctx.table.remove(&superseded.connection_id);
                }
            }
            ctx.engine.broadcast_presence().await;
        }
        ClientFrame::JoinRoom { room_id } => {
            debug!(connection_id = %connection_id, room_id = %room_id, "joined room");
            rooms.insert(room_id);
        }
    }
}

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Refuse the connection with a close frame carrying the reason.
async fn close_with(write: &mut WsSink, reason: &str) -> GatewayResult<()> {
    let frame = CloseFrame {
        code: CloseCode::Policy,
        reason: reason.to_string().into(),
    };
    let _ = write.send(Message::Close(Some(frame))).await;
    Ok(())
}
