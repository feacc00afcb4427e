/*
[INPUT]:  WebSocket URL, signer for login, signed order params
[OUTPUT]: Correlated JSON-RPC results and subscription notifications
[POS]:    WebSocket layer - persistent session with the exchange
[UPDATE]: When adding new methods or changing connection logic
*/

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};

use crate::auth::{ActionSigner, AuthHeader};
use crate::config::EndpointConfig;
use crate::http::{LyraError, Result};
use crate::types::{OrderRequest, OrderResponse};
use crate::ws::message::{IncomingMessage, Notification, RpcRequest};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CHANNEL_CAPACITY: usize = 100;
const PARSE_FAIL_LOG_LIMIT: usize = 3;
const RAW_LOG_MAX_BYTES: usize = 1024;

static PARSE_FAIL_LOG_COUNT: AtomicUsize = AtomicUsize::new(0);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value>>>>>;

/// JSON-RPC session over a single WebSocket connection
///
/// A background task owns the socket. Requests are correlated with their
/// responses by a locally generated id; subscription updates are forwarded
/// to the notification receiver.
#[derive(Debug)]
pub struct LyraWebSocket {
    outbound_tx: mpsc::Sender<WsMessage>,
    pending: PendingMap,
    next_id: AtomicU64,
    request_timeout: Duration,
    notification_rx: Option<mpsc::Receiver<Notification>>,
    task: JoinHandle<()>,
}

impl LyraWebSocket {
    /// Connect using the endpoint's URL and timeouts
    pub async fn connect_with_config(endpoints: &EndpointConfig) -> Result<Self> {
        let connect = Self::connect(&endpoints.ws_url, endpoints.request_timeout());
        tokio::time::timeout(endpoints.connect_timeout(), connect)
            .await
            .map_err(|_| LyraError::Timeout {
                duration: endpoints.connect_timeout().as_secs(),
            })?
    }

    pub async fn connect(url: &str, request_timeout: Duration) -> Result<Self> {
        let (ws_stream, _response) = connect_async(url)
            .await
            .map_err(|e| LyraError::WebSocket(format!("Failed to connect to {url}: {e}")))?;
        info!(url, "ws connected");

        let (outbound_tx, outbound_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (notification_tx, notification_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let task = tokio::spawn(run_connection(
            ws_stream,
            outbound_rx,
            notification_tx,
            pending.clone(),
        ));

        Ok(Self {
            outbound_tx,
            pending,
            next_id: AtomicU64::new(1),
            request_timeout,
            notification_rx: Some(notification_rx),
            task,
        })
    }

    /// Get the notification receiver
    pub fn take_notifications(&mut self) -> Option<mpsc::Receiver<Notification>> {
        self.notification_rx.take()
    }

    /// Send `method` with `params` and wait for the matching response
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            method: method.to_string(),
            params,
            id,
        };
        let text = serde_json::to_string(&request)?;

        let (response_tx, response_rx) = oneshot::channel();
        self.pending.lock().await.insert(id, response_tx);

        if self
            .outbound_tx
            .send(WsMessage::Text(text.into()))
            .await
            .is_err()
        {
            self.pending.lock().await.remove(&id);
            return Err(LyraError::WebSocket("WebSocket not connected".to_string()));
        }
        debug!(method, id, "ws request sent");

        let value = match tokio::time::timeout(self.request_timeout, response_rx).await {
            Ok(Ok(result)) => result?,
            Ok(Err(_)) => {
                return Err(LyraError::WebSocket(
                    "connection closed before response".to_string(),
                ));
            }
            Err(_) => {
                self.pending.lock().await.remove(&id);
                warn!(method, id, "ws request timed out");
                return Err(LyraError::Timeout {
                    duration: self.request_timeout.as_secs(),
                });
            }
        };

        Ok(serde_json::from_value(value)?)
    }

    /// Authenticate the session; returns the subaccount ids it may act on
    ///
    /// `public/login`
    pub async fn login(&self, signer: &dyn ActionSigner) -> Result<Vec<u64>> {
        let header = AuthHeader::now(signer).await?;
        let subaccounts: Vec<u64> = self.call("public/login", header.login_params()).await?;
        info!(wallet = %header.wallet, subaccounts = subaccounts.len(), "ws logged in");
        Ok(subaccounts)
    }

    /// Submit a signed order on the authenticated session
    ///
    /// `private/order`
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResponse> {
        let response: OrderResponse = self
            .call("private/order", serde_json::to_value(order)?)
            .await?;
        info!(
            order_id = %response.order.order_id,
            instrument = %response.order.instrument_name,
            status = ?response.order.order_status,
            "order accepted"
        );
        Ok(response)
    }

    /// Subscribe to channels; updates arrive on the notification receiver
    ///
    /// `subscribe`
    pub async fn subscribe(&self, channels: &[String]) -> Result<Value> {
        self.call("subscribe", serde_json::json!({ "channels": channels }))
            .await
    }

    /// Close the socket and wait for the background task to finish
    pub async fn close(self) -> Result<()> {
        let _ = self.outbound_tx.send(WsMessage::Close(None)).await;
        drop(self.outbound_tx);
        self.task
            .await
            .map_err(|e| LyraError::WebSocket(format!("WebSocket task failed: {e}")))
    }
}

async fn run_connection(
    ws_stream: WsStream,
    mut outbound_rx: mpsc::Receiver<WsMessage>,
    notification_tx: mpsc::Sender<Notification>,
    pending: PendingMap,
) {
    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(WsMessage::Close(frame)) => {
                        let _ = write.send(WsMessage::Close(frame)).await;
                        break;
                    }
                    Some(message) => {
                        if write.send(message).await.is_err() {
                            break;
                        }
                    }
                    None => {
                        let _ = write.send(WsMessage::Close(None)).await;
                        break;
                    }
                }
            }
            incoming = read.next() => {
                match incoming {
                    Some(Ok(WsMessage::Close(_))) => {
                        let _ = write.send(WsMessage::Close(None)).await;
                        break;
                    }
                    Some(Ok(WsMessage::Text(text))) => {
                        dispatch(text.as_str(), &notification_tx, &pending).await;
                    }
                    Some(Ok(WsMessage::Binary(bytes))) => {
                        if let Ok(text) = std::str::from_utf8(&bytes) {
                            dispatch(text, &notification_tx, &pending).await;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "ws read failed");
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    let mut guard = pending.lock().await;
    for (_, response_tx) in guard.drain() {
        let _ = response_tx.send(Err(LyraError::WebSocket("connection closed".to_string())));
    }
    info!("ws disconnected");
}

async fn dispatch(
    text: &str,
    notification_tx: &mpsc::Sender<Notification>,
    pending: &PendingMap,
) {
    match IncomingMessage::parse(text) {
        Ok(IncomingMessage::Response { id, response }) => {
            let response_tx = pending.lock().await.remove(&id);
            match response_tx {
                Some(response_tx) => {
                    let _ = response_tx.send(response.into_result());
                }
                None => warn!(id, "ws response for unknown request dropped"),
            }
        }
        Ok(IncomingMessage::Notification(notification)) => {
            if notification_tx.try_send(notification).is_err() {
                debug!("ws notification dropped, receiver full or gone");
            }
        }
        Ok(IncomingMessage::Unrecognized(value)) => {
            debug!(
                message = %truncate_for_log(&value.to_string(), RAW_LOG_MAX_BYTES),
                "ws message unrecognized"
            );
        }
        Err(err) => log_parse_fail_once(&err, text),
    }
}

fn log_parse_fail_once(err: &serde_json::Error, raw: &str) {
    let count = PARSE_FAIL_LOG_COUNT.fetch_add(1, Ordering::Relaxed);
    if count < PARSE_FAIL_LOG_LIMIT {
        info!(
            sample_index = count + 1,
            sample_limit = PARSE_FAIL_LOG_LIMIT,
            error = %err,
            bytes = raw.len(),
            "ws message parse failed"
        );
        debug!(
            message = %truncate_for_log(raw, RAW_LOG_MAX_BYTES),
            "ws message parse failed"
        );
    }
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("abcdef", 3), "abc...");
        assert_eq!(truncate_for_log("ééé", 3), "é...");
    }

    #[tokio::test]
    async fn test_connect_refused_is_websocket_error() {
        let err = LyraWebSocket::connect("ws://127.0.0.1:1/ws", DEFAULT_REQUEST_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, LyraError::WebSocket(_)));
    }
}
