//! MCP transports.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::protocol::{JsonRpcRequest, JsonRpcResponse, RequestId};
use crate::streaming::{parse_sse_stream, SseEvent};
use crate::tools::ToolError;

/// A JSON-RPC channel to one MCP server session.
#[async_trait]
pub trait McpTransport: Send + Sync {
    /// Send a request and wait for its result.
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, ToolError>;

    /// Send a notification; no response is expected.
    async fn notify(&self, method: &str, params: Option<Value>) -> Result<(), ToolError>;

    /// Whether the server side of the session is still reachable.
    fn is_open(&self) -> bool;

    async fn close(&self);
}

/// Opens a fresh transport for each connection attempt.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn open(&self) -> Result<Arc<dyn McpTransport>, ToolError>;
}

type PendingMap = Arc<Mutex<HashMap<RequestId, oneshot::Sender<JsonRpcResponse>>>>;

fn lock_pending(
    pending: &Mutex<HashMap<RequestId, oneshot::Sender<JsonRpcResponse>>>,
) -> MutexGuard<'_, HashMap<RequestId, oneshot::Sender<JsonRpcResponse>>> {
    pending.lock().unwrap_or_else(|e| e.into_inner())
}

/// HTTP+SSE transport.
///
/// A long-lived `GET` delivers server events; the first `endpoint` event names
/// the URL that requests are `POST`ed to. Responses arrive as `message` events
/// and are matched to waiting requests by id.
pub struct SseTransport {
    http: reqwest::Client,
    endpoint: reqwest::Url,
    next_id: AtomicU64,
    pending: PendingMap,
    open: Arc<AtomicBool>,
    reader: JoinHandle<()>,
    timeout: Duration,
}

impl SseTransport {
    /// Open the event stream and wait for the server's endpoint announcement.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, ToolError> {
        let base = reqwest::Url::parse(url)
            .map_err(|e| ToolError::Connection(format!("invalid server URL {url}: {e}")))?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ToolError::Connection(format!("failed to build HTTP client: {e}")))?;

        let response = http
            .get(base.clone())
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| ToolError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Connection(format!("HTTP {status} from {url}")));
        }

        let pending: PendingMap = Arc::default();
        let open = Arc::new(AtomicBool::new(true));
        let (endpoint_tx, endpoint_rx) = oneshot::channel();

        let reader = tokio::spawn(read_events(
            response,
            Arc::clone(&pending),
            Arc::clone(&open),
            endpoint_tx,
        ));

        let endpoint_path = match tokio::time::timeout(timeout, endpoint_rx).await {
            Ok(Ok(path)) => path,
            Ok(Err(_)) => {
                reader.abort();
                return Err(ToolError::Connection(
                    "event stream closed before endpoint was announced".into(),
                ));
            }
            Err(_) => {
                reader.abort();
                return Err(ToolError::Timeout);
            }
        };

        let endpoint = match resolve_endpoint(&base, &endpoint_path) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                reader.abort();
                return Err(e);
            }
        };
        debug!(%endpoint, "MCP endpoint announced");

        Ok(Self {
            http,
            endpoint,
            next_id: AtomicU64::new(1),
            pending,
            open,
            reader,
            timeout,
        })
    }

    async fn post(&self, message: &JsonRpcRequest) -> Result<(), ToolError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ToolError::Timeout
                } else {
                    ToolError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Protocol(format!("HTTP {status}: {body}")));
        }
        Ok(())
    }
}

#[async_trait]
impl McpTransport for SseTransport {
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, ToolError> {
        if !self.is_open() {
            return Err(ToolError::NotConnected);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let key = RequestId::Number(id);
        let (tx, rx) = oneshot::channel();
        lock_pending(&self.pending).insert(key.clone(), tx);

        trace!(method, id, "MCP request");
        if let Err(e) = self.post(&JsonRpcRequest::new(method, params, id)).await {
            lock_pending(&self.pending).remove(&key);
            return Err(e);
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(response)) => response.into_result(),
            Ok(Err(_)) => Err(ToolError::Connection(
                "event stream closed while awaiting response".into(),
            )),
            Err(_) => {
                lock_pending(&self.pending).remove(&key);
                Err(ToolError::Timeout)
            }
        }
    }

    async fn notify(&self, method: &str, params: Option<Value>) -> Result<(), ToolError> {
        if !self.is_open() {
            return Err(ToolError::NotConnected);
        }
        self.post(&JsonRpcRequest::notification(method, params))
            .await
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    async fn close(&self) {
        self.reader.abort();
        self.open.store(false, Ordering::Release);
        lock_pending(&self.pending).clear();
    }
}

impl Drop for SseTransport {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Background task draining the event stream.
async fn read_events(
    response: reqwest::Response,
    pending: PendingMap,
    open: Arc<AtomicBool>,
    endpoint_tx: oneshot::Sender<String>,
) {
    let mut endpoint_tx = Some(endpoint_tx);

    let result = parse_sse_stream(response, |event: SseEvent| match event.event.as_deref() {
        Some("endpoint") => {
            if let Some(tx) = endpoint_tx.take() {
                let _ = tx.send(event.data.trim().to_string());
            }
        }
        Some("message") | None => dispatch_message(&pending, &event.data),
        Some(other) => trace!(event = other, "ignoring SSE event"),
    })
    .await;

    match result {
        Ok(()) => debug!("MCP event stream closed by server"),
        Err(e) => warn!(error = %e, "MCP event stream failed"),
    }

    open.store(false, Ordering::Release);
    // Dropping the senders wakes every waiting request.
    lock_pending(&pending).clear();
}

fn dispatch_message(pending: &PendingMap, data: &str) {
    let response = match serde_json::from_str::<JsonRpcResponse>(data) {
        Ok(r) => r,
        Err(_) => {
            trace!("ignoring non-response MCP message");
            return;
        }
    };

    let waiter = lock_pending(pending).remove(&response.id);
    match waiter {
        Some(tx) => {
            let _ = tx.send(response);
        }
        None => debug!(id = ?response.id, "MCP response for unknown request"),
    }
}

/// Resolve the announced endpoint against the SSE URL. Cross-origin endpoints are refused.
fn resolve_endpoint(base: &reqwest::Url, announced: &str) -> Result<reqwest::Url, ToolError> {
    let endpoint = base
        .join(announced)
        .map_err(|e| ToolError::Protocol(format!("invalid endpoint {announced:?}: {e}")))?;
    if endpoint.origin() != base.origin() {
        return Err(ToolError::Protocol(format!(
            "endpoint {endpoint} is not on the server's origin"
        )));
    }
    Ok(endpoint)
}

/// Opens [`SseTransport`]s against a fixed server URL.
pub struct SseTransportFactory {
    url: String,
    timeout: Duration,
}

impl SseTransportFactory {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl TransportFactory for SseTransportFactory {
    async fn open(&self) -> Result<Arc<dyn McpTransport>, ToolError> {
        let transport = SseTransport::connect(&self.url, self.timeout).await?;
        Ok(Arc::new(transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_endpoint_resolves_against_base() {
        let base = reqwest::Url::parse("http://localhost:3000/sse").unwrap();
        let endpoint = resolve_endpoint(&base, "/messages?sessionId=abc").unwrap();
        assert_eq!(
            endpoint.as_str(),
            "http://localhost:3000/messages?sessionId=abc"
        );
    }

    #[test]
    fn cross_origin_endpoint_rejected() {
        let base = reqwest::Url::parse("http://localhost:3000/sse").unwrap();
        let err = resolve_endpoint(&base, "http://evil.example/messages").unwrap_err();
        assert!(matches!(err, ToolError::Protocol(_)));
    }

    #[test]
    fn dispatch_routes_response_to_waiter() {
        let pending: PendingMap = Arc::default();
        let (tx, mut rx) = oneshot::channel();
        lock_pending(&pending).insert(RequestId::Number(7), tx);

        dispatch_message(&pending, r#"{"jsonrpc":"2.0","id":7,"result":{"ok":true}}"#);

        let response = rx.try_recv().unwrap();
        assert_eq!(response.result.unwrap()["ok"], true);
        assert!(lock_pending(&pending).is_empty());
    }

    #[test]
    fn dispatch_ignores_server_requests_and_garbage() {
        let pending: PendingMap = Arc::default();
        let (tx, mut rx) = oneshot::channel();
        lock_pending(&pending).insert(RequestId::Number(1), tx);

        dispatch_message(&pending, r#"{"jsonrpc":"2.0","method":"ping","id":"s-1"}"#);
        dispatch_message(&pending, "not json");

        assert!(rx.try_recv().is_err());
        assert_eq!(lock_pending(&pending).len(), 1);
    }

    #[tokio::test]
    async fn connect_to_unreachable_server_fails() {
        let result = SseTransport::connect("http://127.0.0.1:9/sse", Duration::from_secs(2)).await;
        assert!(matches!(result, Err(ToolError::Connection(_))));
    }

    #[tokio::test]
    async fn connect_rejects_invalid_url() {
        let result = SseTransport::connect("not a url", Duration::from_secs(1)).await;
        assert!(matches!(result, Err(ToolError::Connection(_))));
    }
}
