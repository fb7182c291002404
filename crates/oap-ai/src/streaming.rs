//! Server-Sent Events (SSE) stream parser.
//!
//! The MCP HTTP+SSE transport delivers the POST endpoint and every
//! JSON-RPC response as SSE events on one long-lived GET response.

use futures_util::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::io::StreamReader;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type (e.g., "endpoint", "message").
    pub event: Option<String>,
    /// The event data, multi-line payloads joined with `\n`.
    pub data: String,
}

/// Parse an SSE stream from a reqwest response, calling `on_event` for each event.
pub async fn parse_sse_stream(
    response: reqwest::Response,
    on_event: impl FnMut(SseEvent),
) -> Result<(), std::io::Error> {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    parse_sse_lines(reader, on_event).await
}

/// Parse SSE events from any buffered reader.
pub async fn parse_sse_lines<R: AsyncBufRead + Unpin>(
    reader: R,
    mut on_event: impl FnMut(SseEvent),
) -> Result<(), std::io::Error> {
    let mut lines = reader.lines();

    let mut current_event: Option<String> = None;
    let mut current_data = String::new();

    while let Some(line) = lines.next_line().await? {
        if line.is_empty() {
            // Empty line = end of event
            if !current_data.is_empty() {
                on_event(SseEvent {
                    event: current_event.take(),
                    data: std::mem::take(&mut current_data),
                });
            }
            current_event = None;
            continue;
        }

        if let Some(event_type) = field_value(&line, "event") {
            current_event = Some(event_type.to_string());
        } else if let Some(data) = field_value(&line, "data") {
            if !current_data.is_empty() {
                current_data.push('\n');
            }
            current_data.push_str(data);
        }
        // Ignore other fields (id:, retry:, comments)
    }

    // Flush any remaining event
    if !current_data.is_empty() {
        on_event(SseEvent {
            event: current_event,
            data: current_data,
        });
    }

    Ok(())
}

/// Value of `name:` with at most one leading space removed.
fn field_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(input: &str) -> Vec<SseEvent> {
        let mut events = Vec::new();
        parse_sse_lines(input.as_bytes(), |e| events.push(e))
            .await
            .unwrap();
        events
    }

    #[tokio::test]
    async fn parses_endpoint_then_message() {
        let events = collect(
            "event: endpoint\r\ndata: /messages/?session_id=abc\r\n\r\n\
             event: message\r\ndata: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\r\n\r\n",
        )
        .await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event.as_deref(), Some("endpoint"));
        assert_eq!(events[0].data, "/messages/?session_id=abc");
        assert_eq!(events[1].event.as_deref(), Some("message"));
        assert!(events[1].data.starts_with("{\"jsonrpc\""));
    }

    #[tokio::test]
    async fn joins_multiline_data_and_accepts_no_space() {
        let events = collect("data:first\ndata: second\n\n").await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, None);
        assert_eq!(events[0].data, "first\nsecond");
    }

    #[tokio::test]
    async fn ignores_comments_and_flushes_tail() {
        let events = collect(": keep-alive\n\nid: 7\nevent: message\ndata: tail").await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "tail");
        assert_eq!(events[0].event.as_deref(), Some("message"));
    }
}
