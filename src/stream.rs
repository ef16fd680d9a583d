use std::fmt::Display;
use std::future::Future;

use bytes::Bytes;
use futures::channel::mpsc;
use futures::{Stream, StreamExt};

use crate::app_state::UpstreamError;
use crate::format;
use crate::io_struct::{GenerateChunk, StreamEvent};

pub type EventSender = mpsc::UnboundedSender<Result<Bytes, actix_web::Error>>;
pub type EventReceiver = mpsc::UnboundedReceiver<Result<Bytes, actix_web::Error>>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded()
}

/// Serializes one event as an NDJSON line. Returns false when the client is
/// gone, which ends the request without further work.
fn send_event(tx: &EventSender, event: &StreamEvent) -> bool {
    let mut line = match serde_json::to_vec(event) {
        Ok(line) => line,
        Err(e) => {
            log::error!("Failed to serialize stream event: {}", e);
            return false;
        }
    };
    line.push(b'\n');
    if tx.unbounded_send(Ok(Bytes::from(line))).is_err() {
        log::debug!("Client disconnected, stopping stream");
        return false;
    }
    true
}

fn send_error(tx: &EventSender, message: &str) {
    log::error!("{}", message);
    send_event(
        tx,
        &StreamEvent::Error {
            error: format::decorate_message(message, true),
        },
    );
}

/// Drives one chat request end to end: emit `thinking`, await the upstream
/// connect, emit `clear_thinking`, then re-format and re-emit the accumulated
/// text once per delta. Fatal upstream failures produce exactly one `error`
/// event and nothing after it.
///
/// Generic over the upstream chunk stream so event sequences can be tested
/// against canned input.
pub async fn drive_chat<S, E>(
    thinking: String,
    connect: impl Future<Output = Result<S, UpstreamError>>,
    tx: EventSender,
) where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    if !send_event(&tx, &StreamEvent::Thinking { thinking }) {
        return;
    }

    let mut upstream = match connect.await {
        Ok(stream) => stream,
        Err(e) => {
            send_error(&tx, &e.to_string());
            return;
        }
    };

    if !send_event(&tx, &StreamEvent::clear_thinking()) {
        return;
    }

    let mut full_response = String::new();
    // Upstream chunks are raw bytes and may split NDJSON lines anywhere.
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = upstream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                send_error(&tx, &format!("Connection error: {}", e));
                return;
            }
        };
        buf.extend_from_slice(&chunk);
        while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buf.drain(..=pos).collect();
            if !handle_line(&line, &mut full_response, &tx) {
                return;
            }
        }
    }
    // The upstream may end without a trailing newline on the last line.
    if !buf.is_empty() {
        handle_line(&buf, &mut full_response, &tx);
    }
}

/// Parses one upstream line and, when it carries a non-empty delta, appends
/// it and emits the re-formatted accumulated text. Unparseable lines are
/// logged and skipped; delta-less lines are skipped silently. Returns false
/// only when the client is gone.
fn handle_line(line: &[u8], full_response: &mut String, tx: &EventSender) -> bool {
    let line = line.trim_ascii();
    if line.is_empty() {
        return true;
    }
    let chunk: GenerateChunk = match serde_json::from_slice(line) {
        Ok(chunk) => chunk,
        Err(e) => {
            log::error!(
                "Failed to decode JSON: {} for line: {}",
                e,
                String::from_utf8_lossy(line)
            );
            return true;
        }
    };
    let Some(delta) = chunk.response else {
        return true;
    };
    if delta.is_empty() {
        return true;
    }
    full_response.push_str(&delta);
    send_event(
        tx,
        &StreamEvent::Response {
            response: format::decorate_message(full_response, false),
        },
    )
}
