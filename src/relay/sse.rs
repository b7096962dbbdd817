//! SSE wire framing.

use serde::Serialize;

/// Field prefix that marks a line as SSE data.
pub const DATA_PREFIX: &str = "data:";

/// Terminal frame sent after a relay failure.
pub const CLOSE_FRAME: &str = "event: close\ndata: {}\n\n";

/// Frame one upstream line. Empty lines produce no frame.
pub fn frame_line(line: &str) -> Option<String> {
    if line.is_empty() {
        None
    } else if line.starts_with(DATA_PREFIX) {
        Some(format!("{line}\n\n"))
    } else {
        Some(format!("{DATA_PREFIX} {line}\n\n"))
    }
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    message: &'a str,
}

/// Frame carrying `{"type":"error","message":...}`.
pub fn error_frame(message: &str) -> String {
    let payload = ErrorPayload {
        kind: "error",
        message,
    };
    // Serializing two string fields cannot fail.
    let json = serde_json::to_string(&payload).unwrap_or_default();
    format!("{DATA_PREFIX} {json}\n\n")
}
