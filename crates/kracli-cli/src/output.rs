//! Response rendering: the envelope decision table shared by every
//! command.
//!
//! `data` wins and pretty-prints to stdout; otherwise `msg` is printed
//! and the exit code comes from `success`/`error` presence; an envelope
//! with none of those prints raw and exits 1.

use std::io::Write;

use kracli_core::models::Envelope;

/// Render the envelope to stdout and return the process exit code.
pub fn render(envelope: &Envelope) -> i32 {
    let stdout = std::io::stdout();
    render_to(&mut stdout.lock(), envelope)
}

fn render_to<W: Write>(out: &mut W, envelope: &Envelope) -> i32 {
    if let Some(data) = envelope.data() {
        let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
        let _ = writeln!(out, "{}", pretty);
        return 0;
    }
    if let Some(msg) = envelope.msg() {
        match msg.as_str() {
            Some(text) => {
                let _ = writeln!(out, "{}", text);
            }
            None => {
                let _ = writeln!(out, "{}", msg);
            }
        }
    }
    if envelope.has_success() {
        0
    } else if envelope.has_error() {
        2
    } else {
        let raw = serde_json::to_string(envelope).unwrap_or_default();
        let _ = writeln!(out, "{}", raw);
        1
    }
}
