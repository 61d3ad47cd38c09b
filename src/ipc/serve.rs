use anyhow::Context;
use serde_json::json;
use std::io::{BufRead, Write};

use super::router::handle_request;
use super::types::{AppState, Request};

/// Reads one JSON request per line and writes one JSON response per line
/// until the input closes.
pub fn serve<R, W>(state: &mut AppState, input: R, mut output: W) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line.context("read request line")?;
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<Request>(&line) {
            Ok(req) => {
                log::debug!("request {} {}", req.id, req.method);
                handle_request(state, req)
            }
            Err(e) => {
                // Can't reply without id.
                log::warn!("dropping malformed request: {e}");
                json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                })
            }
        };

        writeln!(output, "{resp}").context("write response")?;
        output.flush().context("flush response")?;
    }
    Ok(())
}
