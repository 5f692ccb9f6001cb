//! Line reader for hub output.
//!
//! The hub and the sub-servers it launches can write arbitrary bytes, so
//! lines are read as bytes and decoded lossily; `BufReader::lines()` would
//! stop at the first invalid UTF-8 sequence.

use std::sync::Arc;

use mcphub_core::{HubEvent, HubEventSink, LogEntry};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Forward each non-blank line of `stream` to `sink` as a `HUB` log entry.
///
/// The task ends at EOF, on a read error, or when `cancel` fires.
pub fn spawn_line_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    stream_type: &'static str,
    sink: Arc<dyn HubEventSink>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            let read = tokio::select! {
                () = cancel.cancelled() => break,
                read = reader.read_until(b'\n', &mut buf) => read,
            };

            match read {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end();
                    if !line.is_empty() {
                        sink.emit(HubEvent::Log(LogEntry::hub(line)));
                    }
                }
                Err(e) => {
                    debug!(%stream_type, error = %e, "hub output reader exiting on read error");
                    break;
                }
            }
        }

        debug!(%stream_type, "hub output reader exiting");
    })
}
