//! Append-only ballot event log, one JSON object per line.

use ballot_application::ports::ballot_events::{BallotEvent, BallotEventLogger};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::warn;

/// Writes ballot events to a `.jsonl` file.
///
/// Every line is flushed as soon as it is written, so an audit trail survives
/// a crash of the CLI process.
pub struct JsonlBallotEventLogger {
    writer: Mutex<BufWriter<File>>,
}

impl JsonlBallotEventLogger {
    /// Returns `None` (after a warning) when the log cannot be opened; event
    /// logging is best-effort and never blocks a ballot operation.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match open_for_append(path) {
            Ok(file) => Some(Self {
                writer: Mutex::new(BufWriter::new(file)),
            }),
            Err(e) => {
                warn!("Ballot event log {} unavailable: {}", path.display(), e);
                None
            }
        }
    }
}

fn open_for_append(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Object payloads are flattened next to `type` and `timestamp`; anything
/// else is nested under `data`.
fn event_record(event: BallotEvent, timestamp: String) -> Value {
    let mut record = match event.payload {
        Value::Object(fields) => fields,
        other => Map::from_iter([("data".to_string(), other)]),
    };
    record.insert("type".into(), Value::from(event.event_type));
    record.insert("timestamp".into(), Value::from(timestamp));
    Value::Object(record)
}

impl BallotEventLogger for JsonlBallotEventLogger {
    fn log(&self, event: BallotEvent) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let record = event_record(event, timestamp);

        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(e) = writeln!(writer, "{record}").and_then(|()| writer.flush()) {
            warn!("Dropped ballot event: {}", e);
        }
    }
}

impl Drop for JsonlBallotEventLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
