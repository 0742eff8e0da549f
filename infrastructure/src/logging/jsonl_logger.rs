//! Meeting transcripts as JSON Lines.
//!
//! Every [`ConversationEvent`] becomes one line: the event's own fields
//! flattened next to `type`, `seq` and `timestamp`. Payloads that are not
//! objects land under `data`.

use boardroom_application::{ConversationEvent, ConversationLogger};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

#[derive(Serialize)]
struct TranscriptLine<'a> {
    #[serde(rename = "type")]
    event_type: &'a str,
    seq: u64,
    timestamp: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl<'a> TranscriptLine<'a> {
    fn new(event: &'a ConversationEvent, seq: u64) -> Self {
        let fields = match &event.payload {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            other => Map::from_iter([("data".to_string(), other.clone())]),
        };
        Self {
            event_type: event.event_type,
            seq,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            fields,
        }
    }
}

struct Sink {
    writer: BufWriter<File>,
    written: u64,
}

/// Writes one transcript file per meeting run
pub struct JsonlConversationLogger {
    sink: Mutex<Sink>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create (or truncate) the transcript at `path`, making parent
    /// directories as needed.
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        Ok(Self {
            sink: Mutex::new(Sink {
                writer: BufWriter::new(file),
                written: 0,
            }),
            path,
        })
    }

    /// Start a transcript for a new run inside `dir`, named after the
    /// current UTC time (`20261019-143000.meeting.jsonl`).
    pub fn in_dir(dir: impl AsRef<Path>) -> io::Result<Self> {
        let stamp = Utc::now().format("%Y%m%d-%H%M%S");
        Self::create(dir.as_ref().join(format!("{}.meeting.jsonl", stamp)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines written so far.
    pub fn events_written(&self) -> u64 {
        self.sink.lock().unwrap_or_else(|e| e.into_inner()).written
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let mut sink = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        let line = TranscriptLine::new(&event, sink.written + 1);

        let result = serde_json::to_writer(&mut sink.writer, &line)
            .map_err(io::Error::from)
            .and_then(|()| sink.writer.write_all(b"\n"))
            .and_then(|()| sink.writer.flush());
        match result {
            Ok(()) => sink.written += 1,
            Err(e) => warn!(
                "Dropped {} transcript event for {}: {}",
                event.event_type,
                self.path.display(),
                e
            ),
        }
    }
}
