//! Event Logger
//!
//! Writes drained event records to a JSONL file, one record per line.

use bevy_ecs::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use social_events::EventRecord;

/// Resource: JSONL sink for the event stream
#[derive(Resource)]
pub struct EventLogger {
    sink: Option<(PathBuf, BufWriter<File>)>,
    event_count: u64,
}

impl EventLogger {
    /// Open `path` for writing, creating parent directories and
    /// truncating any previous log
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        debug!(path = %path.display(), "event log opened");
        Ok(Self {
            sink: Some((path, BufWriter::new(file))),
            event_count: 0,
        })
    }

    /// A logger that counts records but writes nothing
    pub fn null() -> Self {
        Self {
            sink: None,
            event_count: 0,
        }
    }

    /// Destination file, if any
    pub fn path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|(path, _)| path.as_path())
    }

    /// Records seen so far, written or not
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn log(&mut self, record: &EventRecord) -> std::io::Result<()> {
        self.event_count += 1;
        if let Some((_, writer)) = self.sink.as_mut() {
            writeln!(writer, "{}", record.to_jsonl()?)?;
        }
        Ok(())
    }

    pub fn log_batch(&mut self, records: &[EventRecord]) -> std::io::Result<()> {
        records.iter().try_for_each(|record| self.log(record))
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        match self.sink.as_mut() {
            Some((_, writer)) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("failed to flush event log: {}", e);
        }
    }
}

/// Events drained from the world during the most recent scheduled tick
#[derive(Resource, Debug, Default)]
pub struct TickEvents {
    pub records: Vec<EventRecord>,
}

impl TickEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
