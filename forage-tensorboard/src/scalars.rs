//! Per-tag scalar accumulation over a log directory.
use crate::proto::{decode_event, Event};
use crate::record::RecordReader;
use anyhow::{Context, Result};
use log::warn;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One scalar point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalarEntry {
    /// Global step recorded with the value.
    pub step: i64,
    /// Seconds since the epoch at write time.
    pub wall_time: f64,
    /// The scalar value.
    pub value: f32,
}

/// All scalar series found in a tensorboard log directory.
///
/// Entries keep the order in which they appear in the event files; files
/// are visited in name order, which for tensorboard file names (they embed
/// the start time) is also chronological order.
#[derive(Debug, Default)]
pub struct ScalarEvents {
    tags: BTreeMap<String, Vec<ScalarEntry>>,
}

impl ScalarEvents {
    /// Reads every `*tfevents*` file directly under `dir`.
    ///
    /// An unreadable directory or file is an error. A file that stops
    /// decoding mid-stream contributes what it held up to that point: live
    /// writers leave half-written records at the tail, which is not worth
    /// failing the whole run for.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("reading log directory {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .map_or(false, |name| name.contains("tfevents"))
            })
            .collect();
        files.sort();

        let mut events = Self::default();
        for path in &files {
            events.load_file(path)?;
        }
        Ok(events)
    }

    fn load_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut reader = RecordReader::new(BufReader::new(file));
        loop {
            match reader.next_record() {
                Ok(Some(payload)) => match decode_event(&payload) {
                    Ok(event) => self.push_event(event),
                    Err(err) => warn!("{}: skipping event: {}", path.display(), err),
                },
                Ok(None) => break,
                Err(err) => {
                    warn!("{}: stopped reading: {}", path.display(), err);
                    break;
                }
            }
        }
        Ok(())
    }

    fn push_event(&mut self, event: Event) {
        let (step, wall_time) = (event.step, event.wall_time);
        for (tag, value) in event.values {
            self.tags.entry(tag).or_default().push(ScalarEntry {
                step,
                wall_time,
                value,
            });
        }
    }

    /// Tags with at least one scalar, sorted.
    pub fn tags(&self) -> Vec<&str> {
        self.tags.keys().map(|tag| tag.as_str()).collect()
    }

    /// The series recorded under `tag`, in file order.
    pub fn scalars(&self, tag: &str) -> Option<&[ScalarEntry]> {
        self.tags.get(tag).map(|entries| entries.as_slice())
    }

    /// Whether no scalar was found at all.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
