//! Calendar events shown by `calendar_events` cards.
//!
//! Events come from an [`EventSource`]. The bundled [`FileEventSource`] reads
//! one `event.json` per subfolder of a card's `events/` folder:
//!
//! ```text
//! cards/050-upcoming/
//! ├── card.json                 # template = "calendar_events"
//! └── events/
//!     ├── 2024-05-meetup/
//!     │   └── event.json
//!     └── 2024-06-conference/
//!         └── event.json
//! ```
//!
//! Remote feeds plug in by implementing [`EventSource`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid event file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarEvent {
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default)]
    pub organizer_url: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Anything that can list events for a calendar card.
pub trait EventSource: Sync {
    /// Events sorted by ascending date.
    fn events(&self) -> Result<Vec<CalendarEvent>, EventError>;
}

/// Reads `<dir>/<event>/event.json` files.
pub struct FileEventSource {
    dir: PathBuf,
}

impl FileEventSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl EventSource for FileEventSource {
    /// A missing events folder yields no events. Subfolders without an
    /// `event.json` are skipped.
    fn events(&self) -> Result<Vec<CalendarEvent>, EventError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut event_dirs: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        event_dirs.sort();

        let mut events = Vec::new();
        for dir in &event_dirs {
            let path = dir.join("event.json");
            if path.is_file() {
                events.push(read_event(&path)?);
            }
        }
        events.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(events)
    }
}

fn read_event(path: &Path) -> Result<CalendarEvent, EventError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| EventError::Json {
        path: path.to_path_buf(),
        source,
    })
}
