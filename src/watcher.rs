//! Development-mode observer for the document root.
//!
//! Events are only logged; nothing is invalidated and no browser is notified.

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use notify::{event::ModifyKind, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("failed to create watcher: {0}")]
    Creation(#[from] notify::Error),

    #[error("failed to watch {}: {source}", .path.display())]
    WatchPath {
        path: PathBuf,
        source: notify::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChangeKind {
    Create,
    Modify,
    Remove,
    Rename,
}

impl FileChangeKind {
    /// Kinds worth reporting; access and other notifications are dropped.
    pub fn from_event_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Create),
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Rename),
            EventKind::Modify(_) => Some(Self::Modify),
            EventKind::Remove(_) => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Modify => "modified",
            Self::Remove => "removed",
            Self::Rename => "renamed",
        }
    }
}

/// One log line per path touched by `event`.
pub fn describe_event(event: &Event) -> Vec<String> {
    let Some(kind) = FileChangeKind::from_event_kind(&event.kind) else {
        return Vec::new();
    };

    event
        .paths
        .iter()
        .map(|path| format!("{} {}", kind.as_str(), path.display()))
        .collect()
}

/// Keeps the underlying watcher alive for as long as it is held.
pub struct DocsWatcher {
    _watcher: Mutex<RecommendedWatcher>,
}

impl DocsWatcher {
    pub fn start(root: &Path) -> Result<Self, WatcherError> {
        Self::start_with(root, |line| log::info!("{line}"))
    }

    /// Watches `root` recursively and hands every [`describe_event`] line to `report`.
    pub fn start_with<F>(root: &Path, mut report: F) -> Result<Self, WatcherError>
    where
        F: FnMut(String) + Send + 'static,
    {
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) => describe_event(&event).into_iter().for_each(&mut report),
                Err(error) => log::warn!("document watcher error: {error}"),
            }
        })?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|source| WatcherError::WatchPath {
                path: root.to_path_buf(),
                source,
            })?;

        log::info!("watching {} for changes", root.display());

        Ok(Self {
            _watcher: Mutex::new(watcher),
        })
    }
}
