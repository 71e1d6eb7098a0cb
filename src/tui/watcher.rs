//! File system watcher for live reload.
//!
//! Watches the directory of the open document rather than the file itself:
//! editors that save by writing a temporary file and renaming it over the
//! original would otherwise detach the watch after the first save.

use crate::error::Result;
use notify::{
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
    event::{AccessKind, AccessMode, ModifyKind},
};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Manages file watching for live reload.
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<Event>>,
    /// Watched directory and the document inside it
    current: Option<(PathBuf, PathBuf)>,
    /// Debounce: ignore events within this duration of the last reload
    last_reload: Instant,
    debounce_duration: Duration,
}

impl FileWatcher {
    pub fn new() -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let watcher = notify::recommended_watcher(tx)?;

        Ok(Self {
            watcher,
            receiver: rx,
            current: None,
            last_reload: Instant::now(),
            debounce_duration: Duration::from_millis(100),
        })
    }

    /// Start watching a document. Stops watching the previous one.
    pub fn watch(&mut self, path: &Path) -> Result<()> {
        self.unwatch();

        let file = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let dir = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        self.watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        debug!(file = %file.display(), "watching for changes");
        self.current = Some((dir, file));
        self.last_reload = Instant::now();

        // events for the previous document are stale now
        while self.receiver.try_recv().is_ok() {}
        Ok(())
    }

    pub fn unwatch(&mut self) {
        if let Some((dir, _)) = self.current.take() {
            let _ = self.watcher.unwatch(&dir);
        }
    }

    /// Drain pending events. Returns true if a reload should be triggered.
    pub fn check_for_changes(&mut self) -> bool {
        let mut should_reload = false;

        loop {
            match self.receiver.try_recv() {
                Ok(Ok(event)) => {
                    if self.is_relevant_event(&event) {
                        should_reload = true;
                    }
                }
                Ok(Err(e)) => warn!("file watch error: {e}"),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if should_reload {
            let now = Instant::now();
            if now.duration_since(self.last_reload) >= self.debounce_duration {
                self.last_reload = now;
                return true;
            }
        }

        false
    }

    fn is_relevant_event(&self, event: &Event) -> bool {
        let Some((_, file)) = &self.current else {
            return false;
        };
        if !event.paths.iter().any(|p| p == file) {
            return false;
        }

        matches!(
            event.kind,
            EventKind::Modify(ModifyKind::Data(_))
                | EventKind::Modify(ModifyKind::Name(_))
                | EventKind::Modify(ModifyKind::Any)
                | EventKind::Access(AccessKind::Close(AccessMode::Write))
                | EventKind::Create(_)
        )
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|(_, file)| file.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, RemoveKind};

    fn event(kind: EventKind, path: &Path) -> Event {
        Event::new(kind).add_path(path.to_path_buf())
    }

    #[test]
    fn test_watch_tracks_canonical_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.md");
        std::fs::write(&file, "# x\n").unwrap();

        let mut watcher = FileWatcher::new().unwrap();
        watcher.watch(&file).unwrap();
        assert_eq!(watcher.current_path(), Some(file.canonicalize().unwrap().as_path()));

        watcher.unwatch();
        assert!(watcher.current_path().is_none());
    }

    #[test]
    fn test_relevant_events() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.md");
        std::fs::write(&file, "# x\n").unwrap();
        let mut watcher = FileWatcher::new().unwrap();
        watcher.watch(&file).unwrap();
        let file = file.canonicalize().unwrap();
        let other = file.with_file_name("other.md");

        let modify = EventKind::Modify(ModifyKind::Data(DataChange::Content));
        assert!(watcher.is_relevant_event(&event(modify, &file)));
        assert!(watcher.is_relevant_event(&event(EventKind::Create(CreateKind::File), &file)));
        assert!(!watcher.is_relevant_event(&event(modify, &other)));
        assert!(!watcher.is_relevant_event(&event(EventKind::Remove(RemoveKind::File), &file)));
    }
}
