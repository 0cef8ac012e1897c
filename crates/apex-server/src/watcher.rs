//! File watching for rebuild-on-change.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Quiet period after the last raw event before a batch is emitted.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WatchEvent {
    /// Source file was created or modified
    Changed(PathBuf),

    /// Source file was deleted
    Removed(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Changed(p) | WatchEvent::Removed(p) => p,
        }
    }
}

/// Something to watch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum WatchTarget {
    /// A directory; any change below it counts
    Dir(PathBuf),

    /// A single file, watched through its parent directory so that editors
    /// which save by renaming a temp file over it keep being seen
    File(PathBuf),
}

/// Decides which raw paths are worth a rebuild.
#[derive(Debug, Clone, Default)]
struct PathFilter {
    dirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
    ignore: PathBuf,
}

impl PathFilter {
    fn accepts(&self, path: &Path) -> bool {
        if path.starts_with(&self.ignore) {
            return false;
        }
        self.files.iter().any(|f| f == path) || self.dirs.iter().any(|d| path.starts_with(d))
    }
}

/// File watcher for detecting source changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new file watcher for the given targets.
    ///
    /// Events for anything under `ignore` (the build output) are dropped.
    /// Raw events are batched until the sources have been quiet for a short
    /// while, then each distinct change in the batch is sent once.
    /// Returns the watcher and a channel to receive events.
    pub fn new(
        targets: &[WatchTarget],
        ignore: PathBuf,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        let mut filter = PathFilter {
            ignore: absolute(&ignore),
            ..Default::default()
        };
        let mut watched: Vec<(PathBuf, RecursiveMode)> = Vec::new();

        for target in targets {
            match target {
                WatchTarget::Dir(dir) => {
                    if !dir.is_dir() {
                        tracing::warn!("Not watching missing directory {}", dir.display());
                        continue;
                    }
                    let dir = absolute(dir);
                    watched.push((dir.clone(), RecursiveMode::Recursive));
                    filter.dirs.push(dir);
                }
                WatchTarget::File(file) => {
                    let (Some(parent), Some(name)) = (existing_parent(file), file.file_name())
                    else {
                        tracing::warn!("Not watching {}: no parent directory", file.display());
                        continue;
                    };
                    let parent = absolute(&parent);
                    filter.files.push(parent.join(name));
                    watched.push((parent, RecursiveMode::NonRecursive));
                }
            }
        }

        // A recursive watch already covers a non-recursive one on the same directory.
        watched.sort_by_key(|(path, mode)| (path.clone(), *mode == RecursiveMode::NonRecursive));
        watched.dedup_by(|later, earlier| later.0 == earlier.0);

        for (path, mode) in &watched {
            watcher.watch(path, *mode).map_err(std::io::Error::other)?;
            tracing::debug!("Watching {}", path.display());
        }

        std::thread::spawn(move || {
            while let Ok(first) = sync_rx.recv() {
                let mut batch = Vec::new();
                collect(&filter, first, &mut batch);

                let mut closed = false;
                loop {
                    match sync_rx.recv_timeout(DEBOUNCE) {
                        Ok(event) => collect(&filter, event, &mut batch),
                        Err(RecvTimeoutError::Timeout) => break,
                        Err(RecvTimeoutError::Disconnected) => {
                            closed = true;
                            break;
                        }
                    }
                }

                for event in batch {
                    if async_tx.blocking_send(event).is_err() {
                        return;
                    }
                }
                if closed {
                    return;
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Add the accepted, not yet seen changes of `event` to `batch`.
fn collect(filter: &PathFilter, event: notify::Event, batch: &mut Vec<WatchEvent>) {
    for path in &event.paths {
        if !filter.accepts(path) {
            continue;
        }
        if let Some(e) = classify_event(path, &event.kind) {
            if !batch.contains(&e) {
                batch.push(e);
            }
        }
    }
}

/// The directory holding `file`, `.` for a bare file name.
fn existing_parent(file: &Path) -> Option<PathBuf> {
    let parent = match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    parent.is_dir().then_some(parent)
}

/// notify reports canonical paths, so compare against the canonical form when it exists.
fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    match kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(WatchEvent::Changed(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Removed(path.to_path_buf())),
        _ => None,
    }
}
