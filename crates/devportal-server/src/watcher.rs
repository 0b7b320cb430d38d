//! Catalog file watching for hot reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Quiet period that coalesces the burst of events one save produces.
const SETTLE: Duration = Duration::from_millis(100);

/// Events emitted by the catalog watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Catalog file was written or replaced
    CatalogChanged(PathBuf),

    /// Catalog file was removed
    CatalogRemoved(PathBuf),
}

/// Watches one catalog file.
pub struct CatalogWatcher {
    _watcher: RecommendedWatcher,
}

impl CatalogWatcher {
    /// Watch `catalog` for changes.
    ///
    /// The parent directory is watched so editors that save by replacing the
    /// file are still seen. Returns the watcher and a channel to receive events.
    pub fn new(
        catalog: &Path,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(16);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        let target = absolute(catalog);
        let dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(std::io::Error::other)?;

        std::thread::spawn(move || {
            while let Ok(event) = sync_rx.recv() {
                let mut latest = classify_event(&event, &target);

                // Coalesce until the file settles, keeping the last outcome
                while let Ok(event) = sync_rx.recv_timeout(SETTLE) {
                    if let Some(e) = classify_event(&event, &target) {
                        latest = Some(e);
                    }
                }

                if let Some(e) = latest {
                    if async_tx.blocking_send(e).is_err() {
                        break;
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Classify a notify event against the watched catalog path.
fn classify_event(event: &notify::Event, target: &Path) -> Option<WatchEvent> {
    use notify::EventKind;

    if !event.paths.iter().any(|p| same_file_name(p, target)) {
        return None;
    }

    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => {
            Some(WatchEvent::CatalogChanged(target.to_path_buf()))
        }
        EventKind::Remove(_) => Some(WatchEvent::CatalogRemoved(target.to_path_buf())),
        _ => None,
    }
}

fn same_file_name(path: &Path, target: &Path) -> bool {
    path.file_name().is_some() && path.file_name() == target.file_name()
}
