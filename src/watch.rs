//! Watcher thread: notify + debounce, send changed data paths to main.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};

use crate::error::{RelvisError, Result};

/// Watch `root` and send debounced changed paths over `tx`. Blocks the
/// calling thread; run it on a dedicated one. Returns when the receiver is
/// dropped.
pub fn run_watcher(root: &Path, debounce_ms: u64, tx: mpsc::Sender<PathBuf>) -> Result<()> {
    let debounce = Duration::from_millis(debounce_ms);

    let (event_tx, event_rx) = mpsc::channel::<Vec<PathBuf>>();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(ev) = res {
            let _ = event_tx.send(ev.paths);
        }
    })
    .map_err(|e| RelvisError::Config(e.to_string()))?;

    watcher
        .watch(root, RecursiveMode::Recursive)
        .map_err(|e| RelvisError::Config(e.to_string()))?;

    let mut pending: HashMap<PathBuf, Instant> = HashMap::new();

    loop {
        match event_rx.recv_timeout(debounce) {
            Ok(paths) => {
                let now = Instant::now();
                for p in paths {
                    pending.insert(p, now);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let now = Instant::now();
                let ready: Vec<_> = pending
                    .iter()
                    .filter(|(_, t)| now.duration_since(**t) >= debounce)
                    .map(|(p, _)| p.clone())
                    .collect();
                for p in &ready {
                    pending.remove(p);
                }
                for p in ready {
                    if tx.send(p).is_err() {
                        return Ok(());
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(())
}

/// True when a changed path refers to the given input document. Matching is
/// by file name: editors often replace files via renamed temporaries, so a
/// full-path comparison would miss the final rename.
pub fn touches_input(changed: &Path, input: &Path) -> bool {
    match (changed.file_name(), input.file_name()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touches_input_matches_by_file_name() {
        assert!(touches_input(
            Path::new("/data/.tmp123/graph.json"),
            Path::new("/data/graph.json")
        ));
        assert!(!touches_input(
            Path::new("/data/routes.json"),
            Path::new("/data/graph.json")
        ));
        assert!(!touches_input(Path::new("/"), Path::new("/data/graph.json")));
    }
}
