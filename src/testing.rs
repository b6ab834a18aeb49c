use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

static FIXTURE_SEQUENCE: AtomicU32 = AtomicU32::new(0);

fn fixture_root(label: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    let pid = std::process::id();
    let sequence = FIXTURE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    path.push(format!("easel-{label}-{pid}-{nanos}-{sequence}"));
    path
}

/// Runs `f` against a fresh directory that is removed afterwards.
pub(crate) fn with_temp_root<F: FnOnce(&Path)>(label: &str, f: F) {
    let root = fixture_root(label);
    fs::create_dir_all(&root).expect("fixture directory should be created");
    f(&root);
    let _ = fs::remove_dir_all(&root);
}
