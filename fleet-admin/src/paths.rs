//! Where fleet-admin keeps its settings and logs.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Archived logs kept next to `latest.log`.
pub const KEPT_LOGS: usize = 25;

const LATEST_LOG: &str = "latest.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "fleet", "fleet-admin")
}

/// Per-user cache directory; logs live here.
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Per-user config directory holding `settings.json`.
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.json"))
}

/// Log file of the current run.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archive the previous run's log in the cache directory. Runs before the
/// logger is installed, so failures are ignored.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    if fs::create_dir_all(&cache).is_ok() {
        rotate_logs_in(&cache);
    }
}

/// Rename `latest.log` in `dir` to `<timestamp>.log` and prune archives down
/// to [`KEPT_LOGS`], oldest first.
pub fn rotate_logs_in(dir: &Path) {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let archived = dir.join(format!("{}.log", chrono::Local::now().format("%Y%m%d_%H%M%S")));
        let _ = fs::rename(&latest, &archived);
    }

    let mut archives = archived_logs(dir);
    archives.sort_by_key(|path| fs::metadata(path).and_then(|m| m.modified()).ok());
    let excess = archives.len().saturating_sub(KEPT_LOGS);
    for path in &archives[..excess] {
        let _ = fs::remove_file(path);
    }
}

fn archived_logs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "log")
                && path.file_name().is_some_and(|name| name != LATEST_LOG)
        })
        .collect()
}
