//! Known-junk directory suggestions, filtered down to targets that exist
//! and actually contain files.

use std::fs;
use std::path::{Path, PathBuf};

use broom_core::{scan, ScanOptions, SilentReporter};
use tracing::debug;

pub struct SuggestItem {
    pub name: String,
    pub path: PathBuf,
    pub description: &'static str,
    pub size: u64,
    pub file_count: usize,
}

/// Build the cleanup suggestion list for the current OS.
pub fn get_suggestions() -> Vec<SuggestItem> {
    let mut targets: Vec<(String, PathBuf, &'static str)> = Vec::new();

    if let Some(cache) = dirs::cache_dir() {
        targets.push(("User Cache".into(), cache.clone(), "Application cache files"));
        targets.push((
            "Chrome Cache".into(),
            chrome_cache_dir(&cache),
            "Google Chrome browser cache",
        ));
    }

    if cfg!(target_os = "windows") {
        if let Some(home) = dirs::home_dir() {
            let local = home.join("AppData").join("Local");
            let roaming = home.join("AppData").join("Roaming");
            targets.push(("Windows Temp".into(), local.join("Temp"), "Windows temporary files"));
            targets.push((
                "Thumbnail Cache".into(),
                local.join("Microsoft").join("Windows").join("Explorer"),
                "Windows thumbnail cache",
            ));
            targets.push((
                "Recent Files".into(),
                roaming.join("Microsoft").join("Windows").join("Recent"),
                "Recent file shortcuts",
            ));
        }
    } else {
        targets.push(("Temp Files".into(), PathBuf::from("/tmp"), "Temporary files"));
        if let Some(home) = dirs::home_dir() {
            targets.push((
                "Trash".into(),
                home.join(".local").join("share").join("Trash"),
                "Trash / Recycle bin",
            ));
            targets.push((
                "Thumbnail Cache".into(),
                home.join(".cache").join("thumbnails"),
                "Image thumbnail cache",
            ));
        }
        targets.push((
            "Journal Logs".into(),
            PathBuf::from("/var/log/journal"),
            "Systemd journal logs",
        ));
    }

    if is_wsl() {
        targets.push((
            "Windows Temp".into(),
            PathBuf::from("/mnt/c/Windows/Temp"),
            "Windows system temp files",
        ));
        for home in wsl_windows_homes() {
            let prefix = home
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let local = home.join("AppData").join("Local");
            let roaming = home.join("AppData").join("Roaming");
            targets.push((
                format!("[{prefix}] Temp"),
                local.join("Temp"),
                "Windows user temp files",
            ));
            targets.push((
                format!("[{prefix}] npm cache"),
                roaming.join("npm-cache"),
                "npm package cache",
            ));
            targets.push((
                format!("[{prefix}] pip cache"),
                local.join("pip").join("cache"),
                "pip package cache",
            ));
            targets.push((
                format!("[{prefix}] Chrome Cache"),
                local
                    .join("Google")
                    .join("Chrome")
                    .join("User Data")
                    .join("Default")
                    .join("Cache"),
                "Chrome browser cache",
            ));
            targets.push((
                format!("[{prefix}] CrashDumps"),
                local.join("CrashDumps"),
                "Windows crash dump files",
            ));
        }
    }

    targets
        .into_iter()
        .filter_map(|(name, path, description)| {
            if !path.is_dir() {
                return None;
            }
            let (size, file_count) = dir_stats(&path)?;
            if file_count == 0 {
                return None;
            }
            Some(SuggestItem {
                name,
                path,
                description,
                size,
                file_count,
            })
        })
        .collect()
}

/// Total size and file count of a directory, counting through scan errors.
fn dir_stats(path: &Path) -> Option<(u64, usize)> {
    let options = ScanOptions {
        respect_protected: false,
        ..Default::default()
    };
    match scan(path, &options, &SilentReporter) {
        Ok(result) => Some((result.total_size, result.file_count())),
        Err(err) => {
            debug!("skipping suggestion {}: {}", path.display(), err);
            None
        }
    }
}

fn chrome_cache_dir(cache_dir: &Path) -> PathBuf {
    if cfg!(target_os = "windows") {
        cache_dir
            .join("Google")
            .join("Chrome")
            .join("User Data")
            .join("Default")
            .join("Cache")
    } else {
        cache_dir.join("google-chrome")
    }
}

fn is_wsl() -> bool {
    fs::read_to_string("/proc/version")
        .map(|version| version.to_lowercase().contains("microsoft"))
        .unwrap_or(false)
}

fn wsl_windows_homes() -> Vec<PathBuf> {
    const SKIP: &[&str] = &[
        "All Users",
        "Default",
        "Default User",
        "Public",
        "WsiAccount",
        "desktop.ini",
    ];

    let mut homes = Vec::new();
    if let Ok(entries) = fs::read_dir("/mnt/c/Users") {
        for entry in entries.flatten() {
            let name = entry.file_name();
            if SKIP.iter().any(|skip| *skip == name.to_string_lossy()) {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                homes.push(path);
            }
        }
    }
    homes
}
