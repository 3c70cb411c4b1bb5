//! Protected-path classification. Keeps the scanner and deleter away from
//! system directories, sensitive user directories, and well-known critical
//! files.

use std::collections::HashSet;
use std::env;
use std::path::{Component, Path, PathBuf};

use lazy_static::lazy_static;

const PROTECTED_DIRS_WINDOWS: &[&str] = &[
    "windows",
    "system32",
    "syswow64",
    "winsxs",
    "program files",
    "program files (x86)",
    "programdata",
    "recovery",
    "boot",
    "$recycle.bin",
    "system volume information",
];

const PROTECTED_DIRS_LINUX: &[&str] = &[
    "bin", "sbin", "lib", "lib64", "usr", "etc", "boot", "proc", "sys", "dev", "run", "snap",
];

const PROTECTED_DIRS_MACOS: &[&str] = &[
    "system",
    "library",
    "applications",
    "var",
    "private",
    "cores",
];

/// Directories under the user's home that hold credentials or keys.
const SENSITIVE_USER_DIRS: &[&str] = &[
    ".ssh",
    ".gnupg",
    ".aws",
    ".config",
    ".kube",
    ".docker",
    ".password-store",
    ".mozilla",
    ".thunderbird",
];

/// Filenames that must never be deleted, wherever they sit.
const PROTECTED_FILES: &[&str] = &[
    "ntldr",
    "bootmgr",
    "pagefile.sys",
    "hiberfil.sys",
    "swapfile.sys",
    ".bashrc",
    ".bash_profile",
    ".profile",
    ".zshrc",
    ".gitconfig",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

fn protected_dirs_for(platform: Platform) -> HashSet<&'static str> {
    match platform {
        Platform::Windows => PROTECTED_DIRS_WINDOWS.iter().copied().collect(),
        Platform::MacOs => PROTECTED_DIRS_MACOS
            .iter()
            .chain(PROTECTED_DIRS_LINUX)
            .copied()
            .collect(),
        Platform::Linux => PROTECTED_DIRS_LINUX.iter().copied().collect(),
    }
}

lazy_static! {
    static ref PROTECTED_DIRS: HashSet<&'static str> = protected_dirs_for(Platform::current());
}

/// Check whether a path is a protected system file or sits inside a
/// protected directory. Never touches the filesystem beyond path
/// resolution and never fails, even for paths that do not exist.
pub fn is_protected(path: &Path) -> bool {
    let resolved = resolve(path);

    if let Some(name) = resolved.file_name() {
        let name = name.to_string_lossy().to_lowercase();
        if PROTECTED_FILES.contains(&name.as_str()) {
            return true;
        }
    }

    let home = dirs::home_dir();
    for ancestor in resolved.ancestors().skip(1) {
        let Some(name) = ancestor.file_name() else {
            continue;
        };
        let name = name.to_string_lossy();

        // System directories only count as a direct child of the filesystem
        // root; a user folder named "etc" three levels deep is fair game.
        if PROTECTED_DIRS.contains(name.to_lowercase().as_str()) && is_child_of_root(ancestor) {
            return true;
        }

        if SENSITIVE_USER_DIRS.iter().any(|d| *d == name) {
            if let Some(home) = &home {
                if ancestor.parent() == Some(home.as_path()) {
                    return true;
                }
            }
        }
    }

    false
}

/// Canonicalize where possible; nonexistent paths fall back to a lexical
/// normalization against the current directory so resolution never fails.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    resolved
}

fn is_child_of_root(dir: &Path) -> bool {
    dir.parent().is_some_and(|parent| parent.parent().is_none())
}
