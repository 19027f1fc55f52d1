use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Executable lookup over the directories of a `PATH` value.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    dirs: Vec<PathBuf>,
}

impl PathResolver {
    pub fn from_path_var(path: &str) -> Self {
        PathResolver {
            dirs: std::env::split_paths(path)
                .filter(|d| !d.as_os_str().is_empty())
                .collect(),
        }
    }

    /// First directory holding an executable file called `command` wins.
    pub fn resolve(&self, command: &str) -> Option<PathBuf> {
        if command.is_empty() {
            return None;
        }
        self.dirs
            .iter()
            .map(|dir| dir.join(command))
            .find(|candidate| Self::is_executable(candidate))
    }

    /// Names of executables starting with `prefix`, in no particular order,
    /// possibly with duplicates across directories.
    pub fn executables_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut found = Vec::new();
        for dir in &self.dirs {
            let Ok(entries) = std::fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let name = entry.file_name();
                let Some(name) = name.to_str() else {
                    continue;
                };
                if name.starts_with(prefix) && Self::is_executable(&entry.path()) {
                    found.push(name.to_string());
                }
            }
        }
        found
    }

    pub fn is_executable(path: &Path) -> bool {
        std::fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
}
