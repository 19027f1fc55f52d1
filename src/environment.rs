use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use crate::executor::PathResolver;

/// Variables captured at startup plus the shell's own working directory.
///
/// The working directory is tracked here rather than in the process, and every
/// child is spawned inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    vars: HashMap<String, String>,
    cwd: PathBuf,
}

impl Environment {
    pub fn new() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self::with_vars(std::env::vars(), cwd)
    }

    pub fn with_vars<I>(vars: I, cwd: PathBuf) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Environment {
            vars: vars.into_iter().collect(),
            cwd,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|v| v.as_str())
    }

    pub fn vars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn set_cwd(&mut self, dir: PathBuf) {
        self.cwd = dir;
    }

    pub fn home(&self) -> Option<&str> {
        self.get("HOME")
    }

    pub fn path_resolver(&self) -> PathResolver {
        PathResolver::from_path_var(self.get("PATH").unwrap_or(""))
    }

    /// Locate the executable a command name refers to.
    ///
    /// Names containing `/` are taken relative to the working directory,
    /// everything else is searched on `PATH`.
    pub fn find_executable(&self, name: &str) -> Option<PathBuf> {
        if name.contains('/') {
            let path = self.resolve_path(name);
            return PathResolver::is_executable(&path).then_some(path);
        }
        self.path_resolver().resolve(name)
    }

    /// Join `path` onto the working directory and fold `.` and `..`.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        normalize(&self.cwd.join(path))
    }
}

/// Lexical normalization, no symlinks are followed.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(vars: &[(&str, &str)], cwd: &str) -> Environment {
        Environment::with_vars(
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())),
            PathBuf::from(cwd),
        )
    }

    #[test]
    fn test_new_includes_os_env() {
        let env = Environment::new();
        assert!(env.cwd().is_absolute());
    }

    #[test]
    fn test_get() {
        let env = env_with(&[("FOO", "bar")], "/");
        assert_eq!(env.get("FOO"), Some("bar"));
        assert_eq!(env.get("MISSING"), None);
    }

    #[test]
    fn test_resolve_path_normalizes() {
        let env = env_with(&[], "/home/user/src");
        assert_eq!(env.resolve_path("../docs/./a.txt"), PathBuf::from("/home/user/docs/a.txt"));
        assert_eq!(env.resolve_path("/tmp/../etc"), PathBuf::from("/etc"));
        assert_eq!(env.resolve_path("."), PathBuf::from("/home/user/src"));
    }

    #[test]
    fn test_normalize_does_not_escape_root() {
        assert_eq!(normalize(Path::new("/../..")), PathBuf::from("/"));
    }

    #[test]
    fn test_find_executable_with_slash() {
        let env = env_with(&[("PATH", "")], "/");
        assert_eq!(env.find_executable("bin/sh"), Some(PathBuf::from("/bin/sh")));
        assert_eq!(env.find_executable("./definitely-not-here"), None);
    }
}
