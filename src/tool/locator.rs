// ABOUTME: Resolves where the container tool lives on this machine.
// ABOUTME: Checks known install paths in order, else defers to a PATH search.

use std::fmt;
use std::path::{Path, PathBuf};

/// Bare command name of the container tool.
pub const DEFAULT_TOOL_NAME: &str = "container";

/// Install locations checked before giving up and searching PATH.
pub fn default_candidates() -> Vec<PathBuf> {
    [
        "/usr/local/bin/container",
        "/opt/homebrew/bin/container",
        "/usr/bin/container",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

/// Where the tool will be launched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolPath {
    /// A concrete executable file.
    Absolute(PathBuf),
    /// A bare name resolved through the search path at launch time.
    SearchPath(String),
}

impl ToolPath {
    /// Command name used when launching through the shell.
    pub fn program_name(&self) -> String {
        match self {
            ToolPath::Absolute(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            ToolPath::SearchPath(name) => name.clone(),
        }
    }

    /// The path or name as it would be typed in a shell.
    pub fn invocation(&self) -> String {
        match self {
            ToolPath::Absolute(path) => path.display().to_string(),
            ToolPath::SearchPath(name) => name.clone(),
        }
    }
}

impl fmt::Display for ToolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.invocation())
    }
}

#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// First executable candidate, or a search-path lookup of `name`.
pub fn locate(candidates: &[PathBuf], name: &str) -> ToolPath {
    match candidates.iter().find(|p| is_executable(p)) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "found container tool");
            ToolPath::Absolute(path.clone())
        }
        None => {
            tracing::debug!(name, "no candidate executable; deferring to search path");
            ToolPath::SearchPath(name.to_string())
        }
    }
}
