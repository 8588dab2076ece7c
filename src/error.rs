use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The closed set of reasons a single repository can fail to sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorKind {
    /// empty remote, missing branch, remote that isn't a repository, etc.
    ConfigInvalid,
    /// could not reach the remote, or the remote refused us
    Network,
    /// the local folder is in a state we can't update or clone into
    CorruptLocalState,
    Unknown,
}

impl fmt::Display for SyncErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncErrorKind::ConfigInvalid => "invalid configuration",
            SyncErrorKind::Network => "network failure",
            SyncErrorKind::CorruptLocalState => "corrupt local state",
            SyncErrorKind::Unknown => "unknown error",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct SyncError {
    pub kind: SyncErrorKind,
    pub message: String,
}

impl SyncError {
    pub fn new<S: Into<String>>(kind: SyncErrorKind, message: S) -> SyncError {
        SyncError { kind, message: message.into() }
    }

    /// sort a failed git invocation into one of the known kinds
    /// by looking at what git wrote to stderr
    pub fn from_git_output(stderr: &str) -> SyncError {
        let lower = stderr.to_lowercase();

        // local filesystem trouble first. these can also say
        // "permission denied", which must not read as an auth failure
        let kind = if contains_any(&lower, &[
            "could not create work tree dir",
            "unable to create",
            "cannot open .git",
            "index.lock",
        ]) {
            SyncErrorKind::CorruptLocalState
        } else if contains_any(&lower, &[
            "could not resolve host",
            "unable to access",
            "connection refused",
            "connection timed out",
            "authentication failed",
            "permission denied (publickey",
            "network is unreachable",
            "unable to connect",
            "the remote end hung up",
        ]) {
            SyncErrorKind::Network
        } else if contains_any(&lower, &[
            "already exists and is not an empty directory",
            "not a git repository",
            "corrupt",
            "bad object",
            "unable to read tree",
            "would be overwritten",
            "unmerged files",
            "refusing to merge unrelated histories",
        ]) {
            SyncErrorKind::CorruptLocalState
        } else if contains_any(&lower, &[
            "not found in upstream",
            "does not appear to be a git repository",
            "repository not found",
            "couldn't find remote ref",
            "no such remote",
        ]) {
            SyncErrorKind::ConfigInvalid
        } else if lower.contains("could not read from remote repository") {
            SyncErrorKind::Network
        } else {
            SyncErrorKind::Unknown
        };

        let message = stderr.lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .find(|l| l.starts_with("fatal:") || l.starts_with("error:"))
            .or_else(|| stderr.lines().map(|l| l.trim()).find(|l| !l.is_empty()))
            .unwrap_or("git exited with an error")
            .to_string();

        SyncError { kind, message }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Desired view does not exist.")]
    UnknownView { requested: String, known: Vec<String> },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path:?}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Number of links and folders doesn't match. ({links} links, {folders} folders)")]
    UnbalancedTargets { links: usize, folders: usize },
    #[error("Failed to start {program}: {source}")]
    Spawn { program: String, source: std::io::Error },
}
