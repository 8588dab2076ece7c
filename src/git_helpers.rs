/// Interface to git via the CLI. Every git call goes through
/// exechelper with an explicit argument list, never through a shell.

use std::fs;
use std::path::{Path, PathBuf};
use git_url_parse::GitUrl;
use tracing::debug;

use super::error::{SyncError, SyncErrorKind};

/// The handful of source control operations the syncer needs.
/// Implemented for real by `GitCli`, and by fakes in tests.
pub trait RepoClient {
    /// can we run at all? checked once before syncing
    fn is_available(&self) -> bool {
        true
    }
    /// is `dir` the top level of a git working tree?
    fn is_checkout(&self, dir: &Path) -> bool;
    /// throw away uncommitted changes: reset to current head
    fn discard_changes(&self, dir: &Path) -> Result<(), SyncError>;
    fn update_submodules(&self, dir: &Path) -> Result<(), SyncError>;
    /// fetch and merge the tracking branch from origin
    fn pull(&self, dir: &Path) -> Result<(), SyncError>;
    fn clone_repo(&self, remote: &str, dir: &Path, branch: &str) -> Result<(), SyncError>;
}

#[derive(Debug, Default)]
pub struct GitCli;

fn path_str(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

fn run_git(args: &[&str], dir: Option<&Path>) -> Result<String, SyncError> {
    debug!(?args, ?dir, "running git");
    let output = exechelper::execute_in(args, dir).map_err(|e| {
        SyncError::new(SyncErrorKind::Unknown, format!("Failed to run {}: {}", args[0], e))
    })?;

    if output.success() {
        return Ok(output.stdout);
    }

    debug!(status = output.status, stderr = %output.stderr, "git failed");
    if output.stderr.trim().is_empty() {
        Err(SyncError::from_git_output(&output.stdout))
    } else {
        Err(SyncError::from_git_output(&output.stderr))
    }
}

impl RepoClient for GitCli {
    fn is_available(&self) -> bool {
        git_available()
    }

    fn is_checkout(&self, dir: &Path) -> bool {
        if !dir.is_dir() {
            return false;
        }
        let toplevel = match run_git(&["git", "rev-parse", "--show-toplevel"], Some(dir)) {
            Ok(s) => PathBuf::from(s.trim()),
            Err(_) => return false,
        };
        // a folder nested somewhere inside another
        // repository is not a checkout of its own
        match (toplevel.canonicalize(), dir.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn discard_changes(&self, dir: &Path) -> Result<(), SyncError> {
        run_git(&["git", "reset", "--hard", "HEAD"], Some(dir)).map(|_| ())
    }

    fn update_submodules(&self, dir: &Path) -> Result<(), SyncError> {
        run_git(&["git", "submodule", "update", "--init", "--recursive"], Some(dir)).map(|_| ())
    }

    fn pull(&self, dir: &Path) -> Result<(), SyncError> {
        run_git(&["git", "pull", "--no-rebase", "--no-edit", "origin"], Some(dir)).map(|_| ())
    }

    fn clone_repo(&self, remote: &str, dir: &Path, branch: &str) -> Result<(), SyncError> {
        let dest = path_str(dir);
        let args = [
            "git", "clone",
            "--branch", branch,
            "--recursive",
            remote, dest.as_str(),
        ];
        run_git(&args, None).map(|_| ())
    }
}

/// true if git is installed and runnable
pub fn git_available() -> bool {
    exechelper::executed_successfully(&["git", "--version"])
}

/// true if `dir` exists and has at least one entry in it
pub fn dir_has_contents(dir: &Path) -> bool {
    match fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_some(),
        Err(_) => false,
    }
}

/// short name for a remote, used when printing progress.
/// eg: git://host/group/app-controlprogram.git -> app-controlprogram.
/// falls back to the whole remote string if it doesn't parse
pub fn repo_name(remote: &str) -> String {
    match GitUrl::parse(remote) {
        Ok(url) if !url.name.is_empty() => url.name,
        _ => remote.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_has_contents_only_for_non_empty_dirs() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!dir_has_contents(dir.path()));
        assert!(!dir_has_contents(&dir.path().join("missing")));
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        assert!(dir_has_contents(dir.path()));
    }

    #[test]
    fn missing_dir_is_not_a_checkout() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!GitCli.is_checkout(&dir.path().join("missing")));
    }

    #[test]
    fn repo_name_of_a_real_remote_is_not_empty() {
        let name = repo_name("git://git.m.cps.uj.edu.pl/controlroomsoftware/app-cosylab-controlprogram.git");
        assert!(name.contains("app-cosylab-controlprogram"));
    }

    // these drive the real git binary, so they
    // only run with --features gittests
    #[cfg(feature = "gittests")]
    mod with_git {
        use super::*;

        fn git(args: &[&str], dir: &Path) {
            let mut full = vec!["git", "-c", "user.name=runner", "-c", "user.email=runner@localhost"];
            full.extend_from_slice(args);
            let out = exechelper::execute_in(&full, Some(dir)).unwrap();
            assert!(out.success(), "git {:?} failed: {}", args, out.stderr);
        }

        /// make a repository with one commit on a `production` branch
        fn make_origin(root: &Path) -> PathBuf {
            let origin = root.join("origin");
            fs::create_dir_all(&origin).unwrap();
            git(&["init"], &origin);
            git(&["checkout", "-b", "production"], &origin);
            fs::write(origin.join("devices.csv"), "name,pv\n").unwrap();
            git(&["add", "."], &origin);
            git(&["commit", "-m", "first"], &origin);
            origin
        }

        #[test]
        fn clone_then_checkout_is_detected() {
            let root = tempfile::tempdir().unwrap();
            let origin = make_origin(root.path());
            let local = root.path().join("local");
            GitCli.clone_repo(&path_str(&origin), &local, "production").unwrap();
            assert!(GitCli.is_checkout(&local));
            assert!(local.join("devices.csv").is_file());
            // subfolder of a checkout is not its own checkout
            let sub = local.join("sub");
            fs::create_dir_all(&sub).unwrap();
            assert!(!GitCli.is_checkout(&sub));
        }

        #[test]
        fn discard_and_pull_brings_in_new_commits() {
            let root = tempfile::tempdir().unwrap();
            let origin = make_origin(root.path());
            let local = root.path().join("local");
            GitCli.clone_repo(&path_str(&origin), &local, "production").unwrap();

            fs::write(local.join("devices.csv"), "local edit\n").unwrap();
            fs::write(origin.join("second.csv"), "x\n").unwrap();
            git(&["add", "."], &origin);
            git(&["commit", "-m", "second"], &origin);

            GitCli.discard_changes(&local).unwrap();
            GitCli.update_submodules(&local).unwrap();
            GitCli.pull(&local).unwrap();
            assert_eq!(fs::read_to_string(local.join("devices.csv")).unwrap(), "name,pv\n");
            assert!(local.join("second.csv").is_file());
        }

        #[test]
        fn clone_of_missing_branch_is_config_invalid() {
            let root = tempfile::tempdir().unwrap();
            let origin = make_origin(root.path());
            let local = root.path().join("local");
            let err = GitCli.clone_repo(&path_str(&origin), &local, "no-such-branch").unwrap_err();
            assert_eq!(err.kind, SyncErrorKind::ConfigInvalid);
        }
    }
}
