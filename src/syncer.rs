use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::error::{LaunchError, SyncError, SyncErrorKind};
use super::git_helpers::{self, RepoClient};

/// one remote repository and the folder it should be checked out to
#[derive(Debug, Clone, PartialEq)]
pub struct SyncTarget {
    pub remote: String,
    pub local: PathBuf,
}

#[derive(Debug)]
pub struct SyncFailure {
    pub target: SyncTarget,
    pub error: SyncError,
}

/// outcome of syncing a batch of targets.
/// only failures are recorded, in the order they happened
#[derive(Debug, Default)]
pub struct SyncReport {
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// pair up remotes and locals. they must line up one to one
pub fn make_targets(
    remotes: &[String],
    locals: &[PathBuf],
) -> Result<Vec<SyncTarget>, LaunchError> {
    if remotes.len() != locals.len() {
        return Err(LaunchError::UnbalancedTargets {
            links: remotes.len(),
            folders: locals.len(),
        });
    }

    let targets = remotes.iter().zip(locals.iter())
        .map(|(remote, local)| SyncTarget {
            remote: remote.clone(),
            local: local.clone(),
        })
        .collect();
    Ok(targets)
}

fn update_checkout<C: RepoClient>(client: &C, local: &Path) -> Result<(), SyncError> {
    client.discard_changes(local)?;
    client.update_submodules(local)?;
    client.pull(local)
}

fn clone_into<C: RepoClient>(
    client: &C,
    remote: &str,
    local: &Path,
    branch: &str,
) -> Result<(), SyncError> {
    if local.exists() && !local.is_dir() {
        return Err(SyncError::new(
            SyncErrorKind::CorruptLocalState,
            format!("{} exists but is not a folder", local.display()),
        ));
    }
    // git would refuse anyway, but this way the reason is clear
    if git_helpers::dir_has_contents(local) {
        return Err(SyncError::new(
            SyncErrorKind::CorruptLocalState,
            format!("{} is not empty and is not a git checkout", local.display()),
        ));
    }
    println!("Cloning from: {}", remote);
    info!(remote, local = %local.display(), branch, "cloning");
    client.clone_repo(remote, local, branch)
}

/// bring a single folder in line with its remote:
/// update it if it is already a checkout, otherwise clone
pub fn sync_target<C: RepoClient>(
    client: &C,
    target: &SyncTarget,
    branch: &str,
) -> Result<(), SyncError> {
    if target.remote.trim().is_empty() {
        return Err(SyncError::new(
            SyncErrorKind::ConfigInvalid,
            format!("no remote repository given for {}", target.local.display()),
        ));
    }

    if client.is_checkout(&target.local) {
        let name = git_helpers::repo_name(&target.remote);
        println!("Updating: {} ({})", target.local.display(), name);
        info!(remote = %target.remote, local = %target.local.display(), "updating checkout");
        update_checkout(client, &target.local)
    } else {
        clone_into(client, &target.remote, &target.local, branch)
    }
}

/// sync every target in order. a failing target is reported
/// and counted, and the rest are still attempted
pub fn sync_targets<C: RepoClient>(
    client: &C,
    targets: &[SyncTarget],
    branch: &str,
) -> SyncReport {
    let mut report = SyncReport::default();
    for target in targets {
        if let Err(error) = sync_target(client, target, branch) {
            println!("While syncing: {} error occurred: {}", target.remote, error);
            warn!(remote = %target.remote, kind = %error.kind, "sync failed: {}", error.message);
            report.failures.push(SyncFailure {
                target: target.clone(),
                error,
            });
        }
    }
    report
}

/// the whole check-for-updates step. the two lists must be
/// the same length, otherwise nothing is synced
pub fn check_updates<C: RepoClient>(
    client: &C,
    remotes: &[String],
    locals: &[PathBuf],
    branch: &str,
) -> Result<SyncReport, LaunchError> {
    let targets = make_targets(remotes, locals)?;
    Ok(sync_targets(client, &targets, branch))
}
