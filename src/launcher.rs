use std::io;
use std::path::PathBuf;
use die::red;
use tracing::{debug, info, warn};

use super::cli::CpRunner;
use super::error::{LaunchError, ResolveError};
use super::git_helpers::RepoClient;
use super::syncer;
use super::views::{ControlProgramConfig, ViewConfig, ViewTable};

const NO_GIT_CHECK_MSG: &str = "Not checking for updates. Your files might be old or corrupted.";
const ERROR_UPDATE: &str = "Errors occurred during updating. Please fix them and start the runner again.";
const ERROR_RUN_CP: &str = "Errors occurred when trying to run the Control Program. Please fix them and start the runner again.";

/// Starts the control program and waits for it to finish.
pub trait ProcessSpawner {
    /// returns the exit code, or None if it was killed by a signal
    fn run(&self, program: &str, args: &[String]) -> io::Result<Option<i32>>;
}

/// runs the control program attached to our terminal
#[derive(Debug, Default)]
pub struct TerminalSpawner;

impl ProcessSpawner for TerminalSpawner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<Option<i32>> {
        let mut exe_and_args = vec![program];
        exe_and_args.extend(args.iter().map(|a| a.as_str()));
        exechelper::run_inherited(&exe_and_args)
    }
}

/// the view and control program settings for this run,
/// after command line overrides have been applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    pub view: ViewConfig,
    pub control_program: ControlProgramConfig,
}

impl ResolvedRun {
    pub fn entry_path(&self) -> PathBuf {
        self.control_program.folder.join(&self.control_program.entry)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.view.folder_csv.join(&self.view.csv_file)
    }

    /// csv, control program, gui. in that order
    pub fn remotes(&self) -> Vec<String> {
        vec![
            self.view.repo_csv.clone(),
            self.control_program.repo.clone(),
            self.view.repo_gui.clone(),
        ]
    }

    pub fn locals(&self) -> Vec<PathBuf> {
        vec![
            self.view.folder_csv.clone(),
            self.control_program.folder.clone(),
            self.view.folder_gui.clone(),
        ]
    }

    /// the interpreter, and the arguments to give it
    pub fn command(&self, verbose: bool) -> (String, Vec<String>) {
        let mut args = vec![
            self.entry_path().to_string_lossy().into_owned(),
            "--CSV".to_string(),
            self.csv_path().to_string_lossy().into_owned(),
            "--GUI".to_string(),
            self.view.folder_gui.to_string_lossy().into_owned(),
            "--TITLE".to_string(),
            self.view.title.clone(),
        ];
        if verbose {
            args.push("-v".to_string());
        }
        (self.control_program.interpreter.clone(), args)
    }

    /// required files that aren't there, each with a hint
    /// about which repository setting to look at
    pub fn missing_files(&self) -> Vec<(PathBuf, &'static str)> {
        let mut missing = vec![];
        let entry = self.entry_path();
        if !entry.is_file() {
            missing.push((entry, "Check if the repository location for the Control Program is properly set."));
        }
        let csv = self.csv_path();
        if !csv.is_file() {
            missing.push((csv, "Check if the repository location for the CSV files is properly set."));
        }
        missing
    }
}

/// pick the view and apply every override the user gave
pub fn resolve_run(cmd: &CpRunner, table: &ViewTable) -> Result<ResolvedRun, ResolveError> {
    let view_name = match cmd.view {
        Some(ref v) => v.as_str(),
        None => table.default_view_name().unwrap_or(""),
    };
    let mut view = table.resolve(view_name)?.clone();
    let mut control_program = table.control_program.clone();

    if let Some(ref repo) = cmd.repo_csv {
        view.repo_csv = repo.clone();
    }
    if let Some(ref local) = cmd.local_csv {
        view.folder_csv = local.clone();
    }
    if let Some(ref repo) = cmd.repo_gui {
        view.repo_gui = repo.clone();
    }
    if let Some(ref local) = cmd.local_gui {
        view.folder_gui = local.clone();
    }
    if let Some(ref repo) = cmd.repo_cp {
        control_program.repo = repo.clone();
    }
    if let Some(ref local) = cmd.local_cp {
        control_program.folder = local.clone();
    }
    if let Some(ref branch) = cmd.branch {
        control_program.branch = branch.clone();
    }

    Ok(ResolvedRun { view, control_program })
}

pub fn format_unknown_view(err: &ResolveError) -> String {
    match err {
        ResolveError::UnknownView { known, .. } => {
            let quoted = known.iter()
                .map(|k| format!("'{}'", k))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}\nPossible views are: {}", red(err.to_string()), quoted)
        }
    }
}

fn clamp_status(count: usize) -> i32 {
    if count > i32::MAX as usize { i32::MAX } else { count as i32 }
}

/// check for updates (unless told not to), make sure the
/// required files are in place, then start the control program.
/// returns the status code the runner should exit with
pub fn run_launcher<C: RepoClient, P: ProcessSpawner>(
    cmd: &CpRunner,
    table: &ViewTable,
    client: &C,
    spawner: &P,
) -> i32 {
    let run = match resolve_run(cmd, table) {
        Ok(r) => r,
        Err(e) => {
            let ResolveError::UnknownView { ref requested, .. } = e;
            warn!(%requested, "unknown view");
            println!("{}", format_unknown_view(&e));
            return 1;
        }
    };
    info!(view = %run.view.name, "resolved view");

    if cmd.no_check {
        println!("{}", NO_GIT_CHECK_MSG);
    } else {
        println!("Checking for updates ...");
        if !client.is_available() {
            println!("{}", red("Failed to run. Missing dependency 'git'"));
            return 1;
        }
        let report = match syncer::check_updates(
            client, &run.remotes(), &run.locals(), &run.control_program.branch,
        ) {
            Ok(r) => r,
            Err(e) => {
                println!("{}", e);
                return 1;
            }
        };
        if !report.is_success() {
            for failure in report.failures.iter() {
                println!("  {} ({}): {}",
                    failure.target.local.display(), failure.target.remote, failure.error.kind);
            }
            println!("{}", red(ERROR_UPDATE));
            return clamp_status(report.failed_count());
        }
    }

    if cmd.no_start {
        return 0;
    }

    println!("\nOpening Control Program ...");
    let missing = run.missing_files();
    if !missing.is_empty() {
        for (path, hint) in missing.iter() {
            println!("File: {} does not exist.", path.display());
            println!("{}", hint);
        }
        debug!(count = missing.len(), "required files missing");
        println!("{}", red(ERROR_RUN_CP));
        return 1;
    }

    let (program, args) = run.command(cmd.verbose);
    info!(%program, ?args, "starting control program");
    match spawner.run(&program, &args) {
        Ok(Some(code)) => code,
        Ok(None) => {
            println!("{}", red("The Control Program was terminated by a signal."));
            1
        }
        Err(source) => {
            let err = LaunchError::Spawn { program, source };
            println!("{}", err);
            println!("{}", red(ERROR_RUN_CP));
            1
        }
    }
}
