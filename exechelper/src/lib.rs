use std::process::Command;
use std::{io::Error, path::Path, process::Stdio};

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

fn build_command(exe_and_args: &[&str], dir: Option<&Path>) -> Command {
    // at the very least must provide the executable name
    assert!(exe_and_args.len() >= 1);

    let mut proc = Command::new(exe_and_args[0]);
    proc.args(&exe_and_args[1..]);
    if let Some(d) = dir {
        proc.current_dir(d);
    }
    proc
}

pub fn executed_successfully(exe_and_args: &[&str]) -> bool {
    match execute(exe_and_args) {
        Err(_) => false,
        Ok(cmd_output) => cmd_output.success(),
    }
}

/// run to completion with stdin closed, capturing stdout and stderr.
/// if `dir` is given, the command runs from that directory
pub fn execute_in(
    exe_and_args: &[&str],
    dir: Option<&Path>,
) -> Result<CommandOutput, Error> {
    let mut proc = build_command(exe_and_args, dir);
    proc.stdin(Stdio::null());
    let out = proc.output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        // killed by a signal. treat it as a generic failure
        status: out.status.code().unwrap_or(1),
    })
}

pub fn execute(exe_and_args: &[&str]) -> Result<CommandOutput, Error> {
    execute_in(exe_and_args, None)
}

/// run attached to our terminal (stdin, stdout, stderr
/// are all inherited) and wait for it to exit.
/// returns the exit code, or None if the process was
/// terminated by a signal
pub fn run_inherited(exe_and_args: &[&str]) -> Result<Option<i32>, Error> {
    let mut proc = build_command(exe_and_args, None);
    let status = proc.status()?;
    Ok(status.code())
}
