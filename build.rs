use std::process::Command;
use std::process::Stdio;

const UNKNOWN_COMMIT: &str = "(unknown commit)";

pub fn get_latest_commit() -> String {
    let command_and_args = [
        "git", "log", "--oneline",
        "--pretty=%h", "-n", "1",
    ];
    let mut proc = Command::new(command_and_args[0]);
    proc.args(&command_and_args[1..]);
    proc.stdin(Stdio::null());
    proc.stderr(Stdio::null());

    match proc.output() {
        Ok(out) if out.status.success() => {
            let hash = String::from_utf8_lossy(&out.stdout).trim().to_string();
            if hash.is_empty() { UNKNOWN_COMMIT.into() } else { hash }
        }
        _ => UNKNOWN_COMMIT.into(),
    }
}

fn main() {
    let latest_commit = get_latest_commit();
    println!("cargo:rustc-env=LATEST_COMMIT={}", latest_commit);
}
