use die::die;
use tracing_subscriber::EnvFilter;

mod cli;
mod error;
mod git_helpers;
mod launcher;
mod settings;
mod syncer;
mod views;

fn init_logging() {
    // user facing output goes to stdout with println,
    // diagnostics go to stderr and are off unless RUST_LOG says otherwise
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cprunner=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cmd = cli::get_cli_input();

    let base_dir = views::base_dir();
    let table = match cmd.config {
        None => views::ViewTable::builtin(&base_dir),
        Some(ref path) => match settings::load_view_table(path, &base_dir) {
            Ok(t) => t,
            Err(e) => die!("{}", e),
        },
    };

    let status = launcher::run_launcher(
        &cmd,
        &table,
        &git_helpers::GitCli,
        &launcher::TerminalSpawner,
    );
    std::process::exit(status);
}
