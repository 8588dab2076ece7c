use std::path::PathBuf;
use gumdrop::Options;

#[derive(Debug, Default, Options)]
pub struct CpRunner {
    // flags
    #[options(no_short, long = "noCheck", help = "Don't check GIT repo for updates.")]
    pub no_check: bool,
    #[options(no_short, long = "noStart", help = "Don't start the control program, only check GIT repo for updates.")]
    pub no_start: bool,
    #[options(short = "v", no_long, help = "Verbose - log files for custom GUIs to user home folder.")]
    pub verbose: bool,
    #[options(short = "h", help = "Prints help information")]
    pub help: bool,
    #[options(short = "V", help = "Prints version information")]
    pub version: bool,

    // options
    #[options(no_short, meta = "VIEW", help = "Select system to overview. Defaults to the first known view.")]
    pub view: Option<String>,
    #[options(no_short, long = "repoCSV", meta = "URL", help = "Use custom repository link for csv file.")]
    pub repo_csv: Option<String>,
    #[options(no_short, long = "localCSV", meta = "FOLDER", help = "Use custom folder for csv file.")]
    pub local_csv: Option<PathBuf>,
    #[options(no_short, long = "repoGUI", meta = "URL", help = "Use custom repository link for GUI files.")]
    pub repo_gui: Option<String>,
    #[options(no_short, long = "localGUI", meta = "FOLDER", help = "Use custom folder for GUI files.")]
    pub local_gui: Option<PathBuf>,
    #[options(no_short, long = "repoCP", meta = "URL", help = "Use custom repository link for the control program.")]
    pub repo_cp: Option<String>,
    #[options(no_short, long = "localCP", meta = "FOLDER", help = "Use custom folder for the control program.")]
    pub local_cp: Option<PathBuf>,
    #[options(no_short, meta = "BRANCH-NAME", help = "Branch to check out when cloning any of the three repositories. Defaults to production.")]
    pub branch: Option<String>,
    #[options(no_short, meta = "FILE", help = "Read views and control program settings from a TOML file.")]
    pub config: Option<PathBuf>,
}

pub fn get_version_str() -> String {
    format!(
        "{} {}",
        env!("CARGO_PKG_VERSION"),
        env!("LATEST_COMMIT"),
    )
}

pub fn print_program_usage() {
    let version_str = get_version_str();
    let author = env!("CARGO_PKG_AUTHORS");
    let about = env!("CARGO_PKG_DESCRIPTION");
    let app_name = env!("CARGO_PKG_NAME");
    let space = "    ";

    println!("{} {}\n{}\n{}\n\nUSAGE:\n{}{} [FLAGS] [OPTIONS]\n",
        app_name, version_str,
        author,
        about,
        space,
        app_name
    );
    println!("{}", CpRunner::usage());
}

pub fn parse_cli<S: AsRef<str>>(args: &[S]) -> Result<CpRunner, gumdrop::Error> {
    <CpRunner as Options>::parse_args_default(args)
}

pub fn get_cli_input() -> CpRunner {
    let args = ::std::env::args().collect::<Vec<_>>();
    let cli = match parse_cli(&args[1..]) {
        Err(e) => {
            println!("Failed to parse cli input: {}\n", e);
            print_program_usage();
            std::process::exit(2);
        }
        Ok(m) => m,
    };

    if cli.version {
        println!("{}", get_version_str());
        std::process::exit(0);
    }

    if cli.help {
        print_program_usage();
        std::process::exit(0);
    }

    cli
}
