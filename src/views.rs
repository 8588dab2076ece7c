use std::env;
use std::path::{Path, PathBuf};

use super::error::ResolveError;

pub const DEFAULT_BRANCH: &str = "production";
pub const DEFAULT_INTERPRETER: &str = "python2.7";
pub const CONTROL_PROGRAM_REPO: &str = "git://git.m.cps.uj.edu.pl/controlroomsoftware/app-cosylab-controlprogram.git";
pub const CONTROL_PROGRAM_FOLDER: &str = "ControlProgram";
pub const CONTROL_PROGRAM_ENTRY: &str = "ControlProgram.py";

/// name, csv repo, csv folder, gui repo, gui folder, csv file, title.
/// the first entry is the default view
const BUILTIN_VIEWS: [(&str, &str, &str, &str, &str, &str, &str); 3] = [
    (
        "Synchrotron",
        "git://git.m.cps.uj.edu.pl/facilityconfiguration/conf-cosylab-synchrotroncsv.git",
        "Synchrotron_CSV",
        "git://git.m.cps.uj.edu.pl/controlroomsoftware/app-cosylab-synchrotronguis.git",
        "Synchrotron_GUIs",
        "synchrotron_devices.csv",
        "Solaris Synchrotron Control Program",
    ),
    (
        "Uarpes",
        "git://git.m.cps.uj.edu.pl/facilityconfiguration/conf-cosylab-bl05idcsv.git",
        "UarpesBL_CSV",
        "git://git.m.cps.uj.edu.pl/controlroomsoftware/app-cosylab-bl05idguis.git",
        "UarpesBL_GUIs",
        "BL-05ID.csv",
        "Uarpes Beamline Control Program",
    ),
    (
        "Peem",
        "git://git.m.cps.uj.edu.pl/facilityconfiguration/conf-cosylab-bl04bmcsv.git",
        "PeemBL_CSV",
        "git://git.m.cps.uj.edu.pl/controlroomsoftware/app-cosylab-bl04bmguis.git",
        "PeemBL_GUIs",
        "BL-04BM.csv",
        "Peem Beamline Control Program",
    ),
];

/// Everything a view needs: where its CSV and GUI
/// repositories live, where they get checked out to,
/// which CSV file to hand to the control program, and
/// the window title.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub name: String,
    pub repo_csv: String,
    pub folder_csv: PathBuf,
    pub repo_gui: String,
    pub folder_gui: PathBuf,
    pub csv_file: String,
    pub title: String,
}

/// The control program itself is the same for every view.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlProgramConfig {
    pub repo: String,
    pub folder: PathBuf,
    pub entry: String,
    pub interpreter: String,
    /// branch to clone. applies to all three repositories
    /// (csv, control program, gui), not just this one
    pub branch: String,
}

impl ControlProgramConfig {
    pub fn builtin(base_dir: &Path) -> ControlProgramConfig {
        ControlProgramConfig {
            repo: CONTROL_PROGRAM_REPO.into(),
            folder: base_dir.join(CONTROL_PROGRAM_FOLDER),
            entry: CONTROL_PROGRAM_ENTRY.into(),
            interpreter: DEFAULT_INTERPRETER.into(),
            branch: DEFAULT_BRANCH.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewTable {
    pub views: Vec<ViewConfig>,
    pub control_program: ControlProgramConfig,
}

impl ViewTable {
    /// the facility defaults. local folders are
    /// placed next to each other inside `base_dir`
    pub fn builtin(base_dir: &Path) -> ViewTable {
        let views = BUILTIN_VIEWS.iter()
            .map(|(name, repo_csv, folder_csv, repo_gui, folder_gui, csv_file, title)| {
                ViewConfig {
                    name: name.to_string(),
                    repo_csv: repo_csv.to_string(),
                    folder_csv: base_dir.join(folder_csv),
                    repo_gui: repo_gui.to_string(),
                    folder_gui: base_dir.join(folder_gui),
                    csv_file: csv_file.to_string(),
                    title: title.to_string(),
                }
            })
            .collect();

        ViewTable {
            views,
            control_program: ControlProgramConfig::builtin(base_dir),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.views.iter().map(|v| v.name.clone()).collect()
    }

    pub fn default_view_name(&self) -> Option<&str> {
        self.views.first().map(|v| v.name.as_str())
    }

    /// exact, case sensitive lookup
    pub fn resolve(&self, name: &str) -> Result<&ViewConfig, ResolveError> {
        self.views.iter()
            .find(|v| v.name == name)
            .ok_or_else(|| ResolveError::UnknownView {
                requested: name.to_string(),
                known: self.names(),
            })
    }
}

/// the directory the runner lives in. all default
/// checkouts go here. falls back to the current directory
/// if we can't figure out where our own executable is
pub fn base_dir() -> PathBuf {
    let exe_dir = env::current_exe().ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()));
    match exe_dir {
        Some(d) => d,
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
