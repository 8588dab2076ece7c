use std::fs;
use std::path::{Path, PathBuf};
use toml::Value;

use super::error::SettingsError;
use super::views::{ControlProgramConfig, ViewConfig, ViewTable};

fn invalid<S: Into<String>>(msg: S) -> SettingsError {
    SettingsError::Invalid(msg.into())
}

fn get_string(table: &toml::value::Table, key: &str, context: &str) -> Result<Option<String>, SettingsError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(invalid(format!(
            "{}.{} must be a string, found {}", context, key, other.type_str()))),
    }
}

fn get_required_string(table: &toml::value::Table, key: &str, context: &str) -> Result<String, SettingsError> {
    get_string(table, key, context)?
        .ok_or_else(|| invalid(format!("{} is missing {}", context, key)))
}

fn parse_control_program(
    value: Option<&Value>,
    base_dir: &Path,
) -> Result<ControlProgramConfig, SettingsError> {
    let mut cp = ControlProgramConfig::builtin(base_dir);
    let table = match value {
        None => return Ok(cp),
        Some(Value::Table(t)) => t,
        Some(_) => return Err(invalid("control_program must be a table")),
    };

    let context = "control_program";
    if let Some(repo) = get_string(table, "repo", context)? {
        cp.repo = repo;
    }
    if let Some(folder) = get_string(table, "folder", context)? {
        cp.folder = base_dir.join(folder);
    }
    if let Some(entry) = get_string(table, "entry", context)? {
        cp.entry = entry;
    }
    if let Some(interpreter) = get_string(table, "interpreter", context)? {
        cp.interpreter = interpreter;
    }
    if let Some(branch) = get_string(table, "branch", context)? {
        cp.branch = branch;
    }
    Ok(cp)
}

fn parse_view(name: &str, value: &Value, base_dir: &Path) -> Result<ViewConfig, SettingsError> {
    let context = format!("views.{}", name);
    let table = value.as_table()
        .ok_or_else(|| invalid(format!("{} must be a table", context)))?;

    let field = |key: &str| get_required_string(table, key, &context);

    Ok(ViewConfig {
        name: name.to_string(),
        repo_csv: field("repo_csv")?,
        folder_csv: base_dir.join(field("folder_csv")?),
        repo_gui: field("repo_gui")?,
        folder_gui: base_dir.join(field("folder_gui")?),
        csv_file: field("csv_file")?,
        title: field("title")?,
    })
}

/// parse a settings document into a view table. The
/// order of the `[views.*]` tables is kept, so the first
/// one listed becomes the default view
pub fn parse_view_table(contents: &str, base_dir: &Path) -> Result<ViewTable, SettingsError> {
    let doc = contents.parse::<Value>()?;
    let root = doc.as_table()
        .ok_or_else(|| invalid("settings must be a table"))?;

    let control_program = parse_control_program(root.get("control_program"), base_dir)?;

    let views_table = match root.get("views") {
        Some(Value::Table(t)) => t,
        Some(_) => return Err(invalid("views must be a table of tables")),
        None => return Err(invalid("no [views.<name>] tables found")),
    };
    let mut views = vec![];
    for (name, value) in views_table.iter() {
        views.push(parse_view(name, value, base_dir)?);
    }
    if views.is_empty() {
        return Err(invalid("no [views.<name>] tables found"));
    }

    Ok(ViewTable { views, control_program })
}

pub fn load_view_table(path: &Path, base_dir: &Path) -> Result<ViewTable, SettingsError> {
    let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: PathBuf::from(path),
        source,
    })?;
    parse_view_table(&contents, base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[control_program]
repo = "file:///srv/git/controlprogram.git"
branch = "main"

[views.Linac]
repo_csv = "file:///srv/git/linac-csv.git"
folder_csv = "Linac_CSV"
repo_gui = "file:///srv/git/linac-gui.git"
folder_gui = "/abs/Linac_GUIs"
csv_file = "linac.csv"
title = "Linac Control Program"

[views.Booster]
repo_csv = "file:///srv/git/booster-csv.git"
folder_csv = "Booster_CSV"
repo_gui = "file:///srv/git/booster-gui.git"
folder_gui = "Booster_GUIs"
csv_file = "booster.csv"
title = "Booster Control Program"
"#;

    #[test]
    fn views_keep_file_order() {
        let t = parse_view_table(SAMPLE, Path::new("/base")).unwrap();
        assert_eq!(t.names(), vec!["Linac", "Booster"]);
        assert_eq!(t.default_view_name(), Some("Linac"));
    }

    #[test]
    fn folders_resolve_against_base_dir_unless_absolute() {
        let t = parse_view_table(SAMPLE, Path::new("/base")).unwrap();
        let v = t.resolve("Linac").unwrap();
        assert_eq!(v.folder_csv, PathBuf::from("/base/Linac_CSV"));
        assert_eq!(v.folder_gui, PathBuf::from("/abs/Linac_GUIs"));
        assert_eq!(v.csv_file, "linac.csv");
        assert_eq!(v.title, "Linac Control Program");
    }

    #[test]
    fn control_program_keys_override_defaults() {
        let t = parse_view_table(SAMPLE, Path::new("/base")).unwrap();
        let cp = &t.control_program;
        assert_eq!(cp.repo, "file:///srv/git/controlprogram.git");
        assert_eq!(cp.branch, "main");
        // not given, so still the default
        assert_eq!(cp.entry, "ControlProgram.py");
        assert_eq!(cp.interpreter, "python2.7");
        assert_eq!(cp.folder, PathBuf::from("/base/ControlProgram"));
    }

    #[test]
    fn missing_view_key_is_rejected() {
        let doc = r#"
[views.Broken]
repo_csv = "a"
folder_csv = "b"
repo_gui = "c"
folder_gui = "d"
csv_file = "e"
"#;
        match parse_view_table(doc, Path::new("/base")) {
            Err(SettingsError::Invalid(msg)) => assert!(msg.contains("title"), "{}", msg),
            other => panic!("expected invalid settings, got {:?}", other),
        }
    }

    #[test]
    fn non_string_value_is_rejected() {
        let doc = r#"
[control_program]
branch = 3

[views.A]
repo_csv = "a"
folder_csv = "b"
repo_gui = "c"
folder_gui = "d"
csv_file = "e"
title = "f"
"#;
        match parse_view_table(doc, Path::new("/base")) {
            Err(SettingsError::Invalid(msg)) => assert!(msg.contains("branch"), "{}", msg),
            other => panic!("expected invalid settings, got {:?}", other),
        }
    }

    #[test]
    fn no_views_is_rejected() {
        assert!(matches!(
            parse_view_table("[control_program]\nentry = \"x.py\"\n", Path::new("/base")),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            parse_view_table("[views]\n", Path::new("/base")),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        assert!(matches!(
            parse_view_table("[views.A\n", Path::new("/base")),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            load_view_table(&missing, dir.path()),
            Err(SettingsError::Read { .. })
        ));
    }
}
