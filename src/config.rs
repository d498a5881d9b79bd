//! Configurações do usuário com os padrões de descrição a ignorar.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const CONFIG_FILE_NAMES: [&str; 4] = [
    ".extracts_ignore.yaml",
    ".extracts_ignore.yml",
    ".extracts_ignore.json",
    ".extracts_ignore.toml",
];

/// Conteúdo de um arquivo `.extracts_ignore.{yaml,yml,json,toml}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Globs estilo shell comparados com a descrição limpa.
    pub ignore_descriptions: Vec<String>,
    pub ignore_descriptions_regex: Vec<String>,
}

/// Diretório atual primeiro, depois o diretório home.
pub fn default_config_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = CONFIG_FILE_NAMES.iter().map(PathBuf::from).collect();
    if let Some(home) = dirs::home_dir() {
        candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| home.join(name)));
    }
    candidates
}

/// Vence o primeiro candidato existente e válido; senão, os valores padrão.
pub fn load_user_settings(candidates: &[PathBuf]) -> UserSettings {
    for path in candidates.iter().filter(|path| path.is_file()) {
        match read_settings(path) {
            Ok(settings) => {
                log::debug!("Loaded ignore settings from {}", path.display());
                return settings;
            }
            Err(reason) => {
                log::warn!("Skipping config {}: {reason}", path.display());
            }
        }
    }
    UserSettings::default()
}

fn read_settings(path: &Path) -> Result<UserSettings, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    if content.trim().is_empty() {
        return Ok(UserSettings::default());
    }
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
        "json" => serde_json::from_str(&content).map_err(|e| e.to_string()),
        "toml" => toml::from_str(&content).map_err(|e| e.to_string()),
        other => Err(format!("unsupported config format '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_json_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            ".extracts_ignore.json",
            r#"{"ignore_descriptions": ["SEND E-TFR*"], "ignore_descriptions_regex": ["^ATM"]}"#,
        );

        let settings = load_user_settings(&[path]);
        assert_eq!(settings.ignore_descriptions, vec!["SEND E-TFR*"]);
        assert_eq!(settings.ignore_descriptions_regex, vec!["^ATM"]);
    }

    #[test]
    fn test_load_yaml_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            ".extracts_ignore.yaml",
            "ignore_descriptions:\n  - NETFLIX*\nignore_descriptions_regex:\n  - \"^SENDE-TFR\"\n",
        );

        let settings = load_user_settings(&[path]);
        assert_eq!(settings.ignore_descriptions, vec!["NETFLIX*"]);
        assert_eq!(settings.ignore_descriptions_regex, vec!["^SENDE-TFR"]);
    }

    #[test]
    fn test_load_yml_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), ".extracts_ignore.yml", "ignore_descriptions: [\"SPOTIFY*\"]\n");

        assert_eq!(load_user_settings(&[path]).ignore_descriptions, vec!["SPOTIFY*"]);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write(dir.path(), ".extracts_ignore.yaml", "");
        let later = write(dir.path(), "later.json", r#"{"ignore_descriptions": ["B*"]}"#);

        assert_eq!(load_user_settings(&[empty, later]), UserSettings::default());
    }

    #[test]
    fn test_load_toml_settings_with_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            ".extracts_ignore.toml",
            "ignore_descriptions = [\"NETFLIX*\", \"SPOTIFY*\"]\n",
        );

        let settings = load_user_settings(&[path]);
        assert_eq!(settings.ignore_descriptions, vec!["NETFLIX*", "SPOTIFY*"]);
        assert!(settings.ignore_descriptions_regex.is_empty());
    }

    #[test]
    fn test_invalid_candidate_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let broken = write(dir.path(), "broken.json", "{ not json");
        let unsupported = write(dir.path(), "settings.ini", "ignore_descriptions = []");
        let valid = write(dir.path(), "valid.toml", "ignore_descriptions_regex = [\"FEE$\"]");

        let settings = load_user_settings(&[
            dir.path().join("missing.json"),
            broken,
            unsupported,
            valid,
        ]);
        assert_eq!(settings.ignore_descriptions_regex, vec!["FEE$"]);
    }

    #[test]
    fn test_first_valid_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let first = write(dir.path(), "a.json", r#"{"ignore_descriptions": ["A*"]}"#);
        let second = write(dir.path(), "b.json", r#"{"ignore_descriptions": ["B*"]}"#);

        let settings = load_user_settings(&[first, second]);
        assert_eq!(settings.ignore_descriptions, vec!["A*"]);
    }

    #[test]
    fn test_no_candidates_gives_defaults() {
        assert_eq!(load_user_settings(&[]), UserSettings::default());
    }

    #[test]
    fn test_default_candidates_order() {
        let candidates = default_config_candidates();
        let names: Vec<PathBuf> = CONFIG_FILE_NAMES.iter().map(PathBuf::from).collect();
        assert_eq!(candidates[..4], names[..]);
        assert_eq!(candidates[0], PathBuf::from(".extracts_ignore.yaml"));
        assert_eq!(candidates[2], PathBuf::from(".extracts_ignore.json"));
        assert!(candidates.len() == 4 || candidates.len() == 8);
    }
}
