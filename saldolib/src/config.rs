//! Настройки: значения по умолчанию → `saldo.toml` в каталоге данных → переменные `SALDO_*`.

use crate::error::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "saldo.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Export filename offered when the user gives none.
    #[serde(default = "default_export_file")]
    pub export_file: String,
    /// Filename offered before clearing the ledger.
    #[serde(default = "default_backup_file")]
    pub backup_file: String,
    #[serde(default = "default_preview_len")]
    pub preview_len: usize,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("saldo"))
        .unwrap_or_else(|| PathBuf::from(".saldo"))
}

fn default_export_file() -> String {
    "mis-datos.json".to_string()
}

fn default_backup_file() -> String {
    "respaldo-datos.json".to_string()
}

fn default_preview_len() -> usize {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: default_data_dir(),
            export_file: default_export_file(),
            backup_file: default_backup_file(),
            preview_len: default_preview_len(),
        }
    }
}

impl Settings {
    /// `data_dir` overrides everything else, including the environment.
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        let dir = match data_dir {
            Some(d) => d.to_path_buf(),
            None => std::env::var_os("SALDO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
        };

        let mut builder = Config::builder()
            .set_default("data_dir", dir.to_string_lossy().into_owned())?
            .add_source(File::from(dir.join(CONFIG_FILE)).required(false))
            .add_source(Environment::with_prefix("SALDO").try_parsing(true));
        if let Some(d) = data_dir {
            builder = builder.set_override("data_dir", d.to_string_lossy().into_owned())?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Blank or whitespace-only names fall back to `default`.
    pub fn resolve_filename(input: Option<&str>, default: &str) -> String {
        match input.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => default.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filename_falls_back() {
        assert_eq!(Settings::resolve_filename(None, "d.json"), "d.json");
        assert_eq!(Settings::resolve_filename(Some("  "), "d.json"), "d.json");
        assert_eq!(Settings::resolve_filename(Some(" x.json "), "d.json"), "x.json");
    }

    #[test]
    fn file_in_data_dir_is_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "preview_len = 5\nexport_file = \"libro.json\"\n",
        )
        .unwrap();

        let s = Settings::load(Some(dir.path())).unwrap();
        assert_eq!(s.data_dir, dir.path());
        assert_eq!(s.preview_len, 5);
        assert_eq!(s.export_file, "libro.json");
        assert_eq!(s.backup_file, "respaldo-datos.json");
    }
}
