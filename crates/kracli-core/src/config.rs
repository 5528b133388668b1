//! The `~/.kracli.cfg` configuration file.
//!
//! INI format with a `[login]` section holding credentials and a
//! `[session]` section holding the persisted session:
//!
//! ```ini
//! [login]
//! username=YOUR_USERNAME
//! password=YOUR_PASSWORD
//!
//! [session]
//! id=...
//! created=2026-08-24T10:00:00+00:00
//! ```
//!
//! A missing file parses as an empty configuration; saving a session
//! preserves whatever `[login]` section is already there.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ini::Ini;
use thiserror::Error;

/// Config file name under the home directory
const CONFIG_FILE: &str = ".kracli.cfg";

const LOGIN_SECTION: &str = "login";
const SESSION_SECTION: &str = "session";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Invalid configuration file {path}: {source}")]
    Parse {
        path: String,
        source: ini::ParseError,
    },

    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write configuration file {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Clone)]
pub struct Config {
    path: PathBuf,
    ini: Ini,
}

impl Config {
    /// Load from an explicit path or the default `~/.kracli.cfg`.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        let ini = if path.exists() {
            Ini::load_from_file(&path).map_err(|err| match err {
                ini::Error::Io(source) => ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                },
                ini::Error::Parse(source) => ConfigError::Parse {
                    path: path.display().to_string(),
                    source,
                },
            })?
        } else {
            Ini::new()
        };
        Ok(Self { path, ini })
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(CONFIG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn username(&self) -> Option<&str> {
        self.ini
            .section(Some(LOGIN_SECTION))
            .and_then(|section| section.get("username"))
    }

    pub fn password(&self) -> Option<&str> {
        self.ini
            .section(Some(LOGIN_SECTION))
            .and_then(|section| section.get("password"))
    }

    pub fn session_id(&self) -> Option<String> {
        self.ini
            .section(Some(SESSION_SECTION))
            .and_then(|section| section.get("id"))
            .map(str::to_owned)
    }

    /// When the stored session was issued. Informational bookkeeping: a
    /// session entry without it (hand-edited files) is still honored.
    pub fn session_created(&self) -> Option<DateTime<Utc>> {
        let raw = self.ini.section(Some(SESSION_SECTION))?.get("created")?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|stamp| stamp.with_timezone(&Utc))
    }

    /// Record a fresh session id plus its `created` stamp.
    pub fn set_session(&mut self, id: &str) {
        self.ini
            .with_section(Some(SESSION_SECTION))
            .set("id", id)
            .set("created", Utc::now().to_rfc3339());
    }

    pub fn clear_session(&mut self) {
        self.ini.delete(Some(SESSION_SECTION));
    }

    /// Write the whole file back to where it was loaded from.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.ini
            .write_to_file(&self.path)
            .map_err(|source| ConfigError::Write {
                path: self.path.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("kracli.cfg");
        std::fs::write(&path, contents).expect("write test config");
        path
    }

    #[test]
    fn parses_login_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[login]\nusername=alice\npassword=hunter2\n");

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.username(), Some("alice"));
        assert_eq!(config.password(), Some("hunter2"));
        assert_eq!(config.session_id(), None);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("absent.cfg"))).unwrap();
        assert_eq!(config.username(), None);
        assert_eq!(config.session_id(), None);
    }

    #[test]
    fn session_roundtrip_preserves_login() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[login]\nusername=alice\npassword=hunter2\n");

        let mut config = Config::load(Some(path.clone())).unwrap();
        config.set_session("sess-123");
        config.save().unwrap();

        let reloaded = Config::load(Some(path)).unwrap();
        assert_eq!(reloaded.session_id().as_deref(), Some("sess-123"));
        assert!(reloaded.session_created().is_some());
        assert_eq!(reloaded.username(), Some("alice"));
        assert_eq!(reloaded.password(), Some("hunter2"));
    }

    #[test]
    fn clear_session_drops_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[session]\nid=old\n");

        let mut config = Config::load(Some(path.clone())).unwrap();
        assert_eq!(config.session_id().as_deref(), Some("old"));
        config.clear_session();
        config.save().unwrap();

        let reloaded = Config::load(Some(path)).unwrap();
        assert_eq!(reloaded.session_id(), None);
    }

    #[test]
    fn session_without_created_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[session]\nid=hand-edited\n");

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.session_id().as_deref(), Some("hand-edited"));
        assert_eq!(config.session_created(), None);
    }
}
