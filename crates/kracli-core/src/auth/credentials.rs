//! Credential resolution: environment first, then the configuration
//! file. Empty strings count as unset in both places.

use thiserror::Error;

use crate::config::Config;

/// Environment variables checked before the configuration file
const USER_ENV: &str = "KRAUSER";
const PASS_ENV: &str = "KRAPASS";

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Error, Debug)]
pub enum CredentialError {
    /// The `[login]` section or one of its keys is absent.
    #[error("Invalid or missing configuration file: {path}")]
    MissingConfig { path: String },

    /// The keys are present but hold empty values.
    #[error("Credentials missing: use env KRAUSER KRAPASS or {path}")]
    Missing { path: String },
}

/// Resolve credentials: non-empty `KRAUSER`/`KRAPASS` win, otherwise the
/// `[login]` section of the configuration file.
pub fn resolve(config: &Config) -> Result<Credentials, CredentialError> {
    resolve_from(env_var(USER_ENV), env_var(PASS_ENV), config)
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn resolve_from(
    env_user: Option<String>,
    env_pass: Option<String>,
    config: &Config,
) -> Result<Credentials, CredentialError> {
    if let (Some(username), Some(password)) = (env_user, env_pass) {
        return Ok(Credentials { username, password });
    }

    let path = config.path().display().to_string();
    let (Some(username), Some(password)) = (config.username(), config.password()) else {
        return Err(CredentialError::MissingConfig { path });
    };
    if username.is_empty() || password.is_empty() {
        return Err(CredentialError::Missing { path });
    }
    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(contents: &str) -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kracli.cfg");
        std::fs::write(&path, contents).unwrap();
        let config = Config::load(Some(path)).unwrap();
        (dir, config)
    }

    #[test]
    fn env_wins_over_config() {
        let (_dir, config) = config_with("[login]\nusername=filed\npassword=filed\n");
        let creds =
            resolve_from(Some("envuser".into()), Some("envpass".into()), &config).unwrap();
        assert_eq!(creds.username, "envuser");
        assert_eq!(creds.password, "envpass");
    }

    #[test]
    fn partial_env_falls_back_to_config() {
        let (_dir, config) = config_with("[login]\nusername=alice\npassword=hunter2\n");
        let creds = resolve_from(Some("envuser".into()), None, &config).unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn missing_section_names_the_path() {
        let (_dir, config) = config_with("");
        let err = resolve_from(None, None, &config).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid or missing configuration file: "));
        assert!(message.ends_with("kracli.cfg"));
    }

    #[test]
    fn empty_values_are_reported_as_missing_credentials() {
        let (_dir, config) = config_with("[login]\nusername=\npassword=\n");
        let err = resolve_from(None, None, &config).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Credentials missing: use env KRAUSER KRAPASS or "));
    }
}
