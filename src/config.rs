use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://app.asana.com/api/1.0";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Optional on-disk settings. Environment variables take precedence.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub token: Option<String>,
    pub workspace_gid: Option<String>,
    pub team_gid: Option<String>,
    pub portfolio_gid: Option<String>,
    pub base_url: Option<String>,
    pub insecure_tls: Option<bool>,
    pub timeout_secs: Option<u64>,
}

/// A value a flow may demand before it touches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Token,
    Workspace,
    Team,
    Portfolio,
}

impl Setting {
    pub fn env_key(self) -> &'static str {
        match self {
            Setting::Token => "ASANA_TOKEN",
            Setting::Workspace => "ASANA_WORKSPACE_GID",
            Setting::Team => "ASANA_TEAM_GID",
            Setting::Portfolio => "ASANA_PORTFOLIO_GID",
        }
    }
}

/// Process-wide settings, resolved once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    token: Option<String>,
    workspace_gid: Option<String>,
    team_gid: Option<String>,
    portfolio_gid: Option<String>,
    pub base_url: String,
    pub insecure_tls: bool,
    pub timeout: Duration,
}

impl Config {
    /// Merge file settings with an environment lookup. Blank values count as unset.
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let pick = |key: &str, fallback: Option<String>| {
            non_empty(env(key)).or_else(|| non_empty(fallback))
        };

        let insecure_tls = match non_empty(env("ASANA_INSECURE_TLS")) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                Error::Config(format!("ASANA_INSECURE_TLS must be a boolean, got '{raw}'"))
            })?,
            None => file.insecure_tls.unwrap_or(false),
        };

        let timeout_secs = match non_empty(env("ASANA_TIMEOUT_SECS")) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                Error::Config(format!("ASANA_TIMEOUT_SECS must be a whole number, got '{raw}'"))
            })?,
            None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(Error::Config("timeout must be at least one second".into()));
        }

        let base_url = pick("ASANA_BASE_URL", file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            token: pick(Setting::Token.env_key(), file.token),
            workspace_gid: pick(Setting::Workspace.env_key(), file.workspace_gid),
            team_gid: pick(Setting::Team.env_key(), file.team_gid),
            portfolio_gid: pick(Setting::Portfolio.env_key(), file.portfolio_gid),
            base_url,
            insecure_tls,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn get(&self, setting: Setting) -> Option<&str> {
        match setting {
            Setting::Token => self.token.as_deref(),
            Setting::Workspace => self.workspace_gid.as_deref(),
            Setting::Team => self.team_gid.as_deref(),
            Setting::Portfolio => self.portfolio_gid.as_deref(),
        }
    }

    /// Return every requested value, or one error naming all that are missing.
    pub fn require<const N: usize>(&self, settings: [Setting; N]) -> Result<[String; N]> {
        let missing: Vec<&'static str> = settings
            .iter()
            .filter(|s| self.get(**s).is_none())
            .map(|s| s.env_key())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingConfig { missing });
        }
        Ok(settings.map(|s| self.get(s).unwrap_or_default().to_string()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".asana-batch")
        .join("config.toml")
}

/// Read the TOML config file. A missing default file is not an error; a
/// missing file the user named explicitly is.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(p) if !p.exists() => return Err(Error::MissingFile(p.to_path_buf())),
        Some(p) => p.to_path_buf(),
        None => default_config_path(),
    };
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_file() {
        let file = FileConfig {
            token: Some("file-token".into()),
            team_gid: Some("team-from-file".into()),
            ..Default::default()
        };
        let cfg = Config::resolve(file, env_of(&[("ASANA_TOKEN", "env-token")])).unwrap();
        assert_eq!(cfg.get(Setting::Token), Some("env-token"));
        assert_eq!(cfg.get(Setting::Team), Some("team-from-file"));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(!cfg.insecure_tls);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn blank_env_value_counts_as_missing() {
        let cfg = Config::resolve(FileConfig::default(), env_of(&[("ASANA_TOKEN", "  ")])).unwrap();
        assert_eq!(cfg.get(Setting::Token), None);
    }

    #[test]
    fn require_reports_all_missing_keys() {
        let cfg = Config::resolve(
            FileConfig::default(),
            env_of(&[("ASANA_WORKSPACE_GID", "w1")]),
        )
        .unwrap();
        let err = cfg
            .require([Setting::Token, Setting::Workspace, Setting::Team])
            .unwrap_err();
        match err {
            Error::MissingConfig { missing } => {
                assert_eq!(missing, vec!["ASANA_TOKEN", "ASANA_TEAM_GID"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn require_returns_values_in_order() {
        let cfg = Config::resolve(
            FileConfig::default(),
            env_of(&[("ASANA_TOKEN", "t"), ("ASANA_PORTFOLIO_GID", "p")]),
        )
        .unwrap();
        let [portfolio, token] = cfg.require([Setting::Portfolio, Setting::Token]).unwrap();
        assert_eq!(portfolio, "p");
        assert_eq!(token, "t");
    }

    #[test]
    fn insecure_tls_and_timeout_from_env() {
        let cfg = Config::resolve(
            FileConfig::default(),
            env_of(&[
                ("ASANA_INSECURE_TLS", "true"),
                ("ASANA_TIMEOUT_SECS", "5"),
                ("ASANA_BASE_URL", "http://localhost:9000/api/1.0/"),
            ]),
        )
        .unwrap();
        assert!(cfg.insecure_tls);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.base_url, "http://localhost:9000/api/1.0");
    }

    #[test]
    fn rejects_malformed_values() {
        let bad_bool =
            Config::resolve(FileConfig::default(), env_of(&[("ASANA_INSECURE_TLS", "maybe")]));
        assert!(matches!(bad_bool, Err(Error::Config(_))));

        let zero = Config::resolve(FileConfig::default(), env_of(&[("ASANA_TIMEOUT_SECS", "0")]));
        assert!(matches!(zero, Err(Error::Config(_))));
    }

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "token = \"abc\"\nworkspace_gid = \"42\"\ninsecure_tls = true\n",
        )
        .unwrap();

        let file = load_file_config(Some(&path)).unwrap();
        assert_eq!(file.token.as_deref(), Some("abc"));
        assert_eq!(file.workspace_gid.as_deref(), Some("42"));
        assert_eq!(file.insecure_tls, Some(true));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_file_config(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(Error::MissingFile(_))));
    }
}
