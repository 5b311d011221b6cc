use crate::error::Error;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Prefix certbot puts in front of every key of a plugin's credentials file.
pub const KEY_PREFIX: &str = "dns_bonk_";

pub trait CredentialManager: Send + Sync {
    fn get(&self, key: &str) -> Result<String, Error>;
}

/// What cleanup does once a challenge is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupAction {
    /// Delete the whole TXT record.
    Record,
    /// Remove only the validation value from the record.
    Value,
}

impl FromStr for CleanupAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "record" => Ok(CleanupAction::Record),
            "value" => Ok(CleanupAction::Value),
            other => Err(Error::Credential(format!(
                "cleanup_action must be 'record' or 'value', got '{other}'"
            ))),
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub group: String,
    pub cleanup_action: CleanupAction,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("group", &self.group)
            .field("cleanup_action", &self.cleanup_action)
            .finish()
    }
}

impl Credentials {
    pub fn load(manager: &dyn CredentialManager) -> Result<Self, Error> {
        let required = |key: &str| -> Result<String, Error> {
            let value = manager.get(key)?;
            if value.trim().is_empty() {
                return Err(Error::Credential(format!(
                    "Missing property in credentials configuration file: {KEY_PREFIX}{key}"
                )));
            }
            Ok(value)
        };

        Ok(Credentials {
            endpoint: required("endpoint")?.trim_end_matches('/').to_string(),
            username: required("username")?,
            password: required("password")?,
            group: required("group")?,
            cleanup_action: required("cleanup_action")?.parse()?,
        })
    }
}

/// Credentials from a certbot-style INI file.
///
/// Keys may be written with or without the `dns_bonk_` prefix; when both
/// appear the prefixed one is used.
#[cfg_attr(test, derive(Debug))]
pub struct FileCredentialManager {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileCredentialManager {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::Credential(format!("Unable to read {}: {e}", path.display()))
        })?;
        warn_if_exposed(&path);
        debug!(path = %path.display(), "Loaded credentials file");
        Ok(Self {
            values: parse(&content),
            path,
        })
    }
}

impl CredentialManager for FileCredentialManager {
    fn get(&self, key: &str) -> Result<String, Error> {
        self.values
            .get(&format!("{KEY_PREFIX}{key}"))
            .or_else(|| self.values.get(key))
            .cloned()
            .ok_or_else(|| {
                Error::Credential(format!(
                    "Missing property in credentials configuration file {}: {KEY_PREFIX}{key}",
                    self.path.display()
                ))
            })
    }
}

fn parse(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter(|line| !line.starts_with('['))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), unquote(value.trim()).to_string()))
        .collect()
}

fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(q) && value.ends_with(q) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(unix)]
fn warn_if_exposed(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(meta) = std::fs::metadata(path) {
        let mode = meta.permissions().mode();
        if mode & 0o077 != 0 {
            warn!(
                path = %path.display(),
                mode = format!("{:o}", mode & 0o777),
                "Unsafe permissions on credentials configuration file"
            );
        }
    }
}

#[cfg(not(unix))]
fn warn_if_exposed(_path: &Path) {}
