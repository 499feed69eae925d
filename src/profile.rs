//! Profile persistence.
//!
//! Exactly one profile — the "default" — is persisted at a time, as
//! `{"default": {"url": ..., "token": ..., "container": ...}}`. The store
//! location is configured as a string with a `$HOME` placeholder; the
//! shipped default is `$HOME/.webtask/config.json`, the same file the
//! hosting service's own CLI writes.
//!
//! The store offers two read paths with deliberately different contracts:
//! [`ProfileStore::try_load`] is a "do we have something usable" probe that
//! swallows every failure mode into absence, while [`ProfileStore::load`]
//! is the strict accessor used once a session is assumed to exist and
//! fails with a distinct, remedy-naming [`ConfigError`] per mode.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default profile location, matching the hosting service's CLI.
pub const DEFAULT_CONFIG_PATH: &str = "$HOME/.webtask/config.json";

/// The persisted credential bundle identifying the user's remote account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Base URL of the hosting service deployment.
    pub url: String,
    /// Bearer token authorizing API calls.
    pub token: String,
    /// Account namespace under which webtasks live.
    pub container: String,
}

/// On-disk shape of the config file.
#[derive(Debug, Serialize, Deserialize)]
struct ProfileFile {
    default: Profile,
}

/// File-backed store for the single default profile.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Build a store from a configured location string.
    ///
    /// A `$HOME` placeholder is substituted with the real home directory.
    /// An empty location is a configuration error in its own right — the
    /// absence check here is explicit, not inferred from a failed read.
    pub fn from_location(location: &str) -> Result<Self, ConfigError> {
        if location.trim().is_empty() {
            return Err(ConfigError::MissingPath);
        }

        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let expanded = location.replace("$HOME", &home.to_string_lossy());
        Ok(Self {
            path: PathBuf::from(expanded),
        })
    }

    /// Build a store over an explicit path (tests, `--config` overrides).
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The resolved on-disk location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff the location currently holds a readable record.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Probe for a usable profile.
    ///
    /// Returns `None` for every failure mode — missing file, unreadable
    /// file, malformed JSON, missing `default` entry. Never errors.
    pub fn try_load(&self) -> Option<Profile> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let file: ProfileFile = serde_json::from_str(&content).ok()?;
        Some(file.default)
    }

    /// Load the default profile, failing with a distinct error per mode.
    pub fn load(&self) -> Result<Profile, ConfigError> {
        if !self.path.exists() {
            return Err(ConfigError::MissingProfile {
                path: self.path.clone(),
            });
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Unreadable {
                path: self.path.clone(),
                source,
            })?;

        // Distinguish "not JSON" from "JSON without a default profile" so
        // the user message can name the right remedy.
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|source| ConfigError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        match value.get("default") {
            Some(default) => serde_json::from_value(default.clone()).map_err(|source| {
                ConfigError::Malformed {
                    path: self.path.clone(),
                    source,
                }
            }),
            None => Err(ConfigError::MissingDefault {
                path: self.path.clone(),
            }),
        }
    }

    /// Persist `profile` as the new default, replacing any prior content.
    ///
    /// The file is written to a sibling temp path and renamed into place so
    /// a failed write never leaves a truncated record behind.
    pub fn save(&self, profile: &Profile) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let file = ProfileFile {
            default: profile.clone(),
        };
        let content = serde_json::to_string_pretty(&file).map_err(|source| {
            ConfigError::Write {
                path: self.path.clone(),
                source: std::io::Error::other(source),
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(write_err)?;

        tracing::debug!(path = %self.path.display(), "saved default profile");
        Ok(())
    }
}
