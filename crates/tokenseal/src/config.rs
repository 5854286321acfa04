//! Named encryption configuration groups.
//!
//! Groups are layered from an optional TOML file and environment variables:
//!
//! ```toml
//! [default]
//! key = "raeh1Quoobei5zohviDoovoh7sae2ais"
//! cipher = "xchacha20poly1305_ietf"
//! ```
//!
//! `TOKENSEAL__DEFAULT__KEY` / `TOKENSEAL__DEFAULT__CIPHER` override the file.

use std::{collections::HashMap, fmt, path::Path};

use async_trait::async_trait;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::error::Error;

/// Environment variable prefix for group settings.
pub const ENV_PREFIX: &str = "TOKENSEAL";

/// Separator between prefix, group name, and field in environment keys.
pub const ENV_SEPARATOR: &str = "__";

/// Secret key string from configuration, zeroed on drop.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct KeyString(Zeroizing<String>);

impl KeyString {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Zeroizing::new(key.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for KeyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material.
        f.write_str("KeyString([REDACTED])")
    }
}

/// One configuration group: a key and an optional cipher token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupConfig {
    /// Secret key. **Required**; resolution fails without it.
    #[serde(default)]
    pub key: Option<KeyString>,

    /// Cipher token; XChaCha20-Poly1305-IETF when absent.
    #[serde(default)]
    pub cipher: Option<String>,
}

impl GroupConfig {
    pub fn new(key: impl Into<String>, cipher: Option<&str>) -> Self {
        Self {
            key: Some(KeyString::new(key)),
            cipher: cipher.map(str::to_owned),
        }
    }
}

/// Supplies configuration groups by name.
///
/// The registry calls this at most once per successfully constructed group.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Fetch the group called `name`, or `None` if it does not exist.
    async fn group(&self, name: &str) -> Result<Option<GroupConfig>, Error>;
}

/// All configuration groups, loaded once.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct EncryptConfig {
    groups: HashMap<String, GroupConfig>,
}

impl EncryptConfig {
    /// Load groups from `path` (if given) overlaid with `TOKENSEAL__*` variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file is missing or unreadable, or if
    /// a group does not match the expected shape.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        Self::build(path, None)
    }

    /// Load groups from `TOKENSEAL__*` environment variables only.
    pub fn from_env() -> Result<Self, Error> {
        Self::build(None, None)
    }

    /// `env` replaces the process environment when given; used by tests.
    fn build(path: Option<&Path>, env: Option<config::Map<String, String>>) -> Result<Self, Error> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
        }
        let cfg = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .source(env),
            )
            .build()?;

        Ok(cfg.try_deserialize()?)
    }

    /// Insert or replace a group.
    pub fn insert(&mut self, name: impl Into<String>, group: GroupConfig) {
        self.groups.insert(name.into(), group);
    }

    /// Configured group names, sorted.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl ConfigSource for EncryptConfig {
    async fn group(&self, name: &str) -> Result<Option<GroupConfig>, Error> {
        Ok(self.groups.get(name).cloned())
    }
}
