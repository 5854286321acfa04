//! Multi-cipher authenticated encryption of byte strings into transportable
//! tokens, with a registry of named, lazily configured instances.
//!
//! ```no_run
//! # async fn run() -> Result<(), tokenseal::Error> {
//! use tokenseal::{EncryptConfig, InstanceRegistry};
//!
//! let registry = InstanceRegistry::new(EncryptConfig::from_env()?);
//! let ctx = registry.default_instance().await?;
//! let token = ctx.encode("Hello world!")?;
//! assert_eq!(ctx.decode(&token).ok().as_deref(), Some(&b"Hello world!"[..]));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod registry;

pub use config::{ConfigSource, EncryptConfig, GroupConfig};
pub use crypto::{CipherId, CipherProfile, EncryptionContext};
pub use error::{DecodeError, Error, ErrorKind};
pub use registry::{InstanceRegistry, DEFAULT_INSTANCE};
