//! Named encryption instances and their lifecycle.
//!
//! # Lifecycle
//!
//! 1. The registry starts empty. The owning process builds one
//!    [`InstanceRegistry`] at startup and hands clones to its call sites.
//! 2. On the first [`InstanceRegistry::get`] for a name, the group is read from
//!    the [`ConfigSource`](crate::config::ConfigSource) and an
//!    [`EncryptionContext`](crate::crypto::EncryptionContext) is built.
//! 3. The context is cached for the life of the registry. There is no
//!    eviction or teardown.
//!
//! # Security invariants
//!
//! - Key material is never logged. Construction events carry only the group
//!   name and cipher.
//! - A group without a key is always an error; only the cipher has a default.

pub mod store;

pub use store::{InstanceRegistry, DEFAULT_INSTANCE};
