//! AEAD primitives, the cipher profile table, and the encryption context.
//!
//! This module has no configuration or registry dependencies.
//!
//! # Token format
//!
//! ```text
//! base64(nonce || ciphertext || tag)
//! ```
//!
//! Standard alphabet with padding, empty associated data, tag appended.
//! Nonce lengths per cipher: AES-256-GCM 12, ChaCha20-Poly1305 8,
//! ChaCha20-Poly1305-IETF 12, XChaCha20-Poly1305-IETF 24.

pub mod context;
pub mod legacy;
pub mod profile;

pub use context::EncryptionContext;
pub use profile::{aes_hardware_available, CipherId, CipherProfile, KEY_LEN, TAG_LEN};
