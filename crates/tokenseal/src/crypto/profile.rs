//! Cipher identifiers and the fixed per-cipher parameter table.

use std::{fmt, str::FromStr};

use crate::error::Error;

/// Byte length of every supported key (256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of the Poly1305 / GHASH authentication tag appended to ciphertext.
pub const TAG_LEN: usize = 16;

/// A supported AEAD construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherId {
    /// AES-256-GCM. Only offered on hardware with AES acceleration.
    Aes256Gcm,
    /// The original ChaCha20-Poly1305 construction with a 64-bit nonce.
    ChaCha20Poly1305,
    /// ChaCha20-Poly1305 as specified in RFC 8439 (96-bit nonce).
    ChaCha20Poly1305Ietf,
    /// XChaCha20-Poly1305 (192-bit nonce).
    XChaCha20Poly1305Ietf,
}

impl CipherId {
    /// Every supported cipher, in table order.
    pub const ALL: [CipherId; 4] = [
        CipherId::Aes256Gcm,
        CipherId::ChaCha20Poly1305,
        CipherId::ChaCha20Poly1305Ietf,
        CipherId::XChaCha20Poly1305Ietf,
    ];

    /// The configuration token for this cipher.
    pub fn as_str(self) -> &'static str {
        match self {
            CipherId::Aes256Gcm => "aes256gcm",
            CipherId::ChaCha20Poly1305 => "chacha20poly1305",
            CipherId::ChaCha20Poly1305Ietf => "chacha20poly1305_ietf",
            CipherId::XChaCha20Poly1305Ietf => "xchacha20poly1305_ietf",
        }
    }

    /// Nonce length in bytes. Hard-coded; never probed from a backend.
    pub fn nonce_len(self) -> usize {
        match self {
            CipherId::Aes256Gcm => 12,
            CipherId::ChaCha20Poly1305 => 8,
            CipherId::ChaCha20Poly1305Ietf => 12,
            CipherId::XChaCha20Poly1305Ietf => 24,
        }
    }
}

impl Default for CipherId {
    /// XChaCha20-Poly1305: the longest nonce, safe to generate at random.
    fn default() -> Self {
        CipherId::XChaCha20Poly1305Ietf
    }
}

impl fmt::Display for CipherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CipherId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::UnsupportedCipher(s.to_owned()))
    }
}

/// Parameters needed to drive one cipher generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherProfile {
    pub id: CipherId,
    pub nonce_len: usize,
    /// Whether this runtime can execute the cipher.
    pub available: bool,
}

impl CipherProfile {
    /// Describe `id`, including whether it is usable here. Never fails.
    pub fn describe(id: CipherId) -> Self {
        Self {
            id,
            nonce_len: id.nonce_len(),
            available: is_available(id),
        }
    }

    /// Look up the profile for `id`, failing if the runtime cannot run it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CipherUnavailable`] when the cipher needs hardware
    /// support this machine does not have.
    pub fn resolve(id: CipherId) -> Result<Self, Error> {
        let profile = Self::describe(id);
        if !profile.available {
            return Err(Error::CipherUnavailable(id));
        }
        Ok(profile)
    }
}

fn is_available(id: CipherId) -> bool {
    match id {
        CipherId::Aes256Gcm => aes_hardware_available(),
        CipherId::ChaCha20Poly1305
        | CipherId::ChaCha20Poly1305Ietf
        | CipherId::XChaCha20Poly1305Ietf => true,
    }
}

/// Runtime probe for AES-GCM hardware support (AES rounds + carry-less multiply).
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub fn aes_hardware_available() -> bool {
    std::arch::is_x86_feature_detected!("aes") && std::arch::is_x86_feature_detected!("pclmulqdq")
}

/// Runtime probe for AES-GCM hardware support (ARMv8 crypto extensions).
#[cfg(target_arch = "aarch64")]
pub fn aes_hardware_available() -> bool {
    std::arch::is_aarch64_feature_detected!("aes") && std::arch::is_aarch64_feature_detected!("pmull")
}

/// No supported hardware probe on this architecture.
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
pub fn aes_hardware_available() -> bool {
    false
}
