//! [`EncryptionContext`]: one secret key bound to one cipher, with
//! `encode`/`decode` between byte strings and transportable tokens.
//!
//! A token is `base64(nonce || ciphertext || tag)` using the standard padded
//! alphabet. The associated data is always empty and the cipher is not
//! recorded, so a token only decodes under the context that produced it.

use aes_gcm::Aes256Gcm;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::{
    aead::{self, rand_core::RngCore, Aead, KeyInit, Nonce, OsRng},
    ChaCha20Poly1305, XChaCha20Poly1305,
};
use tracing::debug;

use super::legacy::ChaCha20Poly1305Legacy;
use super::profile::{CipherId, CipherProfile, KEY_LEN};
use crate::error::{DecodeError, DecodeFailure, Error};

/// A keyed AEAD primitive, one variant per [`CipherId`].
///
/// The raw key lives only inside the keyed primitive.
enum Sealer {
    Aes256Gcm(Box<Aes256Gcm>),
    ChaCha20Poly1305(ChaCha20Poly1305Legacy),
    ChaCha20Poly1305Ietf(ChaCha20Poly1305),
    XChaCha20Poly1305Ietf(XChaCha20Poly1305),
}

impl Sealer {
    fn new(id: CipherId, key: &[u8]) -> Result<Self, Error> {
        let invalid = |_| Error::InvalidKeyLength {
            cipher: id,
            expected: KEY_LEN,
            actual: key.len(),
        };
        Ok(match id {
            CipherId::Aes256Gcm => Sealer::Aes256Gcm(Box::new(
                Aes256Gcm::new_from_slice(key).map_err(invalid)?,
            )),
            CipherId::ChaCha20Poly1305 => Sealer::ChaCha20Poly1305(
                ChaCha20Poly1305Legacy::new_from_slice(key).map_err(invalid)?,
            ),
            CipherId::ChaCha20Poly1305Ietf => Sealer::ChaCha20Poly1305Ietf(
                ChaCha20Poly1305::new_from_slice(key).map_err(invalid)?,
            ),
            CipherId::XChaCha20Poly1305Ietf => Sealer::XChaCha20Poly1305Ietf(
                XChaCha20Poly1305::new_from_slice(key).map_err(invalid)?,
            ),
        })
    }

    /// Returns `ciphertext || tag`. `nonce` length is fixed by the profile.
    fn seal(&self, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, aead::Error> {
        match self {
            Sealer::Aes256Gcm(c) => c.encrypt(Nonce::<Aes256Gcm>::from_slice(nonce), plaintext),
            Sealer::ChaCha20Poly1305(c) => {
                c.encrypt(Nonce::<ChaCha20Poly1305Legacy>::from_slice(nonce), plaintext)
            }
            Sealer::ChaCha20Poly1305Ietf(c) => {
                c.encrypt(Nonce::<ChaCha20Poly1305>::from_slice(nonce), plaintext)
            }
            Sealer::XChaCha20Poly1305Ietf(c) => {
                c.encrypt(Nonce::<XChaCha20Poly1305>::from_slice(nonce), plaintext)
            }
        }
    }

    fn open(&self, nonce: &[u8], sealed: &[u8]) -> Result<Vec<u8>, aead::Error> {
        match self {
            Sealer::Aes256Gcm(c) => c.decrypt(Nonce::<Aes256Gcm>::from_slice(nonce), sealed),
            Sealer::ChaCha20Poly1305(c) => {
                c.decrypt(Nonce::<ChaCha20Poly1305Legacy>::from_slice(nonce), sealed)
            }
            Sealer::ChaCha20Poly1305Ietf(c) => {
                c.decrypt(Nonce::<ChaCha20Poly1305>::from_slice(nonce), sealed)
            }
            Sealer::XChaCha20Poly1305Ietf(c) => {
                c.decrypt(Nonce::<XChaCha20Poly1305>::from_slice(nonce), sealed)
            }
        }
    }
}

/// A secret key bound to one resolved cipher profile.
///
/// Immutable after construction; share it behind an `Arc` and call
/// [`encode`](Self::encode) / [`decode`](Self::decode) from any thread.
pub struct EncryptionContext {
    profile: CipherProfile,
    sealer: Sealer,
}

impl EncryptionContext {
    /// Key a context for `cipher`.
    ///
    /// Availability is checked here, not on first use, so a misconfigured
    /// cipher fails at startup.
    ///
    /// # Errors
    ///
    /// - [`Error::BackendUnavailable`] if the OS random source cannot be read.
    /// - [`Error::CipherUnavailable`] if this platform cannot run `cipher`.
    /// - [`Error::InvalidKeyLength`] if the primitive rejects `key`.
    pub fn new(key: impl AsRef<[u8]>, cipher: CipherId) -> Result<Self, Error> {
        probe_entropy()?;
        let profile = CipherProfile::resolve(cipher)?;
        let sealer = Sealer::new(cipher, key.as_ref())?;
        Ok(Self { profile, sealer })
    }

    /// The cipher this context encrypts with.
    pub fn cipher(&self) -> CipherId {
        self.profile.id
    }

    /// Nonce length prefixed to every token, in bytes.
    pub fn nonce_len(&self) -> usize {
        self.profile.nonce_len
    }

    /// Encrypt `plaintext` under a fresh random nonce and return the token.
    ///
    /// Two calls with the same input produce different tokens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`] if the OS random source fails, or
    /// [`Error::Encode`] if the primitive refuses the input (only possible
    /// for messages beyond the cipher's length limit).
    pub fn encode(&self, plaintext: impl AsRef<[u8]>) -> Result<String, Error> {
        let nonce = fresh_nonce(self.profile.nonce_len)?;
        let ciphertext = self
            .sealer
            .seal(&nonce, plaintext.as_ref())
            .map_err(|_| Error::Encode(self.profile.id))?;

        let mut sealed = Vec::with_capacity(nonce.len() + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(sealed))
    }

    /// Recover the plaintext from a token produced by [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] that does not say why decoding failed.
    pub fn decode(&self, token: &str) -> Result<Vec<u8>, DecodeError> {
        self.open(token).map_err(|cause| self.reject(cause))
    }

    /// [`decode`](Self::decode) for tokens that wrap UTF-8 text.
    pub fn decode_utf8(&self, token: &str) -> Result<String, DecodeError> {
        let bytes = self.decode(token)?;
        String::from_utf8(bytes).map_err(|_| self.reject(DecodeFailure::InvalidUtf8))
    }

    fn reject(&self, cause: DecodeFailure) -> DecodeError {
        let err = DecodeError::new(cause);
        debug!(cipher = %self.profile.id, cause = ?err.cause(), "token rejected");
        err
    }

    pub(crate) fn open(&self, token: &str) -> Result<Vec<u8>, DecodeFailure> {
        let data = STANDARD
            .decode(token)
            .map_err(|_| DecodeFailure::InvalidEncoding)?;
        if data.len() < self.profile.nonce_len {
            return Err(DecodeFailure::Truncated);
        }
        let (nonce, sealed) = data.split_at(self.profile.nonce_len);
        self.sealer
            .open(nonce, sealed)
            .map_err(|_| DecodeFailure::AuthenticationFailed)
    }
}

impl std::fmt::Debug for EncryptionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("EncryptionContext")
            .field("cipher", &self.profile.id)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Draw a nonce from the OS CSPRNG. Nonces are never derived or reused.
fn fresh_nonce(len: usize) -> Result<Vec<u8>, Error> {
    let mut nonce = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| Error::BackendUnavailable(e.to_string()))?;
    Ok(nonce)
}

/// Fail fast if the OS CSPRNG is unusable; every encode depends on it.
fn probe_entropy() -> Result<(), Error> {
    fresh_nonce(1).map(drop)
}
