//! The original ChaCha20-Poly1305 AEAD (64-bit nonce, 64-bit block counter).
//!
//! This predates RFC 8439 and differs from it in two ways:
//!
//! - ChaCha20 runs with an 8-byte nonce and an 8-byte counter.
//! - Poly1305 authenticates `aad || le64(aad.len()) || ct || le64(ct.len())`
//!   with no zero padding between the segments.
//!
//! Output is byte-compatible with libsodium's `crypto_aead_chacha20poly1305_*`.

use chacha20::{
    cipher::{KeyIvInit, StreamCipher, StreamCipherSeek},
    ChaCha20Legacy,
};
use chacha20poly1305::aead::{
    consts::{U0, U16, U32, U8},
    AeadCore, AeadInPlace, Error, Key, KeyInit, KeySizeUser, Nonce, Tag,
};
use poly1305::Poly1305;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use super::profile::KEY_LEN;

/// ChaCha20 block size; block 0 keys Poly1305, the message starts at block 1.
const BLOCK_LEN: u64 = 64;

/// Keyed instance of the original ChaCha20-Poly1305 construction.
pub struct ChaCha20Poly1305Legacy {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl KeySizeUser for ChaCha20Poly1305Legacy {
    type KeySize = U32;
}

impl KeyInit for ChaCha20Poly1305Legacy {
    fn new(key: &Key<Self>) -> Self {
        let mut buf = Zeroizing::new([0u8; KEY_LEN]);
        buf.copy_from_slice(key);
        Self { key: buf }
    }
}

impl AeadCore for ChaCha20Poly1305Legacy {
    type NonceSize = U8;
    type TagSize = U16;
    type CiphertextOverhead = U0;
}

impl AeadInPlace for ChaCha20Poly1305Legacy {
    fn encrypt_in_place_detached(
        &self,
        nonce: &Nonce<Self>,
        associated_data: &[u8],
        buffer: &mut [u8],
    ) -> Result<Tag<Self>, Error> {
        let (mut stream, mac_key) = self.keystream(nonce);
        stream.apply_keystream(buffer);
        Ok(authenticate(&mac_key, associated_data, buffer))
    }

    fn decrypt_in_place_detached(
        &self,
        nonce: &Nonce<Self>,
        associated_data: &[u8],
        buffer: &mut [u8],
        tag: &Tag<Self>,
    ) -> Result<(), Error> {
        let (mut stream, mac_key) = self.keystream(nonce);
        let expected = authenticate(&mac_key, associated_data, buffer);
        if !bool::from(expected.as_slice().ct_eq(tag.as_slice())) {
            return Err(Error);
        }
        stream.apply_keystream(buffer);
        Ok(())
    }
}

impl ChaCha20Poly1305Legacy {
    /// Derive the one-time Poly1305 key from block 0 and return the stream
    /// positioned at block 1.
    fn keystream(&self, nonce: &Nonce<Self>) -> (ChaCha20Legacy, Zeroizing<[u8; 32]>) {
        let mut stream = ChaCha20Legacy::new((&*self.key).into(), nonce);
        let mut mac_key = Zeroizing::new([0u8; 32]);
        stream.apply_keystream(&mut mac_key[..]);
        stream.seek(BLOCK_LEN);
        (stream, mac_key)
    }
}

fn authenticate(
    mac_key: &[u8; 32],
    associated_data: &[u8],
    ciphertext: &[u8],
) -> Tag<ChaCha20Poly1305Legacy> {
    let mut msg = Vec::with_capacity(associated_data.len() + ciphertext.len() + 16);
    msg.extend_from_slice(associated_data);
    msg.extend_from_slice(&(associated_data.len() as u64).to_le_bytes());
    msg.extend_from_slice(ciphertext);
    msg.extend_from_slice(&(ciphertext.len() as u64).to_le_bytes());
    let tag = Poly1305::new(mac_key.into()).compute_unpadded(&msg);
    msg.zeroize();
    tag
}
