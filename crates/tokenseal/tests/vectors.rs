//! Tokens produced by libsodium's AEAD functions must decode unchanged.

use tokenseal::{crypto::aes_hardware_available, CipherId, EncryptionContext};

const VECTOR_KEY: &str = "fcc38cb7a2c056ef7bf7193855b099ef";

fn decodes_to_hello_world(cipher: CipherId, token: &str) {
    let ctx = EncryptionContext::new(VECTOR_KEY, cipher).unwrap();
    assert_ne!(token, "Hello world!");
    assert!(!token.contains(' '));
    assert_eq!(ctx.decode_utf8(token).unwrap(), "Hello world!");
}

#[test]
fn chacha20poly1305_ietf_vector() {
    decodes_to_hello_world(
        CipherId::ChaCha20Poly1305Ietf,
        "cpdWeUSAG/g9oTfDWQXdsHHFqykMzWgE/Ix5+/7239rGb+cSHgU/nQ==",
    );
}

#[test]
fn chacha20poly1305_legacy_vector() {
    decodes_to_hello_world(
        CipherId::ChaCha20Poly1305,
        "7HmXW1STilPOFDeTFbphJqUQm4+W1xiW4kKqR2kyDIW0E1Iv",
    );
}

/// libsodium `crypto_aead_chacha20poly1305_encrypt` output under
/// [`VECTOR_KEY`] with nonce `a0..a7` and plaintext `i % 251` for each length.
/// The longer messages cross the 64-byte keystream block boundary.
const LEGACY_BLOCK_VECTORS: [(usize, &str); 5] = [
    (0, "oKGio6SlpqdOfAJJxNzaWHjogzlL26Ip"),
    (
        63,
        "oKGio6Slpqc9wo9ltoHdoMujLakYripaWIByZ6AeYAuA9GYCgdQmgh629fT2efH6cDVNeOD8aBicu/puMgYBXq2ZTL5MOtSavB88hP4zJE5M0KWdqwRB",
    ),
    (
        64,
        "oKGio6Slpqc9wo9ltoHdoMujLakYripaWIByZ6AeYAuA9GYCgdQmgh629fT2efH6cDVNeOD8aBicu/puMgYBXq2ZTL5MOtSbb/x0UORqJI7f2iPBp2qB+Q==",
    ),
    (
        65,
        "oKGio6Slpqc9wo9ltoHdoMujLakYripaWIByZ6AeYAuA9GYCgdQmgh629fT2efH6cDVNeOD8aBicu/puMgYBXq2ZTL5MOtSbm6IDgE5gFeSJ1oH65xZOAIA=",
    ),
    (
        200,
        "oKGio6Slpqc9wo9ltoHdoMujLakYripaWIByZ6AeYAuA9GYCgdQmgh629fT2efH6cDVNeOD8aBicu/puMgYBXq2ZTL5MOtSbmyZezZTuzi75IyrqaE22Pko689ILpCPUAXuwRx7G6LVw43KSMStTgRtWSlQ54qzN5Oq5jYmQ8p5LO/z6dkA/QJUaqQXRitLdnxVXAl9mhojNWcX2RQzulXSkfcDM852wUneZpr5CBt65G9BRQzGvvy7rVDSSoBy4DyDY6POV4bGXnuB9IeIzNgbXu32uDBueW7YNmI5ciks=",
    ),
];

fn counting_plaintext(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn chacha20poly1305_legacy_vectors_across_blocks() {
    let ctx = EncryptionContext::new(VECTOR_KEY, CipherId::ChaCha20Poly1305).unwrap();
    for (len, token) in LEGACY_BLOCK_VECTORS {
        assert_eq!(ctx.decode(token).unwrap(), counting_plaintext(len), "length {len}");
    }
}

#[test]
fn chacha20poly1305_legacy_encrypts_like_libsodium() {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use chacha20poly1305::aead::{Aead, KeyInit, Nonce};
    use tokenseal::crypto::legacy::ChaCha20Poly1305Legacy;

    let cipher = ChaCha20Poly1305Legacy::new_from_slice(VECTOR_KEY.as_bytes()).unwrap();
    for (len, token) in LEGACY_BLOCK_VECTORS {
        let expected = STANDARD.decode(token).unwrap();
        let (nonce, sealed) = expected.split_at(8);
        let ours = cipher
            .encrypt(
                Nonce::<ChaCha20Poly1305Legacy>::from_slice(nonce),
                counting_plaintext(len).as_slice(),
            )
            .unwrap();
        assert_eq!(ours, sealed, "length {len}");
    }
}

#[test]
fn xchacha20poly1305_ietf_vector() {
    decodes_to_hello_world(
        CipherId::XChaCha20Poly1305Ietf,
        "SkMPXIyLEPrKVFEQcSR7r4UB11aUHJOrQuE/kGoi28tRdgM+zDucKoq3IXPfPFcxMnhCQg==",
    );
}

#[test]
fn aes256gcm_vector() {
    if !aes_hardware_available() {
        // AES-GCM is only offered with hardware support.
        assert!(EncryptionContext::new(VECTOR_KEY, CipherId::Aes256Gcm).is_err());
        return;
    }
    decodes_to_hello_world(
        CipherId::Aes256Gcm,
        "DgOAWd9CJsHnluErdW+vkMgajGqtIkphYQc77gc+02tEytoYsqeVCQ==",
    );
}

#[test]
fn vector_fails_under_a_different_cipher() {
    let ctx = EncryptionContext::new(VECTOR_KEY, CipherId::XChaCha20Poly1305Ietf).unwrap();
    assert!(ctx
        .decode("cpdWeUSAG/g9oTfDWQXdsHHFqykMzWgE/Ix5+/7239rGb+cSHgU/nQ==")
        .is_err());
}

#[test]
fn xchacha_scenario() {
    let ctx = EncryptionContext::new(
        "raeh1Quoobei5zohviDoovoh7sae2ais",
        CipherId::XChaCha20Poly1305Ietf,
    )
    .unwrap();

    let first = ctx.encode("Hello world!").unwrap();
    let second = ctx.encode("Hello world!").unwrap();

    assert!(first.len() > "Hello world!".len());
    assert!(first
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')));
    assert_ne!(first, second);
    assert_eq!(ctx.decode_utf8(&first).unwrap(), "Hello world!");
    assert_eq!(ctx.decode_utf8(&second).unwrap(), "Hello world!");
}
