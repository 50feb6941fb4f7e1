//! Secret sealing for credentials at rest.
//!
//! Sealed blob format (v1):
//! - magic: `LMNSECR1` (8 bytes)
//! - nonce: 24 bytes (XChaCha20-Poly1305)
//! - ciphertext: AEAD output (ciphertext + tag)
//!
//! The sealing key is derived once from a built-in application secret, so
//! confidentiality rests on that secret staying out of casual reach. This
//! protects stored passwords from file-browsing, not from an attacker who
//! has the binary. The nonce is random per record, so identical passwords
//! never produce identical blobs.
//!
//! Records written by the pre-v1 fixed-IV cipher carry no magic prefix and
//! surface as [`CryptoError::Malformed`]; the credential store treats those
//! as corrupt and clears them.

use std::sync::OnceLock;

use argon2::Argon2;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::Rng;
use thiserror::Error;
use zeroize::Zeroize;

/// Blob magic (8 bytes)
const MAGIC: &[u8; 8] = b"LMNSECR1";

/// Nonce length for XChaCha20-Poly1305
const NONCE_LEN: usize = 24;

/// Sealing key length (256-bit)
const KEY_LEN: usize = 32;

/// Built-in application secret the sealing key is derived from
const APP_SECRET: &[u8] = b"lumen-launcher credential sealing secret v1";

/// Fixed KDF salt. The salt only needs to be distinct per application here;
/// per-record randomness comes from the nonce.
const KDF_SALT: &[u8] = b"lumen-launcher/secure";

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("sealed blob is malformed")]
    Malformed,

    #[error("encryption failed")]
    Encrypt,

    #[error("decryption failed - wrong key or corrupt data")]
    Decrypt,
}

static SEALING_KEY: OnceLock<[u8; KEY_LEN]> = OnceLock::new();

fn sealing_key() -> &'static [u8; KEY_LEN] {
    SEALING_KEY.get_or_init(|| {
        let mut key = [0u8; KEY_LEN];
        // Static parameters, cannot fail at runtime
        Argon2::default()
            .hash_password_into(APP_SECRET, KDF_SALT, &mut key)
            .expect("static KDF parameters");
        key
    })
}

/// Seal a plaintext secret into an opaque blob.
///
/// Empty input is a defined no-op: `seal("")` returns an empty blob, which
/// [`open`] maps back to an empty string.
pub fn seal(plaintext: &str) -> Result<Vec<u8>, CryptoError> {
    if plaintext.is_empty() {
        return Ok(Vec::new());
    }

    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill(&mut nonce);

    let cipher = XChaCha20Poly1305::new(sealing_key().into());
    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|_| CryptoError::Encrypt)?;

    let mut blob = Vec::with_capacity(MAGIC.len() + NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(MAGIC);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Open a sealed blob back into the plaintext secret.
///
/// An empty blob opens to an empty string. Anything else must carry the v1
/// magic prefix and authenticate under the sealing key; tampered, truncated,
/// or legacy-format blobs are reported as errors, never as wrong plaintext.
pub fn open(blob: &[u8]) -> Result<String, CryptoError> {
    if blob.is_empty() {
        return Ok(String::new());
    }

    if blob.len() <= MAGIC.len() + NONCE_LEN || !blob.starts_with(MAGIC) {
        return Err(CryptoError::Malformed);
    }

    let nonce = &blob[MAGIC.len()..MAGIC.len() + NONCE_LEN];
    let ciphertext = &blob[MAGIC.len() + NONCE_LEN..];

    let cipher = XChaCha20Poly1305::new(sealing_key().into());
    let plaintext = cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Decrypt)?;

    match String::from_utf8(plaintext) {
        Ok(secret) => Ok(secret),
        Err(err) => {
            let mut bytes = err.into_bytes();
            bytes.zeroize();
            Err(CryptoError::Malformed)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_roundtrip() {
        for password in ["P@ss1!", "a", "пароль", "a much longer passphrase with spaces"] {
            let blob = seal(password).unwrap();
            assert_eq!(open(&blob).unwrap(), password);
        }
    }

    #[test]
    fn test_empty_input_law() {
        assert_eq!(seal("").unwrap(), Vec::<u8>::new());
        assert_eq!(open(&[]).unwrap(), "");
    }

    #[test]
    fn test_nonce_varies_per_seal() {
        let first = seal("same password").unwrap();
        let second = seal("same password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_tampered_blob_fails() {
        let mut blob = seal("secret").unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert!(matches!(open(&blob), Err(CryptoError::Decrypt)));
    }

    #[test]
    fn test_truncated_blob_fails() {
        let blob = seal("secret").unwrap();
        assert!(matches!(
            open(&blob[..MAGIC.len() + 4]),
            Err(CryptoError::Malformed)
        ));
    }

    #[test]
    fn test_missing_magic_is_malformed() {
        // Simulates a record written by the legacy fixed-IV cipher
        let blob = vec![0x42u8; 64];
        assert!(matches!(open(&blob), Err(CryptoError::Malformed)));
    }
}
