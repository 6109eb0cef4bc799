//! Response envelope protocol.
//!
//! API payloads arrive as base64 text encrypted with AES-ECB. The key is the
//! lowercase hex MD5 digest of `timestamp ‖ APP_SECRET`; its 32 ASCII bytes
//! key AES-256. Plaintext is right-padded with [`PAD_SENTINEL`] bytes.

mod error;

pub use error::{DecodeStage, EnvelopeDecodeError, EnvelopeUnavailableError};

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes256;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use md5::{Digest, Md5};

/// Fixed application secret mixed into every envelope key.
pub const APP_SECRET: &str = "18comicAPPContent";

/// Trailing pad byte stripped from decrypted plaintext.
pub const PAD_SENTINEL: u8 = 0x0c;

const BLOCK_SIZE: usize = 16;

/// Derives the envelope key for a server-supplied timestamp.
pub fn derive_key(timestamp: &str) -> [u8; 32] {
    let digest = Md5::digest(format!("{}{}", timestamp, APP_SECRET).as_bytes());
    let hex_digest = hex::encode(digest);
    let mut key = [0u8; 32];
    key.copy_from_slice(hex_digest.as_bytes());
    key
}

/// Decodes an envelope into UTF-8 plaintext.
///
/// There is no partial decode: any failing stage yields an error.
pub fn decode(ciphertext_b64: &str, timestamp: &str) -> Result<String, EnvelopeDecodeError> {
    let mut data = STANDARD
        .decode(ciphertext_b64.trim())
        .map_err(|e| EnvelopeDecodeError::new(DecodeStage::Base64, e))?;

    if data.len() % BLOCK_SIZE != 0 {
        return Err(EnvelopeDecodeError::new(
            DecodeStage::BlockAlignment,
            format!("{} bytes is not a multiple of {}", data.len(), BLOCK_SIZE),
        ));
    }

    let key = derive_key(timestamp);
    let cipher = Aes256::new_from_slice(&key)
        .map_err(|e| EnvelopeDecodeError::new(DecodeStage::Decrypt, e))?;
    for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
        cipher.decrypt_block(GenericArray::from_mut_slice(chunk));
    }

    let end = data
        .iter()
        .rposition(|&b| b != PAD_SENTINEL)
        .map_or(0, |pos| pos + 1);
    data.truncate(end);

    String::from_utf8(data).map_err(|e| EnvelopeDecodeError::new(DecodeStage::Utf8, e))
}

/// Encrypts `plaintext` into an envelope; the inverse of [`decode`].
///
/// Used by fixtures and mock servers.
pub fn seal(plaintext: &str, timestamp: &str) -> String {
    let mut data = plaintext.as_bytes().to_vec();
    let pad = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    if pad != BLOCK_SIZE || data.is_empty() {
        data.resize(data.len() + pad, PAD_SENTINEL);
    }

    let key = derive_key(timestamp);
    let cipher = Aes256::new(GenericArray::from_slice(&key));
    for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
        cipher.encrypt_block(GenericArray::from_mut_slice(chunk));
    }

    STANDARD.encode(data)
}
