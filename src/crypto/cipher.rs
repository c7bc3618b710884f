//! Field-level authenticated encryption for note titles and bodies.
//!
//! Each call to [`Cipher::encrypt`] seals the text with AES-256-GCM under a
//! fresh random nonce (recorded in tindercrypt's metadata header) and returns
//! the sealed bytes as standard base64, so the result fits a text column and a
//! JSON string. Empty text is stored as an empty string and never reaches the
//! cipher.
//!
//! The AEAD tag covers the nonce and payload but not the rest of the metadata
//! header, so [`Cipher::decrypt`] only accepts a header that is exactly what
//! [`Cipher::encrypt`] would have written for that payload.

use base64::{engine::general_purpose::STANDARD, Engine};
use derive_more::Display;
use tindercrypt::{
    cryptors::RingCryptor,
    metadata::{KeyDerivationAlgorithm, Metadata},
};

use super::Key;
use crate::errors::ServerError;

/// Shown in place of a field that could not be decrypted.
pub const DECRYPTION_FAILED: &str = "[Decryption Error]";

#[derive(Debug)]
pub struct Cipher {
    key: Key,
}

#[derive(Debug, Display)]
pub enum DecryptError {
    #[display(fmt = "ciphertext is not valid base64: {}", _0)]
    Encoding(base64::DecodeError),
    #[display(fmt = "ciphertext could not be opened: {:?}", _0)]
    Cipher(tindercrypt::errors::Error),
    #[display(fmt = "ciphertext header has been altered")]
    Header,
    #[display(fmt = "plaintext is not valid UTF-8: {}", _0)]
    Utf8(std::string::FromUtf8Error),
}

impl Cipher {
    pub fn new(key: Key) -> Self {
        Cipher { key }
    }

    pub fn encrypt(&self, text: &str) -> Result<String, ServerError> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let sealed = RingCryptor::new().seal_with_key(self.key.as_bytes(), text.as_bytes())?;
        Ok(STANDARD.encode(sealed))
    }

    pub fn decrypt(&self, ciphertext: &str) -> Result<String, DecryptError> {
        if ciphertext.is_empty() {
            return Ok(String::new());
        }

        let sealed = STANDARD.decode(ciphertext).map_err(DecryptError::Encoding)?;
        let (meta, header_len) = Metadata::from_buf(&sealed).map_err(DecryptError::Cipher)?;
        let payload = &sealed[header_len..];
        if !is_expected_header(&meta, &sealed[..header_len], payload.len()) {
            return Err(DecryptError::Header);
        }

        let plain = RingCryptor::new()
            .open_with_meta(&meta, self.key.as_bytes(), payload)
            .map_err(DecryptError::Cipher)?;
        String::from_utf8(plain).map_err(DecryptError::Utf8)
    }
}

/// Keyed (no KDF), sized for the payload that follows it, and byte-for-byte
/// the canonical encoding of what it parsed to.
fn is_expected_header(meta: &Metadata, header: &[u8], payload_len: usize) -> bool {
    if meta.key_deriv_algo != KeyDerivationAlgorithm::None || meta.ciphertext_size != payload_len {
        return false;
    }

    let (canonical, canonical_len) = meta.to_buf();
    canonical_len == header.len() && &canonical[..canonical_len] == header
}
