//! Authenticated encryption for request/response payloads
//!
//! Both legs of the upload exchange travel as an AES-256-GCM envelope:
//! a fresh 12-byte nonce followed by ciphertext plus the 128-bit tag.
//! The key is injected at construction time; key provisioning is the
//! caller's concern.

use crate::AppError;
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose, Engine as _};

/// Nonce length for AES-GCM, in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-256-GCM sealer/opener for byte payloads.
#[derive(Clone)]
pub struct EncryptionService {
    cipher: Aes256Gcm,
}

impl EncryptionService {
    /// Create a new encryption service from a raw 32-byte key.
    pub fn from_key_bytes(key_bytes: &[u8]) -> Result<Self, AppError> {
        if key_bytes.len() != 32 {
            return Err(AppError::Config(
                "Encryption key must be 32 bytes (256 bits)".to_string(),
            ));
        }
        let key = Key::<Aes256Gcm>::from_slice(key_bytes);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Create a new encryption service from a base64-encoded 32-byte key.
    pub fn from_base64_key(key_str: &str) -> Result<Self, AppError> {
        let key_bytes = general_purpose::STANDARD
            .decode(key_str)
            .map_err(|e| AppError::Config(format!("Failed to decode encryption key: {}", e)))?;

        Self::from_key_bytes(&key_bytes)
    }

    /// Encrypt a plaintext payload. Returns `nonce || ciphertext+tag`.
    ///
    /// A new random nonce is generated on every call; the same envelope is
    /// never produced twice for the same plaintext.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, AppError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|e| AppError::Encryption(format!("Encryption failed: {}", e)))?;

        let mut envelope = nonce.to_vec();
        envelope.extend_from_slice(&ciphertext);
        Ok(envelope)
    }

    /// Decrypt an envelope produced by [`seal`](Self::seal).
    ///
    /// Fails if the input is shorter than the nonce, or if the
    /// authentication tag does not verify. Never returns partial plaintext.
    pub fn open(&self, envelope: &[u8]) -> Result<Vec<u8>, AppError> {
        if envelope.len() < NONCE_LEN {
            return Err(AppError::Decryption("Encrypted data too short".to_string()));
        }

        let nonce = Nonce::from_slice(&envelope[..NONCE_LEN]);
        let ciphertext = &envelope[NONCE_LEN..];

        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| AppError::Decryption(format!("Decryption failed: {}", e)))
    }

    /// Encrypt and base64-encode, for JSON transport.
    pub fn seal_to_base64(&self, plaintext: &[u8]) -> Result<String, AppError> {
        let envelope = self.seal(plaintext)?;
        Ok(general_purpose::STANDARD.encode(envelope))
    }

    /// Base64-decode and decrypt, for JSON transport.
    pub fn open_from_base64(&self, encoded: &str) -> Result<Vec<u8>, AppError> {
        let envelope = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| AppError::Decryption(format!("Failed to decode encrypted data: {}", e)))?;
        self.open(&envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> EncryptionService {
        let test_key = b"01234567890123456789012345678901";
        EncryptionService::from_key_bytes(test_key).unwrap()
    }

    #[test]
    fn test_seal_open_round_trip() {
        let service = test_service();
        let plaintext = b"{\"image_bytes\":[],\"title\":\"outros\"}";

        let envelope = service.seal(plaintext).unwrap();
        assert_ne!(envelope.as_slice(), plaintext.as_slice());
        assert!(envelope.len() >= NONCE_LEN + plaintext.len() + 16);

        let decrypted = service.open(&envelope).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_round_trip_empty_and_binary() {
        let service = test_service();
        for plaintext in [vec![], vec![0u8], (0..=255u8).collect::<Vec<_>>()] {
            let envelope = service.seal(&plaintext).unwrap();
            assert_eq!(service.open(&envelope).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_nonce_uniqueness() {
        let service = test_service();
        let plaintext = b"same plaintext";

        let a = service.seal(plaintext).unwrap();
        let b = service.seal(plaintext).unwrap();

        assert_ne!(a, b);
        assert_ne!(a[..NONCE_LEN], b[..NONCE_LEN]);
    }

    #[test]
    fn test_tamper_detection() {
        let service = test_service();
        let envelope = service.seal(b"sensitive form data").unwrap();

        // Flip one bit in every byte position past the nonce (ciphertext and tag).
        for i in NONCE_LEN..envelope.len() {
            let mut tampered = envelope.clone();
            tampered[i] ^= 0x01;
            assert!(
                matches!(service.open(&tampered), Err(AppError::Decryption(_))),
                "tampered byte {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_open_rejects_short_input() {
        let service = test_service();
        let result = service.open(&[0u8; NONCE_LEN - 1]);
        assert!(matches!(result, Err(AppError::Decryption(_))));
    }

    #[test]
    fn test_wrong_key_fails() {
        let service = test_service();
        let other = EncryptionService::from_key_bytes(b"10234567890123456789012345678901").unwrap();

        let envelope = service.seal(b"payload").unwrap();
        assert!(other.open(&envelope).is_err());
    }

    #[test]
    fn test_key_must_be_32_bytes() {
        assert!(EncryptionService::from_key_bytes(b"short").is_err());
        assert!(EncryptionService::from_key_bytes(&[0u8; 33]).is_err());
    }

    #[test]
    fn test_base64_helpers_round_trip() {
        let service = test_service();
        let encoded = service.seal_to_base64(b"table data").unwrap();
        let decoded = service.open_from_base64(&encoded).unwrap();
        assert_eq!(decoded, b"table data");

        assert!(matches!(
            service.open_from_base64("not base64!!!"),
            Err(AppError::Decryption(_))
        ));
    }
}
