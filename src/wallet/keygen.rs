use alloy_primitives::{hex, Address};
use alloy_signer_local::PrivateKeySigner;

use super::SecretKeyHex;
use crate::error::AppResult;

/// Fresh keypair handed to the lifecycle manager
#[derive(Debug)]
pub struct GeneratedKey {
    pub address: Address,
    pub secret: SecretKeyHex,
}

/// Source of fresh secp256k1 keys. Failure is unrecoverable for the
/// operation that asked.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> AppResult<GeneratedKey>;
}

/// OS-seeded random keys via alloy's local signer
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalKeyGenerator;

impl KeyGenerator for LocalKeyGenerator {
    fn generate(&self) -> AppResult<GeneratedKey> {
        let signer = PrivateKeySigner::random();
        let address = signer.address();
        let secret = SecretKeyHex::new(hex::encode_prefixed(signer.to_bytes()));
        Ok(GeneratedKey { address, secret })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn secret_is_32_bytes_hex() {
        let key = LocalKeyGenerator.generate().unwrap();
        let secret = key.secret.expose();
        assert!(secret.starts_with("0x"));
        assert_eq!(secret.len(), 66);
    }

    #[test]
    fn secret_derives_address() {
        let key = LocalKeyGenerator.generate().unwrap();
        let signer = PrivateKeySigner::from_str(key.secret.expose()).unwrap();
        assert_eq!(signer.address(), key.address);
    }

    #[test]
    fn consecutive_keys_differ() {
        let a = LocalKeyGenerator.generate().unwrap();
        let b = LocalKeyGenerator.generate().unwrap();
        assert_ne!(a.address, b.address);
        assert_ne!(a.secret, b.secret);
    }
}
