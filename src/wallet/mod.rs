//! Ephemeral burner wallet: the record, its key source and its lifecycle.
//!
//! Key material lives only in process memory and is zeroized when the
//! wallet that owns it is dropped.

pub mod clock;
pub mod keygen;
pub mod lifecycle;

use alloy_primitives::Address;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub use clock::{Clock, ManualClock, SystemClock};
pub use keygen::{GeneratedKey, KeyGenerator, LocalKeyGenerator};
pub use lifecycle::{
    clamp_expiry_minutes, expiry_from_minutes, format_countdown, remaining_secs, ExpiryOutcome,
    WalletLifecycle, MAX_EXPIRY_MINUTES, MIN_EXPIRY_MINUTES,
};

/// Hex-encoded private key. Redacted in `Debug`, wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKeyHex(String);

impl SecretKeyHex {
    pub fn new(hex: String) -> Self {
        Self(hex)
    }

    /// Borrow the raw secret. Callers must not log it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKeyHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKeyHex(<redacted>)")
    }
}

impl PartialEq for SecretKeyHex {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

/// The single live burner. Not `Clone`: one secret per wallet object.
#[derive(Debug)]
pub struct BurnerWallet {
    address: Address,
    secret: SecretKeyHex,
    created_at: i64,
    expires_at: Option<i64>,
    active: bool,
}

impl BurnerWallet {
    pub(crate) fn new(key: GeneratedKey, created_at: i64, expires_at: Option<i64>) -> Self {
        Self {
            address: key.address,
            secret: key.secret,
            created_at,
            expires_at,
            active: true,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// EIP-55 checksummed address
    pub fn address_checksum(&self) -> String {
        self.address.to_checksum(None)
    }

    pub fn private_key(&self) -> &SecretKeyHex {
        &self.secret
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_expires_at(&mut self, expires_at: Option<i64>) {
        self.expires_at = expires_at;
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.remaining_at(now).is_some_and(|ms| ms <= 0)
    }

    /// Milliseconds left before expiry, `None` when unbounded
    pub fn remaining_at(&self, now: i64) -> Option<i64> {
        self.expires_at.map(|t| t.saturating_sub(now))
    }
}
