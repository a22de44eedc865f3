use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{BurnerWallet, Clock, KeyGenerator, LocalKeyGenerator, SystemClock};
use crate::chain::Chain;
use crate::error::{AppError, AppResult};

pub const MIN_EXPIRY_MINUTES: u32 = 2;
pub const MAX_EXPIRY_MINUTES: u32 = 1440;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Result of a liveness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryOutcome {
    /// No wallet, or a wallet without expiry
    Unbounded,
    /// Milliseconds until expiry, always > 0
    Remaining(i64),
    /// The wallet just expired and was cleared by this call
    Expired,
}

/// Owner of the single burner slot and the session's chain selection.
///
/// Single writer: the UI drives every mutation, including the periodic
/// [`tick`](Self::tick). No I/O happens here.
pub struct WalletLifecycle {
    current: Option<BurnerWallet>,
    chain: Chain,
    generator: Box<dyn KeyGenerator>,
    clock: Arc<dyn Clock>,
}

impl Default for WalletLifecycle {
    fn default() -> Self {
        Self::new(Box::new(LocalKeyGenerator), Arc::new(SystemClock))
    }
}

impl WalletLifecycle {
    pub fn new(generator: Box<dyn KeyGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            current: None,
            chain: Chain::default(),
            generator,
            clock,
        }
    }

    pub fn with_chain(mut self, chain: Chain) -> Self {
        self.chain = chain;
        self
    }

    pub fn wallet(&self) -> Option<&BurnerWallet> {
        self.current.as_ref()
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Generate a new burner, replacing any existing one.
    ///
    /// The key is generated before the slot is touched, so a generator
    /// failure leaves the previous wallet in place.
    pub fn create_burner(&mut self, expires_at: Option<i64>) -> AppResult<&BurnerWallet> {
        let key = self.generator.generate()?;
        if self.current.as_ref().is_some_and(|w| w.address() == key.address) {
            return Err(AppError::key_generation(
                "generator returned the previous wallet's key",
            ));
        }

        let now = self.now();
        if let Some(t) = expires_at {
            if t <= now {
                warn!("Burner created with expiry in the past; it will clear on next tick");
            }
        }

        if let Some(old) = self.current.take() {
            debug!("Discarding burner {}", old.address_checksum());
        }
        let wallet = BurnerWallet::new(key, now, expires_at);
        info!(
            "Created burner {} (expires: {})",
            wallet.address_checksum(),
            expires_at.map_or_else(|| "never".to_string(), |t| t.to_string())
        );
        let wallet = self.current.insert(wallet);
        Ok(&*wallet)
    }

    /// Drop the current wallet. No-op when the slot is empty.
    pub fn clear_burner(&mut self) {
        if let Some(old) = self.current.take() {
            info!("Cleared burner {}", old.address_checksum());
        }
    }

    /// Replace the expiry of the current wallet; `None` means never expires.
    /// Ignored when there is no wallet.
    pub fn set_expiry(&mut self, expires_at: Option<i64>) {
        match self.current.as_mut() {
            Some(wallet) => {
                debug!("Expiry for {} set to {:?}", wallet.address_checksum(), expires_at);
                wallet.set_expires_at(expires_at);
            }
            None => debug!("set_expiry ignored: no burner"),
        }
    }

    /// Start the countdown `minutes` from now, clamped to the allowed range
    pub fn start_timer(&mut self, minutes: u32) {
        if self.current.is_none() {
            return;
        }
        let expires_at = expiry_from_minutes(self.now(), minutes);
        self.set_expiry(Some(expires_at));
    }

    pub fn cancel_timer(&mut self) {
        self.set_expiry(None);
    }

    /// Switch networks. Never affects the wallet.
    pub fn set_chain(&mut self, chain: Chain) {
        if chain != self.chain {
            info!("Chain switched {} -> {}", self.chain, chain);
        }
        self.chain = chain;
    }

    /// Periodic liveness check.
    ///
    /// Clears the wallet once `now` reaches its expiry and reports
    /// [`ExpiryOutcome::Expired`] exactly once; later calls see an empty
    /// slot and report [`ExpiryOutcome::Unbounded`].
    pub fn tick(&mut self, now: i64) -> ExpiryOutcome {
        let Some(wallet) = self.current.as_ref() else {
            return ExpiryOutcome::Unbounded;
        };
        let Some(remaining) = wallet.remaining_at(now) else {
            return ExpiryOutcome::Unbounded;
        };
        if wallet.is_expired_at(now) {
            if let Some(old) = self.current.take() {
                info!("Burner {} expired", old.address_checksum());
            }
            ExpiryOutcome::Expired
        } else {
            ExpiryOutcome::Remaining(remaining)
        }
    }
}

/// Clamp a requested duration into [2, 1440] minutes
pub fn clamp_expiry_minutes(minutes: u32) -> u32 {
    minutes.clamp(MIN_EXPIRY_MINUTES, MAX_EXPIRY_MINUTES)
}

/// Absolute expiry for a duration requested at `now`
pub fn expiry_from_minutes(now: i64, minutes: u32) -> i64 {
    now.saturating_add(i64::from(clamp_expiry_minutes(minutes)) * MILLIS_PER_MINUTE)
}

/// Remaining milliseconds rounded up to whole seconds, never negative
pub fn remaining_secs(remaining_ms: i64) -> u64 {
    if remaining_ms <= 0 {
        return 0;
    }
    (remaining_ms as u64).div_ceil(1000)
}

/// `"{h}h {m}m {s}s"` from one hour up, `"{m}m {s}s"` below
pub fn format_countdown(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else {
        format!("{}m {}s", mins, secs)
    }
}
