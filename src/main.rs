use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usethrow::{
    config::AppConfig,
    wallet::{expiry_from_minutes, format_countdown, remaining_secs},
    ExpiryOutcome, WalletLifecycle,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging first
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "usethrow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting usethrow v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::init()?;
    info!("Configuration loaded");

    let mut lifecycle = WalletLifecycle::default().with_chain(config.network.default_chain);

    let expires_at = match config.wallet.default_expiry_minutes {
        0 => None,
        minutes => Some(expiry_from_minutes(lifecycle.now(), minutes)),
    };

    let wallet = lifecycle
        .create_burner(expires_at)
        .map_err(|e| anyhow::anyhow!("Failed to create burner wallet: {}", e))?;
    let address = wallet.address_checksum();
    let chain = lifecycle.chain();
    info!("Burner address: {}", address);
    info!("Network: {} ({})", chain, chain.hex_id());
    info!("Explorer: {}", chain.address_url(&address));
    if expires_at.is_none() {
        warn!("No expiry set; the wallet lives until Ctrl-C");
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(config.wallet.tick_interval_ms));
    let mut last_reported = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match lifecycle.tick(lifecycle.now()) {
                    ExpiryOutcome::Expired => {
                        info!("Burner wallet expired!");
                        break;
                    }
                    ExpiryOutcome::Remaining(ms) => {
                        let secs = remaining_secs(ms);
                        // Log on whole-ten-second boundaries and the final countdown
                        if last_reported != Some(secs) && (secs % 10 == 0 || secs <= 5) {
                            info!("Expires in {}", format_countdown(secs));
                            last_reported = Some(secs);
                        }
                    }
                    ExpiryOutcome::Unbounded => {}
                }
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    error!("Failed to listen for Ctrl-C: {}", e);
                }
                info!("Interrupted, forgetting burner");
                lifecycle.clear_burner();
                break;
            }
        }
    }

    info!("Shut down");
    Ok(())
}
