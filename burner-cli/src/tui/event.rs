use alloy_primitives::Address;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use usethrow::{Chain, TransactionRecord};

/// Application events
#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Quit,
    // Async operation results. Balance and activity carry the chain and
    // address they were fetched for so stale answers can be dropped.
    BalanceUpdated { chain: Chain, address: Address, balance: String },
    BalanceFailed { chain: Chain, address: Address, message: String },
    ActivityReceived { chain: Chain, address: Address, records: Vec<TransactionRecord> },
    ActivityFailed { chain: Chain, address: Address, message: String },
    FunderConnected { account: Address },
    FundingSent { hash: String },
    FundingConfirmed { chain: Chain, burner: Address, hash: String },
    FundingFailed { message: String },
}

/// Event handler for the TUI
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        // Spawn event handling task
        tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);

            loop {
                let tick_delay = tick_interval.tick();
                let event_delay = reader.next().fuse();

                tokio::select! {
                    _ = tick_delay => {
                        if tx_clone.send(AppEvent::Tick).is_err() {
                            break;
                        }
                    }
                    maybe_event = event_delay => {
                        match maybe_event {
                            Some(Ok(CrosstermEvent::Key(key))) => {
                                if key.kind == event::KeyEventKind::Press
                                    && tx_clone.send(AppEvent::Key(key)).is_err()
                                {
                                    break;
                                }
                            }
                            Some(Err(_)) => {
                                if tx_clone.send(AppEvent::Quit).is_err() {
                                    break;
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
        });

        Self { rx, tx }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Get a sender for dispatching async results back to the event loop
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }
}
