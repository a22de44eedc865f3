use alloy_primitives::Address;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use usethrow::{
    config::FundingConfig,
    parse_amount,
    wallet::{clamp_expiry_minutes, MAX_EXPIRY_MINUTES, MIN_EXPIRY_MINUTES},
    ActivityOracle, AppConfig, AppError, AppResult, BalanceOracle, Chain, EtherscanClient,
    ExpiryOutcome, Funder, FundingWallet, JsonRpcFundingWallet, RpcBalanceOracle,
    TransactionRecord, WalletLifecycle,
};
use zeroize::Zeroizing;

use crate::tui::event::AppEvent;
use crate::tui::input::InputMode;
use crate::tui::widgets::{Popup, PopupType, Spinner};

const BALANCE_ERROR: &str = "Could not fetch balance. Try again.";
const ACTIVITY_ERROR: &str = "Could not fetch transactions.";

/// Screen variants for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Screen {
    #[default]
    Wallet,
    Activity,
    /// Private key export; only reachable with a live burner
    Export,
}

/// Remote collaborators, behind traits so tests can swap them
#[derive(Clone)]
pub struct Services {
    pub balance: Arc<dyn BalanceOracle>,
    pub activity: Arc<dyn ActivityOracle>,
    pub funding_wallet: Arc<dyn FundingWallet>,
}

impl Services {
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let timeout = Duration::from_secs(config.network.timeout_secs);
        Ok(Self {
            balance: Arc::new(RpcBalanceOracle::new(config.network.clone())),
            activity: Arc::new(EtherscanClient::new(config.explorer.clone(), timeout)?),
            funding_wallet: Arc::new(JsonRpcFundingWallet::from_config(&config.funding, timeout)?),
        })
    }
}

/// Main application state
pub struct App {
    pub current_screen: Screen,
    pub input_mode: InputMode,
    pub should_quit: bool,
    pub tx: Option<mpsc::UnboundedSender<AppEvent>>,

    pub lifecycle: WalletLifecycle,

    // Screen states
    pub wallet_state: WalletState,
    pub activity_state: ActivityState,
    pub funding_state: FundingState,

    // Shared state
    pub popup: Option<Popup>,
    pub spinner: Spinner,
    pub status_message: Option<(String, bool)>, // (message, is_error)

    services: Services,
    funding_config: FundingConfig,
}

// --- Per-screen state ---

pub struct WalletState {
    pub balance: Option<String>,
    pub balance_error: Option<String>,
    pub loading: bool,
    pub show_private_key: bool,
    /// Duration the next `t` applies
    pub expiry_minutes: u32,
    /// Last value reported by the lifecycle tick
    pub remaining_ms: Option<i64>,
}

#[derive(Default)]
pub struct ActivityState {
    /// `None` until loaded for the current wallet and chain
    pub records: Option<Vec<TransactionRecord>>,
    pub error: Option<String>,
    pub loading: bool,
    pub selected_index: usize,
}

pub struct FundingState {
    pub account: Option<Address>,
    pub amount: String,
    pub editing_amount: String,
    pub connecting: bool,
    pub in_progress: bool,
    pub last_hash: Option<String>,
}

impl App {
    pub fn new(config: &AppConfig, chain: Chain) -> AppResult<Self> {
        let services = Services::from_config(config)?;
        let lifecycle = WalletLifecycle::default().with_chain(chain);
        Ok(Self::with_services(config, lifecycle, services))
    }

    pub fn with_services(config: &AppConfig, lifecycle: WalletLifecycle, services: Services) -> Self {
        Self {
            current_screen: Screen::Wallet,
            input_mode: InputMode::Normal,
            should_quit: false,
            tx: None,

            lifecycle,

            wallet_state: WalletState {
                balance: None,
                balance_error: None,
                loading: false,
                show_private_key: false,
                expiry_minutes: clamp_expiry_minutes(config.wallet.default_expiry_minutes),
                remaining_ms: None,
            },
            activity_state: ActivityState::default(),
            funding_state: FundingState {
                account: None,
                amount: config.funding.default_amount.clone(),
                editing_amount: String::new(),
                connecting: false,
                in_progress: false,
                last_hash: None,
            },

            popup: None,
            spinner: Spinner::new("Loading...".to_string()),
            status_message: None,

            services,
            funding_config: config.funding.clone(),
        }
    }

    pub fn set_sender(&mut self, tx: mpsc::UnboundedSender<AppEvent>) {
        self.tx = Some(tx);
    }

    /// Address of the live burner, if any
    pub fn burner_address(&self) -> Option<Address> {
        self.lifecycle.wallet().map(|w| w.address())
    }

    /// Handle application events
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Quit => {
                self.should_quit = true;
                false
            }
            AppEvent::Key(key) => {
                // Ctrl-C always quits
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    self.should_quit = true;
                    return false;
                }
                // Popups dismiss on any key
                if self.popup.is_some() {
                    self.popup = None;
                    return true;
                }
                self.handle_key(key);
                !self.should_quit
            }
            AppEvent::Tick => {
                self.spinner.tick();
                self.check_expiry();
                true
            }
            // Async results
            AppEvent::BalanceUpdated { chain, address, balance } => {
                if self.is_current(chain, address) {
                    self.wallet_state.balance = Some(balance);
                    self.wallet_state.balance_error = None;
                    self.wallet_state.loading = false;
                    self.stop_spinner_if_idle();
                }
                true
            }
            AppEvent::BalanceFailed { chain, address, message } => {
                if self.is_current(chain, address) {
                    self.wallet_state.balance_error = Some(message);
                    self.wallet_state.loading = false;
                    self.stop_spinner_if_idle();
                }
                true
            }
            AppEvent::ActivityReceived { chain, address, records } => {
                if self.is_current(chain, address) {
                    self.activity_state.records = Some(records);
                    self.activity_state.error = None;
                    self.activity_state.selected_index = 0;
                    self.activity_state.loading = false;
                    self.stop_spinner_if_idle();
                }
                true
            }
            AppEvent::ActivityFailed { chain, address, message } => {
                if self.is_current(chain, address) {
                    self.activity_state.error = Some(message);
                    self.activity_state.loading = false;
                    self.stop_spinner_if_idle();
                }
                true
            }
            AppEvent::FunderConnected { account } => {
                self.funding_state.account = Some(account);
                self.funding_state.connecting = false;
                self.stop_spinner_if_idle();
                self.status_message = Some((format!("Funding wallet connected: {}", account), false));
                true
            }
            AppEvent::FundingSent { hash } => {
                self.funding_state.last_hash = Some(hash.clone());
                self.spinner.start("Waiting for confirmation...");
                self.popup = Some(Popup::new(
                    PopupType::Info,
                    "Transaction sent",
                    format!("Hash: {}", hash),
                ));
                true
            }
            AppEvent::FundingConfirmed { chain, burner, hash } => {
                self.funding_state.in_progress = false;
                self.stop_spinner_if_idle();
                self.popup = Some(
                    Popup::new(
                        PopupType::Info,
                        "Transaction confirmed",
                        "Burner wallet funded successfully.",
                    )
                    .with_details(vec![chain.tx_url(&hash)]),
                );
                if self.is_current(chain, burner) {
                    self.refresh_balance();
                }
                true
            }
            AppEvent::FundingFailed { message } => {
                self.funding_state.connecting = false;
                self.funding_state.in_progress = false;
                self.stop_spinner_if_idle();
                self.popup = Some(Popup::new(PopupType::Error, "Funding failed", message));
                true
            }
        }
    }

    /// Stop the spinner unless another request is still outstanding
    fn stop_spinner_if_idle(&mut self) {
        let busy = self.wallet_state.loading
            || self.activity_state.loading
            || self.funding_state.connecting
            || self.funding_state.in_progress;
        if !busy {
            self.spinner.stop();
        }
    }

    /// Whether a result fetched for (`chain`, `address`) still applies
    fn is_current(&self, chain: Chain, address: Address) -> bool {
        self.lifecycle.chain() == chain && self.burner_address() == Some(address)
    }

    fn check_expiry(&mut self) {
        let now = self.lifecycle.now();
        match self.lifecycle.tick(now) {
            ExpiryOutcome::Expired => {
                self.wallet_state.remaining_ms = None;
                self.forget_wallet_views();
                self.popup = Some(Popup::new(
                    PopupType::Expired,
                    "Expired",
                    "Burner wallet expired!",
                ));
            }
            ExpiryOutcome::Remaining(ms) => self.wallet_state.remaining_ms = Some(ms),
            ExpiryOutcome::Unbounded => self.wallet_state.remaining_ms = None,
        }
    }

    /// Drop everything displayed about the previous wallet or chain
    fn clear_fetched(&mut self) {
        self.wallet_state.balance = None;
        self.wallet_state.balance_error = None;
        self.wallet_state.loading = false;
        self.activity_state = ActivityState::default();
        self.stop_spinner_if_idle();
    }

    fn forget_wallet_views(&mut self) {
        self.clear_fetched();
        self.wallet_state.show_private_key = false;
        if self.current_screen == Screen::Export {
            self.current_screen = Screen::Wallet;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Insert => self.handle_insert_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.current_screen = Screen::Wallet,
            KeyCode::Char('2') => self.current_screen = Screen::Activity,
            KeyCode::Esc if self.current_screen == Screen::Export => {
                self.current_screen = Screen::Wallet;
            }
            KeyCode::Char('n') => self.create_burner(),
            KeyCode::Char('x') => self.forget_burner(),
            KeyCode::Char('c') => self.cycle_chain(),
            KeyCode::Char('b') => self.refresh_balance(),
            KeyCode::Char('a') => {
                self.current_screen = Screen::Activity;
                self.refresh_activity();
            }
            KeyCode::Char('y') => self.copy_address(),
            KeyCode::Char('e') => self.open_export(),
            KeyCode::Char('p') if self.current_screen == Screen::Export => self.copy_private_key(),
            KeyCode::Char('s') => {
                self.wallet_state.show_private_key = !self.wallet_state.show_private_key;
            }
            KeyCode::Char('t') => self.start_timer(),
            KeyCode::Char('T') => self.cancel_timer(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_expiry(1),
            KeyCode::Char('-') => self.adjust_expiry(-1),
            KeyCode::Char('>') => self.adjust_expiry(60),
            KeyCode::Char('<') => self.adjust_expiry(-60),
            KeyCode::Char('m') => self.connect_funder(),
            KeyCode::Char('d') => self.disconnect_funder(),
            KeyCode::Char('f') => self.start_amount_edit(),
            KeyCode::Up | KeyCode::Char('k') if self.current_screen == Screen::Activity => {
                self.activity_state.selected_index = self.activity_state.selected_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') if self.current_screen == Screen::Activity => {
                let len = self.activity_state.records.as_ref().map_or(0, Vec::len);
                if self.activity_state.selected_index + 1 < len {
                    self.activity_state.selected_index += 1;
                }
            }
            _ => {}
        }
    }

    fn handle_insert_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.funding_state.editing_amount.clear();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                self.funding_state.editing_amount.push(c);
            }
            KeyCode::Backspace => {
                self.funding_state.editing_amount.pop();
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let amount = std::mem::take(&mut self.funding_state.editing_amount);
                self.fund_burner(amount);
            }
            _ => {}
        }
    }

    // --- Lifecycle actions ---

    fn create_burner(&mut self) {
        let replaced = self.lifecycle.wallet().is_some();
        match self.lifecycle.create_burner(None) {
            Ok(wallet) => {
                let address = wallet.address_checksum();
                self.forget_wallet_views();
                self.wallet_state.remaining_ms = None;
                let verb = if replaced { "Replaced burner" } else { "Burner created" };
                self.status_message = Some((format!("{}: {}", verb, address), false));
            }
            Err(e) => {
                warn!("Burner creation failed: {}", e);
                self.status_message = Some((e.user_message(), true));
            }
        }
    }

    fn forget_burner(&mut self) {
        if self.lifecycle.wallet().is_none() {
            self.status_message = Some(("No burner to forget".to_string(), true));
            return;
        }
        self.lifecycle.clear_burner();
        self.wallet_state.remaining_ms = None;
        self.forget_wallet_views();
        self.status_message = Some(("Burner forgotten".to_string(), false));
    }

    fn cycle_chain(&mut self) {
        let next = self.lifecycle.chain().next();
        self.lifecycle.set_chain(next);
        self.clear_fetched();
        self.status_message = Some((format!("Network: {}", next.name()), false));
    }

    fn start_timer(&mut self) {
        if self.lifecycle.wallet().is_none() {
            self.status_message = Some(("Create a burner first (n)".to_string(), true));
            return;
        }
        self.lifecycle.start_timer(self.wallet_state.expiry_minutes);
        self.check_expiry();
        self.status_message = Some((
            format!("Timer started: {}", format_minutes(self.wallet_state.expiry_minutes)),
            false,
        ));
    }

    fn cancel_timer(&mut self) {
        if self.lifecycle.wallet().and_then(|w| w.expires_at()).is_none() {
            return;
        }
        self.lifecycle.cancel_timer();
        self.wallet_state.remaining_ms = None;
        self.status_message = Some(("Timer cancelled".to_string(), false));
    }

    fn adjust_expiry(&mut self, delta: i64) {
        let current = i64::from(self.wallet_state.expiry_minutes);
        let next = (current + delta).clamp(i64::from(MIN_EXPIRY_MINUTES), i64::from(MAX_EXPIRY_MINUTES));
        self.wallet_state.expiry_minutes = clamp_expiry_minutes(next as u32);
    }

    fn open_export(&mut self) {
        if self.lifecycle.wallet().is_none() {
            self.status_message = Some(("Create a burner first (n)".to_string(), true));
            return;
        }
        self.current_screen = Screen::Export;
    }

    // --- Clipboard ---

    fn copy_address(&mut self) {
        let Some(address) = self.lifecycle.wallet().map(|w| w.address_checksum()) else {
            self.status_message = Some(("No burner to copy".to_string(), true));
            return;
        };
        self.copy_to_clipboard(&address, "Address copied");
    }

    fn copy_private_key(&mut self) {
        let Some(secret) = self
            .lifecycle
            .wallet()
            .map(|w| Zeroizing::new(w.private_key().expose().to_string()))
        else {
            return;
        };
        self.copy_to_clipboard(
            &secret,
            "Private key copied! Import it into your wallet to make this wallet permanent.",
        );
    }

    fn copy_to_clipboard(&mut self, text: &str, success: &str) {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(text) {
                Ok(_) => {
                    self.status_message = Some((success.to_string(), false));
                }
                Err(e) => {
                    self.status_message = Some((format!("Clipboard write failed: {}", e), true));
                }
            },
            Err(e) => {
                self.status_message = Some((format!("Clipboard unavailable: {}", e), true));
            }
        }
    }

    // --- Async action dispatchers ---

    fn refresh_balance(&mut self) {
        let Some(address) = self.burner_address() else {
            self.status_message = Some(("Create a burner first (n)".to_string(), true));
            return;
        };
        if let Some(tx) = &self.tx {
            self.wallet_state.loading = true;
            self.wallet_state.balance_error = None;
            self.spinner.start("Fetching balance...");
            let tx = tx.clone();
            let oracle = self.services.balance.clone();
            let chain = self.lifecycle.chain();
            tokio::spawn(async move {
                let event = match oracle.balance(chain, address).await {
                    Ok(balance) => AppEvent::BalanceUpdated { chain, address, balance },
                    Err(e) => {
                        warn!("Balance fetch failed: {}", e);
                        AppEvent::BalanceFailed {
                            chain,
                            address,
                            message: BALANCE_ERROR.to_string(),
                        }
                    }
                };
                let _ = tx.send(event);
            });
        }
    }

    fn refresh_activity(&mut self) {
        let Some(address) = self.burner_address() else {
            self.status_message = Some(("Create a burner first (n)".to_string(), true));
            return;
        };
        if let Some(tx) = &self.tx {
            self.activity_state.loading = true;
            self.activity_state.error = None;
            self.spinner.start("Fetching transactions...");
            let tx = tx.clone();
            let oracle = self.services.activity.clone();
            let chain = self.lifecycle.chain();
            tokio::spawn(async move {
                let event = match oracle.recent(chain, address).await {
                    Ok(records) => AppEvent::ActivityReceived { chain, address, records },
                    Err(e) => AppEvent::ActivityFailed {
                        chain,
                        address,
                        message: activity_error_message(&e),
                    },
                };
                let _ = tx.send(event);
            });
        }
    }

    fn connect_funder(&mut self) {
        if self.funding_state.connecting {
            return;
        }
        if let Some(tx) = &self.tx {
            self.funding_state.connecting = true;
            self.spinner.start("Connecting funding wallet...");
            let tx = tx.clone();
            let funder = Funder::new(self.services.funding_wallet.clone(), &self.funding_config);
            let chain = self.lifecycle.chain();
            tokio::spawn(async move {
                let event = match funder.connect(chain).await {
                    Ok(account) => AppEvent::FunderConnected { account },
                    Err(e) => {
                        warn!("Funding wallet connection failed: {}", e);
                        AppEvent::FundingFailed {
                            message: connect_error_message(&e),
                        }
                    }
                };
                let _ = tx.send(event);
            });
        }
    }

    fn disconnect_funder(&mut self) {
        if self.funding_state.account.take().is_some() {
            self.status_message = Some(("Funding wallet disconnected".to_string(), false));
        }
    }

    fn start_amount_edit(&mut self) {
        if self.funding_state.in_progress {
            self.status_message = Some(("Funding already in progress".to_string(), true));
            return;
        }
        if self.lifecycle.wallet().is_none() || self.funding_state.account.is_none() {
            self.status_message = Some((
                "Connect a funding wallet (m) and create a burner (n) first".to_string(),
                true,
            ));
            return;
        }
        self.funding_state.editing_amount = self.funding_state.amount.clone();
        self.input_mode = InputMode::Insert;
    }

    fn fund_burner(&mut self, amount: String) {
        let (Some(burner), Some(from)) = (self.burner_address(), self.funding_state.account) else {
            self.status_message = Some((
                "Connect a funding wallet (m) and create a burner (n) first".to_string(),
                true,
            ));
            return;
        };
        if let Err(e) = parse_amount(&amount) {
            self.status_message = Some((e.user_message(), true));
            return;
        }
        self.funding_state.amount = amount.trim().to_string();

        if let Some(tx) = &self.tx {
            self.funding_state.in_progress = true;
            self.spinner.start("Waiting for wallet approval...");
            let tx = tx.clone();
            let funder = Funder::new(self.services.funding_wallet.clone(), &self.funding_config);
            let chain = self.lifecycle.chain();
            let amount = self.funding_state.amount.clone();
            debug!("Funding {} with {} ETH on {}", burner, amount, chain);
            tokio::spawn(async move {
                let sent_tx = tx.clone();
                let result = funder
                    .fund(chain, from, burner, &amount, move |hash| {
                        let _ = sent_tx.send(AppEvent::FundingSent {
                            hash: hash.to_string(),
                        });
                    })
                    .await;
                let event = match result {
                    Ok(hash) => AppEvent::FundingConfirmed { chain, burner, hash },
                    Err(e) => {
                        warn!("Funding failed: {}", e);
                        AppEvent::FundingFailed {
                            message: fund_error_message(&e),
                        }
                    }
                };
                let _ = tx.send(event);
            });
        }
    }
}

/// Explorer failures: configuration problems keep their guidance, the rest are generic
fn activity_error_message(err: &AppError) -> String {
    match err {
        AppError::MissingApiKey => err.user_message(),
        _ => ACTIVITY_ERROR.to_string(),
    }
}

fn connect_error_message(err: &AppError) -> String {
    match err {
        AppError::NetworkNotAdded(_) | AppError::NoAccounts => err.user_message(),
        _ => format!("Failed to connect funding wallet: {}", err),
    }
}

fn fund_error_message(err: &AppError) -> String {
    match err {
        AppError::InsufficientFunds | AppError::NetworkNotAdded(_) | AppError::InvalidAmount(_) => {
            err.user_message()
        }
        _ => format!("Failed to fund wallet: {}", err),
    }
}

/// `"45m"` below an hour, `"2h 5m"` from there
pub fn format_minutes(minutes: u32) -> String {
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use async_trait::async_trait;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use usethrow::wallet::{LocalKeyGenerator, ManualClock};

    const T0: i64 = 1_700_000_000_000;

    /// Remote services that must never be reached from these tests
    struct Offline;

    #[async_trait]
    impl BalanceOracle for Offline {
        async fn balance(&self, _chain: Chain, _address: Address) -> AppResult<String> {
            Err(AppError::internal("offline"))
        }
    }

    #[async_trait]
    impl ActivityOracle for Offline {
        async fn recent(&self, _chain: Chain, _address: Address) -> AppResult<Vec<TransactionRecord>> {
            Err(AppError::internal("offline"))
        }
    }

    #[async_trait]
    impl FundingWallet for Offline {
        async fn request_accounts(&self) -> AppResult<Vec<Address>> {
            Err(AppError::internal("offline"))
        }
        async fn chain_id(&self) -> AppResult<u64> {
            Err(AppError::internal("offline"))
        }
        async fn switch_network(&self, _chain: Chain) -> AppResult<()> {
            Err(AppError::internal("offline"))
        }
        async fn send_transaction(&self, _f: Address, _t: Address, _v: U256) -> AppResult<String> {
            Err(AppError::internal("offline"))
        }
        async fn transaction_status(&self, _hash: &str) -> AppResult<Option<bool>> {
            Err(AppError::internal("offline"))
        }
    }

    fn new_app() -> (App, ManualClock) {
        let clock = ManualClock::new(T0);
        let lifecycle = WalletLifecycle::new(Box::new(LocalKeyGenerator), Arc::new(clock.clone()));
        let services = Services {
            balance: Arc::new(Offline),
            activity: Arc::new(Offline),
            funding_wallet: Arc::new(Offline),
        };
        let app = App::with_services(&AppConfig::default(), lifecycle, services);
        (app, clock)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_event(AppEvent::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }))
    }

    fn key(app: &mut App, c: char) -> bool {
        press(app, KeyCode::Char(c))
    }

    #[test]
    fn create_and_forget() {
        let (mut app, _) = new_app();
        key(&mut app, 'n');
        let first = app.burner_address().unwrap();
        key(&mut app, 'n');
        assert_ne!(app.burner_address().unwrap(), first);

        key(&mut app, 'x');
        assert!(app.burner_address().is_none());
    }

    #[test]
    fn quit_keys() {
        let (mut app, _) = new_app();
        assert!(!key(&mut app, 'q'));
        let (mut app, _) = new_app();
        let ctrl_c = AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.handle_event(ctrl_c));
    }

    #[test]
    fn chain_change_clears_fetched_data_but_keeps_wallet() {
        let (mut app, _) = new_app();
        key(&mut app, 'n');
        let address = app.burner_address().unwrap();
        app.handle_event(AppEvent::BalanceUpdated {
            chain: Chain::Mainnet,
            address,
            balance: "1.5".to_string(),
        });
        assert_eq!(app.wallet_state.balance.as_deref(), Some("1.5"));

        key(&mut app, 'c');
        assert_eq!(app.lifecycle.chain(), Chain::Sepolia);
        assert!(app.wallet_state.balance.is_none());
        assert_eq!(app.burner_address(), Some(address));
    }

    #[test]
    fn stale_results_are_dropped() {
        let (mut app, _) = new_app();
        key(&mut app, 'n');
        let address = app.burner_address().unwrap();
        app.handle_event(AppEvent::BalanceUpdated {
            chain: Chain::Holesky,
            address,
            balance: "9.0".to_string(),
        });
        assert!(app.wallet_state.balance.is_none());

        app.handle_event(AppEvent::ActivityReceived {
            chain: Chain::Mainnet,
            address: Address::ZERO,
            records: Vec::new(),
        });
        assert!(app.activity_state.records.is_none());
    }

    #[test]
    fn balance_failure_keeps_wallet() {
        let (mut app, _) = new_app();
        key(&mut app, 'n');
        let address = app.burner_address().unwrap();
        app.handle_event(AppEvent::BalanceFailed {
            chain: Chain::Mainnet,
            address,
            message: BALANCE_ERROR.to_string(),
        });
        assert_eq!(app.wallet_state.balance_error.as_deref(), Some(BALANCE_ERROR));
        assert_eq!(app.burner_address(), Some(address));
    }

    #[test]
    fn balance_reply_keeps_funding_spinner() {
        let (mut app, _) = new_app();
        key(&mut app, 'n');
        let address = app.burner_address().unwrap();
        app.funding_state.in_progress = true;
        app.wallet_state.loading = true;
        app.spinner.start("Waiting for confirmation...");

        app.handle_event(AppEvent::BalanceUpdated {
            chain: Chain::Mainnet,
            address,
            balance: "0.5".to_string(),
        });
        assert!(app.spinner.spinning);
        assert_eq!(app.wallet_state.balance.as_deref(), Some("0.5"));

        app.handle_event(AppEvent::FundingFailed {
            message: "rejected".to_string(),
        });
        assert!(!app.spinner.spinning);
    }

    #[test]
    fn timer_expiry_shows_popup_and_clears() {
        let (mut app, clock) = new_app();
        key(&mut app, 'n');
        let address = app.burner_address().unwrap();
        app.handle_event(AppEvent::BalanceUpdated {
            chain: Chain::Mainnet,
            address,
            balance: "0.01".to_string(),
        });

        key(&mut app, 't');
        assert_eq!(app.wallet_state.remaining_ms, Some(120_000));

        clock.advance(119_000);
        app.handle_event(AppEvent::Tick);
        assert_eq!(app.wallet_state.remaining_ms, Some(1_000));
        assert!(app.popup.is_none());

        clock.advance(1_000);
        app.handle_event(AppEvent::Tick);
        assert!(app.burner_address().is_none());
        assert!(app.wallet_state.balance.is_none());
        let popup = app.popup.as_ref().unwrap();
        assert_eq!(popup.popup_type, PopupType::Expired);
        assert_eq!(popup.content, "Burner wallet expired!");

        // Any key dismisses; nothing else happens
        key(&mut app, 'n');
        assert!(app.popup.is_none());
        assert!(app.burner_address().is_none());
    }

    #[test]
    fn cancel_timer_keeps_wallet_alive() {
        let (mut app, clock) = new_app();
        key(&mut app, 'n');
        key(&mut app, 't');
        key(&mut app, 'T');
        clock.advance(10 * 60_000);
        app.handle_event(AppEvent::Tick);
        assert!(app.burner_address().is_some());
        assert!(app.popup.is_none());
    }

    #[test]
    fn expiry_minutes_are_clamped() {
        let (mut app, _) = new_app();
        assert_eq!(app.wallet_state.expiry_minutes, 2);
        key(&mut app, '-');
        assert_eq!(app.wallet_state.expiry_minutes, 2);
        key(&mut app, '+');
        assert_eq!(app.wallet_state.expiry_minutes, 3);
        for _ in 0..30 {
            key(&mut app, '>');
        }
        assert_eq!(app.wallet_state.expiry_minutes, 1440);
    }

    #[test]
    fn export_requires_wallet_and_closes_on_forget() {
        let (mut app, _) = new_app();
        key(&mut app, 'e');
        assert_eq!(app.current_screen, Screen::Wallet);

        key(&mut app, 'n');
        key(&mut app, 'e');
        assert_eq!(app.current_screen, Screen::Export);
        key(&mut app, 's');
        assert!(app.wallet_state.show_private_key);

        key(&mut app, 'x');
        assert_eq!(app.current_screen, Screen::Wallet);
        assert!(!app.wallet_state.show_private_key);
    }

    #[test]
    fn funding_needs_connection() {
        let (mut app, _) = new_app();
        key(&mut app, 'n');
        key(&mut app, 'f');
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.status_message.as_ref().unwrap().1);
    }

    #[test]
    fn amount_editing_validates() {
        let (mut app, _) = new_app();
        key(&mut app, 'n');
        app.handle_event(AppEvent::FunderConnected {
            account: Address::repeat_byte(0xaa),
        });
        key(&mut app, 'f');
        assert_eq!(app.input_mode, InputMode::Insert);
        assert_eq!(app.funding_state.editing_amount, "0.01");

        for _ in 0..4 {
            press(&mut app, KeyCode::Backspace);
        }
        key(&mut app, '0');
        key(&mut app, 'z');
        assert_eq!(app.funding_state.editing_amount, "0");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.funding_state.in_progress);
        let (message, is_error) = app.status_message.clone().unwrap();
        assert!(is_error);
        assert!(message.contains("greater than zero"));
        assert_eq!(app.funding_state.amount, "0.01");
    }

    #[test]
    fn funding_failure_surfaces_in_popup() {
        let (mut app, _) = new_app();
        app.handle_event(AppEvent::FundingFailed {
            message: AppError::InsufficientFunds.user_message(),
        });
        let popup = app.popup.as_ref().unwrap();
        assert_eq!(popup.popup_type, PopupType::Error);
        assert!(popup.content.contains("insufficient ETH"));
    }

    #[test]
    fn error_message_mapping() {
        assert_eq!(
            activity_error_message(&AppError::MissingApiKey),
            "Set ETHERSCAN_API_KEY to fetch history."
        );
        assert_eq!(activity_error_message(&AppError::internal("x")), ACTIVITY_ERROR);
        assert_eq!(
            connect_error_message(&AppError::NetworkNotAdded("Holesky".into())),
            "Please add this network in your wallet first, then retry."
        );
        assert!(fund_error_message(&AppError::internal("boom")).starts_with("Failed to fund wallet"));
    }

    #[test]
    fn minutes_formatting() {
        assert_eq!(format_minutes(2), "2m");
        assert_eq!(format_minutes(59), "59m");
        assert_eq!(format_minutes(60), "1h 0m");
        assert_eq!(format_minutes(1440), "24h 0m");
    }
}
