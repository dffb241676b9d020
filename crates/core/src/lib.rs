pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use std::path::Path;

use tracing::warn;

use errors::CoreError;
use models::holding::{Holding, HoldingKind};
use models::portfolio::Portfolio;
use services::portfolio_service::PortfolioService;
use storage::manager::StorageManager;

/// Main entry point for the Portfolio Tracker core library.
/// Holds the holdings store and the service that operates on it.
///
/// Single-threaded by design: the embedding application owns one tracker
/// for its whole lifetime and routes every operation through it. A shell
/// that needs shared access should wrap the tracker in one coarse mutex.
#[must_use]
pub struct PortfolioTracker {
    portfolio: Portfolio,
    portfolio_service: PortfolioService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("holdings", &self.portfolio.holdings.len())
            .field("index_tokens", &self.portfolio.index.token_count())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl PortfolioTracker {
    /// Create a brand new empty portfolio.
    pub fn create_new() -> Self {
        Self::build(Portfolio::new())
    }

    /// Load a portfolio file. Fails on unreadable or malformed input; use
    /// [`open_or_default`](Self::open_or_default) for the lenient startup
    /// path.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let portfolio = StorageManager::load_from_file(path)?;
        Ok(Self::build(portfolio))
    }

    /// Load a portfolio file, degrading to an empty store when the file
    /// is missing, unreadable, or corrupt. The failure is logged as a
    /// warning, never surfaced as an error.
    pub fn open_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match StorageManager::load_from_file(path) {
            Ok(portfolio) => Self::build(portfolio),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load portfolio, starting empty");
                Self::create_new()
            }
        }
    }

    /// Save to `path`, completely replacing its previous contents.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.portfolio, path)?;
        self.dirty = false;
        Ok(())
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Buy shares of a `(kind, symbol)` pair. Tops up the existing holding
    /// at its stored price, or opens a new one named `name` at `price`.
    /// The kind is always explicit, so a buy can never silently create the
    /// wrong variant.
    pub fn buy(
        &mut self,
        kind: HoldingKind,
        symbol: &str,
        name: &str,
        quantity: u32,
        price: f64,
    ) -> Result<(), CoreError> {
        self.portfolio_service
            .buy(&mut self.portfolio, kind, symbol, name, quantity, price)?;
        self.dirty = true;
        Ok(())
    }

    /// Sell shares and return the net proceeds: gross minus the kind's
    /// sell fee, possibly negative. Selling a holding down to zero shares
    /// removes it from the store.
    pub fn sell(
        &mut self,
        kind: HoldingKind,
        symbol: &str,
        quantity: u32,
    ) -> Result<f64, CoreError> {
        let proceeds = self
            .portfolio_service
            .sell(&mut self.portfolio, kind, symbol, quantity)?;
        self.dirty = true;
        Ok(proceeds)
    }

    /// Update the market price of an existing holding. The book value is
    /// untouched.
    pub fn set_price(
        &mut self,
        kind: HoldingKind,
        symbol: &str,
        price: f64,
    ) -> Result<(), CoreError> {
        self.portfolio_service
            .set_price(&mut self.portfolio, kind, symbol, price)?;
        self.dirty = true;
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// All holdings in store order.
    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.portfolio.holdings
    }

    /// Number of holdings in the store.
    #[must_use]
    pub fn holding_count(&self) -> usize {
        self.portfolio.holdings.len()
    }

    /// Find a holding by `(kind, symbol)`, case-insensitive on symbol.
    /// A miss is an ordinary `None`, not an error.
    #[must_use]
    pub fn find(&self, kind: HoldingKind, symbol: &str) -> Option<&Holding> {
        self.portfolio_service.find(&self.portfolio, kind, symbol)
    }

    /// Multi-criteria search over symbol, name keywords, and price range;
    /// see [`PortfolioService::search`] for the filter semantics. Pass
    /// empty filters and `0.0..=f64::INFINITY` for unconstrained fields.
    #[must_use]
    pub fn search(
        &self,
        symbol_filter: &str,
        keyword_filter: &str,
        low_price: f64,
        high_price: f64,
    ) -> Vec<&Holding> {
        self.portfolio_service.search(
            &self.portfolio,
            symbol_filter,
            keyword_filter,
            low_price,
            high_price,
        )
    }

    // ── Gains ───────────────────────────────────────────────────────

    /// Sum of unrealized gain/loss over every holding.
    #[must_use]
    pub fn total_unrealized_gain(&self) -> f64 {
        self.portfolio_service.total_unrealized_gain(&self.portfolio)
    }

    /// Per-holding unrealized gain/loss in store order, for display
    /// alongside the total.
    #[must_use]
    pub fn gain_report(&self) -> Vec<(&Holding, f64)> {
        self.portfolio
            .holdings
            .iter()
            .map(|h| (h, h.unrealized_gain_or_loss()))
            .collect()
    }

    // ── Export / State ──────────────────────────────────────────────

    /// Export the holdings snapshot as pretty JSON (debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(&self.portfolio.holdings)?)
    }

    /// Returns `true` if the portfolio has been modified since the last
    /// save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(portfolio: Portfolio) -> Self {
        Self {
            portfolio,
            portfolio_service: PortfolioService::new(),
            dirty: false,
        }
    }
}
