use crate::errors::CoreError;
use crate::models::holding::{Holding, HoldingKind};
use crate::models::portfolio::Portfolio;

/// Store operations over a [`Portfolio`]: add/remove/find/search plus the
/// buy, sell, and price flows the front end drives.
///
/// Pure business logic, no I/O. Every mutation keeps the keyword index in
/// lock-step with the holding list.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    // ── Store maintenance ───────────────────────────────────────────

    /// Append a holding and index its name tokens.
    ///
    /// No uniqueness check happens here; [`buy`](Self::buy) is responsible
    /// for routing a repeat purchase of an existing `(kind, symbol)` pair
    /// through `buy_more` instead.
    pub fn add(&self, portfolio: &mut Portfolio, holding: Holding) {
        let position = portfolio.holdings.len();
        portfolio.index.insert(holding.name(), position);
        portfolio.holdings.push(holding);
    }

    /// Remove the holding with the given identity, shifting every index
    /// position past it down by one.
    pub fn remove(
        &self,
        portfolio: &mut Portfolio,
        kind: HoldingKind,
        symbol: &str,
    ) -> Result<Holding, CoreError> {
        let position = self
            .position_of(portfolio, kind, symbol)
            .ok_or_else(|| Self::not_found(kind, symbol))?;
        portfolio.index.remove(position);
        Ok(portfolio.holdings.remove(position))
    }

    // ── Lookup ──────────────────────────────────────────────────────

    /// Position of the first holding matching `(kind, symbol)`,
    /// case-insensitive on symbol. Linear scan; `None` is an ordinary
    /// miss, not an error.
    #[must_use]
    pub fn position_of(
        &self,
        portfolio: &Portfolio,
        kind: HoldingKind,
        symbol: &str,
    ) -> Option<usize> {
        portfolio.holdings.iter().position(|h| h.matches(kind, symbol))
    }

    /// Find a holding by `(kind, symbol)`, case-insensitive on symbol.
    #[must_use]
    pub fn find<'a>(
        &self,
        portfolio: &'a Portfolio,
        kind: HoldingKind,
        symbol: &str,
    ) -> Option<&'a Holding> {
        portfolio.holdings.iter().find(|h| h.matches(kind, symbol))
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Buy shares of a `(kind, symbol)` pair: tops up an existing holding
    /// at its stored price (the quoted `price` and `name` are ignored
    /// then), or opens a new holding and adds it to the store.
    pub fn buy(
        &self,
        portfolio: &mut Portfolio,
        kind: HoldingKind,
        symbol: &str,
        name: &str,
        quantity: u32,
        price: f64,
    ) -> Result<(), CoreError> {
        match self.position_of(portfolio, kind, symbol) {
            Some(position) => portfolio.holdings[position].buy_more(quantity),
            None => {
                let holding = Holding::open(kind, symbol, name, quantity, price)?;
                self.add(portfolio, holding);
                Ok(())
            }
        }
    }

    /// Sell shares of an existing holding and return the net proceeds.
    /// A holding sold down to zero shares is removed from the store and
    /// from the index.
    pub fn sell(
        &self,
        portfolio: &mut Portfolio,
        kind: HoldingKind,
        symbol: &str,
        quantity: u32,
    ) -> Result<f64, CoreError> {
        let position = self
            .position_of(portfolio, kind, symbol)
            .ok_or_else(|| Self::not_found(kind, symbol))?;

        let proceeds = portfolio.holdings[position].sell(quantity)?;

        if portfolio.holdings[position].quantity() == 0 {
            portfolio.index.remove(position);
            portfolio.holdings.remove(position);
        }

        Ok(proceeds)
    }

    /// Update the market price of an existing holding.
    pub fn set_price(
        &self,
        portfolio: &mut Portfolio,
        kind: HoldingKind,
        symbol: &str,
        price: f64,
    ) -> Result<(), CoreError> {
        let position = self
            .position_of(portfolio, kind, symbol)
            .ok_or_else(|| Self::not_found(kind, symbol))?;
        portfolio.holdings[position].set_price(price)
    }

    // ── Reporting ───────────────────────────────────────────────────

    /// Sum of unrealized gain/loss over every holding.
    #[must_use]
    pub fn total_unrealized_gain(&self, portfolio: &Portfolio) -> f64 {
        portfolio
            .holdings
            .iter()
            .map(Holding::unrealized_gain_or_loss)
            .sum()
    }

    // ── Search ──────────────────────────────────────────────────────

    /// Multi-criteria search; a holding must satisfy every filter.
    ///
    /// 1. `keyword_filter` non-blank: only holdings whose name contains
    ///    every whitespace-delimited token (case-insensitive, whole-word),
    ///    resolved through the index. Blank means every holding.
    /// 2. `symbol_filter` non-empty: symbol must equal it,
    ///    case-insensitively.
    /// 3. Price within `low_price..=high_price`, both inclusive; callers
    ///    pass `0.0` and `f64::INFINITY` for an unbounded side.
    ///
    /// Results come back in store order. An empty result is a valid,
    /// non-error outcome.
    #[must_use]
    pub fn search<'a>(
        &self,
        portfolio: &'a Portfolio,
        symbol_filter: &str,
        keyword_filter: &str,
        low_price: f64,
        high_price: f64,
    ) -> Vec<&'a Holding> {
        let candidates: Vec<usize> = if keyword_filter.trim().is_empty() {
            (0..portfolio.holdings.len()).collect()
        } else {
            portfolio.index.matching_positions(keyword_filter)
        };

        candidates
            .into_iter()
            .map(|position| &portfolio.holdings[position])
            .filter(|h| {
                symbol_filter.is_empty() || h.symbol().eq_ignore_ascii_case(symbol_filter)
            })
            .filter(|h| h.price() >= low_price && h.price() <= high_price)
            .collect()
    }

    fn not_found(kind: HoldingKind, symbol: &str) -> CoreError {
        CoreError::NotFound {
            kind: kind.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
