use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Fixed commission the exchange charges on every stock trade, buy or sell.
pub const EXCHANGE_FEE: f64 = 9.99;

/// Fixed fee the fund manager charges when mutual fund shares are sold back.
pub const DISPOSE_FEE: f64 = 45.0;

/// The two kinds of investment a portfolio can hold.
///
/// The kind decides which fees a transaction pays; the stored fields are
/// identical for both. Fee dispatch is a plain match on the tag, so
/// persistence never has to deal with polymorphic records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoldingKind {
    /// Exchange-traded shares; pays the exchange fee on every buy and sell
    Stock,
    /// Fund shares; free to buy, pays the disposal fee on sell
    MutualFund,
}

impl HoldingKind {
    /// Commission added to the book value on every purchase.
    #[must_use]
    pub fn buy_fee(self) -> f64 {
        match self {
            HoldingKind::Stock => EXCHANGE_FEE,
            HoldingKind::MutualFund => 0.0,
        }
    }

    /// Commission subtracted from the gross proceeds of every sale.
    #[must_use]
    pub fn sell_fee(self) -> f64 {
        match self {
            HoldingKind::Stock => EXCHANGE_FEE,
            HoldingKind::MutualFund => DISPOSE_FEE,
        }
    }

    /// Lowercase tag used in the persisted file format.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            HoldingKind::Stock => "stock",
            HoldingKind::MutualFund => "mutualfund",
        }
    }

    /// Parse a persisted tag back into a kind.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "stock" => Some(HoldingKind::Stock),
            "mutualfund" => Some(HoldingKind::MutualFund),
            _ => None,
        }
    }
}

impl std::fmt::Display for HoldingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HoldingKind::Stock => write!(f, "Stock"),
            HoldingKind::MutualFund => write!(f, "Mutual Fund"),
        }
    }
}

/// One owned investment position.
///
/// `book_value` is the aggregate cost basis including kind-specific buy
/// fees. Partial sells shrink it proportionally to the shares kept; the
/// floating-point drift this accumulates over repeated partial sells is
/// accepted behavior.
///
/// Fields are private so the transaction methods are the only way to
/// mutate a holding; identity for lookups is `(kind, symbol)` with a
/// case-insensitive symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    kind: HoldingKind,
    symbol: String,
    name: String,
    quantity: u32,
    price: f64,
    book_value: f64,
}

impl Holding {
    /// Open a brand new position. The book value is `price * quantity`
    /// plus the kind's buy fee.
    pub fn open(
        kind: HoldingKind,
        symbol: impl Into<String>,
        name: impl Into<String>,
        quantity: u32,
        price: f64,
    ) -> Result<Self, CoreError> {
        let book_value = price * f64::from(quantity) + kind.buy_fee();
        Self::validated(kind, symbol.into(), name.into(), quantity, price, book_value)
    }

    /// Rebuild a position from persisted state. The supplied book value is
    /// authoritative; fees are not recomputed.
    pub fn restore(
        kind: HoldingKind,
        symbol: impl Into<String>,
        name: impl Into<String>,
        quantity: u32,
        price: f64,
        book_value: f64,
    ) -> Result<Self, CoreError> {
        Self::validated(kind, symbol.into(), name.into(), quantity, price, book_value)
    }

    fn validated(
        kind: HoldingKind,
        symbol: String,
        name: String,
        quantity: u32,
        price: f64,
        book_value: f64,
    ) -> Result<Self, CoreError> {
        if symbol.is_empty() {
            return Err(CoreError::InvalidField("symbol"));
        }
        if name.is_empty() {
            return Err(CoreError::InvalidField("name"));
        }
        if quantity == 0 {
            return Err(CoreError::InvalidQuantity);
        }
        if price <= 0.0 {
            return Err(CoreError::InvalidPrice);
        }
        Ok(Self {
            kind,
            symbol,
            name,
            quantity,
            price,
            book_value,
        })
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Buy additional shares at the currently stored price (a newly quoted
    /// price never enters here; callers update it via `set_price`). Adds
    /// the shares' cost plus the kind's buy fee to the book value.
    pub fn buy_more(&mut self, additional_quantity: u32) -> Result<(), CoreError> {
        if additional_quantity == 0 {
            return Err(CoreError::InvalidQuantity);
        }
        self.quantity += additional_quantity;
        self.book_value += f64::from(additional_quantity) * self.price + self.kind.buy_fee();
        Ok(())
    }

    /// Sell shares at the current price. The cost basis shrinks in
    /// proportion to the shares kept. Returns the net proceeds, gross
    /// minus the kind's sell fee; a small sale can net a negative amount
    /// when the fee exceeds the gross, which is valid output.
    pub fn sell(&mut self, reduce_quantity: u32) -> Result<f64, CoreError> {
        if reduce_quantity == 0 {
            return Err(CoreError::InvalidQuantity);
        }
        if reduce_quantity > self.quantity {
            return Err(CoreError::InsufficientShares {
                requested: reduce_quantity,
                held: self.quantity,
            });
        }

        let previous_quantity = self.quantity;
        self.quantity -= reduce_quantity;
        self.book_value *= f64::from(self.quantity) / f64::from(previous_quantity);

        Ok(f64::from(reduce_quantity) * self.price - self.kind.sell_fee())
    }

    /// Update the market price. The book value is untouched.
    pub fn set_price(&mut self, price: f64) -> Result<(), CoreError> {
        if price <= 0.0 {
            return Err(CoreError::InvalidPrice);
        }
        self.price = price;
        Ok(())
    }

    /// Gain or loss against the cost basis at the current market price.
    #[must_use]
    pub fn unrealized_gain_or_loss(&self) -> f64 {
        f64::from(self.quantity) * self.price - self.book_value
    }

    /// Whether this holding is the `(kind, symbol)` pair, comparing the
    /// symbol case-insensitively.
    #[must_use]
    pub fn matches(&self, kind: HoldingKind, symbol: &str) -> bool {
        self.kind == kind && self.symbol.eq_ignore_ascii_case(symbol)
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn kind(&self) -> HoldingKind {
        self.kind
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    #[must_use]
    pub fn book_value(&self) -> f64 {
        self.book_value
    }
}

impl std::fmt::Display for Holding {
    /// Multi-line summary used by front-end listings.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Type: {}", self.kind)?;
        writeln!(f, "Symbol: {}", self.symbol)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Shares: {}", self.quantity)?;
        writeln!(f, "Price: ${:.2}", self.price)?;
        writeln!(f, "Book Value: ${:.2}", self.book_value)?;
        write!(
            f,
            "Unrealized Gain/Loss: ${:.2}",
            self.unrealized_gain_or_loss()
        )
    }
}
