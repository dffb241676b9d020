use serde::{Deserialize, Serialize};

use super::holding::Holding;
use super::index::KeywordIndex;

/// The main data container: the investor's holdings in insertion/load
/// order, plus the keyword index built over their names.
///
/// The index must stay in lock-step with `holdings`; mutate through
/// `PortfolioService` rather than touching the fields directly. Search
/// and listing both preserve the holding order stored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// All holdings, in the order they were added or loaded
    pub holdings: Vec<Holding>,

    /// Inverted name-keyword index over `holdings`
    pub index: KeywordIndex,
}

impl Portfolio {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a portfolio from a plain holding list (the load path),
    /// indexing every name as it goes.
    #[must_use]
    pub fn from_holdings(holdings: Vec<Holding>) -> Self {
        let mut index = KeywordIndex::new();
        for (position, holding) in holdings.iter().enumerate() {
            index.insert(holding.name(), position);
        }
        Self { holdings, index }
    }
}
