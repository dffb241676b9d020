use std::path::Path;

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

use super::format;

/// High-level storage operations: save/load the portfolio to/from the
/// flat text file the tracker keeps between runs.
pub struct StorageManager;

impl StorageManager {
    /// Serialize a portfolio to the flat text format.
    #[must_use]
    pub fn save_to_string(portfolio: &Portfolio) -> String {
        format::encode(&portfolio.holdings)
    }

    /// Parse the flat text format and rebuild the keyword index over the
    /// decoded holdings.
    pub fn load_from_string(text: &str) -> Result<Portfolio, CoreError> {
        let holdings = format::decode(text)?;
        Ok(Portfolio::from_holdings(holdings))
    }

    /// Write the portfolio to `path`, completely replacing any previous
    /// contents.
    pub fn save_to_file(portfolio: &Portfolio, path: impl AsRef<Path>) -> Result<(), CoreError> {
        std::fs::write(path, Self::save_to_string(portfolio))?;
        Ok(())
    }

    /// Read and parse the portfolio stored at `path`.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Portfolio, CoreError> {
        let text = std::fs::read_to_string(path)?;
        Self::load_from_string(&text)
    }
}
