use thiserror::Error;

/// Unified error type for the entire portfolio-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation ──────────────────────────────────────────────────
    #[error("Required field '{0}' must not be empty")]
    InvalidField(&'static str),

    #[error("Quantity must be a positive number of shares")]
    InvalidQuantity,

    #[error("Price must be positive")]
    InvalidPrice,

    #[error("Insufficient shares: tried to sell {requested}, only {held} held")]
    InsufficientShares { requested: u32, held: u32 },

    // ── Lookup ──────────────────────────────────────────────────────
    #[error("No {kind} with symbol '{symbol}'")]
    NotFound { kind: String, symbol: String },

    // ── Persistence ─────────────────────────────────────────────────
    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}
