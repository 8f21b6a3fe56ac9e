use thiserror::Error;

/// Unified error type for the entire gold-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No gold price provider configured")]
    NoProvider,

    #[error("Price not available from {provider} for {date}")]
    PriceNotAvailable {
        provider: String,
        date: String,
    },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Purchase validation failed: {0}")]
    ValidationError(String),

    #[error("Purchase not found: {0}")]
    PurchaseNotFound(String),

    #[error("XIRR could not be computed: {0}")]
    Xirr(#[from] XirrError),
}

/// Reasons the XIRR root-finder can fail to produce a rate.
///
/// Kept separate from [`CoreError`] so that callers can decide how to
/// present an undefined return (the metrics pipeline shows it as 0%).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum XirrError {
    #[error("at least two cash flows are required, got {0}")]
    TooFewCashFlows(usize),

    #[error("cash flows must contain both an outflow and an inflow")]
    NoSignChange,

    #[error("cash flow amounts must be finite")]
    NonFiniteAmount,

    #[error("no rate between -100% and the upper search bound zeroes the NPV")]
    NoRootInRange,

    #[error("did not converge after {0} iterations")]
    DidNotConverge(usize),

    #[error("no purchases to value")]
    NoPurchases,

    #[error("reference price must be positive, got {0}")]
    InvalidReferencePrice(f64),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query parameters: metals.dev takes its API key in the query string.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
