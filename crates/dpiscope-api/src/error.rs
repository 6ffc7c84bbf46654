use thiserror::Error;

/// Top-level error type for the `dpiscope-api` crate.
///
/// Every failure is terminal for the operation that triggered it: nothing
/// is caught or retried internally. Callers decide whether a failure aborts
/// the program or merely skips a feature (e.g. proceed with unresolved
/// id-only DPI stats when map extraction fails).
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login returned something other than HTTP 200. This is a fatal
    /// construction failure -- no usable client exists afterwards.
    #[error("authentication failed: {endpoint} returned HTTP {status}, expected 200")]
    Authentication { endpoint: String, status: u16 },

    // ── Endpoint contract ───────────────────────────────────────────
    /// A read/action endpoint returned a non-200 status. Fatal to the
    /// call only; the session itself remains usable.
    #[error("{operation}: {endpoint} returned HTTP {status}, expected 200")]
    Endpoint {
        operation: &'static str,
        endpoint: String,
        status: u16,
    },

    // ── Argument validation ─────────────────────────────────────────
    /// Malformed arguments, caught before any network request is issued.
    #[error("invalid argument: {message}")]
    Validation { message: String },

    // ── DPI map extraction ──────────────────────────────────────────
    /// The category/application map could not be recovered from the
    /// controller's console asset.
    #[error("DPI map extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing or construction error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),
}

/// Failure detail for [`TrafficMapExtractor`](crate::TrafficMapExtractor).
///
/// Extraction never degrades to a partial or cached map -- any stage
/// failure surfaces here and blocks name resolution entirely.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The asset fetch returned a non-200 status.
    #[error("{endpoint} returned HTTP {status}, expected 200")]
    AssetStatus { endpoint: String, status: u16 },

    /// The normalized asset did not contain exactly one `categories:` and
    /// one `applications:` object literal.
    #[error("expected exactly 2 map fragments in {asset}, found {found}")]
    FragmentCount { asset: String, found: usize },

    /// Both fragments were present but not in the shape the controller's
    /// build process is known to emit.
    #[error("map fragments in {asset} out of order: applications precedes categories")]
    FragmentOrder { asset: String },

    /// A fragment was located but could not be parsed as a keyed-data literal.
    #[error("could not parse {fragment} fragment from {asset}: {message}")]
    Parse {
        asset: String,
        fragment: &'static str,
        message: String,
    },
}

impl Error {
    /// Returns `true` if this error came from the login exchange.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this error was raised before any network I/O.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns `true` if name resolution is blocked but raw id-only
    /// statistics remain usable.
    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::Extraction(_))
    }
}
