/// Error types for the CryptoBar core
///
/// `ApiError` covers every remote fetch (catalog, charts, metrics).
/// `IndexError` wraps it for the bubble index and adds the snapshot write
/// failure, which is reported after the in-memory catalog has already been
/// replaced.
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// API ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (DNS, TLS, connection reset, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Remote answered with a non-success status
    #[error("HTTP {status} from {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    /// Body did not match the expected schema
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Transport failures and bad statuses are both network errors
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::HttpStatus { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::Decode(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

// =============================================================================
// INDEX ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum IndexError {
    /// Catalog fetch failed; the in-memory index is unchanged
    #[error("Failed to refresh bubble index: {0}")]
    Api(#[from] ApiError),

    /// Snapshot write failed; the in-memory index was already replaced
    #[error("Failed to persist bubble index to {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IndexError {
    pub fn is_persist(&self) -> bool {
        matches!(self, IndexError::Persist { .. })
    }
}
