/// Configuration schemas - all config structures defined once with defaults
///
/// Each struct is defined using the config_struct! macro which provides
/// embedded defaults and serde support.
use crate::config_struct;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// GENERAL CONFIGURATION
// ============================================================================

config_struct! {
    /// User-facing settings
    pub struct GeneralConfig {
        /// Quote currency prices are expressed in (e.g. "usd")
        quote_currency: String = "usd".to_string(),
        /// Selected coins as a comma-separated symbol list
        coins: String = "btc,eth".to_string(),
        /// Maximum number of selected coins
        max_selected: usize = 30,
    }
}

// ============================================================================
// INDEX CONFIGURATION
// ============================================================================

config_struct! {
    /// Bubble index cache settings
    pub struct IndexConfig {
        /// Freshness window before a refresh is attempted
        ttl_secs: u64 = 3600,
        /// Snapshot location; empty means the application-support default
        snapshot_path: String = String::new(),
    }
}

impl IndexConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn resolved_snapshot_path(&self) -> PathBuf {
        if self.snapshot_path.trim().is_empty() {
            crate::paths::get_bubble_index_path()
        } else {
            PathBuf::from(self.snapshot_path.trim())
        }
    }
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

config_struct! {
    /// Crypto Bubbles backend settings
    pub struct ApiConfig {
        base_url: String = "https://cryptobubbles.net".to_string(),
        /// Request timeout - the bubbles list is large, 20s recommended
        timeout_secs: u64 = 20,
        user_agent: String = concat!("CryptoBar/", env!("CARGO_PKG_VERSION")).to_string(),
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration
    pub struct Config {
        general: GeneralConfig = GeneralConfig::default(),
        index: IndexConfig = IndexConfig::default(),
        api: ApiConfig = ApiConfig::default(),
    }
}
