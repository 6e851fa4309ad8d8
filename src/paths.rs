//! Centralized path resolution for CryptoBar
//!
//! All file and directory paths are resolved through this module so the CLI,
//! the index cache and the tests agree on where data lives.
//!
//! ## Path Strategy
//!
//! The base directory follows platform standards:
//! - **macOS**: `~/Library/Application Support/CryptoBar/`
//! - **Windows**: `%APPDATA%\CryptoBar\`
//! - **Linux**: `$XDG_DATA_HOME/CryptoBar/` (fallback `~/.local/share/CryptoBar/`)
//!
//! ## Directory Structure
//!
//! ```text
//! CryptoBar/
//! ├── config.toml
//! └── bubble_index.json
//! ```

use once_cell::sync::Lazy;
use std::path::PathBuf;

// =============================================================================
// BASE DIRECTORY RESOLUTION
// =============================================================================

const APP_DIR: &str = "CryptoBar";

/// Lazy-initialized base directory (thread-safe)
static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

/// Resolves the base directory for all CryptoBar data
///
/// `dirs::data_dir` maps to Application Support on macOS, which is where the
/// menu-bar app keeps its index snapshot.
fn resolve_base_directory() -> PathBuf {
  if let Some(dir) = dirs::data_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(dir) = dirs::data_local_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(home) = dirs::home_dir() {
    return home.join(APP_DIR);
  }

  PathBuf::from(APP_DIR)
}

// =============================================================================
// PRIMARY DIRECTORY ACCESSORS
// =============================================================================

/// Returns the base directory for all CryptoBar data
pub fn get_base_directory() -> PathBuf {
  BASE_DIRECTORY.clone()
}

// =============================================================================
// FILE PATHS
// =============================================================================

/// Returns the main configuration file path
pub fn get_config_path() -> PathBuf {
  get_base_directory().join("config.toml")
}

/// Returns the persisted bubble index snapshot path
pub fn get_bubble_index_path() -> PathBuf {
  get_base_directory().join("bubble_index.json")
}
