use super::schemas::Config;
/// Configuration utilities - loading, saving, and access helpers
///
/// - Loading configuration from disk (defaults when the file is absent)
/// - Thread-safe access helpers
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::RwLock;

use crate::logger::{self, LogTag};

/// Global configuration instance
///
/// Access it using the helper functions below.
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Load configuration from the default path and initialize the global CONFIG
pub fn load_config() -> Result<(), String> {
    load_config_from_path(&crate::paths::get_config_path())
}

/// Parse a TOML document into a Config, filling missing keys with defaults
pub fn parse_config(contents: &str) -> Result<Config, String> {
    toml::from_str::<Config>(contents).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Load configuration from a specific file path
///
/// If the file doesn't exist, default values from the schema definitions
/// are used.
pub fn load_config_from_path(path: &Path) -> Result<(), String> {
    let config = if path.exists() {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        parse_config(&contents).map_err(|e| format!("{} ('{}')", e, path.display()))?
    } else {
        logger::debug(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path.display()),
        );
        Config::default()
    };

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(())
}

/// Execute a function with read access to the configuration
///
/// Falls back to defaults when the configuration was never loaded, so
/// library users that skip `load_config()` still get sane values.
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    match CONFIG.get() {
        Some(lock) => match lock.read() {
            Ok(config) => f(&config),
            Err(poisoned) => f(&poisoned.into_inner()),
        },
        None => f(&Config::default()),
    }
}

/// Get a clone of the entire configuration
///
/// Useful when config values must be held across await points.
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

/// Save the current configuration to disk
pub fn save_config(path: Option<&Path>) -> Result<(), String> {
    let default_path = crate::paths::get_config_path();
    let path = path.unwrap_or(&default_path);

    let config_str = with_config(|cfg| {
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))
    })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create '{}': {}", parent.display(), e))?;
    }

    std::fs::write(path, config_str)
        .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

    Ok(())
}

/// Update configuration in memory, optionally writing it to the default path
///
/// Fails when `load_config()` has not run yet.
pub fn update_config_section<F>(update_fn: F, save_to_disk: bool) -> Result<(), String>
where
    F: FnOnce(&mut Config),
{
    let config_lock = CONFIG
        .get()
        .ok_or("Config not initialized. Call load_config() first.")?;

    {
        let mut config = config_lock
            .write()
            .map_err(|e| format!("Failed to acquire config write lock: {}", e))?;
        update_fn(&mut config);
    }

    if save_to_disk {
        save_config(None)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.general.quote_currency, "usd");
        assert_eq!(config.general.max_selected, 30);
        assert_eq!(config.index.ttl_secs, 3600);
        assert_eq!(config.api.base_url, "https://cryptobubbles.net");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[index]\nttl_secs = 120\n\n[general]\nquote_currency = \"eur\"\n").unwrap();
        assert_eq!(config.index.ttl_secs, 120);
        assert!(config.index.snapshot_path.is_empty());
        assert_eq!(config.general.quote_currency, "eur");
        assert_eq!(config.general.coins, "btc,eth");
    }

    #[test]
    fn test_snapshot_path_override() {
        let config = parse_config("[index]\nsnapshot_path = \"/tmp/cb/index.json\"\n").unwrap();
        assert_eq!(
            config.index.resolved_snapshot_path(),
            std::path::PathBuf::from("/tmp/cb/index.json")
        );
        let default = parse_config("").unwrap();
        assert_eq!(
            default.index.resolved_snapshot_path(),
            crate::paths::get_bubble_index_path()
        );
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(parse_config("[index\nttl_secs = ").is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = Config::default();
        config.general.coins = "sol,doge".to_string();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = parse_config(&text).unwrap();
        assert_eq!(parsed.general.coins, "sol,doge");
    }
}
