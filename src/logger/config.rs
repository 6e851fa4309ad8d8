/// Logger configuration and command-line flag parsing
///
/// Debug output is opt-in per tag via `--debug-<tag>`; `--debug-all` turns it
/// on everywhere. `--verbose` lowers the threshold to Verbose, `--log-level=<level>`
/// sets it directly and `--quiet` raises it to Warning whatever else is given.
use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

/// Prefix of the flag that sets the threshold by name
pub const LOG_LEVEL_FLAG: &str = "--log-level=";

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Messages above this level are dropped
    pub min_level: LogLevel,
    /// Tags with debug output enabled (debug keys)
    pub debug_tags: HashSet<String>,
    /// Tags with verbose output enabled (debug keys)
    pub verbose_tags: HashSet<String>,
    /// Enable debug output for every tag
    pub debug_all: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            debug_all: false,
        }
    }
}

impl LoggerConfig {
    pub fn debug_enabled_for(&self, tag: &LogTag) -> bool {
        self.debug_all || self.debug_tags.contains(&tag.to_debug_key())
    }

    pub fn verbose_enabled_for(&self, tag: &LogTag) -> bool {
        self.verbose_tags.contains(&tag.to_debug_key())
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

/// Get a copy of the current logger configuration
pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

/// Replace the logger configuration
pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

/// Build a configuration from a list of command-line arguments
pub fn config_from_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();
    let mut quiet = false;

    for arg in args {
        if arg == "--quiet" {
            quiet = true;
        } else if arg == "--verbose" {
            config.min_level = LogLevel::Verbose;
        } else if let Some(name) = arg.strip_prefix(LOG_LEVEL_FLAG) {
            if let Some(level) = LogLevel::parse(name) {
                config.min_level = level;
            }
        } else if arg == "--debug-all" {
            config.debug_all = true;
            if config.min_level < LogLevel::Debug {
                config.min_level = LogLevel::Debug;
            }
        } else if let Some(key) = arg.strip_prefix("--debug-") {
            config.debug_tags.insert(key.to_lowercase());
            if config.min_level < LogLevel::Debug {
                config.min_level = LogLevel::Debug;
            }
        } else if let Some(key) = arg.strip_prefix("--verbose-") {
            config.verbose_tags.insert(key.to_lowercase());
        }
    }

    if quiet {
        config.min_level = LogLevel::Warning;
    }

    config
}

/// Initialize the logger configuration from the process arguments
pub fn init_from_args() {
    set_logger_config(config_from_args(&arguments::get_cmd_args()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_to_info() {
        let config = config_from_args(&args(&["cryptobar"]));
        assert_eq!(config.min_level, LogLevel::Info);
        assert!(config.debug_tags.is_empty());
    }

    #[test]
    fn test_debug_flag_enables_tag() {
        let config = config_from_args(&args(&["cryptobar", "--debug-index"]));
        assert!(config.debug_tags.contains("index"));
        assert!(config.debug_enabled_for(&LogTag::Index));
        assert!(!config.debug_enabled_for(&LogTag::Api));
        assert_eq!(config.min_level, LogLevel::Debug);
    }

    #[test]
    fn test_quiet_raises_threshold() {
        let config = config_from_args(&args(&["cryptobar", "--quiet"]));
        assert_eq!(config.min_level, LogLevel::Warning);
    }

    #[test]
    fn test_quiet_wins_over_debug_flags() {
        let config = config_from_args(&args(&["cryptobar", "--quiet", "--debug-index"]));
        assert_eq!(config.min_level, LogLevel::Warning);
    }

    #[test]
    fn test_log_level_flag() {
        let config = config_from_args(&args(&["cryptobar", "--log-level=warn"]));
        assert_eq!(config.min_level, LogLevel::Warning);

        let config = config_from_args(&args(&["cryptobar", "--log-level=loud"]));
        assert_eq!(config.min_level, LogLevel::Info);
    }
}
