/// Core logging implementation with automatic filtering
///
/// Checks whether a message should be displayed based on level and tag,
/// then hands it to the format module.
use super::config::{get_logger_config, LoggerConfig};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Check if a log message should be displayed under the current config
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    passes_filter(&get_logger_config(), tag, level)
}

/// Filtering rules:
/// 1. Errors are always shown
/// 2. Verbose level requires --verbose, or --verbose-<tag> while the
///    threshold is at least Info (so --quiet silences it)
/// 3. Everything else is checked against the minimum level threshold
/// 4. Debug level also requires --debug-<tag> (or --debug-all)
fn passes_filter(config: &LoggerConfig, tag: &LogTag, level: LogLevel) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    if level == LogLevel::Verbose {
        return config.min_level == LogLevel::Verbose
            || (config.min_level >= LogLevel::Info && config.verbose_enabled_for(tag));
    }

    if level > config.min_level {
        return false;
    }

    if level == LogLevel::Debug {
        return config.debug_enabled_for(tag);
    }

    true
}

/// Internal logging function with automatic filtering
pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(&tag, level, message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config_from_args;

    fn config(list: &[&str]) -> LoggerConfig {
        let args: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        config_from_args(&args)
    }

    #[test]
    fn test_errors_always_pass() {
        let cfg = config(&["cryptobar", "--quiet"]);
        assert!(passes_filter(&cfg, &LogTag::Api, LogLevel::Error));
        assert!(passes_filter(&cfg, &LogTag::Api, LogLevel::Warning));
        assert!(!passes_filter(&cfg, &LogTag::Api, LogLevel::Info));
    }

    #[test]
    fn test_quiet_silences_tag_verbose() {
        let cfg = config(&["cryptobar", "--quiet", "--verbose-index"]);
        assert!(!passes_filter(&cfg, &LogTag::Index, LogLevel::Verbose));
        assert!(!passes_filter(&cfg, &LogTag::Index, LogLevel::Info));
    }

    #[test]
    fn test_tag_verbose_at_default_threshold() {
        let cfg = config(&["cryptobar", "--verbose-index"]);
        assert!(passes_filter(&cfg, &LogTag::Index, LogLevel::Verbose));
        assert!(!passes_filter(&cfg, &LogTag::Api, LogLevel::Verbose));
    }

    #[test]
    fn test_debug_needs_tag_flag() {
        let cfg = config(&["cryptobar", "--debug-api"]);
        assert!(passes_filter(&cfg, &LogTag::Api, LogLevel::Debug));
        assert!(!passes_filter(&cfg, &LogTag::Index, LogLevel::Debug));

        let cfg = config(&["cryptobar", "--debug-all"]);
        assert!(passes_filter(&cfg, &LogTag::Charts, LogLevel::Debug));
    }
}
