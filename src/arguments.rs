/// Command-line arguments for CryptoBar
///
/// Raw process arguments are kept in `CMD_ARGS` so the logger can read its
/// `--debug-<tag>`, `--verbose`, `--log-level=` and `--quiet` flags before anything else
/// runs. Subcommands are parsed with clap after those flags are removed.
use crate::apis::bubbles::types::ChartRange;
use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Override the stored arguments (tests and embedding callers)
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Flags consumed by the logger rather than clap
pub fn is_logger_flag(arg: &str) -> bool {
    arg == "--quiet"
        || arg == "--verbose"
        || arg.starts_with(crate::logger::LOG_LEVEL_FLAG)
        || arg.starts_with("--verbose-")
        || arg.starts_with("--debug-")
}

/// Stored arguments without logger flags, ready for `Cli::parse_from`
pub fn command_args() -> Vec<String> {
    strip_logger_flags(&get_cmd_args())
}

fn strip_logger_flags(args: &[String]) -> Vec<String> {
    args.iter().filter(|a| !is_logger_flag(a)).cloned().collect()
}

// =============================================================================
// CLI DEFINITION
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "cryptobar")]
#[command(version, about = "Crypto Bubbles coin index, charts and metrics")]
#[command(after_help = "Logger flags: --quiet, --verbose, --log-level=<level>, --debug-all, --debug-<tag>, --verbose-<tag>\nTags: system, config, api, index, charts, selection")]
pub struct Cli {
    /// Quote currency (overrides [general] quote_currency)
    #[arg(long, global = true)]
    pub quote: Option<String>,

    /// Configuration file (defaults to the data directory config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Load the coin index, refreshing it when stale
    Index {
        /// Refresh even if the cached index is fresh
        #[arg(long)]
        refresh: bool,

        /// Only read the snapshot on disk
        #[arg(long, conflicts_with = "refresh")]
        offline: bool,

        /// Number of entries to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Search the index by symbol or id
    Search {
        query: String,

        #[arg(long, default_value_t = crate::selection::DEFAULT_SEARCH_LIMIT)]
        limit: usize,

        /// Print typing completions instead of matching entries
        #[arg(long)]
        complete: bool,
    },

    /// Edit the selected coins list
    Select {
        /// Start from this CSV instead of the configured list
        #[arg(long, value_name = "CSV")]
        csv: Option<String>,

        /// Symbols or ids to add
        #[arg(long, value_delimiter = ',')]
        add: Vec<String>,

        /// Symbols to remove
        #[arg(long, value_delimiter = ',')]
        remove: Vec<String>,

        /// Remove everything before applying additions
        #[arg(long)]
        clear: bool,

        /// Write the result back to the configuration file
        #[arg(long)]
        save: bool,
    },

    /// Print a price series summary for one coin
    Chart {
        /// Numeric Crypto Bubbles id
        id: i64,

        #[arg(long, default_value = "day")]
        range: ChartRange,

        /// Print every point instead of the summary
        #[arg(long)]
        points: bool,
    },

    /// Print rank, market cap, volume and price for one coin
    Metrics {
        #[arg(long)]
        id: Option<i64>,

        #[arg(long)]
        symbol: Option<String>,

        /// Coin amount to value at the current price, e.g. "1,250.5"
        #[arg(long, value_name = "AMOUNT")]
        amount: Option<String>,
    },

    /// Show resolved file locations
    Paths,
}

impl Cli {
    /// Parse the stored process arguments
    pub fn from_cmd_args() -> Self {
        Self::parse_from(command_args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_logger_flags_are_stripped() {
        let stripped = strip_logger_flags(&args(&[
            "cryptobar",
            "--debug-index",
            "search",
            "--verbose",
            "btc",
            "--quiet",
        ]));
        assert_eq!(stripped, args(&["cryptobar", "search", "btc"]));
    }

    #[test]
    fn test_parse_index_flags() {
        let cli = Cli::try_parse_from(args(&["cryptobar", "index", "--refresh"])).unwrap();
        assert_eq!(
            cli.command,
            Command::Index {
                refresh: true,
                offline: false,
                limit: 20
            }
        );
        assert!(Cli::try_parse_from(args(&["cryptobar", "index", "--refresh", "--offline"])).is_err());
    }

    #[test]
    fn test_parse_chart_range() {
        let cli = Cli::try_parse_from(args(&["cryptobar", "chart", "1", "--range", "Week"])).unwrap();
        match cli.command {
            Command::Chart { id, range, points } => {
                assert_eq!(id, 1);
                assert_eq!(range, ChartRange::Week);
                assert!(!points);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Cli::try_parse_from(args(&["cryptobar", "chart", "1", "--range", "decade"])).is_err());
    }

    #[test]
    fn test_parse_select_lists_and_global_quote() {
        let cli = Cli::try_parse_from(args(&[
            "cryptobar",
            "select",
            "--add",
            "sol,bitcoin",
            "--remove",
            "eth",
            "--quote",
            "eur",
        ]))
        .unwrap();
        assert_eq!(cli.quote.as_deref(), Some("eur"));
        match cli.command {
            Command::Select { add, remove, clear, .. } => {
                assert_eq!(add, args(&["sol", "bitcoin"]));
                assert_eq!(remove, args(&["eth"]));
                assert!(!clear);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_metrics_amount() {
        let cli = Cli::try_parse_from(args(&["cryptobar", "metrics", "--symbol", "btc", "--amount", "1,250.5"])).unwrap();
        assert_eq!(
            cli.command,
            Command::Metrics {
                id: None,
                symbol: Some("btc".to_string()),
                amount: Some("1,250.5".to_string()),
            }
        );
    }

    #[test]
    fn test_command_args_read_stored_args() {
        set_cmd_args(args(&["cryptobar", "--log-level=debug", "paths"]));
        assert_eq!(command_args(), args(&["cryptobar", "paths"]));
        let cli = Cli::try_parse_from(command_args()).unwrap();
        assert_eq!(cli.command, Command::Paths);
    }
}
