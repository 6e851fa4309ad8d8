use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use cryptobar::{
    apis::bubbles::types::{ChartRange, SeriesStats},
    apis::BubblesClient,
    arguments::{Cli, Command},
    config::{self, Config},
    errors::IndexError,
    format::{compact_fiat, fiat_value, int_or_dash, parse_clean_decimal, signed_percent},
    index::{BubbleIndex, CatalogEntry},
    logger::{self, LogTag},
    selection::{self, CatalogLookup, CoinSelection},
};
use std::sync::Arc;

/// Main entry point for the CryptoBar CLI
///
/// Logger flags are read from the raw arguments first, then the config is
/// loaded and the subcommand dispatched.
#[tokio::main]
async fn main() {
    logger::init();

    if let Err(e) = run(Cli::from_cmd_args()).await {
        logger::error(LogTag::System, &format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let loaded = match &cli.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    };
    loaded.map_err(|e| anyhow!(e))?;

    let cfg = config::get_config_clone();
    let quote = cli
        .quote
        .clone()
        .unwrap_or_else(|| cfg.general.quote_currency.clone())
        .trim()
        .to_lowercase();

    logger::debug(
        LogTag::System,
        &format!("Quote currency {}, base URL {}", quote, cfg.api.base_url),
    );

    let client = Arc::new(BubblesClient::from_config(&cfg.api).context("Failed to build HTTP client")?);
    let index = BubbleIndex::from_config(client.clone(), &cfg.index);

    match cli.command.clone() {
        Command::Index {
            refresh,
            offline,
            limit,
        } => {
            let entries = if offline {
                index.warm_from_disk();
                index.entries()
            } else {
                if refresh {
                    index.invalidate();
                }
                load_entries(&index, &quote).await?
            };

            println!(
                "{} {} coins ({})",
                "Bubble index:".bold(),
                entries.len(),
                index.snapshot_path().display()
            );
            for entry in entries.iter().take(limit) {
                println!("  {}", entry.display());
            }
        }

        Command::Search {
            query,
            limit,
            complete,
        } => {
            let entries = load_entries(&index, &quote).await?;
            if complete {
                for symbol in selection::completions(&entries, &query, selection::DEFAULT_COMPLETION_LIMIT) {
                    println!("{}", symbol);
                }
            } else {
                let hits = selection::filter_entries(&entries, &query, limit);
                if hits.is_empty() {
                    println!("No coins match '{}'", query);
                }
                for entry in hits {
                    println!("{}", entry.display());
                }
            }
        }

        Command::Select {
            csv,
            add,
            remove,
            clear,
            save,
        } => {
            let entries = load_entries(&index, &quote).await?;
            let csv = select(&cfg, &entries, csv, &add, &remove, clear)?;

            if save {
                let stored = csv.clone();
                config::update_config_section(|c| c.general.coins = stored, false).map_err(|e| anyhow!(e))?;
                config::save_config(cli.config.as_deref()).map_err(|e| anyhow!(e))?;
                logger::info(LogTag::Config, "Saved selection");
            }

            println!("{}", csv);
        }

        Command::Chart { id, range, points } => {
            print_chart(&client, id, &quote, range, points).await?;
        }

        Command::Metrics { id, symbol, amount } => {
            if id.is_none() && symbol.is_none() {
                bail!("metrics needs --id or --symbol");
            }
            let amount = match amount.as_deref() {
                Some(raw) => Some(
                    parse_clean_decimal(raw).ok_or_else(|| anyhow!("Invalid amount '{}'", raw))?,
                ),
                None => None,
            };

            let metrics = client
                .fetch_metrics(&quote, id, symbol.as_deref())
                .await?
                .ok_or_else(|| anyhow!("No metrics for id={:?} symbol={:?}", id, symbol))?;

            let symbol = metrics.symbol.clone().unwrap_or_default().to_uppercase();
            println!("{} {}", symbol.bold(), int_or_dash(metrics.id).dimmed());
            println!("  Rank        {}", int_or_dash(metrics.rank));
            println!("  Market cap  {}", compact_fiat(metrics.market_cap, &quote));
            println!("  Volume 24h  {}", compact_fiat(metrics.volume, &quote));
            println!("  Price       {}", price_or_dash(metrics.price));
            if let Some(amount) = amount {
                let value = metrics.price.and_then(|p| fiat_value(amount, p));
                println!("  {} {}  {}", amount, symbol, compact_fiat(value, &quote));
            }
        }

        Command::Paths => {
            println!("Data directory  {}", cryptobar::paths::get_base_directory().display());
            println!(
                "Config file     {}",
                cli.config
                    .clone()
                    .unwrap_or_else(cryptobar::paths::get_config_path)
                    .display()
            );
            println!("Bubble index    {}", index.snapshot_path().display());
        }
    }

    Ok(())
}

/// Load the index, falling back to the disk snapshot when the network fails
///
/// A failed snapshot write after a successful refresh only warns: the fresh
/// entries are already in memory.
async fn load_entries(index: &BubbleIndex, quote: &str) -> Result<Arc<Vec<CatalogEntry>>> {
    index.warm_from_disk();

    match index.load(quote).await {
        Ok(entries) => Ok(entries),
        Err(IndexError::Persist { path, source }) => {
            logger::warning(
                LogTag::Index,
                &format!("Could not save snapshot to {}: {}", path.display(), source),
            );
            Ok(index.entries())
        }
        Err(IndexError::Api(e)) => {
            let cached = index.entries();
            if cached.is_empty() {
                return Err(e).context("Failed to load bubble index");
            }
            logger::warning(
                LogTag::Index,
                &format!("Using {} cached entries from disk ({})", cached.len(), e),
            );
            Ok(cached)
        }
    }
}

fn select(
    cfg: &Config,
    entries: &[CatalogEntry],
    csv: Option<String>,
    add: &[String],
    remove: &[String],
    clear: bool,
) -> Result<String> {
    let lookup = CatalogLookup::from_entries(entries);
    let start = csv.unwrap_or_else(|| cfg.general.coins.clone());
    let mut chosen = CoinSelection::from_csv(&start, cfg.general.max_selected);

    let report = selection::apply_edits(&mut chosen, &lookup, clear, remove, add);

    if report.dropped > 0 {
        logger::info(
            LogTag::Selection,
            &format!("Dropped {} delisted coin(s) from the selection", report.dropped),
        );
    }
    for symbol in &report.added {
        logger::debug(LogTag::Selection, &format!("Added {}", symbol));
    }
    for symbol in &report.already_selected {
        logger::info(LogTag::Selection, &format!("'{}' is already selected", symbol));
    }
    for query in &report.unknown {
        logger::warning(LogTag::Selection, &format!("Unknown coin '{}'", query));
    }
    if !report.over_limit.is_empty() {
        bail!(
            "Selection is full ({} coins), could not add {}",
            chosen.limit(),
            report.over_limit.join(", ")
        );
    }

    Ok(chosen.to_csv())
}

async fn print_chart(
    client: &BubblesClient,
    id: i64,
    quote: &str,
    range: ChartRange,
    points: bool,
) -> Result<()> {
    let series = client.fetch_series(id, quote, range).await?;

    if points {
        for point in &series {
            let when = point
                .time()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| point.t.to_string());
            println!("{}  {}", when, point.p);
        }
        return Ok(());
    }

    let stats = SeriesStats::from_points(&series)
        .ok_or_else(|| anyhow!("Empty {} series for coin {}", range.path(), id))?;
    let change = signed_percent(stats.change_pct);
    let change = if stats.is_up() { change.green() } else { change.red() };

    println!(
        "{} {} ({} points)",
        range.title().bold(),
        quote.to_uppercase(),
        series.len()
    );
    println!("  Last    {}  {}", price_or_dash(Some(stats.last)), change);
    println!("  High    {}", price_or_dash(Some(stats.high)));
    println!("  Low     {}", price_or_dash(Some(stats.low)));
    Ok(())
}

fn price_or_dash(price: Option<f64>) -> String {
    match price {
        Some(p) if p >= 1.0 => format!("{:.2}", p),
        Some(p) if p > 0.0 => format!("{:.6}", p),
        _ => cryptobar::format::DASH.to_string(),
    }
}
