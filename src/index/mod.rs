//! Bubble index: the coin id/symbol catalog behind search and selection
//!
//! - `entry` - catalog entries and fetch normalisation
//! - `snapshot` - atomic JSON snapshot on disk
//! - `source` - the `CatalogSource` seam
//!
//! The index refreshes from the network at most once per TTL (one hour by
//! default). Each successful refresh replaces the in-memory list as a whole
//! and rewrites the snapshot, which the UI reads synchronously at startup
//! through [`load_from_disk`] while the first refresh is still in flight.

pub mod entry;
pub mod snapshot;
pub mod source;

pub use entry::{normalize_catalog, CatalogEntry};
pub use source::CatalogSource;

use crate::config::IndexConfig;
use crate::errors::IndexError;
use crate::logger::{self, LogTag};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Default freshness window
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct IndexState {
    entries: Arc<Vec<CatalogEntry>>,
    last_refreshed_at: Option<DateTime<Utc>>,
}

/// Catalog cache with TTL refresh and snapshot persistence
///
/// Owned by the composition root and shared as `Arc<BubbleIndex>`.
/// Refreshes are serialized; readers get whole-list snapshots.
pub struct BubbleIndex {
    source: Arc<dyn CatalogSource>,
    snapshot_path: PathBuf,
    ttl: Duration,
    state: RwLock<IndexState>,
    refresh_lock: tokio::sync::Mutex<()>,
}

impl BubbleIndex {
    pub fn new(source: Arc<dyn CatalogSource>, snapshot_path: PathBuf) -> Self {
        Self {
            source,
            snapshot_path,
            ttl: DEFAULT_TTL,
            state: RwLock::new(IndexState {
                entries: Arc::new(Vec::new()),
                last_refreshed_at: None,
            }),
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn from_config(source: Arc<dyn CatalogSource>, cfg: &IndexConfig) -> Self {
        Self::new(source, cfg.resolved_snapshot_path()).with_ttl(cfg.ttl())
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Current in-memory list (empty until the first successful load)
    pub fn entries(&self) -> Arc<Vec<CatalogEntry>> {
        self.state.read().entries.clone()
    }

    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().last_refreshed_at
    }

    /// Whether `load` would be served from memory at `now`
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.fresh_entries(now).is_some()
    }

    fn fresh_entries(&self, now: DateTime<Utc>) -> Option<Arc<Vec<CatalogEntry>>> {
        let state = self.state.read();
        let last = state.last_refreshed_at?;
        if state.entries.is_empty() {
            return None;
        }

        // A refresh stamped in the future (clock moved back) counts as stale
        let age = (now - last).to_std().ok()?;
        if age < self.ttl {
            Some(state.entries.clone())
        } else {
            None
        }
    }

    /// Return the catalog, refreshing from the network when stale
    ///
    /// A failed fetch leaves the index untouched. A failed snapshot write is
    /// reported as `IndexError::Persist` after the new list is already
    /// live in memory; the next refresh retries the write.
    pub async fn load(&self, quote: &str) -> Result<Arc<Vec<CatalogEntry>>, IndexError> {
        if let Some(entries) = self.fresh_entries(Utc::now()) {
            logger::verbose(
                LogTag::Index,
                &format!("Serving {} cached entries", entries.len()),
            );
            return Ok(entries);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited
        if let Some(entries) = self.fresh_entries(Utc::now()) {
            return Ok(entries);
        }

        let coins = match self.source.fetch_catalog(quote).await {
            Ok(coins) => coins,
            Err(e) => {
                logger::warning(
                    LogTag::Index,
                    &format!("Bubble index refresh for {} failed: {}", quote, e),
                );
                return Err(IndexError::Api(e));
            }
        };

        let entries = Arc::new(normalize_catalog(&coins));
        {
            let mut state = self.state.write();
            state.entries = entries.clone();
            state.last_refreshed_at = Some(Utc::now());
        }

        logger::info(
            LogTag::Index,
            &format!(
                "Bubble index refreshed: {} entries ({} fetched) for {}",
                entries.len(),
                coins.len(),
                quote
            ),
        );

        if let Err(source) = snapshot::persist(&self.snapshot_path, &entries) {
            logger::warning(
                LogTag::Index,
                &format!(
                    "Failed to write snapshot {}: {}",
                    self.snapshot_path.display(),
                    source
                ),
            );
            return Err(IndexError::Persist {
                path: self.snapshot_path.clone(),
                source,
            });
        }

        Ok(entries)
    }

    /// Read this index's snapshot without touching memory; never fails
    pub fn load_from_disk(&self) -> Vec<CatalogEntry> {
        snapshot::load_from_disk(&self.snapshot_path)
    }

    /// Seed memory from the snapshot if nothing is loaded yet
    ///
    /// Leaves `last_refreshed_at` unset so the next `load` still refreshes.
    /// Returns the number of entries now in memory from disk (0 if memory
    /// was already populated or the snapshot was empty).
    pub fn warm_from_disk(&self) -> usize {
        if !self.state.read().entries.is_empty() {
            return 0;
        }

        let disk = self.load_from_disk();
        if disk.is_empty() {
            return 0;
        }

        let mut state = self.state.write();
        if !state.entries.is_empty() {
            return 0;
        }
        let count = disk.len();
        state.entries = Arc::new(disk);
        logger::debug(
            LogTag::Index,
            &format!("Warmed bubble index with {} entries from disk", count),
        );
        count
    }

    /// Force the next `load` to refresh; entries stay readable
    pub fn invalidate(&self) {
        self.state.write().last_refreshed_at = None;
    }
}

/// Read the snapshot at the default application path; never fails
pub fn load_from_disk() -> Vec<CatalogEntry> {
    snapshot::load_from_disk(&crate::paths::get_bubble_index_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::bubbles::types::BubbleCoin;
    use crate::errors::ApiError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct FixedSource {
        coins: parking_lot::Mutex<Vec<BubbleCoin>>,
        calls: AtomicUsize,
        fail: AtomicBool,
        delay: Duration,
    }

    impl FixedSource {
        fn new(coins: &[(&str, &str)]) -> Arc<Self> {
            Self::with_delay(coins, Duration::ZERO)
        }

        fn with_delay(coins: &[(&str, &str)], delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                coins: parking_lot::Mutex::new(to_coins(coins)),
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn set_coins(&self, coins: &[(&str, &str)]) {
            *self.coins.lock() = to_coins(coins);
        }
    }

    fn to_coins(coins: &[(&str, &str)]) -> Vec<BubbleCoin> {
        coins
            .iter()
            .map(|(id, symbol)| BubbleCoin {
                cg_id: id.to_string(),
                symbol: symbol.to_string(),
            })
            .collect()
    }

    #[async_trait]
    impl CatalogSource for FixedSource {
        async fn fetch_catalog(&self, _quote: &str) -> Result<Vec<BubbleCoin>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(ApiError::Network("connection reset".to_string()));
            }
            Ok(self.coins.lock().clone())
        }
    }

    fn index_in(dir: &TempDir, source: Arc<FixedSource>) -> BubbleIndex {
        BubbleIndex::new(source, dir.path().join("bubble_index.json"))
    }

    fn backdate(index: &BubbleIndex, minutes: i64) {
        index.state.write().last_refreshed_at = Some(Utc::now() - chrono::Duration::minutes(minutes));
    }

    #[tokio::test]
    async fn test_first_load_fetches_and_persists() {
        let dir = TempDir::new().unwrap();
        let source = FixedSource::new(&[("bitcoin", "BTC"), ("ethereum", "ETH")]);
        let index = index_in(&dir, source.clone());

        let entries = index.load("usd").await.unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(entries.len(), 2);
        assert!(index.last_refreshed_at().is_some());
        assert_eq!(index.load_from_disk(), *entries);
    }

    #[tokio::test]
    async fn test_recent_refresh_skips_network() {
        let dir = TempDir::new().unwrap();
        let source = FixedSource::new(&[("bitcoin", "btc")]);
        let index = index_in(&dir, source.clone());

        let first = index.load("usd").await.unwrap();
        backdate(&index, 10);
        source.set_coins(&[("dogecoin", "doge")]);

        let second = index.load("usd").await.unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_expired_refresh_fetches_again() {
        let dir = TempDir::new().unwrap();
        let source = FixedSource::new(&[("bitcoin", "btc")]);
        let index = index_in(&dir, source.clone());

        index.load("usd").await.unwrap();
        backdate(&index, 61);
        source.set_coins(&[("dogecoin", "doge")]);

        let entries = index.load("usd").await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(*entries, vec![CatalogEntry::new("dogecoin", "doge")]);
    }

    #[tokio::test]
    async fn test_empty_catalog_is_never_fresh() {
        let dir = TempDir::new().unwrap();
        let source = FixedSource::new(&[]);
        let index = index_in(&dir, source.clone());

        index.load("usd").await.unwrap();
        index.load("usd").await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_load_dedupes_in_source_order() {
        let dir = TempDir::new().unwrap();
        let source = FixedSource::new(&[
            ("bitcoin", "BTC"),
            ("bitcoin", "btc"),
            ("Bitcoin-Cash", "bch"),
        ]);
        let index = index_in(&dir, source);

        let entries = index.load("usd").await.unwrap();

        assert_eq!(
            *entries,
            vec![
                CatalogEntry::new("bitcoin", "btc"),
                CatalogEntry::new("bitcoin-cash", "bch"),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_state_unchanged() {
        let dir = TempDir::new().unwrap();
        let source = FixedSource::new(&[("bitcoin", "btc")]);
        let index = index_in(&dir, source.clone());

        let before = index.load("usd").await.unwrap();
        let stamp = index.last_refreshed_at();
        index.invalidate();
        source.fail.store(true, Ordering::SeqCst);

        let err = index.load("usd").await.unwrap_err();

        assert!(matches!(err, IndexError::Api(ref e) if e.is_network()));
        assert_eq!(index.entries(), before);
        assert!(index.last_refreshed_at().is_none());
        assert!(stamp.is_some());
        assert_eq!(index.load_from_disk(), *before);
    }

    #[tokio::test]
    async fn test_persist_failure_still_serves_fresh_entries() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let source = FixedSource::new(&[("ethereum", "eth")]);
        let index = BubbleIndex::new(source.clone(), blocker.join("bubble_index.json"));

        let err = index.load("usd").await.unwrap_err();
        assert!(err.is_persist());

        let entries = index.load("usd").await.unwrap();
        assert_eq!(source.calls(), 1);
        assert_eq!(*entries, vec![CatalogEntry::new("ethereum", "eth")]);
    }

    #[tokio::test]
    async fn test_snapshot_survives_a_fresh_index() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bubble_index.json");
        snapshot::persist(&path, &[CatalogEntry::new("ethereum", "eth")]).unwrap();

        let index = BubbleIndex::new(FixedSource::new(&[]), path);

        assert_eq!(index.load_from_disk(), vec![CatalogEntry::new("ethereum", "eth")]);
        assert!(index.entries().is_empty());
        assert!(index.last_refreshed_at().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bubble_index.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let index = BubbleIndex::new(FixedSource::new(&[]), path);

        assert!(index.load_from_disk().is_empty());
        assert_eq!(index.warm_from_disk(), 0);
    }

    #[tokio::test]
    async fn test_warm_from_disk_does_not_mark_fresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bubble_index.json");
        snapshot::persist(&path, &[CatalogEntry::new("bitcoin", "btc")]).unwrap();

        let source = FixedSource::new(&[("solana", "sol")]);
        let index = BubbleIndex::new(source.clone(), path);

        assert_eq!(index.warm_from_disk(), 1);
        assert_eq!(*index.entries(), vec![CatalogEntry::new("bitcoin", "btc")]);
        assert!(!index.is_fresh(Utc::now()));

        let entries = index.load("usd").await.unwrap();
        assert_eq!(source.calls(), 1);
        assert_eq!(*entries, vec![CatalogEntry::new("solana", "sol")]);
        assert_eq!(index.warm_from_disk(), 0);
    }

    #[tokio::test]
    async fn test_ttl_from_config() {
        let dir = TempDir::new().unwrap();
        let cfg = IndexConfig {
            ttl_secs: 60,
            snapshot_path: dir.path().join("idx.json").display().to_string(),
        };

        let index = BubbleIndex::from_config(FixedSource::new(&[("bitcoin", "btc")]), &cfg);

        assert_eq!(index.ttl(), Duration::from_secs(60));
        assert_eq!(index.snapshot_path(), dir.path().join("idx.json"));
        index.load("usd").await.unwrap();
        backdate(&index, 2);
        assert!(!index.is_fresh(Utc::now()));
    }

    #[tokio::test]
    async fn test_future_timestamp_counts_as_stale() {
        let dir = TempDir::new().unwrap();
        let index = index_in(&dir, FixedSource::new(&[("bitcoin", "btc")]));

        index.load("usd").await.unwrap();
        backdate(&index, -30);

        assert!(!index.is_fresh(Utc::now()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_loads_share_one_refresh() {
        let dir = TempDir::new().unwrap();
        let source = FixedSource::with_delay(&[("bitcoin", "btc")], Duration::from_millis(50));
        let index = Arc::new(index_in(&dir, source.clone()));

        let loads = (0..4).map(|_| {
            let index = index.clone();
            tokio::spawn(async move { index.load("usd").await })
        });
        let results = futures::future::join_all(loads).await;

        assert_eq!(source.calls(), 1);
        for result in results {
            assert_eq!(*result.unwrap().unwrap(), vec![CatalogEntry::new("bitcoin", "btc")]);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_readers_see_whole_snapshots() {
        let dir = TempDir::new().unwrap();
        let old: Vec<(&str, &str)> = vec![("bitcoin", "btc"), ("ethereum", "eth")];
        let new: Vec<(&str, &str)> = vec![("solana", "sol"), ("dogecoin", "doge"), ("tron", "trx")];

        let source = FixedSource::with_delay(&old, Duration::from_millis(5));
        let index = Arc::new(index_in(&dir, source.clone()));
        let old_entries = index.load("usd").await.unwrap();

        index.invalidate();
        source.set_coins(&new);

        let reader = {
            let index = index.clone();
            tokio::spawn(async move {
                let mut seen = Vec::new();
                for _ in 0..200 {
                    seen.push(index.entries());
                    tokio::task::yield_now().await;
                }
                seen
            })
        };

        let new_entries = index.load("usd").await.unwrap();
        let seen = reader.await.unwrap();

        for snapshot in seen {
            assert!(snapshot == old_entries || snapshot == new_entries);
        }
    }
}
