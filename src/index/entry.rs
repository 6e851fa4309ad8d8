/// Catalog entries and the normalisation applied to fetched coins
use crate::apis::bubbles::types::BubbleCoin;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One coin in the bubble index
///
/// Both fields are stored lowercase. Identity is the `(symbol, id)` pair:
/// one symbol may map to several ids and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub symbol: String,
}

impl CatalogEntry {
    pub fn new(id: &str, symbol: &str) -> Self {
        Self {
            id: id.to_lowercase(),
            symbol: symbol.to_lowercase(),
        }
    }

    /// "BTC — bitcoin"
    pub fn display(&self) -> String {
        format!("{} — {}", self.symbol.to_uppercase(), self.id)
    }
}

/// Lowercase and de-duplicate fetched coins
///
/// The first occurrence of each `(symbol, id)` pair wins and source order is
/// kept, so an unchanged remote list always yields the same entries.
pub fn normalize_catalog(coins: &[BubbleCoin]) -> Vec<CatalogEntry> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(coins.len());
    let mut entries = Vec::with_capacity(coins.len());

    for coin in coins {
        let entry = CatalogEntry::new(&coin.cg_id, &coin.symbol);
        if seen.insert((entry.symbol.clone(), entry.id.clone())) {
            entries.push(entry);
        }
    }

    entries
}
