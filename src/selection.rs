/// Coin selection, lookup and search over the bubble index
///
/// The selection is stored as a comma-separated list of lowercase symbols
/// (the `coins` config value). Users may type either a ticker ("btc") or a
/// catalog id ("bitcoin"); both resolve to the symbol.
use crate::index::CatalogEntry;
use std::collections::{HashMap, HashSet};

/// Default cap on selected coins
pub const DEFAULT_MAX_SELECTED: usize = 30;

/// Default number of rows shown by the search list
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Default number of completions offered while typing
pub const DEFAULT_COMPLETION_LIMIT: usize = 12;

fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

// =============================================================================
// LOOKUP
// =============================================================================

/// Symbol and id lookup tables built from a catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogLookup {
    symbols: HashSet<String>,
    id_to_symbol: HashMap<String, String>,
}

impl CatalogLookup {
    /// The first entry for an id decides its symbol
    pub fn from_entries(entries: &[CatalogEntry]) -> Self {
        let mut lookup = Self::default();
        for entry in entries {
            lookup.symbols.insert(entry.symbol.clone());
            lookup
                .id_to_symbol
                .entry(entry.id.clone())
                .or_insert_with(|| entry.symbol.clone());
        }
        lookup
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn symbol_for_id(&self, id: &str) -> Option<&str> {
        self.id_to_symbol.get(id).map(String::as_str)
    }

    /// Resolve user input to a known symbol
    ///
    /// A known symbol resolves to itself, a known id to its symbol.
    pub fn resolve(&self, query: &str) -> Option<String> {
        let needle = normalize_query(query);
        if needle.is_empty() {
            return None;
        }
        if self.symbols.contains(&needle) {
            return Some(needle);
        }
        self.id_to_symbol.get(&needle).cloned()
    }
}

// =============================================================================
// SELECTION
// =============================================================================

/// Ordered, capped list of selected symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSelection {
    symbols: Vec<String>,
    limit: usize,
}

impl CoinSelection {
    pub fn new(limit: usize) -> Self {
        Self {
            symbols: Vec::new(),
            limit,
        }
    }

    /// Parse a stored CSV value
    ///
    /// Entries are trimmed and lowercased; empties and repeats are dropped
    /// and the list is cut at `limit`.
    pub fn from_csv(csv: &str, limit: usize) -> Self {
        let mut selection = Self::new(limit);
        for raw in csv.split(',') {
            let symbol = normalize_query(raw);
            if symbol.is_empty() || selection.symbols.contains(&symbol) {
                continue;
            }
            if selection.is_full() {
                break;
            }
            selection.symbols.push(symbol);
        }
        selection
    }

    pub fn to_csv(&self) -> String {
        self.symbols.join(",")
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.symbols.len() >= self.limit
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// Add a symbol from the catalog; returns whether it was added
    pub fn add(&mut self, symbol: &str, lookup: &CatalogLookup) -> bool {
        let symbol = normalize_query(symbol);
        if !lookup.contains_symbol(&symbol) || self.contains(&symbol) || self.is_full() {
            return false;
        }
        self.symbols.push(symbol);
        true
    }

    /// Resolve a typed symbol or id, then add it
    pub fn add_query(&mut self, query: &str, lookup: &CatalogLookup) -> Option<String> {
        let symbol = lookup.resolve(query)?;
        if self.add(&symbol, lookup) {
            Some(symbol)
        } else {
            None
        }
    }

    pub fn remove(&mut self, symbol: &str) -> bool {
        let symbol = normalize_query(symbol);
        let before = self.symbols.len();
        self.symbols.retain(|s| *s != symbol);
        self.symbols.len() != before
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    /// Drop symbols that the catalog no longer lists
    pub fn retain_known(&mut self, lookup: &CatalogLookup) -> usize {
        let before = self.symbols.len();
        self.symbols.retain(|s| lookup.contains_symbol(s));
        before - self.symbols.len()
    }

    /// Catalog entries whose symbol is selected, in catalog order
    pub fn selected_entries<'a>(&self, entries: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
        entries.iter().filter(|e| self.contains(&e.symbol)).collect()
    }
}

impl Default for CoinSelection {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SELECTED)
    }
}

// =============================================================================
// EDITING
// =============================================================================

/// What happened to each requested change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditReport {
    /// Stored symbols the catalog no longer lists
    pub dropped: usize,
    pub added: Vec<String>,
    pub already_selected: Vec<String>,
    pub unknown: Vec<String>,
    /// Known, unselected coins refused because the list was full
    pub over_limit: Vec<String>,
}

/// Apply clear, removals and additions to a selection
///
/// Delisted symbols are pruned first when the catalog is non-empty. An
/// addition that is already selected is reported as such even when the list
/// is full.
pub fn apply_edits(
    selection: &mut CoinSelection,
    lookup: &CatalogLookup,
    clear: bool,
    remove: &[String],
    add: &[String],
) -> EditReport {
    let mut report = EditReport::default();

    if !lookup.is_empty() {
        report.dropped = selection.retain_known(lookup);
    }
    if clear {
        selection.clear();
    }
    for symbol in remove {
        selection.remove(symbol);
    }

    for query in add {
        match lookup.resolve(query) {
            None => report.unknown.push(query.clone()),
            Some(symbol) if selection.contains(&symbol) => report.already_selected.push(symbol),
            Some(symbol) if selection.is_full() => report.over_limit.push(symbol),
            Some(symbol) => {
                if selection.add(&symbol, lookup) {
                    report.added.push(symbol);
                }
            }
        }
    }

    report
}

// =============================================================================
// SEARCH
// =============================================================================

/// Entries whose symbol or id contains the query, at most `limit`
///
/// An empty query lists the first `limit` entries.
pub fn filter_entries<'a>(
    entries: &'a [CatalogEntry],
    query: &str,
    limit: usize,
) -> Vec<&'a CatalogEntry> {
    let needle = normalize_query(query);
    entries
        .iter()
        .filter(|e| needle.is_empty() || e.symbol.contains(&needle) || e.id.contains(&needle))
        .take(limit)
        .collect()
}

/// Uppercase symbol completions for partially typed input
///
/// Symbol matches come first; id matches top the list up to `max` with
/// symbols not already offered.
pub fn completions(entries: &[CatalogEntry], query: &str, max: usize) -> Vec<String> {
    let needle = normalize_query(query);
    if needle.is_empty() || max == 0 {
        return Vec::new();
    }

    let by_symbol = entries.iter().filter(|e| e.symbol.contains(&needle));
    let by_id = entries.iter().filter(|e| e.id.contains(&needle));

    let mut hits: Vec<String> = Vec::new();
    for entry in by_symbol.chain(by_id) {
        if hits.len() >= max {
            break;
        }
        if !hits.contains(&entry.symbol) {
            hits.push(entry.symbol.clone());
        }
    }

    hits.into_iter().map(|s| s.to_uppercase()).collect()
}
