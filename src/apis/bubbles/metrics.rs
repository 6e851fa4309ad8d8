/// Tolerant decoding of per-coin metric records
///
/// The bubbles list has shipped the same value under several names and
/// types over time (`mc` vs `market_cap`, numbers vs "1,234.50" strings).
/// Each field is described by an ordered list of (key, parser) candidates;
/// the first candidate that is present AND parses wins.
use super::types::BubbleMetrics;
use crate::errors::ApiError;
use serde_json::{Map, Value};

type Record = Map<String, Value>;
type Parser<T> = fn(&Value) -> Option<T>;

const ID_FIELDS: &[(&str, Parser<i64>)] = &[("id", int_or_string)];

const SYMBOL_FIELDS: &[(&str, Parser<String>)] = &[("symbol", text), ("s", text)];

const RANK_FIELDS: &[(&str, Parser<i64>)] = &[
    ("r", int_or_string),
    ("rank", int_or_string),
    ("market_cap_rank", int_or_string),
];

const MARKET_CAP_FIELDS: &[(&str, Parser<f64>)] = &[
    ("mc", number_or_string),
    ("marketcap", number_or_string),
    ("market_cap", number_or_string),
    ("marketCap", number_or_string),
];

const VOLUME_FIELDS: &[(&str, Parser<f64>)] = &[
    ("v", number_or_string),
    ("volume", number_or_string),
    ("total_volume", number_or_string),
    ("volume24h", number_or_string),
    ("volume_24h", number_or_string),
    ("totalVolume", number_or_string),
];

const PRICE_FIELDS: &[(&str, Parser<f64>)] = &[("p", number_or_string), ("price", number_or_string)];

/// Return the first candidate value that is present and parses
fn first_parsed<T>(record: &Record, candidates: &[(&str, Parser<T>)]) -> Option<T> {
    candidates
        .iter()
        .find_map(|(key, parse)| record.get(*key).and_then(parse))
}

fn int_or_string(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn number_or_string(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_grouped_number(s),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Parse a number that may carry thousands separators or spaces
///
/// "1,234.50" and "1 234.50" both yield 1234.5.
pub fn parse_grouped_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != ' ').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl BubbleMetrics {
    /// Decode one record; non-objects decode to an empty record
    pub fn from_value(value: &Value) -> Self {
        let Some(record) = value.as_object() else {
            return Self::default();
        };

        Self {
            id: first_parsed(record, ID_FIELDS),
            symbol: first_parsed(record, SYMBOL_FIELDS),
            rank: first_parsed(record, RANK_FIELDS),
            market_cap: first_parsed(record, MARKET_CAP_FIELDS),
            volume: first_parsed(record, VOLUME_FIELDS),
            price: first_parsed(record, PRICE_FIELDS),
        }
    }
}

/// Decode a bubbles list body into metric records
///
/// The body must be a JSON array; individual records never fail.
pub fn decode_metrics_list(body: &[u8]) -> Result<Vec<BubbleMetrics>, ApiError> {
    let value: Value = serde_json::from_slice(body)?;
    match value {
        Value::Array(items) => Ok(items.iter().map(BubbleMetrics::from_value).collect()),
        other => Err(ApiError::Decode(format!(
            "expected a JSON array of metric records, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pick the record for a coin: numeric id first, then case-insensitive symbol
pub fn find_metrics(
    list: Vec<BubbleMetrics>,
    coin_id: Option<i64>,
    symbol: Option<&str>,
) -> Option<BubbleMetrics> {
    if let Some(id) = coin_id {
        if let Some(pos) = list.iter().position(|m| m.id == Some(id)) {
            return list.into_iter().nth(pos);
        }
    }

    let wanted = symbol?.to_uppercase();
    list.into_iter().find(|m| {
        m.symbol
            .as_deref()
            .map(|s| s.to_uppercase() == wanted)
            .unwrap_or(false)
    })
}
