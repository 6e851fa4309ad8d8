/// Display helpers for metrics and user-entered amounts
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Placeholder for missing values
pub const DASH: &str = "—";

const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

fn is_usd(quote: &str) -> bool {
    quote.trim().eq_ignore_ascii_case("usd")
}

/// Compact money string such as `$1.23B`
///
/// Absent, zero and negative values render as a dash. Below one thousand the
/// plain amount is shown; non-USD quotes carry their code as a suffix.
pub fn compact_fiat(value: Option<f64>, quote: &str) -> String {
    let x = match value {
        Some(x) if x > 0.0 && x.is_finite() => x,
        _ => return DASH.to_string(),
    };

    let prefix = if is_usd(quote) { "$" } else { "" };
    for (limit, suffix) in UNITS {
        if x >= limit {
            return format!("{}{:.2}{}", prefix, x / limit, suffix);
        }
    }

    if is_usd(quote) {
        format!("${:.2}", x)
    } else {
        format!("{:.2} {}", x, quote.trim().to_uppercase())
    }
}

/// Parse a typed amount, ignoring grouping commas
///
/// `"1,234.5"` and `"12."` parse; empty input and a lone `.` do not.
pub fn parse_clean_decimal(input: &str) -> Option<Decimal> {
    let filtered: String = input.trim().chars().filter(|c| *c != ',').collect();
    if filtered.is_empty() || filtered == "." {
        return None;
    }

    Decimal::from_str(&filtered).ok().or_else(|| {
        filtered
            .strip_suffix('.')
            .and_then(|head| Decimal::from_str(head).ok())
    })
}

/// Value of `amount` coins at `price`; absent for a non-positive price
pub fn fiat_value(amount: Decimal, price: f64) -> Option<f64> {
    if price.is_nan() || price <= 0.0 {
        return None;
    }
    let price = Decimal::from_f64(price)?;
    amount.checked_mul(price)?.to_f64()
}

pub fn int_or_dash(value: Option<i64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_else(|| DASH.to_string())
}

/// Signed percent with two decimals, e.g. `+4.20%`
pub fn signed_percent(value: f64) -> String {
    format!("{:+.2}%", value)
}
