/// Remote API clients
///
/// - `client` - shared reqwest wrapper with timeout and status/decode mapping
/// - `bubbles` - Crypto Bubbles backend (catalog, charts, metrics)
pub mod bubbles;
pub mod client;

pub use bubbles::BubblesClient;
pub use client::HttpClient;
