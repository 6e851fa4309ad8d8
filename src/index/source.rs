use crate::apis::bubbles::types::BubbleCoin;
use crate::errors::ApiError;
use async_trait::async_trait;

/// Where the bubble index gets its catalog from
///
/// `BubblesClient` is the production source; tests plug in fixed lists.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self, quote: &str) -> Result<Vec<BubbleCoin>, ApiError>;
}
