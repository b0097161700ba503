use async_trait::async_trait;
use query_core::Record;

/// Port for the domain layer: where raw collections come from.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Load every record of the named collection, in source order.
    async fn load(&self, collection: &str) -> anyhow::Result<Vec<Record>>;
}
