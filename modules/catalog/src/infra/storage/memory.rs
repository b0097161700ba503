use std::collections::HashMap;

use async_trait::async_trait;
use query_core::Record;
use serde_json::Value;

use crate::domain::ports::DataProvider;

/// Provider over collections held in memory. Used by tests and embedders
/// that already have the data at hand.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProvider {
    collections: HashMap<String, Vec<Record>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, collection: &str, records: Vec<Record>) -> Self {
        self.collections.insert(collection.to_string(), records);
        self
    }

    /// Like [`with`](Self::with) but takes a JSON array; non-object entries are skipped.
    pub fn with_json(self, collection: &str, value: Value) -> Self {
        let records = match value {
            Value::Array(entries) => entries
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        self.with(collection, records)
    }
}

#[async_trait]
impl DataProvider for InMemoryProvider {
    async fn load(&self, collection: &str) -> anyhow::Result<Vec<Record>> {
        self.collections
            .get(collection)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown collection '{collection}'"))
    }
}
