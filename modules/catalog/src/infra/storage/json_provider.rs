use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use query_core::Record;
use tracing::instrument;

use crate::domain::ports::DataProvider;

/// Reads `<data_dir>/<collection>.json`, a top-level JSON array of objects.
pub struct JsonFileProvider {
    data_dir: PathBuf,
}

impl JsonFileProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn file_for(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{collection}.json"))
    }
}

#[async_trait]
impl DataProvider for JsonFileProvider {
    #[instrument(
        name = "catalog.storage.json.load",
        skip_all,
        fields(collection = %collection)
    )]
    async fn load(&self, collection: &str) -> anyhow::Result<Vec<Record>> {
        let path = self.file_for(collection);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let records: Vec<Record> = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {} as an array of objects", path.display()))?;
        Ok(records)
    }
}
