//! Records stored as `<resource>.json` files in a directory.

use std::path::PathBuf;

use async_trait::async_trait;
use fleet_table::{Record, RecordId, Value};
use log::{debug, info};

use super::{RecordSource, SourceError, close_envelope, open_envelope, parse_records};
use crate::resources::Resource;

/// Reads `<dir>/<resource path>.json`. A missing file is an empty resource.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file(&self, resource: Resource) -> PathBuf {
        self.dir.join(format!("{}.json", resource.path()))
    }

    async fn read(&self, resource: Resource) -> Result<Option<serde_json::Value>, SourceError> {
        let path = self.file(resource);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} does not exist, treating as empty", path.display());
                Ok(None)
            }
            Err(source) => Err(SourceError::Io { path, source }),
        }
    }
}

#[async_trait]
impl RecordSource for DirectorySource {
    async fn fetch(&self, resource: Resource) -> Result<Vec<Record>, SourceError> {
        let records = match self.read(resource).await? {
            Some(body) => parse_records(body)?,
            None => Vec::new(),
        };
        info!("Loaded {} {} from {}", records.len(), resource.path(), self.dir.display());
        Ok(records)
    }

    async fn delete(&self, resource: Resource, id: &RecordId) -> Result<(), SourceError> {
        let Some(body) = self.read(resource).await? else {
            return Err(SourceError::NotFound(id.clone()));
        };
        let (items, envelope) = open_envelope(body)?;

        // Match on ids stored in the file only. Ids synthesized at load time
        // are positional and shift once anything is removed.
        let before = items.len();
        let kept: Vec<serde_json::Value> = items
            .into_iter()
            .filter(|item| stored_id(item).as_ref() != Some(id))
            .collect();
        if kept.len() == before {
            return Err(SourceError::NotFound(id.clone()));
        }

        let path = self.file(resource);
        let json = serde_json::to_string_pretty(&close_envelope(kept, envelope))?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| SourceError::Io { path, source })?;
        info!("Deleted {} {} from {}", resource.noun(), id, self.dir.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("dir {}", self.dir.display())
    }
}

fn stored_id(item: &serde_json::Value) -> Option<RecordId> {
    item.get("id")
        .and_then(|id| RecordId::from_value(&Value::from(id.clone())))
}
