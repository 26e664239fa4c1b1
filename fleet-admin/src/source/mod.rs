//! Record sources: where the records of each resource come from.
//!
//! The backend is an external collaborator. Sources only speak its
//! request/response contract: a JSON array of objects per resource (optionally
//! wrapped as `{"data": [...]}`), and delete by id.

mod directory;
mod http;

pub use directory::DirectorySource;
pub use http::HttpSource;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use fleet_table::{Record, RecordId};
use thiserror::Error;

use crate::resources::Resource;
use crate::settings::SourceSettings;

/// Source error type.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("expected a JSON array of records")]
    UnexpectedShape,
    #[error("record {0} not found")]
    NotFound(RecordId),
}

/// Backend access for one kind of storage.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every record of a resource.
    async fn fetch(&self, resource: Resource) -> Result<Vec<Record>, SourceError>;

    /// Delete one record.
    async fn delete(&self, resource: Resource, id: &RecordId) -> Result<(), SourceError>;

    /// Short human-readable description, shown in the status line.
    fn describe(&self) -> String;
}

/// Build the source configured in settings.
pub fn from_settings(settings: &SourceSettings) -> Result<Arc<dyn RecordSource>, SourceError> {
    Ok(match settings {
        SourceSettings::Directory { path } => Arc::new(DirectorySource::new(path.clone())),
        SourceSettings::Http { base_url, token } => {
            Arc::new(HttpSource::new(base_url, token.clone())?)
        }
    })
}

/// Records of a response body plus, for the `{"data": [...]}` shape, the
/// rest of the envelope.
pub(crate) type Envelope = (
    Vec<serde_json::Value>,
    Option<serde_json::Map<String, serde_json::Value>>,
);

/// Split a body into its record array and the surrounding envelope, if any.
pub(crate) fn open_envelope(body: serde_json::Value) -> Result<Envelope, SourceError> {
    match body {
        serde_json::Value::Array(items) => Ok((items, None)),
        serde_json::Value::Object(mut map) => match map.remove("data") {
            Some(serde_json::Value::Array(items)) => Ok((items, Some(map))),
            _ => Err(SourceError::UnexpectedShape),
        },
        _ => Err(SourceError::UnexpectedShape),
    }
}

/// Inverse of [`open_envelope`].
pub(crate) fn close_envelope(
    items: Vec<serde_json::Value>,
    envelope: Option<serde_json::Map<String, serde_json::Value>>,
) -> serde_json::Value {
    match envelope {
        Some(mut map) => {
            map.insert("data".to_string(), serde_json::Value::Array(items));
            serde_json::Value::Object(map)
        }
        None => serde_json::Value::Array(items),
    }
}

/// Turn a response body into records.
///
/// Accepts a bare array or an object with a `data` array.
pub fn parse_records(body: serde_json::Value) -> Result<Vec<Record>, SourceError> {
    let (items, _) = open_envelope(body)?;
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(ordinal, item)| Record::from_json(item, ordinal))
        .collect())
}
