//! Records served by the REST backend.

use std::time::Duration;

use async_trait::async_trait;
use fleet_table::{Record, RecordId};
use log::{debug, info};
use reqwest::{Client, RequestBuilder};
use url::Url;

use super::{RecordSource, SourceError, parse_records};
use crate::resources::Resource;

const TIMEOUT: Duration = Duration::from_secs(30);

/// `GET {base}/{resource}` and `DELETE {base}/{resource}/{id}`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpSource {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, SourceError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// URL of a resource collection, or of one record in it.
    pub fn url(&self, resource: Resource, id: Option<&RecordId>) -> Result<Url, SourceError> {
        let relative = match id {
            Some(id) => format!("{}/{}", resource.path(), urlencoding::encode(id.as_str())),
            None => resource.path().to_string(),
        };
        Ok(self.base_url.join(&relative)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    async fn fetch(&self, resource: Resource) -> Result<Vec<Record>, SourceError> {
        let url = self.url(resource, None)?;
        debug!("GET {}", url);
        let body: serde_json::Value = self
            .authorize(self.client.get(url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let records = parse_records(body)?;
        info!("Loaded {} {} from {}", records.len(), resource.path(), self.base_url);
        Ok(records)
    }

    async fn delete(&self, resource: Resource, id: &RecordId) -> Result<(), SourceError> {
        let url = self.url(resource, Some(id))?;
        debug!("DELETE {}", url);
        let response = self.authorize(self.client.delete(url)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(id.clone()));
        }
        response.error_for_status()?;
        info!("Deleted {} {}", resource.noun(), id);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("api {}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_without_trailing_slash_keeps_its_path() {
        let source = HttpSource::new("https://fleet.example.com/api", None).unwrap();
        let url = source.url(Resource::Vehicles, None).unwrap();
        assert_eq!(url.as_str(), "https://fleet.example.com/api/vehicles");
    }

    #[test]
    fn record_ids_are_escaped() {
        let source = HttpSource::new("https://fleet.example.com/api/", None).unwrap();
        let url = source
            .url(Resource::Tickets, Some(&RecordId::from("a/b 1")))
            .unwrap();
        assert_eq!(url.as_str(), "https://fleet.example.com/api/tickets/a%2Fb%201");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            HttpSource::new("fleet", None),
            Err(SourceError::Url(_))
        ));
    }
}
