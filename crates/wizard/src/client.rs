//! Access to the conditions API.

use api_shared::ApiResponse;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::state::{FetchRequest, FetchResponse};

/// Source of the data the wizard fetches.
#[async_trait]
pub trait ConditionsApi: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, ClientError>;
}

/// [`ConditionsApi`] over HTTP against a running REST server.
#[derive(Debug, Clone)]
pub struct HttpConditionsClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpConditionsClient {
    /// Creates a client for the server at `base_url`, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Distinct body areas held by the server.
    pub async fn body_areas(&self) -> Result<Vec<String>, ClientError> {
        self.get("/api/body-areas", &[] as &[(&str, &str)]).await
    }

    // Failed requests still answer with the JSON envelope, so the body is decoded whatever
    // the status code.
    async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let envelope: ApiResponse<T> = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await?
            .json()
            .await?;

        envelope.into_result().map_err(ClientError::Rejected)
    }
}

#[async_trait]
impl ConditionsApi for HttpConditionsClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, ClientError> {
        let params = request.params();
        let path = "/api/conditions";

        let response = match request {
            FetchRequest::Panels { .. } => FetchResponse::Panels(self.get(path, &params).await?),
            FetchRequest::Conditions { .. } => {
                FetchResponse::Conditions(self.get(path, &params).await?)
            }
            FetchRequest::Scenarios { .. } => {
                FetchResponse::Scenarios(self.get(path, &params).await?)
            }
            FetchRequest::Results { .. } => FetchResponse::Results(self.get(path, &params).await?),
        };

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_drops_trailing_slash() {
        let client = HttpConditionsClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = HttpConditionsClient::new("http://127.0.0.1:9");
        let err = client
            .fetch(&FetchRequest::Panels {
                age_group: api_shared::AgeGroup::Adult,
                body_area: "cardiac".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
