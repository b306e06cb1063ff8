//! HTTP client for the card store service.

use flipdeck_core::{Card, CardStore, CardUpdate, NewCard};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Client errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

impl From<ClientError> for flipdeck_core::Error {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Backend { status: 404, message } => flipdeck_core::Error::NotFound(message),
            other => flipdeck_core::Error::Store(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CardList {
    cards: Vec<Card>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Card store reached over HTTP.
#[derive(Clone)]
pub struct HttpCardStore {
    client: Client,
    base: Url,
}

impl HttpCardStore {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn card_url(&self, id: &str) -> Result<Url, ClientError> {
        self.url(&["api", "cards", id])
    }

    /// Check if the backend is reachable.
    pub async fn check_connectivity(&self) -> Result<bool, ClientError> {
        match self.client.get(self.url(&["health"])?).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) => Err(ClientError::Network(e.to_string())),
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let resp = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        tracing::debug!(status = status.as_u16(), %message, "backend rejected request");
        Err(ClientError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        self.execute(request)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

impl CardStore for HttpCardStore {
    async fn list(&self) -> flipdeck_core::Result<Vec<Card>> {
        let list: CardList = self.fetch(self.client.get(self.url(&["api", "cards"])?)).await?;
        Ok(list.cards)
    }

    async fn create(&self, card: NewCard) -> flipdeck_core::Result<Card> {
        let request = self.client.post(self.url(&["api", "cards"])?).json(&card);
        Ok(self.fetch(request).await?)
    }

    async fn update(&self, id: &str, update: CardUpdate) -> flipdeck_core::Result<Card> {
        let request = self.client.patch(self.card_url(id)?).json(&update);
        Ok(self.fetch(request).await?)
    }

    async fn delete(&self, id: &str) -> flipdeck_core::Result<()> {
        let resp = self.execute(self.client.delete(self.card_url(id)?)).await?;
        if resp.status() != StatusCode::NO_CONTENT {
            tracing::debug!(status = resp.status().as_u16(), "unexpected delete status");
        }
        Ok(())
    }
}
