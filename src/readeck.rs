use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::config::Endpoint;
use crate::error::FetchError;
use crate::model::Bookmark;

pub struct ReadeckClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ReadeckClient {
    pub fn new(endpoint: &Endpoint) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: endpoint.get_url().to_string(),
            api_key: endpoint.get_api_key().to_string(),
        })
    }

    /// Lists every bookmark flagged as marked, in the order readeck returns them.
    pub async fn fetch_marked_bookmarks(&self) -> Result<Vec<Bookmark>, FetchError> {
        let url = format!("{}/api/bookmarks", self.base_url);
        tracing::info!("fetching marked bookmarks from {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("is_marked", "true")])
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status { status, body });
        }

        let bookmarks: Vec<Bookmark> = serde_json::from_str(&body)
            .map_err(|source| FetchError::Decode { body, source })?;
        tracing::info!("readeck returned {} marked bookmarks", bookmarks.len());
        Ok(bookmarks)
    }
}
