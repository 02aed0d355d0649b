use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use tracing::warn;

use smsledger_core::{MatchReport, PatternDraft};

use crate::config::ClientConfig;
use crate::matcher::{Matcher, MatcherError};
use crate::store::{PatternStore, StoreError};

#[derive(Serialize)]
struct TestPatternRequest<'a> {
    content: &'a str,
    regex: &'a str,
}

/// HTTP client for the ledger API: `/test-pattern` and `/patterns`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.authorize(self.http.request(method, self.config.endpoint(path)))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.config.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// `<base_url>/patterns/<id>` with `id` percent-encoded as one path segment.
    fn pattern_url(&self, id: &str) -> Result<Url, StoreError> {
        if matches!(id, "" | "." | "..") {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        let mut url = Url::parse(&self.config.endpoint("patterns"))
            .map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

#[async_trait]
impl Matcher for ApiClient {
    async fn test(&self, content: &str, pattern: &str) -> Result<MatchReport, MatcherError> {
        let response = self
            .request(Method::POST, "test-pattern")
            .json(&TestPatternRequest { content, regex: pattern })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "matcher request failed");
            return Err(MatcherError::Status(status.as_u16()));
        }
        Ok(response.json::<MatchReport>().await?)
    }
}

#[async_trait]
impl PatternStore for ApiClient {
    async fn upsert(&self, draft: &PatternDraft) -> Result<(), StoreError> {
        let response = self
            .request(Method::POST, "patterns")
            .json(draft)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), name = %draft.name, "failed to save pattern");
            return Err(StoreError::Status(status.as_u16()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let url = self.pattern_url(id)?;
        let response = self
            .authorize(self.http.request(Method::DELETE, url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), id, "failed to delete pattern");
            return Err(StoreError::Status(status.as_u16()));
        }
        Ok(())
    }
}
