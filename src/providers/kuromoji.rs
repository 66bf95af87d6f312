use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{Analyzer, ServiceError, ServiceFuture, Token, http_client};

/// Morphological analyzer reached over HTTP.
///
/// The endpoint accepts `{"text": ...}` and answers with kuromoji-shaped
/// tokens: `{"tokens": [{"surface_form", "reading", "pos"}]}`.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct KuromojiHttp {
    url: String,
    client: reqwest::Client,
}

impl KuromojiHttp {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: http_client(DEFAULT_TIMEOUT),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }
}

impl Analyzer for KuromojiHttp {
    fn analyze<'a>(&'a self, text: &'a str) -> ServiceFuture<'a, Vec<Token>> {
        Box::pin(async move {
            debug!("analyzer request: {} ({} chars)", self.url, text.chars().count());
            let response = self
                .client
                .post(&self.url)
                .json(&json!({ "text": text }))
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(ServiceError::ServiceUnavailable(format!(
                    "analyzer error ({}): {}",
                    status, body
                )));
            }
            parse_tokens(&body)
        })
    }
}

pub(crate) fn parse_tokens(body: &str) -> Result<Vec<Token>, ServiceError> {
    let parsed: TokenResponse = serde_json::from_str(body)
        .map_err(|err| ServiceError::MalformedResponse(format!("invalid tokens: {}", err)))?;
    Ok(parsed.tokens)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    tokens: Vec<Token>,
}
