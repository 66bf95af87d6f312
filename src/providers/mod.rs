use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

mod google;
mod kuromoji;
pub(crate) mod retry;

pub use google::GoogleTranslate;
pub use kuromoji::KuromojiHttp;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0} is not configured")]
    ConfigurationMissing(&'static str),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("analyzer is not initialized")]
    NotInitialized,
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::MalformedResponse(err.to_string())
        } else {
            ServiceError::ServiceUnavailable(err.to_string())
        }
    }
}

/// HTTP client whose requests give up after `timeout`.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ServiceError>> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub target_language: String,
    pub source_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResponse {
    pub translated_text: String,
    pub detected_source_language: Option<String>,
}

/// One morpheme as reported by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "surface_form", alias = "surface")]
    pub surface: String,
    #[serde(default)]
    pub reading: Option<String>,
    #[serde(default, rename = "pos", alias = "part_of_speech")]
    pub part_of_speech: Option<String>,
}

impl Token {
    pub fn new(surface: impl Into<String>, reading: Option<&str>) -> Self {
        Self {
            surface: surface.into(),
            reading: reading.map(str::to_string),
            part_of_speech: None,
        }
    }
}

pub trait TranslationService: Send + Sync {
    fn translate(&self, request: TranslationRequest) -> ServiceFuture<'_, TranslationResponse>;
}

pub trait Analyzer: Send + Sync {
    fn analyze<'a>(&'a self, text: &'a str) -> ServiceFuture<'a, Vec<Token>>;
}

impl<T: TranslationService + ?Sized> TranslationService for std::sync::Arc<T> {
    fn translate(&self, request: TranslationRequest) -> ServiceFuture<'_, TranslationResponse> {
        (**self).translate(request)
    }
}

impl<A: Analyzer + ?Sized> Analyzer for std::sync::Arc<A> {
    fn analyze<'a>(&'a self, text: &'a str) -> ServiceFuture<'a, Vec<Token>> {
        (**self).analyze(text)
    }
}
