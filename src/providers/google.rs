use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use super::{
    ServiceError, ServiceFuture, TranslationRequest, TranslationResponse, TranslationService,
    http_client,
};
use crate::settings::Settings;

const DEFAULT_BASE_URL: &str = "https://translation.googleapis.com";
const TRANSLATE_PATH: &str = "/language/translate/v2";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Google Cloud Translation (v2, API key auth).
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GoogleTranslate {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: http_client(DEFAULT_TIMEOUT),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if !trimmed.is_empty() {
            self.base_url = trimmed.to_string();
        }
        self
    }

    /// Builds the client from settings; `override_key` wins over settings and env.
    pub fn from_settings(
        settings: &Settings,
        override_key: Option<&str>,
    ) -> Result<Self, ServiceError> {
        let key = override_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .or_else(|| settings.translation_key.clone())
            .ok_or(ServiceError::ConfigurationMissing("translation API key"))?;
        let mut translator = Self::new(key).with_timeout(settings.translation_timeout);
        if let Some(base_url) = settings.translation_base_url.as_deref() {
            translator = translator.with_base_url(base_url);
        }
        Ok(translator)
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, TRANSLATE_PATH)
    }
}

impl TranslationService for GoogleTranslate {
    fn translate(&self, request: TranslationRequest) -> ServiceFuture<'_, TranslationResponse> {
        Box::pin(async move {
            let url = self.endpoint();
            debug!("Google Translate request: {}?key=***", url);

            let mut body = json!({
                "q": request.text,
                "target": request.target_language,
                "format": "text",
            });
            if let Some(source) = request.source_language.as_deref() {
                body["source"] = Value::String(source.to_string());
            }

            let response = self
                .client
                .post(&url)
                .query(&[("key", self.key.as_str())])
                .json(&body)
                .send()
                .await
                .map_err(|err| ServiceError::ServiceUnavailable(err.without_url().to_string()))?;

            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            if !status.is_success() {
                return Err(ServiceError::ServiceUnavailable(format!(
                    "Google Translate API error ({}): {}",
                    status,
                    extract_google_error(&text).unwrap_or(text)
                )));
            }
            extract_translation(&text)
        })
    }
}

pub(crate) fn extract_translation(text: &str) -> Result<TranslationResponse, ServiceError> {
    let parsed: GoogleResponse = serde_json::from_str(text)
        .map_err(|err| ServiceError::MalformedResponse(format!("invalid JSON: {}", err)))?;
    let first = parsed
        .data
        .and_then(|data| data.translations.into_iter().next())
        .ok_or_else(|| ServiceError::MalformedResponse("no translations in response".to_string()))?;
    let translated_text = first.translated_text.unwrap_or_default();
    if translated_text.trim().is_empty() {
        return Err(ServiceError::MalformedResponse(
            "translation is empty".to_string(),
        ));
    }
    Ok(TranslationResponse {
        translated_text,
        detected_source_language: first.detected_source_language,
    })
}

fn extract_google_error(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    data: Option<GoogleData>,
}

#[derive(Debug, Deserialize)]
struct GoogleData {
    #[serde(default)]
    translations: Vec<GoogleTranslation>,
}

#[derive(Debug, Deserialize)]
struct GoogleTranslation {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
    #[serde(rename = "detectedSourceLanguage")]
    detected_source_language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_translation() {
        let payload = r#"{
            "data": {
                "translations": [
                    {"translatedText": "こんにちは", "detectedSourceLanguage": "en"}
                ]
            }
        }"#;
        let response = extract_translation(payload).expect("translation");
        assert_eq!(response.translated_text, "こんにちは");
        assert_eq!(response.detected_source_language.as_deref(), Some("en"));
    }

    #[test]
    fn missing_translations_is_malformed() {
        for payload in [
            r#"{"data": {"translations": []}}"#,
            r#"{"data": {"translations": [{"translatedText": "  "}]}}"#,
            r#"{"unexpected": true}"#,
            "<html>",
        ] {
            let err = extract_translation(payload).unwrap_err();
            assert!(
                matches!(err, ServiceError::MalformedResponse(_)),
                "{payload}: {err:?}"
            );
        }
    }

    #[test]
    fn error_message_is_pulled_from_body() {
        let payload = r#"{"error": {"code": 400, "message": "API key not valid."}}"#;
        assert_eq!(
            extract_google_error(payload).as_deref(),
            Some("API key not valid.")
        );
        assert_eq!(extract_google_error("oops"), None);
    }

    #[test]
    fn missing_key_is_configuration_error() {
        let settings = Settings::default();
        let err = GoogleTranslate::from_settings(&settings, None).unwrap_err();
        assert_eq!(
            err,
            ServiceError::ConfigurationMissing("translation API key")
        );

        let translator = GoogleTranslate::from_settings(&settings, Some("abc"))
            .expect("override key")
            .with_base_url("http://localhost:1234/");
        assert_eq!(
            translator.endpoint(),
            "http://localhost:1234/language/translate/v2"
        );
    }

    #[tokio::test]
    async fn silent_service_times_out_as_unavailable() {
        let base_url = crate::test_util::silent_server().await;
        let translator = GoogleTranslate::new("key")
            .with_base_url(base_url)
            .with_timeout(Duration::from_millis(200));
        let err = translator
            .translate(TranslationRequest {
                text: "hello".to_string(),
                target_language: "ja".to_string(),
                source_language: None,
            })
            .await
            .unwrap_err();
        assert!(
            matches!(err, ServiceError::ServiceUnavailable(_)),
            "{err:?}"
        );
        assert!(!err.to_string().contains("key=key"));
    }
}
