use serde::Serialize;
use tracing::{debug, warn};

use super::status::{self, Status};
use crate::kana;
use crate::providers::{Analyzer, TranslationRequest, TranslationService};
use crate::script;
use crate::transliterator::AnalyzerHandle;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub target_language: String,
    pub source_language: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            target_language: "ja".to_string(),
            source_language: None,
        }
    }
}

/// A degradation that happened on the way to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    TranslationUnavailable,
    TranslationFailed,
    AnalyzerFallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,
    pub output: String,
    pub notices: Vec<Notice>,
}

impl Conversion {
    pub fn status(&self) -> Status {
        if self.notices.contains(&Notice::TranslationUnavailable) {
            Status::failed(status::NO_API_KEY)
        } else if self.notices.contains(&Notice::TranslationFailed) {
            Status::failed(status::TRANSLATION_FAILED)
        } else if self.notices.contains(&Notice::AnalyzerFallback) {
            Status::failed(status::FALLBACK_USED)
        } else {
            Status::success(status::CONVERTED)
        }
    }
}

/// Translate-then-transliterate, degrading step by step instead of failing.
pub struct Converter<T, A> {
    translator: Option<T>,
    analyzer: AnalyzerHandle<A>,
    options: ConvertOptions,
}

impl<T: TranslationService, A: Analyzer> Converter<T, A> {
    pub fn new(translator: Option<T>, analyzer: AnalyzerHandle<A>) -> Self {
        Self {
            translator,
            analyzer,
            options: ConvertOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn analyzer(&self) -> &AnalyzerHandle<A> {
        &self.analyzer
    }

    pub fn has_translator(&self) -> bool {
        self.translator.is_some()
    }

    pub async fn convert(&self, text: &str) -> Conversion {
        let source = text.trim().to_string();
        let mut notices = Vec::new();

        let translated = if script::needs_translation(&source) {
            self.translate(&source, &mut notices).await
        } else {
            debug!("input is already Japanese; skipping translation");
            None
        };

        let japanese = translated.as_deref().unwrap_or(&source);
        let reading = match self.analyzer.transliterate(japanese).await {
            Ok(reading) => reading,
            Err(err) => {
                debug!("analyzer unusable ({}); using local fallback", err);
                notices.push(Notice::AnalyzerFallback);
                kana::force_katakana(japanese)
            }
        };

        Conversion {
            output: kana::final_check(&reading),
            source,
            translated,
            notices,
        }
    }

    async fn translate(&self, text: &str, notices: &mut Vec<Notice>) -> Option<String> {
        let Some(translator) = self.translator.as_ref() else {
            debug!("translation unavailable; transliterating original text");
            notices.push(Notice::TranslationUnavailable);
            return None;
        };
        let request = TranslationRequest {
            text: text.to_string(),
            target_language: self.options.target_language.clone(),
            source_language: self.options.source_language.clone(),
        };
        match translator.translate(request).await {
            Ok(response) => {
                debug!(
                    "translated from {}: {}",
                    response
                        .detected_source_language
                        .as_deref()
                        .unwrap_or("unknown"),
                    response.translated_text
                );
                Some(response.translated_text)
            }
            Err(err) => {
                warn!("translation failed: {}", err);
                notices.push(Notice::TranslationFailed);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ServiceError, ServiceFuture, Token, TranslationResponse};
    use crate::transliterator::AnalyzerState;

    struct StaticTranslator(Result<&'static str, ServiceError>);

    impl TranslationService for StaticTranslator {
        fn translate(&self, _request: TranslationRequest) -> ServiceFuture<'_, TranslationResponse> {
            let result = self.0.clone().map(|text| TranslationResponse {
                translated_text: text.to_string(),
                detected_source_language: Some("en".to_string()),
            });
            Box::pin(async move { result })
        }
    }

    struct EchoAnalyzer;

    impl Analyzer for EchoAnalyzer {
        fn analyze<'a>(&'a self, text: &'a str) -> ServiceFuture<'a, Vec<Token>> {
            Box::pin(async move { Ok(vec![Token::new(text, None)]) })
        }
    }

    #[tokio::test]
    async fn japanese_input_is_not_translated() {
        let converter = Converter::new(
            Some(StaticTranslator(Ok("使われない"))),
            AnalyzerHandle::<EchoAnalyzer>::disabled(),
        );
        let conversion = converter.convert("  一つ  ").await;
        assert_eq!(conversion.source, "一つ");
        assert_eq!(conversion.translated, None);
        assert_eq!(conversion.output, "イチツ");
        assert_eq!(conversion.notices, vec![Notice::AnalyzerFallback]);
        assert_eq!(conversion.status(), Status::failed(status::FALLBACK_USED));
    }

    #[tokio::test]
    async fn missing_translator_degrades_to_original_text() {
        let converter: Converter<StaticTranslator, EchoAnalyzer> =
            Converter::new(None, AnalyzerHandle::disabled());
        let conversion = converter.convert("hello").await;
        assert_eq!(conversion.output, "hello");
        assert_eq!(
            conversion.notices,
            vec![Notice::TranslationUnavailable, Notice::AnalyzerFallback]
        );
        assert_eq!(conversion.status().message, status::NO_API_KEY);
    }

    #[tokio::test]
    async fn analyzer_output_still_passes_final_check() {
        let analyzer = AnalyzerHandle::new(Some(EchoAnalyzer));
        assert_eq!(analyzer.initialize().await, AnalyzerState::Ready);
        let converter = Converter::new(Some(StaticTranslator(Ok("こんにちは世界"))), analyzer);
        let conversion = converter.convert("hello world").await;
        assert_eq!(conversion.translated.as_deref(), Some("こんにちは世界"));
        assert_eq!(conversion.output, "コンニチハセカイ");
        assert!(conversion.notices.is_empty());
        assert_eq!(conversion.status(), Status::success(status::CONVERTED));
    }

    /// Passes the readiness check, then answers with tokens that carry no text.
    struct BlankAnalyzer;

    impl Analyzer for BlankAnalyzer {
        fn analyze<'a>(&'a self, text: &'a str) -> ServiceFuture<'a, Vec<Token>> {
            Box::pin(async move {
                if text == crate::transliterator::PROBE_TEXT {
                    Ok(vec![Token::new(text, None)])
                } else {
                    Ok(vec![Token::new("", None)])
                }
            })
        }
    }

    #[tokio::test]
    async fn blank_analyzer_reading_uses_local_engine() {
        let analyzer = AnalyzerHandle::new(Some(BlankAnalyzer));
        assert_eq!(analyzer.initialize().await, AnalyzerState::Ready);
        let converter: Converter<StaticTranslator, BlankAnalyzer> =
            Converter::new(None, analyzer);
        let conversion = converter.convert("漢字のテスト一").await;
        assert_eq!(conversion.output, "カンジノテストイチ");
        assert_eq!(conversion.notices, vec![Notice::AnalyzerFallback]);
        assert_eq!(conversion.status(), Status::failed(status::FALLBACK_USED));
    }
}
