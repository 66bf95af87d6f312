use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};

use crate::kana;
use crate::providers::retry::wait_with_backoff;
use crate::providers::{Analyzer, ServiceError, Token};

/// Sample sentence used to check that the analyzer really produces readings.
pub const PROBE_TEXT: &str = "漢字のテスト";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerState {
    Pending,
    Ready,
    Failed,
}

/// Owns the morphological analyzer and its initialization state.
///
/// The analyzer is only used once [`AnalyzerHandle::initialize`] has settled
/// in [`AnalyzerState::Ready`]; every other state makes
/// [`AnalyzerHandle::transliterate`] fail with [`ServiceError::NotInitialized`].
pub struct AnalyzerHandle<A> {
    analyzer: Option<A>,
    state: Mutex<AnalyzerState>,
    max_attempts: usize,
    initial_delay: Duration,
}

impl<A: Analyzer> AnalyzerHandle<A> {
    pub fn new(analyzer: Option<A>) -> Self {
        Self {
            analyzer,
            state: Mutex::new(AnalyzerState::Pending),
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn with_retry(mut self, max_attempts: usize, initial_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.initial_delay = initial_delay;
        self
    }

    pub fn state(&self) -> AnalyzerState {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_state(&self, state: AnalyzerState) {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }

    pub fn is_available(&self) -> bool {
        self.state() == AnalyzerState::Ready
    }

    /// Probes the analyzer with bounded retries and settles in `Ready` or `Failed`.
    pub async fn initialize(&self) -> AnalyzerState {
        if self.state() == AnalyzerState::Ready {
            return AnalyzerState::Ready;
        }
        let Some(analyzer) = self.analyzer.as_ref() else {
            info!("no analyzer configured; using local fallback only");
            self.set_state(AnalyzerState::Failed);
            return AnalyzerState::Failed;
        };

        let mut delay = self.initial_delay;
        for attempt in 1..=self.max_attempts {
            match analyzer.analyze(PROBE_TEXT).await {
                Ok(tokens) => match tokens_to_katakana(&tokens) {
                    Some(reading) => {
                        info!("analyzer ready; probe reading: {}", reading);
                        self.set_state(AnalyzerState::Ready);
                        return AnalyzerState::Ready;
                    }
                    None => warn!("analyzer probe returned no reading"),
                },
                Err(err) => warn!("analyzer probe failed: {}", err),
            }
            if attempt < self.max_attempts {
                delay = wait_with_backoff("analyzer", attempt, self.max_attempts, delay).await;
            }
        }
        self.set_state(AnalyzerState::Failed);
        AnalyzerState::Failed
    }

    pub async fn transliterate(&self, text: &str) -> Result<String, ServiceError> {
        if !self.is_available() {
            return Err(ServiceError::NotInitialized);
        }
        let analyzer = self.analyzer.as_ref().ok_or(ServiceError::NotInitialized)?;
        let tokens = analyzer.analyze(text).await?;
        tokens_to_katakana(&tokens).ok_or_else(|| {
            ServiceError::MalformedResponse("analyzer returned no reading".to_string())
        })
    }
}

/// Joins token readings; tokens without a usable reading keep their surface.
/// Returns `None` when nothing readable remains.
pub fn tokens_to_katakana(tokens: &[Token]) -> Option<String> {
    let joined = tokens
        .iter()
        .map(|token| {
            token
                .reading
                .as_deref()
                .filter(|reading| !reading.is_empty() && *reading != "*")
                .unwrap_or(token.surface.as_str())
        })
        .collect::<String>();
    if joined.trim().is_empty() {
        return None;
    }
    Some(kana::hiragana_to_katakana(&joined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ServiceFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyAnalyzer {
        failures_before_ready: usize,
        calls: AtomicUsize,
    }

    impl Analyzer for FlakyAnalyzer {
        fn analyze<'a>(&'a self, text: &'a str) -> ServiceFuture<'a, Vec<Token>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let ready = call >= self.failures_before_ready;
            Box::pin(async move {
                if !ready {
                    return Err(ServiceError::ServiceUnavailable("loading".to_string()));
                }
                Ok(vec![Token::new(text, Some("かんじのテスト"))])
            })
        }
    }

    fn flaky(failures_before_ready: usize) -> FlakyAnalyzer {
        FlakyAnalyzer {
            failures_before_ready,
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn initialize_retries_until_ready() {
        let handle = AnalyzerHandle::new(Some(flaky(2))).with_retry(3, Duration::from_millis(100));
        assert_eq!(handle.state(), AnalyzerState::Pending);
        assert_eq!(handle.initialize().await, AnalyzerState::Ready);
        assert!(handle.is_available());
        assert_eq!(
            handle.transliterate("漢字").await.as_deref(),
            Ok("カンジノテスト")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn initialize_gives_up_after_bounded_attempts() {
        let analyzer = flaky(10);
        let handle = AnalyzerHandle::new(Some(analyzer)).with_retry(3, Duration::from_millis(100));
        assert_eq!(handle.initialize().await, AnalyzerState::Failed);
        assert_eq!(
            handle.analyzer.as_ref().map(|a| a.calls.load(Ordering::SeqCst)),
            Some(3)
        );
        assert_eq!(
            handle.transliterate("漢字").await,
            Err(ServiceError::NotInitialized)
        );
    }

    #[tokio::test]
    async fn missing_analyzer_fails_immediately() {
        let handle: AnalyzerHandle<FlakyAnalyzer> = AnalyzerHandle::disabled();
        assert_eq!(handle.initialize().await, AnalyzerState::Failed);
        assert!(!handle.is_available());
    }

    #[test]
    fn tokens_prefer_reading_over_surface() {
        let tokens = vec![
            Token::new("東京", Some("トウキョウ")),
            Token::new("へ", Some("へ")),
            Token::new("Rust", Some("*")),
            Token::new(" ", None),
            Token::new("いく", None),
        ];
        assert_eq!(
            tokens_to_katakana(&tokens).as_deref(),
            Some("トウキョウヘRust イク")
        );
        assert_eq!(tokens_to_katakana(&[]), None);
        assert_eq!(
            tokens_to_katakana(&[Token::new("", None), Token::new(" ", Some("*"))]),
            None
        );
    }
}
