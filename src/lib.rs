use anyhow::{Result, anyhow};
use std::path::Path;
use tracing::{info, warn};

pub mod clipboard;
pub mod kana;
pub mod logging;
pub mod pipeline;
pub mod providers;
pub mod script;
pub mod server;
pub mod settings;
mod test_util;
pub mod transliterator;

pub use pipeline::{Conversion, ConvertOptions, Converter, Notice, Pipeline};
pub use providers::{GoogleTranslate, KuromojiHttp, ServiceError};
pub use transliterator::{AnalyzerHandle, AnalyzerState};

use clipboard::{Clipboard, SystemClipboard};
use pipeline::StatusKind;

/// Converter wired to the real collaborators.
pub type AppConverter = Converter<GoogleTranslate, KuromojiHttp>;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub key: Option<String>,
    pub source_lang: Option<String>,
    pub no_translate: bool,
    pub analyzer_url: Option<String>,
    pub settings_path: Option<String>,
    pub copy: bool,
}

pub fn load_settings(config: &Config) -> Result<settings::Settings> {
    let settings_path = config.settings_path.as_deref().map(Path::new);
    settings::load_settings(settings_path)
}

pub fn build_converter(config: &Config, settings: &settings::Settings) -> AppConverter {
    let translator = if config.no_translate {
        None
    } else {
        match GoogleTranslate::from_settings(settings, config.key.as_deref()) {
            Ok(translator) => Some(translator),
            Err(err) => {
                warn!("{}; translation disabled", err);
                None
            }
        }
    };

    let analyzer_url = config
        .analyzer_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .or_else(|| settings.analyzer_url.clone());
    let analyzer = AnalyzerHandle::new(
        analyzer_url.map(|url| KuromojiHttp::new(url).with_timeout(settings.analyzer_timeout)),
    )
        .with_retry(settings.analyzer_init_attempts, settings.analyzer_init_delay);

    let source_language = match config.source_lang.as_deref().map(str::trim) {
        Some(lang) if lang.eq_ignore_ascii_case("auto") => None,
        Some(lang) if !lang.is_empty() => Some(lang.to_string()),
        _ => settings.source_lang.clone(),
    };
    let options = ConvertOptions {
        target_language: settings.target_lang.clone(),
        source_language,
    };
    Converter::new(translator, analyzer).with_options(options)
}

/// Converts one input and returns the katakana output.
pub async fn run(config: Config, input: Option<String>) -> Result<String> {
    let settings = load_settings(&config)?;
    let input = input.unwrap_or_default();
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("stdin is empty"));
    }

    let converter = build_converter(&config, &settings);
    let state = converter.analyzer().initialize().await;
    info!("analyzer state: {:?}", state);

    let conversion = converter.convert(input).await;
    let status = conversion.status();
    if status.kind == StatusKind::Failed {
        warn!("{}", status.message);
    }

    if config.copy {
        report_copy(&SystemClipboard::new(), &conversion.output);
    }
    Ok(conversion.output)
}

fn report_copy<C: Clipboard>(clipboard: &C, text: &str) {
    match clipboard.write_text(text) {
        Ok(()) => info!("{}", pipeline::status::COPIED),
        Err(err) => warn!("{}: {}", pipeline::status::COPY_FAILED, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::with_temp_home;

    #[test]
    fn converter_honors_config_overrides() {
        let mut settings = settings::Settings::default();
        settings.source_lang = Some("fr".to_string());
        settings.translation_key = Some("settings-key".to_string());

        let config = Config {
            source_lang: Some("auto".to_string()),
            no_translate: true,
            ..Config::default()
        };
        let converter = build_converter(&config, &settings);
        assert!(!converter.has_translator());
        assert_eq!(converter.analyzer().state(), AnalyzerState::Pending);

        let converter = build_converter(&Config::default(), &settings);
        assert!(converter.has_translator());
    }

    #[test]
    fn run_rejects_empty_input() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let result = with_temp_home(|_| {
            runtime.block_on(run(Config::default(), Some("  ".to_string())))
        });
        let err = result.unwrap_err();
        assert!(err.to_string().contains("stdin is empty"));
    }

    #[test]
    fn run_without_services_uses_local_fallback() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let config = Config {
            no_translate: true,
            ..Config::default()
        };
        let output = with_temp_home(|_| {
            runtime.block_on(run(config, Some("ひらがなと一\n".to_string())))
        })
        .expect("output");
        assert_eq!(output, "ヒラガナトイチ");
    }
}
