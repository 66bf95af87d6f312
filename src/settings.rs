use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

pub const API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";
pub const BASE_URL_ENV: &str = "GOOGLE_TRANSLATE_BASE_URL";
pub const ANALYZER_URL_ENV: &str = "KATAKANA_ANALYZER_URL";

#[derive(Debug, Clone)]
pub struct Settings {
    pub typing_delay: Duration,
    pub translation_key: Option<String>,
    pub translation_base_url: Option<String>,
    pub target_lang: String,
    pub source_lang: Option<String>,
    pub translation_timeout: Duration,
    pub analyzer_url: Option<String>,
    pub analyzer_init_attempts: usize,
    pub analyzer_init_delay: Duration,
    pub analyzer_timeout: Duration,
    pub server_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            typing_delay: Duration::from_millis(1000),
            translation_key: None,
            translation_base_url: None,
            target_lang: "ja".to_string(),
            source_lang: None,
            translation_timeout: Duration::from_secs(10),
            analyzer_url: None,
            analyzer_init_attempts: 3,
            analyzer_init_delay: Duration::from_millis(500),
            analyzer_timeout: Duration::from_secs(5),
            server_addr: "127.0.0.1:8787".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    pipeline: Option<PipelineSettings>,
    translation: Option<TranslationSettings>,
    analyzer: Option<AnalyzerSettings>,
    server: Option<ServerSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct PipelineSettings {
    typing_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct TranslationSettings {
    api_key: Option<String>,
    base_url: Option<String>,
    target_lang: Option<String>,
    source_lang: Option<String>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyzerSettings {
    url: Option<String>,
    init_attempts: Option<usize>,
    init_delay_ms: Option<u64>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSettings {
    addr: Option<String>,
}

pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    ensure_home_settings_file()?;

    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("settings.toml"));
    ordered_paths.push(PathBuf::from("settings.local.toml"));

    if let Some(home) = home_dir() {
        ordered_paths.push(home.join("settings.toml"));
        ordered_paths.push(home.join("settings.local.toml"));
    }

    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            settings.merge_str(&content).with_context(|| {
                format!("failed to parse settings: {}", path.display())
            })?;
        }
    }

    settings.apply_env();
    Ok(settings)
}

impl Settings {
    pub fn merge_str(&mut self, content: &str) -> Result<()> {
        let parsed: SettingsFile = toml::from_str(content)?;
        self.merge(parsed);
        Ok(())
    }

    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(pipeline) = incoming.pipeline {
            if let Some(delay) = pipeline.typing_delay_ms {
                self.typing_delay = Duration::from_millis(delay);
            }
        }
        if let Some(translation) = incoming.translation {
            if let Some(key) = non_empty(translation.api_key) {
                self.translation_key = Some(key);
            }
            if let Some(url) = non_empty(translation.base_url) {
                self.translation_base_url = Some(url);
            }
            if let Some(lang) = non_empty(translation.target_lang) {
                self.target_lang = lang;
            }
            if let Some(lang) = translation.source_lang {
                // an explicit empty value switches back to auto-detection
                self.source_lang = non_empty(Some(lang));
            }
            if let Some(timeout) = positive_millis(translation.timeout_ms) {
                self.translation_timeout = timeout;
            }
        }
        if let Some(analyzer) = incoming.analyzer {
            if let Some(url) = analyzer.url {
                self.analyzer_url = non_empty(Some(url));
            }
            if let Some(attempts) = analyzer.init_attempts {
                if attempts > 0 {
                    self.analyzer_init_attempts = attempts;
                }
            }
            if let Some(delay) = analyzer.init_delay_ms {
                self.analyzer_init_delay = Duration::from_millis(delay);
            }
            if let Some(timeout) = positive_millis(analyzer.timeout_ms) {
                self.analyzer_timeout = timeout;
            }
        }
        if let Some(server) = incoming.server {
            if let Some(addr) = non_empty(server.addr) {
                self.server_addr = addr;
            }
        }
    }

    fn apply_env(&mut self) {
        if let Some(key) = get_env(API_KEY_ENV) {
            self.translation_key = Some(key);
        }
        if let Some(url) = get_env(BASE_URL_ENV) {
            self.translation_base_url = Some(url);
        }
        if let Some(url) = get_env(ANALYZER_URL_ENV) {
            self.analyzer_url = Some(url);
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn positive_millis(value: Option<u64>) -> Option<Duration> {
    value.filter(|ms| *ms > 0).map(Duration::from_millis)
}

fn get_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn ensure_home_settings_file() -> Result<()> {
    let Some(home) = home_dir() else {
        return Ok(());
    };
    fs::create_dir_all(&home)
        .with_context(|| format!("failed to create settings directory: {}", home.display()))?;
    let path = home.join("settings.toml");
    if !path.exists() {
        fs::write(&path, DEFAULT_SETTINGS_TOML)
            .with_context(|| format!("failed to write settings: {}", path.display()))?;
    }
    Ok(())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().and_then(|home| {
        let home = home.trim();
        if home.is_empty() {
            None
        } else {
            Some(Path::new(home).join(".katakana-translator-rust"))
        }
    })
}
