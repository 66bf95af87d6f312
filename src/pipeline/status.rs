use serde::Serialize;
use std::io::Write;

pub const INITIALIZING: &str = "初期化チュウ...";
pub const READY: &str = "準備カンリョウ!";
pub const INIT_FAILED: &str = "初期化シッパイ";
pub const PREPARING: &str = "ヘンカンジュンビチュウ...";
pub const CONVERTING: &str = "ヘンカンチュウ...";
pub const CONVERTED: &str = "ヘンカンカンリョウ!";
pub const NO_API_KEY: &str = "APIキーガ セッテイサレテイマセン";
pub const TRANSLATION_FAILED: &str = "ホンヤク API ニ セツゾク デキマセンデシタ";
pub const FALLBACK_USED: &str = "カンイ ヘンカン デ ヒョウジシテイマス";
pub const EMPTY_INPUT: &str = "テキストヲ ニュウリョクシテクダサイ";
pub const NOTHING_TO_COPY: &str = "コピースル テキストガ アリマセン";
pub const COPIED: &str = "コピーシマシタ!";
pub const COPY_FAILED: &str = "コピーニ シッパイシマシタ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Busy,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

impl Status {
    pub fn busy(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Busy,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: StatusKind::Failed,
        }
    }
}

/// Where conversion results and status lines end up.
pub trait Surface: Send + Sync {
    fn show_output(&self, text: &str);
    fn show_status(&self, status: &Status);
}

/// Output on stdout, status lines on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSurface;

impl Surface for ConsoleSurface {
    fn show_output(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", text);
        let _ = stdout.flush();
    }

    fn show_status(&self, status: &Status) {
        let marker = match status.kind {
            StatusKind::Busy => "…",
            StatusKind::Success => "✓",
            StatusKind::Failed => "!",
        };
        eprintln!("[{}] {}", marker, status.message);
    }
}
