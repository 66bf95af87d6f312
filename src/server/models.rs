use serde::{Deserialize, Serialize};

use crate::pipeline::{Notice, Status};
use crate::transliterator::AnalyzerState;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct ConvertRequest {
    pub(crate) text: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ConvertResponse {
    pub(crate) output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) translated: Option<String>,
    pub(crate) status: Status,
    pub(crate) notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransliterateResponse {
    pub(crate) output: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) analyzer: AnalyzerState,
    pub(crate) translation: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}
