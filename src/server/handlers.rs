use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tracing::info;

use super::models::{
    ConvertRequest, ConvertResponse, ErrorResponse, HealthResponse, TransliterateResponse,
};
use super::state::ServerState;
use crate::kana;
use crate::pipeline::Converter;
use crate::providers::{Analyzer, TranslationService};

type HandlerError = (StatusCode, Json<ErrorResponse>);

pub fn router<T, A>(converter: Converter<T, A>) -> Router
where
    T: TranslationService + 'static,
    A: Analyzer + 'static,
{
    let state = Arc::new(ServerState { converter });
    Router::new()
        .route("/health", get(health::<T, A>))
        .route("/convert", post(convert::<T, A>))
        .route("/transliterate", post(transliterate))
        .with_state(state)
        .layer(axum::middleware::from_fn(cors_middleware))
}

pub async fn run_server<T, A>(converter: Converter<T, A>, addr: String) -> Result<()>
where
    T: TranslationService + 'static,
    A: Analyzer + 'static,
{
    let analyzer_state = converter.analyzer().initialize().await;
    info!("analyzer state: {:?}", analyzer_state);
    let app = router(converter);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind server address: {}", addr))?;
    info!("listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health<T, A>(State(state): State<Arc<ServerState<T, A>>>) -> Json<HealthResponse>
where
    T: TranslationService + 'static,
    A: Analyzer + 'static,
{
    Json(HealthResponse {
        status: "ok",
        analyzer: state.converter.analyzer().state(),
        translation: state.converter.has_translator(),
    })
}

async fn convert<T, A>(
    State(state): State<Arc<ServerState<T, A>>>,
    Json(payload): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, HandlerError>
where
    T: TranslationService + 'static,
    A: Analyzer + 'static,
{
    let text = required_text(payload)?;
    let conversion = state.converter.convert(&text).await;
    Ok(Json(ConvertResponse {
        status: conversion.status(),
        output: conversion.output,
        translated: conversion.translated,
        notices: conversion.notices,
    }))
}

async fn transliterate(
    Json(payload): Json<ConvertRequest>,
) -> Result<Json<TransliterateResponse>, HandlerError> {
    let text = required_text(payload)?;
    Ok(Json(TransliterateResponse {
        output: kana::final_check(&kana::force_katakana(text.trim())),
    }))
}

fn required_text(payload: ConvertRequest) -> Result<String, HandlerError> {
    payload
        .text
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "text is required".to_string(),
                }),
            )
        })
}

async fn cors_middleware(req: Request<Body>, next: Next) -> Result<Response<Body>, StatusCode> {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return Ok(response);
    }
    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    Ok(response)
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("content-type"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ServiceError, ServiceFuture, Token, TranslationRequest, TranslationResponse};
    use crate::transliterator::AnalyzerHandle;
    use insta::assert_json_snapshot;

    struct DownTranslator;

    impl TranslationService for DownTranslator {
        fn translate(&self, _request: TranslationRequest) -> ServiceFuture<'_, TranslationResponse> {
            Box::pin(async { Err(ServiceError::ServiceUnavailable("503".to_string())) })
        }
    }

    struct NoAnalyzer;

    impl Analyzer for NoAnalyzer {
        fn analyze<'a>(&'a self, _text: &'a str) -> ServiceFuture<'a, Vec<Token>> {
            Box::pin(async { Err(ServiceError::NotInitialized) })
        }
    }

    fn state() -> Arc<ServerState<DownTranslator, NoAnalyzer>> {
        Arc::new(ServerState {
            converter: Converter::new(Some(DownTranslator), AnalyzerHandle::disabled()),
        })
    }

    #[tokio::test]
    async fn convert_reports_degraded_output() {
        let request = ConvertRequest {
            text: Some("good morning 日本".to_string()),
        };
        let Json(response) = convert(State(state()), Json(request))
            .await
            .expect("response");
        assert_json_snapshot!(response, @r#"
        {
          "output": "good morning ニホン",
          "status": {
            "message": "ホンヤク API ニ セツゾク デキマセンデシタ",
            "kind": "failed"
          },
          "notices": [
            "translation_failed",
            "analyzer_fallback"
          ]
        }
        "#);
    }

    #[tokio::test]
    async fn convert_rejects_blank_text() {
        let request = ConvertRequest {
            text: Some("   ".to_string()),
        };
        let (status, Json(error)) = convert(State(state()), Json(request))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error, "text is required");
    }

    #[tokio::test]
    async fn transliterate_uses_local_engine_only() {
        let request = ConvertRequest {
            text: Some("薔薇と一".to_string()),
        };
        let Json(response) = transliterate(Json(request)).await.expect("response");
        assert_eq!(response.output, "カカトイチ");
    }

    #[tokio::test]
    async fn health_reports_capabilities() {
        let Json(health) = health(State(state())).await;
        assert_json_snapshot!(health, @r#"
        {
          "status": "ok",
          "analyzer": "pending",
          "translation": true
        }
        "#);
    }
}
