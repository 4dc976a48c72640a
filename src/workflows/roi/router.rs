use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use super::domain::RoiIntakeRequest;
use super::mailer::MailTransport;
use super::scoring::RoiProjection;
use super::service::{RoiReportService, RoiWorkflowError};

/// Router builder exposing the submission endpoint.
pub fn roi_router<M>(service: Arc<RoiReportService<M>>, verbose_errors: bool) -> Router
where
    M: MailTransport + 'static,
{
    Router::new()
        .route("/api/roi/submit", post(submit_handler::<M>))
        .with_state(RoiApiState {
            service,
            verbose_errors,
        })
}

pub(crate) struct RoiApiState<M> {
    service: Arc<RoiReportService<M>>,
    /// Development-mode flag gating error detail in 500 responses.
    verbose_errors: bool,
}

impl<M> Clone for RoiApiState<M> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            verbose_errors: self.verbose_errors,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    success: bool,
    message: &'static str,
    data: SubmitData,
    processing_time: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitData {
    health_score: u8,
    health_band: &'static str,
    results: RoiProjection,
}

pub(crate) async fn submit_handler<M>(
    State(state): State<RoiApiState<M>>,
    Json(request): Json<RoiIntakeRequest>,
) -> Response
where
    M: MailTransport + 'static,
{
    let started = Instant::now();

    match state.service.submit(request).await {
        Ok(outcome) => {
            let elapsed_ms = started.elapsed().as_millis();
            info!(elapsed_ms, "roi submission completed");
            let body = SubmitResponse {
                success: true,
                message: "ROI+ report generated and sent successfully",
                data: SubmitData {
                    health_score: outcome.health_score,
                    health_band: outcome.health_band.label(),
                    results: outcome.projection,
                },
                processing_time: format!("{elapsed_ms}ms"),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(RoiWorkflowError::Intake(err)) => {
            let payload = json!({
                "error": true,
                "message": err.to_string(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "roi submission failed");
            let mut payload = json!({
                "error": true,
                "message": "Internal server error",
            });
            if state.verbose_errors {
                payload["details"] = json!(err.to_string());
            }
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
