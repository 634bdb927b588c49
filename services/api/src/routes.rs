use crate::infra::{reference_fairness_report, visualization_file, AppState};
use axum::async_trait;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use bias_shield::error::AppError;
use bias_shield::explanation::{bias_report, loan_decision_explanation, remediation_strategy};
use bias_shield::fairness::{FairnessReport, GroupMetrics};
use bias_shield::lending::{LoanApplication, PredictionResult};
use bias_shield::report::{DecisionReportLayout, DecisionReportRequest, REPORT_FILE_NAME};
use chrono::Local;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;
use tracing::{info, warn};

/// JSON body extractor whose rejections share the `{"error": ...}` shape of [`AppError`].
pub(crate) struct ApiJson<T>(pub(crate) T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExplainLoanRequest {
    pub(crate) application: LoanApplication,
    pub(crate) prediction: PredictionResult,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExplanationResponse {
    pub(crate) explanation: String,
}

pub(crate) fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/predict", post(predict_endpoint))
        .route("/fairness", get(fairness_endpoint))
        .route("/visualizations/:viz_type", get(visualization_endpoint))
        .route("/run-analysis", post(run_analysis_endpoint))
        .route("/explain-loan", post(explain_loan_endpoint))
        .route("/explain-bias", post(explain_bias_endpoint))
        .route("/remediation-strategy", post(remediation_endpoint))
        .route("/loan-decision-pdf", post(loan_decision_pdf_endpoint))
        .with_state(state)
}

pub(crate) async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to BiasShield API" }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn predict_endpoint(
    State(state): State<AppState>,
    ApiJson(application): ApiJson<LoanApplication>,
) -> Result<Json<PredictionResult>, AppError> {
    let prediction = state.screening.predict(&application)?;
    info!(
        approved = prediction.approved,
        probability = prediction.approval_probability,
        "loan application screened"
    );
    Ok(Json(prediction))
}

pub(crate) async fn fairness_endpoint() -> Json<FairnessReport> {
    Json(reference_fairness_report())
}

pub(crate) async fn visualization_endpoint(
    Path(viz_type): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Some(file) = visualization_file(&viz_type) else {
        warn!(%viz_type, "unknown visualization requested");
        return Err(AppError::NotFound(format!("visualization '{viz_type}'")));
    };

    Ok(Json(json!({
        "message": format!("Visualization {viz_type} would be returned here"),
        "file": file,
    })))
}

pub(crate) async fn run_analysis_endpoint() -> Json<serde_json::Value> {
    info!("analysis pipeline requested");
    Json(json!({ "message": "Analysis pipeline started successfully" }))
}

pub(crate) async fn explain_loan_endpoint(
    ApiJson(payload): ApiJson<ExplainLoanRequest>,
) -> Result<Json<ExplanationResponse>, AppError> {
    payload.application.validate()?;
    payload.prediction.validate()?;

    let explanation = loan_decision_explanation(&payload.application, &payload.prediction);
    Ok(Json(ExplanationResponse { explanation }))
}

pub(crate) async fn explain_bias_endpoint(
    ApiJson(metrics): ApiJson<BTreeMap<String, GroupMetrics>>,
) -> Result<Json<ExplanationResponse>, AppError> {
    let report = FairnessReport::try_from(metrics)?;
    Ok(Json(ExplanationResponse {
        explanation: bias_report(&report),
    }))
}

pub(crate) async fn remediation_endpoint(
    ApiJson(metrics): ApiJson<BTreeMap<String, GroupMetrics>>,
) -> Result<Json<ExplanationResponse>, AppError> {
    let report = FairnessReport::try_from(metrics)?;
    Ok(Json(ExplanationResponse {
        explanation: remediation_strategy(&report),
    }))
}

pub(crate) async fn loan_decision_pdf_endpoint(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DecisionReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.prediction.validate()?;

    let layout = DecisionReportLayout::build(&request, Local::now().date_naive());
    let pdf = state.renderer.render(&layout)?;
    info!(bytes = pdf.len(), approved = layout.approved, "decision report rendered");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={REPORT_FILE_NAME}"),
            ),
        ],
        pdf,
    ))
}
