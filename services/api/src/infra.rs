use bias_shield::config::CorsConfig;
use bias_shield::error::AppError;
use bias_shield::fairness::{FairnessReport, GroupMetrics, GroupRates};
use bias_shield::lending::{LoanApplication, ScreeningEngine};
use bias_shield::report::PdfReportRenderer;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) screening: Arc<ScreeningEngine>,
    pub(crate) renderer: Arc<PdfReportRenderer>,
}

/// Chart identifiers exposed by the visualization endpoint and their output files.
const VISUALIZATIONS: [(&str, &str); 11] = [
    ("gender_approval", "approval_rates_by_Gender.png"),
    ("race_approval", "approval_rates_by_Race.png"),
    ("age_approval", "approval_rates_by_Age_Group.png"),
    ("disability_approval", "approval_rates_by_Disability_Status.png"),
    ("gender_error", "error_rates_by_Gender.png"),
    ("race_error", "error_rates_by_Race.png"),
    ("age_error", "error_rates_by_Age_Group.png"),
    ("disability_error", "error_rates_by_Disability_Status.png"),
    ("shap_summary", "shap_summary.png"),
    ("shap_bar", "shap_bar.png"),
    ("bias_summary", "bias_visualization.png"),
];

pub(crate) fn visualization_file(viz_type: &str) -> Option<&'static str> {
    VISUALIZATIONS
        .iter()
        .find(|(key, _)| *key == viz_type)
        .map(|(_, file)| *file)
}

fn rates(entries: &[(&str, f64)]) -> GroupRates {
    entries
        .iter()
        .map(|(group, rate)| (group.to_string(), *rate))
        .collect()
}

fn group(
    approval: &[(&str, f64)],
    approval_disparity: f64,
    fp: &[(&str, f64)],
    fp_disparity: f64,
    fn_: &[(&str, f64)],
    fn_disparity: f64,
) -> GroupMetrics {
    GroupMetrics {
        approval_rates: rates(approval),
        approval_disparity,
        fp_rates: rates(fp),
        fn_rates: rates(fn_),
        fp_disparity,
        fn_disparity,
    }
}

/// Metrics from the latest offline model analysis, served until a live pipeline exists.
pub(crate) fn reference_fairness_report() -> FairnessReport {
    FairnessReport {
        gender: group(
            &[("Male", 0.72), ("Female", 0.64)],
            0.08,
            &[("Male", 0.15), ("Female", 0.12)],
            0.03,
            &[("Male", 0.10), ("Female", 0.18)],
            0.08,
        ),
        race: group(
            &[("White", 0.75), ("Black", 0.62), ("Asian", 0.70), ("Hispanic", 0.65)],
            0.13,
            &[("White", 0.16), ("Black", 0.11), ("Asian", 0.14), ("Hispanic", 0.12)],
            0.05,
            &[("White", 0.09), ("Black", 0.19), ("Asian", 0.12), ("Hispanic", 0.16)],
            0.10,
        ),
        age_group: group(
            &[("Under 25", 0.65), ("25-60", 0.72), ("Over 60", 0.68)],
            0.07,
            &[("Under 25", 0.13), ("25-60", 0.15), ("Over 60", 0.14)],
            0.02,
            &[("Under 25", 0.18), ("25-60", 0.10), ("Over 60", 0.15)],
            0.08,
        ),
        disability_status: group(
            &[("Yes", 0.62), ("No", 0.73)],
            0.11,
            &[("Yes", 0.12), ("No", 0.15)],
            0.03,
            &[("Yes", 0.20), ("No", 0.09)],
            0.11,
        ),
    }
}

pub(crate) fn sample_application(approvable: bool) -> LoanApplication {
    let (income, credit_score, loan_amount) = if approvable {
        (85_000.0, 720, 150_000.0)
    } else {
        (42_000.0, 580, 160_000.0)
    };

    LoanApplication {
        gender: "Female".to_string(),
        race: "Black".to_string(),
        age: 38,
        income,
        credit_score,
        loan_amount,
        employment_type: "Full-time".to_string(),
        education_level: "Bachelor's".to_string(),
        citizenship_status: "Citizen".to_string(),
        language_proficiency: "Fluent".to_string(),
        disability_status: "No".to_string(),
        criminal_record: "No".to_string(),
        zip_code_group: "Urban".to_string(),
    }
}

pub(crate) fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any_origin() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bias_shield::fairness::{ProtectedAttribute, SeverityTier};

    #[test]
    fn reference_report_has_race_as_widest_gap() {
        let ranking = reference_fairness_report().ranking();
        assert_eq!(ranking.severity, SeverityTier::High);
        assert_eq!(
            ranking.most_disparate().map(|entry| entry.attribute),
            Some(ProtectedAttribute::Race)
        );
    }

    #[test]
    fn visualization_catalog_lookup() {
        assert_eq!(
            visualization_file("race_error"),
            Some("error_rates_by_Race.png")
        );
        assert_eq!(visualization_file("pie_chart"), None);
    }

    #[test]
    fn sample_applications_cover_both_outcomes() {
        let engine = ScreeningEngine::default();
        let approved = engine
            .predict(&sample_application(true))
            .expect("valid sample");
        let denied = engine
            .predict(&sample_application(false))
            .expect("valid sample");
        assert!(approved.approved);
        assert!(!denied.approved);
    }

    #[tokio::test]
    async fn explicit_origins_are_echoed_only_when_listed() {
        use axum::body::Body;
        use axum::http::{header, HeaderValue, Request};
        use axum::routing::get;
        use axum::Router;
        use tower::ServiceExt;

        let config = CorsConfig {
            allowed_origins: vec![HeaderValue::from_static("http://localhost:3000")],
        };
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(&config));

        let preflight = |origin: &'static str| {
            Request::builder()
                .method("OPTIONS")
                .uri("/")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .expect("request builds")
        };

        let allowed = app
            .clone()
            .oneshot(preflight("http://localhost:3000"))
            .await
            .expect("router responds");
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("http://localhost:3000"))
        );

        let denied = app
            .oneshot(preflight("http://evil.test"))
            .await
            .expect("router responds");
        assert!(denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
