use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::explanation::format::{currency, fraction_as_percent, humanize_factor};
use crate::explanation::SIGNATURE;
use crate::lending::{LoanApplication, PredictionResult};

pub const REPORT_TITLE: &str = "BiasShield Loan Decision Report";
pub const CONFIDENTIALITY_NOTICE: &str = "CONFIDENTIAL - FOR APPLICANT USE ONLY";

/// Applicant fields shown in the report. Anything missing renders as `N/A`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantDetails {
    pub gender: Option<String>,
    pub race: Option<String>,
    pub age: Option<i32>,
    pub income: Option<f64>,
    pub credit_score: Option<i32>,
    pub loan_amount: Option<f64>,
    pub employment_type: Option<String>,
}

impl From<&LoanApplication> for ApplicantDetails {
    fn from(application: &LoanApplication) -> Self {
        Self {
            gender: Some(application.gender.clone()),
            race: Some(application.race.clone()),
            age: Some(application.age),
            income: Some(application.income),
            credit_score: Some(application.credit_score),
            loan_amount: Some(application.loan_amount),
            employment_type: Some(application.employment_type.clone()),
        }
    }
}

/// Everything the renderer needs: applicant data, prediction, and explanation text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionReportRequest {
    pub application: ApplicantDetails,
    pub prediction: PredictionResult,
    pub explanation: String,
}

/// Page-independent content of a decision report, ready for any backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionReportLayout {
    pub title: &'static str,
    pub generated_on: String,
    pub approved: bool,
    pub decision_heading: String,
    pub probability_line: String,
    pub applicant_rows: Vec<(String, String)>,
    pub factor_rows: Vec<(String, String)>,
    pub paragraphs: Vec<String>,
    pub footer: [&'static str; 2],
}

impl DecisionReportLayout {
    pub fn build(request: &DecisionReportRequest, generated_on: NaiveDate) -> Self {
        let prediction = &request.prediction;
        let decision = if prediction.approved {
            "APPROVED"
        } else {
            "DENIED"
        };

        let factor_rows = prediction
            .factors_by_magnitude()
            .into_iter()
            .map(|(factor, impact)| (humanize_factor(factor), format!("{impact:.2}")))
            .collect();

        Self {
            title: REPORT_TITLE,
            generated_on: format!("Generated on: {}", generated_on.format("%B %d, %Y")),
            approved: prediction.approved,
            decision_heading: format!("Loan Application: {decision}"),
            probability_line: format!(
                "Approval Probability: {}",
                fraction_as_percent(prediction.approval_probability)
            ),
            applicant_rows: applicant_rows(&request.application),
            factor_rows,
            paragraphs: explanation_paragraphs(&request.explanation),
            footer: [CONFIDENTIALITY_NOTICE, SIGNATURE],
        }
    }
}

fn applicant_rows(details: &ApplicantDetails) -> Vec<(String, String)> {
    fn text(value: &Option<String>) -> String {
        value.clone().unwrap_or_else(|| "N/A".to_string())
    }
    fn number(value: Option<i32>) -> String {
        value.map_or_else(|| "N/A".to_string(), |n| n.to_string())
    }

    vec![
        ("Name".to_string(), "Applicant".to_string()),
        ("Gender".to_string(), text(&details.gender)),
        ("Race".to_string(), text(&details.race)),
        ("Age".to_string(), number(details.age)),
        ("Income".to_string(), currency(details.income.unwrap_or(0.0))),
        ("Credit Score".to_string(), number(details.credit_score)),
        (
            "Loan Amount".to_string(),
            currency(details.loan_amount.unwrap_or(0.0)),
        ),
        ("Employment Type".to_string(), text(&details.employment_type)),
    ]
}

/// Drop `**` and `*` emphasis markers.
pub fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace('*', "")
}

/// Split on blank lines; lines inside a paragraph are joined with single spaces.
pub fn explanation_paragraphs(text: &str) -> Vec<String> {
    let stripped = strip_emphasis(text);
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in stripped.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs.retain(|paragraph| !paragraph.trim().is_empty());
    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DecisionReportRequest {
        DecisionReportRequest {
            application: ApplicantDetails {
                gender: Some("Female".to_string()),
                income: Some(64_250.0),
                credit_score: Some(690),
                ..ApplicantDetails::default()
            },
            prediction: PredictionResult {
                approved: false,
                approval_probability: 0.2,
                explanation: [("income", 0.3), ("race", -0.45), ("age", 0.05)]
                    .into_iter()
                    .map(|(name, impact)| (name.to_string(), impact))
                    .collect(),
            },
            explanation: "## Heading\n**Bold** line one\nline two\n\n\n*third* paragraph\n"
                .to_string(),
        }
    }

    #[test]
    fn strips_emphasis_and_joins_paragraph_lines() {
        let paragraphs = explanation_paragraphs(&request().explanation);
        assert_eq!(
            paragraphs,
            vec!["## Heading Bold line one line two", "third paragraph"]
        );
    }

    #[test]
    fn factor_rows_are_ordered_by_absolute_impact() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date");
        let layout = DecisionReportLayout::build(&request(), date);
        assert_eq!(
            layout.factor_rows,
            vec![
                ("Race".to_string(), "-0.45".to_string()),
                ("Income".to_string(), "0.30".to_string()),
                ("Age".to_string(), "0.05".to_string()),
            ]
        );
        assert_eq!(layout.decision_heading, "Loan Application: DENIED");
        assert_eq!(layout.probability_line, "Approval Probability: 20.0%");
        assert_eq!(layout.generated_on, "Generated on: March 07, 2025");
    }

    #[test]
    fn missing_applicant_fields_render_as_not_available() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date");
        let layout = DecisionReportLayout::build(&request(), date);
        let lookup = |field: &str| {
            layout
                .applicant_rows
                .iter()
                .find(|(name, _)| name == field)
                .map(|(_, value)| value.clone())
        };
        assert_eq!(lookup("Race").as_deref(), Some("N/A"));
        assert_eq!(lookup("Income").as_deref(), Some("$64,250.00"));
        assert_eq!(lookup("Loan Amount").as_deref(), Some("$0.00"));
        assert_eq!(lookup("Credit Score").as_deref(), Some("690"));
    }

    #[test]
    fn deserializes_partial_requests() {
        let request: DecisionReportRequest = serde_json::from_value(serde_json::json!({
            "application": {"gender": "Male"},
            "prediction": {"approved": true, "approval_probability": 0.8, "explanation": {}}
        }))
        .expect("partial request is accepted");
        assert!(request.explanation.is_empty());
        assert_eq!(request.application.gender.as_deref(), Some("Male"));
    }
}
