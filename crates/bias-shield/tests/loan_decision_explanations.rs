//! Integration tests for applicant-facing decision letters and the report layout.

mod common {
    use bias_shield::lending::{LoanApplication, PredictionResult};

    pub(super) fn application() -> LoanApplication {
        LoanApplication {
            gender: "Female".to_string(),
            race: "Hispanic".to_string(),
            age: 29,
            income: 72_500.0,
            credit_score: 705,
            loan_amount: 180_000.0,
            employment_type: "Full-time".to_string(),
            education_level: "Bachelor's".to_string(),
            citizenship_status: "Citizen".to_string(),
            language_proficiency: "Fluent".to_string(),
            disability_status: "No".to_string(),
            criminal_record: "No".to_string(),
            zip_code_group: "Urban".to_string(),
        }
    }

    pub(super) fn prediction(approved: bool, probability: f64) -> PredictionResult {
        PredictionResult {
            approved,
            approval_probability: probability,
            explanation: [("credit_score", 0.4), ("income", 0.3), ("loan_amount", 0.2)]
                .into_iter()
                .map(|(name, impact)| (name.to_string(), impact))
                .collect(),
        }
    }
}

use bias_shield::explanation::{loan_decision_explanation, SIGNATURE};
use bias_shield::lending::ScreeningEngine;
use bias_shield::report::{DecisionReportLayout, DecisionReportRequest};
use chrono::NaiveDate;
use common::*;

fn is_numbered(line: &str) -> bool {
    line.split_once(". ")
        .map(|(number, _)| !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

#[test]
fn approved_letter_ranks_factors_by_impact() {
    let text = loan_decision_explanation(&application(), &prediction(true, 0.8));

    assert!(text.contains("approved"));
    assert!(text.contains("approval probability of 80.0%"));

    let credit = text
        .find("- Credit Score: This factor had a 40.0% impact on your approval")
        .expect("credit score bullet");
    let income = text
        .find("- Income: This factor had a 30.0% impact on your approval")
        .expect("income bullet");
    let amount = text
        .find("- Loan Amount: This factor had a 20.0% impact on your approval")
        .expect("loan amount bullet");
    assert!(credit < income && income < amount);

    assert!(text.contains("Your credit score of 705 and income of $72,500.00"));
    assert_eq!(text.lines().filter(|line| is_numbered(line)).count(), 3);
}

#[test]
fn denied_letter_lists_four_recommendations_and_invites_follow_up() {
    let text = loan_decision_explanation(&application(), &prediction(false, 0.2));

    assert!(text.contains("has not been approved at this time"));
    assert!(text.contains("The decision was made with an approval probability of 20.0%."));
    assert_eq!(text.lines().filter(|line| is_numbered(line)).count(), 4);
    assert!(text.contains("you can request a detailed explanation of the decision"));
    assert!(text.contains("- Credit Score: This factor had a 40.0% impact on the decision"));
    assert!(text.trim_end().ends_with(SIGNATURE));
}

#[test]
fn letters_are_byte_identical_across_calls() {
    let application = application();
    let prediction = prediction(true, 0.8);
    assert_eq!(
        loan_decision_explanation(&application, &prediction),
        loan_decision_explanation(&application, &prediction)
    );
}

#[test]
fn screened_application_flows_into_report_layout() {
    let application = application();
    let prediction = ScreeningEngine::default()
        .predict(&application)
        .expect("valid application");
    assert!(prediction.approved);

    let explanation = loan_decision_explanation(&application, &prediction);
    let request = DecisionReportRequest {
        application: (&application).into(),
        prediction,
        explanation,
    };
    let date = NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date");
    let layout = DecisionReportLayout::build(&request, date);

    assert_eq!(layout.decision_heading, "Loan Application: APPROVED");
    assert_eq!(layout.factor_rows.len(), 6);
    assert_eq!(layout.factor_rows[0], ("Credit Score".to_string(), "0.40".to_string()));
    assert!(layout
        .paragraphs
        .iter()
        .all(|paragraph| !paragraph.contains('*') && !paragraph.contains('\n')));
    assert_eq!(
        layout.paragraphs.last().map(String::as_str),
        Some(SIGNATURE)
    );
}
