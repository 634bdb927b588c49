use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{LendingError, LoanApplication, PredictionResult};

/// Thresholds and weights for the rule-based screener that stands in for a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningConfig {
    pub minimum_credit_score: i32,
    pub minimum_income: f64,
    pub max_loan_to_income: f64,
    pub approved_probability: f64,
    pub denied_probability: f64,
    pub factor_weights: BTreeMap<String, f64>,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        let factor_weights = [
            ("credit_score", 0.4),
            ("income", 0.3),
            ("loan_amount", 0.2),
            ("age", 0.05),
            ("gender", 0.03),
            ("race", 0.02),
        ]
        .into_iter()
        .map(|(factor, weight)| (factor.to_string(), weight))
        .collect();

        Self {
            minimum_credit_score: 600,
            minimum_income: 50_000.0,
            max_loan_to_income: 3.0,
            approved_probability: 0.8,
            denied_probability: 0.2,
            factor_weights,
        }
    }
}

/// Stateless screener applying [`ScreeningConfig`] to an application.
#[derive(Debug, Clone, Default)]
pub struct ScreeningEngine {
    config: ScreeningConfig,
}

impl ScreeningEngine {
    pub fn new(config: ScreeningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScreeningConfig {
        &self.config
    }

    pub fn predict(&self, application: &LoanApplication) -> Result<PredictionResult, LendingError> {
        application.validate()?;

        let credit_ok = application.credit_score >= self.config.minimum_credit_score;
        let income_ok = application.income >= self.config.minimum_income;
        let amount_ok =
            application.loan_amount <= application.income * self.config.max_loan_to_income;
        let approved = credit_ok && income_ok && amount_ok;

        debug!(
            credit_ok,
            income_ok,
            amount_ok,
            age_group = ?application.age_group(),
            "screened loan application"
        );

        let approval_probability = if approved {
            self.config.approved_probability
        } else {
            self.config.denied_probability
        };

        Ok(PredictionResult {
            approved,
            approval_probability,
            explanation: self.config.factor_weights.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(credit_score: i32, income: f64, loan_amount: f64) -> LoanApplication {
        LoanApplication {
            gender: "Female".to_string(),
            race: "Asian".to_string(),
            age: 34,
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

    #[test]
    fn approves_when_every_threshold_is_met() {
        let engine = ScreeningEngine::default();
        let result = engine
            .predict(&application(600, 50_000.0, 150_000.0))
            .expect("valid application");
        assert!(result.approved);
        assert_eq!(result.approval_probability, 0.8);
        assert_eq!(result.explanation.len(), 6);
        assert_eq!(result.explanation["credit_score"], 0.4);
    }

    #[test]
    fn denies_when_loan_exceeds_income_multiple() {
        let engine = ScreeningEngine::default();
        let result = engine
            .predict(&application(720, 60_000.0, 180_000.5))
            .expect("valid application");
        assert!(!result.approved);
        assert_eq!(result.approval_probability, 0.2);
    }

    #[test]
    fn denies_low_credit_scores() {
        let engine = ScreeningEngine::default();
        let result = engine
            .predict(&application(599, 90_000.0, 10_000.0))
            .expect("valid application");
        assert!(!result.approved);
    }

    #[test]
    fn rejects_negative_income() {
        let engine = ScreeningEngine::default();
        let err = engine
            .predict(&application(700, -1.0, 10_000.0))
            .expect_err("negative income is invalid");
        assert!(err.to_string().contains("income"));
    }
}
