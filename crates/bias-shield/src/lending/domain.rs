use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Validation errors raised for malformed loan inputs.
#[derive(Debug, thiserror::Error)]
pub enum LendingError {
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Applicant submission as received from the intake form. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub gender: String,
    pub race: String,
    pub age: i32,
    pub income: f64,
    pub credit_score: i32,
    pub loan_amount: f64,
    pub employment_type: String,
    pub education_level: String,
    pub citizenship_status: String,
    pub language_proficiency: String,
    pub disability_status: String,
    pub criminal_record: String,
    pub zip_code_group: String,
}

impl LoanApplication {
    pub fn validate(&self) -> Result<(), LendingError> {
        non_negative("income", self.income)?;
        non_negative("loan_amount", self.loan_amount)?;
        Ok(())
    }

    pub fn age_group(&self) -> Option<AgeGroup> {
        AgeGroup::for_age(self.age)
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), LendingError> {
    if !value.is_finite() {
        return Err(LendingError::InvalidField {
            field,
            reason: "must be a finite number".to_string(),
        });
    }
    if value < 0.0 {
        return Err(LendingError::InvalidField {
            field,
            reason: format!("must be non-negative (found {value})"),
        });
    }
    Ok(())
}

/// Age buckets used when grouping applicants for fairness metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "Under 25")]
    Under25,
    #[serde(rename = "25-60")]
    TwentyFiveToSixty,
    #[serde(rename = "Over 60")]
    Over60,
}

impl AgeGroup {
    /// Right-closed bins: (0, 25], (25, 60], (60, 100].
    pub fn for_age(age: i32) -> Option<Self> {
        match age {
            1..=25 => Some(Self::Under25),
            26..=60 => Some(Self::TwentyFiveToSixty),
            61..=100 => Some(Self::Over60),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Under25 => "Under 25",
            Self::TwentyFiveToSixty => "25-60",
            Self::Over60 => "Over 60",
        }
    }
}

/// Outcome of scoring one application, with per-factor impact weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub approved: bool,
    pub approval_probability: f64,
    pub explanation: BTreeMap<String, f64>,
}

impl PredictionResult {
    pub fn validate(&self) -> Result<(), LendingError> {
        if !self.approval_probability.is_finite()
            || !(0.0..=1.0).contains(&self.approval_probability)
        {
            return Err(LendingError::InvalidField {
                field: "approval_probability",
                reason: format!(
                    "must be within [0, 1] (found {})",
                    self.approval_probability
                ),
            });
        }

        if let Some((factor, _)) = self
            .explanation
            .iter()
            .find(|(_, impact)| !impact.is_finite())
        {
            return Err(LendingError::InvalidField {
                field: "explanation",
                reason: format!("impact for '{factor}' must be a finite number"),
            });
        }

        Ok(())
    }

    /// Factors ordered by signed impact, strongest first. Equal impacts keep key order.
    pub fn ranked_factors(&self) -> Vec<(&str, f64)> {
        let mut factors: Vec<(&str, f64)> = self
            .explanation
            .iter()
            .map(|(name, impact)| (name.as_str(), *impact))
            .collect();
        factors.sort_by(|a, b| b.1.total_cmp(&a.1));
        factors
    }

    /// Factors ordered by absolute impact, as shown in the decision report table.
    pub fn factors_by_magnitude(&self) -> Vec<(&str, f64)> {
        let mut factors: Vec<(&str, f64)> = self
            .explanation
            .iter()
            .map(|(name, impact)| (name.as_str(), *impact))
            .collect();
        factors.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        factors
    }
}
