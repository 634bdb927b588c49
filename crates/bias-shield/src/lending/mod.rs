//! Loan application intake types and the rule-based screener.

pub mod domain;
pub mod screening;

pub use domain::{AgeGroup, LendingError, LoanApplication, PredictionResult};
pub use screening::{ScreeningConfig, ScreeningEngine};
