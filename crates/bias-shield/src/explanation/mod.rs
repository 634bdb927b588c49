//! Deterministic, template-driven prose for loan decisions and fairness findings.
//!
//! Every generator is a pure function of its input: calling one twice with the same data
//! yields byte-identical text.

mod bias;
mod decision;
pub mod format;
mod remediation;

pub use bias::bias_report;
pub use decision::loan_decision_explanation;
pub use remediation::remediation_strategy;

/// Closing line shared by applicant-facing documents.
pub const SIGNATURE: &str = "BiasShield Decision System";
