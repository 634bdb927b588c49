//! BiasShield core: loan decision explanations and fairness analytics.

pub mod config;
pub mod error;
pub mod explanation;
pub mod fairness;
pub mod lending;
pub mod report;
pub mod telemetry;
