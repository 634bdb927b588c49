//! Disparity metrics across protected-attribute groups and their severity ranking.

pub mod metrics;
pub mod ranking;

pub use metrics::{
    rate_spread, AnalysisError, FairnessReport, GroupMetrics, GroupRates, ProtectedAttribute,
    DISPARITY_TOLERANCE,
};
pub use ranking::{
    rank_disparities, DisparityRanking, RankedDisparity, SeverityTier, HIGH_SEVERITY_THRESHOLD,
    REGULATORY_THRESHOLD,
};
