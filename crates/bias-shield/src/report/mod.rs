//! Decision report rendering: a pure layout pass followed by PDF output.

pub mod layout;
mod pdf;

pub use layout::{
    explanation_paragraphs, strip_emphasis, ApplicantDetails, DecisionReportLayout,
    DecisionReportRequest,
};
pub use pdf::{PdfReportRenderer, ReportError};

/// File name suggested to clients downloading a rendered report.
pub const REPORT_FILE_NAME: &str = "BiasShield_Decision_Report.pdf";
