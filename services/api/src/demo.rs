use crate::infra::{read_json, reference_fairness_report, sample_application};
use bias_shield::config::AppConfig;
use bias_shield::error::AppError;
use bias_shield::explanation::{bias_report, loan_decision_explanation, remediation_strategy};
use bias_shield::fairness::{FairnessReport, GroupMetrics};
use bias_shield::lending::{LoanApplication, PredictionResult, ScreeningEngine};
use bias_shield::report::{DecisionReportLayout, DecisionReportRequest, PdfReportRenderer};
use chrono::Local;
use clap::Args;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Use an applicant that fails the screening rule.
    #[arg(long)]
    pub(crate) denied: bool,
    /// Also render the decision report PDF to this path.
    #[arg(long)]
    pub(crate) pdf: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct LoanExplainArgs {
    /// JSON file holding a loan application
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Also render the decision report PDF to this path
    #[arg(long)]
    pub(crate) pdf: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FairnessArgs {
    /// JSON file holding fairness metrics (defaults to the reference snapshot)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FairnessDocument {
    BiasReport,
    Remediation,
}

impl FairnessDocument {
    fn render(self, report: &FairnessReport) -> String {
        match self {
            FairnessDocument::BiasReport => bias_report(report),
            FairnessDocument::Remediation => remediation_strategy(report),
        }
    }
}

pub(crate) fn run_explain_loan(args: LoanExplainArgs) -> Result<(), AppError> {
    let application: LoanApplication = read_json(&args.input)?;
    let prediction = ScreeningEngine::default().predict(&application)?;

    print_prediction(&prediction);
    let explanation = loan_decision_explanation(&application, &prediction);
    println!("{explanation}");

    if let Some(path) = args.pdf {
        write_decision_pdf(&path, &application, prediction, explanation)?;
    }
    Ok(())
}

pub(crate) fn run_explain_fairness(
    args: FairnessArgs,
    document: FairnessDocument,
) -> Result<(), AppError> {
    let report = load_fairness_report(args.input.as_deref())?;
    println!("{}", document.render(&report));
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = ScreeningEngine::default();
    let rule = engine.config();
    let application = sample_application(!args.denied);

    println!("BiasShield demo");
    println!(
        "Screening rule: credit score >= {} | income >= ${:.0} | loan <= {:.0}x income",
        rule.minimum_credit_score, rule.minimum_income, rule.max_loan_to_income
    );
    println!(
        "Applicant: {} {}, age {}, income ${:.0}, credit score {}, loan ${:.0}",
        application.gender,
        application.race,
        application.age,
        application.income,
        application.credit_score,
        application.loan_amount
    );

    let prediction = engine.predict(&application)?;
    print_prediction(&prediction);

    let explanation = loan_decision_explanation(&application, &prediction);
    println!("\nDecision letter\n{explanation}");

    let report = reference_fairness_report();
    let ranking = report.ranking();
    println!("\nDisparity ranking ({} severity)", ranking.severity.label());
    for entry in &ranking.entries {
        println!(
            "  - {}: {:.1}%{}",
            entry.attribute.label(),
            entry.disparity,
            if entry.regulatory_concern {
                " (regulatory concern)"
            } else {
                ""
            }
        );
    }

    println!("\n{}", bias_report(&report));
    println!("{}", remediation_strategy(&report));

    if let Some(path) = args.pdf {
        write_decision_pdf(&path, &application, prediction, explanation)?;
    }
    Ok(())
}

fn print_prediction(prediction: &PredictionResult) {
    println!(
        "Prediction: {} (approval probability {:.1}%)",
        if prediction.approved {
            "APPROVED"
        } else {
            "DENIED"
        },
        prediction.approval_probability * 100.0
    );
    for (factor, impact) in prediction.ranked_factors() {
        println!("  - {factor}: {impact:.2}");
    }
}

fn load_fairness_report(path: Option<&Path>) -> Result<FairnessReport, AppError> {
    match path {
        Some(path) => {
            let metrics: BTreeMap<String, GroupMetrics> = read_json(path)?;
            Ok(FairnessReport::try_from(metrics)?)
        }
        None => Ok(reference_fairness_report()),
    }
}

fn write_decision_pdf(
    path: &Path,
    application: &LoanApplication,
    prediction: PredictionResult,
    explanation: String,
) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let request = DecisionReportRequest {
        application: application.into(),
        prediction,
        explanation,
    };
    let layout = DecisionReportLayout::build(&request, Local::now().date_naive());
    let pdf = PdfReportRenderer::new(&config.report).render(&layout)?;
    std::fs::write(path, pdf)?;
    println!("\nDecision report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bias_shield::fairness::AnalysisError;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("bias-shield-{}-{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        path
    }

    #[test]
    fn fairness_report_defaults_to_reference_snapshot() {
        let report = load_fairness_report(None).expect("reference report");
        assert_eq!(report, reference_fairness_report());
    }

    #[test]
    fn fairness_file_missing_attribute_is_rejected() {
        let mut metrics =
            serde_json::to_value(reference_fairness_report()).expect("serializes");
        metrics
            .as_object_mut()
            .expect("metrics object")
            .remove("race");
        let path = temp_file("metrics.json", &metrics.to_string());

        let result = load_fairness_report(Some(&path));
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            result,
            Err(AppError::Analysis(AnalysisError::MissingAttribute(_)))
        ));
    }

    #[test]
    fn documents_render_selected_generator() {
        let report = reference_fairness_report();
        assert!(FairnessDocument::BiasReport
            .render(&report)
            .starts_with("## Bias Analysis Report"));
        assert!(FairnessDocument::Remediation
            .render(&report)
            .contains("### Technical Strategies"));
    }
}
