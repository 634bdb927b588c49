use tracing::debug;

use crate::fairness::{FairnessReport, GroupMetrics, SeverityTier};

use super::format::{fraction_as_percent, percent};

/// Markdown-flavoured summary of approval-rate disparities across protected attributes.
pub fn bias_report(report: &FairnessReport) -> String {
    let ranking = report.ranking();
    debug!(
        severity = ranking.severity.label(),
        max_disparity = ranking.max_magnitude,
        "composing bias report"
    );

    let mut message = String::from("## Bias Analysis Report\n\n");
    message.push_str("### Summary of Findings\n\n");
    message.push_str(summary_line(ranking.severity));
    message.push_str("\n\n");

    message.push_str("### Detailed Analysis\n\n");
    for entry in &ranking.entries {
        let metrics = report.get(entry.attribute);
        message.push_str(&format!("**{}**:\n", entry.attribute.label()));
        message.push_str(&format!(
            "- Approval rate disparity: {}\n",
            percent(entry.disparity)
        ));
        message.push_str(&format!(
            "- Highest approval rate: {}\n",
            extreme_group(metrics, GroupMetrics::highest_approval)
        ));
        message.push_str(&format!(
            "- Lowest approval rate: {}\n",
            extreme_group(metrics, GroupMetrics::lowest_approval)
        ));
        if entry.regulatory_concern {
            message.push_str(
                "- **Regulatory concern**: This disparity exceeds the typical 5% threshold for \
                 regulatory scrutiny.\n",
            );
        }
        message.push('\n');
    }

    message.push_str("### Conclusion\n\n");
    message.push_str(conclusion_line(ranking.severity));
    message.push('\n');
    message
}

fn extreme_group<'a>(
    metrics: &'a GroupMetrics,
    select: fn(&'a GroupMetrics) -> Option<(&'a str, f64)>,
) -> String {
    match select(metrics) {
        Some((group, rate)) => format!("{group} ({})", fraction_as_percent(rate)),
        None => "n/a".to_string(),
    }
}

fn summary_line(severity: SeverityTier) -> &'static str {
    match severity {
        SeverityTier::High => {
            "**High Bias Alert**: Significant disparities detected in approval rates across \
             protected attributes."
        }
        SeverityTier::Moderate => {
            "**Moderate Bias Alert**: Some disparities detected in approval rates across \
             protected attributes."
        }
        SeverityTier::Low => {
            "**Low Bias Alert**: Minimal disparities detected in approval rates across \
             protected attributes."
        }
    }
}

fn conclusion_line(severity: SeverityTier) -> &'static str {
    match severity {
        SeverityTier::High => {
            "The model shows significant bias that requires immediate attention. Implementing \
             bias mitigation techniques is strongly recommended before deploying this model in \
             production."
        }
        SeverityTier::Moderate => {
            "The model shows moderate bias that should be addressed. Consider implementing bias \
             mitigation techniques to improve fairness before full deployment."
        }
        SeverityTier::Low => {
            "The model shows acceptable levels of bias, but continuous monitoring is \
             recommended to ensure fairness is maintained over time."
        }
    }
}
