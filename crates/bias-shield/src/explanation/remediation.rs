use crate::fairness::{FairnessReport, REGULATORY_THRESHOLD};

use super::format::percent;

/// A numbered strategy heading with its bullet points.
struct Strategy {
    title: &'static str,
    actions: &'static [&'static str],
}

const DATA_REBALANCING: Strategy = Strategy {
    title: "Data Rebalancing",
    actions: &[
        "Apply instance weighting to compensate for underrepresented groups",
        "Use reweighing techniques from the AIF360 toolkit",
        "Consider synthetic data generation for minority groups",
    ],
};

const MODEL_ADJUSTMENTS: Strategy = Strategy {
    title: "Model Adjustments",
    actions: &[
        "Optimize classification thresholds separately for each demographic group",
        "Implement adversarial debiasing techniques",
        "Consider ensemble methods that combine multiple fair classifiers",
    ],
};

const FEATURE_ENGINEERING: [Strategy; 2] = [
    Strategy {
        title: "Feature Selection",
        actions: &[
            "Remove or reduce weight of features highly correlated with protected attributes",
            "Identify and eliminate proxy variables that may encode bias",
        ],
    },
    Strategy {
        title: "Feature Transformation",
        actions: &[
            "Apply fairness-aware feature transformations",
            "Develop composite features that are less correlated with protected attributes",
        ],
    },
];

const POLICY_RECOMMENDATIONS: [Strategy; 2] = [
    Strategy {
        title: "Process Changes",
        actions: &[
            "Implement a second-level review for rejected applications from protected groups",
            "Establish clear documentation requirements for all lending decisions",
        ],
    },
    Strategy {
        title: "Monitoring Framework",
        actions: &[
            "Set up continuous monitoring of approval rates across demographic groups",
            "Establish disparity thresholds that trigger automatic reviews",
            "Conduct regular fairness audits with detailed reporting",
        ],
    },
];

const IMPLEMENTATION_CONSIDERATIONS: [Strategy; 3] = [
    Strategy {
        title: "Performance Tradeoffs",
        actions: &[
            "Be aware that some fairness constraints may slightly reduce overall model accuracy",
            "Establish acceptable thresholds for both fairness and performance",
        ],
    },
    Strategy {
        title: "Regulatory Compliance",
        actions: &[
            "Document all bias mitigation efforts for regulatory review",
            "Ensure compliance with ECOA, FHA, and FCRA requirements",
            "Prepare explanations for any remaining disparities",
        ],
    },
    Strategy {
        title: "Validation Approach",
        actions: &[
            "Test remediation strategies on historical data before implementation",
            "Use A/B testing to validate improvements in fairness metrics",
            "Establish a feedback loop for continuous improvement",
        ],
    },
];

/// Remediation playbook steering attention to the most disparate attribute.
pub fn remediation_strategy(report: &FairnessReport) -> String {
    let ranking = report.ranking();
    let most_biased = report.most_disparate_attribute().label();

    let mut message = String::from("## Bias Remediation Strategy\n\n");

    message.push_str("### Technical Strategies\n\n");
    let focus = format!(
        "Focus particularly on {most_biased} fairness, which shows the highest disparity"
    );
    push_strategy(
        &mut message,
        1,
        "Fairness Constraints",
        &[
            "Implement Demographic Parity constraints during model training",
            "Apply Equalized Odds constraints to balance error rates across groups",
            focus.as_str(),
        ],
    );
    push_strategy(&mut message, 2, DATA_REBALANCING.title, DATA_REBALANCING.actions);
    push_strategy(&mut message, 3, MODEL_ADJUSTMENTS.title, MODEL_ADJUSTMENTS.actions);

    push_section(&mut message, "Feature Engineering Approaches", &FEATURE_ENGINEERING);
    push_section(&mut message, "Policy Recommendations", &POLICY_RECOMMENDATIONS);
    push_section(
        &mut message,
        "Implementation Considerations",
        &IMPLEMENTATION_CONSIDERATIONS,
    );

    message.push_str("### Attributes Above Threshold\n\n");
    let flagged: Vec<String> = ranking
        .flagged()
        .map(|entry| format!("- {}: {}", entry.attribute.label(), percent(entry.disparity)))
        .collect();
    if flagged.is_empty() {
        message.push_str(&format!(
            "No protected attribute exceeds the {REGULATORY_THRESHOLD:.0}% disparity threshold.\n"
        ));
    } else {
        for line in flagged {
            message.push_str(&line);
            message.push('\n');
        }
    }

    message
}

fn push_section(message: &mut String, heading: &str, strategies: &[Strategy]) {
    message.push_str(&format!("### {heading}\n\n"));
    for (index, strategy) in strategies.iter().enumerate() {
        push_strategy(message, index + 1, strategy.title, strategy.actions);
    }
}

fn push_strategy(message: &mut String, number: usize, title: &str, actions: &[&str]) {
    message.push_str(&format!("{number}. **{title}**:\n"));
    for action in actions {
        message.push_str(&format!("   - {action}\n"));
    }
    message.push('\n');
}
