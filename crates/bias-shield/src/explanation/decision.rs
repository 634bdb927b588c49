use crate::lending::{LoanApplication, PredictionResult};

use super::format::{currency, fraction_as_percent, humanize_factor};
use super::SIGNATURE;

const TOP_FACTOR_COUNT: usize = 3;

const MAINTENANCE_RECOMMENDATIONS: [&str; 3] = [
    "Maintain your current credit score by making timely payments",
    "Consider setting up automatic payments to avoid any missed deadlines",
    "Review your loan terms carefully before proceeding",
];

const IMPROVEMENT_RECOMMENDATIONS: [&str; 4] = [
    "Work on improving your credit score through timely bill payments",
    "Reduce existing debt before applying for new credit",
    "Consider applying for a smaller loan amount relative to your income",
    "Wait 3-6 months before reapplying to allow time for credit improvements",
];

/// Narrative explanation of a single approval or denial.
pub fn loan_decision_explanation(
    application: &LoanApplication,
    prediction: &PredictionResult,
) -> String {
    let probability = fraction_as_percent(prediction.approval_probability);
    let factors = prediction.ranked_factors();
    let top_factors = factors.iter().take(TOP_FACTOR_COUNT);

    let mut message = String::from("\n");

    if prediction.approved {
        message.push_str(&format!(
            "We are pleased to inform you that your loan application has been approved with an \
             approval probability of {probability}. Our BiasShield system has carefully evaluated \
             your application, taking into account various factors that contribute to your \
             creditworthiness.\n\n"
        ));
        message.push_str("The key factors that positively influenced this decision include:\n");
        for (factor, impact) in top_factors {
            message.push_str(&format!(
                "- {}: This factor had a {} impact on your approval\n",
                humanize_factor(factor),
                fraction_as_percent(*impact)
            ));
        }

        message.push_str(&format!(
            "\nYour credit score of {} and income of {} demonstrate financial stability, which \
             are important indicators of your ability to repay the loan.\n\n",
            application.credit_score,
            currency(application.income)
        ));
        push_recommendations(&mut message, "Recommendations:", &MAINTENANCE_RECOMMENDATIONS);
        message.push_str(
            "\nThank you for choosing our services. If you have any questions about your \
             approval or the next steps, please don't hesitate to contact our customer service \
             team.\n",
        );
    } else {
        message.push_str(&format!(
            "We regret to inform you that your loan application has not been approved at this \
             time. Our BiasShield system has carefully evaluated your application and determined \
             that it does not meet our current lending criteria. The decision was made with an \
             approval probability of {probability}.\n\n"
        ));
        message.push_str("The key factors that influenced this decision include:\n");
        for (factor, impact) in top_factors {
            message.push_str(&format!(
                "- {}: This factor had a {} impact on the decision\n",
                humanize_factor(factor),
                fraction_as_percent(*impact)
            ));
        }

        message.push('\n');
        push_recommendations(
            &mut message,
            "Recommendations to improve your future applications:",
            &IMPROVEMENT_RECOMMENDATIONS,
        );
        message.push_str(
            "\nWe encourage you to review your credit report for any inaccuracies and address \
             any issues that may be affecting your creditworthiness. If you believe this \
             decision was made in error or would like more information, you can request a \
             detailed explanation of the decision.\n",
        );
    }

    message.push('\n');
    message.push_str(SIGNATURE);
    message.push('\n');
    message
}

fn push_recommendations(message: &mut String, heading: &str, items: &[&str]) {
    message.push_str(heading);
    message.push('\n');
    for (index, item) in items.iter().enumerate() {
        message.push_str(&format!("{}. {item}\n", index + 1));
    }
}
