use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ranking::{rank_disparities, DisparityRanking};

/// Per-group rates keyed by group label. Ordered so extreme-group ties resolve by label.
pub type GroupRates = BTreeMap<String, f64>;

/// Allowed gap between a reported disparity and the spread of its rates.
pub const DISPARITY_TOLERANCE: f64 = 1e-6;

/// Contract violations raised while accepting fairness metrics from a caller.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("fairness metrics missing protected attribute '{0}'")]
    MissingAttribute(ProtectedAttribute),
    #[error("{attribute} {metric} for group '{group}' must be within [0, 1] (found {value})")]
    InvalidRate {
        attribute: ProtectedAttribute,
        metric: &'static str,
        group: String,
        value: f64,
    },
    #[error("{attribute} {metric} must be a finite non-negative number (found {value})")]
    InvalidDisparity {
        attribute: ProtectedAttribute,
        metric: &'static str,
        value: f64,
    },
    #[error("{attribute} {metric} is {found} but its rates span {expected}")]
    InconsistentDisparity {
        attribute: ProtectedAttribute,
        metric: &'static str,
        expected: f64,
        found: f64,
    },
}

/// The closed set of attributes monitored for differential treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectedAttribute {
    Gender,
    Race,
    AgeGroup,
    DisabilityStatus,
}

impl ProtectedAttribute {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Gender,
            Self::Race,
            Self::AgeGroup,
            Self::DisabilityStatus,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Race => "race",
            Self::AgeGroup => "age_group",
            Self::DisabilityStatus => "disability_status",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Gender => "Gender",
            Self::Race => "Race",
            Self::AgeGroup => "Age Group",
            Self::DisabilityStatus => "Disability Status",
        }
    }
}

impl fmt::Display for ProtectedAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Approval and error rates for one protected attribute, plus their spreads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    pub approval_rates: GroupRates,
    pub approval_disparity: f64,
    pub fp_rates: GroupRates,
    pub fn_rates: GroupRates,
    pub fp_disparity: f64,
    pub fn_disparity: f64,
}

impl GroupMetrics {
    pub fn from_rates(
        approval_rates: GroupRates,
        fp_rates: GroupRates,
        fn_rates: GroupRates,
    ) -> Self {
        let mut metrics = Self {
            approval_rates,
            approval_disparity: 0.0,
            fp_rates,
            fn_rates,
            fp_disparity: 0.0,
            fn_disparity: 0.0,
        };
        metrics.recompute();
        metrics
    }

    /// Re-derive every disparity from its rate mapping.
    pub fn recompute(&mut self) {
        self.approval_disparity = rate_spread(&self.approval_rates);
        self.fp_disparity = rate_spread(&self.fp_rates);
        self.fn_disparity = rate_spread(&self.fn_rates);
    }

    fn disparities(&self) -> [(&'static str, f64, &GroupRates); 3] {
        [
            ("approval_disparity", self.approval_disparity, &self.approval_rates),
            ("fp_disparity", self.fp_disparity, &self.fp_rates),
            ("fn_disparity", self.fn_disparity, &self.fn_rates),
        ]
    }

    pub fn is_consistent(&self) -> bool {
        self.disparities().iter().all(|(_, disparity, rates)| {
            (disparity - rate_spread(rates)).abs() <= DISPARITY_TOLERANCE
        })
    }

    pub fn validate(&self, attribute: ProtectedAttribute) -> Result<(), AnalysisError> {
        for (metric, rates) in [
            ("approval_rates", &self.approval_rates),
            ("fp_rates", &self.fp_rates),
            ("fn_rates", &self.fn_rates),
        ] {
            if let Some((group, value)) = rates
                .iter()
                .find(|(_, value)| !value.is_finite() || !(0.0..=1.0).contains(*value))
            {
                return Err(AnalysisError::InvalidRate {
                    attribute,
                    metric,
                    group: group.clone(),
                    value: *value,
                });
            }
        }

        for (metric, value, rates) in self.disparities() {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::InvalidDisparity {
                    attribute,
                    metric,
                    value,
                });
            }
            let expected = rate_spread(rates);
            if (value - expected).abs() > DISPARITY_TOLERANCE {
                return Err(AnalysisError::InconsistentDisparity {
                    attribute,
                    metric,
                    expected,
                    found: value,
                });
            }
        }

        Ok(())
    }

    /// Group with the highest approval rate; the first label in key order wins ties.
    pub fn highest_approval(&self) -> Option<(&str, f64)> {
        self.approval_rates
            .iter()
            .fold(None, |best: Option<(&str, f64)>, (group, rate)| match best {
                Some((_, current)) if *rate <= current => best,
                _ => Some((group.as_str(), *rate)),
            })
    }

    /// Group with the lowest approval rate; the first label in key order wins ties.
    pub fn lowest_approval(&self) -> Option<(&str, f64)> {
        self.approval_rates
            .iter()
            .fold(None, |best: Option<(&str, f64)>, (group, rate)| match best {
                Some((_, current)) if *rate >= current => best,
                _ => Some((group.as_str(), *rate)),
            })
    }
}

/// Difference between the largest and smallest rate; zero for an empty mapping.
pub fn rate_spread(rates: &GroupRates) -> f64 {
    let mut values = rates.values().copied();
    let Some(first) = values.next() else {
        return 0.0;
    };
    let (min, max) = values.fold((first, first), |(min, max), value| {
        (min.min(value), max.max(value))
    });
    max - min
}

/// Fairness metrics for the four monitored attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, GroupMetrics>")]
pub struct FairnessReport {
    pub gender: GroupMetrics,
    pub race: GroupMetrics,
    pub age_group: GroupMetrics,
    pub disability_status: GroupMetrics,
}

impl FairnessReport {
    pub fn get(&self, attribute: ProtectedAttribute) -> &GroupMetrics {
        match attribute {
            ProtectedAttribute::Gender => &self.gender,
            ProtectedAttribute::Race => &self.race,
            ProtectedAttribute::AgeGroup => &self.age_group,
            ProtectedAttribute::DisabilityStatus => &self.disability_status,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProtectedAttribute, &GroupMetrics)> + '_ {
        ProtectedAttribute::ordered()
            .into_iter()
            .map(move |attribute| (attribute, self.get(attribute)))
    }

    /// Approval disparities scaled to percentage points, in canonical attribute order.
    pub fn approval_disparities(&self) -> Vec<(ProtectedAttribute, f64)> {
        self.iter()
            .map(|(attribute, metrics)| (attribute, metrics.approval_disparity * 100.0))
            .collect()
    }

    pub fn ranking(&self) -> DisparityRanking<ProtectedAttribute> {
        rank_disparities(self.approval_disparities())
    }

    /// Attribute with the widest approval gap. Earlier attributes win ties, as in the ranking.
    pub fn most_disparate_attribute(&self) -> ProtectedAttribute {
        let [first, rest @ ..] = ProtectedAttribute::ordered();
        rest.into_iter().fold(first, |best, candidate| {
            let gap = |attribute| self.get(attribute).approval_disparity.abs();
            if gap(candidate) > gap(best) {
                candidate
            } else {
                best
            }
        })
    }
}

impl TryFrom<BTreeMap<String, GroupMetrics>> for FairnessReport {
    type Error = AnalysisError;

    fn try_from(mut raw: BTreeMap<String, GroupMetrics>) -> Result<Self, Self::Error> {
        let mut take = |attribute: ProtectedAttribute| -> Result<GroupMetrics, AnalysisError> {
            let metrics = raw
                .remove(attribute.key())
                .ok_or(AnalysisError::MissingAttribute(attribute))?;
            metrics.validate(attribute)?;
            Ok(metrics)
        };

        Ok(Self {
            gender: take(ProtectedAttribute::Gender)?,
            race: take(ProtectedAttribute::Race)?,
            age_group: take(ProtectedAttribute::AgeGroup)?,
            disability_status: take(ProtectedAttribute::DisabilityStatus)?,
        })
    }
}
