use serde::Serialize;

/// Disparities above this many percentage points raise the overall severity to high.
pub const HIGH_SEVERITY_THRESHOLD: f64 = 10.0;
/// Disparities above this many percentage points draw regulatory scrutiny.
pub const REGULATORY_THRESHOLD: f64 = 5.0;

/// Overall severity derived from the largest disparity magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Low,
    Moderate,
    High,
}

impl SeverityTier {
    /// Thresholds are strict: exactly 10.0 is moderate and exactly 5.0 is low.
    pub fn classify(max_magnitude: f64) -> Self {
        if max_magnitude > HIGH_SEVERITY_THRESHOLD {
            Self::High
        } else if max_magnitude > REGULATORY_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDisparity<K> {
    pub attribute: K,
    pub disparity: f64,
    pub regulatory_concern: bool,
}

/// Disparities ordered by magnitude together with the overall severity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisparityRanking<K> {
    pub entries: Vec<RankedDisparity<K>>,
    pub severity: SeverityTier,
    pub max_magnitude: f64,
}

impl<K> DisparityRanking<K> {
    pub fn most_disparate(&self) -> Option<&RankedDisparity<K>> {
        self.entries.first()
    }

    pub fn flagged(&self) -> impl Iterator<Item = &RankedDisparity<K>> {
        self.entries.iter().filter(|entry| entry.regulatory_concern)
    }
}

/// Rank named disparities (percentage points) by absolute value, largest first.
/// Equal magnitudes keep their input order.
pub fn rank_disparities<K>(values: impl IntoIterator<Item = (K, f64)>) -> DisparityRanking<K> {
    let mut entries: Vec<RankedDisparity<K>> = values
        .into_iter()
        .map(|(attribute, disparity)| RankedDisparity {
            attribute,
            disparity,
            regulatory_concern: disparity.abs() > REGULATORY_THRESHOLD,
        })
        .collect();

    entries.sort_by(|a, b| b.disparity.abs().total_cmp(&a.disparity.abs()));

    let max_magnitude = entries
        .first()
        .map(|entry| entry.disparity.abs())
        .unwrap_or(0.0);

    DisparityRanking {
        severity: SeverityTier::classify(max_magnitude),
        entries,
        max_magnitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_fall_to_the_lower_tier() {
        assert_eq!(SeverityTier::classify(10.0), SeverityTier::Moderate);
        assert_eq!(SeverityTier::classify(10.01), SeverityTier::High);
        assert_eq!(SeverityTier::classify(5.0), SeverityTier::Low);
        assert_eq!(SeverityTier::classify(5.01), SeverityTier::Moderate);
        assert_eq!(SeverityTier::classify(0.0), SeverityTier::Low);
    }

    #[test]
    fn sorts_by_magnitude_and_flags_regulatory_concern() {
        let ranking = rank_disparities([("Gender", 8.0), ("Race", -13.0), ("Age Group", 2.0)]);
        let order: Vec<&str> = ranking.entries.iter().map(|e| e.attribute).collect();
        assert_eq!(order, vec!["Race", "Gender", "Age Group"]);
        assert_eq!(ranking.severity, SeverityTier::High);
        assert_eq!(ranking.max_magnitude, 13.0);
        let flagged: Vec<&str> = ranking.flagged().map(|e| e.attribute).collect();
        assert_eq!(flagged, vec!["Race", "Gender"]);
    }

    #[test]
    fn equal_magnitudes_keep_input_order() {
        let ranking = rank_disparities([("a", 7.0), ("b", -7.0), ("c", 7.0), ("d", 1.0)]);
        let order: Vec<&str> = ranking.entries.iter().map(|e| e.attribute).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);

        let ranking = rank_disparities([("c", 7.0), ("a", 7.0), ("b", -7.0)]);
        let order: Vec<&str> = ranking.entries.iter().map(|e| e.attribute).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
        assert_eq!(ranking.severity, SeverityTier::Moderate);
    }

    #[test]
    fn all_zero_disparities_are_low_without_flags() {
        let ranking = rank_disparities([("a", 0.0), ("b", 0.0)]);
        assert_eq!(ranking.severity, SeverityTier::Low);
        assert_eq!(ranking.flagged().count(), 0);
        assert_eq!(ranking.most_disparate().map(|e| e.attribute), Some("a"));
    }

    #[test]
    fn empty_input_is_low() {
        let ranking = rank_disparities(Vec::<(&str, f64)>::new());
        assert_eq!(ranking.severity, SeverityTier::Low);
        assert!(ranking.most_disparate().is_none());
    }
}
