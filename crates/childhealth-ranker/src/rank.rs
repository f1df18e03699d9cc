//! Score adjustment, ranking and risk tiers.

use serde::{Deserialize, Serialize};

/// How many conditions the results page shows.
pub const TOP_N: usize = 3;

/// Fixed boundary between the two risk tiers, inclusive on the upper side.
pub const MODERATE_RISK_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "Moderate Risk")]
    Moderate,
    #[serde(rename = "Low Risk")]
    Low,
}

impl RiskTier {
    pub fn for_score(score: f64) -> Self {
        if score >= MODERATE_RISK_THRESHOLD {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Moderate => "Moderate Risk",
            RiskTier::Low => "Low Risk",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCondition {
    pub name: String,
    /// Adjusted score, after the results-page halving.
    pub probability: f64,
    pub percentage: f64,
    pub risk_tier: RiskTier,
}

/// Halve every score.
///
/// Stacks on top of the single-value halving done when the payload was
/// created, so the originally highest condition ends up at a quarter of its
/// raw score. Kept as-is for compatibility with stored payloads.
pub fn halve_all(scores: &[f64]) -> Vec<f64> {
    scores.iter().map(|s| s / 2.0).collect()
}

/// Pair names with scores and sort descending. Ties keep their input order
/// (`sort_by` is stable); NaN sorts below every number.
pub fn rank_conditions(names: &[String], scores: &[f64]) -> Vec<RankedCondition> {
    let mut ranked: Vec<RankedCondition> = names
        .iter()
        .zip(scores.iter().copied())
        .map(|(name, p)| RankedCondition {
            name: name.clone(),
            probability: p,
            percentage: p * 100.0,
            risk_tier: RiskTier::for_score(p),
        })
        .collect();

    ranked.sort_by(|a, b| rank_key(b.probability).total_cmp(&rank_key(a.probability)));
    ranked
}

fn rank_key(p: f64) -> f64 {
    if p.is_nan() {
        f64::NEG_INFINITY
    } else {
        p
    }
}

pub fn top_n(mut ranked: Vec<RankedCondition>, n: usize) -> Vec<RankedCondition> {
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use childhealth_common::Condition;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_double_halving_compounds() {
        let stored = [0.45, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1];
        let adjusted = halve_all(&stored);
        let expected = [0.225, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05];
        for (a, e) in adjusted.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_stable_tie_break() {
        let names = Condition::names();
        let scores = [0.225, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05];
        let top: Vec<String> = top_n(rank_conditions(&names, &scores), TOP_N)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(top, vec!["Autism/ASD", "Learning Disability", "ADD/ADHD"]);
    }

    #[test]
    fn test_descending_order() {
        let names = Condition::names();
        let scores = [0.1, 0.05, 0.4, 0.0, 0.2, 0.3, 0.01, 0.02];
        let ranked = rank_conditions(&names, &scores);
        let probs: Vec<f64> = ranked.iter().map(|r| r.probability).collect();
        assert_eq!(probs, vec![0.4, 0.3, 0.2, 0.1, 0.05, 0.02, 0.01, 0.0]);
        assert_eq!(ranked[0].name, "ADD/ADHD");
        assert!((ranked[0].percentage - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_nan_sorts_last() {
        let names = Condition::names();
        let scores = [f64::NAN, 0.1, f64::NAN, 0.3, 0.2, f64::NAN, 0.0, 0.05];
        let ranked = rank_conditions(&names, &scores);
        let top: Vec<&str> = ranked.iter().take(3).map(|r| r.name.as_str()).collect();
        assert_eq!(top, vec!["Depression", "Anxiety", "Learning Disability"]);
        assert!(ranked[5..].iter().all(|r| r.probability.is_nan()));
        // NaN ties keep input order.
        let tail: Vec<&str> = ranked[5..].iter().map(|r| r.name.as_str()).collect();
        assert_eq!(tail, vec!["Autism/ASD", "ADD/ADHD", "Behavior Problems"]);
    }

    #[test]
    fn test_risk_tier_boundary() {
        assert_eq!(RiskTier::for_score(0.3), RiskTier::Moderate);
        assert_eq!(RiskTier::for_score(0.2999999), RiskTier::Low);
        assert_eq!(RiskTier::for_score(0.95), RiskTier::Moderate);
        assert_eq!(RiskTier::Moderate.to_string(), "Moderate Risk");
        assert_eq!(RiskTier::Low.label(), "Low Risk");
    }

    #[test]
    fn test_top_n_with_fewer_entries() {
        let names = vec!["A".to_string(), "B".to_string()];
        let top = top_n(rank_conditions(&names, &[0.1, 0.2]), TOP_N);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "B");
    }
}
