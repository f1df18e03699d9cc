//! Results view model: the NoData / HasData state machine.
//!
//! Input is the stored payload text exactly as the result store holds it.
//! Parsing goes through `serde_json::Value` and picks out only the fields the
//! page needs, so payloads written by older builds (or hand-edited ones) are
//! read as long as `predictions` and `conditions` make sense.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::rank::{halve_all, rank_conditions, top_n, RankedCondition, RiskTier, TOP_N};

pub const NO_DATA_NOTICE: &str = "No prediction data available. Please make a prediction first.";

pub const CHART_TITLE: &str = "Top 3 Predicted Health Conditions";
pub const CHART_X_AXIS: &str = "Probability (%)";

/// Bar colours by rank: blue, teal, orange.
pub const BAR_COLORS: [&str; TOP_N] = ["#63B3ED", "#4FD1C5", "#F6AD55"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub condition: String,
    pub percentage: f64,
    pub text: String,
    pub color: &'static str,
}

/// Horizontal bar chart, one bar per ranked condition.
///
/// `categories` lists the y-axis order bottom to top, ascending by value, so
/// the highest-scoring condition is drawn as the top bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: &'static str,
    pub x_axis: &'static str,
    pub bars: Vec<Bar>,
    pub categories: Vec<String>,
}

impl BarChart {
    pub fn from_ranked(ranked: &[RankedCondition]) -> Self {
        let bars: Vec<Bar> = ranked
            .iter()
            .zip(BAR_COLORS.iter().copied())
            .map(|(r, color)| Bar {
                condition: r.name.clone(),
                percentage: r.percentage,
                text: format!("{:.1}%", r.percentage),
                color,
            })
            .collect();
        let categories = bars.iter().rev().map(|b| b.condition.clone()).collect();
        Self { title: CHART_TITLE, x_axis: CHART_X_AXIS, bars, categories }
    }

    /// Bar length relative to the longest bar, in percent of the plot width.
    pub fn width_pct(&self, bar: &Bar) -> f64 {
        let max = self.bars.iter().map(|b| b.percentage).fold(0.0_f64, f64::max);
        if max <= 0.0 {
            0.0
        } else {
            (bar.percentage / max * 100.0).clamp(0.0, 100.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub condition: String,
    pub percentage_text: String,
    pub risk_tier: RiskTier,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResultsView {
    NoData {
        notice: &'static str,
    },
    HasData {
        ranked: Vec<RankedCondition>,
        chart: BarChart,
        cards: Vec<SummaryCard>,
        /// Scores are random fallback output, not the trained model's.
        degraded: bool,
        timestamp: Option<String>,
    },
}

impl ResultsView {
    pub fn no_data() -> Self {
        ResultsView::NoData { notice: NO_DATA_NOTICE }
    }

    pub fn has_data(&self) -> bool {
        matches!(self, ResultsView::HasData { .. })
    }
}

/// Build the view from stored payload text. `None`, unparseable text and
/// structurally wrong payloads all land in `NoData`.
pub fn present(raw: Option<&str>) -> ResultsView {
    let Some(raw) = raw else {
        debug!("no stored payload");
        return ResultsView::no_data();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => present_value(&value),
        Err(e) => {
            warn!(error = %e, "stored payload is not valid JSON");
            ResultsView::no_data()
        }
    }
}

pub fn present_value(value: &Value) -> ResultsView {
    let Some((conditions, predictions)) = extract(value) else {
        return ResultsView::no_data();
    };

    let adjusted = halve_all(&predictions);
    let ranked = top_n(rank_conditions(&conditions, &adjusted), TOP_N);

    let chart = BarChart::from_ranked(&ranked);
    let cards = ranked
        .iter()
        .zip(BAR_COLORS.iter().copied())
        .map(|(r, color)| SummaryCard {
            condition: r.name.clone(),
            percentage_text: format!("{:.1}%", r.percentage),
            risk_tier: r.risk_tier,
            color,
        })
        .collect();

    let degraded = value.get("score_source").and_then(Value::as_str) == Some("fallback");
    let timestamp = value.get("timestamp").and_then(Value::as_str).map(str::to_string);

    ResultsView::HasData { ranked, chart, cards, degraded, timestamp }
}

fn extract(value: &Value) -> Option<(Vec<String>, Vec<f64>)> {
    let predictions = value.get("predictions")?.as_array()?;
    let conditions = value.get("conditions")?.as_array()?;

    if predictions.is_empty() || conditions.is_empty() {
        debug!("stored payload has empty predictions or conditions");
        return None;
    }
    if predictions.len() != conditions.len() {
        warn!(
            predictions = predictions.len(),
            conditions = conditions.len(),
            "stored payload lists differ in length"
        );
        return None;
    }

    let scores = predictions.iter().map(Value::as_f64).collect::<Option<Vec<_>>>()?;
    let names = conditions
        .iter()
        .map(|c| c.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()?;
    Some((names, scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(predictions: Value) -> String {
        json!({
            "predictions": predictions,
            "conditions": ["Autism/ASD", "Learning Disability", "ADD/ADHD", "Depression",
                           "Anxiety", "Behavior Problems", "Speech Disorder", "Asthma"],
            "timestamp": "2025-03-01T10:15:00Z",
            "original_highest_value": 0.9,
            "highest_condition_index": 0,
            "halved_highest": true
        })
        .to_string()
    }

    #[test]
    fn test_absent_payload_is_no_data() {
        assert_eq!(present(None), ResultsView::no_data());
    }

    #[test]
    fn test_empty_lists_are_no_data() {
        let raw = json!({ "predictions": [], "conditions": [] }).to_string();
        assert!(!present(Some(&raw)).has_data());
        let raw = json!({ "predictions": [0.1], "conditions": [] }).to_string();
        assert!(!present(Some(&raw)).has_data());
    }

    #[test]
    fn test_malformed_payloads_are_no_data() {
        for raw in [
            "not json",
            "null",
            "[]",
            r#"{"predictions": "x", "conditions": ["A"]}"#,
            r#"{"predictions": [0.1, "bad"], "conditions": ["A", "B"]}"#,
            r#"{"predictions": [0.1, 0.2], "conditions": ["A"]}"#,
            r#"{"conditions": ["A"]}"#,
        ] {
            assert_eq!(present(Some(raw)), ResultsView::no_data(), "input: {raw}");
        }
    }

    #[test]
    fn test_has_data_ranks_after_second_halving() {
        let raw = payload(json!([0.45, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1]));
        let ResultsView::HasData { ranked, chart, cards, degraded, timestamp } =
            present(Some(&raw))
        else {
            panic!("expected HasData");
        };

        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Autism/ASD", "Learning Disability", "ADD/ADHD"]);
        assert!((ranked[0].probability - 0.225).abs() < 1e-12);
        assert!((ranked[1].probability - 0.05).abs() < 1e-12);
        assert!(ranked.iter().all(|r| r.risk_tier == RiskTier::Low));

        assert_eq!(chart.bars[0].text, "22.5%");
        assert_eq!(chart.bars[0].color, "#63B3ED");
        assert_eq!(chart.categories, vec!["ADD/ADHD", "Learning Disability", "Autism/ASD"]);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[1].percentage_text, "5.0%");
        assert!(!degraded);
        assert_eq!(timestamp.as_deref(), Some("2025-03-01T10:15:00Z"));
    }

    #[test]
    fn test_moderate_tier_after_halving() {
        let raw = payload(json!([0.3, 0.6, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1]));
        let ResultsView::HasData { ranked, .. } = present(Some(&raw)) else {
            panic!("expected HasData");
        };
        assert_eq!(ranked[0].name, "Learning Disability");
        assert_eq!(ranked[0].risk_tier, RiskTier::Moderate);
        assert_eq!(ranked[1].risk_tier, RiskTier::Low);
    }

    #[test]
    fn test_fallback_source_marks_degraded() {
        let mut v: Value = serde_json::from_str(&payload(json!(vec![0.2; 8]))).unwrap();
        v["score_source"] = json!("fallback");
        let ResultsView::HasData { degraded, .. } = present_value(&v) else {
            panic!("expected HasData");
        };
        assert!(degraded);
    }

    #[test]
    fn test_bar_width_relative_to_longest() {
        let raw = payload(json!([0.8, 0.4, 0.2, 0.0, 0.0, 0.0, 0.0, 0.0]));
        let ResultsView::HasData { chart, .. } = present(Some(&raw)) else {
            panic!("expected HasData");
        };
        assert!((chart.width_pct(&chart.bars[0]) - 100.0).abs() < 1e-9);
        assert!((chart.width_pct(&chart.bars[1]) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_data_serialises_with_state_tag() {
        let v = serde_json::to_value(ResultsView::no_data()).unwrap();
        assert_eq!(v["state"], json!("no_data"));
        assert_eq!(v["notice"], json!(NO_DATA_NOTICE));
    }
}
