//! Feature encoder: questionnaire answers → model input vector.
//!
//! The model boundary is positional, not named. A reordering here silently
//! corrupts every prediction, so the order is spelled out field by field and
//! pinned by `FEATURE_ORDER`.

use childhealth_common::{FormAnswers, FIELD_COUNT};

/// Feature names in the order the classifier was trained on.
pub const FEATURE_ORDER: [&str; FIELD_COUNT] = [
    "age",
    "gender",
    "race",
    "general_health",
    "birth_order",
    "born_usa",
    "family_structure",
    "financial_hardship",
    "food_situation",
    "family_meal",
    "child_care_difficulty",
    "family_talk",
    "neighborhood_safety",
    "rec_center",
    "library",
    "screen_time",
    "cigarettes",
    "vape",
    "breathing_difficulty",
    "stomach_problems",
    "headaches",
    "concussion",
    "overweight",
    "weight_concern",
    "heart_condition",
    "diabetes",
    "parent_education",
    "parent_mental_health",
    "parent_physical_health",
    "homeless",
    "racial_unfair",
    "witness_violence",
    "victim_violence",
];

/// Unscaled model input, one value per `FEATURE_ORDER` entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FIELD_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Pure positional assembly. No validation: `FormAnswers` is already checked.
pub fn encode(a: &FormAnswers) -> FeatureVector {
    FeatureVector([
        f64::from(a.age),
        f64::from(a.gender),
        f64::from(a.race),
        f64::from(a.general_health),
        f64::from(a.birth_order),
        f64::from(a.born_usa),
        f64::from(a.family_structure),
        f64::from(a.financial_hardship),
        f64::from(a.food_situation),
        f64::from(a.family_meal),
        f64::from(a.child_care_difficulty),
        f64::from(a.family_talk),
        f64::from(a.neighborhood_safety),
        f64::from(a.rec_center),
        f64::from(a.library),
        f64::from(a.screen_time),
        f64::from(a.cigarettes),
        f64::from(a.vape),
        f64::from(a.breathing_difficulty),
        f64::from(a.stomach_problems),
        f64::from(a.headaches),
        f64::from(a.concussion),
        f64::from(a.overweight),
        f64::from(a.weight_concern),
        f64::from(a.heart_condition),
        f64::from(a.diabetes),
        f64::from(a.parent_education),
        f64::from(a.parent_mental_health),
        f64::from(a.parent_physical_health),
        f64::from(a.homeless),
        f64::from(a.racial_unfair),
        f64::from(a.witness_violence),
        f64::from(a.victim_violence),
    ])
}
