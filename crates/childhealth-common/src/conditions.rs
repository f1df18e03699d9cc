//! The fixed, ordered list of conditions the classifier scores.
//!
//! Model output index `i` always refers to `Condition::ALL[i]`.

use serde::{Deserialize, Serialize};

pub const CONDITION_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "Autism/ASD")]
    Autism,
    #[serde(rename = "Learning Disability")]
    LearningDisability,
    #[serde(rename = "ADD/ADHD")]
    Adhd,
    #[serde(rename = "Depression")]
    Depression,
    #[serde(rename = "Anxiety")]
    Anxiety,
    #[serde(rename = "Behavior Problems")]
    BehaviorProblems,
    #[serde(rename = "Speech Disorder")]
    SpeechDisorder,
    #[serde(rename = "Asthma")]
    Asthma,
}

impl Condition {
    /// Model output order.
    pub const ALL: [Condition; CONDITION_COUNT] = [
        Condition::Autism,
        Condition::LearningDisability,
        Condition::Adhd,
        Condition::Depression,
        Condition::Anxiety,
        Condition::BehaviorProblems,
        Condition::SpeechDisorder,
        Condition::Asthma,
    ];

    /// Display name, as carried in the prediction payload.
    pub fn name(self) -> &'static str {
        match self {
            Condition::Autism => "Autism/ASD",
            Condition::LearningDisability => "Learning Disability",
            Condition::Adhd => "ADD/ADHD",
            Condition::Depression => "Depression",
            Condition::Anxiety => "Anxiety",
            Condition::BehaviorProblems => "Behavior Problems",
            Condition::SpeechDisorder => "Speech Disorder",
            Condition::Asthma => "Asthma",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Position in the model output vector.
    pub fn index(self) -> usize {
        self as usize
    }

    /// All display names in model output order.
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|c| c.name().to_string()).collect()
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_position() {
        for (i, c) in Condition::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn test_name_round_trip() {
        assert_eq!(Condition::from_name("ADD/ADHD"), Some(Condition::Adhd));
        assert_eq!(Condition::from_name("Asthma"), Some(Condition::Asthma));
        assert_eq!(Condition::from_name("Flu"), None);
    }

    #[test]
    fn test_names_in_model_order() {
        let names = Condition::names();
        assert_eq!(names.len(), CONDITION_COUNT);
        assert_eq!(names[0], "Autism/ASD");
        assert_eq!(names[7], "Asthma");
    }
}
