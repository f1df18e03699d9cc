//! Condition → NPI taxonomy code, and the state dropdown.

use childhealth_common::Condition;

/// Child & Adolescent Psychiatry.
pub const CHILD_ADOLESCENT_PSYCHIATRY: &str = "2084P0804X";
/// Adolescent and Children Mental Health clinic.
pub const CHILDREN_MENTAL_HEALTH_CLINIC: &str = "261QM0855X";
/// Mental Health clinic.
pub const MENTAL_HEALTH_CLINIC: &str = "261QM0801X";

pub fn condition_taxonomy(condition: Condition) -> &'static str {
    match condition {
        Condition::Autism
        | Condition::LearningDisability
        | Condition::Adhd
        | Condition::Depression
        | Condition::Anxiety
        | Condition::BehaviorProblems => CHILD_ADOLESCENT_PSYCHIATRY,
        Condition::SpeechDisorder => CHILDREN_MENTAL_HEALTH_CLINIC,
        Condition::Asthma => MENTAL_HEALTH_CLINIC,
    }
}

/// Taxonomy code for a condition display name, if it is one of the eight.
pub fn taxonomy_code(condition_name: &str) -> Option<&'static str> {
    Condition::from_name(condition_name).map(condition_taxonomy)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsState {
    pub name: &'static str,
    pub code: &'static str,
}

const fn st(name: &'static str, code: &'static str) -> UsState {
    UsState { name, code }
}

pub const DEFAULT_STATE: &str = "TX";

pub const US_STATES: [UsState; 51] = [
    st("Alabama", "AL"),
    st("Alaska", "AK"),
    st("Arizona", "AZ"),
    st("Arkansas", "AR"),
    st("California", "CA"),
    st("Colorado", "CO"),
    st("Connecticut", "CT"),
    st("Delaware", "DE"),
    st("Florida", "FL"),
    st("Georgia", "GA"),
    st("Hawaii", "HI"),
    st("Idaho", "ID"),
    st("Illinois", "IL"),
    st("Indiana", "IN"),
    st("Iowa", "IA"),
    st("Kansas", "KS"),
    st("Kentucky", "KY"),
    st("Louisiana", "LA"),
    st("Maine", "ME"),
    st("Maryland", "MD"),
    st("Massachusetts", "MA"),
    st("Michigan", "MI"),
    st("Minnesota", "MN"),
    st("Mississippi", "MS"),
    st("Missouri", "MO"),
    st("Montana", "MT"),
    st("Nebraska", "NE"),
    st("Nevada", "NV"),
    st("New Hampshire", "NH"),
    st("New Jersey", "NJ"),
    st("New Mexico", "NM"),
    st("New York", "NY"),
    st("North Carolina", "NC"),
    st("North Dakota", "ND"),
    st("Ohio", "OH"),
    st("Oklahoma", "OK"),
    st("Oregon", "OR"),
    st("Pennsylvania", "PA"),
    st("Rhode Island", "RI"),
    st("South Carolina", "SC"),
    st("South Dakota", "SD"),
    st("Tennessee", "TN"),
    st("Texas", "TX"),
    st("Utah", "UT"),
    st("Vermont", "VT"),
    st("Virginia", "VA"),
    st("Washington", "WA"),
    st("West Virginia", "WV"),
    st("Wisconsin", "WI"),
    st("Wyoming", "WY"),
    st("District of Columbia", "DC"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_map() {
        assert_eq!(taxonomy_code("Autism/ASD"), Some("2084P0804X"));
        assert_eq!(taxonomy_code("Behavior Problems"), Some("2084P0804X"));
        assert_eq!(taxonomy_code("Speech Disorder"), Some("261QM0855X"));
        assert_eq!(taxonomy_code("Asthma"), Some("261QM0801X"));
        assert_eq!(taxonomy_code("Flu"), None);
    }

    #[test]
    fn test_every_condition_has_a_code() {
        for c in Condition::ALL {
            assert_eq!(condition_taxonomy(c).len(), 10);
        }
    }

    #[test]
    fn test_states_include_default_and_dc() {
        assert!(US_STATES.iter().any(|s| s.code == DEFAULT_STATE));
        assert!(US_STATES.iter().any(|s| s.code == "DC"));
        let mut codes: Vec<&str> = US_STATES.iter().map(|s| s.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 51);
    }
}
