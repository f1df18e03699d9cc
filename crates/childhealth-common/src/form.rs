//! The 33-field questionnaire: field definitions, option tables, and the
//! validated `FormAnswers` record handed to the feature encoder.
//!
//! Every answer is a small integer code. The encoder trusts these codes, so
//! all validation happens here, at the point where raw input is collected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FIELD_COUNT: usize = 33;

/// A selectable answer: display label and the code sent to the model.
pub type FormOption = (&'static str, u8);

const YES_NO: &[FormOption] = &[("Yes", 1), ("No", 2)];

const HEALTH_SCALE: &[FormOption] = &[
    ("Excellent", 1),
    ("Very Good", 2),
    ("Good", 3),
    ("Fair", 4),
    ("Poor", 5),
];

const AGE: &[FormOption] = &[
    ("1", 1), ("2", 2), ("3", 3), ("4", 4), ("5", 5), ("6", 6),
    ("7", 7), ("8", 8), ("9", 9), ("10", 10), ("11", 11), ("12", 12),
    ("13", 13), ("14", 14), ("15", 15), ("16", 16), ("17", 17),
];

const GENDER: &[FormOption] = &[("Male", 1), ("Female", 2)];

// 6 ("Some other race alone") is not offered.
const RACE: &[FormOption] = &[
    ("White alone", 1),
    ("Black or African American alone", 2),
    ("American Indian or Alaska Native alone", 3),
    ("Asian alone", 4),
    ("Native Hawaiian and Other Pacific Islander alone", 5),
    ("Two or More Races", 7),
];

const BIRTH_ORDER: &[FormOption] = &[
    ("Only child", 1),
    ("Oldest child", 2),
    ("Second oldest child", 3),
    ("Third oldest child", 4),
    ("Fourth or greater oldest child", 5),
];

const FAMILY_STRUCTURE: &[FormOption] = &[
    ("Two biological/adoptive parents, married", 1),
    ("Two biological/adoptive parents, not married", 2),
    ("Two parents (at least one not bio/adoptive), married", 3),
    ("Two parents (at least one not bio/adoptive), not married", 4),
    ("Single mother", 5),
    ("Single father", 6),
    ("Grandparent household", 7),
    ("Other relation", 8),
];

const FINANCIAL_HARDSHIP: &[FormOption] = &[
    ("Never", 1),
    ("Rarely", 2),
    ("Somewhat often", 3),
    ("Very often", 4),
];

const FOOD_SITUATION: &[FormOption] = &[
    ("Always afford good nutritious meals", 1),
    ("Always afford enough but not always nutritious", 2),
    ("Sometimes could not afford enough", 3),
    ("Often could not afford enough", 4),
];

const FAMILY_MEAL: &[FormOption] = &[
    ("0 days", 1),
    ("1-3 days", 2),
    ("4-6 days", 3),
    ("Every day", 4),
];

const CHILD_CARE_DIFFICULTY: &[FormOption] = &[
    ("Never", 1),
    ("Rarely", 2),
    ("Sometimes", 3),
    ("Usually", 4),
    ("Always", 5),
];

const FAMILY_TALK: &[FormOption] = &[
    ("All of the time", 1),
    ("Most of the time", 2),
    ("Some of the time", 3),
    ("None of the time", 4),
];

const NEIGHBORHOOD_SAFETY: &[FormOption] = &[
    ("Definitely agree", 1),
    ("Somewhat agree", 2),
    ("Somewhat disagree", 3),
    ("Definitely disagree", 4),
];

const SCREEN_TIME: &[FormOption] = &[
    ("Less than 1 hour", 1),
    ("1 hour", 2),
    ("2 hours", 3),
    ("3 hours", 4),
    ("4 or more hours", 5),
];

const WEIGHT_CONCERN: &[FormOption] = &[
    ("Yes, too high", 1),
    ("Yes, too low", 2),
    ("Not concerned", 3),
];

const EDUCATION: &[FormOption] = &[
    ("8th grade or less", 1),
    ("9th-12th grade, No diploma", 2),
    ("High School Graduate or GED", 3),
    ("Vocational/trade/business school", 4),
    ("Some College Credit, No Degree", 5),
    ("Associate Degree", 6),
    ("Bachelor's Degree", 7),
    ("Master's Degree", 8),
    ("Doctorate or Professional Degree", 9),
];

const HOMELESS: &[FormOption] = &[("Yes", 1), ("No", 2), ("Don't Know", 3)];

/// Visual grouping of fields on the questionnaire page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormSection {
    ChildInformation,
    FamilyEnvironment,
    HealthLifestyle,
    MedicalHistory,
    AdultHealth,
    AdverseExperiences,
}

impl FormSection {
    pub const ALL: [FormSection; 6] = [
        FormSection::ChildInformation,
        FormSection::FamilyEnvironment,
        FormSection::HealthLifestyle,
        FormSection::MedicalHistory,
        FormSection::AdultHealth,
        FormSection::AdverseExperiences,
    ];

    pub fn title(self) -> &'static str {
        match self {
            FormSection::ChildInformation => "Child Information",
            FormSection::FamilyEnvironment => "Family & Environment",
            FormSection::HealthLifestyle => "Health & Lifestyle",
            FormSection::MedicalHistory => "Medical & Health History",
            FormSection::AdultHealth => "Adult Health",
            FormSection::AdverseExperiences => "Adverse Childhood Experiences",
        }
    }

    pub fn fields(self) -> impl Iterator<Item = FormField> {
        FormField::ALL.into_iter().filter(move |f| f.section() == self)
    }
}

/// One questionnaire field. Declaration order is the model's feature order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Age,
    Gender,
    Race,
    GeneralHealth,
    BirthOrder,
    BornUsa,
    FamilyStructure,
    FinancialHardship,
    FoodSituation,
    FamilyMeal,
    ChildCareDifficulty,
    FamilyTalk,
    NeighborhoodSafety,
    RecCenter,
    Library,
    ScreenTime,
    Cigarettes,
    Vape,
    BreathingDifficulty,
    StomachProblems,
    Headaches,
    Concussion,
    Overweight,
    WeightConcern,
    HeartCondition,
    Diabetes,
    ParentEducation,
    ParentMentalHealth,
    ParentPhysicalHealth,
    Homeless,
    RacialUnfair,
    WitnessViolence,
    VictimViolence,
}

impl FormField {
    pub const ALL: [FormField; FIELD_COUNT] = [
        FormField::Age,
        FormField::Gender,
        FormField::Race,
        FormField::GeneralHealth,
        FormField::BirthOrder,
        FormField::BornUsa,
        FormField::FamilyStructure,
        FormField::FinancialHardship,
        FormField::FoodSituation,
        FormField::FamilyMeal,
        FormField::ChildCareDifficulty,
        FormField::FamilyTalk,
        FormField::NeighborhoodSafety,
        FormField::RecCenter,
        FormField::Library,
        FormField::ScreenTime,
        FormField::Cigarettes,
        FormField::Vape,
        FormField::BreathingDifficulty,
        FormField::StomachProblems,
        FormField::Headaches,
        FormField::Concussion,
        FormField::Overweight,
        FormField::WeightConcern,
        FormField::HeartCondition,
        FormField::Diabetes,
        FormField::ParentEducation,
        FormField::ParentMentalHealth,
        FormField::ParentPhysicalHealth,
        FormField::Homeless,
        FormField::RacialUnfair,
        FormField::WitnessViolence,
        FormField::VictimViolence,
    ];

    /// Form/JSON key.
    pub fn name(self) -> &'static str {
        match self {
            FormField::Age => "age",
            FormField::Gender => "gender",
            FormField::Race => "race",
            FormField::GeneralHealth => "general_health",
            FormField::BirthOrder => "birth_order",
            FormField::BornUsa => "born_usa",
            FormField::FamilyStructure => "family_structure",
            FormField::FinancialHardship => "financial_hardship",
            FormField::FoodSituation => "food_situation",
            FormField::FamilyMeal => "family_meal",
            FormField::ChildCareDifficulty => "child_care_difficulty",
            FormField::FamilyTalk => "family_talk",
            FormField::NeighborhoodSafety => "neighborhood_safety",
            FormField::RecCenter => "rec_center",
            FormField::Library => "library",
            FormField::ScreenTime => "screen_time",
            FormField::Cigarettes => "cigarettes",
            FormField::Vape => "vape",
            FormField::BreathingDifficulty => "breathing_difficulty",
            FormField::StomachProblems => "stomach_problems",
            FormField::Headaches => "headaches",
            FormField::Concussion => "concussion",
            FormField::Overweight => "overweight",
            FormField::WeightConcern => "weight_concern",
            FormField::HeartCondition => "heart_condition",
            FormField::Diabetes => "diabetes",
            FormField::ParentEducation => "parent_education",
            FormField::ParentMentalHealth => "parent_mental_health",
            FormField::ParentPhysicalHealth => "parent_physical_health",
            FormField::Homeless => "homeless",
            FormField::RacialUnfair => "racial_unfair",
            FormField::WitnessViolence => "witness_violence",
            FormField::VictimViolence => "victim_violence",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Age => "Child's Age (Years)",
            FormField::Gender => "Child's Gender",
            FormField::Race => "Child's Race",
            FormField::GeneralHealth => "Child's General Health",
            FormField::BirthOrder => "Birth Order",
            FormField::BornUsa => "Born in USA",
            FormField::FamilyStructure => "Family Structure",
            FormField::FinancialHardship => "Financial Hardship",
            FormField::FoodSituation => "Food Situation",
            FormField::FamilyMeal => "Family Meals Together (per week)",
            FormField::ChildCareDifficulty => "Difficulty Caring for Child",
            FormField::FamilyTalk => "Family Talks When Facing Problems",
            FormField::NeighborhoodSafety => "Child is Safe in Neighborhood",
            FormField::RecCenter => "Recreation Center in Neighborhood",
            FormField::Library => "Library in Neighborhood",
            FormField::ScreenTime => "Screen Time (Weekdays)",
            FormField::Cigarettes => "Anyone in Household Use Cigarettes",
            FormField::Vape => "Anyone Vape Inside Home",
            FormField::BreathingDifficulty => "Breathing Difficulty (Past 12 Months)",
            FormField::StomachProblems => "Stomach Problems (Past 12 Months)",
            FormField::Headaches => "Frequent/Severe Headaches",
            FormField::Concussion => "Had Concussion/Brain Injury",
            FormField::Overweight => "Doctor Identified as Overweight",
            FormField::WeightConcern => "Concerned About Weight",
            FormField::HeartCondition => "Heart Condition",
            FormField::Diabetes => "Type 2 Diabetes",
            FormField::ParentEducation => "Parent's Education Level",
            FormField::ParentMentalHealth => "Parent's Mental Health",
            FormField::ParentPhysicalHealth => "Parent's Physical Health",
            FormField::Homeless => "Ever Homeless or Lived in Shelter",
            FormField::RacialUnfair => "Treated Unfairly Because of Race",
            FormField::WitnessViolence => "Witnessed Adult Violence in Home",
            FormField::VictimViolence => "Victim/Witness of Neighborhood Violence",
        }
    }

    pub fn section(self) -> FormSection {
        use FormField::*;
        match self {
            Age | Gender | Race | GeneralHealth | BirthOrder | BornUsa => {
                FormSection::ChildInformation
            }
            FamilyStructure | FinancialHardship | FoodSituation | FamilyMeal
            | ChildCareDifficulty | FamilyTalk => FormSection::FamilyEnvironment,
            NeighborhoodSafety | RecCenter | Library | ScreenTime | Cigarettes | Vape => {
                FormSection::HealthLifestyle
            }
            BreathingDifficulty | StomachProblems | Headaches | Concussion | Overweight
            | WeightConcern | HeartCondition | Diabetes => FormSection::MedicalHistory,
            ParentEducation | ParentMentalHealth | ParentPhysicalHealth => {
                FormSection::AdultHealth
            }
            Homeless | RacialUnfair | WitnessViolence | VictimViolence => {
                FormSection::AdverseExperiences
            }
        }
    }

    /// The allowed answers, in display order. The first entry is the default.
    pub fn options(self) -> &'static [FormOption] {
        use FormField::*;
        match self {
            Age => AGE,
            Gender => GENDER,
            Race => RACE,
            GeneralHealth | ParentMentalHealth | ParentPhysicalHealth => HEALTH_SCALE,
            BirthOrder => BIRTH_ORDER,
            FamilyStructure => FAMILY_STRUCTURE,
            FinancialHardship => FINANCIAL_HARDSHIP,
            FoodSituation => FOOD_SITUATION,
            FamilyMeal => FAMILY_MEAL,
            ChildCareDifficulty => CHILD_CARE_DIFFICULTY,
            FamilyTalk => FAMILY_TALK,
            NeighborhoodSafety => NEIGHBORHOOD_SAFETY,
            ScreenTime => SCREEN_TIME,
            WeightConcern => WEIGHT_CONCERN,
            ParentEducation => EDUCATION,
            Homeless => HOMELESS,
            BornUsa | RecCenter | Library | Cigarettes | Vape | BreathingDifficulty
            | StomachProblems | Headaches | Concussion | Overweight | HeartCondition
            | Diabetes | RacialUnfair | WitnessViolence | VictimViolence => YES_NO,
        }
    }

    pub fn default_code(self) -> u8 {
        self.options()[0].1
    }

    pub fn accepts(self, code: u8) -> bool {
        self.options().iter().any(|(_, v)| *v == code)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("no value selected for `{0}`")]
    Missing(FormField),

    #[error("`{value}` is not a valid answer for `{field}`")]
    Invalid { field: FormField, value: String },
}

/// A complete, validated set of answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormAnswers {
    pub age: u8,
    pub gender: u8,
    pub race: u8,
    pub general_health: u8,
    pub birth_order: u8,
    pub born_usa: u8,
    pub family_structure: u8,
    pub financial_hardship: u8,
    pub food_situation: u8,
    pub family_meal: u8,
    pub child_care_difficulty: u8,
    pub family_talk: u8,
    pub neighborhood_safety: u8,
    pub rec_center: u8,
    pub library: u8,
    pub screen_time: u8,
    pub cigarettes: u8,
    pub vape: u8,
    pub breathing_difficulty: u8,
    pub stomach_problems: u8,
    pub headaches: u8,
    pub concussion: u8,
    pub overweight: u8,
    pub weight_concern: u8,
    pub heart_condition: u8,
    pub diabetes: u8,
    pub parent_education: u8,
    pub parent_mental_health: u8,
    pub parent_physical_health: u8,
    pub homeless: u8,
    pub racial_unfair: u8,
    pub witness_violence: u8,
    pub victim_violence: u8,
}

impl FormAnswers {
    /// Collect and validate answers from a name → raw value lookup.
    ///
    /// Blank or absent values are `Missing`; anything that is not one of the
    /// field's option codes is `Invalid`.
    pub fn from_lookup<'a, F>(lookup: F) -> Result<Self, FormError>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut codes = [0u8; FIELD_COUNT];
        for (slot, field) in codes.iter_mut().zip(FormField::ALL) {
            let raw = lookup(field.name())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or(FormError::Missing(field))?;
            let code = raw
                .parse::<u8>()
                .ok()
                .filter(|c| field.accepts(*c))
                .ok_or_else(|| FormError::Invalid { field, value: raw.to_string() })?;
            *slot = code;
        }
        Ok(Self::from_field_codes(|f| codes[f as usize]))
    }

    /// Every field at its first (default) option.
    pub fn defaults() -> Self {
        Self::from_field_codes(FormField::default_code)
    }

    fn from_field_codes(code: impl Fn(FormField) -> u8) -> Self {
        use FormField::*;
        Self {
            age: code(Age),
            gender: code(Gender),
            race: code(Race),
            general_health: code(GeneralHealth),
            birth_order: code(BirthOrder),
            born_usa: code(BornUsa),
            family_structure: code(FamilyStructure),
            financial_hardship: code(FinancialHardship),
            food_situation: code(FoodSituation),
            family_meal: code(FamilyMeal),
            child_care_difficulty: code(ChildCareDifficulty),
            family_talk: code(FamilyTalk),
            neighborhood_safety: code(NeighborhoodSafety),
            rec_center: code(RecCenter),
            library: code(Library),
            screen_time: code(ScreenTime),
            cigarettes: code(Cigarettes),
            vape: code(Vape),
            breathing_difficulty: code(BreathingDifficulty),
            stomach_problems: code(StomachProblems),
            headaches: code(Headaches),
            concussion: code(Concussion),
            overweight: code(Overweight),
            weight_concern: code(WeightConcern),
            heart_condition: code(HeartCondition),
            diabetes: code(Diabetes),
            parent_education: code(ParentEducation),
            parent_mental_health: code(ParentMentalHealth),
            parent_physical_health: code(ParentPhysicalHealth),
            homeless: code(Homeless),
            racial_unfair: code(RacialUnfair),
            witness_violence: code(WitnessViolence),
            victim_violence: code(VictimViolence),
        }
    }

    pub fn get(&self, field: FormField) -> u8 {
        use FormField::*;
        match field {
            Age => self.age,
            Gender => self.gender,
            Race => self.race,
            GeneralHealth => self.general_health,
            BirthOrder => self.birth_order,
            BornUsa => self.born_usa,
            FamilyStructure => self.family_structure,
            FinancialHardship => self.financial_hardship,
            FoodSituation => self.food_situation,
            FamilyMeal => self.family_meal,
            ChildCareDifficulty => self.child_care_difficulty,
            FamilyTalk => self.family_talk,
            NeighborhoodSafety => self.neighborhood_safety,
            RecCenter => self.rec_center,
            Library => self.library,
            ScreenTime => self.screen_time,
            Cigarettes => self.cigarettes,
            Vape => self.vape,
            BreathingDifficulty => self.breathing_difficulty,
            StomachProblems => self.stomach_problems,
            Headaches => self.headaches,
            Concussion => self.concussion,
            Overweight => self.overweight,
            WeightConcern => self.weight_concern,
            HeartCondition => self.heart_condition,
            Diabetes => self.diabetes,
            ParentEducation => self.parent_education,
            ParentMentalHealth => self.parent_mental_health,
            ParentPhysicalHealth => self.parent_physical_health,
            Homeless => self.homeless,
            RacialUnfair => self.racial_unfair,
            WitnessViolence => self.witness_violence,
            VictimViolence => self.victim_violence,
        }
    }
}

impl Default for FormAnswers {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn full_submission() -> HashMap<String, String> {
        FormField::ALL
            .iter()
            .map(|f| (f.name().to_string(), f.default_code().to_string()))
            .collect()
    }

    #[test]
    fn test_every_field_has_options() {
        for field in FormField::ALL {
            assert!(!field.options().is_empty(), "{} has no options", field);
        }
    }

    #[test]
    fn test_sections_cover_all_fields() {
        let total: usize = FormSection::ALL.iter().map(|s| s.fields().count()).sum();
        assert_eq!(total, FIELD_COUNT);
    }

    #[test]
    fn test_from_lookup_complete() {
        let mut form = full_submission();
        form.insert("age".into(), "9".into());
        form.insert("homeless".into(), "3".into());
        let answers = FormAnswers::from_lookup(|k| form.get(k).map(String::as_str)).unwrap();
        assert_eq!(answers.age, 9);
        assert_eq!(answers.homeless, 3);
        assert_eq!(answers.gender, 1);
    }

    #[test]
    fn test_from_lookup_missing_field() {
        let mut form = full_submission();
        form.remove("vape");
        let err = FormAnswers::from_lookup(|k| form.get(k).map(String::as_str)).unwrap_err();
        assert_eq!(err, FormError::Missing(FormField::Vape));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut form = full_submission();
        form.insert("diabetes".into(), "  ".into());
        let err = FormAnswers::from_lookup(|k| form.get(k).map(String::as_str)).unwrap_err();
        assert_eq!(err, FormError::Missing(FormField::Diabetes));
    }

    #[test]
    fn test_race_six_is_rejected() {
        let mut form = full_submission();
        form.insert("race".into(), "6".into());
        let err = FormAnswers::from_lookup(|k| form.get(k).map(String::as_str)).unwrap_err();
        assert!(matches!(err, FormError::Invalid { field: FormField::Race, .. }));
    }

    #[test]
    fn test_age_out_of_range_is_rejected() {
        let mut form = full_submission();
        form.insert("age".into(), "18".into());
        assert!(FormAnswers::from_lookup(|k| form.get(k).map(String::as_str)).is_err());
    }

    #[test]
    fn test_get_matches_named_fields() {
        let answers = FormAnswers::defaults();
        for field in FormField::ALL {
            assert_eq!(answers.get(field), field.default_code());
        }
    }
}
