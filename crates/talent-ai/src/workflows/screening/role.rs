use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::evidence::match_key;

pub const MIN_ITEM_WEIGHT: u8 = 1;
pub const MAX_ITEM_WEIGHT: u8 = 10;

/// Identifier wrapper for job roles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleId(pub String);

/// User-authored requirements and weights for a job role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_requirement: Option<EducationRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_requirement: Option<ExperienceRequirement>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_config: Option<BonusConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_config: Option<PenaltyConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationRequirement {
    pub required: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRequirement {
    pub required: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_years: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub weight: u8,
    #[serde(default)]
    pub mandatory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub weight: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusConfig {
    pub enabled: bool,
    #[serde(default)]
    pub items: Vec<BonusItem>,
    /// Upper bound on awarded bonus points. Falls back to the engine default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusItem {
    pub name: String,
    pub points: f64,
    #[serde(default)]
    pub trigger_keywords: Vec<String>,
}

impl BonusItem {
    /// Whether a reported trigger refers to this item by name or keyword.
    pub fn matches(&self, trigger: &str) -> bool {
        let trigger = match_key(trigger);
        match_key(&self.name) == trigger
            || self
                .trigger_keywords
                .iter()
                .any(|keyword| match_key(keyword) == trigger)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyConfig {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_stability: Option<JobStabilityRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_gap: Option<EmploymentGapRule>,
    /// Largest total deduction, read as a magnitude so `10` and `-10` are equivalent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_points: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStabilityRule {
    pub concern: StabilityConcern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentGapRule {
    pub threshold: GapThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilityConcern {
    Strict,
    Moderate,
    Lenient,
}

impl StabilityConcern {
    pub const fn label(self) -> &'static str {
        match self {
            StabilityConcern::Strict => "strict",
            StabilityConcern::Moderate => "moderate",
            StabilityConcern::Lenient => "lenient",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GapThreshold {
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "1year")]
    OneYear,
    #[serde(rename = "2years")]
    TwoYears,
}

impl GapThreshold {
    pub const fn label(self) -> &'static str {
        match self {
            GapThreshold::SixMonths => "6months",
            GapThreshold::OneYear => "1year",
            GapThreshold::TwoYears => "2years",
        }
    }
}

impl RoleConfig {
    pub fn mandatory_skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter().filter(|skill| skill.mandatory)
    }

    pub(crate) fn bonus_rules(&self) -> Option<&BonusConfig> {
        self.bonus_config
            .as_ref()
            .filter(|config| config.enabled && !config.items.is_empty())
    }

    pub(crate) fn penalty_rules(&self) -> Option<&PenaltyConfig> {
        self.penalty_config.as_ref().filter(|config| {
            config.enabled && (config.job_stability.is_some() || config.employment_gap.is_some())
        })
    }

    /// Reject malformed configuration before any scoring happens.
    pub fn validate(&self) -> Result<(), RoleConfigError> {
        if let Some(education) = &self.education_requirement {
            if education.description.trim().is_empty() {
                return Err(RoleConfigError::EmptyField {
                    field: "educationRequirement.description",
                });
            }
        }

        if let Some(experience) = &self.experience_requirement {
            if experience.description.trim().is_empty() {
                return Err(RoleConfigError::EmptyField {
                    field: "experienceRequirement.description",
                });
            }
            if let Some(years) = experience.minimum_years {
                if !years.is_finite() || years < 0.0 {
                    return Err(RoleConfigError::InvalidMinimumYears(years));
                }
            }
        }

        let mut seen = BTreeSet::new();
        for skill in &self.skills {
            let name = skill.name.trim();
            if name.is_empty() {
                return Err(RoleConfigError::EmptyField {
                    field: "skills[].name",
                });
            }
            check_weight(name, skill.weight)?;
            if !seen.insert(match_key(name)) {
                return Err(RoleConfigError::DuplicateSkill(name.to_string()));
            }
        }

        let mut seen = BTreeSet::new();
        for question in &self.questions {
            let text = question.text.trim();
            if text.is_empty() {
                return Err(RoleConfigError::EmptyField {
                    field: "questions[].text",
                });
            }
            check_weight(text, question.weight)?;
            if !seen.insert(match_key(text)) {
                return Err(RoleConfigError::DuplicateQuestion(text.to_string()));
            }
        }

        if let Some(bonus) = &self.bonus_config {
            for item in &bonus.items {
                if item.name.trim().is_empty() {
                    return Err(RoleConfigError::EmptyField {
                        field: "bonusConfig.items[].name",
                    });
                }
                if !item.points.is_finite() || item.points < 0.0 {
                    return Err(RoleConfigError::InvalidBonusPoints {
                        item: item.name.clone(),
                        points: item.points,
                    });
                }
            }
            if let Some(cap) = bonus.max_points {
                if !cap.is_finite() || cap < 0.0 {
                    return Err(RoleConfigError::InvalidCap {
                        field: "bonusConfig.maxPoints",
                        value: cap,
                    });
                }
            }
        }

        if let Some(cap) = self.penalty_config.as_ref().and_then(|p| p.max_points) {
            if !cap.is_finite() {
                return Err(RoleConfigError::InvalidCap {
                    field: "penaltyConfig.maxPoints",
                    value: cap,
                });
            }
        }

        Ok(())
    }
}

fn check_weight(item: &str, weight: u8) -> Result<(), RoleConfigError> {
    if (MIN_ITEM_WEIGHT..=MAX_ITEM_WEIGHT).contains(&weight) {
        Ok(())
    } else {
        Err(RoleConfigError::WeightOutOfRange {
            item: item.to_string(),
            weight,
        })
    }
}

/// Validation failures for a role configuration. These indicate a configuration
/// bug and are never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoleConfigError {
    #[error("weight {weight} for '{item}' is outside the allowed range 1-10")]
    WeightOutOfRange { item: String, weight: u8 },
    #[error("required field {field} is empty")]
    EmptyField { field: &'static str },
    #[error("skill '{0}' is configured more than once")]
    DuplicateSkill(String),
    #[error("question '{0}' is configured more than once")]
    DuplicateQuestion(String),
    #[error("bonus item '{item}' has invalid points {points}")]
    InvalidBonusPoints { item: String, points: f64 },
    #[error("{field} must be a finite, non-negative number (found {value})")]
    InvalidCap { field: &'static str, value: f64 },
    #[error("minimum years of experience must be finite and non-negative (found {0})")]
    InvalidMinimumYears(f64),
}
