//! Structured evidence about a candidate, produced upstream (usually by a
//! language-model extraction call) and consumed once per evaluation.
//!
//! The JSON field names and enum spellings here are the contract upstream
//! producers must follow. Absent fields default to the weakest evidence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Strength of a skill match or the quality of a question answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl EvidenceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            EvidenceLevel::High => "HIGH",
            EvidenceLevel::Medium => "MEDIUM",
            EvidenceLevel::Low => "LOW",
            EvidenceLevel::None => "NONE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Answer {
    Yes,
    #[default]
    No,
    Partial,
}

/// Optional grading of how well an education or experience requirement is met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementQuality {
    Below,
    Meets,
    Exceeds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillEvidence {
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub level: EvidenceLevel,
}

impl SkillEvidence {
    pub fn found(level: EvidenceLevel) -> Self {
        Self { found: true, level }
    }

    pub fn missing() -> Self {
        Self::default()
    }

    /// A skill reported as not found counts as no evidence whatever its level.
    pub fn effective_level(&self) -> EvidenceLevel {
        if self.found {
            self.level
        } else {
            EvidenceLevel::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionEvidence {
    #[serde(default)]
    pub answer: Answer,
    #[serde(default)]
    pub quality: EvidenceLevel,
}

/// Pre-judged evidence for one candidate against one role.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_met: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_met: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_quality: Option<RequirementQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_quality: Option<RequirementQuality>,
    #[serde(default)]
    pub skill_evidence: BTreeMap<String, SkillEvidence>,
    #[serde(default)]
    pub question_evidence: BTreeMap<String, QuestionEvidence>,
    #[serde(default)]
    pub bonus_triggers_matched: Vec<String>,
    #[serde(default)]
    pub penalty_triggers_matched: Vec<String>,
}

impl EvidenceBundle {
    /// Parse extraction output at the boundary. Missing collections default to
    /// empty; unknown enum spellings are rejected.
    pub fn from_json(raw: &str) -> Result<Self, EvidenceError> {
        serde_json::from_str(raw).map_err(EvidenceError::from)
    }

    /// Exact lookup first, then a case-insensitive match on the trimmed name.
    pub fn skill(&self, name: &str) -> Option<&SkillEvidence> {
        lookup(&self.skill_evidence, name)
    }

    pub fn question(&self, text: &str) -> Option<&QuestionEvidence> {
        lookup(&self.question_evidence, text)
    }
}

/// Comparison key for skill names, question texts and triggers: trimmed and
/// Unicode-lowercased. Role validation and evidence lookup share it.
pub(crate) fn match_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn lookup<'a, V>(entries: &'a BTreeMap<String, V>, key: &str) -> Option<&'a V> {
    entries.get(key).or_else(|| {
        let key = match_key(key);
        entries
            .iter()
            .find(|(candidate, _)| match_key(candidate) == key)
            .map(|(_, value)| value)
    })
}

/// Structural problems with evidence JSON.
#[derive(Debug, thiserror::Error)]
pub enum EvidenceError {
    #[error("evidence payload is not valid: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_contract_spelling() {
        let bundle = EvidenceBundle::from_json(
            r#"{
                "educationMet": true,
                "experienceQuality": "EXCEEDS",
                "skillEvidence": { "Rust": { "found": true, "level": "HIGH" } },
                "questionEvidence": {
                    "Led a team?": { "answer": "PARTIAL", "quality": "MEDIUM" }
                },
                "bonusTriggersMatched": ["Open source"]
            }"#,
        )
        .expect("bundle parses");

        assert_eq!(bundle.education_met, Some(true));
        assert_eq!(bundle.experience_met, None);
        assert_eq!(
            bundle.experience_quality,
            Some(RequirementQuality::Exceeds)
        );
        assert_eq!(
            bundle.skill("rust").map(SkillEvidence::effective_level),
            Some(EvidenceLevel::High)
        );
        assert_eq!(
            bundle.question("Led a team?").map(|q| q.answer),
            Some(Answer::Partial)
        );
        assert!(bundle.penalty_triggers_matched.is_empty());
    }

    #[test]
    fn rejects_unknown_levels() {
        let err = EvidenceBundle::from_json(
            r#"{ "skillEvidence": { "Rust": { "found": true, "level": "EXPERT" } } }"#,
        )
        .expect_err("unknown level is rejected");
        assert!(err.to_string().contains("not valid"));
    }

    #[test]
    fn lookup_folds_non_ascii_case() {
        let bundle = EvidenceBundle::from_json(
            r#"{ "skillEvidence": { "élan": { "found": true, "level": "MEDIUM" } } }"#,
        )
        .expect("bundle parses");
        assert_eq!(
            bundle.skill(" Élan ").map(SkillEvidence::effective_level),
            Some(EvidenceLevel::Medium)
        );
    }

    #[test]
    fn not_found_skill_counts_as_none() {
        let evidence = SkillEvidence {
            found: false,
            level: EvidenceLevel::High,
        };
        assert_eq!(evidence.effective_level(), EvidenceLevel::None);
    }

    #[test]
    fn levels_order_from_weakest() {
        assert!(EvidenceLevel::None < EvidenceLevel::Low);
        assert!(EvidenceLevel::Medium < EvidenceLevel::High);
    }
}
