use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::evidence::EvidenceBundle;
use super::super::role::RoleConfig;

/// Tier-1 failures. Each one on its own rejects the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    EducationNotMet,
    ExperienceNotMet,
    MandatorySkillMissing { skill: String },
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::EducationNotMet => "education requirement not met".to_string(),
            RejectionReason::ExperienceNotMet => "experience requirement not met".to_string(),
            RejectionReason::MandatorySkillMissing { skill } => {
                format!("mandatory skill missing: {skill}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GateResult {
    pub reasons: Vec<RejectionReason>,
}

impl GateResult {
    pub fn passed(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.reasons.iter().map(RejectionReason::summary).collect()
    }
}

/// Evaluate every hard requirement and collect all failures, in order:
/// education, experience, then mandatory skills in configuration order.
pub fn gate(role: &RoleConfig, evidence: &EvidenceBundle) -> GateResult {
    let mut reasons = Vec::new();

    if role
        .education_requirement
        .as_ref()
        .is_some_and(|requirement| requirement.required)
        && evidence.education_met != Some(true)
    {
        reasons.push(RejectionReason::EducationNotMet);
    }

    if role
        .experience_requirement
        .as_ref()
        .is_some_and(|requirement| requirement.required)
        && evidence.experience_met != Some(true)
    {
        reasons.push(RejectionReason::ExperienceNotMet);
    }

    for skill in role.mandatory_skills() {
        let found = evidence
            .skill(&skill.name)
            .is_some_and(|entry| entry.found);
        if !found {
            reasons.push(RejectionReason::MandatorySkillMissing {
                skill: skill.name.clone(),
            });
        }
    }

    if !reasons.is_empty() {
        debug!(?reasons, "hard requirement gate failed");
    }

    GateResult { reasons }
}
