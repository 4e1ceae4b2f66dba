use serde::{Deserialize, Serialize};
use tracing::warn;

use super::super::evidence::{Answer, EvidenceBundle, EvidenceLevel, RequirementQuality};
use super::super::role::{Question, RoleConfig, Skill};
use super::config::ScoringConfig;
use super::weights::Component;

pub const MAX_SUB_SCORE: u8 = 100;

/// Points awarded for a skill level or answer quality.
pub const fn level_points(level: EvidenceLevel) -> u8 {
    match level {
        EvidenceLevel::High => 100,
        EvidenceLevel::Medium => 65,
        EvidenceLevel::Low => 30,
        EvidenceLevel::None => 0,
    }
}

pub const fn quality_points(quality: RequirementQuality) -> u8 {
    match quality {
        RequirementQuality::Exceeds => 100,
        RequirementQuality::Meets => 80,
        RequirementQuality::Below => 50,
    }
}

/// Per-component sub-scores; `None` marks an inactive component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubScores {
    pub education: Option<u8>,
    pub experience: Option<u8>,
    pub skills: Option<u8>,
    pub questions: Option<u8>,
}

impl SubScores {
    pub fn get(&self, component: Component) -> Option<u8> {
        match component {
            Component::Education => self.education,
            Component::Experience => self.experience,
            Component::Skills => self.skills,
            Component::Questions => self.questions,
            Component::Modifiers => None,
        }
    }
}

/// Audit line for a single configured skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillScore {
    pub name: String,
    pub mandatory: bool,
    pub found: bool,
    pub level: EvidenceLevel,
    pub weight: u8,
    pub effective_weight: f64,
    pub points: u8,
}

/// Audit line for a single screening question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionScore {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<Answer>,
    pub quality: EvidenceLevel,
    pub weight: u8,
    pub points: u8,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentScores {
    pub sub_scores: SubScores,
    pub skills: Vec<SkillScore>,
    pub questions: Vec<QuestionScore>,
    pub notes: Vec<String>,
}

pub(crate) fn score_components(
    role: &RoleConfig,
    evidence: &EvidenceBundle,
    config: &ScoringConfig,
) -> ComponentScores {
    let mut notes = Vec::new();

    let education = role.education_requirement.as_ref().map(|_| {
        if evidence.education_met.is_none() {
            warn!("no education evidence supplied; treating requirement as not met");
            notes.push("no education evidence supplied; scored as not met".to_string());
        }
        score_requirement(evidence.education_met, evidence.education_quality)
    });

    let experience = role.experience_requirement.as_ref().map(|_| {
        if evidence.experience_met.is_none() {
            warn!("no experience evidence supplied; treating requirement as not met");
            notes.push("no experience evidence supplied; scored as not met".to_string());
        }
        score_requirement(evidence.experience_met, evidence.experience_quality)
    });

    let (skills_score, skills) = if role.skills.is_empty() {
        (None, Vec::new())
    } else {
        let (score, lines) = score_skills(
            &role.skills,
            evidence,
            config.mandatory_skill_multiplier,
            &mut notes,
        );
        (Some(score), lines)
    };

    let (questions_score, questions) = if role.questions.is_empty() {
        (None, Vec::new())
    } else {
        let (score, lines) = score_questions(&role.questions, evidence, &mut notes);
        (Some(score), lines)
    };

    ComponentScores {
        sub_scores: SubScores {
            education,
            experience,
            skills: skills_score,
            questions: questions_score,
        },
        skills,
        questions,
        notes,
    }
}

/// Met requirements score 100 unless graded; unmet ones score 0.
pub fn score_requirement(met: Option<bool>, quality: Option<RequirementQuality>) -> u8 {
    match (met, quality) {
        (Some(true), Some(quality)) => quality_points(quality),
        (Some(true), None) => MAX_SUB_SCORE,
        _ => 0,
    }
}

/// Weighted average of skill points, with mandatory weights multiplied first.
pub fn score_skills(
    skills: &[Skill],
    evidence: &EvidenceBundle,
    mandatory_multiplier: f64,
    notes: &mut Vec<String>,
) -> (u8, Vec<SkillScore>) {
    let mut lines = Vec::with_capacity(skills.len());

    for skill in skills {
        let entry = match evidence.skill(&skill.name) {
            Some(entry) => *entry,
            None => {
                warn!(skill = %skill.name, "no evidence for configured skill; scoring as NONE");
                notes.push(format!("no evidence for skill '{}'; scored as NONE", skill.name));
                Default::default()
            }
        };

        let level = entry.effective_level();
        let effective_weight = if skill.mandatory {
            f64::from(skill.weight) * mandatory_multiplier
        } else {
            f64::from(skill.weight)
        };

        lines.push(SkillScore {
            name: skill.name.clone(),
            mandatory: skill.mandatory,
            found: entry.found,
            level,
            weight: skill.weight,
            effective_weight,
            points: level_points(level),
        });
    }

    let score = weighted_average(
        lines
            .iter()
            .map(|line| (f64::from(line.points), line.effective_weight)),
    );
    (score, lines)
}

/// Plain weighted average of answer-quality points.
pub fn score_questions(
    questions: &[Question],
    evidence: &EvidenceBundle,
    notes: &mut Vec<String>,
) -> (u8, Vec<QuestionScore>) {
    let mut lines = Vec::with_capacity(questions.len());

    for question in questions {
        let entry = evidence.question(&question.text);
        if entry.is_none() {
            warn!(question = %question.text, "no evidence for screening question; scoring as NONE");
            notes.push(format!(
                "no evidence for question '{}'; scored as NONE",
                question.text
            ));
        }

        let quality = entry.map(|entry| entry.quality).unwrap_or_default();
        lines.push(QuestionScore {
            text: question.text.clone(),
            answer: entry.map(|entry| entry.answer),
            quality,
            weight: question.weight,
            points: level_points(quality),
        });
    }

    let score = weighted_average(
        lines
            .iter()
            .map(|line| (f64::from(line.points), f64::from(line.weight))),
    );
    (score, lines)
}

fn weighted_average(items: impl Iterator<Item = (f64, f64)>) -> u8 {
    let (weighted, total_weight) = items.fold((0.0, 0.0), |(sum, weights), (points, weight)| {
        (sum + points * weight, weights + weight)
    });

    if total_weight <= 0.0 {
        return 0;
    }

    (weighted / total_weight)
        .round()
        .clamp(0.0, f64::from(MAX_SUB_SCORE)) as u8
}
