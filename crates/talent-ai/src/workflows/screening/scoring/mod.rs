mod config;
mod gate;
mod modifiers;
mod policy;
mod rules;
mod weights;

pub use config::{
    MatchBands, PenaltySchedule, ScoringConfig, ScoringConfigError, DEFAULT_BONUS_CAP,
    DEFAULT_MANDATORY_SKILL_MULTIPLIER, DEFAULT_PENALTY_CAP, DEFAULT_QUALIFIED_THRESHOLD,
};
pub use gate::{gate, GateResult, RejectionReason};
pub use modifiers::{aggregate, BonusHit, ModifierOutcome, PenaltyHit, PenaltyRule};
pub use policy::{compose, MatchLevel, ScreeningStatus, DEGENERATE_NOTE};
pub use rules::{
    level_points, quality_points, score_questions, score_requirement, score_skills,
    ComponentScores, QuestionScore, SkillScore, SubScores,
};
pub use weights::{normalize, ActiveComponents, AppliedWeights, BaseWeights, Component};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::evidence::EvidenceBundle;
use super::role::{RoleConfig, RoleConfigError};

/// Stateless evaluator that applies role configuration to candidate evidence.
///
/// Holds no mutable state, so one engine can be shared across threads and
/// batch jobs behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    /// Rejects a malformed configuration instead of scoring with it.
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Validate the role, then score the evidence against it.
    pub fn score(
        &self,
        role: &RoleConfig,
        evidence: &EvidenceBundle,
    ) -> Result<ScoreResult, RoleConfigError> {
        role.validate()?;
        Ok(self.score_validated(role, evidence))
    }

    /// Score against a role that has already passed [`RoleConfig::validate`].
    pub fn score_validated(&self, role: &RoleConfig, evidence: &EvidenceBundle) -> ScoreResult {
        let gate_result = gate(role, evidence);
        if !gate_result.passed() {
            return compose(
                &gate_result,
                &AppliedWeights::new(),
                ComponentScores::default(),
                ModifierOutcome::default(),
                &self.config,
            );
        }

        let active = ActiveComponents::from_role(role);
        let weights = normalize(&self.config.base_weights, &active);
        let components = rules::score_components(role, evidence, &self.config);
        let modifiers = aggregate(
            role.bonus_config.as_ref(),
            role.penalty_config.as_ref(),
            evidence,
            &self.config,
        );

        let result = compose(&gate_result, &weights, components, modifiers, &self.config);
        debug!(
            status = result.status.label(),
            score = result.overall_score,
            "candidate scored"
        );
        result
    }
}

/// Auditable detail behind an overall score.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_score: Option<u8>,
    /// Weighted blend before modifiers, unrounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_score: Option<f64>,
    pub bonus_points: f64,
    pub penalty_points: f64,
    pub applied_weights: AppliedWeights,
    /// Shares the base score is blended with: the scored components of
    /// `applied_weights` rescaled to 100, so `baseScore = Σ w·s / 100`.
    #[serde(default)]
    pub effective_weights: AppliedWeights,
    #[serde(default)]
    pub skills: Vec<SkillScore>,
    #[serde(default)]
    pub questions: Vec<QuestionScore>,
    #[serde(default)]
    pub bonus_hits: Vec<BonusHit>,
    #[serde(default)]
    pub penalty_hits: Vec<PenaltyHit>,
    #[serde(default)]
    pub unrecognized_triggers: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Engine output for one (role, evidence) pair. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub status: ScreeningStatus,
    pub overall_score: u8,
    pub match_level: MatchLevel,
    pub breakdown: ScoreBreakdown,
    pub rejection_reasons: Vec<String>,
}

impl ScoreResult {
    /// True when the role had nothing to score against.
    pub fn is_degenerate(&self) -> bool {
        self.status != ScreeningStatus::Rejected && self.breakdown.base_score.is_none()
    }
}
