use serde::{Deserialize, Serialize};

use super::config::{MatchBands, ScoringConfig};
use super::gate::GateResult;
use super::modifiers::ModifierOutcome;
use super::rules::{ComponentScores, SubScores};
use super::weights::{AppliedWeights, Component};
use super::{ScoreBreakdown, ScoreResult};

pub const DEGENERATE_NOTE: &str = "no active scoring components; score defaults to 0";

/// Qualification decision for a screened candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreeningStatus {
    Qualified,
    NotQualified,
    Rejected,
}

impl ScreeningStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ScreeningStatus::Qualified => "QUALIFIED",
            ScreeningStatus::NotQualified => "NOT_QUALIFIED",
            ScreeningStatus::Rejected => "REJECTED",
        }
    }
}

/// Display label derived from the final score. Never feeds back into scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchLevel {
    Perfect,
    Strong,
    Good,
    Fair,
    Poor,
}

impl MatchLevel {
    pub fn from_score(score: u8, bands: &MatchBands) -> Self {
        if score >= bands.perfect {
            MatchLevel::Perfect
        } else if score >= bands.strong {
            MatchLevel::Strong
        } else if score >= bands.good {
            MatchLevel::Good
        } else if score >= bands.fair {
            MatchLevel::Fair
        } else {
            MatchLevel::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MatchLevel::Perfect => "PERFECT",
            MatchLevel::Strong => "STRONG",
            MatchLevel::Good => "GOOD",
            MatchLevel::Fair => "FAIR",
            MatchLevel::Poor => "POOR",
        }
    }
}

/// Combine the gate outcome, weights, sub-scores, and modifiers into a result.
///
/// A failed gate wins outright: no weighting or modifiers are applied.
pub fn compose(
    gate: &GateResult,
    weights: &AppliedWeights,
    components: ComponentScores,
    modifiers: ModifierOutcome,
    config: &ScoringConfig,
) -> ScoreResult {
    if !gate.passed() {
        return ScoreResult {
            status: ScreeningStatus::Rejected,
            overall_score: 0,
            match_level: MatchLevel::Poor,
            breakdown: ScoreBreakdown::default(),
            rejection_reasons: gate.summaries(),
        };
    }

    let ComponentScores {
        sub_scores,
        skills,
        questions,
        mut notes,
    } = components;

    let effective_weights = effective_weights(weights, &sub_scores);
    let base_score = base_score(&effective_weights, &sub_scores);
    let overall_score = match base_score {
        Some(base) => (base + modifiers.bonus_points + modifiers.penalty_points)
            .clamp(0.0, 100.0)
            .round() as u8,
        None => {
            notes.push(DEGENERATE_NOTE.to_string());
            0
        }
    };

    let status = if base_score.is_some() && overall_score >= config.qualified_threshold {
        ScreeningStatus::Qualified
    } else {
        ScreeningStatus::NotQualified
    };

    ScoreResult {
        status,
        overall_score,
        match_level: MatchLevel::from_score(overall_score, &config.match_bands),
        breakdown: ScoreBreakdown {
            education_score: sub_scores.education,
            experience_score: sub_scores.experience,
            skills_score: sub_scores.skills,
            questions_score: sub_scores.questions,
            base_score,
            bonus_points: modifiers.bonus_points,
            penalty_points: modifiers.penalty_points,
            applied_weights: weights.clone(),
            effective_weights,
            skills,
            questions,
            bonus_hits: modifiers.bonus_hits,
            penalty_hits: modifiers.penalty_hits,
            unrecognized_triggers: modifiers.unrecognized_triggers,
            notes,
        },
        rejection_reasons: Vec::new(),
    }
}

/// Blend weights over the components that carry a sub-score, rescaled to 100.
///
/// The modifiers share has no sub-score of its own; it is spread over the
/// scored components in proportion to their applied weights, so modifiers act
/// purely through the additive bonus/penalty points. Without an active
/// modifiers share this equals the applied weights.
fn effective_weights(weights: &AppliedWeights, sub_scores: &SubScores) -> AppliedWeights {
    let scored: Vec<(Component, f64)> = weights
        .iter()
        .filter(|(component, _)| sub_scores.get(**component).is_some())
        .map(|(component, weight)| (*component, *weight))
        .collect();

    let total: f64 = scored.iter().map(|(_, weight)| weight).sum();
    if total <= 0.0 {
        return AppliedWeights::new();
    }
    scored
        .into_iter()
        .map(|(component, weight)| (component, weight * 100.0 / total))
        .collect()
}

/// `Σ w·s / 100` over the effective weights; `None` when nothing is scored.
fn base_score(effective: &AppliedWeights, sub_scores: &SubScores) -> Option<f64> {
    if effective.is_empty() {
        return None;
    }
    let weighted: f64 = effective
        .iter()
        .filter_map(|(component, weight)| {
            sub_scores
                .get(*component)
                .map(|score| weight * f64::from(score))
        })
        .sum();
    Some(weighted / 100.0)
}
