use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::super::evidence::EvidenceBundle;
use super::super::role::{BonusConfig, PenaltyConfig};
use super::config::ScoringConfig;

/// Penalty rules a role can configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PenaltyRule {
    JobStability,
    EmploymentGap,
}

impl PenaltyRule {
    /// Recognize a reported trigger, ignoring case, spacing, and punctuation.
    pub fn from_trigger(trigger: &str) -> Option<Self> {
        let key: String = trigger
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "jobstability" | "jobhopping" => Some(PenaltyRule::JobStability),
            "employmentgap" | "careergap" => Some(PenaltyRule::EmploymentGap),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusHit {
    pub item: String,
    pub points: f64,
    /// Points actually counted after the cap; zero once the cap is reached.
    pub applied: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyHit {
    pub rule: PenaltyRule,
    pub setting: String,
    pub points: f64,
    pub applied: f64,
}

/// Bounded point deltas plus the trail that produced them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierOutcome {
    pub bonus_points: f64,
    /// Zero or negative.
    pub penalty_points: f64,
    pub bonus_hits: Vec<BonusHit>,
    pub penalty_hits: Vec<PenaltyHit>,
    pub unrecognized_triggers: Vec<String>,
}

/// Apply bonus and penalty configuration to the reported triggers.
///
/// Items are visited in configuration order so the result does not depend on
/// the order upstream reported triggers in. Each item or rule counts once.
pub fn aggregate(
    bonus: Option<&BonusConfig>,
    penalty: Option<&PenaltyConfig>,
    evidence: &EvidenceBundle,
    config: &ScoringConfig,
) -> ModifierOutcome {
    let mut outcome = ModifierOutcome::default();

    if let Some(bonus) = bonus.filter(|bonus| bonus.enabled) {
        let cap = bonus.max_points.unwrap_or(config.default_bonus_cap);
        let mut total = 0.0;

        for item in &bonus.items {
            let matched = evidence
                .bonus_triggers_matched
                .iter()
                .any(|trigger| item.matches(trigger));
            if !matched {
                continue;
            }

            let applied = item.points.min((cap - total).max(0.0));
            total += applied;
            outcome.bonus_hits.push(BonusHit {
                item: item.name.clone(),
                points: item.points,
                applied,
            });
        }

        for trigger in &evidence.bonus_triggers_matched {
            if !bonus.items.iter().any(|item| item.matches(trigger)) {
                warn!(%trigger, "bonus trigger does not match any configured item");
                outcome.unrecognized_triggers.push(trigger.clone());
            }
        }

        outcome.bonus_points = total;
    }

    if let Some(penalty) = penalty.filter(|penalty| penalty.enabled) {
        let cap = penalty
            .max_points
            .map(f64::abs)
            .unwrap_or(config.default_penalty_cap);
        let schedule = &config.penalty_schedule;
        let mut reported = Vec::new();

        for trigger in &evidence.penalty_triggers_matched {
            match PenaltyRule::from_trigger(trigger) {
                Some(rule) => reported.push(rule),
                None => {
                    warn!(%trigger, "penalty trigger is not a known rule");
                    outcome.unrecognized_triggers.push(trigger.clone());
                }
            }
        }

        let configured = [
            penalty.job_stability.map(|rule| {
                (
                    PenaltyRule::JobStability,
                    rule.concern.label(),
                    schedule.job_stability(rule.concern),
                )
            }),
            penalty.employment_gap.map(|rule| {
                (
                    PenaltyRule::EmploymentGap,
                    rule.threshold.label(),
                    schedule.employment_gap(rule.threshold),
                )
            }),
        ];

        let mut total = 0.0;
        for (rule, setting, points) in configured.into_iter().flatten() {
            if !reported.contains(&rule) {
                continue;
            }

            let applied = points.min((cap - total).max(0.0));
            total += applied;
            outcome.penalty_hits.push(PenaltyHit {
                rule,
                setting: setting.to_string(),
                points,
                applied,
            });
        }

        for rule in &reported {
            if !outcome.penalty_hits.iter().any(|hit| hit.rule == *rule) {
                debug!(?rule, "penalty trigger reported for a rule the role does not configure");
            }
        }

        outcome.penalty_points = if total > 0.0 { -total } else { 0.0 };
    }

    outcome
}
