use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::role::RoleConfig;
use super::config::ScoringConfigError;

pub const WEIGHT_TOTAL: f64 = 100.0;

/// Scoring components that can carry a share of the blended score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Component {
    Education,
    Experience,
    Skills,
    Questions,
    Modifiers,
}

impl Component {
    pub const ALL: [Component; 5] = [
        Component::Education,
        Component::Experience,
        Component::Skills,
        Component::Questions,
        Component::Modifiers,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Component::Education => "education",
            Component::Experience => "experience",
            Component::Skills => "skills",
            Component::Questions => "questions",
            Component::Modifiers => "modifiers",
        }
    }
}

/// Weight shares after redistribution; only active components appear.
pub type AppliedWeights = BTreeMap<Component, f64>;

/// Un-normalized component weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseWeights {
    pub education: f64,
    pub experience: f64,
    pub skills: f64,
    pub questions: f64,
    pub modifiers: f64,
}

impl Default for BaseWeights {
    fn default() -> Self {
        Self {
            education: 25.0,
            experience: 30.0,
            skills: 25.0,
            questions: 10.0,
            modifiers: 10.0,
        }
    }
}

impl BaseWeights {
    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::Education => self.education,
            Component::Experience => self.experience,
            Component::Skills => self.skills,
            Component::Questions => self.questions,
            Component::Modifiers => self.modifiers,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ScoringConfigError> {
        for component in Component::ALL {
            let value = self.get(component);
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringConfigError::InvalidBaseWeight {
                    component: component.label(),
                    value,
                });
            }
        }

        if Component::ALL.iter().all(|component| self.get(*component) == 0.0) {
            return Err(ScoringConfigError::ZeroBaseWeights);
        }

        Ok(())
    }
}

/// Which components have any content for a given role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveComponents {
    pub education: bool,
    pub experience: bool,
    pub skills: bool,
    pub questions: bool,
    pub modifiers: bool,
}

impl ActiveComponents {
    pub fn from_role(role: &RoleConfig) -> Self {
        Self {
            education: role.education_requirement.is_some(),
            experience: role.experience_requirement.is_some(),
            skills: !role.skills.is_empty(),
            questions: !role.questions.is_empty(),
            modifiers: role.bonus_rules().is_some() || role.penalty_rules().is_some(),
        }
    }

    pub fn is_active(&self, component: Component) -> bool {
        match component {
            Component::Education => self.education,
            Component::Experience => self.experience,
            Component::Skills => self.skills,
            Component::Questions => self.questions,
            Component::Modifiers => self.modifiers,
        }
    }

    /// True when at least one component produces a sub-score of its own.
    pub fn has_scored_component(&self) -> bool {
        self.education || self.experience || self.skills || self.questions
    }
}

/// Rescale the base weights of active components so they sum to 100.
///
/// Returns an empty map when nothing is active (or every active component has
/// a zero base weight); callers treat that as a degenerate configuration.
pub fn normalize(base: &BaseWeights, active: &ActiveComponents) -> AppliedWeights {
    let active_sum: f64 = Component::ALL
        .iter()
        .filter(|component| active.is_active(**component))
        .map(|component| base.get(*component))
        .sum();

    if active_sum <= 0.0 {
        debug!("no active scoring components; weight map is empty");
        return AppliedWeights::new();
    }

    let scale_factor = WEIGHT_TOTAL / active_sum;
    let weights: AppliedWeights = Component::ALL
        .iter()
        .filter(|component| active.is_active(**component))
        .map(|component| (*component, base.get(*component) * scale_factor))
        .collect();

    debug!(?weights, scale_factor, "normalized component weights");
    weights
}
