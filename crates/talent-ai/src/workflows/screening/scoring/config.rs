use serde::{Deserialize, Serialize};

use super::super::role::{GapThreshold, StabilityConcern};
use super::weights::BaseWeights;

pub const DEFAULT_QUALIFIED_THRESHOLD: u8 = 70;
pub const DEFAULT_MANDATORY_SKILL_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_BONUS_CAP: f64 = 10.0;
pub const DEFAULT_PENALTY_CAP: f64 = 10.0;

/// Engine-wide scoring dials. Role configuration decides what is scored; this
/// decides how the pieces are weighted and where the decision lines sit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub base_weights: BaseWeights,
    pub qualified_threshold: u8,
    pub mandatory_skill_multiplier: f64,
    pub match_bands: MatchBands,
    pub default_bonus_cap: f64,
    pub default_penalty_cap: f64,
    pub penalty_schedule: PenaltySchedule,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_weights: BaseWeights::default(),
            qualified_threshold: DEFAULT_QUALIFIED_THRESHOLD,
            mandatory_skill_multiplier: DEFAULT_MANDATORY_SKILL_MULTIPLIER,
            match_bands: MatchBands::default(),
            default_bonus_cap: DEFAULT_BONUS_CAP,
            default_penalty_cap: DEFAULT_PENALTY_CAP,
            penalty_schedule: PenaltySchedule::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        self.base_weights.validate()?;

        if self.qualified_threshold > 100 {
            return Err(ScoringConfigError::ThresholdOutOfRange(
                self.qualified_threshold,
            ));
        }

        if !self.mandatory_skill_multiplier.is_finite() || self.mandatory_skill_multiplier < 1.0 {
            return Err(ScoringConfigError::InvalidMultiplier(
                self.mandatory_skill_multiplier,
            ));
        }

        let bands = &self.match_bands;
        if !(bands.perfect > bands.strong && bands.strong > bands.good && bands.good > bands.fair)
            || bands.perfect > 100
        {
            return Err(ScoringConfigError::UnorderedBands);
        }

        for (name, cap) in [
            ("default_bonus_cap", self.default_bonus_cap),
            ("default_penalty_cap", self.default_penalty_cap),
        ] {
            if !cap.is_finite() || cap < 0.0 {
                return Err(ScoringConfigError::InvalidCap { name, value: cap });
            }
        }

        self.penalty_schedule.validate()
    }
}

/// Lower bounds of the display bands. Anything under `fair` is POOR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBands {
    pub perfect: u8,
    pub strong: u8,
    pub good: u8,
    pub fair: u8,
}

impl Default for MatchBands {
    fn default() -> Self {
        Self {
            perfect: 90,
            strong: 80,
            good: 70,
            fair: 60,
        }
    }
}

/// Deduction magnitudes per configured penalty level. Stricter levels deduct more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltySchedule {
    pub stability_strict: f64,
    pub stability_moderate: f64,
    pub stability_lenient: f64,
    pub gap_six_months: f64,
    pub gap_one_year: f64,
    pub gap_two_years: f64,
}

impl Default for PenaltySchedule {
    fn default() -> Self {
        Self {
            stability_strict: 8.0,
            stability_moderate: 5.0,
            stability_lenient: 2.0,
            gap_six_months: 8.0,
            gap_one_year: 5.0,
            gap_two_years: 2.0,
        }
    }
}

impl PenaltySchedule {
    pub fn job_stability(&self, concern: StabilityConcern) -> f64 {
        match concern {
            StabilityConcern::Strict => self.stability_strict,
            StabilityConcern::Moderate => self.stability_moderate,
            StabilityConcern::Lenient => self.stability_lenient,
        }
    }

    pub fn employment_gap(&self, threshold: GapThreshold) -> f64 {
        match threshold {
            GapThreshold::SixMonths => self.gap_six_months,
            GapThreshold::OneYear => self.gap_one_year,
            GapThreshold::TwoYears => self.gap_two_years,
        }
    }

    fn validate(&self) -> Result<(), ScoringConfigError> {
        let values = [
            self.stability_strict,
            self.stability_moderate,
            self.stability_lenient,
            self.gap_six_months,
            self.gap_one_year,
            self.gap_two_years,
        ];
        if values.iter().any(|value| !value.is_finite() || *value < 0.0) {
            return Err(ScoringConfigError::InvalidPenaltySchedule);
        }

        let stability_ordered = self.stability_strict >= self.stability_moderate
            && self.stability_moderate >= self.stability_lenient;
        let gap_ordered = self.gap_six_months >= self.gap_one_year
            && self.gap_one_year >= self.gap_two_years;
        if !(stability_ordered && gap_ordered) {
            return Err(ScoringConfigError::InvalidPenaltySchedule);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("base weight for {component} must be finite and non-negative (found {value})")]
    InvalidBaseWeight { component: &'static str, value: f64 },
    #[error("at least one base weight must be positive")]
    ZeroBaseWeights,
    #[error("qualified threshold {0} is outside 0-100")]
    ThresholdOutOfRange(u8),
    #[error("mandatory skill multiplier must be finite and at least 1 (found {0})")]
    InvalidMultiplier(f64),
    #[error("match bands must be strictly descending and within 0-100")]
    UnorderedBands,
    #[error("{name} must be finite and non-negative (found {value})")]
    InvalidCap { name: &'static str, value: f64 },
    #[error("penalty schedule must be non-negative and deduct more for stricter levels")]
    InvalidPenaltySchedule,
}
