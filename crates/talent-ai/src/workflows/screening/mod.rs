//! Candidate screening against job-role requirements.
//!
//! [`scoring`] holds the deterministic engine: a hard-requirement gate,
//! proportional weight redistribution, per-component scorers, bonus/penalty
//! aggregation, and the composer that produces a [`ScoreResult`]. The engine
//! performs no I/O. [`service`], [`repository`], and [`router`] wrap it with
//! persistence and HTTP intake; evidence extraction is injected through
//! [`EvidenceProvider`].

pub mod evidence;
pub mod export;
pub mod repository;
pub mod role;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use evidence::{
    Answer, EvidenceBundle, EvidenceError, EvidenceLevel, QuestionEvidence, RequirementQuality,
    SkillEvidence,
};
pub use export::{write_table_csv, ExportError};
pub use repository::{
    rank_records, CandidateId, ExpandedView, RepositoryError, ScreeningRecord,
    ScreeningRepository, TableView,
};
pub use role::{
    BonusConfig, BonusItem, EducationRequirement, EmploymentGapRule, ExperienceRequirement,
    GapThreshold, JobStabilityRule, PenaltyConfig, Question, RoleConfig, RoleConfigError, RoleId,
    Skill, StabilityConcern,
};
pub use router::screening_router;
pub use scoring::{
    MatchLevel, ScoreBreakdown, ScoreResult, ScoringConfig, ScoringConfigError, ScoringEngine,
    ScreeningStatus,
};
pub use service::{
    BatchFailure, BatchOutcome, BatchRequest, CandidateEvidence, EvaluationRequest,
    EvidenceProvider, ExtractionError, ScreeningService, ScreeningServiceError,
};
