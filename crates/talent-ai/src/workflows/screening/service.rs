use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::evidence::{EvidenceBundle, EvidenceError};
use super::repository::{
    rank_records, CandidateId, RepositoryError, ScreeningRecord, ScreeningRepository, TableView,
};
use super::role::{RoleConfig, RoleConfigError, RoleId};
use super::scoring::{ScoringConfig, ScoringConfigError, ScoringEngine};

/// Source of candidate evidence, typically a language-model extraction client.
///
/// Injected per call so the service itself never owns API credentials.
pub trait EvidenceProvider: Send + Sync {
    fn extract(&self, role: &RoleConfig, resume_text: &str)
        -> Result<EvidenceBundle, ExtractionError>;
}

/// Upstream extraction failures. The engine is never invoked when these occur.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("evidence provider unavailable: {0}")]
    Unavailable(String),
    #[error("evidence provider returned unusable output: {0}")]
    InvalidOutput(#[from] EvidenceError),
}

impl ExtractionError {
    /// Whether an orchestrator should re-queue the candidate.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExtractionError::Unavailable(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub candidate_id: CandidateId,
    pub role_id: RoleId,
    pub role: RoleConfig,
    pub evidence: EvidenceBundle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateEvidence {
    pub candidate_id: CandidateId,
    pub evidence: EvidenceBundle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub role_id: RoleId,
    pub role: RoleConfig,
    pub candidates: Vec<CandidateEvidence>,
}

/// Per-candidate results of a batch. One failure never blocks the others.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub scored: Vec<ScreeningRecord>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn table(&self) -> Vec<TableView> {
        self.scored.iter().map(ScreeningRecord::table_view).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub candidate_id: CandidateId,
    pub error: String,
}

/// Service composing the scoring engine with a result repository.
pub struct ScreeningService<R> {
    repository: Arc<R>,
    engine: Arc<ScoringEngine>,
}

impl<R> ScreeningService<R>
where
    R: ScreeningRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        Ok(Self {
            repository,
            engine: Arc::new(ScoringEngine::new(config)?),
        })
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Score pre-extracted evidence and persist the outcome.
    pub fn evaluate(
        &self,
        request: EvaluationRequest,
    ) -> Result<ScreeningRecord, ScreeningServiceError> {
        let EvaluationRequest {
            candidate_id,
            role_id,
            role,
            evidence,
        } = request;

        let result = self.engine.score(&role, &evidence)?;
        let record = ScreeningRecord {
            candidate_id,
            role_id,
            result,
            evaluated_at: Utc::now(),
        };

        let stored = self.repository.upsert(record)?;
        info!(
            candidate = %stored.candidate_id.0,
            role = %stored.role_id.0,
            status = stored.result.status.label(),
            score = stored.result.overall_score,
            "screening evaluation stored"
        );
        Ok(stored)
    }

    /// Extract evidence from resume text through `provider`, then evaluate.
    ///
    /// Extraction failures are returned as-is and nothing is persisted, leaving
    /// the candidate unevaluated for the caller to retry.
    pub fn evaluate_resume<P>(
        &self,
        provider: &P,
        candidate_id: CandidateId,
        role_id: RoleId,
        role: RoleConfig,
        resume_text: &str,
    ) -> Result<ScreeningRecord, ScreeningServiceError>
    where
        P: EvidenceProvider + ?Sized,
    {
        role.validate()?;

        let evidence = provider.extract(&role, resume_text).map_err(|err| {
            warn!(
                candidate = %candidate_id.0,
                retryable = err.is_retryable(),
                error = %err,
                "evidence extraction failed; candidate left unevaluated"
            );
            err
        })?;

        self.evaluate(EvaluationRequest {
            candidate_id,
            role_id,
            role,
            evidence,
        })
    }

    /// Score every candidate against one role.
    ///
    /// An invalid role fails the whole batch; storage failures are isolated to
    /// the candidate they occur for.
    pub fn evaluate_batch(
        &self,
        request: BatchRequest,
    ) -> Result<BatchOutcome, ScreeningServiceError> {
        let BatchRequest {
            role_id,
            role,
            candidates,
        } = request;

        role.validate()?;

        let evaluated_at = Utc::now();
        let mut outcome = BatchOutcome::default();

        for candidate in candidates {
            let result = self.engine.score_validated(&role, &candidate.evidence);
            let record = ScreeningRecord {
                candidate_id: candidate.candidate_id,
                role_id: role_id.clone(),
                result,
                evaluated_at,
            };

            let candidate_id = record.candidate_id.clone();
            match self.repository.upsert(record) {
                Ok(stored) => outcome.scored.push(stored),
                Err(err) => {
                    warn!(candidate = %candidate_id.0, error = %err, "failed to store batch result");
                    outcome.failures.push(BatchFailure {
                        candidate_id,
                        error: err.to_string(),
                    });
                }
            }
        }

        rank_records(&mut outcome.scored);
        info!(
            role = %role_id.0,
            scored = outcome.scored.len(),
            failed = outcome.failures.len(),
            "screening batch complete"
        );
        Ok(outcome)
    }

    pub fn get(
        &self,
        role_id: &RoleId,
        candidate_id: &CandidateId,
    ) -> Result<ScreeningRecord, ScreeningServiceError> {
        let record = self
            .repository
            .fetch(role_id, candidate_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Stored evaluations for a role, best candidates first.
    pub fn ranking(&self, role_id: &RoleId) -> Result<Vec<ScreeningRecord>, ScreeningServiceError> {
        let mut records = self.repository.list_for_role(role_id)?;
        rank_records(&mut records);
        Ok(records)
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error("invalid role configuration: {0}")]
    InvalidRole(#[from] RoleConfigError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
