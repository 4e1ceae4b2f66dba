use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::RoleId;
use super::scoring::{ScoreBreakdown, ScoreResult};

/// Identifier wrapper for screened candidates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Persisted evaluation for one candidate against one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRecord {
    pub candidate_id: CandidateId,
    pub role_id: RoleId,
    pub result: ScoreResult,
    pub evaluated_at: DateTime<Utc>,
}

impl ScreeningRecord {
    pub fn decision_rationale(&self) -> String {
        let result = &self.result;
        if result.rejection_reasons.is_empty() {
            format!(
                "{} with score {} ({})",
                result.status.label().to_lowercase(),
                result.overall_score,
                result.match_level.label().to_lowercase()
            )
        } else {
            format!("rejected: {}", result.rejection_reasons.join("; "))
        }
    }

    pub fn table_view(&self) -> TableView {
        TableView {
            candidate_id: self.candidate_id.clone(),
            role_id: self.role_id.clone(),
            status: self.result.status.label(),
            overall_score: self.result.overall_score,
            match_level: self.result.match_level.label(),
            decision_rationale: self.decision_rationale(),
        }
    }

    pub fn expanded_view(&self) -> ExpandedView {
        ExpandedView {
            candidate_id: self.candidate_id.clone(),
            role_id: self.role_id.clone(),
            status: self.result.status.label(),
            overall_score: self.result.overall_score,
            match_level: self.result.match_level.label(),
            rejection_reasons: self.result.rejection_reasons.clone(),
            breakdown: self.result.breakdown.clone(),
            evaluated_at: self.evaluated_at,
        }
    }
}

/// Order records best-first: score descending, then status, then candidate id.
pub fn rank_records(records: &mut [ScreeningRecord]) {
    records.sort_by(|a, b| {
        (Reverse(a.result.overall_score), a.result.status, &a.candidate_id).cmp(&(
            Reverse(b.result.overall_score),
            b.result.status,
            &b.candidate_id,
        ))
    });
}

/// Storage abstraction so the service can be exercised without a database.
pub trait ScreeningRepository: Send + Sync {
    /// Insert or replace the record for (role, candidate).
    fn upsert(&self, record: ScreeningRecord) -> Result<ScreeningRecord, RepositoryError>;
    fn fetch(
        &self,
        role_id: &RoleId,
        candidate_id: &CandidateId,
    ) -> Result<Option<ScreeningRecord>, RepositoryError>;
    fn list_for_role(&self, role_id: &RoleId) -> Result<Vec<ScreeningRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// One row of the ranked candidate list.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub candidate_id: CandidateId,
    pub role_id: RoleId,
    pub status: &'static str,
    pub overall_score: u8,
    pub match_level: &'static str,
    pub decision_rationale: String,
}

/// Full audit view of a single evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct ExpandedView {
    pub candidate_id: CandidateId,
    pub role_id: RoleId,
    pub status: &'static str,
    pub overall_score: u8,
    pub match_level: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejection_reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
    pub evaluated_at: DateTime<Utc>,
}
