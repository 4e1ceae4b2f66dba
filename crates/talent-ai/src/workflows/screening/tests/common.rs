use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::screening::evidence::{
    Answer, EvidenceBundle, EvidenceLevel, QuestionEvidence, RequirementQuality, SkillEvidence,
};
use crate::workflows::screening::repository::{
    CandidateId, RepositoryError, ScreeningRecord, ScreeningRepository,
};
use crate::workflows::screening::role::{
    BonusConfig, BonusItem, EducationRequirement, EmploymentGapRule, ExperienceRequirement,
    GapThreshold, JobStabilityRule, PenaltyConfig, Question, RoleConfig, RoleId, Skill,
    StabilityConcern,
};
use crate::workflows::screening::scoring::{ScoringConfig, ScoringEngine};
use crate::workflows::screening::service::{
    EvaluationRequest, EvidenceProvider, ExtractionError, ScreeningService,
};
use crate::workflows::screening::screening_router;

pub(super) const DATABASES_QUESTION: &str = "Have you operated production databases?";
pub(super) const MENTORING_QUESTION: &str = "Have you mentored engineers?";

pub(super) fn skill(name: &str, weight: u8, mandatory: bool) -> Skill {
    Skill {
        name: name.to_string(),
        category: Some("engineering".to_string()),
        weight,
        mandatory,
    }
}

pub(super) fn backend_role() -> RoleConfig {
    RoleConfig {
        education_requirement: Some(EducationRequirement {
            required: true,
            description: "Bachelor's degree in computer science or equivalent".to_string(),
        }),
        experience_requirement: Some(ExperienceRequirement {
            required: false,
            description: "Backend service development".to_string(),
            minimum_years: Some(3.0),
        }),
        skills: vec![
            skill("Rust", 8, true),
            skill("PostgreSQL", 6, false),
            skill("Kubernetes", 4, false),
        ],
        questions: vec![
            Question {
                text: DATABASES_QUESTION.to_string(),
                category: None,
                weight: 5,
            },
            Question {
                text: MENTORING_QUESTION.to_string(),
                category: Some("leadership".to_string()),
                weight: 3,
            },
        ],
        bonus_config: Some(BonusConfig {
            enabled: true,
            items: vec![
                BonusItem {
                    name: "Open source contributions".to_string(),
                    points: 5.0,
                    trigger_keywords: vec!["open source".to_string()],
                },
                BonusItem {
                    name: "Conference speaker".to_string(),
                    points: 3.0,
                    trigger_keywords: Vec::new(),
                },
            ],
            max_points: None,
        }),
        penalty_config: Some(PenaltyConfig {
            enabled: true,
            job_stability: Some(JobStabilityRule {
                concern: StabilityConcern::Moderate,
            }),
            employment_gap: Some(EmploymentGapRule {
                threshold: GapThreshold::OneYear,
            }),
            max_points: None,
        }),
    }
}

/// Scores 92 against `backend_role`:
/// base (25*100 + 30*80 + 25*81 + 10*87) / 90 = 86.61, plus a 5 point bonus.
pub(super) fn strong_evidence() -> EvidenceBundle {
    let mut skill_evidence = BTreeMap::new();
    skill_evidence.insert("Rust".to_string(), SkillEvidence::found(EvidenceLevel::High));
    skill_evidence.insert(
        "PostgreSQL".to_string(),
        SkillEvidence::found(EvidenceLevel::Medium),
    );
    skill_evidence.insert(
        "Kubernetes".to_string(),
        SkillEvidence::found(EvidenceLevel::Low),
    );

    let mut question_evidence = BTreeMap::new();
    question_evidence.insert(
        DATABASES_QUESTION.to_string(),
        QuestionEvidence {
            answer: Answer::Yes,
            quality: EvidenceLevel::High,
        },
    );
    question_evidence.insert(
        MENTORING_QUESTION.to_string(),
        QuestionEvidence {
            answer: Answer::Partial,
            quality: EvidenceLevel::Medium,
        },
    );

    EvidenceBundle {
        education_met: Some(true),
        experience_met: Some(true),
        education_quality: None,
        experience_quality: Some(RequirementQuality::Meets),
        skill_evidence,
        question_evidence,
        bonus_triggers_matched: vec!["open source".to_string()],
        penalty_triggers_matched: Vec::new(),
    }
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default()).expect("default scoring config")
}

pub(super) fn role_id() -> RoleId {
    RoleId("backend-engineer".to_string())
}

pub(super) fn candidate(id: &str) -> CandidateId {
    CandidateId(id.to_string())
}

pub(super) fn evaluation_request(candidate_id: &str, evidence: EvidenceBundle) -> EvaluationRequest {
    EvaluationRequest {
        candidate_id: candidate(candidate_id),
        role_id: role_id(),
        role: backend_role(),
        evidence,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<BTreeMap<(RoleId, CandidateId), ScreeningRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("lock").len()
    }
}

impl ScreeningRepository for MemoryRepository {
    fn upsert(&self, record: ScreeningRecord) -> Result<ScreeningRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        guard.insert(
            (record.role_id.clone(), record.candidate_id.clone()),
            record.clone(),
        );
        Ok(record)
    }

    fn fetch(
        &self,
        role_id: &RoleId,
        candidate_id: &CandidateId,
    ) -> Result<Option<ScreeningRecord>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard
            .get(&(role_id.clone(), candidate_id.clone()))
            .cloned())
    }

    fn list_for_role(&self, role_id: &RoleId) -> Result<Vec<ScreeningRecord>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard
            .values()
            .filter(|record| &record.role_id == role_id)
            .cloned()
            .collect())
    }
}

/// Repository that refuses writes for specific candidates.
#[derive(Default, Clone)]
pub(super) struct FlakyRepository {
    inner: MemoryRepository,
    broken: BTreeSet<CandidateId>,
}

impl FlakyRepository {
    pub(super) fn failing_for(ids: &[&str]) -> Self {
        Self {
            inner: MemoryRepository::default(),
            broken: ids.iter().map(|id| candidate(id)).collect(),
        }
    }
}

impl ScreeningRepository for FlakyRepository {
    fn upsert(&self, record: ScreeningRecord) -> Result<ScreeningRecord, RepositoryError> {
        if self.broken.contains(&record.candidate_id) {
            return Err(RepositoryError::Unavailable("write timed out".to_string()));
        }
        self.inner.upsert(record)
    }

    fn fetch(
        &self,
        role_id: &RoleId,
        candidate_id: &CandidateId,
    ) -> Result<Option<ScreeningRecord>, RepositoryError> {
        self.inner.fetch(role_id, candidate_id)
    }

    fn list_for_role(&self, role_id: &RoleId) -> Result<Vec<ScreeningRecord>, RepositoryError> {
        self.inner.list_for_role(role_id)
    }
}

/// Provider returning a canned response, standing in for the extraction model.
pub(super) struct ScriptedProvider {
    response: Mutex<Option<Result<EvidenceBundle, ExtractionError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub(super) fn returning(response: Result<EvidenceBundle, ExtractionError>) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }
}

impl EvidenceProvider for ScriptedProvider {
    fn extract(
        &self,
        _role: &RoleConfig,
        resume_text: &str,
    ) -> Result<EvidenceBundle, ExtractionError> {
        self.calls.lock().expect("lock").push(resume_text.to_string());
        self.response
            .lock()
            .expect("lock")
            .take()
            .unwrap_or_else(|| Err(ExtractionError::Unavailable("script exhausted".to_string())))
    }
}

pub(super) fn build_service() -> (ScreeningService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ScreeningService::new(repository.clone(), ScoringConfig::default())
        .expect("default scoring config");
    (service, repository)
}

pub(super) fn router_with_service(service: ScreeningService<MemoryRepository>) -> axum::Router {
    screening_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
