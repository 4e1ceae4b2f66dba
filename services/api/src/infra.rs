use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use talent_ai::error::AppError;
use talent_ai::workflows::screening::{
    BatchFailure, CandidateEvidence, CandidateId, EvidenceBundle, RepositoryError, RoleConfig,
    RoleId, ScreeningRecord, ScreeningRepository,
};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type RecordKey = (RoleId, CandidateId);

#[derive(Default, Clone)]
pub(crate) struct InMemoryScreeningRepository {
    records: Arc<Mutex<HashMap<RecordKey, ScreeningRecord>>>,
}

impl InMemoryScreeningRepository {
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<RecordKey, ScreeningRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl ScreeningRepository for InMemoryScreeningRepository {
    fn upsert(&self, record: ScreeningRecord) -> Result<ScreeningRecord, RepositoryError> {
        let mut guard = self.guard()?;
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
        let guard = self.guard()?;
        Ok(guard
            .get(&(role_id.clone(), candidate_id.clone()))
            .cloned())
    }

    fn list_for_role(&self, role_id: &RoleId) -> Result<Vec<ScreeningRecord>, RepositoryError> {
        let guard = self.guard()?;
        Ok(guard
            .values()
            .filter(|record| &record.role_id == role_id)
            .cloned()
            .collect())
    }
}

/// Read and validate a role configuration file.
pub(crate) fn load_role(path: &Path) -> Result<RoleConfig, AppError> {
    let raw = fs::read_to_string(path)?;
    let role: RoleConfig = serde_json::from_str(&raw)?;
    role.validate()?;
    Ok(role)
}

pub(crate) fn load_evidence(path: &Path) -> Result<EvidenceBundle, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(EvidenceBundle::from_json(&raw)?)
}

/// Role id taken from the file stem, e.g. `roles/backend.json` -> `backend`.
pub(crate) fn role_id_for(path: &Path, explicit: Option<String>) -> RoleId {
    RoleId(explicit.unwrap_or_else(|| file_stem(path)))
}

/// Candidate evidence loaded from a directory of `<candidate-id>.json` files.
#[derive(Debug, Default)]
pub(crate) struct EvidenceDirectory {
    pub(crate) candidates: Vec<CandidateEvidence>,
    pub(crate) unreadable: Vec<BatchFailure>,
}

/// Load every `*.json` file in `dir`, in file name order.
///
/// Files that fail to parse are reported individually so one bad extraction
/// does not block the rest of the batch.
pub(crate) fn load_evidence_dir(dir: &Path) -> Result<EvidenceDirectory, AppError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json")
        })
        .collect();
    paths.sort();

    let mut loaded = EvidenceDirectory::default();
    for path in paths {
        let candidate_id = CandidateId(file_stem(&path));
        match load_evidence(&path) {
            Ok(evidence) => loaded.candidates.push(CandidateEvidence {
                candidate_id,
                evidence,
            }),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "skipping unreadable evidence file");
                loaded.unreadable.push(BatchFailure {
                    candidate_id,
                    error: err.to_string(),
                });
            }
        }
    }

    Ok(loaded)
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock after epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("talent-ai-{label}-{nanos}"));
        fs::create_dir_all(&dir).expect("scratch dir");
        dir
    }

    #[test]
    fn evidence_dir_loads_json_files_and_reports_bad_ones() {
        let dir = scratch_dir("evidence");
        fs::write(
            dir.join("cand-b.json"),
            r#"{ "skillEvidence": { "Rust": { "found": true, "level": "HIGH" } } }"#,
        )
        .expect("write evidence");
        fs::write(dir.join("cand-a.json"), r#"{ "educationMet": true }"#).expect("write evidence");
        fs::write(dir.join("cand-c.json"), "not json").expect("write evidence");
        fs::write(dir.join("notes.txt"), "ignored").expect("write notes");

        let loaded = load_evidence_dir(&dir).expect("directory readable");

        let ids: Vec<_> = loaded
            .candidates
            .iter()
            .map(|candidate| candidate.candidate_id.0.as_str())
            .collect();
        assert_eq!(ids, vec!["cand-a", "cand-b"]);
        assert_eq!(loaded.unreadable.len(), 1);
        assert_eq!(loaded.unreadable[0].candidate_id.0, "cand-c");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn role_id_defaults_to_file_stem() {
        let path = Path::new("roles/backend-engineer.json");
        assert_eq!(role_id_for(path, None).0, "backend-engineer");
        assert_eq!(role_id_for(path, Some("be-1".to_string())).0, "be-1");
    }

    #[test]
    fn repository_replaces_records_per_role_and_candidate() {
        let repository = InMemoryScreeningRepository::default();
        let engine = talent_ai::workflows::screening::ScoringEngine::default();
        let result = engine
            .score(&RoleConfig::default(), &EvidenceBundle::default())
            .expect("empty role is valid");

        let record = |role: &str, candidate: &str| ScreeningRecord {
            candidate_id: CandidateId(candidate.to_string()),
            role_id: RoleId(role.to_string()),
            result: result.clone(),
            evaluated_at: chrono::Utc::now(),
        };

        repository.upsert(record("backend", "cand-1")).expect("insert");
        repository.upsert(record("backend", "cand-1")).expect("replace");
        repository.upsert(record("frontend", "cand-1")).expect("insert");

        let backend = repository
            .list_for_role(&RoleId("backend".to_string()))
            .expect("list");
        assert_eq!(backend.len(), 1);
        assert!(repository
            .fetch(
                &RoleId("frontend".to_string()),
                &CandidateId("cand-1".to_string())
            )
            .expect("fetch")
            .is_some());
    }
}
