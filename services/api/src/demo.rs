use crate::infra::{
    file_stem, load_evidence, load_evidence_dir, load_role, role_id_for,
    InMemoryScreeningRepository,
};
use clap::Args;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;
use talent_ai::config::{AppConfig, ConfigError};
use talent_ai::error::AppError;
use talent_ai::workflows::screening::{
    write_table_csv, Answer, BatchFailure, BatchRequest, BonusConfig, BonusItem, CandidateEvidence,
    CandidateId, EducationRequirement, EmploymentGapRule, EvaluationRequest, EvidenceBundle,
    EvidenceLevel, ExperienceRequirement, GapThreshold, JobStabilityRule, PenaltyConfig, Question,
    QuestionEvidence, RequirementQuality, RoleConfig, RoleId, ScreeningRecord, ScreeningService,
    Skill, SkillEvidence, StabilityConcern, TableView,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Role configuration JSON file
    #[arg(long)]
    pub(crate) role: PathBuf,
    /// Extracted evidence JSON file for the candidate
    #[arg(long)]
    pub(crate) evidence: PathBuf,
    /// Candidate id (defaults to the evidence file stem)
    #[arg(long)]
    pub(crate) candidate_id: Option<String>,
    /// Print the expanded view as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Role configuration JSON file
    #[arg(long)]
    pub(crate) role: PathBuf,
    /// Directory of `<candidate-id>.json` evidence files
    #[arg(long)]
    pub(crate) evidence_dir: PathBuf,
    /// Role id (defaults to the role file stem)
    #[arg(long)]
    pub(crate) role_id: Option<String>,
    /// Also write the ranked table to this CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the full breakdown for the top-ranked candidate.
    #[arg(long)]
    pub(crate) expanded: bool,
}

fn screening_service() -> Result<ScreeningService<InMemoryScreeningRepository>, AppError> {
    let config = AppConfig::load()?;
    let service = ScreeningService::new(
        Arc::new(InMemoryScreeningRepository::default()),
        config.scoring,
    )
    .map_err(ConfigError::from)?;
    Ok(service)
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        role,
        evidence,
        candidate_id,
        json,
    } = args;

    let role_config = load_role(&role)?;
    let bundle = load_evidence(&evidence)?;
    let candidate_id = CandidateId(candidate_id.unwrap_or_else(|| file_stem(&evidence)));

    let service = screening_service()?;
    let record = service.evaluate(EvaluationRequest {
        candidate_id,
        role_id: role_id_for(&role, None),
        role: role_config,
        evidence: bundle,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record.expanded_view())?);
    } else {
        render_expanded(&record);
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs {
        role,
        evidence_dir,
        role_id,
        csv,
    } = args;

    let role_config = load_role(&role)?;
    let loaded = load_evidence_dir(&evidence_dir)?;
    let role_id = role_id_for(&role, role_id);

    let service = screening_service()?;
    let mut outcome = service.evaluate_batch(BatchRequest {
        role_id: role_id.clone(),
        role: role_config,
        candidates: loaded.candidates,
    })?;
    outcome.failures.extend(loaded.unreadable);

    let table = outcome.table();
    println!("Screening results for role {}", role_id.0);
    render_table(&table);
    render_failures(&outcome.failures);

    if let Some(path) = csv {
        let file = File::create(&path)?;
        write_table_csv(BufWriter::new(file), &table)?;
        println!("\nWrote {} rows to {}", table.len(), path.display());
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = screening_service()?;
    let role_id = RoleId("platform-engineer".to_string());

    println!("Candidate screening demo");
    println!("Role {}: {}", role_id.0, describe_role(&demo_role()));

    let outcome = service.evaluate_batch(BatchRequest {
        role_id: role_id.clone(),
        role: demo_role(),
        candidates: demo_candidates(),
    })?;

    println!();
    render_table(&outcome.table());
    render_failures(&outcome.failures);

    if args.expanded {
        if let Some(top) = outcome.scored.first() {
            println!("\nTop candidate breakdown");
            render_expanded(top);
        }
    }
    Ok(())
}

fn describe_role(role: &RoleConfig) -> String {
    let mandatory: Vec<_> = role
        .mandatory_skills()
        .map(|skill| skill.name.as_str())
        .collect();
    format!(
        "{} skills ({} mandatory: {}), {} questions",
        role.skills.len(),
        mandatory.len(),
        mandatory.join(", "),
        role.questions.len()
    )
}

pub(crate) fn render_table(rows: &[TableView]) {
    println!(
        "{:<4} {:<16} {:<14} {:>5}  {:<6}  {}",
        "#", "candidate", "status", "score", "match", "rationale"
    );
    for (index, row) in rows.iter().enumerate() {
        println!(
            "{:<4} {:<16} {:<14} {:>5}  {:<6}  {}",
            index + 1,
            row.candidate_id.0,
            row.status,
            row.overall_score,
            row.match_level,
            row.decision_rationale
        );
    }
}

fn render_failures(failures: &[BatchFailure]) {
    if failures.is_empty() {
        return;
    }
    println!("\nNot evaluated:");
    for failure in failures {
        println!("- {}: {}", failure.candidate_id.0, failure.error);
    }
}

pub(crate) fn render_expanded(record: &ScreeningRecord) {
    let result = &record.result;
    let breakdown = &result.breakdown;

    println!(
        "{} for {}: {} ({}) score {}",
        record.candidate_id.0,
        record.role_id.0,
        result.status.label(),
        result.match_level.label(),
        result.overall_score
    );
    for reason in &result.rejection_reasons {
        println!("  rejected: {reason}");
    }

    for (component, weight) in &breakdown.applied_weights {
        let blend = breakdown
            .effective_weights
            .get(component)
            .map(|share| format!("blend {share:>6.2}"))
            .unwrap_or_else(|| "additive".to_string());
        println!("  weight {:<11} {:>6.2}  {blend}", component.label(), weight);
    }
    let components = [
        ("education", breakdown.education_score),
        ("experience", breakdown.experience_score),
        ("skills", breakdown.skills_score),
        ("questions", breakdown.questions_score),
    ];
    for (label, score) in components {
        if let Some(score) = score {
            println!("  score  {label:<11} {score:>6}");
        }
    }
    for skill in &breakdown.skills {
        println!(
            "    skill {:<16} {:<6} x{:.1} -> {}",
            skill.name,
            skill.level.label(),
            skill.effective_weight,
            skill.points
        );
    }
    if let Some(base) = breakdown.base_score {
        println!("  base score {base:.2}");
    }
    println!(
        "  bonus +{:.1} | penalty {:.1}",
        breakdown.bonus_points, breakdown.penalty_points
    );
    for note in &breakdown.notes {
        println!("  note: {note}");
    }
    println!("  evaluated at {}", record.evaluated_at.to_rfc3339());
}

fn skill(name: &str, weight: u8, mandatory: bool) -> Skill {
    Skill {
        name: name.to_string(),
        category: None,
        weight,
        mandatory,
    }
}

const ON_CALL_QUESTION: &str = "Have you carried a production pager?";
const MIGRATION_QUESTION: &str = "Have you led a zero-downtime migration?";

fn demo_role() -> RoleConfig {
    RoleConfig {
        education_requirement: Some(EducationRequirement {
            required: false,
            description: "Degree in computer science or equivalent experience".to_string(),
        }),
        experience_requirement: Some(ExperienceRequirement {
            required: true,
            description: "Operating distributed systems in production".to_string(),
            minimum_years: Some(4.0),
        }),
        skills: vec![
            skill("Rust", 9, true),
            skill("Kubernetes", 7, true),
            skill("Terraform", 5, false),
            skill("PostgreSQL", 4, false),
        ],
        questions: vec![
            Question {
                text: ON_CALL_QUESTION.to_string(),
                category: Some("operations".to_string()),
                weight: 6,
            },
            Question {
                text: MIGRATION_QUESTION.to_string(),
                category: None,
                weight: 4,
            },
        ],
        bonus_config: Some(BonusConfig {
            enabled: true,
            items: vec![
                BonusItem {
                    name: "Open source maintainer".to_string(),
                    points: 5.0,
                    trigger_keywords: vec!["maintainer".to_string()],
                },
                BonusItem {
                    name: "CNCF certification".to_string(),
                    points: 3.0,
                    trigger_keywords: vec!["cka".to_string()],
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

fn evidence(
    experience_met: bool,
    experience_quality: Option<RequirementQuality>,
    skills: &[(&str, EvidenceLevel)],
    answers: &[(&str, Answer, EvidenceLevel)],
) -> EvidenceBundle {
    let skill_evidence: BTreeMap<_, _> = skills
        .iter()
        .map(|(name, level)| (name.to_string(), SkillEvidence::found(*level)))
        .collect();
    let question_evidence: BTreeMap<_, _> = answers
        .iter()
        .map(|(text, answer, quality)| {
            (
                text.to_string(),
                QuestionEvidence {
                    answer: *answer,
                    quality: *quality,
                },
            )
        })
        .collect();

    EvidenceBundle {
        education_met: Some(true),
        experience_met: Some(experience_met),
        education_quality: None,
        experience_quality,
        skill_evidence,
        question_evidence,
        bonus_triggers_matched: Vec::new(),
        penalty_triggers_matched: Vec::new(),
    }
}

fn demo_candidates() -> Vec<CandidateEvidence> {
    let mut veteran = evidence(
        true,
        Some(RequirementQuality::Exceeds),
        &[
            ("Rust", EvidenceLevel::High),
            ("Kubernetes", EvidenceLevel::High),
            ("Terraform", EvidenceLevel::Medium),
            ("PostgreSQL", EvidenceLevel::Medium),
        ],
        &[
            (ON_CALL_QUESTION, Answer::Yes, EvidenceLevel::High),
            (MIGRATION_QUESTION, Answer::Yes, EvidenceLevel::Medium),
        ],
    );
    veteran.bonus_triggers_matched = vec!["maintainer".to_string()];

    let mut hopper = evidence(
        true,
        Some(RequirementQuality::Meets),
        &[
            ("Rust", EvidenceLevel::Medium),
            ("Kubernetes", EvidenceLevel::Medium),
            ("Terraform", EvidenceLevel::High),
        ],
        &[(ON_CALL_QUESTION, Answer::Partial, EvidenceLevel::Medium)],
    );
    hopper.bonus_triggers_matched = vec!["CKA".to_string()];
    hopper.penalty_triggers_matched = vec!["job hopping".to_string()];

    let junior = evidence(
        true,
        Some(RequirementQuality::Below),
        &[("Rust", EvidenceLevel::Low), ("Kubernetes", EvidenceLevel::Low)],
        &[(ON_CALL_QUESTION, Answer::No, EvidenceLevel::Low)],
    );

    let career_switcher = evidence(
        false,
        None,
        &[("Rust", EvidenceLevel::Medium)],
        &[(MIGRATION_QUESTION, Answer::No, EvidenceLevel::None)],
    );

    [
        ("cand-aiko", veteran),
        ("cand-bram", hopper),
        ("cand-chidi", junior),
        ("cand-dana", career_switcher),
    ]
    .into_iter()
    .map(|(id, evidence)| CandidateEvidence {
        candidate_id: CandidateId(id.to_string()),
        evidence,
    })
    .collect()
}
