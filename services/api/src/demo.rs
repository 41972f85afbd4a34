use crate::infra::{build_services, SharedAcademy, SharedFunnel};
use accelerator_ai::config::FunnelSettings;
use accelerator_ai::error::AppError;
use accelerator_ai::workflows::academy::{
    AcademySessionId, Certificate, CertificateIdSource, RandomCertificateIds,
};
use accelerator_ai::workflows::content::StaticContentService;
use accelerator_ai::workflows::funnel::{
    ApplicantProfile, FinalResult, FixedEthics, FunnelError, FunnelServiceError,
    FunnelSessionId, FunnelStage, IdeaInput, PersonalityAnswer, PersonalitySubmission,
    ProjectStage, ScoringConfig, ScoringEngine, TechLevel,
};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Ethics metric used instead of the random draw.
    #[arg(long, default_value_t = 90.0)]
    pub(crate) ethics: f64,
    /// Score the applicant without the project evaluation step.
    #[arg(long)]
    pub(crate) skip_project_evaluation: bool,
    /// Startup name carried into the academy.
    #[arg(long, default_value = "Harvest Loop")]
    pub(crate) startup_name: String,
    /// Number of academy levels to complete (defaults to the whole curriculum).
    #[arg(long)]
    pub(crate) levels: Option<u32>,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            ethics: 90.0,
            skip_project_evaluation: false,
            startup_name: "Harvest Loop".to_string(),
            levels: None,
        }
    }
}

/// What the scripted applicant achieved.
#[derive(Debug)]
pub(crate) struct DemoSummary {
    pub(crate) result: FinalResult,
    pub(crate) final_stage: FunnelStage,
    pub(crate) levels_completed: usize,
    pub(crate) certificate: Option<Certificate>,
}

const EXERCISE_ANSWER: &str = "First, interview ten growers about spoilage. Second, price cold \
     storage per crate. Third, pilot one market route and measure waste.";

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Accelerator walkthrough (built-in content)");
    let summary = walkthrough(&args, Arc::new(RandomCertificateIds)).await?;
    render_summary(&summary);
    Ok(())
}

fn demo_applicant() -> ApplicantProfile {
    ApplicantProfile {
        code_name: "Falcon".to_string(),
        project_stage: ProjectStage::Product,
        sector: "Tech".to_string(),
        goal: "Cut food waste between farm and market".to_string(),
        tech_level: TechLevel::High,
    }
}

pub(crate) async fn walkthrough(
    args: &DemoArgs,
    certificates: Arc<dyn CertificateIdSource>,
) -> Result<DemoSummary, AppError> {
    let engine = ScoringEngine::new(ScoringConfig::default(), Arc::new(FixedEthics(args.ethics)));
    let settings = FunnelSettings {
        include_project_evaluation: !args.skip_project_evaluation,
    };
    let (funnel, academy) =
        build_services(Arc::new(StaticContentService), settings, engine, certificates);

    let id = funnel.start()?.id;
    println!("- Funnel session {}", id.0);
    let result = run_funnel(&funnel, &id, settings).await?;
    println!(
        "- Score {} | {} | qualified: {}",
        result.score, result.leadership_style, result.is_qualified
    );
    for badge in &result.badges {
        println!("  - badge {} {}", badge.icon, badge.name);
    }

    let final_stage = funnel.continue_from_assessment(&id)?.controller.stage();
    if final_stage != FunnelStage::FinalReport {
        println!("  {}", result.recommendation);
        return Ok(DemoSummary {
            result,
            final_stage,
            levels_completed: 0,
            certificate: None,
        });
    }

    let enrolled = funnel.enter_program(&id, Some(args.startup_name.as_str()))?;
    println!(
        "- Academy session {} for {}",
        enrolled.id.0,
        enrolled.progression.user().startup_name
    );
    let total = enrolled.progression.levels().len();
    let target = args
        .levels
        .map_or(total, |levels| (levels as usize).min(total));

    for level_id in (1..).take(target) {
        if !complete_level(&academy, &enrolled.id, level_id).await? {
            break;
        }
    }

    let record = academy.get(&enrolled.id)?;
    let certificate = if record.progression.all_completed() {
        Some(academy.certificate(&enrolled.id)?)
    } else {
        None
    };

    Ok(DemoSummary {
        result,
        final_stage,
        levels_completed: record.progression.completed_count(),
        certificate,
    })
}

async fn run_funnel(
    funnel: &SharedFunnel,
    id: &FunnelSessionId,
    settings: FunnelSettings,
) -> Result<FinalResult, AppError> {
    funnel.submit_profile(id, demo_applicant())?;
    let answers = (1..=4)
        .map(|scenario| PersonalityAnswer {
            scenario,
            option: 2,
        })
        .collect();
    let record = funnel.submit_personality(
        id,
        PersonalitySubmission {
            style: None,
            answers,
        },
    )?;
    println!(
        "- Personality: {}",
        record.controller.leadership_style().unwrap_or_default()
    );

    let mut record = funnel.load_analytical_questions(id).await?;
    while let Some(question) = record.controller.analytical().current_question() {
        let option = question.correct_index;
        let (progress, next) = funnel.answer_analytical(id, option)?;
        if let Some(score) = progress.score {
            println!("- Analytical score {score}% ({}/{})", progress.correct, progress.total);
        }
        record = next;
    }

    if settings.include_project_evaluation {
        let idea = "A cold-chain marketplace matching smallholder farms with city grocers.";
        let evaluated = funnel
            .evaluate_project(id, IdeaInput::Text(idea.to_string()))
            .await?;
        if let Some(evaluation) = evaluated.controller.project_evaluation() {
            println!(
                "- Project evaluation {:.0}/100 ({:?}): {}",
                evaluation.total_score, evaluation.classification, evaluation.ai_opinion
            );
        }
        record = funnel.complete_project_evaluation(id)?;
    }

    record
        .controller
        .result()
        .cloned()
        .ok_or_else(|| {
            FunnelServiceError::Funnel(FunnelError::MissingPrerequisite("final result")).into()
        })
}

async fn complete_level(
    academy: &SharedAcademy,
    id: &AcademySessionId,
    level_id: u32,
) -> Result<bool, AppError> {
    academy.select_level(id, level_id).await?;
    academy.record_reading(id, 100)?;
    academy.begin_exercise(id)?;
    academy.submit_exercise(id, EXERCISE_ANSWER).await?;
    let record = academy.begin_quiz(id).await?;

    let key: Vec<(u32, usize)> = record
        .progression
        .active_session()
        .map(|session| {
            session
                .questions()
                .iter()
                .map(|question| (question.id, question.correct_index))
                .collect()
        })
        .unwrap_or_default();
    for (question_id, option) in key {
        academy.answer_quiz(id, question_id, option)?;
    }

    let (outcome, record) = academy.submit_quiz(id)?;
    if !outcome.passed {
        println!("  - Level {level_id}: quiz {}/{}, stopping", outcome.correct, outcome.total);
        return Ok(false);
    }
    let title = record
        .progression
        .active_session()
        .map(|session| session.title().to_string())
        .unwrap_or_default();
    academy.finish_level(id)?;
    println!(
        "  - Level {level_id} {title}: quiz {}/{}",
        outcome.correct, outcome.total
    );
    Ok(true)
}

fn render_summary(summary: &DemoSummary) {
    println!("- Funnel ended at {}", summary.final_stage);
    println!("- Levels completed: {}", summary.levels_completed);
    match &summary.certificate {
        Some(certificate) => println!(
            "- Certificate {} issued to {} ({}) on {}",
            certificate.id, certificate.recipient, certificate.startup_name, certificate.issued_on
        ),
        None => println!("- No certificate yet"),
    }
}
