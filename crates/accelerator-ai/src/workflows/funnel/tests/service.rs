use super::common::*;
use std::sync::Arc;

use crate::workflows::content::{Classification, StaticContentService};
use crate::workflows::funnel::repository::FunnelSessionId;
use crate::workflows::funnel::{
    FunnelError, FunnelServiceError, FunnelStage, IdeaInput, PersonalityAnswer,
    PersonalitySubmission, ProjectStage, TechLevel,
};
use crate::workflows::RepositoryError;

fn balanced_answers() -> PersonalitySubmission {
    PersonalitySubmission {
        style: None,
        answers: (1..=4)
            .map(|scenario| PersonalityAnswer {
                scenario,
                option: 2,
            })
            .collect(),
    }
}

#[test]
fn start_issues_sequential_session_ids() {
    let (service, repository, _) = build_service(true);
    let first = service.start().expect("session starts");
    let second = service.start().expect("session starts");

    assert!(first.id.0.starts_with("funnel-"));
    assert_ne!(first.id, second.id);
    assert_eq!(repository.stored(&first.id).controller.stage(), FunnelStage::Welcome);
}

#[test]
fn get_propagates_not_found() {
    let (service, _, _) = build_service(true);
    match service.get(&FunnelSessionId("funnel-missing".to_string())) {
        Err(FunnelServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn guard_errors_are_not_persisted() {
    let (service, repository, _) = build_service(true);
    let id = service.start().expect("session starts").id;

    let mut applicant = profile(ProjectStage::Idea, TechLevel::Low);
    applicant.code_name = String::new();
    match service.submit_profile(&id, applicant) {
        Err(FunnelServiceError::Funnel(FunnelError::Validation(_))) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(matches!(
        service.complete_analytical(&id, 50),
        Err(FunnelServiceError::Funnel(FunnelError::Blocked { .. }))
    ));
    assert_eq!(repository.stored(&id).controller.stage(), FunnelStage::Welcome);

    service.open_admin(&id).expect("admin opens");
    let record = service.close_admin(&id).expect("admin closes");
    assert_eq!(record.controller.stage(), FunnelStage::Welcome);
}

#[tokio::test]
async fn qualified_applicant_walks_into_the_academy() {
    let (service, repository, academy) = build_service(true);
    let id = service.start().expect("session starts").id;

    service
        .submit_profile(&id, profile(ProjectStage::Product, TechLevel::High))
        .expect("profile accepted");
    let record = service
        .submit_personality(&id, balanced_answers())
        .expect("personality accepted");
    assert_eq!(record.controller.leadership_style(), Some("Balanced Leader"));

    let record = service
        .load_analytical_questions(&id)
        .await
        .expect("questions load");
    assert_eq!(record.controller.analytical().questions().len(), 3);
    for option in [1, 1] {
        let (progress, _) = service.answer_analytical(&id, option).expect("answer");
        assert_eq!(progress.score, None);
    }
    let (progress, record) = service.answer_analytical(&id, 1).expect("answer");
    assert_eq!(progress.score, Some(100));
    assert_eq!(record.controller.stage(), FunnelStage::ProjectEvaluation);

    let record = service
        .evaluate_project(&id, IdeaInput::Text("Freight matching for rural farms".to_string()))
        .await
        .expect("evaluation arrives");
    let evaluation = record
        .controller
        .project_evaluation()
        .expect("evaluation recorded");
    assert_eq!(evaluation.classification, Classification::Yellow);
    assert_eq!(evaluation.total_score, 62.0);

    let record = service
        .complete_project_evaluation(&id)
        .expect("assessment runs");
    let result = record.controller.result().expect("result recorded");
    assert_eq!(result.score, 88);
    assert!(result.is_qualified);
    let badges: Vec<&str> = result.badges.iter().map(|badge| badge.id.as_str()).collect();
    assert_eq!(badges, vec!["1", "2", "3"]);

    let record = service
        .continue_from_assessment(&id)
        .expect("assessment continues");
    assert_eq!(record.controller.stage(), FunnelStage::FinalReport);

    let enrolled = service
        .enter_program(&id, Some("Harvest Loop"))
        .expect("program entered");
    assert!(enrolled.id.0.starts_with("academy-"));
    assert_eq!(enrolled.progression.user().startup_name, "Harvest Loop");
    assert_eq!(enrolled.progression.user().industry, "Tech");
    assert_eq!(academy.enrolled(), 1);
    assert_eq!(
        repository.stored(&id).controller.stage(),
        FunnelStage::FinalReport
    );
}

#[tokio::test]
async fn disabled_evaluation_and_restart_for_unqualified_applicants() {
    let (service, repository, academy) = build_service(false);
    let id = service.start().expect("session starts").id;

    service
        .submit_profile(&id, profile(ProjectStage::Idea, TechLevel::Low))
        .expect("profile accepted");
    service
        .submit_personality(
            &id,
            PersonalitySubmission {
                style: Some("Visionary Leader".to_string()),
                answers: Vec::new(),
            },
        )
        .expect("personality accepted");
    let record = service
        .complete_analytical(&id, 40)
        .expect("score accepted");
    assert_eq!(record.controller.stage(), FunnelStage::AssessmentResult);
    assert!(!record.controller.result().expect("scored").is_qualified);

    service
        .continue_from_assessment(&id)
        .expect("assessment continues");
    assert!(matches!(
        service.enter_program(&id, None),
        Err(FunnelServiceError::Funnel(FunnelError::Blocked { .. }))
    ));
    assert_eq!(academy.enrolled(), 0);

    let record = service.restart(&id).expect("restart allowed");
    assert_eq!(record.controller.stage(), FunnelStage::Welcome);
    assert!(repository.stored(&id).controller.profile().is_none());
}

#[tokio::test]
async fn questions_arriving_after_a_direct_score_are_discarded() {
    let repository = Arc::new(MemoryFunnelRepository::default());
    let content = Arc::new(ScoresWhileLoading {
        repository: repository.clone(),
        score: 75,
    });
    let (service, _) = service_over(repository.clone(), content, true);
    let id = service.start().expect("session starts").id;
    service
        .submit_profile(&id, profile(ProjectStage::Prototype, TechLevel::Medium))
        .expect("profile accepted");
    service
        .submit_personality(&id, balanced_answers())
        .expect("personality accepted");

    let record = service
        .load_analytical_questions(&id)
        .await
        .expect("late questions ignored");
    assert_eq!(record.controller.stage(), FunnelStage::ProjectEvaluation);
    assert_eq!(record.controller.analytical_score(), Some(75));
    assert!(!record.controller.analytical().is_loaded());
    assert!(!repository.stored(&id).controller.analytical().is_loaded());
}

#[tokio::test]
async fn out_of_range_evaluations_fall_back_to_the_builtin_result() {
    let repository = Arc::new(MemoryFunnelRepository::default());
    let (service, _) = service_over(repository, Arc::new(InflatedEvaluation), true);
    let id = service.start().expect("session starts").id;
    service
        .submit_profile(&id, profile(ProjectStage::Prototype, TechLevel::Medium))
        .expect("profile accepted");
    service
        .submit_personality(&id, balanced_answers())
        .expect("personality accepted");
    service
        .complete_analytical(&id, 70)
        .expect("score accepted");

    let record = service
        .evaluate_project(&id, IdeaInput::File("deck.pdf".to_string()))
        .await
        .expect("evaluation arrives");
    let evaluation = record
        .controller
        .project_evaluation()
        .expect("evaluation recorded");
    assert_eq!(evaluation.clarity, 15.0);
    assert_eq!(evaluation.classification, Classification::Yellow);
}

#[tokio::test]
async fn interrupted_question_requests_release_their_ticket() {
    let repository = Arc::new(MemoryFunnelRepository::default());
    let (stalled, _) = service_over(repository.clone(), Arc::new(NeverResponds), true);
    let (service, _) = service_over(repository.clone(), Arc::new(StaticContentService), true);
    let id = service.start().expect("session starts").id;
    service
        .submit_profile(&id, profile(ProjectStage::Product, TechLevel::High))
        .expect("profile accepted");
    service
        .submit_personality(&id, balanced_answers())
        .expect("personality accepted");

    tokio::select! {
        biased;
        _ = stalled.load_analytical_questions(&id) => panic!("questions never arrive"),
        _ = std::future::ready(()) => {}
    }
    assert_eq!(repository.stored(&id).controller.pending_request(), None);

    let record = service
        .load_analytical_questions(&id)
        .await
        .expect("request issued again");
    assert!(record.controller.analytical().is_loaded());
}

#[tokio::test]
async fn interrupted_evaluations_can_be_resubmitted() {
    let repository = Arc::new(MemoryFunnelRepository::default());
    let (stalled, _) = service_over(repository.clone(), Arc::new(NeverResponds), true);
    let (service, _) = service_over(repository.clone(), Arc::new(StaticContentService), true);
    let id = service.start().expect("session starts").id;
    service
        .submit_profile(&id, profile(ProjectStage::Product, TechLevel::High))
        .expect("profile accepted");
    service
        .submit_personality(&id, balanced_answers())
        .expect("personality accepted");
    service.complete_analytical(&id, 80).expect("score accepted");

    let idea = || IdeaInput::Text("Cold storage lockers at rural markets".to_string());
    tokio::select! {
        biased;
        _ = stalled.evaluate_project(&id, idea()) => panic!("evaluation never arrives"),
        _ = std::future::ready(()) => {}
    }
    assert_eq!(repository.stored(&id).controller.pending_request(), None);

    let record = service
        .evaluate_project(&id, idea())
        .await
        .expect("idea submitted again");
    assert_eq!(record.controller.stage(), FunnelStage::ProjectEvaluation);
    assert!(record.controller.project_evaluation().is_some());
}
