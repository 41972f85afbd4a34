use super::LevelRef;
use crate::workflows::academy::domain::UserProfile;
use crate::workflows::funnel::domain::ApplicantProfile;

pub(super) fn analytical_questions(profile: &ApplicantProfile) -> String {
    format!(
        "Create 5 analytical and business-intelligence questions to assess an entrepreneur \
         applying to a startup accelerator.\n\n\
         Applicant:\n- Sector: {sector}\n- Project stage: {stage}\n- Tech level: {tech}\n\n\
         Requirements:\n\
         1. Questions increase in difficulty.\n\
         2. Mix simple unit-economics calculations, management scenarios, and technical logic.\n\
         3. Reply with a strict JSON array of objects with the fields \
         id (number), text, type (\"choice\" | \"analysis\" | \"math\"), \
         difficulty (\"Easy\" | \"Medium\" | \"Hard\"), options (exactly 4 strings), \
         correctIndex (0-3).",
        sector = profile.sector,
        stage = profile.project_stage.as_str(),
        tech = profile.tech_level.as_str(),
    )
}

pub(super) fn evaluate_project(idea: &str, profile: &ApplicantProfile) -> String {
    format!(
        "You are a project evaluation expert at a startup accelerator. Analyse the project idea \
         below on 5 axes.\n\n\
         Project:\n- Sector: {sector}\n- Stage: {stage}\n- Idea: \"{idea}\"\n\n\
         Score each axis from 0 to 20: clarity (problem and solution), value (customer benefit), \
         innovation (differentiation), market (market viability and size), readiness \
         (execution readiness). Give a totalScore out of 100, a short helpful aiOpinion, and a \
         classification: Green (ready for incubation), Yellow (needs development) or Red \
         (unclear).\n\n\
         Reply with a JSON object with the fields clarity, value, innovation, market, readiness, \
         totalScore, aiOpinion, classification.",
        sector = profile.sector,
        stage = profile.project_stage.as_str(),
    )
}

pub(super) fn level_material(level: LevelRef<'_>, user: &UserProfile) -> String {
    format!(
        "You are a smart business mentor. Write the learning material for level {id}: \
         \"{title}\" for an entrepreneur.\n\n\
         Project:\n- Name: {startup}\n- Description: {description}\n- Industry: {industry}\n\n\
         Provide:\n\
         1. content: rich explanatory text (about 300 words) with examples that fit the industry.\n\
         2. exercise: one practical question asking the founder to apply the level to their own \
         project.\n\n\
         Reply with a JSON object with the fields content and exercise.",
        id = level.id,
        title = level.title,
        startup = user.startup_name,
        description = user.startup_description,
        industry = user.industry,
    )
}

pub(super) fn level_quiz(level: LevelRef<'_>, user: &UserProfile) -> String {
    format!(
        "Create a short quiz (3 questions) for level {id}: \"{title}\". Questions should fit \
         entrepreneurship in the {industry} sector.\n\n\
         Reply with a JSON array of objects with the fields id, text, options (exactly 4 \
         strings), correctIndex (0-3), explanation.",
        id = level.id,
        title = level.title,
        industry = user.industry,
    )
}

pub(super) fn review_exercise(exercise: &str, answer: &str) -> String {
    format!(
        "You are an expert business reviewer.\n\
         Exercise: \"{exercise}\"\n\
         Founder's answer: \"{answer}\"\n\n\
         Is the answer acceptable and does it show good understanding? Give constructive, \
         encouraging feedback.\n\n\
         Reply with a JSON object with the fields passed (boolean) and feedback."
    )
}
