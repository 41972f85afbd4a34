use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{
    AnalyticalQuestion, ExerciseReview, LevelMaterial, ProjectEvaluationResult, QuizQuestion,
};
use super::{prompts, ContentError, ContentService, LevelRef};
use crate::config::ContentConfig;
use crate::workflows::academy::domain::UserProfile;
use crate::workflows::funnel::domain::ApplicantProfile;

/// [`ContentService`] backed by the Gemini `generateContent` REST endpoint in
/// JSON response mode.
#[derive(Debug, Clone)]
pub struct GeminiContentService {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiContentService {
    /// Build a client from configuration; `None` when no API key is set.
    pub fn from_config(config: &ContentConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self::new(
            reqwest::Client::new(),
            &config.base_url,
            &config.model,
            api_key,
        ))
    }

    pub fn new(client: reqwest::Client, base_url: &str, model: &str, api_key: String) -> Self {
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        );
        Self {
            client,
            endpoint,
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn generate<T: DeserializeOwned>(&self, prompt: String) -> Result<T, ContentError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateRequest::json_prompt(prompt))
            .send()
            .await
            .map_err(|err| ContentError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response
            .json::<GenerateResponse>()
            .await
            .map_err(|err| ContentError::Decode(err.to_string()))?;
        let text = payload.first_text().ok_or(ContentError::Empty)?;
        debug!(bytes = text.len(), "gemini response received");

        decode_payload(text)
    }
}

#[async_trait]
impl ContentService for GeminiContentService {
    async fn analytical_questions(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<Vec<AnalyticalQuestion>, ContentError> {
        self.generate(prompts::analytical_questions(profile)).await
    }

    async fn evaluate_project(
        &self,
        idea: &str,
        profile: &ApplicantProfile,
    ) -> Result<ProjectEvaluationResult, ContentError> {
        self.generate(prompts::evaluate_project(idea, profile)).await
    }

    async fn level_material(
        &self,
        level: LevelRef<'_>,
        user: &UserProfile,
    ) -> Result<LevelMaterial, ContentError> {
        self.generate(prompts::level_material(level, user)).await
    }

    async fn level_quiz(
        &self,
        level: LevelRef<'_>,
        user: &UserProfile,
    ) -> Result<Vec<QuizQuestion>, ContentError> {
        self.generate(prompts::level_quiz(level, user)).await
    }

    async fn review_exercise(
        &self,
        exercise: &str,
        answer: &str,
    ) -> Result<ExerciseReview, ContentError> {
        self.generate(prompts::review_exercise(exercise, answer))
            .await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

impl GenerateRequest {
    fn json_prompt(prompt: String) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .map(|part| part.text.trim())
            .find(|text| !text.is_empty())
    }
}

/// Strip an optional markdown code fence and decode the JSON body.
fn decode_payload<T: DeserializeOwned>(text: &str) -> Result<T, ContentError> {
    let trimmed = text.trim();
    let body = match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    };
    serde_json::from_str(body).map_err(|err| ContentError::Decode(err.to_string()))
}
