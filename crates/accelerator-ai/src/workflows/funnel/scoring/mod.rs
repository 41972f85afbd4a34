mod badges;
mod config;
mod rules;

pub use badges::{Badge, BadgeKind, DEVELOPMENT_RECOMMENDATION, QUALIFIED_RECOMMENDATION};
pub use config::ScoringConfig;

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::domain::ApplicantProfile;
use crate::workflows::content::ProjectEvaluationResult;

/// Source of the ethics metric. Production draws one of two values at random;
/// tests pin it.
pub trait EthicsSource: Send + Sync + fmt::Debug {
    fn draw(&self) -> f64;
}

/// Equal-odds draw between a high and a low ethics score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinFlipEthics {
    pub high: f64,
    pub low: f64,
}

impl Default for CoinFlipEthics {
    fn default() -> Self {
        Self {
            high: 90.0,
            low: 70.0,
        }
    }
}

impl EthicsSource for CoinFlipEthics {
    fn draw(&self) -> f64 {
        if rand::thread_rng().gen_bool(0.5) {
            self.high
        } else {
            self.low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedEthics(pub f64);

impl EthicsSource for FixedEthics {
    fn draw(&self) -> f64 {
        self.0
    }
}

/// Signals collected by the funnel before scoring.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInputs<'a> {
    pub profile: &'a ApplicantProfile,
    pub analytical_score: u8,
    pub leadership_style: &'a str,
    pub project_evaluation: Option<&'a ProjectEvaluationResult>,
}

/// The six radar-chart axes of the final report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarMetrics {
    pub readiness: f64,
    pub analysis: f64,
    pub tech: f64,
    pub personality: f64,
    pub strategy: f64,
    pub ethics: f64,
}

impl RadarMetrics {
    pub fn values(&self) -> [f64; 6] {
        [
            self.readiness,
            self.analysis,
            self.tech,
            self.personality,
            self.strategy,
            self.ethics,
        ]
    }
}

/// Terminal artifact of a funnel pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalResult {
    pub score: u8,
    pub leadership_style: String,
    pub metrics: RadarMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_eval: Option<ProjectEvaluationResult>,
    pub is_qualified: bool,
    pub badges: Vec<Badge>,
    pub recommendation: String,
}

/// Applies [`ScoringConfig`] to the collected signals.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
    ethics: Arc<dyn EthicsSource>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default(), Arc::new(CoinFlipEthics::default()))
    }
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig, ethics: Arc<dyn EthicsSource>) -> Self {
        Self { config, ethics }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score with a freshly drawn ethics value.
    pub fn score(&self, inputs: ScoringInputs<'_>) -> FinalResult {
        self.score_with_ethics(inputs, self.ethics.draw())
    }

    /// Deterministic core: identical inputs and ethics value give an
    /// identical result.
    pub fn score_with_ethics(&self, inputs: ScoringInputs<'_>, ethics: f64) -> FinalResult {
        let (metrics, signals) = rules::derive_metrics(&inputs, &self.config, ethics);
        let score = rules::total_score(&metrics);
        let is_qualified = rules::is_qualified(score, inputs.project_evaluation, &self.config);
        let badges = badges::award(
            inputs.leadership_style,
            &signals,
            inputs.project_evaluation,
            &self.config,
        );

        FinalResult {
            score,
            leadership_style: inputs.leadership_style.to_string(),
            metrics,
            project_eval: inputs.project_evaluation.cloned(),
            is_qualified,
            badges,
            recommendation: badges::recommendation(is_qualified).to_string(),
        }
    }
}
