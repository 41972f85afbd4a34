use super::config::ScoringConfig;
use super::{RadarMetrics, ScoringInputs};
use crate::workflows::content::{Classification, ProjectEvaluationResult};

pub(crate) struct MetricSignals {
    pub tech_base: f64,
    pub ethics: f64,
}

pub(crate) fn derive_metrics(
    inputs: &ScoringInputs<'_>,
    config: &ScoringConfig,
    ethics: f64,
) -> (RadarMetrics, MetricSignals) {
    let tech_base = config.tech_base(inputs.profile.tech_level);
    let readiness_base = config.readiness_base(inputs.profile.project_stage);
    let analysis = f64::from(inputs.analytical_score);

    let (strategy, readiness) = match inputs.project_evaluation {
        Some(evaluation) => (
            (analysis + evaluation.clarity * config.evaluation_axis_weight) / 2.0,
            (readiness_base + evaluation.readiness * config.evaluation_axis_weight) / 2.0,
        ),
        None => ((readiness_base + analysis) / 2.0, readiness_base),
    };

    let metrics = RadarMetrics {
        readiness,
        analysis,
        tech: tech_base,
        personality: config.personality,
        strategy,
        ethics,
    };

    (metrics, MetricSignals { tech_base, ethics })
}

/// Rounded mean of the six metrics, halves rounding up.
pub(crate) fn total_score(metrics: &RadarMetrics) -> u8 {
    let values = metrics.values();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (mean + 0.5).floor().clamp(0.0, 100.0) as u8
}

pub(crate) fn is_qualified(
    score: u8,
    evaluation: Option<&ProjectEvaluationResult>,
    config: &ScoringConfig,
) -> bool {
    let not_red = evaluation
        .map(|result| result.classification != Classification::Red)
        .unwrap_or(true);
    score >= config.qualification_threshold && not_red
}
