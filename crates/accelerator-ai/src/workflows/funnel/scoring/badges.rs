use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;
use super::rules::MetricSignals;
use crate::workflows::content::{Classification, ProjectEvaluationResult};

pub const QUALIFIED_RECOMMENDATION: &str = "Based on strong performance on the analytical and \
    readiness axes, we recommend admitting the project to the accelerated growth track.";

pub const DEVELOPMENT_RECOMMENDATION: &str = "The project is promising but needs more maturity \
    on the analytical and technical side before entering an intensive investment cycle.";

/// Achievement shown on the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    BalancedLeadership,
    EthicalLeader,
    TechMindset,
    IncubationReady,
}

impl BadgeKind {
    pub const fn id(self) -> &'static str {
        match self {
            Self::BalancedLeadership => "1",
            Self::EthicalLeader => "2",
            Self::TechMindset => "3",
            Self::IncubationReady => "4",
        }
    }

    pub fn badge(self) -> Badge {
        let (name, icon, color) = match self {
            Self::BalancedLeadership => ("Balanced Leadership", "⚖️", "blue"),
            Self::EthicalLeader => ("Ethical Leader", "🌿", "green"),
            Self::TechMindset => ("Tech Mindset", "💻", "indigo"),
            Self::IncubationReady => ("Incubation Ready", "🚀", "emerald"),
        };
        Badge {
            id: self.id().to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }
}

pub(crate) fn award(
    leadership_style: &str,
    signals: &MetricSignals,
    evaluation: Option<&ProjectEvaluationResult>,
    config: &ScoringConfig,
) -> Vec<Badge> {
    let mut earned = Vec::new();
    if leadership_style.contains("Balanced") {
        earned.push(BadgeKind::BalancedLeadership);
    }
    if signals.ethics > config.ethical_badge_above {
        earned.push(BadgeKind::EthicalLeader);
    }
    if signals.tech_base > config.tech_badge_above {
        earned.push(BadgeKind::TechMindset);
    }
    if evaluation.is_some_and(|result| result.classification == Classification::Green) {
        earned.push(BadgeKind::IncubationReady);
    }
    earned.into_iter().map(BadgeKind::badge).collect()
}

pub(crate) fn recommendation(qualified: bool) -> &'static str {
    if qualified {
        QUALIFIED_RECOMMENDATION
    } else {
        DEVELOPMENT_RECOMMENDATION
    }
}
