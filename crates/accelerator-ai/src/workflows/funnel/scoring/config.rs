use serde::{Deserialize, Serialize};

use super::super::domain::{ProjectStage, TechLevel};

/// Constants of the qualification rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub tech_high: f64,
    pub tech_medium: f64,
    pub tech_low: f64,
    pub readiness_product: f64,
    pub readiness_prototype: f64,
    pub readiness_idea: f64,
    pub personality: f64,
    /// Multiplier lifting a 0-20 evaluation axis onto the 0-100 metric scale.
    pub evaluation_axis_weight: f64,
    pub qualification_threshold: u8,
    pub ethical_badge_above: f64,
    pub tech_badge_above: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tech_high: 90.0,
            tech_medium: 70.0,
            tech_low: 40.0,
            readiness_product: 95.0,
            readiness_prototype: 75.0,
            readiness_idea: 50.0,
            personality: 85.0,
            evaluation_axis_weight: 5.0,
            qualification_threshold: 70,
            ethical_badge_above: 85.0,
            tech_badge_above: 80.0,
        }
    }
}

impl ScoringConfig {
    pub fn tech_base(&self, level: TechLevel) -> f64 {
        match level {
            TechLevel::High => self.tech_high,
            TechLevel::Medium => self.tech_medium,
            TechLevel::Low => self.tech_low,
        }
    }

    pub fn readiness_base(&self, stage: ProjectStage) -> f64 {
        match stage {
            ProjectStage::Product => self.readiness_product,
            ProjectStage::Prototype => self.readiness_prototype,
            ProjectStage::Idea => self.readiness_idea,
        }
    }
}
