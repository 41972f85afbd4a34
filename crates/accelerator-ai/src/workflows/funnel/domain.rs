use serde::{Deserialize, Serialize};

use crate::workflows::academy::domain::UserProfile;

/// Sector choices offered by the intake form. Any non-empty string is accepted.
pub const SECTORS: [&str; 4] = ["Tech", "Marketing", "Services", "Industrial"];

/// Startup name given to program entrants who did not supply one.
pub const PLACEHOLDER_STARTUP_NAME: &str = "My Startup";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStage {
    Idea,
    Prototype,
    Product,
}

impl ProjectStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idea => "Idea",
            Self::Prototype => "Prototype",
            Self::Product => "Product",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TechLevel {
    Low,
    Medium,
    High,
}

impl TechLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Intake answers for one funnel run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub code_name: String,
    pub project_stage: ProjectStage,
    pub sector: String,
    #[serde(default)]
    pub goal: String,
    pub tech_level: TechLevel,
}

impl ApplicantProfile {
    /// Returns the reason the profile cannot be submitted, if any.
    pub fn rejection(&self) -> Option<&'static str> {
        if self.code_name.trim().is_empty() {
            return Some("code name must not be empty");
        }
        if self.sector.trim().is_empty() {
            return Some("sector must not be empty");
        }
        None
    }

    /// Program identity derived from the intake answers.
    pub fn to_user_profile(&self, startup_name: Option<&str>) -> UserProfile {
        let startup_name = startup_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(PLACEHOLDER_STARTUP_NAME);

        UserProfile {
            name: self.code_name.trim().to_string(),
            startup_name: startup_name.to_string(),
            startup_description: self.goal.clone(),
            industry: self.sector.clone(),
        }
    }

    /// One-line stand-in for an uploaded pitch document.
    pub fn file_summary(&self, file_name: &str) -> String {
        format!(
            "A project in the {sector} sector at the {stage} stage. (Detailed file \"{file_name}\" uploaded for analysis.)",
            stage = self.project_stage.as_str(),
            sector = self.sector,
        )
    }
}
