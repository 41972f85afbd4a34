use serde::{Deserialize, Serialize};

pub const DEFAULT_INDUSTRY: &str = "Technology";

/// Industry choices offered by the registration form.
pub const INDUSTRIES: [&str; 16] = [
    "Technology",
    "E-commerce",
    "Health",
    "Education",
    "Food",
    "Services",
    "RealEstate",
    "Finance",
    "Tourism",
    "Agriculture",
    "Manufacturing",
    "Media",
    "Logistics",
    "Energy",
    "Fashion",
    "Other",
];

/// Program identity of an entrepreneur, fixed once the program starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub startup_name: String,
    pub startup_description: String,
    pub industry: String,
}

/// Standalone registration form used when entering the program directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub name: String,
    pub startup_name: String,
    pub startup_description: String,
    #[serde(default)]
    pub industry: Option<String>,
}

impl RegistrationForm {
    pub fn into_profile(self) -> Result<UserProfile, String> {
        let required = [
            ("name", &self.name),
            ("startup name", &self.startup_name),
            ("startup description", &self.startup_description),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(format!("{field} must not be empty"));
        }

        let industry = self
            .industry
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_INDUSTRY.to_string());

        Ok(UserProfile {
            name: self.name.trim().to_string(),
            startup_name: self.startup_name.trim().to_string(),
            startup_description: self.startup_description.trim().to_string(),
            industry,
        })
    }
}

/// Static description of one curriculum level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub title: String,
    pub description: String,
}

/// Runtime state of a curriculum level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub is_locked: bool,
}

pub fn standard_curriculum() -> Vec<LevelDefinition> {
    [
        (
            "Idea Validation",
            "Make sure your idea solves a real problem and is worth investing in.",
        ),
        (
            "Business Model",
            "Build a clear business plan that defines revenue streams and distribution channels.",
        ),
        (
            "Market & Competitor Analysis",
            "Understand the market size, who your competitors are, and how to beat them.",
        ),
        (
            "Minimum Viable Product",
            "Define the core features of your product to launch at the lowest cost.",
        ),
        (
            "Financial Plan",
            "Forecast costs and revenue and calculate the break-even point.",
        ),
        (
            "Investor Pitch",
            "Prepare a convincing pitch to attract investors.",
        ),
    ]
    .into_iter()
    .map(|(title, description)| LevelDefinition {
        title: title.to_string(),
        description: description.to_string(),
    })
    .collect()
}
