use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadershipStyle {
    Visionary,
    Operational,
    Balanced,
}

impl LeadershipStyle {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visionary => "Visionary",
            Self::Operational => "Operational",
            Self::Balanced => "Balanced",
        }
    }

    /// Display string carried into scoring, e.g. `"Balanced Leader"`.
    pub fn leader_label(self) -> String {
        format!("{} Leader", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioOption {
    pub text: &'static str,
    pub style: LeadershipStyle,
}

/// A workplace situation with one answer per leadership style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonalityScenario {
    pub id: u32,
    pub situation: &'static str,
    pub options: Vec<ScenarioOption>,
}

fn scenario(
    id: u32,
    situation: &'static str,
    options: [(&'static str, LeadershipStyle); 3],
) -> PersonalityScenario {
    PersonalityScenario {
        id,
        situation,
        options: options
            .into_iter()
            .map(|(text, style)| ScenarioOption { text, style })
            .collect(),
    }
}

pub fn standard_scenarios() -> Vec<PersonalityScenario> {
    use LeadershipStyle::{Balanced, Operational, Visionary};

    vec![
        scenario(
            1,
            "A key customer asks for a feature that does not fit the roadmap.",
            [
                ("Explain the long-term vision and hold the roadmap", Visionary),
                ("Ship a quick workaround this sprint", Operational),
                ("Weigh the deal size against the roadmap before deciding", Balanced),
            ],
        ),
        scenario(
            2,
            "Two senior team members disagree on the product direction.",
            [
                ("Decide based on where the market will be in five years", Visionary),
                ("Pick the option that can be delivered fastest", Operational),
                ("Run a short experiment and let the data decide", Balanced),
            ],
        ),
        scenario(
            3,
            "Revenue is behind plan at the end of the quarter.",
            [
                ("Pitch a bolder positioning to new investors", Visionary),
                ("Cut costs and tighten the sales pipeline", Operational),
                ("Review unit economics before changing course", Balanced),
            ],
        ),
        scenario(
            4,
            "A competitor launches a similar product.",
            [
                ("Leapfrog them with a new category", Visionary),
                ("Match their features as quickly as possible", Operational),
                ("Talk to customers to find where you still win", Balanced),
            ],
        ),
    ]
}

/// Tally of scenario answers. The winning style is the single most chosen
/// one; any tie for first place resolves to [`LeadershipStyle::Balanced`].
#[derive(Debug, Clone)]
pub struct PersonalityTest {
    scenarios: Vec<PersonalityScenario>,
    answers: Vec<Option<LeadershipStyle>>,
}

impl Default for PersonalityTest {
    fn default() -> Self {
        Self::new(standard_scenarios())
    }
}

impl PersonalityTest {
    pub fn new(scenarios: Vec<PersonalityScenario>) -> Self {
        let answers = vec![None; scenarios.len()];
        Self { scenarios, answers }
    }

    pub fn scenarios(&self) -> &[PersonalityScenario] {
        &self.scenarios
    }

    /// Record the chosen option for a scenario. Re-answering replaces the
    /// previous choice.
    pub fn answer(&mut self, scenario_id: u32, option: usize) -> Result<(), String> {
        let index = self
            .scenarios
            .iter()
            .position(|scenario| scenario.id == scenario_id)
            .ok_or_else(|| format!("unknown scenario {scenario_id}"))?;
        let style = self.scenarios[index]
            .options
            .get(option)
            .map(|choice| choice.style)
            .ok_or_else(|| format!("scenario {scenario_id} has no option {option}"))?;
        self.answers[index] = Some(style);
        Ok(())
    }

    pub fn answered(&self) -> usize {
        self.answers.iter().flatten().count()
    }

    pub fn is_complete(&self) -> bool {
        !self.answers.is_empty() && self.answers.iter().all(Option::is_some)
    }

    /// Winning style label once every scenario is answered.
    pub fn outcome(&self) -> Option<String> {
        if !self.is_complete() {
            return None;
        }
        Some(dominant_style(self.answers.iter().flatten().copied()).leader_label())
    }

    pub fn reset(&mut self) {
        self.answers.iter_mut().for_each(|answer| *answer = None);
    }
}

fn dominant_style(choices: impl Iterator<Item = LeadershipStyle>) -> LeadershipStyle {
    let mut counts = [
        (LeadershipStyle::Visionary, 0usize),
        (LeadershipStyle::Operational, 0),
        (LeadershipStyle::Balanced, 0),
    ];
    for choice in choices {
        if let Some(entry) = counts.iter_mut().find(|(style, _)| *style == choice) {
            entry.1 += 1;
        }
    }

    let top = counts.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let mut leaders = counts.iter().filter(|(_, count)| *count == top);
    match (leaders.next(), leaders.next()) {
        (Some((style, _)), None) => *style,
        _ => LeadershipStyle::Balanced,
    }
}
