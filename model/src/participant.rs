use gather_core::{
    error::ValidationError,
    model::{require, require_email},
    selection::{Faceted, Searchable, Sortable},
    Model,
};
use serde::{Deserialize, Serialize};

use crate::optional;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub motivation: Option<String>,
    #[serde(default)]
    pub avatar_emoji: Option<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: role.into(),
            skills: Vec::new(),
            team_name: None,
            github_url: None,
            linkedin_url: None,
            portfolio_url: None,
            motivation: None,
            avatar_emoji: None,
        }
    }

    /// Comma-separated form input to a skill list
    pub fn parse_skills(input: &str) -> Vec<String> { input.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect() }

    pub fn with_skills(mut self, input: &str) -> Self {
        self.skills = Self::parse_skills(input);
        self
    }

    /// Optional registration form fields. Blank entries are stored as `None`.
    pub fn with_profile(mut self, team_name: &str, github: &str, linkedin: &str, portfolio: &str, motivation: &str) -> Self {
        self.team_name = optional(team_name);
        self.github_url = optional(github);
        self.linkedin_url = optional(linkedin);
        self.portfolio_url = optional(portfolio);
        self.motivation = optional(motivation);
        self
    }
}

impl Model for Participant {
    const TABLE: &'static str = "participants";

    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require_email("email", &self.email)?;
        require("role", &self.role)
    }
}

impl Searchable for Participant {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.role.as_str()];
        fields.extend(self.skills.iter().map(String::as_str));
        fields
    }
}

/// Role filter chips on the participants list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum RoleGroup {
    Engineers,
    Designers,
    #[strum(serialize = "PM/BA")]
    PmBa,
    #[strum(serialize = "AI/Data")]
    AiData,
}

impl Faceted for Participant {
    type Facet = RoleGroup;

    fn matches_facet(&self, facet: &RoleGroup) -> bool {
        let role = self.role.as_str();
        match facet {
            RoleGroup::Engineers => role.contains("Engineer"),
            RoleGroup::Designers => role.contains("Designer"),
            RoleGroup::PmBa => role.contains("Product"),
            RoleGroup::AiData => role.contains("AI") || role.contains("Data"),
        }
    }
}

impl Sortable for Participant {
    fn title(&self) -> Option<&str> { Some(self.name.as_str()) }
}
