use gather_core::{
    error::ValidationError,
    model::require,
    selection::{Faceted, Searchable, Sortable},
    Model,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub team_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub learnings: String,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub presentation_url: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub judges_pick: bool,
}

impl Project {
    pub fn new(title: impl Into<String>, team_name: impl Into<String>) -> Self {
        Self { title: title.into(), team_name: team_name.into(), ..Default::default() }
    }

    pub fn tagged(mut self, tag: ProjectTag) -> Self {
        self.toggle_tag(tag);
        self
    }

    /// Add the tag, or remove it if already present
    pub fn toggle_tag(&mut self, tag: ProjectTag) {
        let tag: &str = tag.into();
        match self.tags.iter().position(|t| t == tag) {
            Some(index) => {
                self.tags.remove(index);
            }
            None => self.tags.push(tag.to_owned()),
        }
    }

    /// Add a technology unless it is blank or already listed
    pub fn add_tech(&mut self, tech: &str) -> bool {
        let tech = tech.trim();
        if tech.is_empty() || self.tech_stack.iter().any(|t| t == tech) {
            return false;
        }
        self.tech_stack.push(tech.to_owned());
        true
    }
}

impl Model for Project {
    const TABLE: &'static str = "projects";

    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("team_name", &self.team_name)
    }
}

impl Searchable for Project {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.team_name.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::IntoStaticStr)]
pub enum ProjectTag {
    #[strum(serialize = "AI/ML")]
    AiMl,
    Web,
    Mobile,
    Cloud,
    Automation,
    #[strum(serialize = "Data/Analytics")]
    DataAnalytics,
    DevTools,
    HealthTech,
    FinTech,
    Sustainability,
    #[strum(serialize = "Open Source")]
    OpenSource,
}

impl Faceted for Project {
    type Facet = ProjectTag;

    fn matches_facet(&self, facet: &ProjectTag) -> bool {
        let facet: &str = (*facet).into();
        self.tags.iter().any(|t| t == facet)
    }
}

impl Sortable for Project {
    fn likes(&self) -> Option<i64> { Some(self.likes) }

    fn judges_pick(&self) -> bool { self.judges_pick }

    fn title(&self) -> Option<&str> { Some(self.title.as_str()) }
}
