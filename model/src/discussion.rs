use gather_core::{
    error::ValidationError,
    model::{require, require_email},
    selection::{Faceted, Searchable, Sortable},
    Model,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum DiscussionCategory {
    #[serde(rename = "Team Formation")]
    #[strum(serialize = "Team Formation")]
    TeamFormation,
    #[default]
    #[serde(rename = "Tech Q&A")]
    #[strum(serialize = "Tech Q&A")]
    TechQa,
    Rules,
    Logistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discussion {
    pub title: String,
    pub content: String,
    pub author_name: String,
    pub author_email: String,
    #[serde(default)]
    pub category: DiscussionCategory,
    #[serde(default)]
    pub replies: i64,
    #[serde(default)]
    pub likes: i64,
}

impl Discussion {
    pub fn new(category: DiscussionCategory, title: impl Into<String>, content: impl Into<String>, author_name: impl Into<String>, author_email: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author_name: author_name.into(),
            author_email: author_email.into(),
            category,
            replies: 0,
            likes: 0,
        }
    }
}

impl Model for Discussion {
    const TABLE: &'static str = "discussions";

    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("content", &self.content)?;
        require("author_name", &self.author_name)?;
        require_email("author_email", &self.author_email)
    }
}

impl Searchable for Discussion {
    fn search_fields(&self) -> Vec<&str> { vec![self.title.as_str(), self.content.as_str(), self.author_name.as_str()] }
}

impl Faceted for Discussion {
    type Facet = DiscussionCategory;

    fn matches_facet(&self, facet: &DiscussionCategory) -> bool { self.category == *facet }
}

impl Sortable for Discussion {
    fn likes(&self) -> Option<i64> { Some(self.likes) }

    fn title(&self) -> Option<&str> { Some(self.title.as_str()) }
}
