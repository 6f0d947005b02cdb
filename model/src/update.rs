use gather_core::{
    error::ValidationError,
    model::require,
    selection::{Faceted, Searchable, Sortable},
    Model,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UpdateKind {
    #[default]
    Announcement,
    Deadline,
    Event,
    News,
}

/// An organizer post on the updates feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub title: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: UpdateKind,
}

impl Update {
    pub fn new(kind: UpdateKind, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into(), kind }
    }
}

impl Model for Update {
    const TABLE: &'static str = "updates";

    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("content", &self.content)
    }
}

impl Searchable for Update {
    fn search_fields(&self) -> Vec<&str> { vec![self.title.as_str(), self.content.as_str()] }
}

impl Faceted for Update {
    type Facet = UpdateKind;

    fn matches_facet(&self, facet: &UpdateKind) -> bool { self.kind == *facet }
}

impl Sortable for Update {
    fn title(&self) -> Option<&str> { Some(self.title.as_str()) }
}
