//! Schemas for the event site's tables, with the search fields, facets and sort keys their list
//! views use.

pub mod discussion;
pub mod participant;
pub mod project;
pub mod team;
pub mod update;

pub use discussion::{Discussion, DiscussionCategory};
pub use participant::{Participant, RoleGroup};
pub use project::{Project, ProjectTag};
pub use team::{create_team, NewTeam, Team, TeamError, TeamMember};
pub use update::{Update, UpdateKind};

/// Blank optional form fields are stored as null
pub fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}
