use gather_core::{
    error::{FetchError, ValidationError, WriteError},
    model::require,
    notice::NoticeKind,
    Client, Model, Record,
};
use gather_proto::RecordId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::participant::Participant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Participant who created the team
    pub created_by: RecordId,
    #[serde(default)]
    pub looking_for_members: bool,
}

impl Model for Team {
    const TABLE: &'static str = "teams";

    fn validate(&self) -> Result<(), ValidationError> { require("name", &self.name) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub team_id: RecordId,
    pub participant_id: RecordId,
}

impl Model for TeamMember {
    const TABLE: &'static str = "team_members";
}

/// The create-team form
#[derive(Debug, Clone, Default)]
pub struct NewTeam {
    pub name: String,
    pub description: String,
}

#[derive(Error, Debug)]
pub enum TeamError {
    #[error("Please register as a participant first before creating a team.")]
    NotRegistered { email: String },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Create a team led by the registered participant with `creator_email`, and enrol them in it.
/// The outcome is reported once on the client's notifier. Once the team row is stored the call
/// succeeds, even if enrolling the creator fails.
pub async fn create_team(client: &Client, team: NewTeam, creator_email: &str) -> Result<Record<Team>, TeamError> {
    let result = try_create_team(client, team, creator_email).await;
    match &result {
        Ok(team) => {
            info!("created team {} ({})", team.name, team.id);
            client.notify(NoticeKind::Success, &format!("Team Created! {} is now ready to recruit members.", team.name));
        }
        Err(e) => {
            warn!("create_team failed: {}", e);
            client.notify(NoticeKind::Error, &e.to_string());
        }
    }
    result
}

async fn try_create_team(client: &Client, team: NewTeam, creator_email: &str) -> Result<Record<Team>, TeamError> {
    let email = creator_email.trim();
    let creator = client
        .fetch_all::<Participant>()
        .await?
        .into_iter()
        .find(|p| !email.is_empty() && p.email.trim().eq_ignore_ascii_case(email))
        .ok_or_else(|| TeamError::NotRegistered { email: email.to_owned() })?;

    let team =
        client.insert(Team { name: team.name, description: team.description, created_by: creator.id, looking_for_members: true }).await?;
    // the team row is stored; enrolling the creator is best effort
    if let Err(e) = client.insert(TeamMember { team_id: team.id, participant_id: creator.id }).await {
        warn!("team {} created but enrolling its creator {} failed: {}", team.id, creator.id, e);
    }
    Ok(team)
}
