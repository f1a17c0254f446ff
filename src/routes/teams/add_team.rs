use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        ReviewAPIError, TeamName, TeamRoster, User, UserId, Username,
        ValidationError,
    },
    services::membership_registry::create_team,
    AppState,
};

#[tracing::instrument(name = "Add team route handler", skip_all)]
pub async fn add_team(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<
        Json<TeamRequest>,
        ReviewAPIError,
    >,
) -> Result<(StatusCode, Json<TeamResponse>), ReviewAPIError> {
    let team_name = TeamName::parse(request.team_name)?;
    let members = parse_members(request.members)?;

    let team = create_team(&state, team_name, members).await?;

    Ok((StatusCode::CREATED, Json(TeamResponse { team })))
}

pub(super) fn parse_members(
    members: Vec<TeamMemberRequest>,
) -> Result<Vec<User>, ValidationError> {
    members
        .into_iter()
        .map(|member| {
            Ok(User::new(
                UserId::parse(member.user_id)?,
                Username::parse(member.username)?,
                member.is_active,
            ))
        })
        .collect()
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct TeamRequest {
    pub team_name: String,
    pub members: Vec<TeamMemberRequest>,
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct TeamMemberRequest {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub team: TeamRoster,
}
