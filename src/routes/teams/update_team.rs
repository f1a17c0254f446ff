use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;

use super::{add_team::parse_members, TeamRequest, TeamResponse};
use crate::{
    domain::{ReviewAPIError, TeamName},
    services::membership_registry,
    AppState,
};

#[tracing::instrument(name = "Update team route handler", skip_all)]
pub async fn update_team(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<
        Json<TeamRequest>,
        ReviewAPIError,
    >,
) -> Result<(StatusCode, Json<TeamResponse>), ReviewAPIError> {
    let team_name = TeamName::parse(request.team_name)?;
    let members = parse_members(request.members)?;

    let team =
        membership_registry::update_team(&state, team_name, members).await?;

    Ok((StatusCode::OK, Json(TeamResponse { team })))
}
