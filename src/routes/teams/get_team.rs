use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use super::TeamResponse;
use crate::{
    domain::{ReviewAPIError, TeamName},
    services::membership_registry,
    AppState,
};

#[derive(Deserialize)]
pub struct QueryParams {
    team_name: String,
}

#[tracing::instrument(name = "Get team route handler", skip_all)]
pub async fn get_team(
    State(state): State<AppState>,
    WithRejection(query_params, _): WithRejection<
        Query<QueryParams>,
        ReviewAPIError,
    >,
) -> Result<(StatusCode, Json<TeamResponse>), ReviewAPIError> {
    let Query(QueryParams { team_name }) = query_params;
    let team_name = TeamName::parse(team_name)?;
    tracing::debug!("team_name: {}", team_name.as_ref());

    let team = membership_registry::get_team(&state, &team_name).await?;

    Ok((StatusCode::OK, Json(TeamResponse { team })))
}
