use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{ReviewAPIError, TeamName, UserId, Username},
    services::reviewer_pool::set_user_active,
    AppState,
};

#[tracing::instrument(name = "Set user active route handler", skip_all)]
pub async fn set_is_active(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<
        Json<SetIsActiveRequest>,
        ReviewAPIError,
    >,
) -> Result<(StatusCode, Json<SetIsActiveResponse>), ReviewAPIError> {
    let user_id = UserId::parse(request.user_id)?;

    let (user, team_name) =
        set_user_active(&state, &user_id, request.is_active).await?;

    let response = Json(SetIsActiveResponse {
        user: UserSummary {
            user_id: user.user_id,
            username: user.username,
            team_name,
            is_active: user.is_active,
        },
    });

    Ok((StatusCode::OK, response))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct SetIsActiveRequest {
    pub user_id: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct SetIsActiveResponse {
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub user_id: UserId,
    pub username: Username,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<TeamName>,
    pub is_active: bool,
}
