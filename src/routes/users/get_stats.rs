use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use super::UserQueryParams;
use crate::{
    domain::{ReviewAPIError, UserId, UserPrStats},
    services::statistics::get_user_pr_stats,
    AppState,
};

#[tracing::instrument(name = "Get user stats route handler", skip_all)]
pub async fn get_stats(
    State(state): State<AppState>,
    WithRejection(query_params, _): WithRejection<
        Query<UserQueryParams>,
        ReviewAPIError,
    >,
) -> Result<(StatusCode, Json<UserPrStats>), ReviewAPIError> {
    let Query(UserQueryParams { user_id }) = query_params;
    let user_id = UserId::parse(user_id)?;

    let stats = get_user_pr_stats(&state, &user_id).await?;

    Ok((StatusCode::OK, Json(stats)))
}
