use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{PullRequestShort, ReviewAPIError, UserId},
    services::pull_request_lifecycle::get_reviews_for_user,
    AppState,
};

#[derive(Deserialize)]
pub struct UserQueryParams {
    pub user_id: String,
}

#[tracing::instrument(name = "Get review list route handler", skip_all)]
pub async fn get_review(
    State(state): State<AppState>,
    WithRejection(query_params, _): WithRejection<
        Query<UserQueryParams>,
        ReviewAPIError,
    >,
) -> Result<(StatusCode, Json<GetReviewResponse>), ReviewAPIError> {
    let Query(UserQueryParams { user_id }) = query_params;
    let user_id = UserId::parse(user_id)?;

    let pull_requests = get_reviews_for_user(&state, &user_id).await?;

    Ok((
        StatusCode::OK,
        Json(GetReviewResponse {
            user_id,
            pull_requests,
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct GetReviewResponse {
    pub user_id: UserId,
    pub pull_requests: Vec<PullRequestShort>,
}
