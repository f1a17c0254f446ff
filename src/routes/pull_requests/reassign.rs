use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{PullRequest, PullRequestId, ReviewAPIError, UserId},
    services::pull_request_lifecycle::reassign_reviewer,
    AppState,
};

#[tracing::instrument(name = "Reassign reviewer route handler", skip_all)]
pub async fn reassign(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<
        Json<ReassignRequest>,
        ReviewAPIError,
    >,
) -> Result<(StatusCode, Json<ReassignResponse>), ReviewAPIError> {
    let pull_request_id = PullRequestId::parse(request.pull_request_id)?;
    let old_reviewer_id = UserId::parse(request.old_reviewer_id)?;

    let (pr, replaced_by) =
        reassign_reviewer(&state, &pull_request_id, &old_reviewer_id).await?;

    Ok((StatusCode::OK, Json(ReassignResponse { pr, replaced_by })))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct ReassignRequest {
    pub pull_request_id: String,
    pub old_reviewer_id: String,
}

#[derive(Debug, Serialize)]
pub struct ReassignResponse {
    pub pr: PullRequest,
    pub replaced_by: UserId,
}
