use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use super::PullRequestResponse;
use crate::{
    domain::{PullRequestId, ReviewAPIError},
    services::pull_request_lifecycle::merge_pull_request,
    AppState,
};

#[tracing::instrument(name = "Merge pull request route handler", skip_all)]
pub async fn merge(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<
        Json<MergePullRequestRequest>,
        ReviewAPIError,
    >,
) -> Result<(StatusCode, Json<PullRequestResponse>), ReviewAPIError> {
    let pull_request_id = PullRequestId::parse(request.pull_request_id)?;

    let pr = merge_pull_request(&state, &pull_request_id).await?;

    Ok((StatusCode::OK, Json(PullRequestResponse { pr })))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct MergePullRequestRequest {
    pub pull_request_id: String,
}
