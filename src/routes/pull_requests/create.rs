use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        PullRequest, PullRequestId, PullRequestName, ReviewAPIError, UserId,
    },
    services::pull_request_lifecycle::create_pull_request,
    AppState,
};

#[tracing::instrument(name = "Create pull request route handler", skip_all)]
pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<
        Json<CreatePullRequestRequest>,
        ReviewAPIError,
    >,
) -> Result<(StatusCode, Json<PullRequestResponse>), ReviewAPIError> {
    let pull_request_id = PullRequestId::parse(request.pull_request_id)?;
    let pull_request_name = PullRequestName::parse(request.pull_request_name)?;
    let author_id = UserId::parse(request.author_id)?;

    let pr = create_pull_request(
        &state,
        pull_request_id,
        pull_request_name,
        author_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(PullRequestResponse { pr })))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

#[derive(Debug, Serialize)]
pub struct PullRequestResponse {
    pub pr: PullRequest,
}
