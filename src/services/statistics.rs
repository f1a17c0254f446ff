use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{ReviewAPIError, StatusCounts, UserId, UserPrStats, UserStoreError},
};

/// Counts the user's authored and reviewed pull requests by status.
#[tracing::instrument(name = "Get user pull request stats", skip_all, fields(user_id = user_id.as_ref()))]
pub async fn get_user_pr_stats(
    state: &AppState,
    user_id: &UserId,
) -> Result<UserPrStats, ReviewAPIError> {
    let user = state
        .user_store
        .read()
        .await
        .get_user(user_id)
        .await
        .map_err(|e| match e {
            UserStoreError::UserNotFound => {
                ReviewAPIError::NotFound(format!("user {}", user_id.as_ref()))
            }
            e => ReviewAPIError::UnexpectedError(eyre!(e)),
        })?;

    let authored = state
        .pull_request_store
        .read()
        .await
        .get_by_author(user_id)
        .await
        .map_err(|e| ReviewAPIError::UnexpectedError(eyre!(e)))?;
    let reviewed = state
        .pull_request_store
        .read()
        .await
        .get_by_reviewer(user_id)
        .await
        .map_err(|e| ReviewAPIError::UnexpectedError(eyre!(e)))?;

    Ok(UserPrStats {
        user_id: user.user_id,
        username: user.username,
        total_authored: authored.len(),
        total_assigned_for_review: reviewed.len(),
        authored_stats: StatusCounts::tally(&authored),
        reviewer_stats: StatusCounts::tally(&reviewed),
    })
}
