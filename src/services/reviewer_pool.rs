use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{
        PullRequestId, ReviewAPIError, TeamName, TeamStoreError, User, UserId,
        UserStoreError, MAX_REVIEWERS,
    },
};

/// Active members not listed in `exclude`, in membership order.
pub fn candidate_reviewers<'a>(
    members: &'a [User],
    exclude: &'a [UserId],
) -> impl Iterator<Item = &'a UserId> + 'a {
    members
        .iter()
        .filter(move |member| {
            member.is_active && !exclude.contains(&member.user_id)
        })
        .map(|member| &member.user_id)
}

pub fn select_initial_reviewers(
    members: &[User],
    author_id: &UserId,
) -> Vec<UserId> {
    candidate_reviewers(members, std::slice::from_ref(author_id))
        .take(MAX_REVIEWERS)
        .cloned()
        .collect()
}

pub fn select_replacement(
    members: &[User],
    exclude: &[UserId],
) -> Option<UserId> {
    candidate_reviewers(members, exclude).next().cloned()
}

/// Sets a user's activity flag and reports the team they belong to, if any.
#[tracing::instrument(name = "Set user active", skip_all, fields(user_id = user_id.as_ref(), is_active = is_active))]
pub async fn set_user_active(
    state: &AppState,
    user_id: &UserId,
    is_active: bool,
) -> Result<(User, Option<TeamName>), ReviewAPIError> {
    let not_found = || ReviewAPIError::NotFound(format!("user {}", user_id.as_ref()));

    state
        .user_store
        .write()
        .await
        .set_active(user_id, is_active)
        .await
        .map_err(|e| match e {
            UserStoreError::UserNotFound => not_found(),
            e => ReviewAPIError::UnexpectedError(eyre!(e)),
        })?;

    let user = state
        .user_store
        .read()
        .await
        .get_user(user_id)
        .await
        .map_err(|e| match e {
            UserStoreError::UserNotFound => not_found(),
            e => ReviewAPIError::UnexpectedError(eyre!(e)),
        })?;

    let team = state.team_store.read().await.get_team_by_user(user_id).await;
    let team_name = match team {
        Ok(team) => Some(team.team_name),
        Err(TeamStoreError::TeamNotFound) => None,
        Err(e) => return Err(ReviewAPIError::UnexpectedError(eyre!(e))),
    };

    Ok((user, team_name))
}

/// Flips the activity flag of each reviewer. Failures are logged and
/// skipped; the caller's operation has already been persisted.
pub(crate) async fn set_reviewers_active(
    state: &AppState,
    pull_request_id: &PullRequestId,
    reviewers: &[UserId],
    is_active: bool,
) {
    for reviewer in reviewers {
        let result = state
            .user_store
            .write()
            .await
            .set_active(reviewer, is_active)
            .await;
        if let Err(e) = result {
            tracing::warn!(
                user_id = reviewer.as_ref(),
                pull_request_id = pull_request_id.as_ref(),
                is_active,
                error = ?e,
                "Reviewer activity not updated"
            );
        }
    }
}
