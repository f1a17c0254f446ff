use chrono::Utc;
use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{
        PullRequest, PullRequestId, PullRequestName, PullRequestShort,
        PullRequestStoreError, ReviewAPIError, TeamStoreError, UserId,
    },
    services::{
        membership_registry::load_roster,
        reviewer_pool::{
            select_initial_reviewers, select_replacement, set_reviewers_active,
        },
    },
};

/// Opens a pull request and assigns up to two reviewers from the author's
/// team. The chosen reviewers are taken out of the pool until merge.
#[tracing::instrument(name = "Create pull request", skip_all, fields(pull_request_id = pull_request_id.as_ref()))]
pub async fn create_pull_request(
    state: &AppState,
    pull_request_id: PullRequestId,
    pull_request_name: PullRequestName,
    author_id: UserId,
) -> Result<PullRequest, ReviewAPIError> {
    let existing = state
        .pull_request_store
        .read()
        .await
        .get_pull_request(&pull_request_id)
        .await;
    match existing {
        Ok(_) => return Err(ReviewAPIError::PRExists(pull_request_id)),
        Err(PullRequestStoreError::PullRequestNotFound) => {}
        Err(e) => return Err(ReviewAPIError::UnexpectedError(eyre!(e))),
    }

    let team = state
        .team_store
        .read()
        .await
        .get_team_by_user(&author_id)
        .await
        .map_err(|e| match e {
            TeamStoreError::TeamNotFound => ReviewAPIError::NotFound(format!(
                "team of user {}",
                author_id.as_ref()
            )),
            e => ReviewAPIError::UnexpectedError(eyre!(e)),
        })?;
    let roster = load_roster(state, &team).await?;
    let reviewers = select_initial_reviewers(&roster.members, &author_id);

    let pull_request = PullRequest::open(
        pull_request_id,
        pull_request_name,
        author_id,
        reviewers,
        Utc::now(),
    )?;

    state
        .pull_request_store
        .write()
        .await
        .add_pull_request(&pull_request)
        .await
        .map_err(|e| match e {
            PullRequestStoreError::PullRequestAlreadyExists => {
                ReviewAPIError::PRExists(pull_request.pull_request_id.clone())
            }
            e => ReviewAPIError::UnexpectedError(eyre!(e)),
        })?;

    tracing::info!(
        reviewers = pull_request.assigned_reviewers.len(),
        "Pull request opened"
    );

    set_reviewers_active(
        state,
        &pull_request.pull_request_id,
        &pull_request.assigned_reviewers,
        false,
    )
    .await;

    Ok(pull_request)
}

/// Marks a pull request merged and returns every reviewer to the pool.
#[tracing::instrument(name = "Merge pull request", skip_all, fields(pull_request_id = pull_request_id.as_ref()))]
pub async fn merge_pull_request(
    state: &AppState,
    pull_request_id: &PullRequestId,
) -> Result<PullRequest, ReviewAPIError> {
    let mut pull_request = fetch(state, pull_request_id).await?;
    pull_request.merge(Utc::now())?;

    store_update(state, &pull_request).await?;

    set_reviewers_active(
        state,
        &pull_request.pull_request_id,
        &pull_request.assigned_reviewers,
        true,
    )
    .await;

    Ok(pull_request)
}

/// Swaps `old_reviewer_id` for the first eligible member of the old
/// reviewer's own team. Activity flags are left alone.
#[tracing::instrument(name = "Reassign reviewer", skip_all, fields(pull_request_id = pull_request_id.as_ref(), old_reviewer_id = old_reviewer_id.as_ref()))]
pub async fn reassign_reviewer(
    state: &AppState,
    pull_request_id: &PullRequestId,
    old_reviewer_id: &UserId,
) -> Result<(PullRequest, UserId), ReviewAPIError> {
    let mut pull_request = fetch(state, pull_request_id).await?;

    if pull_request.is_merged() {
        return Err(ReviewAPIError::PRMerged(pull_request.pull_request_id));
    }
    if !pull_request.is_reviewer(old_reviewer_id) {
        return Err(ReviewAPIError::NotAssigned {
            pull_request_id: pull_request.pull_request_id,
            user_id: old_reviewer_id.clone(),
        });
    }

    let team = state
        .team_store
        .read()
        .await
        .get_team_by_user(old_reviewer_id)
        .await
        .map_err(|e| match e {
            TeamStoreError::TeamNotFound => ReviewAPIError::NotFound(format!(
                "team of user {}",
                old_reviewer_id.as_ref()
            )),
            e => ReviewAPIError::UnexpectedError(eyre!(e)),
        })?;
    let roster = load_roster(state, &team).await?;

    let mut exclude = vec![pull_request.author_id.clone()];
    exclude.extend(pull_request.assigned_reviewers.iter().cloned());
    let replacement = select_replacement(&roster.members, &exclude)
        .ok_or_else(|| {
            ReviewAPIError::NoCandidate(pull_request.pull_request_id.clone())
        })?;

    pull_request.replace_reviewer(old_reviewer_id, replacement.clone())?;
    store_update(state, &pull_request).await?;

    Ok((pull_request, replacement))
}

/// Pull requests the user is assigned to review, newest first.
#[tracing::instrument(name = "Get pull requests for review", skip_all)]
pub async fn get_reviews_for_user(
    state: &AppState,
    user_id: &UserId,
) -> Result<Vec<PullRequestShort>, ReviewAPIError> {
    state
        .pull_request_store
        .read()
        .await
        .get_by_reviewer(user_id)
        .await
        .map_err(|e| ReviewAPIError::UnexpectedError(eyre!(e)))
}

async fn fetch(
    state: &AppState,
    pull_request_id: &PullRequestId,
) -> Result<PullRequest, ReviewAPIError> {
    state
        .pull_request_store
        .read()
        .await
        .get_pull_request(pull_request_id)
        .await
        .map_err(|e| not_found_or_unexpected(pull_request_id, e))
}

async fn store_update(
    state: &AppState,
    pull_request: &PullRequest,
) -> Result<(), ReviewAPIError> {
    state
        .pull_request_store
        .write()
        .await
        .update_pull_request(pull_request)
        .await
        .map_err(|e| not_found_or_unexpected(&pull_request.pull_request_id, e))
}

fn not_found_or_unexpected(
    pull_request_id: &PullRequestId,
    e: PullRequestStoreError,
) -> ReviewAPIError {
    match e {
        PullRequestStoreError::PullRequestNotFound => ReviewAPIError::NotFound(
            format!("pull request {}", pull_request_id.as_ref()),
        ),
        e => ReviewAPIError::UnexpectedError(eyre!(e)),
    }
}
