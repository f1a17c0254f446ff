use color_eyre::eyre::Report;
use thiserror::Error;

use super::{PullRequestId, TeamName, UserId};

#[derive(Debug, Error)]
pub enum ReviewAPIError {
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Team already exists: {}", .0.as_ref())]
    TeamExists(TeamName),
    #[error("Pull request already exists: {}", .0.as_ref())]
    PRExists(PullRequestId),
    #[error("User {} already in team {}", .user_id.as_ref(), .team_name.as_ref())]
    UserInAnotherTeam { user_id: UserId, team_name: TeamName },
    #[error("Pull request is merged: {}", .0.as_ref())]
    PRMerged(PullRequestId),
    #[error(
        "User {} is not assigned as reviewer of {}",
        .user_id.as_ref(),
        .pull_request_id.as_ref()
    )]
    NotAssigned {
        pull_request_id: PullRequestId,
        user_id: UserId,
    },
    #[error("No active replacement reviewer available for {}", .0.as_ref())]
    NoCandidate(PullRequestId),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
    #[error("Validation error")]
    ValidationError(#[from] ValidationError),
}

impl ReviewAPIError {
    /// Stable machine-readable code reported to HTTP clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::TeamExists(_) => "TEAM_EXISTS",
            Self::PRExists(_) => "PR_EXISTS",
            Self::UserInAnotherTeam { .. } => "USER_IN_ANOTHER_TEAM",
            Self::PRMerged(_) => "PR_MERGED",
            Self::NotAssigned { .. } => "NOT_ASSIGNED",
            Self::NoCandidate(_) => "NO_CANDIDATE",
            Self::UnexpectedError(_) => "INTERNAL_ERROR",
            Self::ValidationError(_) => "INVALID_REQUEST",
        }
    }
}

#[derive(Debug, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: String) -> Self {
        Self(message)
    }

    pub fn as_ref(&self) -> &String {
        &self.0
    }
}
