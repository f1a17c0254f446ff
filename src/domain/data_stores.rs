use super::{
    PullRequest, PullRequestId, PullRequestShort, Team, TeamName, User, UserId,
};
use color_eyre::eyre::Report;
use thiserror::Error;

#[async_trait::async_trait]
pub trait UserStore {
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError>;
    async fn get_user(&self, user_id: &UserId) -> Result<User, UserStoreError>;
    /// Returns the users that exist, in the order their ids were given.
    async fn get_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<User>, UserStoreError>;
    async fn update_user(&mut self, user: &User) -> Result<(), UserStoreError>;
    async fn set_active(
        &mut self,
        user_id: &UserId,
        is_active: bool,
    ) -> Result<(), UserStoreError>;
    async fn delete_user(
        &mut self,
        user_id: &UserId,
    ) -> Result<(), UserStoreError>;
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UserAlreadyExists, Self::UserAlreadyExists)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait::async_trait]
pub trait TeamStore {
    /// Persists the team together with its membership. A member that
    /// already belongs to another team is rejected, not moved.
    async fn add_team(&mut self, team: &Team) -> Result<(), TeamStoreError>;
    async fn get_team(
        &self,
        team_name: &TeamName,
    ) -> Result<Team, TeamStoreError>;
    async fn get_team_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Team, TeamStoreError>;
    /// Replaces the member set of an existing team. Each member is detached
    /// from whatever team held them before.
    async fn replace_members(
        &mut self,
        team: &Team,
    ) -> Result<(), TeamStoreError>;
}

#[derive(Debug, Error)]
pub enum TeamStoreError {
    #[error("Team already exists")]
    TeamAlreadyExists,
    #[error("Team not found")]
    TeamNotFound,
    #[error("User {} already in team {}", .user_id.as_ref(), .team_name.as_ref())]
    UserInAnotherTeam { user_id: UserId, team_name: TeamName },
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for TeamStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::TeamAlreadyExists, Self::TeamAlreadyExists)
            | (Self::TeamNotFound, Self::TeamNotFound)
            | (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            (
                Self::UserInAnotherTeam {
                    user_id: a,
                    team_name: x,
                },
                Self::UserInAnotherTeam {
                    user_id: b,
                    team_name: y,
                },
            ) => a == b && x == y,
            _ => false,
        }
    }
}

#[async_trait::async_trait]
pub trait PullRequestStore {
    /// Persists the pull request together with its reviewer list.
    async fn add_pull_request(
        &mut self,
        pull_request: &PullRequest,
    ) -> Result<(), PullRequestStoreError>;
    async fn get_pull_request(
        &self,
        pull_request_id: &PullRequestId,
    ) -> Result<PullRequest, PullRequestStoreError>;
    async fn update_pull_request(
        &mut self,
        pull_request: &PullRequest,
    ) -> Result<(), PullRequestStoreError>;
    /// Newest first.
    async fn get_by_author(
        &self,
        author_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, PullRequestStoreError>;
    /// Newest first.
    async fn get_by_reviewer(
        &self,
        reviewer_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, PullRequestStoreError>;
}

#[derive(Debug, Error)]
pub enum PullRequestStoreError {
    #[error("Pull request already exists")]
    PullRequestAlreadyExists,
    #[error("Pull request not found")]
    PullRequestNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for PullRequestStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::PullRequestAlreadyExists, Self::PullRequestAlreadyExists)
                | (Self::PullRequestNotFound, Self::PullRequestNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}
