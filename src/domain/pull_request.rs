use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    PullRequestId, PullRequestName, ReviewAPIError, UserId, ValidationError,
};

/// Reviewer slots available on a pull request.
pub const MAX_REVIEWERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestStatus {
    Open,
    Merged,
}

impl PullRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PullRequestStatus::Open => "OPEN",
            PullRequestStatus::Merged => "MERGED",
        }
    }
}

impl FromStr for PullRequestStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(PullRequestStatus::Open),
            "MERGED" => Ok(PullRequestStatus::Merged),
            _ => Err(ValidationError::new(format!(
                "Invalid pull request status: {s}"
            ))),
        }
    }
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullRequest {
    pub pull_request_id: PullRequestId,
    pub pull_request_name: PullRequestName,
    pub author_id: UserId,
    pub assigned_reviewers: Vec<UserId>,
    pub status: PullRequestStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "mergedAt")]
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Builds a new OPEN pull request, checking the reviewer list invariants.
    pub fn open(
        pull_request_id: PullRequestId,
        pull_request_name: PullRequestName,
        author_id: UserId,
        assigned_reviewers: Vec<UserId>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if assigned_reviewers.len() > MAX_REVIEWERS {
            return Err(ValidationError::new(format!(
                "At most {MAX_REVIEWERS} reviewers can be assigned"
            )));
        }
        if assigned_reviewers.contains(&author_id) {
            return Err(ValidationError::new(
                "Author cannot review their own pull request".to_owned(),
            ));
        }
        if assigned_reviewers.len() == MAX_REVIEWERS
            && assigned_reviewers[0] == assigned_reviewers[1]
        {
            return Err(ValidationError::new(
                "Reviewers must be distinct".to_owned(),
            ));
        }

        Ok(Self {
            pull_request_id,
            pull_request_name,
            author_id,
            assigned_reviewers,
            status: PullRequestStatus::Open,
            created_at,
            merged_at: None,
        })
    }

    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }

    pub fn is_reviewer(&self, user_id: &UserId) -> bool {
        self.assigned_reviewers.contains(user_id)
    }

    /// MERGED is terminal: merging twice is an error, not a no-op.
    pub fn merge(&mut self, at: DateTime<Utc>) -> Result<(), ReviewAPIError> {
        if self.is_merged() {
            return Err(ReviewAPIError::PRMerged(self.pull_request_id.clone()));
        }
        self.status = PullRequestStatus::Merged;
        self.merged_at = Some(at);
        Ok(())
    }

    /// Swaps `old` for `new` in the same slot.
    pub fn replace_reviewer(
        &mut self,
        old: &UserId,
        new: UserId,
    ) -> Result<(), ReviewAPIError> {
        if self.is_merged() {
            return Err(ReviewAPIError::PRMerged(self.pull_request_id.clone()));
        }
        let slot = self
            .assigned_reviewers
            .iter()
            .position(|id| id == old)
            .ok_or_else(|| ReviewAPIError::NotAssigned {
                pull_request_id: self.pull_request_id.clone(),
                user_id: old.clone(),
            })?;
        if new == self.author_id || self.is_reviewer(&new) {
            return Err(ValidationError::new(format!(
                "User {} cannot take a reviewer slot on {}",
                new.as_ref(),
                self.pull_request_id.as_ref()
            ))
            .into());
        }

        self.assigned_reviewers[slot] = new;
        Ok(())
    }

    pub fn summary(&self) -> PullRequestShort {
        PullRequestShort {
            pull_request_id: self.pull_request_id.clone(),
            pull_request_name: self.pull_request_name.clone(),
            author_id: self.author_id.clone(),
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullRequestShort {
    pub pull_request_id: PullRequestId,
    pub pull_request_name: PullRequestName,
    pub author_id: UserId,
    pub status: PullRequestStatus,
}
