use serde::Serialize;

use super::{PullRequestShort, PullRequestStatus, UserId, Username};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub open: usize,
    pub merged: usize,
}

impl StatusCounts {
    pub fn tally(pull_requests: &[PullRequestShort]) -> Self {
        pull_requests
            .iter()
            .fold(Self::default(), |mut counts, pr| {
                match pr.status {
                    PullRequestStatus::Open => counts.open += 1,
                    PullRequestStatus::Merged => counts.merged += 1,
                }
                counts
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPrStats {
    pub user_id: UserId,
    pub username: Username,
    pub total_authored: usize,
    pub total_assigned_for_review: usize,
    pub authored_stats: StatusCounts,
    pub reviewer_stats: StatusCounts,
}
