use std::cmp::Reverse;
use std::collections::HashMap;

use crate::domain::{
    PullRequest, PullRequestId, PullRequestShort, PullRequestStore,
    PullRequestStoreError, UserId,
};

/// Pull requests keyed by id. Each entry carries its insertion sequence so
/// that newest-first listings stay stable when timestamps collide.
#[derive(Default)]
pub struct HashmapPullRequestStore {
    pull_requests: HashMap<PullRequestId, (u64, PullRequest)>,
    next_sequence: u64,
}

impl HashmapPullRequestStore {
    fn newest_first<F>(&self, predicate: F) -> Vec<PullRequestShort>
    where
        F: Fn(&PullRequest) -> bool,
    {
        let mut matching: Vec<&(u64, PullRequest)> = self
            .pull_requests
            .values()
            .filter(|(_, pr)| predicate(pr))
            .collect();
        matching.sort_by_key(|(sequence, pr)| Reverse((pr.created_at, *sequence)));
        matching.into_iter().map(|(_, pr)| pr.summary()).collect()
    }
}

#[async_trait::async_trait]
impl PullRequestStore for HashmapPullRequestStore {
    async fn add_pull_request(
        &mut self,
        pull_request: &PullRequest,
    ) -> Result<(), PullRequestStoreError> {
        if self
            .pull_requests
            .contains_key(&pull_request.pull_request_id)
        {
            return Err(PullRequestStoreError::PullRequestAlreadyExists);
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.pull_requests.insert(
            pull_request.pull_request_id.clone(),
            (sequence, pull_request.clone()),
        );
        Ok(())
    }

    async fn get_pull_request(
        &self,
        pull_request_id: &PullRequestId,
    ) -> Result<PullRequest, PullRequestStoreError> {
        self.pull_requests
            .get(pull_request_id)
            .map(|(_, pr)| pr.clone())
            .ok_or(PullRequestStoreError::PullRequestNotFound)
    }

    async fn update_pull_request(
        &mut self,
        pull_request: &PullRequest,
    ) -> Result<(), PullRequestStoreError> {
        match self.pull_requests.get_mut(&pull_request.pull_request_id) {
            Some((_, stored)) => {
                *stored = pull_request.clone();
                Ok(())
            }
            None => Err(PullRequestStoreError::PullRequestNotFound),
        }
    }

    async fn get_by_author(
        &self,
        author_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, PullRequestStoreError> {
        Ok(self.newest_first(|pr| &pr.author_id == author_id))
    }

    async fn get_by_reviewer(
        &self,
        reviewer_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, PullRequestStoreError> {
        Ok(self.newest_first(|pr| pr.is_reviewer(reviewer_id)))
    }
}
