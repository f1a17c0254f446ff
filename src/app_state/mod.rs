use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{PullRequestStore, TeamStore, UserStore};

pub type UserStoreType = Arc<RwLock<dyn UserStore + Send + Sync>>;
pub type TeamStoreType = Arc<RwLock<dyn TeamStore + Send + Sync>>;
pub type PullRequestStoreType = Arc<RwLock<dyn PullRequestStore + Send + Sync>>;

#[derive(Clone)]
pub struct AppState {
    pub user_store: UserStoreType,
    pub team_store: TeamStoreType,
    pub pull_request_store: PullRequestStoreType,
}

impl AppState {
    pub fn new(
        user_store: UserStoreType,
        team_store: TeamStoreType,
        pull_request_store: PullRequestStoreType,
    ) -> Self {
        Self {
            user_store,
            team_store,
            pull_request_store,
        }
    }
}
