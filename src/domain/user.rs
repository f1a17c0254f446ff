use serde::Serialize;

use super::{UserId, Username};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub user_id: UserId,
    pub username: Username,
    pub is_active: bool,
}

impl User {
    pub fn new(user_id: UserId, username: Username, is_active: bool) -> Self {
        Self {
            user_id,
            username,
            is_active,
        }
    }
}
