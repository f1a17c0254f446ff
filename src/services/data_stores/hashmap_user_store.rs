use crate::domain::{User, UserId, UserStore, UserStoreError};
use std::collections::HashMap;

#[derive(Default)]
pub struct HashmapUserStore {
    users: HashMap<UserId, User>,
}

#[async_trait::async_trait]
impl UserStore for HashmapUserStore {
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError> {
        if self.users.contains_key(&user.user_id) {
            return Err(UserStoreError::UserAlreadyExists);
        }

        self.users.insert(user.user_id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, user_id: &UserId) -> Result<User, UserStoreError> {
        match self.users.get(user_id) {
            Some(user) => Ok(user.clone()),
            None => Err(UserStoreError::UserNotFound),
        }
    }

    async fn get_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<User>, UserStoreError> {
        Ok(user_ids
            .iter()
            .filter_map(|id| self.users.get(id).cloned())
            .collect())
    }

    async fn update_user(&mut self, user: &User) -> Result<(), UserStoreError> {
        match self.users.get_mut(&user.user_id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(UserStoreError::UserNotFound),
        }
    }

    async fn set_active(
        &mut self,
        user_id: &UserId,
        is_active: bool,
    ) -> Result<(), UserStoreError> {
        match self.users.get_mut(user_id) {
            Some(user) => {
                user.is_active = is_active;
                Ok(())
            }
            None => Err(UserStoreError::UserNotFound),
        }
    }

    async fn delete_user(
        &mut self,
        user_id: &UserId,
    ) -> Result<(), UserStoreError> {
        match self.users.remove(user_id) {
            Some(_) => Ok(()),
            None => Err(UserStoreError::UserNotFound),
        }
    }
}
