use std::collections::HashMap;

use crate::domain::{Team, TeamName, TeamStore, TeamStoreError, UserId};

#[derive(Default)]
pub struct HashmapTeamStore {
    teams: HashMap<TeamName, Vec<UserId>>,
    memberships: HashMap<UserId, TeamName>,
}

impl HashmapTeamStore {
    fn detach(&mut self, user_id: &UserId) {
        if let Some(previous) = self.memberships.remove(user_id) {
            if let Some(members) = self.teams.get_mut(&previous) {
                members.retain(|id| id != user_id);
            }
        }
    }
}

#[async_trait::async_trait]
impl TeamStore for HashmapTeamStore {
    async fn add_team(&mut self, team: &Team) -> Result<(), TeamStoreError> {
        if self.teams.contains_key(&team.team_name) {
            return Err(TeamStoreError::TeamAlreadyExists);
        }

        if let Some((user_id, team_name)) = team.members.iter().find_map(|id| {
            self.memberships.get(id).map(|name| (id.clone(), name.clone()))
        }) {
            return Err(TeamStoreError::UserInAnotherTeam { user_id, team_name });
        }

        for user_id in team.members.iter() {
            self.memberships
                .insert(user_id.clone(), team.team_name.clone());
        }
        self.teams
            .insert(team.team_name.clone(), team.members.clone());
        Ok(())
    }

    async fn get_team(
        &self,
        team_name: &TeamName,
    ) -> Result<Team, TeamStoreError> {
        self.teams
            .get(team_name)
            .map(|members| Team {
                team_name: team_name.clone(),
                members: members.clone(),
            })
            .ok_or(TeamStoreError::TeamNotFound)
    }

    async fn get_team_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Team, TeamStoreError> {
        let team_name = self
            .memberships
            .get(user_id)
            .ok_or(TeamStoreError::TeamNotFound)?;
        self.get_team(team_name).await
    }

    async fn replace_members(
        &mut self,
        team: &Team,
    ) -> Result<(), TeamStoreError> {
        let current = self
            .teams
            .get(&team.team_name)
            .cloned()
            .ok_or(TeamStoreError::TeamNotFound)?;

        for user_id in current.iter() {
            self.memberships.remove(user_id);
        }
        for user_id in team.members.iter() {
            self.detach(user_id);
            self.memberships
                .insert(user_id.clone(), team.team_name.clone());
        }
        self.teams
            .insert(team.team_name.clone(), team.members.clone());
        Ok(())
    }
}
