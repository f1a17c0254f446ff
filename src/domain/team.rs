use std::collections::HashSet;

use serde::Serialize;

use super::{TeamName, User, UserId, ValidationError};

/// Stored form of a team: its name and member ids in membership order.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub team_name: TeamName,
    pub members: Vec<UserId>,
}

impl Team {
    pub fn new(
        team_name: TeamName,
        members: Vec<UserId>,
    ) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(members.len());
        if let Some(duplicate) = members.iter().find(|id| !seen.insert(*id)) {
            return Err(ValidationError::new(format!(
                "User {} listed more than once",
                duplicate.as_ref()
            )));
        }

        Ok(Self { team_name, members })
    }
}

/// A team with the live records of its members, in membership order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRoster {
    pub team_name: TeamName,
    pub members: Vec<User>,
}

impl TeamRoster {
    pub fn new(team_name: TeamName, members: Vec<User>) -> Self {
        Self { team_name, members }
    }
}
