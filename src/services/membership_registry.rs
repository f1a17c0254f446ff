use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{
        ReviewAPIError, Team, TeamName, TeamRoster, TeamStoreError, User,
        UserId, UserStoreError,
    },
};

/// Registers a new team and creates or refreshes its members.
///
/// Every member is checked against existing memberships before anything is
/// written. Users created here are deleted again if a later step fails.
#[tracing::instrument(name = "Create team", skip_all, fields(team_name = team_name.as_ref()))]
pub async fn create_team(
    state: &AppState,
    team_name: TeamName,
    members: Vec<User>,
) -> Result<TeamRoster, ReviewAPIError> {
    let team = Team::new(
        team_name,
        members.iter().map(|user| user.user_id.clone()).collect(),
    )?;

    let existing = state.team_store.read().await.get_team(&team.team_name).await;
    match existing {
        Ok(_) => return Err(ReviewAPIError::TeamExists(team.team_name)),
        Err(TeamStoreError::TeamNotFound) => {}
        Err(e) => return Err(ReviewAPIError::UnexpectedError(eyre!(e))),
    }

    for user_id in team.members.iter() {
        let current = state.team_store.read().await.get_team_by_user(user_id).await;
        match current {
            Ok(other) => {
                return Err(ReviewAPIError::UserInAnotherTeam {
                    user_id: user_id.clone(),
                    team_name: other.team_name,
                })
            }
            Err(TeamStoreError::TeamNotFound) => {}
            Err(e) => return Err(ReviewAPIError::UnexpectedError(eyre!(e))),
        }
    }

    let mut created = Vec::new();
    let persisted = match upsert_users(state, &members, &mut created).await {
        Ok(()) => {
            let added = state.team_store.write().await.add_team(&team).await;
            added.map_err(|e| team_store_error(&team.team_name, e))
        }
        Err(e) => Err(e),
    };

    if let Err(e) = persisted {
        roll_back_users(state, &created).await;
        return Err(e);
    }

    tracing::info!(members = team.members.len(), "Team created");
    load_roster(state, &team).await
}

#[tracing::instrument(name = "Get team", skip_all)]
pub async fn get_team(
    state: &AppState,
    team_name: &TeamName,
) -> Result<TeamRoster, ReviewAPIError> {
    let team = state
        .team_store
        .read()
        .await
        .get_team(team_name)
        .await
        .map_err(|e| team_store_error(team_name, e))?;

    load_roster(state, &team).await
}

/// Replaces the member set of an existing team. Members that belong to
/// another team are moved here.
#[tracing::instrument(name = "Update team", skip_all, fields(team_name = team_name.as_ref()))]
pub async fn update_team(
    state: &AppState,
    team_name: TeamName,
    members: Vec<User>,
) -> Result<TeamRoster, ReviewAPIError> {
    let team = Team::new(
        team_name,
        members.iter().map(|user| user.user_id.clone()).collect(),
    )?;

    state
        .team_store
        .read()
        .await
        .get_team(&team.team_name)
        .await
        .map_err(|e| team_store_error(&team.team_name, e))?;

    let mut created = Vec::new();
    let persisted = match upsert_users(state, &members, &mut created).await {
        Ok(()) => {
            let replaced =
                state.team_store.write().await.replace_members(&team).await;
            replaced.map_err(|e| team_store_error(&team.team_name, e))
        }
        Err(e) => Err(e),
    };

    if let Err(e) = persisted {
        roll_back_users(state, &created).await;
        return Err(e);
    }

    load_roster(state, &team).await
}

/// Resolves a stored team into the live records of its members.
pub(crate) async fn load_roster(
    state: &AppState,
    team: &Team,
) -> Result<TeamRoster, ReviewAPIError> {
    let members = state
        .user_store
        .read()
        .await
        .get_users(&team.members)
        .await
        .map_err(|e| ReviewAPIError::UnexpectedError(eyre!(e)))?;

    Ok(TeamRoster::new(team.team_name.clone(), members))
}

async fn upsert_users(
    state: &AppState,
    users: &[User],
    created: &mut Vec<UserId>,
) -> Result<(), ReviewAPIError> {
    for user in users {
        let added = state.user_store.write().await.add_user(user.clone()).await;
        match added {
            Ok(()) => created.push(user.user_id.clone()),
            Err(UserStoreError::UserAlreadyExists) => {
                let updated =
                    state.user_store.write().await.update_user(user).await;
                updated.map_err(|e| ReviewAPIError::UnexpectedError(eyre!(e)))?;
            }
            Err(e) => return Err(ReviewAPIError::UnexpectedError(eyre!(e))),
        }
    }
    Ok(())
}

async fn roll_back_users(state: &AppState, created: &[UserId]) {
    for user_id in created {
        let deleted = state.user_store.write().await.delete_user(user_id).await;
        if let Err(e) = deleted {
            tracing::error!(
                user_id = user_id.as_ref(),
                error = ?e,
                "Failed to roll back user created for team"
            );
        }
    }
}

fn team_store_error(team_name: &TeamName, e: TeamStoreError) -> ReviewAPIError {
    match e {
        TeamStoreError::TeamAlreadyExists => {
            ReviewAPIError::TeamExists(team_name.clone())
        }
        TeamStoreError::TeamNotFound => {
            ReviewAPIError::NotFound(format!("team {}", team_name.as_ref()))
        }
        TeamStoreError::UserInAnotherTeam { user_id, team_name } => {
            ReviewAPIError::UserInAnotherTeam { user_id, team_name }
        }
        e => ReviewAPIError::UnexpectedError(eyre!(e)),
    }
}
