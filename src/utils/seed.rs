use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{ReviewAPIError, TeamName, User, UserId, UserStoreError, Username},
    services::membership_registry::create_team,
};

const DEMO_TEAMS: [(&str, &[(&str, &str, bool)]); 3] = [
    (
        "backend",
        &[
            ("u1", "alice", true),
            ("u2", "bob", true),
            ("u3", "charlie", true),
            ("u4", "sam", true),
            ("u5", "mike", true),
        ],
    ),
    (
        "frontend",
        &[
            ("u6", "diana", true),
            ("u7", "eve", true),
            ("u8", "frank", false),
            ("u9", "jane", true),
            ("u10", "john", false),
        ],
    ),
    ("devops", &[("u11", "grace", true), ("u12", "henry", true)]),
];

/// Users u13 to u99 exist without a team.
const UNAFFILIATED_USERS: std::ops::RangeInclusive<u32> = 13..=99;

fn demo_user(
    user_id: &str,
    username: &str,
    is_active: bool,
) -> Result<User, ReviewAPIError> {
    Ok(User::new(
        UserId::parse(user_id.to_owned())?,
        Username::parse(username.to_owned())?,
        is_active,
    ))
}

/// Loads the demo teams and users through the engine. Teams that already
/// exist, or whose members moved elsewhere, are logged and skipped.
#[tracing::instrument(name = "Seed demo data", skip_all)]
pub async fn seed_demo_data(state: &AppState) -> Result<(), ReviewAPIError> {
    for (team_name, members) in DEMO_TEAMS {
        let members = members
            .iter()
            .map(|(id, name, is_active)| demo_user(id, name, *is_active))
            .collect::<Result<Vec<User>, ReviewAPIError>>()?;

        match create_team(state, TeamName::parse(team_name.to_owned())?, members)
            .await
        {
            Ok(_) => tracing::info!(team_name, "Seeded demo team"),
            Err(
                e @ (ReviewAPIError::TeamExists(_)
                | ReviewAPIError::UserInAnotherTeam { .. }),
            ) => {
                tracing::info!(team_name, reason = %e, "Skipped demo team")
            }
            Err(e) => return Err(e),
        }
    }

    for n in UNAFFILIATED_USERS {
        let user = demo_user(&format!("u{n}"), &format!("user{n}"), true)?;
        let added = state.user_store.write().await.add_user(user.clone()).await;
        match added {
            Ok(()) => {}
            Err(UserStoreError::UserAlreadyExists) => {
                let updated =
                    state.user_store.write().await.update_user(&user).await;
                updated
                    .map_err(|e| ReviewAPIError::UnexpectedError(eyre!(e)))?;
            }
            Err(e) => return Err(ReviewAPIError::UnexpectedError(eyre!(e))),
        }
    }

    Ok(())
}
