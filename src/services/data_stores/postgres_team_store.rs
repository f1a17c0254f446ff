use color_eyre::eyre::eyre;
use sqlx::{PgPool, Row};

use crate::domain::{Team, TeamName, TeamStore, TeamStoreError, UserId};

// Declared in the migrations; the store is the authority for exclusivity.
const ONE_TEAM_PER_USER: &str = "team_members_one_team_per_user";

pub struct PostgresTeamStore {
    pool: PgPool,
}

impl PostgresTeamStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unexpected(e: impl std::error::Error + Send + Sync + 'static) -> TeamStoreError {
    TeamStoreError::UnexpectedError(eyre!(e))
}

fn position_of(index: usize) -> Result<i32, TeamStoreError> {
    i32::try_from(index).map_err(unexpected)
}

#[async_trait::async_trait]
impl TeamStore for PostgresTeamStore {
    #[tracing::instrument(name = "Adding team to PostgreSQL", skip_all)]
    async fn add_team(&mut self, team: &Team) -> Result<(), TeamStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            r#"
            INSERT INTO teams (team_name) VALUES ($1)
            "#,
        )
        .bind(team.team_name.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                TeamStoreError::TeamAlreadyExists
            }
            err => unexpected(err),
        })?;

        for (index, user_id) in team.members.iter().enumerate() {
            let inserted = sqlx::query(
                r#"
                INSERT INTO team_members (team_name, user_id, position) VALUES ($1, $2, $3)
                "#,
            )
            .bind(team.team_name.as_ref())
            .bind(user_id.as_ref())
            .bind(position_of(index)?)
            .execute(&mut *tx)
            .await;

            match inserted {
                Ok(_) => {}
                Err(sqlx::Error::Database(db_err))
                    if db_err.constraint() == Some(ONE_TEAM_PER_USER) =>
                {
                    tx.rollback().await.map_err(unexpected)?;
                    let holder = self.get_team_by_user(user_id).await.map_err(
                        |e| match e {
                            TeamStoreError::TeamNotFound => {
                                TeamStoreError::UnexpectedError(eyre!(
                                    "membership conflict for user {} vanished",
                                    user_id.as_ref()
                                ))
                            }
                            e => e,
                        },
                    )?;
                    return Err(TeamStoreError::UserInAnotherTeam {
                        user_id: user_id.clone(),
                        team_name: holder.team_name,
                    });
                }
                Err(e) => return Err(unexpected(e)),
            }
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(name = "Getting team from PostgreSQL", skip_all)]
    async fn get_team(
        &self,
        team_name: &TeamName,
    ) -> Result<Team, TeamStoreError> {
        sqlx::query(
            r#"
            SELECT team_name FROM teams WHERE team_name = $1
            "#,
        )
        .bind(team_name.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => TeamStoreError::TeamNotFound,
            err => unexpected(err),
        })?;

        let rows = sqlx::query(
            r#"
                SELECT user_id
                FROM team_members
                WHERE team_name = $1
                ORDER BY position
            "#,
        )
        .bind(team_name.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let members = rows
            .iter()
            .map(|row| {
                let user_id: String =
                    row.try_get("user_id").map_err(unexpected)?;
                UserId::parse(user_id).map_err(unexpected)
            })
            .collect::<Result<Vec<UserId>, TeamStoreError>>()?;

        Ok(Team {
            team_name: team_name.clone(),
            members,
        })
    }

    #[tracing::instrument(name = "Getting team of user from PostgreSQL", skip_all)]
    async fn get_team_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Team, TeamStoreError> {
        let row = sqlx::query(
            r#"
            SELECT team_name FROM team_members WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => TeamStoreError::TeamNotFound,
            err => unexpected(err),
        })?;

        let team_name: String = row.try_get("team_name").map_err(unexpected)?;
        let team_name = TeamName::parse(team_name).map_err(unexpected)?;
        self.get_team(&team_name).await
    }

    #[tracing::instrument(name = "Replacing team members in PostgreSQL", skip_all)]
    async fn replace_members(
        &mut self,
        team: &Team,
    ) -> Result<(), TeamStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            r#"
            SELECT team_name FROM teams WHERE team_name = $1 FOR UPDATE
            "#,
        )
        .bind(team.team_name.as_ref())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => TeamStoreError::TeamNotFound,
            err => unexpected(err),
        })?;

        let member_ids: Vec<String> = team
            .members
            .iter()
            .map(|id| id.as_ref().to_owned())
            .collect();

        sqlx::query(
            r#"
            DELETE FROM team_members WHERE team_name = $1 OR user_id = ANY($2)
            "#,
        )
        .bind(team.team_name.as_ref())
        .bind(member_ids)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        for (index, user_id) in team.members.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO team_members (team_name, user_id, position) VALUES ($1, $2, $3)
                "#,
            )
            .bind(team.team_name.as_ref())
            .bind(user_id.as_ref())
            .bind(position_of(index)?)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }
}
