use chrono::{DateTime, Utc};
use color_eyre::eyre::eyre;
use sqlx::{postgres::PgRow, PgPool, Postgres, Row, Transaction};

use crate::domain::{
    PullRequest, PullRequestId, PullRequestName, PullRequestShort,
    PullRequestStatus, PullRequestStore, PullRequestStoreError, UserId,
};

pub struct PostgresPullRequestStore {
    pool: PgPool,
}

impl PostgresPullRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unexpected(
    e: impl std::error::Error + Send + Sync + 'static,
) -> PullRequestStoreError {
    PullRequestStoreError::UnexpectedError(eyre!(e))
}

fn summary_from_row(row: &PgRow) -> Result<PullRequestShort, PullRequestStoreError> {
    let pull_request_id: String =
        row.try_get("pull_request_id").map_err(unexpected)?;
    let pull_request_name: String =
        row.try_get("pull_request_name").map_err(unexpected)?;
    let author_id: String = row.try_get("author_id").map_err(unexpected)?;
    let status: String = row.try_get("status").map_err(unexpected)?;

    Ok(PullRequestShort {
        pull_request_id: PullRequestId::parse(pull_request_id)
            .map_err(unexpected)?,
        pull_request_name: PullRequestName::parse(pull_request_name)
            .map_err(unexpected)?,
        author_id: UserId::parse(author_id).map_err(unexpected)?,
        status: status.parse::<PullRequestStatus>().map_err(unexpected)?,
    })
}

async fn insert_reviewers(
    tx: &mut Transaction<'static, Postgres>,
    pull_request: &PullRequest,
) -> Result<(), PullRequestStoreError> {
    for (slot, reviewer) in pull_request.assigned_reviewers.iter().enumerate() {
        let slot = i16::try_from(slot).map_err(unexpected)?;
        sqlx::query(
            r#"
            INSERT INTO pull_request_reviewers (pull_request_id, user_id, slot)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(pull_request.pull_request_id.as_ref())
        .bind(reviewer.as_ref())
        .bind(slot)
        .execute(&mut **tx)
        .await
        .map_err(unexpected)?;
    }
    Ok(())
}

#[async_trait::async_trait]
impl PullRequestStore for PostgresPullRequestStore {
    #[tracing::instrument(name = "Adding pull request to PostgreSQL", skip_all)]
    async fn add_pull_request(
        &mut self,
        pull_request: &PullRequest,
    ) -> Result<(), PullRequestStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            r#"
            INSERT INTO pull_requests
                (pull_request_id, pull_request_name, author_id, status, created_at, merged_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(pull_request.pull_request_id.as_ref())
        .bind(pull_request.pull_request_name.as_ref())
        .bind(pull_request.author_id.as_ref())
        .bind(pull_request.status.as_str())
        .bind(pull_request.created_at)
        .bind(pull_request.merged_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                PullRequestStoreError::PullRequestAlreadyExists
            }
            err => unexpected(err),
        })?;

        insert_reviewers(&mut tx, pull_request).await?;

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving pull request from PostgreSQL", skip_all)]
    async fn get_pull_request(
        &self,
        pull_request_id: &PullRequestId,
    ) -> Result<PullRequest, PullRequestStoreError> {
        let row = sqlx::query(
            r#"
                SELECT pull_request_id, pull_request_name, author_id, status,
                       created_at, merged_at
                FROM pull_requests
                WHERE pull_request_id = $1
            "#,
        )
        .bind(pull_request_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PullRequestStoreError::PullRequestNotFound,
            err => unexpected(err),
        })?;

        let summary = summary_from_row(&row)?;
        let created_at: DateTime<Utc> =
            row.try_get("created_at").map_err(unexpected)?;
        let merged_at: Option<DateTime<Utc>> =
            row.try_get("merged_at").map_err(unexpected)?;

        let reviewer_rows = sqlx::query(
            r#"
                SELECT user_id
                FROM pull_request_reviewers
                WHERE pull_request_id = $1
                ORDER BY slot
            "#,
        )
        .bind(pull_request_id.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let assigned_reviewers = reviewer_rows
            .iter()
            .map(|row| {
                let user_id: String =
                    row.try_get("user_id").map_err(unexpected)?;
                UserId::parse(user_id).map_err(unexpected)
            })
            .collect::<Result<Vec<UserId>, PullRequestStoreError>>()?;

        Ok(PullRequest {
            pull_request_id: summary.pull_request_id,
            pull_request_name: summary.pull_request_name,
            author_id: summary.author_id,
            assigned_reviewers,
            status: summary.status,
            created_at,
            merged_at,
        })
    }

    #[tracing::instrument(name = "Updating pull request in PostgreSQL", skip_all)]
    async fn update_pull_request(
        &mut self,
        pull_request: &PullRequest,
    ) -> Result<(), PullRequestStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let result = sqlx::query(
            r#"
            UPDATE pull_requests
            SET pull_request_name = $2, status = $3, merged_at = $4
            WHERE pull_request_id = $1
            "#,
        )
        .bind(pull_request.pull_request_id.as_ref())
        .bind(pull_request.pull_request_name.as_ref())
        .bind(pull_request.status.as_str())
        .bind(pull_request.merged_at)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PullRequestStoreError::PullRequestNotFound);
        }

        sqlx::query(
            r#"
            DELETE FROM pull_request_reviewers WHERE pull_request_id = $1
            "#,
        )
        .bind(pull_request.pull_request_id.as_ref())
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        insert_reviewers(&mut tx, pull_request).await?;

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(name = "Listing authored pull requests from PostgreSQL", skip_all)]
    async fn get_by_author(
        &self,
        author_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, PullRequestStoreError> {
        let rows = sqlx::query(
            r#"
                SELECT pull_request_id, pull_request_name, author_id, status
                FROM pull_requests
                WHERE author_id = $1
                ORDER BY created_at DESC, sequence DESC
            "#,
        )
        .bind(author_id.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        rows.iter().map(summary_from_row).collect()
    }

    #[tracing::instrument(name = "Listing review pull requests from PostgreSQL", skip_all)]
    async fn get_by_reviewer(
        &self,
        reviewer_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, PullRequestStoreError> {
        let rows = sqlx::query(
            r#"
                SELECT p.pull_request_id, p.pull_request_name, p.author_id, p.status
                FROM pull_requests p
                JOIN pull_request_reviewers r
                  ON r.pull_request_id = p.pull_request_id
                WHERE r.user_id = $1
                ORDER BY p.created_at DESC, p.sequence DESC
            "#,
        )
        .bind(reviewer_id.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        rows.iter().map(summary_from_row).collect()
    }
}
