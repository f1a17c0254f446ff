use review_assigner::{
    app_state::{AppState, PullRequestStoreType, TeamStoreType, UserStoreType},
    services::data_stores::{
        HashmapPullRequestStore, HashmapTeamStore, HashmapUserStore,
    },
    utils::constants::{env, test, DATABASE_MAX_CONNECTIONS},
    Application,
};
use reqwest::Response;
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use sqlx::{
    postgres::{PgConnectOptions, PgConnection, PgPoolOptions},
    Connection, Executor, PgPool,
};
use std::{str::FromStr, sync::Arc};
use test_context::AsyncTestContext;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub user_store: UserStoreType,
    pub team_store: TeamStoreType,
    pub pull_request_store: PullRequestStoreType,
}

impl TestApp {
    pub async fn new() -> Self {
        let user_store: UserStoreType =
            Arc::new(RwLock::new(HashmapUserStore::default()));
        let team_store: TeamStoreType =
            Arc::new(RwLock::new(HashmapTeamStore::default()));
        let pull_request_store: PullRequestStoreType =
            Arc::new(RwLock::new(HashmapPullRequestStore::default()));

        let app_state = AppState::new(
            user_store.clone(),
            team_store.clone(),
            pull_request_store.clone(),
        );

        let app = Application::build(app_state, test::APP_ADDRESS)
            .await
            .expect("Failed to build app");
        let address = format!("http://{}", app.address.clone());

        #[allow(clippy::let_underscore_future)]
        let _ = tokio::spawn(app.run());

        let http_client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");

        Self {
            address,
            http_client,
            user_store,
            team_store,
            pull_request_store,
        }
    }

    pub async fn post_team_add<Body>(&self, body: &Body) -> Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/team/add", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_team(&self, team_name: &str) -> Response {
        self.http_client
            .get(format!("{}/team/get", &self.address))
            .query(&[("team_name", team_name)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_team_update<Body>(&self, body: &Body) -> Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .put(format!("{}/team/update", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_set_is_active(
        &self,
        user_id: &str,
        is_active: bool,
    ) -> Response {
        self.http_client
            .post(format!("{}/users/setIsActive", &self.address))
            .json(&serde_json::json!({
                "user_id": user_id,
                "is_active": is_active
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_review(&self, user_id: &str) -> Response {
        self.http_client
            .get(format!("{}/users/getReview", &self.address))
            .query(&[("user_id", user_id)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_stats(&self, user_id: &str) -> Response {
        self.http_client
            .get(format!("{}/users/stats", &self.address))
            .query(&[("user_id", user_id)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_pull_request_create<Body>(&self, body: &Body) -> Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/pullRequest/create", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_pull_request_merge(&self, pull_request_id: &str) -> Response {
        self.http_client
            .post(format!("{}/pullRequest/merge", &self.address))
            .json(&serde_json::json!({ "pull_request_id": pull_request_id }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_pull_request_reassign(
        &self,
        pull_request_id: &str,
        old_reviewer_id: &str,
    ) -> Response {
        self.http_client
            .post(format!("{}/pullRequest/reassign", &self.address))
            .json(&serde_json::json!({
                "pull_request_id": pull_request_id,
                "old_reviewer_id": old_reviewer_id
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

impl AsyncTestContext for TestApp {
    async fn setup() -> TestApp {
        TestApp::new().await
    }

    async fn teardown(self) {}
}

/// A freshly migrated database, dropped again on teardown. `pool` is `None`
/// when no `DATABASE_URL` is configured and the test has nothing to run
/// against.
pub struct PostgresTestDb {
    pub pool: Option<PgPool>,
    tmp_db_name: String,
}

impl PostgresTestDb {
    fn server_url() -> Option<Secret<String>> {
        dotenvy::dotenv().ok();
        std::env::var(env::DATABASE_URL_ENV_VAR)
            .ok()
            .filter(|url| !url.is_empty())
            .map(Secret::new)
    }
}

impl AsyncTestContext for PostgresTestDb {
    async fn setup() -> PostgresTestDb {
        let tmp_db_name = Uuid::new_v4().to_string();
        let pool = match Self::server_url() {
            Some(url) => Some(configure_postgresql(&url, &tmp_db_name).await),
            None => {
                eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
                None
            }
        };

        PostgresTestDb { pool, tmp_db_name }
    }

    async fn teardown(self) {
        if let (Some(pool), Some(url)) = (self.pool, Self::server_url()) {
            pool.close().await;
            delete_database(&url, &self.tmp_db_name).await;
        }
    }
}

async fn configure_postgresql(url: &Secret<String>, db_name: &str) -> PgPool {
    let server_options = PgConnectOptions::from_str(url.expose_secret())
        .expect("Failed to parse PostgreSQL connection string");

    let mut connection = PgConnection::connect_with(&server_options)
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
        .await
        .expect("Failed to create database.");

    let pool = PgPoolOptions::new()
        .max_connections(DATABASE_MAX_CONNECTIONS)
        .connect_with(server_options.database(db_name))
        .await
        .expect("Failed to create Postgres connection pool!");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to migrate the database");

    pool
}

async fn delete_database(url: &Secret<String>, db_name: &str) {
    let connection_options = PgConnectOptions::from_str(url.expose_secret())
        .expect("Failed to parse PostgreSQL connection string");

    let mut connection = PgConnection::connect_with(&connection_options)
        .await
        .expect("Failed to connect to Postgres");

    connection
        .execute(
            format!(
                r#"
                SELECT pg_terminate_backend(pg_stat_activity.pid)
                FROM pg_stat_activity
                WHERE pg_stat_activity.datname = '{}'
                  AND pid <> pg_backend_pid();
        "#,
                db_name
            )
            .as_str(),
        )
        .await
        .expect("Failed to drop the database.");

    connection
        .execute(format!(r#"DROP DATABASE "{}";"#, db_name).as_str())
        .await
        .expect("Failed to drop the database.");
}

pub async fn get_json_response_body(response: Response) -> Value {
    let body: Value = response
        .json()
        .await
        .expect("failed to parse response body JSON");
    body
}

/// Members given as (user_id, username, is_active).
pub fn team_body(team_name: &str, members: &[(&str, &str, bool)]) -> Value {
    let members: Vec<Value> = members
        .iter()
        .map(|(user_id, username, is_active)| {
            serde_json::json!({
                "user_id": user_id,
                "username": username,
                "is_active": is_active
            })
        })
        .collect();

    serde_json::json!({
        "team_name": team_name,
        "members": members
    })
}

pub async fn add_team(
    app: &mut TestApp,
    team_name: &str,
    members: &[(&str, &str, bool)],
) {
    let response = app.post_team_add(&team_body(team_name, members)).await;
    assert_eq!(
        response.status().as_u16(),
        201,
        "Failed to add team: {team_name}"
    );
}

pub async fn create_pull_request(
    app: &mut TestApp,
    pull_request_id: &str,
    author_id: &str,
) -> Value {
    let response = app
        .post_pull_request_create(&serde_json::json!({
            "pull_request_id": pull_request_id,
            "pull_request_name": format!("Change {pull_request_id}"),
            "author_id": author_id
        }))
        .await;

    assert_eq!(
        response.status().as_u16(),
        201,
        "Failed to create pull request: {pull_request_id}"
    );
    get_json_response_body(response).await
}

pub fn reviewers(pr_body: &Value) -> Vec<String> {
    pr_body["pr"]["assigned_reviewers"]
        .as_array()
        .expect("assigned_reviewers should be an array")
        .iter()
        .map(|id| id.as_str().unwrap().to_owned())
        .collect()
}

pub fn assert_error(body: &Value, code: &str) {
    assert_eq!(
        body["error"]["code"], code,
        "Unexpected error body: {body}"
    );
    assert!(
        body["error"]["message"].is_string(),
        "Error message missing: {body}"
    );
}

pub async fn backend_team(app: &mut TestApp) {
    add_team(
        app,
        "backend",
        &[("u1", "Alice", true), ("u2", "Bob", true), ("u3", "Charlie", true)],
    )
    .await;
}
