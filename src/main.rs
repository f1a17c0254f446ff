use std::sync::Arc;

use review_assigner::{
    app_state::AppState,
    get_postgres_pool,
    services::data_stores::{
        HashmapPullRequestStore, HashmapTeamStore, HashmapUserStore,
        PostgresPullRequestStore, PostgresTeamStore, PostgresUserStore,
    },
    utils::{
        constants::{
            StorageBackend, APP_ADDRESS, DATABASE_URL, SEED_DEMO_DATA,
            STORAGE_BACKEND,
        },
        seed::seed_demo_data,
        tracing::init_tracing,
    },
    Application,
};
use sqlx::PgPool;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let app_state = match *STORAGE_BACKEND {
        StorageBackend::Postgres => {
            let pg_pool = configure_postgresql().await?;
            AppState::new(
                Arc::new(RwLock::new(PostgresUserStore::new(pg_pool.clone()))),
                Arc::new(RwLock::new(PostgresTeamStore::new(pg_pool.clone()))),
                Arc::new(RwLock::new(PostgresPullRequestStore::new(pg_pool))),
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on exit");
            AppState::new(
                Arc::new(RwLock::new(HashmapUserStore::default())),
                Arc::new(RwLock::new(HashmapTeamStore::default())),
                Arc::new(RwLock::new(HashmapPullRequestStore::default())),
            )
        }
    };

    if *SEED_DEMO_DATA {
        seed_demo_data(&app_state).await?;
    }

    let app = Application::build(app_state, APP_ADDRESS.as_str())
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Failed to build app: {e}"))?;

    app.run().await?;
    Ok(())
}

async fn configure_postgresql() -> color_eyre::Result<PgPool> {
    let pg_pool = get_postgres_pool(&DATABASE_URL).await?;

    sqlx::migrate!().run(&pg_pool).await?;
    tracing::info!("Database migrations completed");

    Ok(pg_pool)
}
