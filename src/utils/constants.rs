use dotenvy::dotenv;
use lazy_static::lazy_static;
use secrecy::Secret;
use std::env as std_env;

lazy_static! {
    pub static ref DATABASE_URL: Secret<String> = get_db_url();
    pub static ref APP_ADDRESS: String =
        load_or_default(env::APP_ADDRESS_ENV_VAR, prod::APP_ADDRESS);
    pub static ref STORAGE_BACKEND: StorageBackend = set_storage_backend();
    pub static ref SEED_DEMO_DATA: bool = set_seed_demo_data();
}

/// Where the service keeps its teams, users and pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

fn load_env() {
    dotenv().ok();
}

fn get_db_url() -> Secret<String> {
    load_env();
    let db_url = std_env::var(env::DATABASE_URL_ENV_VAR)
        .expect("DATABASE_URL must be set.");
    if db_url.is_empty() {
        panic!("DATABASE_URL must not be empty.");
    }
    Secret::new(db_url)
}

fn set_storage_backend() -> StorageBackend {
    let backend = load_or_default(env::STORAGE_BACKEND_ENV_VAR, "postgres");
    match backend.to_lowercase().as_str() {
        "postgres" => StorageBackend::Postgres,
        "memory" => StorageBackend::Memory,
        other => panic!("STORAGE_BACKEND must be postgres or memory, got {other}"),
    }
}

fn set_seed_demo_data() -> bool {
    let seed = load_or_default(env::SEED_DEMO_DATA_ENV_VAR, "false");
    matches!(seed.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn load_or_default(variable_name: &str, default_value: &str) -> String {
    load_env();

    match std_env::var(variable_name) {
        Ok(value) => {
            if value.is_empty() {
                String::from(default_value)
            } else {
                value
            }
        }
        Err(_) => String::from(default_value),
    }
}

pub mod env {
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    pub const APP_ADDRESS_ENV_VAR: &str = "APP_ADDRESS";
    pub const STORAGE_BACKEND_ENV_VAR: &str = "STORAGE_BACKEND";
    pub const SEED_DEMO_DATA_ENV_VAR: &str = "SEED_DEMO_DATA";
}

pub const DATABASE_MAX_CONNECTIONS: u32 = 5;

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:8080";
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
}
