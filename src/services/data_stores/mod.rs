pub mod hashmap_pull_request_store;
pub mod hashmap_team_store;
pub mod hashmap_user_store;
pub mod postgres_pull_request_store;
pub mod postgres_team_store;
pub mod postgres_user_store;

pub use hashmap_pull_request_store::*;
pub use hashmap_team_store::*;
pub use hashmap_user_store::*;
pub use postgres_pull_request_store::*;
pub use postgres_team_store::*;
pub use postgres_user_store::*;
