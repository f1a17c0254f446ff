pub mod data_stores;
pub mod membership_registry;
pub mod pull_request_lifecycle;
pub mod reviewer_pool;
pub mod statistics;
