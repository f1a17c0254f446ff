pub mod constants;
pub mod seed;
pub mod tracing;
