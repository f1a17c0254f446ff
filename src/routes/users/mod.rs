mod get_review;
mod get_stats;
mod set_is_active;

pub use get_review::*;
pub use get_stats::*;
pub use set_is_active::*;
