mod add_team;
mod get_team;
mod update_team;

pub use add_team::*;
pub use get_team::*;
pub use update_team::*;
