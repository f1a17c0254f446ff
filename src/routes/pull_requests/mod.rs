mod create;
mod merge;
mod reassign;

pub use create::*;
pub use merge::*;
pub use reassign::*;
