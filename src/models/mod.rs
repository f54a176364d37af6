pub mod task;
pub mod assigned;
pub mod auth;

pub use task::*;
pub use assigned::*;
pub use auth::*;
