pub mod auth;
pub mod board;

pub use auth::{LoginView, SignupView};
pub use board::TaskBoard;
