//! Authentication for the task API

pub mod token;
pub mod users;

pub use token::{Claims, TokenService};
pub use users::UserRegistry;
