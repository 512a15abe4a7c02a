//! Authentication

mod bootstrap;
mod errors;
mod models;
mod password;
mod service;
mod token;

pub use bootstrap::*;
pub use errors::*;
pub use models::*;
pub use password::MIN_PASSWORD_LENGTH;
pub use service::*;
pub use token::*;
