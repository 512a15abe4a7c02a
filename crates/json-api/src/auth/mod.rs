//! Authentication

mod errors;
pub(crate) mod handlers;
pub(crate) mod middleware;

pub(crate) use errors::*;
pub(crate) use handlers::*;
