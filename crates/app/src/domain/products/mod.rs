//! Products

pub mod errors;
pub mod memory;
pub mod models;
mod repository;
pub mod service;

pub use errors::ProductsServiceError;
pub use memory::MemoryProductsService;
pub use service::*;
