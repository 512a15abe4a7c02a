//! Storage Config

use clap::{Args, ValueEnum};

/// Where carts, products and users are kept.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StorageBackend {
    /// `PostgreSQL` via `DATABASE_URL`.
    Postgres,

    /// Process memory; state is lost on restart.
    Memory,
}

/// Storage settings.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Storage backend (postgres, memory)
    #[arg(
        long = "storage-backend",
        env = "STORAGE_BACKEND",
        value_enum,
        default_value_t = StorageBackend::Postgres
    )]
    pub backend: StorageBackend,

    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    pub database_max_connections: u32,

    /// Seconds to wait for a pooled connection before failing the request
    #[arg(long, env = "DATABASE_ACQUIRE_TIMEOUT_SECONDS", default_value_t = 5)]
    pub database_acquire_timeout_seconds: u64,

    /// Apply pending migrations at startup
    #[arg(
        long,
        env = "DATABASE_RUN_MIGRATIONS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub database_run_migrations: bool,
}
