use clap::{Parser, Subcommand};
use versatil_app::database::{self, PoolSettings};

mod admin;
mod db;
mod token;

#[derive(Debug, Parser)]
#[command(name = "versatil-app", about = "Versatil CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Admin(admin::AdminCommand),
    Token(token::TokenCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Admin(command) => admin::run(command).await,
            Commands::Token(command) => token::run(command).await,
        }
    }
}

async fn connect(database_url: &str) -> Result<sqlx::PgPool, String> {
    database::connect(database_url, &PoolSettings::default())
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}
