use clap::{Args, Subcommand};

mod bootstrap;

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// Create the admin account if it does not exist yet
    Bootstrap(bootstrap::BootstrapArgs),
}

pub(crate) async fn run(command: AdminCommand) -> Result<(), String> {
    match command.command {
        AdminSubcommand::Bootstrap(args) => bootstrap::run(args).await,
    }
}
