use std::sync::Arc;

use clap::Args;
use jiff::SignedDuration;
use versatil_app::{
    auth::{AuthService, TokenAuthService, TokenSecret, TokenSigner},
    database::Db,
    domain::users::{PgUsersService, UsersService},
};

#[derive(Debug, Args)]
pub(crate) struct IssueTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Email address of the user the token is for
    #[arg(long)]
    email: String,

    /// Identity token signing secret
    #[arg(long, env = "TOKEN_SECRET", hide_env_values = true)]
    token_secret: String,

    /// Token lifetime in seconds
    #[arg(long, env = "TOKEN_TTL_SECONDS", default_value_t = 86_400)]
    token_ttl_seconds: i64,
}

pub(crate) async fn run(args: IssueTokenArgs) -> Result<(), String> {
    let signer = TokenSecret::new(args.token_secret)
        .and_then(|secret| {
            TokenSigner::new(secret, SignedDuration::from_secs(args.token_ttl_seconds))
        })
        .map_err(|error| format!("invalid token settings: {error}"))?;

    let pool = crate::cli::connect(&args.database_url).await?;
    let users = Arc::new(PgUsersService::new(Db::new(pool)));

    let user = users
        .find_user_by_email(&args.email)
        .await
        .map_err(|error| format!("failed to look up user: {error}"))?
        .ok_or_else(|| format!("no user with email {}", args.email))?;

    let session = TokenAuthService::new(users, signer)
        .issue_token(user.uuid)
        .await
        .map_err(|error| format!("failed to issue token: {error}"))?;

    println!("user_uuid: {}", session.user_uuid);
    println!("role: {}", session.role);
    println!("token_expires_at: {}", session.token.expires_at);
    println!("token: {}", session.token.token);

    Ok(())
}
