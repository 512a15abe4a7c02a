//! Auth Config

use clap::Args;

/// Identity token and admin bootstrap settings.
#[derive(Args)]
pub struct AuthConfig {
    /// Secret used to sign identity tokens (at least 32 bytes)
    #[arg(long, env = "TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: String,

    /// Identity token lifetime in seconds
    #[arg(long, env = "TOKEN_TTL_SECONDS", default_value_t = 86_400)]
    pub token_ttl_seconds: u64,

    /// Email of the admin account to ensure at startup
    #[arg(long, env = "ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    /// Password for the admin account created at startup
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Display name for the admin account created at startup
    #[arg(long, env = "ADMIN_NAME", default_value = "Administrator")]
    pub admin_name: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"**redacted**")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("admin_email", &self.admin_email)
            .field("admin_name", &self.admin_name)
            .finish_non_exhaustive()
    }
}
