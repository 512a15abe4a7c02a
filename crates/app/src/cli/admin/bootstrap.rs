use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD as BASE64};
use clap::Args;
use rand::{RngCore, rngs::OsRng};
use versatil_app::{
    auth::{AdminSeed, BootstrapOutcome, ensure_admin},
    database::Db,
    domain::users::PgUsersService,
};

const GENERATED_PASSWORD_BYTES: usize = 18;

#[derive(Debug, Args)]
pub(crate) struct BootstrapArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Admin email address
    #[arg(long, env = "ADMIN_EMAIL")]
    email: String,

    /// Admin display name
    #[arg(long, env = "ADMIN_NAME", default_value = "Administrator")]
    name: String,

    /// Optional admin password; generated when omitted
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

pub(crate) async fn run(args: BootstrapArgs) -> Result<(), String> {
    let pool = crate::cli::connect(&args.database_url).await?;
    let users = PgUsersService::new(Db::new(pool));

    let (password, generated) = match args.password {
        Some(password) => (password, false),
        None => (generate_password(), true),
    };

    let outcome = ensure_admin(
        &users,
        &AdminSeed {
            email: args.email.clone(),
            name: args.name,
            password: password.clone(),
        },
    )
    .await
    .map_err(|error| format!("failed to bootstrap admin: {error}"))?;

    match outcome {
        BootstrapOutcome::Created(uuid) => {
            println!("admin_uuid: {uuid}");
            println!("admin_email: {}", args.email.trim().to_lowercase());

            if generated {
                println!("admin_password: {password}");
                println!("store this password now; it is only shown once");
            }
        }
        BootstrapOutcome::AlreadyPresent => {
            println!("admin account already present; nothing to do");
        }
    }

    Ok(())
}

fn generate_password() -> String {
    let mut bytes = [0_u8; GENERATED_PASSWORD_BYTES];

    OsRng.fill_bytes(&mut bytes);

    BASE64.encode(bytes)
}
