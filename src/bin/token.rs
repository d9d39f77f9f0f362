use clap::Parser;
use slotlist_api::{
    auth::{generate_jwt, UserClaims},
    config::AppConfig,
};
use uuid::Uuid;

/// Mint a signed JWT for local testing, using the current environment's JWT settings
#[derive(Parser, Debug)]
#[command(name = "slotlist-token", version)]
struct Args {
    /// User uid, random when omitted
    #[arg(long)]
    uid: Option<Uuid>,

    #[arg(long, default_value = "developer")]
    nickname: String,

    /// Granted permission, repeatable (`--permission community.abc.leader --permission admin.*`)
    #[arg(long = "permission", short = 'p')]
    permissions: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = AppConfig::from_env();

    let user = UserClaims {
        uid: args.uid.unwrap_or_else(Uuid::new_v4),
        nickname: args.nickname,
        community: None,
        steam_id: None,
    };

    let token = generate_jwt(&config.jwt, user, args.permissions)?;
    println!("{token}");

    Ok(())
}
