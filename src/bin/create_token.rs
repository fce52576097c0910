use std::io::{self, Write};

use clap::Parser;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::postgres::PgPoolOptions;

use campaign_api::auth::hash_token;

#[derive(Parser, Debug)]
#[command(
    name = "create_token",
    about = "Create a dashboard user (if needed) and issue an API token"
)]
struct Args {
    /// Email address of the account (case insensitive).
    #[arg(long)]
    email: String,

    /// Optional display name to associate with the account.
    #[arg(long)]
    display_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();
    let email = args.email.trim().to_lowercase();

    if !email.contains('@') {
        writeln!(io::stderr(), "error: email must contain '@'")?;
        std::process::exit(1);
    }

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    let mut tx = pool.begin().await?;

    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&mut *tx)
        .await?;

    let user_id: i32 = match existing {
        Some(id) => id,
        None => {
            sqlx::query_scalar(
                "INSERT INTO users (email, display_name) VALUES ($1, $2) RETURNING id",
            )
            .bind(&email)
            .bind(args.display_name.as_deref())
            .fetch_one(&mut *tx)
            .await?
        }
    };

    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect();

    sqlx::query("INSERT INTO api_tokens (user_id, token_hash) VALUES ($1, $2)")
        .bind(user_id)
        .bind(hash_token(&token))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    log::info!("issued token for user {user_id} ({email})");
    println!("{token}");

    Ok(())
}
