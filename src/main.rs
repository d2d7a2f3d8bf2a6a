//! Demo walk through the user store: create, insert, read, update, delete, list.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_sqlite::sqlite::{DEFAULT_DB_PATH, DEFAULT_TABLE};
use user_sqlite::{StoreConfig, User, UserStore};

#[derive(Parser, Debug)]
#[command(name = "user-sqlite")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(short, long, default_value = DEFAULT_DB_PATH, env = "USERS_DB_PATH")]
    database: String,

    /// Table holding the user records
    #[arg(short, long, default_value = DEFAULT_TABLE, env = "USERS_TABLE")]
    table: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    println!("{}", user_sqlite::hello_world());

    let store = match UserStore::open(StoreConfig::new(cli.database, cli.table)) {
        Ok(store) => store,
        Err(err) => {
            println!("Failed to open the database: {err}");
            return;
        }
    };

    if let Err(err) = run(&store) {
        println!("{err:#}");
    }
}

fn run(store: &UserStore) -> anyhow::Result<()> {
    store
        .create_table()
        .context("Failed to create the user table")?;
    println!("User table created successfully");

    let id = store
        .insert(&User::new("testuser", "testuser@example.com"))
        .context("Failed to insert the user")?;
    println!("Inserted user {id}");

    let user = store
        .select(id)
        .with_context(|| format!("Failed to select user {id}"))?;
    println!("Selected user: {user}");

    let updated = User {
        username: "updated_user".to_string(),
        email: "updated_user@example.com".to_string(),
        ..user
    };
    store
        .update(&updated)
        .with_context(|| format!("Failed to update user {id}"))?;
    println!("Updated user {id}");

    store
        .delete(id)
        .with_context(|| format!("Failed to delete user {id}"))?;
    println!("Deleted user {id}");

    match store.select_all() {
        Ok(users) => {
            println!("All users:");
            for user in &users {
                println!("{}", serde_json::to_string(user)?);
            }
        }
        Err(err) => println!("Failed to select all users: {err}"),
    }

    Ok(())
}
