//! Offline admin account management.
//!
//! Works directly on the data file, so it can create the first admin when
//! the server was started without bootstrap credentials.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use betteh::api::admins::create_admin;
use betteh::config::AppConfig;
use betteh::db::store::JsonStore;

#[derive(Parser, Debug)]
#[command(name = "betteh-admin", about = "Manage Betteh admin accounts")]
struct Cli {
    /// Data file to operate on (defaults to the configured one)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new admin account
    AddAdmin {
        #[arg(long)]
        username: String,
        /// Falls back to BETTEH_NEW_ADMIN_PASSWORD so it stays out of shell history
        #[arg(long, env = "BETTEH_NEW_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List admin usernames
    ListAdmins,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "betteh=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let data_file = match cli.data_file {
        Some(path) => path,
        None => AppConfig::load()?.data_file,
    };
    let store = JsonStore::open(&data_file).await?;

    match cli.command {
        Command::AddAdmin { username, password } => {
            let admin = create_admin(&store, &username, &password).await?;
            println!("Created admin '{}' in {}", admin.username, data_file.display());
        }
        Command::ListAdmins => {
            let data = store.load().await?;
            if data.admins.is_empty() {
                println!("No admin accounts in {}", data_file.display());
            }
            for admin in &data.admins {
                println!("{}", admin.username);
            }
        }
    }

    Ok(())
}
