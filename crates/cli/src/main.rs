//! Pedidos CLI - database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! pedidos-cli migrate
//!
//! # Ensure the admin@sys.com account exists
//! pedidos-cli bootstrap
//!
//! # Create a user
//! pedidos-cli user create -e maria@example.com -n "Maria" -r user -p s3cret
//! ```
//!
//! All commands read the same environment as the server
//! (`PEDIDOS_DATABASE_URL`, `PEDIDOS_ADMIN_PASSWORD`, ...).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pedidos-cli")]
#[command(author, version, about = "Pedidos order desk tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Apply migrations and create the admin@sys.com account if missing
    Bootstrap,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`admin` or `user`)
        #[arg(short, long, default_value = "user")]
        role: String,

        /// Initial password
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Bootstrap => commands::bootstrap::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                role,
                password,
            } => {
                commands::user::create(&email, &name, &role, &password).await?;
            }
        },
    }
    Ok(())
}
