//! ShopSphere CLI - Database migrations, indexes, seeding and user management.
//!
//! # Usage
//!
//! ```bash
//! # Run relational migrations
//! shopsphere-cli migrate
//!
//! # Create document-store indexes
//! shopsphere-cli indexes
//!
//! # Load the demo data set (users, catalog, orders, reviews, comments)
//! shopsphere-cli seed
//!
//! # Create an account with any role
//! shopsphere-cli user create -e admin@shopsphere.it -p 'S3cure!pass' \
//!     --first-name Marco --last-name Rossi -r admin
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPSPHERE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `MONGODB_URI` - `MongoDB` connection string (default: `mongodb://127.0.0.1:27017`)
//! - `MONGODB_DATABASE` - `MongoDB` database name (default: `shopsphere`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shopsphere-cli")]
#[command(author, version, about = "ShopSphere CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run relational database migrations
    Migrate,
    /// Create document-store indexes
    Indexes,
    /// Seed both stores with demo data
    Seed {
        /// Only seed the relational store
        #[arg(long)]
        skip_documents: bool,
    },
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(short, long)]
        password: String,

        /// First name
        #[arg(long)]
        first_name: String,

        /// Last name
        #[arg(long)]
        last_name: String,

        /// Role (`customer`, `admin`, `seller`)
        #[arg(short, long, default_value = "customer")]
        role: String,
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

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Indexes => commands::seed::indexes().await?,
        Commands::Seed { skip_documents } => commands::seed::run(skip_documents).await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                password,
                first_name,
                last_name,
                role,
            } => {
                commands::user::create(&email, &password, &first_name, &last_name, &role).await?;
            }
        },
    }
    Ok(())
}
