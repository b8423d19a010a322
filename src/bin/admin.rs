//! CLI administration tool for student-login.
//!
//! Provides commands for provisioning student accounts and performing
//! database operations without going through the web form.
//!
//! # Usage
//!
//! ```bash
//! # Create a student account (prompts for missing fields)
//! cargo run --bin admin -- student create
//!
//! # Non-interactive
//! cargo run --bin admin -- student create --name "Ada" --email ada@example.com --password s3cret -y
//!
//! # List accounts
//! cargo run --bin admin -- student list
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//!
//! # Features
//!
//! - **Account Provisioning**: Argon2-hashed passwords, never stored in plaintext
//! - **Database Tools**: Connection checks and info queries
//! - **Interactive Prompts**: Hidden password entry with confirmation
//! - **Colored Output**: Terminal-friendly formatting using `colored` crate

use student_login::domain::credentials::account_email;
use student_login::domain::entities::NewUser;
use student_login::domain::repositories::UserRepository;
use student_login::infrastructure::persistence::PgUserRepository;
use student_login::utils::password::hash_password;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing student-login.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage student accounts
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Student account subcommands.
#[derive(Subcommand)]
enum StudentAction {
    /// Create a new student account
    Create {
        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Login email
        #[arg(short, long)]
        email: Option<String>,

        /// Plaintext password (prompted without echo if omitted)
        #[arg(short, long)]
        password: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all student accounts
    List,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Connect to database
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Student { action } => handle_student_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches student account commands.
async fn handle_student_action(action: StudentAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    match action {
        StudentAction::Create {
            name,
            email,
            password,
            yes,
        } => {
            create_student(repo, name, email, password, yes).await?;
        }
        StudentAction::List => {
            list_students(repo).await?;
        }
    }

    Ok(())
}

/// Creates a student account with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for name, email and password (or use provided)
/// 2. Normalize the email as the login form does, rejecting what it rejects
/// 3. Confirm creation (unless `--yes` flag)
/// 4. Hash the password with Argon2
/// 5. Store in database
async fn create_student(
    repo: Arc<PgUserRepository>,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create Student Account".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    // Stored exactly as the login form will look it up.
    let email = account_email(&email)
        .map_err(|e| anyhow::anyhow!("'{}' cannot be used: {}", email.trim(), e))?;

    let password = match password {
        Some(p) => {
            println!("{}", "⚠️  Password given on the command line".yellow());
            p
        }
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?,
    };

    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }

    println!();
    println!("{}", "Account details:".bright_white().bold());
    println!("  Name:  {}", name.cyan());
    println!("  Email: {}", email.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this account?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let user = repo
        .create(&NewUser {
            name,
            email,
            password_hash,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create account: {}", e))?;

    println!();
    println!(
        "{} (id {})",
        "✅ Account created successfully!".green().bold(),
        user.id.to_string().bright_white()
    );
    println!();

    Ok(())
}

/// Lists all student accounts.
///
/// # Output Format
///
/// ```text
/// 📋 Students
///
///   ID  Name                           Email
///   ─────────────────────────────────────────────────────────────────────
///   1   Ada Lovelace                   ada@example.com
/// ```
async fn list_students(repo: Arc<PgUserRepository>) -> Result<()> {
    println!("{}", "📋 Students".bright_blue().bold());
    println!();

    let students = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list students: {}", e))?;

    if students.is_empty() {
        println!("{}", "  No students found".yellow());
        println!();
        println!(
            "  Create one with: {} admin student create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<3} {:<30} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Email".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for student in &students {
        println!(
            "  {:<3} {:<30} {}",
            student.id.to_string().bright_black(),
            student.name.cyan(),
            student.email
        );
    }

    println!();
    println!(
        "  Total: {}",
        students.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let students: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM student")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Students:   {}",
                students.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
