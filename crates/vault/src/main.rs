//! vault - Single-user credential vault
//!
//! Register an account, then store key/value properties behind it.
//!
//! Commands:
//! - register: Create an account (password prompted twice)
//! - login: Check credentials
//! - set <KEY> [VALUE]: Store a new property (prompts if no value)
//! - list: Show all properties
//! - update <KEY> <VALUE>: Replace an existing property
//! - delete <KEY>: Remove a property
//!
//! Property commands authenticate first: pass --email and enter the
//! password at the hidden prompt.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vault::{properties, AuthService, Paths, PropertyManager, RecordStore, User, VaultError};

#[derive(Parser)]
#[command(name = "vault")]
#[command(about = "Single-user credential vault - authenticated key/value property storage")]
#[command(version)]
#[command(after_help = r#"STORAGE:
    - Users:      <data-dir>/users.json
    - Properties: <data-dir>/properties.json
    - Default data dir is ~/.local/share/vault
    - Passwords are stored as Argon2id hashes, never plaintext

EXAMPLES:
    vault register --first-name Ada --last-name Lovelace --email ada@example.com
    vault set --email ada@example.com api_token
    vault list --email ada@example.com"#)]
struct Cli {
    /// Override the data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account (password entered at a hidden prompt, twice)
    Register {
        /// First name (letters only)
        #[arg(long)]
        first_name: String,
        /// Last name (letters only)
        #[arg(long)]
        last_name: String,
        /// Email address, used as the login key
        #[arg(long)]
        email: String,
    },

    /// Verify credentials for an account
    Login {
        /// Email address
        #[arg(long)]
        email: String,
    },

    /// Store a new property (prompts for the value if not provided)
    Set {
        /// Account email
        #[arg(long)]
        email: String,
        /// Property key (letters, digits, underscores)
        key: String,
        /// Property value (omit for a hidden prompt)
        value: Option<String>,
    },

    /// List stored properties
    List {
        /// Account email
        #[arg(long)]
        email: String,
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Replace the value of an existing property
    Update {
        /// Account email
        #[arg(long)]
        email: String,
        /// Property key
        key: String,
        /// New value
        value: String,
    },

    /// Delete a property
    Delete {
        /// Account email
        #[arg(long)]
        email: String,
        /// Property key
        key: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(|| Paths::new().data);
    let store = RecordStore::new(&data_dir)?;

    match cli.command {
        Commands::Register {
            first_name,
            last_name,
            email,
        } => cmd_register(&store, &first_name, &last_name, &email),
        Commands::Login { email } => cmd_login(&store, &email),
        Commands::Set { email, key, value } => cmd_set(&store, &email, &key, value),
        Commands::List { email, json } => cmd_list(&store, &email, json),
        Commands::Update { email, key, value } => cmd_update(&store, &email, &key, &value),
        Commands::Delete { email, key } => cmd_delete(&store, &email, &key),
    }
}

/// Register a new account
fn cmd_register(store: &RecordStore, first_name: &str, last_name: &str, email: &str) -> Result<()> {
    let auth = AuthService::new(store);

    let password =
        rpassword::prompt_password("Enter password: ").context("Failed to read password")?;
    let confirm =
        rpassword::prompt_password("Confirm password: ").context("Failed to read password")?;

    if password != confirm {
        bail!("Passwords don't match");
    }

    match auth.register(first_name, last_name, email, &password) {
        Ok(user) => {
            println!("Registration successful! Welcome {}", user.first_name);
            Ok(())
        }
        Err(e) => bail!("Registration failed: {}", e),
    }
}

/// Check credentials
fn cmd_login(store: &RecordStore, email: &str) -> Result<()> {
    let user = authenticate(store, email)?;
    println!("Login successful! Welcome {}", user.first_name);
    Ok(())
}

/// Store a new property
fn cmd_set(store: &RecordStore, email: &str, key: &str, value: Option<String>) -> Result<()> {
    let user = authenticate(store, email)?;

    if !properties::valid_key(key) {
        bail!("Key must contain only letters, numbers, and underscores");
    }

    // Get value - prompt if not provided
    let value = match value {
        Some(v) => v,
        None => rpassword::prompt_password("Enter value: ").context("Failed to read value")?,
    };

    if value.trim().is_empty() {
        bail!("Value cannot be blank");
    }

    let manager = PropertyManager::new(store, &user.id);
    match manager.create(key, &value) {
        Ok(()) => {
            println!("Property stored successfully!");
            Ok(())
        }
        Err(VaultError::AlreadyExists(_)) => {
            bail!("Key already exists. Use update instead.")
        }
        Err(e) => bail!("Failed to store property: {}", e),
    }
}

/// List stored properties
fn cmd_list(store: &RecordStore, email: &str, json: bool) -> Result<()> {
    let user = authenticate(store, email)?;

    let manager = PropertyManager::new(store, &user.id);
    let props = manager.list();

    if json {
        println!("{}", serde_json::to_string_pretty(&props)?);
        return Ok(());
    }

    if props.is_empty() {
        println!("No properties stored. Add one with: vault set --email {} <key>", email);
        return Ok(());
    }

    let mut keys: Vec<&String> = props.keys().collect();
    keys.sort();

    println!("Stored Properties");
    println!();
    for key in keys {
        println!("  {} = {}", key, props[key]);
    }

    Ok(())
}

/// Replace an existing property value
fn cmd_update(store: &RecordStore, email: &str, key: &str, value: &str) -> Result<()> {
    let user = authenticate(store, email)?;

    if value.trim().is_empty() {
        bail!("Value cannot be blank");
    }

    let manager = PropertyManager::new(store, &user.id);

    if let Some(current) = manager.list().get(key) {
        println!("Current value: {}", current);
    }

    match manager.update(key, value) {
        Ok(()) => {
            println!("Property updated successfully!");
            Ok(())
        }
        Err(VaultError::NotFound(_)) => bail!("Key not found: {}", key),
        Err(e) => bail!("Failed to update property: {}", e),
    }
}

/// Delete a property
fn cmd_delete(store: &RecordStore, email: &str, key: &str) -> Result<()> {
    let user = authenticate(store, email)?;

    let manager = PropertyManager::new(store, &user.id);
    match manager.delete(key) {
        Ok(()) => {
            println!("Property deleted successfully!");
            Ok(())
        }
        Err(VaultError::NotFound(_)) => bail!("Key not found: {}", key),
        Err(e) => bail!("Failed to delete property: {}", e),
    }
}

/// Prompt for the password and authenticate
///
/// The failure message is the same whether the email is unknown or the
/// password is wrong.
fn authenticate(store: &RecordStore, email: &str) -> Result<User> {
    let auth = AuthService::new(store);

    let password =
        rpassword::prompt_password("Enter password: ").context("Failed to read password")?;

    auth.login(email, &password)
        .ok_or_else(|| anyhow!("Invalid credentials. Please try again."))
}
