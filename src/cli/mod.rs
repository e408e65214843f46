// CLI interface
pub mod commands;

use crate::auth::AuthManager;
use crate::config::Config;
use crate::error::{DeskError, Result};
use crate::roster::StatusFilter;
use crate::store::{FileStore, Repository};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "swapdesk")]
#[command(about = "Customer desk for bike and battery-swap rentals", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding desk data (overrides config and SWAPDESK_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in to the desk
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "SWAPDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out of the desk
    Logout,

    /// Customer counts and plans expiring this week
    Dashboard {
        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the plan catalog
    Plans {
        #[arg(long)]
        json: bool,
    },

    /// List battery-swap stations
    Stations {
        #[arg(long)]
        json: bool,
    },

    /// Manage the customer roster
    Customers {
        #[command(subcommand)]
        command: CustomerCommand,
    },

    /// Plan expiry alerts
    Alerts {
        #[command(subcommand)]
        command: AlertCommand,
    },

    /// Keep running and check for expiring plans on a schedule
    Watch,

    /// Operator profile and ride history
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustomerCommand {
    /// List customers
    List {
        /// Match against name, email or phone
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,

        #[arg(long)]
        json: bool,
    },

    /// Enroll a new customer on a plan
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        address: Option<String>,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,

        /// Plan id, see `swapdesk plans`
        #[arg(long)]
        plan: String,

        /// First day of the plan (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start_date: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AlertCommand {
    /// Show stored alerts
    List {
        /// Only unread alerts
        #[arg(long)]
        unread: bool,

        #[arg(long)]
        json: bool,
    },

    /// Run the expiry check once and store new alerts
    Check,

    /// Mark an alert as read
    Read {
        /// Alert id, e.g. expiry-warning-sub-123
        id: String,
    },

    /// Remove all alerts
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Show the operator profile and ride history
    Show,

    /// Update profile fields
    Edit {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        avatar: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a commented sample config file
    Init,

    /// Show where the config file lives and whether it loads
    Path,
}

#[derive(Debug, Clone, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Loaded configuration plus the store it points at
pub struct Desk {
    pub config: Config,
    pub repo: Repository<FileStore>,
}

impl Desk {
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::load()?;
        if let Some(dir) = data_dir {
            config.storage.data_dir = Some(dir);
        }

        let store = FileStore::new(config.data_dir()?)?;
        tracing::debug!("Using data directory {}", store.data_dir().display());

        Ok(Self {
            config,
            repo: Repository::new(store),
        })
    }

    pub fn auth(&self) -> AuthManager<'_, FileStore> {
        AuthManager::new(&self.repo, &self.config.auth)
    }

    /// Open the desk for a command that needs a logged-in operator
    pub fn open_authenticated(data_dir: Option<PathBuf>) -> Result<Self> {
        let desk = Self::open(data_dir)?;
        desk.auth().require_login()?;
        Ok(desk)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| DeskError::InvalidDate(raw.to_string()))
}

pub async fn execute(args: Cli) -> Result<()> {
    let data_dir = args.data_dir;

    match args.command {
        Commands::Login { username, password } => {
            commands::login::execute(Desk::open(data_dir)?, &username, &password)
        }
        Commands::Logout => commands::logout::execute(Desk::open(data_dir)?),
        Commands::Config { command } => commands::config::execute(command),
        Commands::Completions { shell } => {
            commands::completions::execute(shell);
            Ok(())
        }
        Commands::Dashboard { json } => {
            commands::dashboard::execute(&Desk::open_authenticated(data_dir)?, json)
        }
        Commands::Plans { json } => commands::plans::execute(&Desk::open_authenticated(data_dir)?, json),
        Commands::Stations { json } => {
            commands::stations::execute(&Desk::open_authenticated(data_dir)?, json)
        }
        Commands::Customers { command } => {
            commands::customers::execute(&Desk::open_authenticated(data_dir)?, command)
        }
        Commands::Alerts { command } => {
            commands::alerts::execute(&Desk::open_authenticated(data_dir)?, command)
        }
        Commands::Watch => commands::watch::execute(Desk::open_authenticated(data_dir)?).await,
        Commands::Profile { command } => {
            commands::profile::execute(&Desk::open_authenticated(data_dir)?, command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_customer_add() {
        let cli = Cli::try_parse_from([
            "swapdesk",
            "customers",
            "add",
            "--name",
            "Divya",
            "--email",
            "divya@example.com",
            "--phone",
            "98450",
            "--plan",
            "weekly-basic",
        ])
        .unwrap();

        match cli.command {
            Commands::Customers {
                command: CustomerCommand::Add { plan, start_date, .. },
            } => {
                assert_eq!(plan, "weekly-basic");
                assert!(start_date.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_status_filter_values() {
        let cli = Cli::try_parse_from(["swapdesk", "customers", "list", "--status", "expired"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Customers {
                command: CustomerCommand::List {
                    status: StatusFilter::Expired,
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(matches!(parse_date("29/02/2024"), Err(DeskError::InvalidDate(_))));
    }
}
