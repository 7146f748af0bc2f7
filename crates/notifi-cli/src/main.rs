//! Notifi CLI - Command-line interface for Notifi.

mod commands;
mod ui;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::alerts::AlertsAction;
use commands::config::ConfigAction;
use commands::targets::EnsureTargetsArgs;
use commands::tenant::TenantAction;

#[derive(Parser)]
#[command(name = "notifi")]
#[command(about = "Notifi - notifications for web3 apps")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration get/set
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },

    /// Show configuration and session status
    Status,

    /// Log in the configured wallet by transaction
    Login {
        /// Log in even if a session exists
        #[arg(long)]
        force: bool,
    },

    /// Delete the stored session
    Logout {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show notification history
    History {
        /// Page size
        #[arg(long)]
        first: Option<u32>,

        /// Cursor from a previous page
        #[arg(long)]
        after: Option<String>,
    },

    /// Alert management
    Alerts {
        #[command(subcommand)]
        action: AlertsCommands,
    },

    /// Target management
    Targets {
        #[command(subcommand)]
        action: TargetsCommands,
    },

    /// Tenant messaging (service credentials)
    Tenant {
        /// Service ID
        #[arg(long, env = "NOTIFI_SID", global = true)]
        sid: Option<String>,

        #[command(subcommand)]
        action: TenantCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., http.timeoutSecs)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., env)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show full configuration
    Show,

    /// Validate configuration
    Validate,

    /// Create configuration interactively
    Init,
}

#[derive(Subcommand)]
enum AlertsCommands {
    /// List alerts
    List,

    /// Delete an alert
    Delete {
        /// Alert ID
        id: String,

        /// Also delete the alert's source and target groups
        #[arg(long)]
        with_groups: bool,

        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum TargetsCommands {
    /// Make a target group hold exactly the given destinations
    Ensure {
        /// Target group name
        #[arg(long, default_value = "Default")]
        name: String,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Phone number in E.164 format
        #[arg(long)]
        phone: Option<String>,

        /// Telegram handle
        #[arg(long)]
        telegram: Option<String>,

        /// Webhook URL
        #[arg(long)]
        webhook_url: Option<String>,

        /// Webhook payload format: json, plain-text or discord
        #[arg(long, default_value = "json")]
        webhook_format: String,

        /// Webhook header as key=value (repeatable)
        #[arg(long = "header")]
        headers: Vec<String>,

        /// Discord target name
        #[arg(long)]
        discord: Option<String>,
    },
}

#[derive(Subcommand)]
enum TenantCommands {
    /// Send a direct message to one wallet
    Push {
        /// Message key (idempotency)
        #[arg(long)]
        key: String,

        /// Recipient wallet public key
        #[arg(long)]
        wallet: String,

        /// Recipient blockchain (e.g., ETHEREUM)
        #[arg(long)]
        blockchain: String,

        /// Message body
        #[arg(long)]
        message: String,

        /// Tenant-defined message type
        #[arg(long = "type")]
        message_type: Option<String>,
    },

    /// Broadcast to a topic
    Broadcast {
        /// Topic name
        #[arg(long)]
        topic: String,

        /// Subject
        #[arg(long)]
        subject: String,

        /// Message body
        #[arg(long)]
        message: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    if let Err(e) = run(cli.command).await {
        ui::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(command: Option<Commands>) -> anyhow::Result<()> {
    // No command: show status
    let Some(command) = command else {
        return commands::run_status().await;
    };

    match command {
        Commands::Config { action } => {
            let action = match action {
                Some(ConfigCommands::Get { key }) => ConfigAction::Get { key },
                Some(ConfigCommands::Set { key, value }) => ConfigAction::Set { key, value },
                Some(ConfigCommands::Show) | None => ConfigAction::Show,
                Some(ConfigCommands::Validate) => ConfigAction::Validate,
                Some(ConfigCommands::Init) => ConfigAction::Init,
            };
            commands::run_config(action).await
        }

        Commands::Status => commands::run_status().await,

        Commands::Login { force } => commands::run_login(force).await,

        Commands::Logout { yes } => commands::run_logout(yes).await,

        Commands::History { first, after } => commands::run_history(first, after).await,

        Commands::Alerts { action } => {
            let action = match action {
                AlertsCommands::List => AlertsAction::List,
                AlertsCommands::Delete {
                    id,
                    with_groups,
                    yes,
                } => AlertsAction::Delete {
                    id,
                    with_groups,
                    yes,
                },
            };
            commands::run_alerts(action).await
        }

        Commands::Targets {
            action:
                TargetsCommands::Ensure {
                    name,
                    email,
                    phone,
                    telegram,
                    webhook_url,
                    webhook_format,
                    headers,
                    discord,
                },
        } => {
            commands::run_targets(EnsureTargetsArgs {
                name,
                email,
                phone,
                telegram,
                webhook_url,
                webhook_format,
                headers,
                discord,
            })
            .await
        }

        Commands::Tenant { sid, action } => {
            let sid = match sid {
                Some(sid) => sid,
                None => ui::prompts::input("Service ID")?,
            };
            let action = match action {
                TenantCommands::Push {
                    key,
                    wallet,
                    blockchain,
                    message,
                    message_type,
                } => TenantAction::Push {
                    key,
                    wallet,
                    blockchain,
                    message,
                    message_type,
                },
                TenantCommands::Broadcast {
                    topic,
                    subject,
                    message,
                } => TenantAction::Broadcast {
                    topic,
                    subject,
                    message,
                },
            };
            commands::run_tenant(sid, action).await
        }
    }
}
