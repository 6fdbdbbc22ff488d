//! CLI entry and dispatch.

use anyhow::{Context, Result};
use cdash_core::config;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cdash")]
#[command(version)]
#[command(about = "Creator dashboard in your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the API base URL for this invocation
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in with email and password (password is read from stdin)
    Login {
        #[arg(long)]
        email: String,
    },
    /// Create an account (password is read from stdin)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Log out and remove the stored token
    Logout,
    /// Show the current identity
    Whoami,
    /// Show credits, feeds and saved items
    Dashboard,
    /// List the merged feed
    Feeds,
    /// Save a feed item by ID
    Save {
        #[arg(value_name = "FEED_ID")]
        id: String,
    },
    /// Report a feed item by ID
    Report {
        #[arg(value_name = "FEED_ID")]
        id: String,
    },
    /// Manage saved feed items
    Saved {
        #[command(subcommand)]
        command: SavedCommands,
    },
    /// Show the credits balance
    Credits,
    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Admin tools (requires an admin account)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Show what a route resolves to for the current session
    Open {
        #[arg(value_name = "ROUTE")]
        route: String,
    },
}

#[derive(clap::Subcommand)]
enum SavedCommands {
    /// List saved feed items
    List,
    /// Delete a saved feed item
    Delete {
        #[arg(value_name = "FEED_ID")]
        id: String,
    },
}

#[derive(clap::Subcommand)]
enum ProfileCommands {
    /// Show profile details
    Show,
    /// Update name, email or password
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Read the new password and its confirmation (two lines) from stdin
        #[arg(long)]
        password_stdin: bool,
    },
}

#[derive(clap::Subcommand)]
enum AdminCommands {
    /// List all users
    Users,
    /// Show usage analytics
    Analytics,
    /// Grant credits to a user
    AddCredits {
        #[arg(value_name = "USER_ID")]
        user_id: String,
        #[arg(value_name = "AMOUNT", allow_hyphen_values = true)]
        amount: String,
    },
    /// Switch a user between admin and user
    ToggleRole {
        #[arg(value_name = "USER_ID")]
        user_id: String,
    },
    /// Pull fresh LinkedIn posts into the feed
    AggregateLinkedin,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the API base URL in the config file
    SetUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

/// Logs go to stderr so command output stays clean. `RUST_LOG` overrides the
/// default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("Failed to initialize logging: {e}");
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, api_url } = cli;

    // Config commands run before the config file is parsed.
    let command = match command {
        Commands::Config { command } => {
            return match command {
                ConfigCommands::Path => {
                    commands::config::path();
                    Ok(())
                }
                ConfigCommands::Init => commands::config::init(),
                ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
            };
        }
        other => other,
    };

    let config = config::Config::load().context("load config")?;
    let mut ctx = commands::AppContext::new(&config, api_url.as_deref())?;

    // Commands that do not talk to the API with the stored token.
    let command = match command {
        Commands::Login { email } => return commands::auth::login(&mut ctx, &email).await,
        Commands::Register { name, email } => {
            return commands::auth::register(&mut ctx, &name, &email).await;
        }
        Commands::Logout => return commands::auth::logout(&mut ctx),
        Commands::Whoami => return commands::auth::whoami(&ctx),
        Commands::Open { route } => return commands::route::open(&ctx, &route),
        other => other,
    };

    let result = match command {
        Commands::Dashboard => commands::feed::dashboard(&mut ctx).await,
        Commands::Feeds => commands::feed::list(&mut ctx).await,
        Commands::Save { id } => commands::feed::save(&mut ctx, &id).await,
        Commands::Report { id } => commands::feed::report(&mut ctx, &id).await,
        Commands::Credits => commands::feed::credits(&mut ctx).await,

        Commands::Saved { command } => match command {
            SavedCommands::List => commands::saved::list(&mut ctx).await,
            SavedCommands::Delete { id } => commands::saved::delete(&mut ctx, &id).await,
        },

        Commands::Profile { command } => match command {
            ProfileCommands::Show => commands::profile::show(&mut ctx).await,
            ProfileCommands::Update {
                name,
                email,
                password_stdin,
            } => {
                commands::profile::update(&mut ctx, name, email, password_stdin).await
            }
        },

        Commands::Admin { command } => match command {
            AdminCommands::Users => commands::admin::users(&mut ctx).await,
            AdminCommands::Analytics => commands::admin::analytics(&mut ctx).await,
            AdminCommands::AddCredits { user_id, amount } => {
                commands::admin::add_credits(&mut ctx, &user_id, &amount).await
            }
            AdminCommands::ToggleRole { user_id } => {
                commands::admin::toggle_role(&mut ctx, &user_id).await
            }
            AdminCommands::AggregateLinkedin => commands::admin::aggregate_linkedin(&mut ctx).await,
        },

        Commands::Login { .. }
        | Commands::Register { .. }
        | Commands::Logout
        | Commands::Whoami
        | Commands::Open { .. }
        | Commands::Config { .. } => Ok(()),
    };
    ctx.end_rejected_session(result)
}
