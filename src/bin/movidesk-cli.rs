use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

use movidesk_config::i18n::{self, Lang, Notice};
use movidesk_config::observability::logging;
use movidesk_config::remote::{AdminKeyLocator, ConfigPublisher, FetchOutcome};
use movidesk_config::timelog::{MovideskSubmitter, RawTimeEntry, TicketActionSubmitter, TimeEntry};
use movidesk_config::{credentials, ClientSettings, ConfigHandle, SyncError};

#[derive(Parser)]
#[command(name = "movidesk-cli")]
#[command(about = "Desk client for the shared Movidesk configuration", long_about = None)]
struct Cli {
    /// Local configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Remote configuration cache file
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Full URL of the server's /client-config endpoint
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the local configuration (password hashes and token hidden)
    Show,
    /// Fetch the server configuration, overlay it and save locally
    Sync,
    /// Check a username and password
    Login {
        #[arg(short, long)]
        user: String,
        #[arg(short, long, env = "MOVIDESK_PASSWORD", default_value = "")]
        password: String,
    },
    /// Push users, token and language to the server
    Publish,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Set the helpdesk API token
    Token { value: String },
    /// Set the interface language tag
    Lang { value: String },
    /// Print the stored form of a password
    Hash { password: String },
    /// Log worked time against a ticket
    Log {
        #[arg(short, long)]
        user: String,
        #[arg(short, long, env = "MOVIDESK_PASSWORD", default_value = "")]
        password: String,
        #[arg(long)]
        ticket: String,
        #[arg(long, default_value = "")]
        description: String,
        /// DD/MM/YYYY
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM
        #[arg(long)]
        end: String,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create or update a user; an empty password keeps the current one
    Add {
        name: String,
        #[arg(short, long, default_value = "")]
        password: String,
        #[arg(short, long, default_value = "")]
        agent_id: String,
        #[arg(long)]
        admin: bool,
    },
    /// Delete a user
    Remove { name: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init("movidesk_config=warn");
    let cli = Cli::parse();

    let mut settings = ClientSettings::from_env();
    if let Some(path) = cli.config {
        settings.config_path = path;
    }
    if let Some(path) = cli.cache {
        settings.cache_path = path;
    }
    if let Some(url) = cli.url {
        settings.remote_url = Some(url);
    }

    let mut handle = match ConfigHandle::from_settings(&settings) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("{}", i18n::message(&e, Lang::Pt));
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &mut handle, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", i18n::message(&e, handle.lang()));
            ExitCode::FAILURE
        }
    }
}

async fn run(
    command: Commands,
    handle: &mut ConfigHandle,
    settings: &ClientSettings,
) -> Result<(), SyncError> {
    match command {
        Commands::Show => {
            let doc = handle.document();
            let users: serde_json::Map<String, serde_json::Value> = doc
                .users
                .iter()
                .map(|(name, record)| {
                    (
                        name.clone(),
                        json!({
                            "agent_id": record.agent_id,
                            "admin": record.is_admin,
                            "has_password": !record.password_hash.is_empty(),
                        }),
                    )
                })
                .collect();
            let view = json!({
                "version": doc.version,
                "usuarios": users,
                "has_token": doc.has_token(),
                "lang": doc.lang,
            });
            println!("{}", serde_json::to_string_pretty(&view).unwrap_or_default());
        }
        Commands::Sync => {
            let Some(outcome) = handle.reload().await else {
                return Err(SyncError::NoEndpoint);
            };
            handle.save()?;
            let notice = match outcome {
                FetchOutcome::Fresh(_) => Notice::SyncedFresh,
                FetchOutcome::Cached(_) => Notice::SyncedFromCache,
                FetchOutcome::Unavailable => Notice::SyncUnavailable,
            };
            println!("{}", i18n::notice(notice, handle.lang()));
        }
        Commands::Login { user, password } => {
            handle.reload().await;
            handle.authenticate(&user, &password)?;
            println!("{}", i18n::notice(Notice::LoginOk, handle.lang()));
        }
        Commands::Publish => {
            let publisher = ConfigPublisher::from_settings(settings, AdminKeyLocator::standard())?;
            let summary = handle.publish(&publisher).await?;
            println!(
                "{} (version {}, {} usuarios)",
                i18n::notice(Notice::Published, handle.lang()),
                summary.version,
                summary.usuarios_count
            );
        }
        Commands::User { action } => match action {
            UserAction::Add {
                name,
                password,
                agent_id,
                admin,
            } => {
                handle.upsert_user(&name, &password, &agent_id, admin)?;
                println!("{}", i18n::notice(Notice::UserSaved, handle.lang()));
            }
            UserAction::Remove { name } => {
                handle.remove_user(&name)?;
                println!("{}", i18n::notice(Notice::UserRemoved, handle.lang()));
            }
        },
        Commands::Token { value } => {
            handle.set_token(&value)?;
            println!("{}", i18n::notice(Notice::Saved, handle.lang()));
        }
        Commands::Lang { value } => {
            handle.set_lang(&value)?;
            println!("{}", i18n::notice(Notice::Saved, handle.lang()));
        }
        Commands::Hash { password } => {
            println!("{}", credentials::hash_password(&password));
        }
        Commands::Log {
            user,
            password,
            ticket,
            description,
            date,
            start,
            end,
        } => {
            handle.reload().await;
            handle.authenticate(&user, &password)?;
            let agent_id = handle.agent_id_for(user.trim())?.to_string();
            let entry = TimeEntry::parse(
                &RawTimeEntry {
                    ticket_id: ticket,
                    description,
                    date,
                    start,
                    end,
                },
                &agent_id,
            )?;
            let submitter = MovideskSubmitter::new(handle.document().token.clone())?;
            submitter.submit(&entry).await?;
            println!("{}", i18n::notice(Notice::TimeLogged, handle.lang()));
        }
    }
    Ok(())
}
