
use crate::activity::{ActivityFeed, AdminNotifier, AlertEmitter};
use crate::channels::TelegramChannel;
use crate::config::credentials::{CREDENTIAL_ENV_VARS, detect_source};
use crate::config::{Config, load_config};
use crate::conversation::{ConversationMachine, MachineSettings, SessionManager};
use crate::errors::LookoutError;
use crate::source::HttpProfileSource;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "lookout")]
#[command(about = "Profile browsing bot with an administrator activity feed")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Config file to create (defaults to ~/.lookout/config.json)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run the Telegram bot until interrupted
    Run {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the effective configuration with secrets redacted
    Config {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { config } => init(config)?,
        Commands::Run { config } => run_bot(config).await?,
        Commands::Config { config } => show_config(config)?,
    }

    Ok(())
}

fn init(path: Option<PathBuf>) -> Result<()> {
    let config_path = match path {
        Some(p) => p,
        None => crate::config::get_config_path()?,
    };
    if config_path.exists() {
        println!(
            "\u{26a0}\u{fe0f}  Config already exists at {}",
            config_path.display()
        );
        println!("Overwrite? (y/N): ");
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            return Ok(());
        }
    }

    crate::config::save_config(&Config::default(), Some(config_path.as_path()))?;
    println!("\u{2713} Created config at {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Set telegram.token (or LOOKOUT_TELEGRAM_TOKEN)");
    println!("  2. Set source.baseUrl to your profile-data gateway");
    println!("  3. Optionally set admin.chatId (or LOOKOUT_ADMIN_CHAT_ID)");
    println!("  4. lookout run");
    Ok(())
}

fn show_config(path: Option<PathBuf>) -> Result<()> {
    let config = load_config(path.as_deref())?;
    println!("{:#?}", config);
    println!("\nCredentials:");
    for (slot, env) in CREDENTIAL_ENV_VARS {
        println!("  {:<16} {:<7} ({})", slot, detect_source(slot, &config), env);
    }
    Ok(())
}

/// Everything the transport needs, wired from configuration.
pub(crate) struct Wiring {
    pub machine: Arc<ConversationMachine>,
    pub sessions: Arc<SessionManager>,
    pub admin: AlertEmitter,
}

/// Build the conversation core. `notifier` is the administrator destination,
/// if one is configured; the activity flags decide which streams use it.
pub(crate) fn wire(config: &Config, notifier: Option<Arc<dyn AdminNotifier>>) -> Wiring {
    let feed = if config.activity.summaries {
        ActivityFeed::new(
            notifier.clone(),
            Duration::from_secs(config.activity.debounce_secs),
        )
    } else {
        ActivityFeed::disabled()
    };
    let alerts = if config.activity.alerts {
        AlertEmitter::new(notifier.clone())
    } else {
        AlertEmitter::default()
    };
    let admin = AlertEmitter::new(notifier);
    debug!(
        "activity: summaries={} alerts={} admin={}",
        feed.is_enabled(),
        alerts.is_enabled(),
        admin.is_enabled()
    );

    let source = Arc::new(HttpProfileSource::from_config(&config.source));
    let machine = ConversationMachine::new(
        source,
        feed,
        alerts,
        admin.clone(),
        MachineSettings::from(config),
    );
    Wiring {
        machine: Arc::new(machine),
        sessions: Arc::new(SessionManager::new(config.pager.page_size)),
        admin,
    }
}

async fn run_bot(path: Option<PathBuf>) -> Result<()> {
    info!("Loading configuration...");
    let config = load_config(path.as_deref())?;
    if config.telegram.token.trim().is_empty() {
        return Err(LookoutError::Config(
            "telegram.token is not set (config or LOOKOUT_TELEGRAM_TOKEN)".into(),
        )
        .into());
    }
    if config.source.base_url.is_empty() {
        return Err(LookoutError::Config("source.baseUrl is not set".into()).into());
    }

    let channel = TelegramChannel::new(config.telegram.clone());
    let notifier = config.admin.chat_id.map(|id| channel.admin_notifier(id));
    let wiring = wire(&config, notifier);

    channel
        .run(wiring.machine, wiring.sessions, wiring.admin)
        .await?;
    Ok(())
}
