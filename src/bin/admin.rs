//! CLI administration tool for deeplink-shortener.
//!
//! Inspects short keys and manages link lifecycle without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Encode an id and discriminator into a short key
//! cargo run --bin admin -- key encode 123 ab
//!
//! # Decode a short key
//! cargo run --bin admin -- key decode aB9b
//!
//! # Show, deactivate, reactivate or delete a link
//! cargo run --bin admin -- link show aB9b
//! cargo run --bin admin -- link deactivate aB9b
//! cargo run --bin admin -- link activate aB9b
//! cargo run --bin admin -- link delete aB9b
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (`DATABASE_URL` or `DB_*`, optional `REDIS_URL`).
//! Lifecycle commands evict the link from Redis when it is configured.

use deeplink_shortener::application::services::LinkService;
use deeplink_shortener::config::{self, Config};
use deeplink_shortener::domain::entities::LinkRecord;
use deeplink_shortener::domain::notification_worker::NotificationDispatcher;
use deeplink_shortener::infrastructure::cache::{CacheService, NullCache, RedisCache};
use deeplink_shortener::infrastructure::persistence::PgLinkRepository;
use deeplink_shortener::server::connect_pool;
use deeplink_shortener::utils::short_key::{is_discriminator, merge_short_key, split_short_key};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing deeplink-shortener.
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
    /// Short key codec (offline)
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Manage links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Build a short key from an id and a 2-character discriminator
    Encode { id: u64, discriminator: String },

    /// Split a short key into id and discriminator
    Decode { short_key: String },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Show a stored link, including inactive and deleted ones
    Show { short_key: String },

    /// Stop resolving a link
    Deactivate {
        short_key: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Resume resolving a deactivated link
    Activate { short_key: String },

    /// Soft-delete a link
    Delete {
        short_key: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Key { action } => handle_key_action(action),
        Commands::Link { action } => {
            let config = Config::from_env()?;
            handle_link_action(action, &config).await
        }
        Commands::Db { action } => {
            let config = Config::from_env()?;
            handle_db_action(action, &config).await
        }
    }
}

fn handle_key_action(action: KeyAction) -> Result<()> {
    match action {
        KeyAction::Encode { id, discriminator } => {
            if !is_discriminator(&discriminator) {
                bail!("Discriminator must be exactly 2 characters from A-Z, a-z, 0-9");
            }
            println!("{}", merge_short_key(&discriminator, id).bright_yellow().bold());
        }
        KeyAction::Decode { short_key } => {
            let (id, discriminator) =
                split_short_key(&short_key).context("Not a decodable short key")?;
            println!("  ID:            {}", id.to_string().bright_white().bold());
            println!("  Discriminator: {}", discriminator.cyan());
        }
    }

    Ok(())
}

/// Builds the same pipeline the server uses, minus notifications.
async fn link_service(config: &Config) -> Result<LinkService> {
    let pool = connect_pool(config).await?;
    let repository = Arc::new(PgLinkRepository::new(Arc::new(pool)));

    let cache: Arc<dyn CacheService> = match &config.redis_url {
        Some(url) => match RedisCache::connect(url).await {
            Ok(redis) => Arc::new(redis),
            Err(e) => {
                println!("{} {}", "⚠️  Redis unavailable, cache not evicted:".yellow(), e);
                Arc::new(NullCache::new())
            }
        },
        None => Arc::new(NullCache::new()),
    };

    // Admin lookups never resolve, so nothing is ever queued.
    let (dispatcher, _rx) = NotificationDispatcher::channel(1);

    Ok(LinkService::new(repository, cache, dispatcher, config.cache_ttl()))
}

async fn handle_link_action(action: LinkAction, config: &Config) -> Result<()> {
    let service = link_service(config).await?;

    match action {
        LinkAction::Show { short_key } => {
            let record = service.inspect(&short_key).await?;
            print_link(&short_key, &record);
        }
        LinkAction::Deactivate { short_key, yes } => {
            let record = service.inspect(&short_key).await?;
            print_link(&short_key, &record);

            if !yes && !confirm("Deactivate this link?")? {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            service.set_active(&short_key, false).await?;
            println!("{}", "✅ Link deactivated".green().bold());
        }
        LinkAction::Activate { short_key } => {
            service.set_active(&short_key, true).await?;
            println!("{}", "✅ Link activated".green().bold());
        }
        LinkAction::Delete { short_key, yes } => {
            let record = service.inspect(&short_key).await?;
            print_link(&short_key, &record);

            if record.is_deleted() {
                println!("{}", "⚠️  This link is already deleted".yellow());
                return Ok(());
            }

            if !yes && !confirm("Delete this link?")? {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            service.delete(&short_key).await?;
            println!("{}", "✅ Link deleted".green().bold());
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn print_link(short_key: &str, record: &LinkRecord) {
    let status = if record.is_deleted() {
        "DELETED".red()
    } else if record.is_active {
        "ACTIVE".green()
    } else {
        "INACTIVE".yellow()
    };
    let targets = &record.targets;
    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    println!();
    println!("{}", format!("🔗 {}", short_key).bright_blue().bold());
    println!("  ID:               {}", record.id.to_string().bright_black());
    println!("  Status:           {}", status);
    println!("  Default fallback: {}", targets.default_fallback_url.cyan());
    println!("  iOS deep link:    {}", show(&targets.ios_deep_link));
    println!("  iOS fallback:     {}", show(&targets.ios_fallback_url));
    println!("  Android deep link: {}", show(&targets.android_deep_link));
    println!("  Android fallback: {}", show(&targets.android_fallback_url));
    println!("  Webhook:          {}", show(&record.webhook_url));
    println!("  Fingerprint:      {}", record.fingerprint.bright_black());
    println!(
        "  Created:          {}",
        record.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
    println!();
}

async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());
            println!(
                "  {}",
                config::mask_connection_string(&config.database_url).bright_black()
            );

            let pool = connect_pool(config).await?;
            sqlx::query("SELECT 1").execute(&pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}
