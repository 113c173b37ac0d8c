//! Bainian application binary - composition root.
//!
//! Ties together all Bainian crates into a single executable:
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Choose the reply style (flag, interactive prompt, or config)
//! 3. Load the reply template catalog
//! 4. Wire the platform observer/actuator pair
//! 5. Install signal handlers and run the poll-and-reply engine until stopped

mod cli;

use std::path::Path;

use clap::Parser;
use console::style;
use dialoguer::Select;

use bainian_automation::platform_automation;
use bainian_catalog::ReplyCatalog;
use bainian_core::config::BainianConfig;
use bainian_core::types::Style;
use bainian_engine::{EngineTiming, KeywordClassifier, ReplyEngine, StopHandle};

use cli::CliArgs;

/// Interactive style picker, shown when attached to a terminal and no
/// --style flag was given. The config file's style is preselected.
fn prompt_style(default: Style) -> Result<Style, Box<dyn std::error::Error>> {
    let styles = [Style::Formal, Style::Humor];
    let labels = ["formal - courteous set phrases", "humor - playful replies"];
    let default_idx = styles.iter().position(|s| *s == default).unwrap_or(0);

    println!("{}", style("Choose a reply style").bold());
    let idx = Select::new()
        .with_prompt("Reply style")
        .items(&labels)
        .default(default_idx)
        .interact()?;

    Ok(styles[idx])
}

/// Request an engine stop on Ctrl-C or SIGTERM.
fn spawn_signal_listener(stop: StopHandle) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                    if tokio::signal::ctrl_c().await.is_ok() {
                        tracing::info!("Ctrl-C received; stopping");
                        stop.request_stop();
                    }
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => tracing::info!("Ctrl-C received; stopping"),
                _ = sigterm.recv() => tracing::info!("SIGTERM received; stopping"),
            }
            stop.request_stop();
        }

        #[cfg(not(unix))]
        {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl-C received; stopping");
                stop.request_stop();
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();

    if args.list_styles {
        println!("formal");
        println!("humor");
        return Ok(());
    }

    tracing::info!("Starting Bainian v{}", env!("CARGO_PKG_VERSION"));

    // Config. Running without one is an operator error, so bail out.
    let config_file = args.resolve_config_path();
    let config = match BainianConfig::load(&config_file) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(path = %config_file.display(), error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    // Reply style: --style flag > interactive prompt > config file.
    let chosen_style = match args.style {
        Some(s) => s,
        None if console::user_attended() => prompt_style(config.style)?,
        None => config.style,
    };

    // Reply templates.
    let catalog = ReplyCatalog::load(Path::new(&config.templates.dir), config.style)?;

    // Platform observer/actuator pair.
    let (observer, actuator) =
        platform_automation(&config.target.app_name, &config.target.window_title)?;
    tracing::info!(
        platform = std::env::consts::OS,
        app = %config.target.app_name,
        "Platform automation ready"
    );

    // Engine.
    let classifier = Box::new(KeywordClassifier::new(&config.detection.keywords));
    let mut engine = ReplyEngine::new(
        observer,
        actuator,
        catalog,
        classifier,
        config.quiet_hours()?,
        EngineTiming::new(config.check_interval()),
    )
    .with_reply_index(config.detection.reply_index)
    .with_recent_cache(config.detection.recent_cache_size);

    // Style selection goes through the same switch used at runtime.
    engine.set_style(chosen_style)?;

    spawn_signal_listener(engine.stop_handle());

    engine.run().await?;

    Ok(())
}
