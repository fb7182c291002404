mod boot;
mod cli;
mod commands;
mod shell;

use std::process::ExitCode;

use oap_common::{ChatId, ToolMode};
use oap_config::OapConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        std::path::PathBuf::from(".env"),
        // Workspace root, two levels up from crates/oap-app/
        manifest_dir.join("..").join("..").join(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim().trim_start_matches("export ").trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

fn load_config(args: &cli::Args) -> (OapConfig, Option<String>) {
    let result = match &args.config {
        Some(path) => oap_config::load_config_from(path),
        None => oap_config::load_config(),
    };
    match result {
        Ok(config) => (config, None),
        Err(e) => (OapConfig::default(), Some(e.to_string())),
    }
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::from_default_env();
    let filter = match directive.parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(e) => {
            eprintln!("oap-chat: ignoring log directive {directive:?}: {e}");
            filter.add_directive(LevelFilter::INFO.into())
        }
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let args = cli::parse();

    let (config, config_error) = load_config(&args);
    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.directive().to_string());
    init_logging(&directive);

    tracing::info!("oap-chat v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    let services = match boot::build(&config) {
        Ok(services) => services,
        Err(e) => {
            tracing::error!("Startup failed: {e}");
            eprintln!("oap-chat: {e}");
            return ExitCode::FAILURE;
        }
    };
    let shell = shell::Shell::new(services.session, services.tools);
    let session = shell.session();

    let mode = if args.tools {
        ToolMode::Enabled
    } else {
        config.tools.default_mode
    };
    let status = session.set_tool_mode(mode).await;
    tracing::info!(?mode, %status, "tool mode set");

    if let Err(e) = session.load_chats().await {
        tracing::warn!("Failed to load chats: {e}");
    }
    if let Some(id) = args.chat.as_deref() {
        shell.handle(commands::Command::Open(ChatId::new(id))).await;
    }

    match shell.run().await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Shell error: {e}");
            ExitCode::FAILURE
        }
    }
}
