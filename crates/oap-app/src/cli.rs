use std::path::PathBuf;

use clap::Parser;

/// oap-chat: converse with the OAP application assistant.
#[derive(Parser, Debug)]
#[command(name = "oap-chat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive override (e.g. `oap=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Start with tools enabled.
    #[arg(long)]
    pub tools: bool,

    /// Open an existing chat by id.
    #[arg(long)]
    pub chat: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
