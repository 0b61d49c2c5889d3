use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use duochat_ai::ProviderKind;

/// Chat with OpenAI or Google Gemini from the terminal.
#[derive(Parser, Debug)]
#[command(name = "duochat", version, about)]
pub struct Args {
    /// Provider to start with (overrides chat.default_provider).
    #[arg(short = 'p', long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write the commented default config file and exit.
    #[arg(long)]
    pub write_default_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Openai,
    Gemini,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Openai => ProviderKind::OpenAi,
            ProviderArg::Gemini => ProviderKind::Gemini,
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
