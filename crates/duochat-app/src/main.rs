mod cli;
mod console;
mod input;
mod logging;
mod repl;
mod settings;

use std::io::{self, BufReader, IsTerminal};
use std::process::ExitCode;

use duochat_config::DuochatConfig;

use console::Console;
use repl::ChatApp;

fn write_default_config(args: &cli::Args) -> duochat_common::Result<()> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => duochat_config::default_config_path()?,
    };
    duochat_config::create_default_config(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

async fn run(args: cli::Args) -> duochat_common::Result<()> {
    // Until the config is read, only --log-level and RUST_LOG apply
    let logs = logging::init(&settings::log_directive(&args, &DuochatConfig::default()));
    tracing::info!("duochat v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match duochat_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            DuochatConfig::default()
        }
    };
    logs.apply(&settings::log_directive(&args, &config));
    tracing::debug!("Effective config: {}", duochat_config::config_to_json(&config));

    let factory = settings::build_factory(&config);
    let provider = settings::initial_provider(&args, &config);
    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    let console = Console::stdout(interactive);
    let input = BufReader::new(io::stdin());

    let mut app = ChatApp::new(factory, provider, input, console);
    app.run(&config.chat.title).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let result = if args.write_default_config {
        write_default_config(&args)
    } else {
        run(args).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
