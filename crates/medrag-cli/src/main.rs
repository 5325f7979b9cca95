//! medrag CLI - contraindication-checked answers over a medical knowledge graph.

use clap::Parser;
use medrag_cli::commands;
use medrag_cli::config::OutputFormat;
use medrag_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Errors can precede config loading, so they use plain settings
    let errors = Formatter::new(OutputFormat::Table, !cli.no_color);
    if let Err(e) = run(cli).await {
        eprintln!("{}", errors.format_error(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> medrag_cli::Result<()> {
    let mut config = match (&cli.command, Config::load(cli.config.as_deref())) {
        // `config init` must work even when the existing file is broken
        (Command::Config(_), Err(e)) => {
            tracing::warn!(error = %e, "Ignoring unreadable configuration");
            Config::default()
        }
        (_, loaded) => loaded?,
    };
    config.apply_overrides(cli.neo4j_url, cli.neo4j_username, cli.neo4j_password);

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Ask(args) => commands::execute_ask(args, &config, &formatter).await?,
        Command::Check(args) => commands::execute_check(args, &config, &formatter).await?,
        Command::Aliases(args) => commands::execute_aliases(args, &config, &formatter)?,
        Command::Config(args) => {
            commands::execute_config(args, &config, cli.config.as_deref(), &formatter)?
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
