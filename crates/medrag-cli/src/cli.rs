//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};

/// medrag - contraindication-checked answers over a medical knowledge graph.
#[derive(Debug, Parser)]
#[command(name = "medrag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Neo4j HTTP endpoint
    #[arg(long, env = "NEO4J_URL", global = true)]
    pub neo4j_url: Option<String>,

    /// Neo4j user
    #[arg(long, env = "NEO4J_USERNAME", global = true)]
    pub neo4j_username: Option<String>,

    /// Neo4j password
    #[arg(long, env = "NEO4J_PASSWORD", hide_env_values = true, global = true)]
    pub neo4j_password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer a patient's question with the contraindication gate
    Ask(AskArgs),

    /// Run the contraindication check only
    Check(CheckArgs),

    /// Inspect the alias dictionary
    Aliases(AliasesArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Patient subgraph identifier
    #[arg(short, long)]
    pub patient: String,

    /// Question text
    pub question: String,

    /// Override the configured model
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Patient subgraph identifier
    #[arg(short, long)]
    pub patient: String,

    /// Question text
    pub question: String,
}

/// Arguments for the aliases command.
#[derive(Debug, Parser)]
pub struct AliasesArgs {
    /// Only this table
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,

    /// Show which canonical terms this text mentions instead of listing
    #[arg(short, long)]
    pub text: Option<String>,
}

/// Alias table selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum KindArg {
    /// Drug table
    Drugs,
    /// Condition table
    Conditions,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<KindArg> for medrag_domain::TermKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Drugs => medrag_domain::TermKind::Drug,
            KindArg::Conditions => medrag_domain::TermKind::Condition,
        }
    }
}
