use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tacit_cli::commands::{
    AugmentCommand, ConfigCommand, ForgetCommand, ListCommand, ObserveCommand, QueryCommand,
    StatsCommand,
};
use tacit_cli::context::{load_config, open_memory};
use tacit_cli::error::CliResult;
use tacit_cli::output::OutputFormat;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tacit")]
#[command(about = "Tacit - adaptive preference memory for LLM prompts")]
#[command(version)]
pub struct Cli {
    #[clap(long, short, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[clap(long, short = 'd', global = true, help = "Path to data directory")]
    pub data_dir: Option<PathBuf>,

    #[clap(long, short = 'c', global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[clap(
        long,
        short = 'e',
        global = true,
        help = "Embedding table (JSON object or GloVe text)"
    )]
    pub embeddings: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Learn preferences from a response")]
    Observe(ObserveCommand),

    #[clap(about = "Show preferences relevant to a query")]
    Query(QueryCommand),

    #[clap(about = "Append relevant preferences to a prompt")]
    Augment(AugmentCommand),

    #[clap(about = "List remembered preferences")]
    List(ListCommand),

    #[clap(about = "Remove a preference from memory")]
    Forget(ForgetCommand),

    #[clap(about = "Show memory statistics")]
    Stats(StatsCommand),

    #[clap(about = "Configuration commands")]
    Config(ConfigCommand),
}

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tacit=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let format = OutputFormat::from_json_flag(cli.json);
    let config = load_config(cli.config.as_deref(), cli.data_dir.clone())?;

    if let Command::Config(cmd) = &cli.command {
        return cmd.execute(&config, format);
    }

    let mut memory = open_memory(&config, cli.embeddings.as_deref())?;

    match &cli.command {
        Command::Observe(cmd) => cmd.execute(&mut memory, format),
        Command::Query(cmd) => cmd.execute(&memory, format),
        Command::Augment(cmd) => cmd.execute(&memory, format),
        Command::List(cmd) => cmd.execute(&memory, format),
        Command::Forget(cmd) => cmd.execute(&mut memory, format),
        Command::Stats(cmd) => cmd.execute(&memory, format),
        Command::Config(cmd) => cmd.execute(&config, format),
    }
}
