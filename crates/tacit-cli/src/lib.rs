pub mod commands;
pub mod context;
pub mod error;
pub mod output;

pub use commands::{
    AugmentCommand, ConfigCommand, ForgetCommand, ListCommand, ObserveCommand, QueryCommand,
    StatsCommand,
};
pub use context::{build_model, load_config, open_memory};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, format_timestamp, truncate_string};
