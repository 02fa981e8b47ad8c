pub mod augment;
pub mod config;
pub mod forget;
pub mod list;
pub mod observe;
pub mod query;
pub mod stats;

pub use augment::AugmentCommand;
pub use config::ConfigCommand;
pub use forget::ForgetCommand;
pub use list::ListCommand;
pub use observe::ObserveCommand;
pub use query::QueryCommand;
pub use stats::StatsCommand;
