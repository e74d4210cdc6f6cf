pub mod cli;
pub mod config;
pub mod error;
pub mod mapper;
pub mod migrate;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod schema;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands, RecordAction};
pub use config::Config;
pub use error::MigrationError;
pub use migrate::MigrationSummary;
pub use ui::{ConsoleUi, Phase, SilentUi, Ui, UiApp};
pub use writer::RegistryStore;
