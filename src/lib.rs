pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::senders::{CollectingSender, ConsoleSender, OutboxSender, OutputFormat};
pub use adapters::sources::{CsvEmployeeSource, HttpEmployeeSource, InMemoryEmployeeSource};
pub use adapters::storage::LocalStorage;
pub use self::core::{engine::GreetingEngine, messenger::BirthdayMessenger};
pub use domain::model::{BirthdayMessage, Employee, GreetingBatch};
pub use domain::services::{collect_greetings, first_greeting, MatchRule};
pub use utils::error::{GreetingError, Result};
