use crate::core::ConfigProvider;
use crate::domain::services::{MatchRule, DEFAULT_BODY_TEMPLATE, DEFAULT_SUBJECT_TEMPLATE};
use crate::utils::error::Result;
use crate::utils::validation::{validate_allowed_value, validate_date, validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "birthday-greetings")]
#[command(about = "Sends birthday greetings to employees from a roster file")]
pub struct CliConfig {
    /// CSV roster file with name,birthdate columns
    #[arg(long, default_value = "employees.csv")]
    pub roster: String,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,

    /// Matching rule: day-month or exact-date
    #[arg(long, default_value = "day-month")]
    pub match_mode: String,

    /// Greet only the first matching employee
    #[arg(long)]
    pub first_only: bool,

    /// Delivery mode: console or outbox
    #[arg(long, default_value = "console")]
    pub deliver: String,

    /// Directory for outbox files
    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn match_mode(&self) -> MatchRule {
        // Invalid spellings are rejected in validate(), the fallback here
        // never fires on a validated config.
        self.match_mode.parse().unwrap_or_default()
    }

    fn first_match_only(&self) -> bool {
        self.first_only
    }

    fn subject_template(&self) -> &str {
        DEFAULT_SUBJECT_TEMPLATE
    }

    fn body_template(&self) -> &str {
        DEFAULT_BODY_TEMPLATE
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("roster", &self.roster)?;
        if let Some(date) = &self.date {
            validate_date("date", date)?;
        }
        self.match_mode.parse::<MatchRule>()?;
        validate_allowed_value("deliver", &self.deliver, &["console", "outbox"])?;
        validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}
