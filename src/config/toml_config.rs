use crate::core::ConfigProvider;
use crate::domain::model::Employee;
use crate::domain::services::{MatchRule, DEFAULT_BODY_TEMPLATE, DEFAULT_SUBJECT_TEMPLATE};
use crate::utils::error::{GreetingError, Result};
use crate::utils::validation::{
    validate_allowed_value, validate_date, validate_non_empty_string, validate_path,
    validate_positive_number, validate_required_field, validate_url, Validate,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub matching: Option<MatchingConfig>,
    pub messages: Option<MessagesConfig>,
    pub delivery: DeliveryConfig,
    pub monitoring: Option<MonitoringConfig>,
    pub error_handling: Option<ErrorHandlingConfig>,
    pub environment: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
    pub parameters: Option<HashMap<String, String>>,
    pub field_mapping: Option<HashMap<String, String>>,
    pub max_employees: Option<usize>,
    pub employees: Option<Vec<EmployeeEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeEntry {
    pub name: String,
    pub birthdate: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub mode: Option<MatchRule>,
    pub reference_date: Option<String>,
    pub first_match_only: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    pub subject_template: Option<String>,
    pub body_template: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    pub mode: String,
    pub output_path: Option<String>,
    pub output_formats: Option<Vec<String>>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub text: Option<String>,
    pub csv: Option<String>,
    pub json: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
    pub system_stats: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorHandlingConfig {
    pub on_source_failure: Option<String>,
}

impl TomlConfig {
    /// Loads a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GreetingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GreetingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` references with environment variable values.
    /// Unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Validates the configuration beyond what deserialization checks.
    pub fn validate_config(&self) -> Result<()> {
        validate_allowed_value("source.type", &self.source.r#type, &["csv", "http", "inline"])?;

        match self.source.r#type.as_str() {
            "csv" => {
                let path = validate_required_field("source.path", &self.source.path)?;
                validate_path("source.path", path)?;
            }
            "http" => {
                let endpoint = validate_required_field("source.endpoint", &self.source.endpoint)?;
                validate_url("source.endpoint", endpoint)?;
            }
            "inline" => {
                let employees =
                    validate_required_field("source.employees", &self.source.employees)?;
                for (index, entry) in employees.iter().enumerate() {
                    validate_non_empty_string(
                        &format!("source.employees[{}].name", index),
                        &entry.name,
                    )?;
                    validate_date(
                        &format!("source.employees[{}].birthdate", index),
                        &entry.birthdate,
                    )?;
                }
            }
            _ => unreachable!(),
        }

        if let Some(timeout) = self.source.timeout_seconds {
            validate_positive_number("source.timeout_seconds", timeout as usize, 1)?;
        }

        if let Some(max) = self.source.max_employees {
            validate_positive_number("source.max_employees", max, 1)?;
        }

        validate_allowed_value("delivery.mode", &self.delivery.mode, &["console", "outbox"])?;
        validate_path("delivery.output_path", self.output_path())?;

        if let Some(formats) = &self.delivery.output_formats {
            for format in formats {
                validate_allowed_value("delivery.output_formats", format, &["text", "csv", "json"])?;
            }
        }

        if let Some(matching) = &self.matching {
            if let Some(raw) = &matching.reference_date {
                validate_date("matching.reference_date", raw)?;
            }
        }

        if let Some(error_handling) = &self.error_handling {
            if let Some(policy) = &error_handling.on_source_failure {
                validate_allowed_value(
                    "error_handling.on_source_failure",
                    policy,
                    &["fail", "empty_roster"],
                )?;
            }
        }

        Ok(())
    }

    pub fn match_mode(&self) -> MatchRule {
        self.matching
            .as_ref()
            .and_then(|m| m.mode)
            .unwrap_or_default()
    }

    pub fn first_match_only(&self) -> bool {
        self.matching
            .as_ref()
            .and_then(|m| m.first_match_only)
            .unwrap_or(false)
    }

    /// The reference date fixed in the config, if any. Callers fall back to
    /// the current date when this is `None`.
    pub fn reference_date(&self) -> Result<Option<NaiveDate>> {
        match self
            .matching
            .as_ref()
            .and_then(|m| m.reference_date.as_deref())
        {
            Some(raw) => Ok(Some(validate_date("matching.reference_date", raw)?)),
            None => Ok(None),
        }
    }

    pub fn subject_template(&self) -> &str {
        self.messages
            .as_ref()
            .and_then(|m| m.subject_template.as_deref())
            .unwrap_or(DEFAULT_SUBJECT_TEMPLATE)
    }

    pub fn body_template(&self) -> &str {
        self.messages
            .as_ref()
            .and_then(|m| m.body_template.as_deref())
            .unwrap_or(DEFAULT_BODY_TEMPLATE)
    }

    pub fn output_path(&self) -> &str {
        self.delivery.output_path.as_deref().unwrap_or("./output")
    }

    pub fn max_employees(&self) -> Option<usize> {
        self.source.max_employees
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// Whether a failing roster source should degrade the run to an empty
    /// roster instead of aborting it.
    pub fn degrade_to_empty_roster(&self) -> bool {
        self.error_handling
            .as_ref()
            .and_then(|e| e.on_source_failure.as_deref())
            == Some("empty_roster")
    }

    /// The roster embedded in an `inline` source section.
    pub fn inline_roster(&self) -> Result<Vec<Employee>> {
        let entries = self.source.employees.as_deref().unwrap_or_default();
        let mut roster = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let birthdate = validate_date(
                &format!("source.employees[{}].birthdate", index),
                &entry.birthdate,
            )?;
            roster.push(Employee::new(entry.name.clone(), birthdate));
        }
        Ok(roster)
    }
}

impl ConfigProvider for TomlConfig {
    fn match_mode(&self) -> MatchRule {
        self.match_mode()
    }

    fn first_match_only(&self) -> bool {
        self.first_match_only()
    }

    fn subject_template(&self) -> &str {
        self.subject_template()
    }

    fn body_template(&self) -> &str {
        self.body_template()
    }

    fn output_path(&self) -> &str {
        self.output_path()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
