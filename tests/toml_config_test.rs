use anyhow::Result;
use birthday_greetings::config::toml_config::TomlConfig;
use birthday_greetings::utils::validation::Validate;
use birthday_greetings::{
    BirthdayMessenger, CollectingSender, GreetingEngine, InMemoryEmployeeSource, MatchRule,
};
use chrono::NaiveDate;
use tempfile::TempDir;

#[tokio::test]
async fn test_full_config_file_round_trip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_content = r#"
[pipeline]
name = "office-greetings"
description = "Greets the office every morning"
version = "1.0.0"

[source]
type = "csv"
path = "employees.csv"
max_employees = 100

[matching]
mode = "day-month"
reference_date = "2021-03-05"
first_match_only = false

[messages]
subject_template = "Happy birthday!"
body_template = "Happy birthday, dear {name}!"

[delivery]
mode = "outbox"
output_path = "./outbox"
output_formats = ["text", "csv", "json"]

[delivery.filenames]
text = "birthdays.txt"
json = "birthdays.json"

[monitoring]
enabled = true
system_stats = true

[error_handling]
on_source_failure = "empty_roster"

[environment]
TEAM = "office"
"#;

    let config_path = temp_dir.path().join("greetings.toml");
    tokio::fs::write(&config_path, config_content).await?;
    let config = TomlConfig::from_file(&config_path)?;

    config.validate()?;

    assert_eq!(config.pipeline.name, "office-greetings");
    assert_eq!(config.match_mode(), MatchRule::DayAndMonth);
    assert_eq!(
        config.reference_date()?,
        Some(NaiveDate::from_ymd_opt(2021, 3, 5).unwrap())
    );
    assert_eq!(config.output_path(), "./outbox");
    assert!(config.monitoring_enabled());
    assert!(config.degrade_to_empty_roster());
    assert_eq!(config.max_employees(), Some(100));
    assert_eq!(
        config
            .delivery
            .filenames
            .as_ref()
            .and_then(|f| f.text.as_deref()),
        Some("birthdays.txt")
    );

    Ok(())
}

#[tokio::test]
async fn test_env_var_substitution_in_config_file() -> Result<()> {
    std::env::set_var("GREETINGS_ROSTER_PATH", "team/roster.csv");

    let temp_dir = TempDir::new()?;
    let config_content = r#"
[pipeline]
name = "env-test"
description = "env test"
version = "1.0"

[source]
type = "csv"
path = "${GREETINGS_ROSTER_PATH}"

[delivery]
mode = "console"
"#;

    let config_path = temp_dir.path().join("greetings.toml");
    tokio::fs::write(&config_path, config_content).await?;
    let config = TomlConfig::from_file(&config_path)?;

    assert_eq!(config.source.path.as_deref(), Some("team/roster.csv"));

    std::env::remove_var("GREETINGS_ROSTER_PATH");
    Ok(())
}

#[test]
fn test_unset_env_var_is_left_verbatim() {
    let config_content = r#"
[pipeline]
name = "env-test"
description = "env test"
version = "1.0"

[source]
type = "http"
endpoint = "${GREETINGS_UNSET_ENDPOINT_VAR}"

[delivery]
mode = "console"
"#;

    let config = TomlConfig::from_toml_str(config_content).unwrap();

    assert_eq!(
        config.source.endpoint.as_deref(),
        Some("${GREETINGS_UNSET_ENDPOINT_VAR}")
    );
    // The placeholder is not a valid URL, validation catches it
    assert!(config.validate().is_err());
}

#[tokio::test]
async fn test_inline_roster_config_drives_a_full_run() -> Result<()> {
    let config_content = r#"
[pipeline]
name = "inline-run"
description = "inline run"
version = "1.0"

[source]
type = "inline"

[[source.employees]]
name = "GeePaw"
birthdate = "2018-03-05"

[[source.employees]]
name = "John"
birthdate = "2018-03-05"

[[source.employees]]
name = "Ada"
birthdate = "1990-12-10"

[matching]
reference_date = "2021-03-05"

[delivery]
mode = "console"
"#;

    let config = TomlConfig::from_toml_str(config_content)?;
    config.validate()?;

    let reference = config.reference_date()?.unwrap();
    let source = InMemoryEmployeeSource::new(config.inline_roster()?);
    let sender = CollectingSender::new();

    let messenger = BirthdayMessenger::new(source, sender.clone(), config);
    let engine = GreetingEngine::new(messenger);

    let summary = engine.run(reference).await?;
    assert_eq!(summary, "2 greeting(s) for 3 employee(s) on 2021-03-05");

    let sent = sender.sent().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].message, "Happy birthday, dear GeePaw!");
    assert_eq!(sent[1].message, "Happy birthday, dear John!");

    Ok(())
}

#[tokio::test]
async fn test_first_match_only_from_config_limits_delivery() -> Result<()> {
    let config_content = r#"
[pipeline]
name = "first-only"
description = "first only"
version = "1.0"

[source]
type = "inline"

[[source.employees]]
name = "GeePaw"
birthdate = "2018-03-05"

[[source.employees]]
name = "John"
birthdate = "2018-03-05"

[matching]
reference_date = "2021-03-05"
first_match_only = true

[delivery]
mode = "console"
"#;

    let config = TomlConfig::from_toml_str(config_content)?;
    config.validate()?;

    let reference = config.reference_date()?.unwrap();
    let source = InMemoryEmployeeSource::new(config.inline_roster()?);
    let sender = CollectingSender::new();

    let messenger = BirthdayMessenger::new(source, sender.clone(), config);
    let engine = GreetingEngine::new(messenger);

    engine.run(reference).await?;

    let sent = sender.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message, "Happy birthday, dear GeePaw!");

    Ok(())
}

#[test]
fn test_custom_templates_flow_through_accessors() {
    let config_content = r#"
[pipeline]
name = "templates"
description = "templates"
version = "1.0"

[source]
type = "csv"
path = "employees.csv"

[messages]
subject_template = "Cake day for {name}"
body_template = "See you at the party on {date}, {name}!"

[delivery]
mode = "console"
"#;

    let config = TomlConfig::from_toml_str(config_content).unwrap();

    assert_eq!(config.subject_template(), "Cake day for {name}");
    assert_eq!(
        config.body_template(),
        "See you at the party on {date}, {name}!"
    );
}
