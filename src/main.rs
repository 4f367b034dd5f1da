use birthday_greetings::domain::ports::{EmployeeSource, GreetingSender};
use birthday_greetings::utils::{logger, validation::Validate};
use birthday_greetings::{
    BirthdayMessenger, CliConfig, ConsoleSender, CsvEmployeeSource, GreetingEngine, LocalStorage,
    OutboxSender, Result,
};
use chrono::NaiveDate;
use clap::Parser;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting birthday-greetings CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let reference = match &config.date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")?,
        None => chrono::Local::now().date_naive(),
    };

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let source = CsvEmployeeSource::new(LocalStorage::new(".".to_string()), config.roster.clone());

    let result = match config.deliver.as_str() {
        "outbox" => {
            let sender = OutboxSender::new(
                LocalStorage::new(".".to_string()),
                config.output_path.clone(),
            );
            run(source, sender, config, reference, monitor_enabled).await
        }
        _ => {
            run(
                source,
                ConsoleSender::new(),
                config,
                reference,
                monitor_enabled,
            )
            .await
        }
    };

    match result {
        Ok(summary) => {
            tracing::info!("✅ Birthday greetings run completed!");
            tracing::info!("📊 {}", summary);
            println!("✅ Birthday greetings run completed!");
            println!("📊 {}", summary);
        }
        Err(e) => {
            tracing::error!(
                "❌ Birthday greetings run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                birthday_greetings::utils::error::ErrorSeverity::Low => 0,
                birthday_greetings::utils::error::ErrorSeverity::Medium => 2,
                birthday_greetings::utils::error::ErrorSeverity::High => 1,
                birthday_greetings::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run<S: EmployeeSource, G: GreetingSender>(
    source: S,
    sender: G,
    config: CliConfig,
    reference: NaiveDate,
    monitor_enabled: bool,
) -> Result<String> {
    let messenger = BirthdayMessenger::new(source, sender, config);
    let engine = GreetingEngine::new_with_monitoring(messenger, monitor_enabled);
    engine.run(reference).await
}
