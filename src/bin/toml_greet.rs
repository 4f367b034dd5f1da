use birthday_greetings::config::toml_config::TomlConfig;
use birthday_greetings::domain::ports::{EmployeeSource, GreetingSender};
use birthday_greetings::utils::{logger, validation::Validate};
use birthday_greetings::{
    BirthdayMessenger, ConsoleSender, CsvEmployeeSource, GreetingEngine, HttpEmployeeSource,
    InMemoryEmployeeSource, LocalStorage, OutboxSender, OutputFormat, Result,
};
use chrono::NaiveDate;
use clap::Parser;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "toml-greet")]
#[command(about = "Birthday greetings tool with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "greetings.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override first-match-only setting from config
    #[arg(long)]
    first_only: Option<bool>,

    /// Override the reference date from config (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based birthday greetings tool");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(first_only) = args.first_only {
        config
            .matching
            .get_or_insert_with(Default::default)
            .first_match_only = Some(first_only);
        tracing::info!("🔧 First-match-only overridden to: {}", first_only);
    }

    if let Some(date) = &args.date {
        config
            .matching
            .get_or_insert_with(Default::default)
            .reference_date = Some(date.clone());
        tracing::info!("🔧 Reference date overridden to: {}", date);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No greetings will be delivered");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let reference = match config.reference_date() {
        Ok(Some(date)) => date,
        Ok(None) => chrono::Local::now().date_naive(),
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let result = match config.source.r#type.as_str() {
        "http" => {
            // validate_config guarantees the endpoint is present for http
            let endpoint = config.source.endpoint.clone().unwrap_or_default();
            let mut source = HttpEmployeeSource::new(endpoint);
            if let Some(headers) = config.source.headers.clone() {
                source = source.with_headers(headers);
            }
            if let Some(parameters) = config.source.parameters.clone() {
                source = source.with_parameters(parameters);
            }
            if let Some(timeout) = config.source.timeout_seconds {
                source = source.with_timeout(Duration::from_secs(timeout));
            }
            if let Some(mapping) = config.source.field_mapping.clone() {
                source = source.with_field_mapping(mapping);
            }
            if let Some(max) = config.max_employees() {
                source = source.with_max_employees(max);
            }
            run_with_source(source, config, reference, monitor_enabled).await
        }
        "inline" => match config.inline_roster() {
            Ok(roster) => {
                run_with_source(
                    InMemoryEmployeeSource::new(roster),
                    config,
                    reference,
                    monitor_enabled,
                )
                .await
            }
            Err(e) => Err(e),
        },
        _ => {
            let path = config.source.path.clone().unwrap_or_default();
            let source = CsvEmployeeSource::new(LocalStorage::new(".".to_string()), path);
            run_with_source(source, config, reference, monitor_enabled).await
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

async fn run_with_source<S: EmployeeSource>(
    source: S,
    config: TomlConfig,
    reference: NaiveDate,
    monitor_enabled: bool,
) -> Result<String> {
    match config.delivery.mode.as_str() {
        "outbox" => {
            let mut sender = OutboxSender::new(
                LocalStorage::new(".".to_string()),
                config.output_path().to_string(),
            );
            if let Some(formats) = &config.delivery.output_formats {
                let mut parsed = Vec::with_capacity(formats.len());
                for format in formats {
                    parsed.push(format.parse::<OutputFormat>()?);
                }
                sender = sender.with_formats(parsed);
            }
            if let Some(filenames) = &config.delivery.filenames {
                if let Some(text) = &filenames.text {
                    sender = sender.with_filename(OutputFormat::Text, text);
                }
                if let Some(csv) = &filenames.csv {
                    sender = sender.with_filename(OutputFormat::Csv, csv);
                }
                if let Some(json) = &filenames.json {
                    sender = sender.with_filename(OutputFormat::Json, json);
                }
            }
            run_pipeline(source, sender, config, reference, monitor_enabled).await
        }
        _ => run_pipeline(source, ConsoleSender::new(), config, reference, monitor_enabled).await,
    }
}

async fn run_pipeline<S: EmployeeSource, G: GreetingSender>(
    source: S,
    sender: G,
    config: TomlConfig,
    reference: NaiveDate,
    monitor_enabled: bool,
) -> Result<String> {
    let fallback = config.degrade_to_empty_roster();
    let messenger =
        BirthdayMessenger::new(source, sender, config).with_empty_roster_fallback(fallback);
    let engine = GreetingEngine::new_with_monitoring(messenger, monitor_enabled);
    engine.run(reference).await
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );

    match config.source.r#type.as_str() {
        "http" => println!(
            "  Source: http ({})",
            config.source.endpoint.as_deref().unwrap_or("")
        ),
        "inline" => println!(
            "  Source: inline ({} employee(s))",
            config
                .source
                .employees
                .as_ref()
                .map(|e| e.len())
                .unwrap_or(0)
        ),
        _ => println!(
            "  Source: csv ({})",
            config.source.path.as_deref().unwrap_or("")
        ),
    }

    println!("  Match rule: {:?}", config.match_mode());
    println!("  First match only: {}", config.first_match_only());

    let reference = config
        .matching
        .as_ref()
        .and_then(|m| m.reference_date.as_deref())
        .unwrap_or("today");
    println!("  Reference date: {}", reference);

    println!("  Delivery: {}", config.delivery.mode);
    if config.delivery.mode == "outbox" {
        println!("  Output: {}", config.output_path());
        let formats = config
            .delivery
            .output_formats
            .as_ref()
            .map(|f| f.join(", "))
            .unwrap_or_else(|| "text, csv".to_string());
        println!("  Formats: {}", formats);
    }

    if let Some(max_employees) = config.max_employees() {
        println!("  Max Employees: {}", max_employees);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &TomlConfig) -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Roster Source Analysis:");
    match config.source.r#type.as_str() {
        "http" => {
            println!(
                "  Endpoint: {}",
                config.source.endpoint.as_deref().unwrap_or("")
            );
            if let Some(headers) = &config.source.headers {
                println!("  Headers: {} custom headers", headers.len());
            }
            if let Some(params) = &config.source.parameters {
                println!("  Parameters: {} query parameters", params.len());
            }
            if let Some(timeout) = config.source.timeout_seconds {
                println!("  Timeout: {}s", timeout);
            }
        }
        "inline" => {
            let roster = config.inline_roster()?;
            println!("  Embedded roster: {} employee(s)", roster.len());
            for employee in &roster {
                println!("    {} ({})", employee.name, employee.birthdate);
            }
        }
        _ => {
            println!("  File: {}", config.source.path.as_deref().unwrap_or(""));
        }
    }

    println!();
    println!("⚙️ Matching Mode:");
    println!("  Rule: {:?}", config.match_mode());
    if config.first_match_only() {
        println!("  🎯 First-match-only: at most ONE greeting will be produced");
    } else {
        println!("  📊 All matching employees will be greeted");
    }
    match config.reference_date()? {
        Some(date) => println!("  Reference date: {}", date),
        None => println!("  Reference date: today (resolved at run time)"),
    }

    println!();
    println!("💌 Delivery Configuration:");
    println!("  Mode: {}", config.delivery.mode);
    if config.delivery.mode == "outbox" {
        println!("  Path: {}", config.output_path());
    }

    if let Some(mapping) = &config.source.field_mapping {
        println!();
        println!("🔄 Field Mapping:");
        for (from, to) in mapping {
            println!("  {} -> {}", from, to);
        }
    }

    if config.degrade_to_empty_roster() {
        println!();
        println!("⚠️ Source failures degrade to an empty roster");
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
