use crate::domain::model::BirthdayMessage;
use crate::domain::ports::{GreetingSender, Storage};
use crate::utils::error::{GreetingError, Result};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Sender that prints each greeting to stdout. The default delivery mode,
/// kept deliberately free of real email plumbing.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSender;

impl ConsoleSender {
    pub fn new() -> Self {
        Self
    }
}

impl GreetingSender for ConsoleSender {
    async fn send(&self, messages: &[BirthdayMessage]) -> Result<()> {
        if messages.is_empty() {
            println!("📭 No birthday greetings today");
            return Ok(());
        }

        for message in messages {
            println!("📧 {}: {}", message.subject, message.message);
        }
        tracing::info!("Printed {} greeting(s) to console", messages.len());
        Ok(())
    }
}

/// File format written by the outbox sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = GreetingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(GreetingError::InvalidConfigValueError {
                field: "output_formats".to_string(),
                value: other.to_string(),
                reason: "expected one of: text, csv, json".to_string(),
            }),
        }
    }
}

/// Sender that writes greetings into outbox files instead of delivering
/// them. Files are written even for an empty batch so a run always leaves a
/// record behind.
pub struct OutboxSender<S: Storage> {
    storage: S,
    output_path: String,
    formats: Vec<OutputFormat>,
    text_filename: String,
    csv_filename: String,
    json_filename: String,
}

impl<S: Storage> OutboxSender<S> {
    pub fn new(storage: S, output_path: impl Into<String>) -> Self {
        Self {
            storage,
            output_path: output_path.into(),
            formats: vec![OutputFormat::Text, OutputFormat::Csv],
            text_filename: "greetings.txt".to_string(),
            csv_filename: "greetings.csv".to_string(),
            json_filename: "greetings.json".to_string(),
        }
    }

    pub fn with_formats(mut self, formats: Vec<OutputFormat>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_filename(mut self, format: OutputFormat, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        match format {
            OutputFormat::Text => self.text_filename = filename,
            OutputFormat::Csv => self.csv_filename = filename,
            OutputFormat::Json => self.json_filename = filename,
        }
        self
    }

    fn target_path(&self, filename: &str) -> String {
        Path::new(&self.output_path)
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }

    fn render_text(messages: &[BirthdayMessage]) -> String {
        let mut out = String::new();
        for message in messages {
            out.push_str(&format!("Subject: {}\n{}\n\n", message.subject, message.message));
        }
        out
    }

    fn render_csv(messages: &[BirthdayMessage]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(vec![]);
        for message in messages {
            writer.serialize(message)?;
        }
        // An empty batch still gets its header row.
        if messages.is_empty() {
            writer.write_record(["subject", "message"])?;
        }
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| GreetingError::DeliveryError {
                message: format!("Failed to finish CSV outbox: {}", e),
            })
    }
}

impl<S: Storage> GreetingSender for OutboxSender<S> {
    async fn send(&self, messages: &[BirthdayMessage]) -> Result<()> {
        for format in &self.formats {
            let (path, data) = match format {
                OutputFormat::Text => (
                    self.target_path(&self.text_filename),
                    Self::render_text(messages).into_bytes(),
                ),
                OutputFormat::Csv => {
                    (self.target_path(&self.csv_filename), Self::render_csv(messages)?)
                }
                OutputFormat::Json => (
                    self.target_path(&self.json_filename),
                    serde_json::to_string_pretty(messages)?.into_bytes(),
                ),
            };

            self.storage.write_file(&path, &data).await?;
            tracing::info!("📄 Wrote {} greeting(s) to {}", messages.len(), path);
        }
        Ok(())
    }
}

/// Test double that records every delivered greeting in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingSender {
    sent: Arc<tokio::sync::Mutex<Vec<BirthdayMessage>>>,
}

impl CollectingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<BirthdayMessage> {
        self.sent.lock().await.clone()
    }
}

impl GreetingSender for CollectingSender {
    async fn send(&self, messages: &[BirthdayMessage]) -> Result<()> {
        self.sent.lock().await.extend_from_slice(messages);
        Ok(())
    }
}
