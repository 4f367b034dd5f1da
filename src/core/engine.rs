use crate::core::GreetingPipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use chrono::NaiveDate;

/// Drives one fetch, match, deliver run of a [`GreetingPipeline`] and logs
/// resource stats per phase when monitoring is enabled.
pub struct GreetingEngine<P: GreetingPipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: GreetingPipeline> GreetingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self, reference: NaiveDate) -> Result<String> {
        tracing::info!("🚀 Starting birthday greetings run for {}", reference);
        self.monitor.log_stats("Startup");

        let roster = self.pipeline.fetch().await?;
        tracing::info!("📋 Fetched {} employee(s)", roster.len());
        self.monitor.log_stats("Fetch");

        let batch = self.pipeline.greet(roster, reference);
        tracing::info!("🎂 Matched {} birthday(s)", batch.messages.len());
        self.monitor.log_stats("Match");

        let summary = self.pipeline.deliver(batch).await?;
        self.monitor.log_stats("Deliver");
        self.monitor.log_final_stats();

        Ok(summary)
    }
}
