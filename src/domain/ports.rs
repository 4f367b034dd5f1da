use crate::domain::model::{BirthdayMessage, Employee, GreetingBatch};
use crate::domain::services::MatchRule;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Supplies the roster of employees for one invocation.
pub trait EmployeeSource: Send + Sync {
    fn fetch(&self) -> impl std::future::Future<Output = Result<Vec<Employee>>> + Send;
}

/// Accepts the generated greetings. Implementations decide where they go
/// (console, outbox files, a captured list in tests).
pub trait GreetingSender: Send + Sync {
    fn send(
        &self,
        messages: &[BirthdayMessage],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// File seam used by the csv source and the outbox sender.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Settings the messenger reads while matching and delivering.
pub trait ConfigProvider: Send + Sync {
    fn match_mode(&self) -> MatchRule;
    fn first_match_only(&self) -> bool;
    fn subject_template(&self) -> &str;
    fn body_template(&self) -> &str;
    fn output_path(&self) -> &str;
}

/// The engine seam: fetch a roster, turn it into a greeting batch, deliver
/// the batch. The greet step is synchronous, the matching core does no I/O.
#[async_trait]
pub trait GreetingPipeline: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Employee>>;
    fn greet(&self, roster: Vec<Employee>, reference: NaiveDate) -> GreetingBatch;
    async fn deliver(&self, batch: GreetingBatch) -> Result<String>;
}
