use crate::core::{ConfigProvider, EmployeeSource, GreetingPipeline, GreetingSender};
use crate::domain::model::{Employee, GreetingBatch};
use crate::domain::services::{collect_greetings_with, first_greeting_with};
use crate::utils::error::Result;
use chrono::NaiveDate;

/// The standard pipeline: fetch a roster through an [`EmployeeSource`],
/// match it against a reference date, deliver through a [`GreetingSender`].
pub struct BirthdayMessenger<S: EmployeeSource, G: GreetingSender, C: ConfigProvider> {
    source: S,
    sender: G,
    config: C,
    empty_roster_fallback: bool,
}

impl<S: EmployeeSource, G: GreetingSender, C: ConfigProvider> BirthdayMessenger<S, G, C> {
    pub fn new(source: S, sender: G, config: C) -> Self {
        Self {
            source,
            sender,
            config,
            empty_roster_fallback: false,
        }
    }

    /// When enabled, a failing roster source degrades the run to an empty
    /// roster instead of aborting it.
    pub fn with_empty_roster_fallback(mut self, fallback: bool) -> Self {
        self.empty_roster_fallback = fallback;
        self
    }
}

#[async_trait::async_trait]
impl<S: EmployeeSource, G: GreetingSender, C: ConfigProvider> GreetingPipeline
    for BirthdayMessenger<S, G, C>
{
    async fn fetch(&self) -> Result<Vec<Employee>> {
        match self.source.fetch().await {
            Ok(roster) => Ok(roster),
            Err(e) if self.empty_roster_fallback => {
                tracing::warn!("⚠️ Roster source failed ({}), continuing with empty roster", e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn greet(&self, roster: Vec<Employee>, reference: NaiveDate) -> GreetingBatch {
        let rule = self.config.match_mode();
        let subject = self.config.subject_template();
        let body = self.config.body_template();
        let roster_size = roster.len();

        let messages = if self.config.first_match_only() {
            // At most one message per batch here; the empty sentinel is
            // never delivered.
            let greeting = first_greeting_with(&roster, reference, rule, subject, body);
            if greeting.is_empty() {
                Vec::new()
            } else {
                vec![greeting]
            }
        } else {
            collect_greetings_with(&roster, reference, rule, subject, body)
        };

        GreetingBatch::new(reference, messages, roster_size)
    }

    async fn deliver(&self, batch: GreetingBatch) -> Result<String> {
        self.sender.send(&batch.messages).await?;
        Ok(format!(
            "{} greeting(s) for {} employee(s) on {}",
            batch.messages.len(),
            batch.roster_size,
            batch.reference
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::senders::CollectingSender;
    use crate::adapters::sources::InMemoryEmployeeSource;
    use crate::domain::services::{
        MatchRule, DEFAULT_BODY_TEMPLATE, DEFAULT_SUBJECT_TEMPLATE,
    };
    use crate::utils::error::GreetingError;

    struct MockConfig {
        match_mode: MatchRule,
        first_match_only: bool,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                match_mode: MatchRule::DayAndMonth,
                first_match_only: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn match_mode(&self) -> MatchRule {
            self.match_mode
        }

        fn first_match_only(&self) -> bool {
            self.first_match_only
        }

        fn subject_template(&self) -> &str {
            DEFAULT_SUBJECT_TEMPLATE
        }

        fn body_template(&self) -> &str {
            DEFAULT_BODY_TEMPLATE
        }

        fn output_path(&self) -> &str {
            "test_output"
        }
    }

    struct FailingSource;

    impl EmployeeSource for FailingSource {
        async fn fetch(&self) -> Result<Vec<Employee>> {
            Err(GreetingError::ProcessingError {
                message: "roster unavailable".to_string(),
            })
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn sample_roster() -> Vec<Employee> {
        vec![
            Employee::new("GeePaw", date(2018, 3, 5)),
            Employee::new("John", date(2018, 3, 5)),
            Employee::new("Ada", date(1990, 12, 10)),
        ]
    }

    #[tokio::test]
    async fn test_full_run_delivers_matching_greetings_in_roster_order() {
        let sender = CollectingSender::new();
        let messenger = BirthdayMessenger::new(
            InMemoryEmployeeSource::new(sample_roster()),
            sender.clone(),
            MockConfig::new(),
        );

        let roster = messenger.fetch().await.unwrap();
        let batch = messenger.greet(roster, date(2021, 3, 5));
        let summary = messenger.deliver(batch).await.unwrap();

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].message, "Happy birthday, dear GeePaw!");
        assert_eq!(sent[1].message, "Happy birthday, dear John!");
        assert_eq!(summary, "2 greeting(s) for 3 employee(s) on 2021-03-05");
    }

    #[tokio::test]
    async fn test_first_match_only_delivers_a_single_greeting() {
        let sender = CollectingSender::new();
        let mut config = MockConfig::new();
        config.first_match_only = true;
        let messenger = BirthdayMessenger::new(
            InMemoryEmployeeSource::new(sample_roster()),
            sender.clone(),
            config,
        );

        let batch = messenger.greet(sample_roster(), date(2021, 3, 5));
        messenger.deliver(batch).await.unwrap();

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, "Happy birthday, dear GeePaw!");
    }

    #[tokio::test]
    async fn test_first_match_only_without_match_delivers_nothing() {
        let sender = CollectingSender::new();
        let mut config = MockConfig::new();
        config.first_match_only = true;
        let messenger = BirthdayMessenger::new(
            InMemoryEmployeeSource::new(sample_roster()),
            sender.clone(),
            config,
        );

        let batch = messenger.greet(sample_roster(), date(2019, 9, 4));
        assert!(batch.messages.is_empty());

        messenger.deliver(batch).await.unwrap();
        assert!(sender.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_exact_date_rule_is_taken_from_config() {
        let mut config = MockConfig::new();
        config.match_mode = MatchRule::ExactDate;
        let messenger = BirthdayMessenger::new(
            InMemoryEmployeeSource::new(sample_roster()),
            CollectingSender::new(),
            config,
        );

        let on_later_year = messenger.greet(sample_roster(), date(2021, 3, 5));
        assert!(on_later_year.messages.is_empty());

        let on_birth_year = messenger.greet(sample_roster(), date(2018, 3, 5));
        assert_eq!(on_birth_year.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_roster_produces_empty_batch() {
        let messenger = BirthdayMessenger::new(
            InMemoryEmployeeSource::default(),
            CollectingSender::new(),
            MockConfig::new(),
        );

        let roster = messenger.fetch().await.unwrap();
        let batch = messenger.greet(roster, date(2021, 3, 5));

        assert_eq!(batch.roster_size, 0);
        assert!(batch.messages.is_empty());
    }

    #[tokio::test]
    async fn test_source_failure_aborts_by_default() {
        let messenger =
            BirthdayMessenger::new(FailingSource, CollectingSender::new(), MockConfig::new());

        let result = messenger.fetch().await;

        assert!(matches!(
            result,
            Err(GreetingError::ProcessingError { .. })
        ));
    }

    #[tokio::test]
    async fn test_source_failure_degrades_to_empty_roster_when_enabled() {
        let messenger =
            BirthdayMessenger::new(FailingSource, CollectingSender::new(), MockConfig::new())
                .with_empty_roster_fallback(true);

        let roster = messenger.fetch().await.unwrap();

        assert!(roster.is_empty());
    }
}
