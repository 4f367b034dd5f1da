use crate::domain::model::{BirthdayMessage, Employee};
use crate::utils::error::{GreetingError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default subject for every greeting.
pub const DEFAULT_SUBJECT_TEMPLATE: &str = "Happy birthday!";
/// Default body, `{name}` is replaced with the employee name verbatim.
pub const DEFAULT_BODY_TEMPLATE: &str = "Happy birthday, dear {name}!";

/// How a birthdate is compared against the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchRule {
    /// Recurring-birthday semantics: day and month must match, the year is
    /// ignored. This is the default.
    #[default]
    #[serde(rename = "day-month")]
    DayAndMonth,
    /// The full calendar date must match, year included.
    #[serde(rename = "exact-date")]
    ExactDate,
}

impl FromStr for MatchRule {
    type Err = GreetingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "day-month" => Ok(MatchRule::DayAndMonth),
            "exact-date" => Ok(MatchRule::ExactDate),
            other => Err(GreetingError::InvalidConfigValueError {
                field: "match_mode".to_string(),
                value: other.to_string(),
                reason: "expected 'day-month' or 'exact-date'".to_string(),
            }),
        }
    }
}

/// True when `birthdate` counts as a birthday on `reference` under `rule`.
/// With `DayAndMonth` a Feb-29 birthdate matches only on Feb 29.
pub fn birthday_matches(rule: MatchRule, birthdate: NaiveDate, reference: NaiveDate) -> bool {
    match rule {
        MatchRule::DayAndMonth => {
            birthdate.day() == reference.day() && birthdate.month() == reference.month()
        }
        MatchRule::ExactDate => birthdate == reference,
    }
}

/// Render one greeting for an employee. Templates may use `{name}` and
/// `{date}` placeholders, replaced verbatim.
pub fn render_greeting(
    employee: &Employee,
    reference: NaiveDate,
    subject_template: &str,
    body_template: &str,
) -> BirthdayMessage {
    let date_text = reference.format("%-d %B").to_string();
    let subject = subject_template
        .replace("{name}", &employee.name)
        .replace("{date}", &date_text);
    let message = body_template
        .replace("{name}", &employee.name)
        .replace("{date}", &date_text);
    BirthdayMessage::new(subject, message)
}

/// One greeting per matching employee, in roster order. Zero matches yields
/// an empty vec.
pub fn collect_greetings(
    roster: &[Employee],
    reference: NaiveDate,
    rule: MatchRule,
) -> Vec<BirthdayMessage> {
    collect_greetings_with(
        roster,
        reference,
        rule,
        DEFAULT_SUBJECT_TEMPLATE,
        DEFAULT_BODY_TEMPLATE,
    )
}

pub fn collect_greetings_with(
    roster: &[Employee],
    reference: NaiveDate,
    rule: MatchRule,
    subject_template: &str,
    body_template: &str,
) -> Vec<BirthdayMessage> {
    roster
        .iter()
        .filter(|employee| birthday_matches(rule, employee.birthdate, reference))
        .map(|employee| render_greeting(employee, reference, subject_template, body_template))
        .collect()
}

/// Only the first matching greeting, or the sentinel empty message when no
/// employee matches.
pub fn first_greeting(roster: &[Employee], reference: NaiveDate, rule: MatchRule) -> BirthdayMessage {
    first_greeting_with(
        roster,
        reference,
        rule,
        DEFAULT_SUBJECT_TEMPLATE,
        DEFAULT_BODY_TEMPLATE,
    )
}

pub fn first_greeting_with(
    roster: &[Employee],
    reference: NaiveDate,
    rule: MatchRule,
    subject_template: &str,
    body_template: &str,
) -> BirthdayMessage {
    roster
        .iter()
        .find(|employee| birthday_matches(rule, employee.birthdate, reference))
        .map(|employee| render_greeting(employee, reference, subject_template, body_template))
        .unwrap_or_else(BirthdayMessage::empty)
}
