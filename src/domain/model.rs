use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An employee as supplied by a roster source. Immutable value, no identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub birthdate: NaiveDate,
}

impl Employee {
    pub fn new(name: impl Into<String>, birthdate: NaiveDate) -> Self {
        Self {
            name: name.into(),
            birthdate,
        }
    }
}

/// A greeting produced for one matching employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayMessage {
    pub subject: String,
    pub message: String,
}

impl BirthdayMessage {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// The sentinel returned by the first-greeting operation when no
    /// employee matches.
    pub fn empty() -> Self {
        Self {
            subject: String::new(),
            message: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subject.is_empty() && self.message.is_empty()
    }
}

/// The outcome of one matching pass over a roster, ready for delivery.
/// Messages keep the roster order of the employees they were produced for.
#[derive(Debug, Clone)]
pub struct GreetingBatch {
    pub reference: NaiveDate,
    pub messages: Vec<BirthdayMessage>,
    pub roster_size: usize,
}

impl GreetingBatch {
    pub fn new(reference: NaiveDate, messages: Vec<BirthdayMessage>, roster_size: usize) -> Self {
        Self {
            reference,
            messages,
            roster_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_is_sentinel() {
        let sentinel = BirthdayMessage::empty();
        assert_eq!(sentinel.subject, "");
        assert_eq!(sentinel.message, "");
        assert!(sentinel.is_empty());
    }

    #[test]
    fn real_message_is_not_sentinel() {
        let message = BirthdayMessage::new("Happy birthday!", "Happy birthday, dear John!");
        assert!(!message.is_empty());
    }
}
