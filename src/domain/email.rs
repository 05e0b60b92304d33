use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type EmailId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// A message pulled from the mailbox. Only `is_read` changes after receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: EmailId,
    pub from: String,
    pub subject: String,
    pub body: String,
    pub received: DateTime<Utc>,
    pub is_read: bool,
    pub priority: Priority,
}

impl Email {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            subject: subject.into(),
            body: String::new(),
            received: Utc::now(),
            is_read: false,
            priority,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}
