use anyhow::Result;

use crate::domain::email::Email;

/// A mailbox that yields critical alert emails.
pub trait MailSource {
    /// Current critical emails, newest first.
    fn fetch_critical(&mut self) -> Result<Vec<Email>>;
    /// Emails that arrived since the previous call.
    fn check_new(&mut self) -> Result<Vec<Email>>;
    fn mark_read(&mut self, id: &str) -> Result<bool>;
}
