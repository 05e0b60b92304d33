use anyhow::Result;
use chrono::{Duration, Utc};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::email::{Email, Priority};
use crate::mail::source::MailSource;

const CANNED_ALERTS: [(&str, &str); 5] = [
    (
        "CRITICAL: Service outage detected",
        "Our monitoring system has detected a service outage. Immediate action required.",
    ),
    (
        "URGENT: Security breach detected",
        "Potential security breach detected on production servers. Please investigate immediately.",
    ),
    (
        "CRITICAL: Network connectivity issues",
        "Network connectivity issues affecting multiple services. Users are reporting timeouts.",
    ),
    (
        "ALERT: Web server not responding",
        "The main web server is not responding to health checks for the past 5 minutes.",
    ),
    (
        "CRITICAL: Payment processing failure",
        "Payment processing service is failing with error code 500. Transactions are being rejected.",
    ),
];

/// In-memory demo mailbox that occasionally receives a new critical alert.
pub struct MockMailService {
    emails: Vec<Email>,
    new_mail_probability: f64,
    max_emails: usize,
    rng: StdRng,
    counter: u64,
}

impl MockMailService {
    pub fn new(new_mail_probability: f64, max_emails: usize) -> Self {
        Self::with_rng(new_mail_probability, max_emails, StdRng::from_entropy())
    }

    pub fn with_rng(new_mail_probability: f64, max_emails: usize, rng: StdRng) -> Self {
        Self {
            emails: seed_emails(),
            new_mail_probability: if new_mail_probability.is_nan() {
                0.0
            } else {
                new_mail_probability.clamp(0.0, 1.0)
            },
            max_emails,
            rng,
            counter: 0,
        }
    }

    fn generate(&mut self) -> Email {
        let (subject, body) = CANNED_ALERTS[self.rng.gen_range(0..CANNED_ALERTS.len())];
        let from = if self.rng.gen_bool(0.5) {
            "alerts@company.com"
        } else {
            "monitoring@company.com"
        };
        self.counter += 1;
        let id = format!("email-{}-{}", Utc::now().timestamp_millis(), self.counter);
        Email::new(id, from, subject, Priority::High).with_body(body)
    }
}

impl MailSource for MockMailService {
    fn fetch_critical(&mut self) -> Result<Vec<Email>> {
        Ok(self.emails.iter().take(self.max_emails).cloned().collect())
    }

    fn check_new(&mut self) -> Result<Vec<Email>> {
        if !self.rng.gen_bool(self.new_mail_probability) {
            return Ok(Vec::new());
        }
        let email = self.generate();
        debug!("Mock mailbox received {}", email.subject);
        self.emails.insert(0, email.clone());
        Ok(vec![email])
    }

    fn mark_read(&mut self, id: &str) -> Result<bool> {
        match self.emails.iter_mut().find(|e| e.id == id) {
            Some(email) => {
                email.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn seed_emails() -> Vec<Email> {
    let now = Utc::now();
    let mut db = Email::new(
        "email-1",
        "monitoring@company.com",
        "CRITICAL: Database server at 95% capacity",
        Priority::High,
    )
    .with_body(
        "The primary database server is approaching capacity limits. Please investigate immediately.",
    );
    db.received = now - Duration::minutes(35);

    let mut auth = Email::new(
        "email-2",
        "alerts@company.com",
        "URGENT: Authentication service down",
        Priority::High,
    )
    .with_body(
        "The authentication service is not responding. Users are unable to log in. Immediate action required.",
    );
    auth.received = now - Duration::minutes(120);
    auth.is_read = true;

    let mut cpu = Email::new(
        "email-3",
        "monitoring@company.com",
        "WARNING: High CPU usage detected",
        Priority::Normal,
    )
    .with_body(
        "The application server is experiencing high CPU usage. Please investigate at your convenience.",
    );
    cpu.received = now - Duration::minutes(240);
    cpu.is_read = true;

    vec![db, auth, cpu]
}
