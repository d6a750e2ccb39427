//! Notification sink seam and message composition.
//!
//! Delivery is a collaborator concern; the workflow only composes messages
//! and hands them to the sink. Sends are best-effort: a sink failure never
//! rolls back the workflow step that triggered it.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use jobify_models::{ApplicationStatus, InterviewDetails};

/// An outbound message: recipient, subject, HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Fire-and-forget delivery seam.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, notification: Notification) -> anyhow::Result<()>;
}

/// Sink that logs instead of delivering. Default for local development.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn send(&self, notification: Notification) -> anyhow::Result<()> {
        info!(
            to = %notification.to,
            subject = %notification.subject,
            "notification (log sink)"
        );
        Ok(())
    }
}

/// Sink that records every message, for asserting on dispatches in tests.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("sink lock poisoned").clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, notification: Notification) -> anyhow::Result<()> {
        self.sent.lock().expect("sink lock poisoned").push(notification);
        Ok(())
    }
}

// ============================================================================
// Message composition
// ============================================================================

/// Confirmation sent to the candidate right after a successful apply.
pub fn applied_message(candidate_email: &str, job_title: &str, company_name: &str) -> Notification {
    Notification {
        to: candidate_email.to_string(),
        subject: format!("You applied to {} at {}", job_title, company_name),
        html_body: format!(
            "<p>Your application for <strong>{}</strong> at <strong>{}</strong> \
             has been received.</p>",
            job_title, company_name
        ),
    }
}

/// Sent to the applicant when a company changes the application status.
pub fn status_changed_message(candidate_email: &str, status: &ApplicationStatus) -> Notification {
    Notification {
        to: candidate_email.to_string(),
        subject: format!("Your application is now: {}", status),
        html_body: format!(
            "<p>The status of your application changed to <strong>{}</strong>.</p>",
            status
        ),
    }
}

/// Richer message sent when an interview is scheduled, carrying
/// date/time/location-or-link and the company's free text.
pub fn interview_message(candidate_email: &str, details: &InterviewDetails) -> Notification {
    let mut rows = String::new();
    if let Some(ref date) = details.date {
        rows.push_str(&format!("<li>Date: {}</li>", date));
    }
    if let Some(ref time) = details.time {
        rows.push_str(&format!("<li>Time: {}</li>", time));
    }
    match (&details.location, &details.link) {
        (Some(location), _) => rows.push_str(&format!("<li>Location: {}</li>", location)),
        (None, Some(link)) => rows.push_str(&format!("<li>Join link: <a href=\"{0}\">{0}</a></li>", link)),
        (None, None) => {}
    }

    let message_block = details
        .message
        .as_deref()
        .map(|m| format!("<p>{}</p>", m))
        .unwrap_or_default();

    Notification {
        to: candidate_email.to_string(),
        subject: "Interview scheduled".to_string(),
        html_body: format!("<p>An interview has been scheduled.</p><ul>{}</ul>{}", rows, message_block),
    }
}
