//! Outreach notifications — overdue and due-today reminders.
//! Lightweight: no queues. Each reminder pass is recorded in a bounded history.

use bizreach_core::types::Company;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a company needs attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationKind {
    /// Past its cadence. `days` is `None` when the company was never contacted.
    Overdue { days: Option<i64> },
    DueToday,
}

/// Notification priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyPriority {
    Normal,
    High,
    Urgent,
}

/// A reminder about one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub company_id: String,
    pub company_name: String,
    pub kind: NotificationKind,
    pub priority: NotifyPriority,
    /// Human-readable line, e.g. "Tech Corp - Overdue by 6 days".
    pub message: String,
    /// When the reminder was computed.
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn overdue(company: &Company, days: Option<i64>, at: DateTime<Utc>) -> Self {
        let (priority, message) = match days {
            Some(1) => (NotifyPriority::High, format!("{} - Overdue by 1 day", company.name)),
            Some(d) => (
                NotifyPriority::High,
                format!("{} - Overdue by {d} days", company.name),
            ),
            None => (
                NotifyPriority::Urgent,
                format!("{} - Never contacted", company.name),
            ),
        };
        Self {
            company_id: company.id.clone(),
            company_name: company.name.clone(),
            kind: NotificationKind::Overdue { days },
            priority,
            message,
            timestamp: at,
        }
    }

    pub fn due_today(company: &Company, at: DateTime<Utc>) -> Self {
        Self {
            company_id: company.id.clone(),
            company_name: company.name.clone(),
            kind: NotificationKind::DueToday,
            priority: NotifyPriority::Normal,
            message: format!("{} - Due Today", company.name),
            timestamp: at,
        }
    }
}

/// Result of one reminder pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSummary {
    pub overdue: Vec<Notification>,
    pub due_today: Vec<Notification>,
}

impl NotificationSummary {
    /// Overdue plus due-today. A company counts twice if it is in both lists.
    pub fn count(&self) -> usize {
        self.overdue.len() + self.due_today.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.overdue.iter().chain(self.due_today.iter())
    }
}

/// Keeps the most recent notifications.
pub struct NotifyRouter {
    history: Vec<Notification>,
    limit: usize,
}

impl NotifyRouter {
    pub fn new(limit: usize) -> Self {
        Self {
            history: Vec::new(),
            limit,
        }
    }

    /// Record a notification in history.
    pub fn record(&mut self, notification: Notification) {
        self.history.push(notification);
        // Ring buffer — keep the last `limit`
        if self.history.len() > self.limit {
            let excess = self.history.len() - self.limit;
            self.history.drain(..excess);
        }
    }

    pub fn record_summary(&mut self, summary: &NotificationSummary) {
        for notification in summary.iter() {
            self.record(notification.clone());
        }
    }

    /// Get notification history, oldest first.
    pub fn history(&self) -> &[Notification] {
        &self.history
    }
}

impl Default for NotifyRouter {
    fn default() -> Self {
        Self::new(100)
    }
}
