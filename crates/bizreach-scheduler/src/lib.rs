//! # BizReach Scheduler
//!
//! Outreach cadence tracking: which company should be contacted next, how,
//! and which ones are overdue or due today.
//!
//! ## Architecture
//! ```text
//! OutreachEngine
//!   ├── Registry          companies + communication methods
//!   ├── CommunicationLog  append-only history, per company
//!   ├── SchedulePolicy    next method, overdue, due today (pure, takes `now`)
//!   ├── NotifyRouter      bounded history of reminder passes
//!   └── SnapshotStore     JsonFileStore | SqliteStore (optional)
//!
//! spawn_reminder_loop (tokio interval)
//!   └── on tick → engine.scan() → overdue / due-today notifications
//! ```

pub mod engine;
pub mod log;
pub mod notify;
pub mod persistence;
pub mod registry;
pub mod schedule;
pub mod seed;
pub mod store;

pub use engine::{DashboardRow, OutreachEngine, run_reminder_pass, spawn_reminder_loop};
pub use log::CommunicationLog;
pub use notify::{Notification, NotificationKind, NotificationSummary, NotifyPriority, NotifyRouter};
pub use persistence::SqliteStore;
pub use registry::Registry;
pub use schedule::{CompanyStatus, SchedulePolicy, ScheduledCommunication};
pub use store::{JsonFileStore, SnapshotStore};
