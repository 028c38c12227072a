//! Outreach engine — owns the registry and the communication log, answers
//! scheduling questions, and keeps an optional snapshot store in sync.
//!
//! Mutations take `&mut self`, so a single engine is single-writer by
//! construction. To share one across tasks wrap it in
//! `Arc<tokio::sync::Mutex<OutreachEngine>>`; the lock then covers each
//! communication logging as one critical section.

use std::sync::Arc;

use bizreach_core::config::ReachConfig;
use bizreach_core::error::{ReachError, Result};
use bizreach_core::traits::clock::{Clock, SystemClock};
use bizreach_core::traits::ids::{IdGenerator, UuidIds};
use bizreach_core::types::{
    CommunicationMethod, CommunicationRecord, Company, CompanyPatch, MethodPatch,
    NewCommunication, NewCompany, NewMethod, Snapshot,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::log::CommunicationLog;
use crate::notify::{Notification, NotificationSummary, NotifyRouter};
use crate::registry::Registry;
use crate::schedule::{CompanyStatus, SchedulePolicy, ScheduledCommunication};
use crate::seed;
use crate::store::SnapshotStore;

/// One company as the dashboard shows it.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardRow {
    pub company: Company,
    pub status: CompanyStatus,
    pub recent: Vec<CommunicationRecord>,
    pub next: Option<ScheduledCommunication>,
}

/// The outreach engine.
pub struct OutreachEngine {
    registry: Registry,
    log: CommunicationLog,
    policy: SchedulePolicy,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    store: Option<Box<dyn SnapshotStore>>,
    auto_save: bool,
    recent_limit: usize,
    pub router: NotifyRouter,
}

impl OutreachEngine {
    /// Create an empty engine. Installs the default methods if configured to.
    pub fn new(config: &ReachConfig, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self::from_snapshot(config, clock, ids, Snapshot::default())
    }

    /// Create with the wall clock and UUID ids.
    pub fn with_defaults(config: &ReachConfig) -> Self {
        Self::new(config, Arc::new(SystemClock), Arc::new(UuidIds))
    }

    /// Rebuild from stored state. The default methods are installed only into
    /// an empty snapshot, so deleting every method sticks.
    pub fn from_snapshot(
        config: &ReachConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        snapshot: Snapshot,
    ) -> Self {
        let fresh = snapshot.is_empty();
        let mut methods = snapshot.communication_methods;
        if fresh && config.seed_defaults {
            methods = seed::default_methods(ids.as_ref());
            tracing::info!("📇 Installed {} default communication methods", methods.len());
        }

        Self {
            registry: Registry::from_parts(
                snapshot.companies,
                methods,
                ids.clone(),
                config.schedule.default_periodicity_days,
            ),
            log: CommunicationLog::from_records(snapshot.communications),
            policy: SchedulePolicy::from_config(&config.schedule),
            clock,
            ids,
            store: None,
            auto_save: config.storage.auto_save,
            recent_limit: config.schedule.recent_limit,
            router: NotifyRouter::new(config.reminder.history_limit),
        }
    }

    /// Load state from `store` and keep it attached for saving.
    pub fn open(
        config: &ReachConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        store: Box<dyn SnapshotStore>,
    ) -> Result<Self> {
        let snapshot = store.load()?;
        tracing::info!(
            "📂 Opened {} ({} companies, {} communications)",
            store.location(),
            snapshot.companies.len(),
            snapshot.communications.len()
        );
        let seeded = snapshot.is_empty() && config.seed_defaults;
        let mut engine = Self::from_snapshot(config, clock, ids, snapshot);
        engine.store = Some(store);
        if seeded {
            engine.persist();
        }
        Ok(engine)
    }

    pub fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ─── Registry ─────────────────────────────────────────────

    pub fn add_company(&mut self, input: NewCompany) -> Result<Company> {
        let company = self.registry.add_company(input)?;
        self.persist();
        Ok(company)
    }

    pub fn update_company(&mut self, patch: CompanyPatch) -> Result<Company> {
        let company = self.registry.update_company(patch)?;
        self.persist();
        Ok(company)
    }

    /// Idempotent: returns whether a company was removed.
    pub fn delete_company(&mut self, id: &str) -> bool {
        let removed = self.registry.delete_company(id);
        if removed {
            self.persist();
        }
        removed
    }

    pub fn company(&self, id: &str) -> Option<&Company> {
        self.registry.company(id)
    }

    pub fn companies(&self) -> &[Company] {
        self.registry.companies()
    }

    pub fn add_method(&mut self, input: NewMethod) -> Result<CommunicationMethod> {
        let method = self.registry.add_method(input)?;
        self.persist();
        Ok(method)
    }

    pub fn update_method(&mut self, patch: MethodPatch) -> Result<CommunicationMethod> {
        let method = self.registry.update_method(patch)?;
        self.persist();
        Ok(method)
    }

    pub fn delete_method(&mut self, id: &str) -> bool {
        let removed = self.registry.delete_method(id);
        if removed {
            self.persist();
        }
        removed
    }

    /// Methods in cadence order.
    pub fn methods(&self) -> Vec<&CommunicationMethod> {
        self.registry.ordered_methods()
    }

    pub fn method_count(&self) -> usize {
        self.registry.method_count()
    }

    // ─── Communication log ────────────────────────────────────

    /// Log a communication and advance the company's cadence position.
    pub fn record_communication(
        &mut self,
        company_id: &str,
        input: NewCommunication,
    ) -> Result<CommunicationRecord> {
        let created_at = self.clock.now();
        let record = self.log.record(
            &mut self.registry,
            company_id,
            input,
            self.ids.as_ref(),
            created_at,
        )?;
        self.persist();
        Ok(record)
    }

    /// Log the same communication for several companies. Every id is checked
    /// first; if any is unknown nothing is logged.
    pub fn record_communication_bulk(
        &mut self,
        company_ids: &[String],
        input: NewCommunication,
    ) -> Result<Vec<CommunicationRecord>> {
        if let Some(missing) = company_ids
            .iter()
            .find(|id| self.registry.company(id).is_none())
        {
            return Err(ReachError::company_not_found(missing));
        }

        let created_at = self.clock.now();
        let mut records = Vec::with_capacity(company_ids.len());
        for id in company_ids {
            records.push(self.log.record(
                &mut self.registry,
                id,
                input.clone(),
                self.ids.as_ref(),
                created_at,
            )?);
        }
        self.persist();
        Ok(records)
    }

    pub fn last_n_communications(&self, company_id: &str, n: usize) -> Vec<&CommunicationRecord> {
        self.log.last_n(company_id, n)
    }

    /// The dashboard's "last five" view.
    pub fn recent_communications(&self, company_id: &str) -> Vec<&CommunicationRecord> {
        self.log.last_n(company_id, self.recent_limit)
    }

    pub fn all_communications(&self, company_id: &str) -> Vec<&CommunicationRecord> {
        self.log.all_for(company_id)
    }

    pub fn communication_count(&self) -> usize {
        self.log.len()
    }

    // ─── Scheduling ───────────────────────────────────────────

    /// `None` if the company does not exist or no methods are configured.
    pub fn next_scheduled_communication(&self, company_id: &str) -> Option<ScheduledCommunication> {
        let company = self.registry.company(company_id)?;
        self.policy.next_scheduled(company, self.registry.methods())
    }

    pub fn overdue_companies(&self, now: DateTime<Utc>) -> Vec<&Company> {
        self.companies()
            .iter()
            .filter(|c| self.policy.is_overdue(c, now))
            .collect()
    }

    pub fn due_today_companies(&self, now: DateTime<Utc>) -> Vec<&Company> {
        self.companies()
            .iter()
            .filter(|c| self.policy.is_due_today(c, now))
            .collect()
    }

    pub fn notifications(&self, now: DateTime<Utc>) -> NotificationSummary {
        NotificationSummary {
            overdue: self
                .overdue_companies(now)
                .into_iter()
                .map(|c| Notification::overdue(c, self.policy.overdue_days(c, now), now))
                .collect(),
            due_today: self
                .due_today_companies(now)
                .into_iter()
                .map(|c| Notification::due_today(c, now))
                .collect(),
        }
    }

    pub fn notifications_count(&self, now: DateTime<Utc>) -> usize {
        self.overdue_companies(now).len() + self.due_today_companies(now).len()
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> Vec<DashboardRow> {
        self.companies()
            .iter()
            .map(|c| DashboardRow {
                company: c.clone(),
                status: self.policy.status(c, now),
                recent: self
                    .recent_communications(&c.id)
                    .into_iter()
                    .cloned()
                    .collect(),
                next: self.policy.next_scheduled(c, self.registry.methods()),
            })
            .collect()
    }

    /// One reminder pass at the clock's current time. The result is also
    /// recorded in the router history.
    pub fn scan(&mut self) -> NotificationSummary {
        let summary = self.notifications(self.clock.now());
        self.router.record_summary(&summary);
        summary
    }

    // ─── Persistence ──────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            companies: self.registry.companies().to_vec(),
            communication_methods: self.registry.methods().to_vec(),
            communications: self.log.records().to_vec(),
        }
    }

    /// Save to the attached store. No store is a no-op.
    pub fn save(&self) -> Result<()> {
        match &self.store {
            Some(store) => store.save(&self.snapshot()),
            None => Ok(()),
        }
    }

    fn persist(&self) {
        if !self.auto_save {
            return;
        }
        if let Err(e) = self.save() {
            tracing::warn!("⚠️ Failed to save snapshot: {e}");
        }
    }
}

/// One reminder pass on a shared engine.
pub async fn run_reminder_pass(engine: &Arc<Mutex<OutreachEngine>>) -> NotificationSummary {
    let summary = engine.lock().await.scan();
    if summary.is_empty() {
        tracing::debug!("✅ Nothing due");
        return summary;
    }
    for notification in summary.iter() {
        tracing::info!("🔔 {}", notification.message);
    }
    tracing::info!("📣 {} notification(s)", summary.count());
    summary
}

/// Spawn-able reminder loop: recompute notifications every `check_interval_secs`.
pub async fn spawn_reminder_loop(engine: Arc<Mutex<OutreachEngine>>, check_interval_secs: u64) {
    tracing::info!(
        "⏰ Reminder loop started (check every {}s)",
        check_interval_secs
    );

    let mut interval =
        tokio::time::interval(std::time::Duration::from_secs(check_interval_secs.max(1)));

    loop {
        interval.tick().await;
        run_reminder_pass(&engine).await;
    }
}
