//! Communication log — append-only, partitioned by company.
//!
//! Recording a communication also advances the company's cadence position.
//! Both writes happen inside one `&mut` borrow of the registry and the log,
//! after every fallible check, so nobody can see one without the other.

use std::collections::HashMap;

use bizreach_core::error::{ReachError, Result};
use bizreach_core::traits::ids::IdGenerator;
use bizreach_core::types::{CommunicationRecord, NewCommunication};
use chrono::{DateTime, Utc};

use crate::registry::Registry;
use crate::schedule;

/// Owns every communication record, in insertion order.
#[derive(Debug, Default)]
pub struct CommunicationLog {
    records: Vec<CommunicationRecord>,
    /// company id → indexes into `records`.
    by_company: HashMap<String, Vec<usize>>,
}

impl CommunicationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored records, keeping their order.
    pub fn from_records(records: Vec<CommunicationRecord>) -> Self {
        let mut log = Self::new();
        for record in records {
            log.append(record);
        }
        log
    }

    fn append(&mut self, record: CommunicationRecord) {
        self.by_company
            .entry(record.company_id.clone())
            .or_default()
            .push(self.records.len());
        self.records.push(record);
    }

    /// Log a communication and advance the company's cadence.
    ///
    /// Fails with `NotFound` if the company does not exist; nothing is
    /// written in that case.
    pub fn record(
        &mut self,
        registry: &mut Registry,
        company_id: &str,
        input: NewCommunication,
        ids: &dyn IdGenerator,
        created_at: DateTime<Utc>,
    ) -> Result<CommunicationRecord> {
        let method_count = registry.method_count();
        let company = registry
            .company_mut(company_id)
            .ok_or_else(|| ReachError::company_not_found(company_id))?;

        let sequence = schedule::next_sequence(company.last_communication_sequence, method_count);
        let record = CommunicationRecord {
            id: ids.next_id("comm"),
            company_id: company.id.clone(),
            kind: input.kind,
            timestamp: input.timestamp,
            notes: input.notes,
            sequence,
            created_at,
        };

        company.last_communication_date = Some(record.timestamp);
        company.last_communication_sequence = sequence;
        self.append(record.clone());

        tracing::info!(
            "📝 Communication logged: '{}' for {} (sequence {})",
            record.kind,
            record.company_id,
            record.sequence
        );
        Ok(record)
    }

    /// Every record for a company, newest first. Equal timestamps keep
    /// insertion order.
    pub fn all_for(&self, company_id: &str) -> Vec<&CommunicationRecord> {
        let mut records: Vec<&CommunicationRecord> = self
            .by_company
            .get(company_id)
            .map(|idx| idx.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    /// The `n` most recent records for a company.
    pub fn last_n(&self, company_id: &str, n: usize) -> Vec<&CommunicationRecord> {
        let mut records = self.all_for(company_id);
        records.truncate(n);
        records
    }

    /// All records in insertion order, including orphans of deleted companies.
    pub fn records(&self) -> &[CommunicationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizreach_core::traits::ids::SequentialIds;
    use bizreach_core::types::{NewCompany, NewMethod};
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap()
    }

    fn setup(methods: usize) -> (Registry, CommunicationLog, Arc<SequentialIds>, String) {
        let ids = Arc::new(SequentialIds::new());
        let mut reg = Registry::new(ids.clone(), 14);
        for i in 0..methods {
            reg.add_method(NewMethod::new(format!("Step {}", i + 1))).unwrap();
        }
        let company = reg.add_company(NewCompany::new("Tech Corp", "Hyderabad")).unwrap();
        (reg, CommunicationLog::new(), ids, company.id)
    }

    #[test]
    fn test_record_updates_company_and_log_together() {
        let (mut reg, mut log, ids, id) = setup(3);
        let input = NewCommunication::new("Step 1", t0()).with_notes("intro post");
        let record = log.record(&mut reg, &id, input, ids.as_ref(), t0()).unwrap();

        let company = reg.company(&id).unwrap();
        let latest = log.last_n(&id, 1)[0];
        assert_eq!(latest, &record);
        assert_eq!(latest.sequence, company.last_communication_sequence);
        assert_eq!(Some(latest.timestamp), company.last_communication_date);
        assert_eq!(record.sequence, 1);
        assert_eq!(record.notes, "intro post");
    }

    #[test]
    fn test_record_unknown_company_writes_nothing() {
        let (mut reg, mut log, ids, _) = setup(3);
        let err = log
            .record(&mut reg, "missing", NewCommunication::new("Email", t0()), ids.as_ref(), t0())
            .unwrap_err();
        assert!(matches!(err, ReachError::NotFound { .. }));
        assert!(log.is_empty());
    }

    #[test]
    fn test_sequence_saturates_at_method_count() {
        let (mut reg, mut log, ids, id) = setup(3);
        let mut seen = Vec::new();
        for day in 0..6 {
            let at = t0() + Duration::days(day);
            let record = log
                .record(&mut reg, &id, NewCommunication::new("Email", at), ids.as_ref(), at)
                .unwrap();
            seen.push(record.sequence);
        }
        assert_eq!(seen, [1, 2, 3, 3, 3, 3]);
        assert_eq!(reg.company(&id).unwrap().last_communication_sequence, 3);
    }

    #[test]
    fn test_history_is_newest_first_and_truncated() {
        let (mut reg, mut log, ids, id) = setup(5);
        // Logged out of order: timestamps decide, not insertion.
        for offset in [3, 1, 7, 5, 2, 6] {
            let at = t0() + Duration::days(offset);
            log.record(&mut reg, &id, NewCommunication::new("Email", at), ids.as_ref(), t0())
                .unwrap();
        }

        let all: Vec<i64> = log
            .all_for(&id)
            .iter()
            .map(|r| (r.timestamp - t0()).num_days())
            .collect();
        assert_eq!(all, [7, 6, 5, 3, 2, 1]);

        let recent = log.last_n(&id, 5);
        assert_eq!(recent.len(), 5);
        assert_eq!((recent[4].timestamp - t0()).num_days(), 2);
    }

    #[test]
    fn test_equal_timestamps_keep_insertion_order() {
        let (mut reg, mut log, ids, id) = setup(3);
        for kind in ["Post", "Message", "Email"] {
            log.record(&mut reg, &id, NewCommunication::new(kind, t0()), ids.as_ref(), t0())
                .unwrap();
        }
        let kinds: Vec<&str> = log.all_for(&id).iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(kinds, ["Post", "Message", "Email"]);
    }

    #[test]
    fn test_records_survive_company_deletion() {
        let (mut reg, mut log, ids, id) = setup(2);
        log.record(&mut reg, &id, NewCommunication::new("Email", t0()), ids.as_ref(), t0())
            .unwrap();
        reg.delete_company(&id);

        assert_eq!(log.len(), 1);
        assert_eq!(log.all_for(&id).len(), 1);
        assert!(log.all_for("other").is_empty());
    }

    #[test]
    fn test_from_records_rebuilds_partitions() {
        let (mut reg, mut log, ids, id) = setup(2);
        log.record(&mut reg, &id, NewCommunication::new("Email", t0()), ids.as_ref(), t0())
            .unwrap();
        let rebuilt = CommunicationLog::from_records(log.records().to_vec());
        assert_eq!(rebuilt.last_n(&id, 5), log.last_n(&id, 5));
    }
}
