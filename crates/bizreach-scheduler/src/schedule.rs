//! Scheduling rules — pure functions over a company, the method list, and `now`.
//! Nothing here is stored; every view is recomputed from current records.

use bizreach_core::config::{DueTodayRule, ScheduleConfig};
use bizreach_core::types::{CommunicationMethod, Company};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// The next communication a company is expected to receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledCommunication {
    /// Last communication (or the epoch) plus the periodicity.
    pub date: DateTime<Utc>,
    /// Method name.
    #[serde(rename = "type")]
    pub kind: String,
    pub sequence: u32,
}

/// Dashboard colour code for a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompanyStatus {
    Overdue,
    DueToday,
    Normal,
}

impl std::fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompanyStatus::Overdue => write!(f, "overdue"),
            CompanyStatus::DueToday => write!(f, "due-today"),
            CompanyStatus::Normal => write!(f, "normal"),
        }
    }
}

/// Whole days from `since` to `now`, rounded toward negative infinity.
pub fn elapsed_days(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - since).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Cadence position reached by the next logged communication.
///
/// Stays put once it equals the method count, otherwise advances by one.
pub fn next_sequence(last: u32, method_count: usize) -> u32 {
    if last as usize == method_count {
        last
    } else {
        last.saturating_add(1)
    }
}

/// Methods in ascending `sequence`. Equal sequences keep registration order.
pub fn ordered_methods(methods: &[CommunicationMethod]) -> Vec<&CommunicationMethod> {
    let mut ordered: Vec<&CommunicationMethod> = methods.iter().collect();
    ordered.sort_by_key(|m| m.sequence);
    ordered
}

/// The cadence rules, parameterised by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePolicy {
    /// Used when a company's own periodicity is zero.
    pub default_periodicity: u32,
    pub due_today_rule: DueTodayRule,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self::from_config(&ScheduleConfig::default())
    }
}

impl SchedulePolicy {
    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self {
            default_periodicity: config.default_periodicity_days,
            due_today_rule: config.due_today_rule,
        }
    }

    pub fn with_rule(mut self, rule: DueTodayRule) -> Self {
        self.due_today_rule = rule;
        self
    }

    /// Periodicity in days, falling back to the default when unset.
    pub fn periodicity(&self, company: &Company) -> u32 {
        if company.communication_periodicity == 0 {
            self.default_periodicity
        } else {
            company.communication_periodicity
        }
    }

    /// `base` plus the periodicity. `None` past the representable range.
    pub fn due_date(&self, company: &Company, base: DateTime<Utc>) -> Option<DateTime<Utc>> {
        base.checked_add_signed(Duration::days(i64::from(self.periodicity(company))))
    }

    /// Next expected communication, or `None` when no methods are configured.
    ///
    /// A company that has not started the cadence (sequence 0) is treated as
    /// sitting on sequence 1, so the suggestion is the first method after it.
    /// Past the last method the suggestion stays on the last method.
    pub fn next_scheduled(
        &self,
        company: &Company,
        methods: &[CommunicationMethod],
    ) -> Option<ScheduledCommunication> {
        let ordered = ordered_methods(methods);
        let current = company.last_communication_sequence.max(1);
        let next = ordered
            .iter()
            .find(|m| m.sequence > current)
            .or_else(|| ordered.last())?;

        let base = company.last_communication_date.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        Some(ScheduledCommunication {
            date: self
                .due_date(company, base)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            kind: next.name.clone(),
            sequence: next.sequence,
        })
    }

    /// Never contacted, or more whole days elapsed than the periodicity.
    pub fn is_overdue(&self, company: &Company, now: DateTime<Utc>) -> bool {
        match company.last_communication_date {
            None => true,
            Some(last) => elapsed_days(last, now) > i64::from(self.periodicity(company)),
        }
    }

    /// Days past the periodicity. `None` when not overdue or never contacted.
    pub fn overdue_days(&self, company: &Company, now: DateTime<Utc>) -> Option<i64> {
        let last = company.last_communication_date?;
        let over = elapsed_days(last, now) - i64::from(self.periodicity(company));
        (over > 0).then_some(over)
    }

    pub fn is_due_today(&self, company: &Company, now: DateTime<Utc>) -> bool {
        let Some(last) = company.last_communication_date else {
            return false;
        };
        let periodicity = i64::from(self.periodicity(company));
        match self.due_today_rule {
            DueTodayRule::ElapsedDays => elapsed_days(last, now) == periodicity,
            DueTodayRule::CalendarDate => self
                .due_date(company, last)
                .is_some_and(|due| due.date_naive() == now.date_naive()),
        }
    }

    /// Overdue takes precedence over due-today.
    pub fn status(&self, company: &Company, now: DateTime<Utc>) -> CompanyStatus {
        if self.is_overdue(company, now) {
            CompanyStatus::Overdue
        } else if self.is_due_today(company, now) {
            CompanyStatus::DueToday
        } else {
            CompanyStatus::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 20, 15, 0, 0).unwrap()
    }

    fn company(periodicity: u32, last: Option<DateTime<Utc>>, seq: u32) -> Company {
        Company {
            id: "company-1".into(),
            name: "Tech Corp".into(),
            location: "Hyderabad".into(),
            linkedin_profile: None,
            emails: vec![String::new()],
            phone_numbers: vec![String::new()],
            comments: String::new(),
            communication_periodicity: periodicity,
            last_communication_date: last,
            last_communication_sequence: seq,
        }
    }

    fn method(name: &str, sequence: u32) -> CommunicationMethod {
        CommunicationMethod {
            id: format!("method-{name}"),
            name: name.into(),
            description: String::new(),
            sequence,
            is_mandatory: false,
        }
    }

    fn three_methods() -> Vec<CommunicationMethod> {
        vec![method("Post", 1), method("Message", 2), method("Email", 3)]
    }

    #[test]
    fn test_never_contacted_is_always_overdue() {
        let policy = SchedulePolicy::default();
        for periodicity in [0, 1, 14, 365] {
            let c = company(periodicity, None, 0);
            assert!(policy.is_overdue(&c, now()));
            assert!(!policy.is_due_today(&c, now()));
            assert_eq!(policy.overdue_days(&c, now()), None);
        }
    }

    #[test]
    fn test_twenty_days_on_fourteen_day_cadence() {
        let policy = SchedulePolicy::default();
        let c = company(14, Some(now() - Duration::days(20)), 1);
        assert!(policy.is_overdue(&c, now()));
        assert_eq!(policy.overdue_days(&c, now()), Some(6));
        assert_eq!(policy.status(&c, now()), CompanyStatus::Overdue);
    }

    #[test]
    fn test_exactly_on_cadence_is_due_today() {
        let policy = SchedulePolicy::default();
        let c = company(7, Some(now() - Duration::days(7)), 1);
        assert!(policy.is_due_today(&c, now()));
        assert!(!policy.is_overdue(&c, now()));
        assert_eq!(policy.status(&c, now()), CompanyStatus::DueToday);
    }

    #[test]
    fn test_partial_day_is_floored() {
        let policy = SchedulePolicy::default();
        // 14 days and 23 hours: still 14 whole days.
        let c = company(14, Some(now() - Duration::hours(14 * 24 + 23)), 1);
        assert!(!policy.is_overdue(&c, now()));
        assert!(policy.is_due_today(&c, now()));
    }

    #[test]
    fn test_future_last_date_is_not_overdue() {
        let policy = SchedulePolicy::default();
        let c = company(14, Some(now() + Duration::hours(3)), 1);
        assert_eq!(elapsed_days(now() + Duration::hours(3), now()), -1);
        assert!(!policy.is_overdue(&c, now()));
        assert_eq!(policy.status(&c, now()), CompanyStatus::Normal);
    }

    #[test]
    fn test_due_today_rules_disagree_near_midnight() {
        // Contacted late on Mar 13; checked early on Mar 20: only 6 whole days
        // have elapsed, but the due date's calendar day is today.
        let last = Utc.with_ymd_and_hms(2026, 3, 13, 22, 0, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2026, 3, 20, 8, 0, 0).unwrap();
        let c = company(7, Some(last), 1);

        let elapsed = SchedulePolicy::default();
        let calendar = SchedulePolicy::default().with_rule(DueTodayRule::CalendarDate);
        assert!(!elapsed.is_due_today(&c, at));
        assert!(calendar.is_due_today(&c, at));
    }

    #[test]
    fn test_due_today_rules_agree_on_whole_days() {
        let c = company(7, Some(now() - Duration::days(7)), 1);
        let calendar = SchedulePolicy::default().with_rule(DueTodayRule::CalendarDate);
        assert!(calendar.is_due_today(&c, now()));
        assert!(SchedulePolicy::default().is_due_today(&c, now()));
    }

    #[test]
    fn test_zero_periodicity_uses_default() {
        let policy = SchedulePolicy::default();
        let c = company(0, Some(now() - Duration::days(15)), 1);
        assert_eq!(policy.periodicity(&c), 14);
        assert_eq!(policy.overdue_days(&c, now()), Some(1));
    }

    #[test]
    fn test_next_sequence_saturates() {
        assert_eq!(next_sequence(0, 3), 1);
        assert_eq!(next_sequence(2, 3), 3);
        assert_eq!(next_sequence(3, 3), 3);
        assert_eq!(next_sequence(5, 3), 6);
        assert_eq!(next_sequence(u32::MAX, 3), u32::MAX);
        assert_eq!(next_sequence(0, 0), 0);
    }

    #[test]
    fn test_huge_periodicity_does_not_overflow() {
        let policy = SchedulePolicy::default();
        let calendar = SchedulePolicy::default().with_rule(DueTodayRule::CalendarDate);
        let c = company(u32::MAX, Some(now()), 1);

        let next = policy.next_scheduled(&c, &three_methods()).unwrap();
        assert_eq!(next.date, DateTime::<Utc>::MAX_UTC);
        assert_eq!(next.kind, "Message");
        assert!(!policy.is_overdue(&c, now()));
        assert!(!policy.is_due_today(&c, now()));
        assert!(!calendar.is_due_today(&c, now()));
        assert_eq!(calendar.status(&c, now()), CompanyStatus::Normal);
    }

    #[test]
    fn test_new_company_skips_to_method_after_first() {
        let policy = SchedulePolicy::default();
        let c = company(14, None, 0);
        let next = policy.next_scheduled(&c, &three_methods()).unwrap();
        assert_eq!(next.kind, "Message");
        assert_eq!(next.sequence, 2);
        assert_eq!(next.date, DateTime::<Utc>::UNIX_EPOCH + Duration::days(14));
    }

    #[test]
    fn test_next_scheduled_saturates_on_last_method() {
        let policy = SchedulePolicy::default();
        let last = now() - Duration::days(2);
        let c = company(10, Some(last), 3);
        let next = policy.next_scheduled(&c, &three_methods()).unwrap();
        assert_eq!(next.kind, "Email");
        assert_eq!(next.sequence, 3);
        assert_eq!(next.date, last + Duration::days(10));
    }

    #[test]
    fn test_next_scheduled_orders_by_sequence_not_insertion() {
        let policy = SchedulePolicy::default();
        let methods = vec![method("Call", 40), method("Post", 10), method("Email", 20)];
        let c = company(14, Some(now()), 10);
        let next = policy.next_scheduled(&c, &methods).unwrap();
        assert_eq!(next.kind, "Email");
    }

    #[test]
    fn test_duplicate_sequences_keep_registration_order() {
        let policy = SchedulePolicy::default();
        let methods = vec![method("Post", 1), method("Email", 2), method("Call", 2)];
        let c = company(14, Some(now()), 1);
        let next = policy.next_scheduled(&c, &methods).unwrap();
        assert_eq!(next.kind, "Email");
    }

    #[test]
    fn test_next_scheduled_without_methods() {
        let policy = SchedulePolicy::default();
        assert!(policy.next_scheduled(&company(14, None, 0), &[]).is_none());
    }

    #[test]
    fn test_next_scheduled_is_a_pure_read() {
        let policy = SchedulePolicy::default();
        let c = company(14, Some(now()), 1);
        let methods = three_methods();
        assert_eq!(
            policy.next_scheduled(&c, &methods),
            policy.next_scheduled(&c, &methods)
        );
    }
}
