//! Built-in data: the default cadence and a demo data set.

use bizreach_core::traits::ids::IdGenerator;
use bizreach_core::types::{CommunicationMethod, CommunicationRecord, Company, Snapshot};
use chrono::{DateTime, Duration, Utc};

/// (name, description, mandatory) in cadence order.
const DEFAULT_METHODS: [(&str, &str, bool); 5] = [
    ("LinkedIn Post", "Post on LinkedIn", false),
    ("LinkedIn Message", "Send a direct message on LinkedIn", false),
    ("Email", "Send an email", true),
    ("Phone Call", "Make a phone call", false),
    ("Other", "Other communication method", false),
];

/// The five default communication methods, sequences 1 through 5.
pub fn default_methods(ids: &dyn IdGenerator) -> Vec<CommunicationMethod> {
    DEFAULT_METHODS
        .iter()
        .zip(1..)
        .map(|(&(name, description, mandatory), sequence)| CommunicationMethod {
            id: ids.next_id("method"),
            name: name.into(),
            description: description.into(),
            sequence,
            is_mandatory: mandatory,
        })
        .collect()
}

struct DemoCompany {
    name: &'static str,
    location: &'static str,
    email: &'static str,
    phone: &'static str,
    periodicity: u32,
    days_ago: i64,
    sequence: u32,
    kind: &'static str,
    notes: &'static str,
}

const DEMO_COMPANIES: [DemoCompany; 5] = [
    DemoCompany {
        name: "Tech Corp",
        location: "Hyderabad",
        email: "info@techcorp.com",
        phone: "+1234567890",
        periodicity: 14,
        days_ago: 20,
        sequence: 1,
        kind: "LinkedIn Post",
        notes: "Posted about new product launch.",
    },
    DemoCompany {
        name: "Innovate Inc",
        location: "Mumbai",
        email: "contact@innovateinc.com",
        phone: "+0987654321",
        periodicity: 7,
        days_ago: 7,
        sequence: 2,
        kind: "LinkedIn Message",
        notes: "Sent follow-up message for partnership.",
    },
    DemoCompany {
        name: "Global Solutions",
        location: "Bengaluru",
        email: "support@globalsolutions.com",
        phone: "+1122334455",
        periodicity: 30,
        days_ago: 12,
        sequence: 3,
        kind: "Email",
        notes: "Discussed upcoming project details.",
    },
    DemoCompany {
        name: "Future Tech",
        location: "Chennai",
        email: "info@futuretech.com",
        phone: "+4455667788",
        periodicity: 10,
        days_ago: 3,
        sequence: 4,
        kind: "Phone Call",
        notes: "Call about collaboration.",
    },
    DemoCompany {
        name: "NextGen Solutions",
        location: "Pune",
        email: "contact@nextgen.com",
        phone: "+9988776655",
        periodicity: 5,
        days_ago: 9,
        sequence: 5,
        kind: "Other",
        notes: "Met at the regional trade fair.",
    },
];

/// Default methods plus five companies at different points of their cadence,
/// each with the communication that put it there. Dates are relative to `now`.
pub fn demo_snapshot(ids: &dyn IdGenerator, now: DateTime<Utc>) -> Snapshot {
    let mut snapshot = Snapshot {
        communication_methods: default_methods(ids),
        ..Snapshot::default()
    };

    for demo in &DEMO_COMPANIES {
        let at = now - Duration::days(demo.days_ago);
        let company = Company {
            id: ids.next_id("company"),
            name: demo.name.into(),
            location: demo.location.into(),
            linkedin_profile: None,
            emails: vec![demo.email.into()],
            phone_numbers: vec![demo.phone.into()],
            comments: String::new(),
            communication_periodicity: demo.periodicity,
            last_communication_date: Some(at),
            last_communication_sequence: demo.sequence,
        };
        snapshot.communications.push(CommunicationRecord {
            id: ids.next_id("comm"),
            company_id: company.id.clone(),
            kind: demo.kind.into(),
            timestamp: at,
            notes: demo.notes.into(),
            sequence: demo.sequence,
            created_at: at,
        });
        snapshot.companies.push(company);
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizreach_core::traits::ids::SequentialIds;

    #[test]
    fn test_default_methods() {
        let methods = default_methods(&SequentialIds::new());
        let seqs: Vec<u32> = methods.iter().map(|m| m.sequence).collect();
        assert_eq!(seqs, [1, 2, 3, 4, 5]);
        let mandatory: Vec<&str> = methods
            .iter()
            .filter(|m| m.is_mandatory)
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(mandatory, ["Email"]);
    }

    #[test]
    fn test_demo_snapshot_is_consistent() {
        let now = Utc::now();
        let snapshot = demo_snapshot(&SequentialIds::new(), now);
        assert_eq!(snapshot.companies.len(), 5);
        assert_eq!(snapshot.communications.len(), 5);
        for (company, record) in snapshot.companies.iter().zip(&snapshot.communications) {
            assert_eq!(record.company_id, company.id);
            assert_eq!(Some(record.timestamp), company.last_communication_date);
            assert_eq!(record.sequence, company.last_communication_sequence);
        }
    }
}
