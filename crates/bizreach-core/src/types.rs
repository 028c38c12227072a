//! Domain records: companies, communication methods, and the communication log.
//!
//! Field names serialize in camelCase so a snapshot document reads
//! `communicationPeriodicity`, `lastCommunicationSequence`, and so on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A configured outreach step (LinkedIn post, email, call...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationMethod {
    /// Unique method ID.
    pub id: String,
    /// Display name, snapshotted into each communication record.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Position in the cadence. Compared, never assumed contiguous or unique.
    pub sequence: u32,
    #[serde(default)]
    pub is_mandatory: bool,
}

/// A company being tracked for outreach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Unique company ID.
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub linkedin_profile: Option<String>,
    /// Contact emails. Always at least one slot.
    #[serde(default = "one_empty_slot")]
    pub emails: Vec<String>,
    /// Contact phone numbers. Always at least one slot.
    #[serde(default = "one_empty_slot")]
    pub phone_numbers: Vec<String>,
    #[serde(default)]
    pub comments: String,
    /// Days between communications before the company becomes overdue.
    pub communication_periodicity: u32,
    /// When the company was last contacted. `None` means never.
    #[serde(default)]
    pub last_communication_date: Option<DateTime<Utc>>,
    /// Sequence of the last method applied. Only moves forward.
    #[serde(default)]
    pub last_communication_sequence: u32,
}

fn one_empty_slot() -> Vec<String> {
    vec![String::new()]
}

/// One logged communication. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationRecord {
    /// Unique record ID.
    pub id: String,
    /// Company this was logged against. Not checked after creation.
    pub company_id: String,
    /// Method name at the time of logging.
    #[serde(rename = "type")]
    pub kind: String,
    /// When the communication happened.
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    /// Cadence position reached by this communication.
    pub sequence: u32,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a company.
#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub location: String,
    pub linkedin_profile: Option<String>,
    pub emails: Option<Vec<String>>,
    pub phone_numbers: Option<Vec<String>>,
    pub comments: String,
    /// `None` or `Some(0)` falls back to the default periodicity.
    pub communication_periodicity: Option<u32>,
}

impl NewCompany {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a company. `None` keeps the stored value; `Some` replaces it
/// in full (list fields are replaced wholesale). Cadence progress
/// (`last_communication_*`) is not patchable.
#[derive(Debug, Clone, Default)]
pub struct CompanyPatch {
    pub id: String,
    pub name: Option<String>,
    pub location: Option<String>,
    /// `Some(None)` clears the profile.
    pub linkedin_profile: Option<Option<String>>,
    pub emails: Option<Vec<String>>,
    pub phone_numbers: Option<Vec<String>>,
    pub comments: Option<String>,
    pub communication_periodicity: Option<u32>,
}

impl CompanyPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// A patch that rewrites every patchable field with `company`'s values.
    pub fn from_company(company: &Company) -> Self {
        Self {
            id: company.id.clone(),
            name: Some(company.name.clone()),
            location: Some(company.location.clone()),
            linkedin_profile: Some(company.linkedin_profile.clone()),
            emails: Some(company.emails.clone()),
            phone_numbers: Some(company.phone_numbers.clone()),
            comments: Some(company.comments.clone()),
            communication_periodicity: Some(company.communication_periodicity),
        }
    }

    /// Merge this patch over `company`.
    pub fn apply(self, company: &mut Company) {
        if let Some(name) = self.name {
            company.name = name;
        }
        if let Some(location) = self.location {
            company.location = location;
        }
        if let Some(profile) = self.linkedin_profile {
            company.linkedin_profile = profile;
        }
        if let Some(emails) = self.emails {
            company.emails = if emails.is_empty() { one_empty_slot() } else { emails };
        }
        if let Some(phones) = self.phone_numbers {
            company.phone_numbers = if phones.is_empty() { one_empty_slot() } else { phones };
        }
        if let Some(comments) = self.comments {
            company.comments = comments;
        }
        if let Some(days) = self.communication_periodicity {
            company.communication_periodicity = days;
        }
    }
}

/// Input for creating a communication method.
#[derive(Debug, Clone, Default)]
pub struct NewMethod {
    /// Caller-chosen id; generated when absent.
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    /// `None` or `Some(0)` appends after the current methods.
    pub sequence: Option<u32>,
    pub is_mandatory: bool,
}

impl NewMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a communication method, same merge rules as [`CompanyPatch`].
#[derive(Debug, Clone, Default)]
pub struct MethodPatch {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub sequence: Option<u32>,
    pub is_mandatory: Option<bool>,
}

impl MethodPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn apply(self, method: &mut CommunicationMethod) {
        if let Some(name) = self.name {
            method.name = name;
        }
        if let Some(description) = self.description {
            method.description = description;
        }
        if let Some(sequence) = self.sequence {
            method.sequence = sequence;
        }
        if let Some(mandatory) = self.is_mandatory {
            method.is_mandatory = mandatory;
        }
    }
}

/// Input for logging a communication against a company.
#[derive(Debug, Clone)]
pub struct NewCommunication {
    /// Method name, e.g. "Email".
    pub kind: String,
    pub timestamp: DateTime<Utc>,
    pub notes: String,
}

impl NewCommunication {
    pub fn new(kind: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: kind.into(),
            timestamp,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Persisted state: the three collections, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub communication_methods: Vec<CommunicationMethod>,
    #[serde(default)]
    pub communications: Vec<CommunicationRecord>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
            && self.communication_methods.is_empty()
            && self.communications.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_company() -> Company {
        Company {
            id: "company-1".into(),
            name: "Tech Corp".into(),
            location: "Hyderabad".into(),
            linkedin_profile: None,
            emails: vec!["info@techcorp.com".into()],
            phone_numbers: vec!["+1234567890".into()],
            comments: String::new(),
            communication_periodicity: 14,
            last_communication_date: None,
            last_communication_sequence: 0,
        }
    }

    #[test]
    fn test_patch_preserves_omitted_fields() {
        let mut company = sample_company();
        let mut patch = CompanyPatch::new("company-1");
        patch.comments = Some("warm lead".into());
        patch.apply(&mut company);

        assert_eq!(company.comments, "warm lead");
        assert_eq!(company.name, "Tech Corp");
        assert_eq!(company.emails, vec!["info@techcorp.com".to_string()]);
    }

    #[test]
    fn test_patch_replaces_lists_wholesale() {
        let mut company = sample_company();
        company.emails = vec!["a@x.com".into(), "b@x.com".into()];
        let mut patch = CompanyPatch::new("company-1");
        patch.emails = Some(vec!["c@x.com".into()]);
        patch.apply(&mut company);

        assert_eq!(company.emails, vec!["c@x.com".to_string()]);
    }

    #[test]
    fn test_patch_with_empty_lists_keeps_one_slot() {
        let mut company = sample_company();
        let mut patch = CompanyPatch::new("company-1");
        patch.emails = Some(Vec::new());
        patch.phone_numbers = Some(Vec::new());
        patch.apply(&mut company);

        assert_eq!(company.emails, vec![String::new()]);
        assert_eq!(company.phone_numbers, vec![String::new()]);
    }

    #[test]
    fn test_patch_can_clear_linkedin() {
        let mut company = sample_company();
        company.linkedin_profile = Some("linkedin.com/company/tech".into());
        let mut patch = CompanyPatch::new("company-1");
        patch.linkedin_profile = Some(None);
        patch.apply(&mut company);
        assert!(company.linkedin_profile.is_none());
    }

    #[test]
    fn test_snapshot_uses_camel_case_keys() {
        let snapshot = Snapshot {
            companies: vec![sample_company()],
            ..Snapshot::default()
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("communicationMethods").is_some());
        let company = &json["companies"][0];
        assert_eq!(company["communicationPeriodicity"], 14);
        assert_eq!(company["lastCommunicationSequence"], 0);
        assert!(company["lastCommunicationDate"].is_null());
    }

    #[test]
    fn test_record_kind_serializes_as_type() {
        let record = CommunicationRecord {
            id: "comm-1".into(),
            company_id: "company-1".into(),
            kind: "Email".into(),
            timestamp: Utc::now(),
            notes: String::new(),
            sequence: 1,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "Email");
        assert_eq!(json["companyId"], "company-1");
    }

    #[test]
    fn test_company_missing_contact_lists_get_one_slot() {
        let json = r#"{"id":"c","name":"N","location":"L","communicationPeriodicity":7}"#;
        let company: Company = serde_json::from_str(json).unwrap();
        assert_eq!(company.emails, vec![String::new()]);
        assert_eq!(company.phone_numbers, vec![String::new()]);
        assert_eq!(company.last_communication_sequence, 0);
    }
}
