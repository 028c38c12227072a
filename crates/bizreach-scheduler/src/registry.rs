//! Company and communication-method registry.
//! The scheduling rules read this as configuration; only admin actions and
//! communication logging write to it.

use std::sync::Arc;

use bizreach_core::error::{ReachError, Result};
use bizreach_core::traits::ids::IdGenerator;
use bizreach_core::types::{
    CommunicationMethod, Company, CompanyPatch, MethodPatch, NewCompany, NewMethod,
};

use crate::schedule;

/// Owns the company and communication-method collections.
pub struct Registry {
    companies: Vec<Company>,
    methods: Vec<CommunicationMethod>,
    ids: Arc<dyn IdGenerator>,
    default_periodicity: u32,
}

impl Registry {
    pub fn new(ids: Arc<dyn IdGenerator>, default_periodicity: u32) -> Self {
        Self::from_parts(Vec::new(), Vec::new(), ids, default_periodicity)
    }

    /// Rebuild from previously stored collections.
    pub fn from_parts(
        companies: Vec<Company>,
        methods: Vec<CommunicationMethod>,
        ids: Arc<dyn IdGenerator>,
        default_periodicity: u32,
    ) -> Self {
        Self {
            companies,
            methods,
            ids,
            default_periodicity,
        }
    }

    // ─── Companies ────────────────────────────────────────────

    /// Create a company. Name and location are required; contact lists get one
    /// empty slot and the periodicity falls back to the default when omitted.
    pub fn add_company(&mut self, input: NewCompany) -> Result<Company> {
        if input.name.trim().is_empty() {
            return Err(ReachError::validation("Company name is required"));
        }
        if input.location.trim().is_empty() {
            return Err(ReachError::validation("Company location is required"));
        }

        let company = Company {
            id: self.ids.next_id("company"),
            name: input.name,
            location: input.location,
            linkedin_profile: input.linkedin_profile,
            emails: non_empty_or_slot(input.emails),
            phone_numbers: non_empty_or_slot(input.phone_numbers),
            comments: input.comments,
            communication_periodicity: input
                .communication_periodicity
                .filter(|days| *days != 0)
                .unwrap_or(self.default_periodicity),
            last_communication_date: None,
            last_communication_sequence: 0,
        };

        tracing::info!("🏢 Company added: '{}' ({})", company.name, company.id);
        self.companies.push(company.clone());
        Ok(company)
    }

    /// Merge `patch` over the stored company.
    pub fn update_company(&mut self, patch: CompanyPatch) -> Result<Company> {
        let company = self
            .companies
            .iter_mut()
            .find(|c| c.id == patch.id)
            .ok_or_else(|| ReachError::company_not_found(&patch.id))?;
        patch.apply(company);
        tracing::debug!("Company updated: {}", company.id);
        Ok(company.clone())
    }

    /// Remove a company. Returns whether anything was removed; an unknown id is
    /// not an error. Its communication records are left in the log.
    pub fn delete_company(&mut self, id: &str) -> bool {
        let len = self.companies.len();
        self.companies.retain(|c| c.id != id);
        let removed = self.companies.len() < len;
        if removed {
            tracing::info!("🗑️ Company deleted: {id}");
        }
        removed
    }

    pub fn company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    pub(crate) fn company_mut(&mut self, id: &str) -> Option<&mut Company> {
        self.companies.iter_mut().find(|c| c.id == id)
    }

    /// All companies in creation order.
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    // ─── Communication methods ────────────────────────────────

    /// Register a method. Without an explicit non-zero sequence it is placed at
    /// `method_count + 1`.
    pub fn add_method(&mut self, input: NewMethod) -> Result<CommunicationMethod> {
        if input.name.trim().is_empty() {
            return Err(ReachError::validation("Method name is required"));
        }
        let id = match input.id.filter(|id| !id.trim().is_empty()) {
            Some(id) if self.method(&id).is_some() => {
                return Err(ReachError::validation(format!(
                    "Communication method id already exists: {id}"
                )));
            }
            Some(id) => id,
            None => self.ids.next_id("method"),
        };
        let sequence = input
            .sequence
            .filter(|s| *s != 0)
            .unwrap_or(self.methods.len() as u32 + 1);

        let method = CommunicationMethod {
            id,
            name: input.name,
            description: input.description,
            sequence,
            is_mandatory: input.is_mandatory,
        };

        tracing::info!(
            "📇 Communication method added: '{}' (sequence {})",
            method.name,
            method.sequence
        );
        self.methods.push(method.clone());
        Ok(method)
    }

    pub fn update_method(&mut self, patch: MethodPatch) -> Result<CommunicationMethod> {
        let method = self
            .methods
            .iter_mut()
            .find(|m| m.id == patch.id)
            .ok_or_else(|| ReachError::method_not_found(&patch.id))?;
        patch.apply(method);
        Ok(method.clone())
    }

    /// Remove a method. Past communications keep the name they were logged with.
    pub fn delete_method(&mut self, id: &str) -> bool {
        let len = self.methods.len();
        self.methods.retain(|m| m.id != id);
        self.methods.len() < len
    }

    pub fn method(&self, id: &str) -> Option<&CommunicationMethod> {
        self.methods.iter().find(|m| m.id == id)
    }

    /// Methods in registration order.
    pub fn methods(&self) -> &[CommunicationMethod] {
        &self.methods
    }

    /// Methods in cadence order.
    pub fn ordered_methods(&self) -> Vec<&CommunicationMethod> {
        schedule::ordered_methods(&self.methods)
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

fn non_empty_or_slot(list: Option<Vec<String>>) -> Vec<String> {
    match list {
        Some(list) if !list.is_empty() => list,
        _ => vec![String::new()],
    }
}
