//! # BizReach Core
//!
//! Shared domain types, configuration, errors, and the collaborator traits
//! (clock, id generator) that the scheduling crate is built on.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{DueTodayRule, ReachConfig};
pub use error::{ReachError, Result};
pub use traits::clock::{Clock, FixedClock, SystemClock};
pub use traits::ids::{IdGenerator, SequentialIds, UuidIds};
pub use types::{
    CommunicationMethod, CommunicationRecord, Company, CompanyPatch, MethodPatch, NewCommunication,
    NewCompany, NewMethod, Snapshot,
};
