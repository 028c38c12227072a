//! Collaborator traits injected into the scheduling crate.

pub mod clock;
pub mod ids;
