//! Pure business logic for the Meridian catalog and publishing backend.
//!
//! Everything in this crate is synchronous and side-effect free (aside from
//! incidental `tracing` events): field and entity validators, distribution
//! channel compliance rules, royalty split reconciliation and allocation,
//! lifecycle state machines, and the publication version tree. The HTTP and
//! persistence layers sit in sibling crates and call in with plain data.
//!
//! Entity validators return a [`ValidationOutcome`] accumulating every error
//! and warning in one pass; they never panic across the API boundary and
//! never touch the network or database themselves.

pub mod artist;
pub mod audio;
pub mod business_rules;
pub mod collaboration;
pub mod distribution;
pub mod error;
pub mod identifiers;
pub mod notifications;
pub mod outcome;
pub mod release;
pub mod release_status;
pub mod royalties;
pub mod splits;
pub mod territories;
pub mod track;
pub mod types;
pub mod versioning;

pub use error::CoreError;
pub use outcome::{Issue, Severity, ValidationOptions, ValidationOutcome, ValidationSummary};
