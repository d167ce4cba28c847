//! Audit logging for money-manager
//!
//! Every write to the ledger and budget stores is appended to `audit.log`
//! as one JSON object per line (JSONL).
//!
//! - `AuditEntry`: one operation, its owner, the entity and its stored value.
//! - `AuditLogger`: appends entries and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
