//! Backup import and export.
//!
//! A backup is one JSON object whose keys are the [`StoreKey`] names. Import
//! merges it into the store key by key under an [`ImportPolicy`]; export
//! writes the whole store in the same shape.
//!
//! [`StoreKey`]: crate::store::StoreKey

mod export;
mod import;
mod merge;
mod policy;

pub use export::{backup_filename, export_backup, export_json, ExportError};
pub use import::{import_backup, ImportError, ImportReport, KeyOutcome, KeyStatus};
pub use merge::{merge_records, record_id, RecordMerge};
pub use policy::{GracePolicy, ImportPolicy, MergePolicy};
