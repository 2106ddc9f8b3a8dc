//! Shapes journal entries take on disk and in memory.
//!  - [record::ActivityRecord] is the stored form: an open payload document plus bookkeeping
//!    fields, tolerant of categories this build doesn't know about.
//!  - [details::ActivityDetails] is the typed view of a payload, parsed where a flow actually
//!    needs the fields instead of trusting every stored document.

pub mod details;
pub mod record;
