//! Category-specific flows on top of the plain record operations. These mirror what the
//! dashboard screens did on the client: fetch the category's list, pick the entry, rewrite its
//! payload. There is deliberately no guard against concurrent edits, the last write wins.

pub mod routine;
pub mod work;
