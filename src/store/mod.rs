//!  Persistence is organized through [activity_store::JournalStore].
//!  The basic idea is:
//!   - Everything lives in one journal file under the application directory.
//!   - Each line is one json record, appended on insert.
//!   - Updates and deletions rewrite the journal under an exclusive lock; readers take a shared
//!     lock, so interleaved invocations stay consistent but concurrent edits simply last-write-win.

pub mod activity_store;
