use std::path::Path;

use anyhow::Result;

use crate::{
    identity::Identity,
    store::activity_store::{ActivityQuery, ActivityStore, JournalStore},
};

/// Command to verify the setup end to end: the application directory, the journal and the
/// profile. Useful after moving the directory or pointing --dir somewhere new.
pub async fn process_check_command(
    dir: &Path,
    store: &JournalStore,
    identity: &impl Identity,
) -> Result<()> {
    println!("Application directory: {}", dir.display());

    let total = store.record_count().await?;
    println!("Journal: {total} readable records");

    match identity.current_session().await? {
        Some(session) => {
            let records = store.fetch(session.user_id, ActivityQuery::default()).await?;
            println!("Profile: {} ({})", session.email, session.user_id);
            println!("Records of this profile: {}", records.len());
        }
        None => println!("Profile: none. Run lifelog signup --email <email> to start recording"),
    }

    Ok(())
}
