//! Who the journal belongs to. The interface mirrors a hosted auth service, but the default
//! backend is just a profile file: sign-up mints an id locally and nothing secret is ever kept,
//! so there is no session lifecycle to manage.

use std::{future::Future, io::ErrorKind, ops::Deref, path::PathBuf};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// The signed-in user as every other component sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: Uuid,
    pub email: String,
}

/// Interface for abstracting the identity provider.
pub trait Identity {
    fn current_session(&self) -> impl Future<Output = Result<Option<UserSession>>> + Send;

    /// Registers a user and signs them in. The password is part of the interface for remote
    /// providers; the local one accepts and discards it.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<UserSession>> + Send;

    fn sign_out(&self) -> impl Future<Output = Result<()>> + Send;
}

impl<T: Deref> Identity for T
where
    T::Target: Identity,
{
    fn current_session(&self) -> impl Future<Output = Result<Option<UserSession>>> + Send {
        self.deref().current_session()
    }

    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<UserSession>> + Send {
        self.deref().sign_up(email, password)
    }

    fn sign_out(&self) -> impl Future<Output = Result<()>> + Send {
        self.deref().sign_out()
    }
}

const PROFILE_FILE: &str = "profile.json";

/// The main realization of [Identity], backed by a profile file in the application directory.
pub struct LocalIdentity {
    profile_path: PathBuf,
}

impl LocalIdentity {
    pub fn new(application_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&application_dir)?;

        Ok(Self {
            profile_path: application_dir.join(PROFILE_FILE),
        })
    }
}

impl Identity for LocalIdentity {
    async fn current_session(&self) -> Result<Option<UserSession>> {
        let content = match fs::read_to_string(&self.profile_path).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                warn!("Profile file is unreadable, treating it as signed out: {e}");
                Ok(None)
            }
        }
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<UserSession> {
        if !email.contains('@') {
            bail!("'{email}' doesn't look like an email");
        }
        if self.current_session().await?.is_some() {
            bail!("A profile already exists. Sign out first to start over");
        }

        let session = UserSession {
            user_id: Uuid::new_v4(),
            email: email.to_string(),
        };
        fs::write(&self.profile_path, serde_json::to_vec_pretty(&session)?).await?;
        debug!("Created profile {} for {}", session.user_id, session.email);
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        match fs::remove_file(&self.profile_path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
