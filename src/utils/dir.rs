use std::{env, io, path::PathBuf};

use anyhow::Result;

/// Resolves the directory all application state lives under, honoring an explicit override.
pub fn resolve_application_path(overridden: Option<PathBuf>) -> Result<PathBuf> {
    overridden.map_or_else(create_application_default_path, create_checked)
}

pub fn create_application_default_path() -> Result<PathBuf> {
    let path = {
        #[cfg(windows)]
        {
            let mut path =
                PathBuf::from(env::var("APPDATA").expect("APPDATA should be present on Windows"));
            path.push("lifelog");
            path
        }
        #[cfg(not(windows))]
        {
            let mut path = env::var("XDG_DATA_HOME")
                .map(PathBuf::from)
                .or_else(|_| {
                    env::var("HOME").map(|home| {
                        let mut path = PathBuf::from(home);
                        path.push(".local/share");
                        path
                    })
                })
                .expect("Couldn't find neither XDG_DATA_HOME nor HOME");
            path.push("lifelog");
            path
        }
    };

    create_checked(path)
}

fn create_checked(path: PathBuf) -> Result<PathBuf> {
    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}
