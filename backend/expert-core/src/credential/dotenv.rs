//! `.env` loading for start-up.
//!
//! Only the binary calls [`load_dotenv`]; resolution itself never writes to
//! the process environment.

use log::{debug, info, warn};

use std::path::{Path, PathBuf};

const DOTENV_FILE_NAME: &str = ".env";

/// Result of attempting to load a .env file.
#[derive(Debug)]
pub struct EnvLoadResult {
    /// Path to loaded .env file, if found.
    pub path: Option<PathBuf>,
    /// Whether any .env file was loaded.
    pub loaded: bool,
}

/// Load `.env` from the current directory, else from the executable's directory.
///
/// Existing environment variables are never overridden. A missing file is
/// not an error.
pub fn load_dotenv() -> EnvLoadResult {
    // Try current directory first
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {:?}", path);
        return EnvLoadResult {
            path: Some(path),
            loaded: true,
        };
    }

    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        let env_path = exe_dir.join(DOTENV_FILE_NAME);
        if env_path.exists() {
            match dotenvy::from_path(&env_path) {
                Ok(()) => {
                    info!("Loaded .env from: {:?}", env_path);
                    return EnvLoadResult {
                        path: Some(env_path),
                        loaded: true,
                    };
                }
                Err(e) => {
                    warn!("Failed to parse .env at {:?}: {}", env_path, e);
                }
            }
        }
    }

    debug!("No .env file found - relying on existing environment variables");
    EnvLoadResult {
        path: None,
        loaded: false,
    }
}

/// Parse a `.env` file without touching the process environment.
///
/// Returns `Ok(false)` when the file does not exist.
pub fn check_dotenv_file(path: &Path) -> Result<bool, String> {
    if !path.exists() {
        return Ok(false);
    }

    let entries = dotenvy::from_path_iter(path).map_err(|e| e.to_string())?;
    for entry in entries {
        entry.map_err(|e| format!("{}: {}", path.display(), e))?;
    }

    Ok(true)
}

/// `.env` in the current working directory, if the directory is known.
pub fn working_dir_dotenv() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(DOTENV_FILE_NAME))
}
