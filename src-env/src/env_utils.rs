//! Environment variable utilities
//!
//! The search binaries locate their output tree through the `LFI_GA_DIR`
//! variable, which points to the project root.

use crate::constants::{DATA_GENERATED, LFI_GA_DIR_VAR, RECORDS};
use std::env;
use std::path::{Path, PathBuf};

/// Error type for environment variable issues
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error(
        "LFI_GA_DIR environment variable is not set. Please set it to the project root directory (e.g., export LFI_GA_DIR=/path/to/lfi-ga)"
    )]
    LfiDirNotSet,

    #[error("LFI_GA_DIR points to a non-existent directory: {0}")]
    LfiDirNotFound(PathBuf),

    #[error("Failed to create directory {0}: {1}")]
    DirCreationFailed(PathBuf, std::io::Error),
}

/// Get the LFI_GA_DIR environment variable and validate it exists
///
/// # Errors
///
/// Returns an error if:
/// - LFI_GA_DIR is not set
/// - LFI_GA_DIR points to a non-existent directory
///
/// # Example
///
/// ```no_run
/// use lfi_env::env_utils::get_lfi_dir;
///
/// let root = get_lfi_dir()?;
/// println!("Project root: {}", root.display());
/// # Ok::<(), lfi_env::env_utils::EnvError>(())
/// ```
pub fn get_lfi_dir() -> Result<PathBuf, EnvError> {
    let root = env::var(LFI_GA_DIR_VAR).map_err(|_| EnvError::LfiDirNotSet)?;

    let path = PathBuf::from(root);

    if !path.exists() {
        return Err(EnvError::LfiDirNotFound(path));
    }

    Ok(path)
}

fn ensure_dir(path: &Path) -> Result<(), EnvError> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .map_err(|e| EnvError::DirCreationFailed(path.to_path_buf(), e))?;
    }
    Ok(())
}

/// Get the path to the data_generated directory, creating it if necessary
pub fn get_data_generated_dir() -> Result<PathBuf, EnvError> {
    let data_generated = get_lfi_dir()?.join(DATA_GENERATED);
    ensure_dir(&data_generated)?;
    Ok(data_generated)
}

/// Get the path to data_generated/records, creating it if necessary
///
/// # Example
///
/// ```no_run
/// use lfi_env::env_utils::get_records_dir;
///
/// let records_dir = get_records_dir()?;
/// println!("Records directory: {}", records_dir.display());
/// # Ok::<(), lfi_env::env_utils::EnvError>(())
/// ```
pub fn get_records_dir() -> Result<PathBuf, EnvError> {
    let records_dir = get_data_generated_dir()?.join(RECORDS);
    ensure_dir(&records_dir)?;
    Ok(records_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    // the process environment is global: every case lives in one test
    #[test]
    fn test_lfi_dir_resolution() {
        let original = env::var(LFI_GA_DIR_VAR).ok();

        unsafe { env::remove_var(LFI_GA_DIR_VAR) };
        assert!(matches!(get_lfi_dir(), Err(EnvError::LfiDirNotSet)));

        unsafe { env::set_var(LFI_GA_DIR_VAR, "/this/path/should/not/exist") };
        assert!(matches!(get_lfi_dir(), Err(EnvError::LfiDirNotFound(_))));
        assert!(get_records_dir().is_err());

        let root = tempfile::tempdir().unwrap();
        unsafe { env::set_var(LFI_GA_DIR_VAR, root.path()) };
        let records = get_records_dir().unwrap();
        assert_eq!(records, root.path().join(DATA_GENERATED).join(RECORDS));
        assert!(records.is_dir());
        assert_eq!(get_lfi_dir().unwrap(), root.path());
        assert!(get_data_generated_dir().unwrap().is_dir());

        match original {
            Some(value) => unsafe { env::set_var(LFI_GA_DIR_VAR, value) },
            None => unsafe { env::remove_var(LFI_GA_DIR_VAR) },
        }
    }
}
