//! Local persistence of block storage snapshots.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;

use crate::block_storage::BlockStorageState;

/// Errors raised while reading or writing the state file.
#[derive(Debug, Error)]
pub enum StateStoreError {
    /// Raised when file system operations fail.
    #[error("failed to access {path}: {message}")]
    Io {
        /// Path that could not be accessed.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the state file does not hold a valid snapshot.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Path that could not be parsed.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the state path does not name a file.
    #[error("state path {path} is missing a filename")]
    MissingFileName {
        /// Offending path.
        path: Utf8PathBuf,
    },
}

/// Reads and writes a single snapshot as pretty-printed JSON.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateStore {
    path: Utf8PathBuf,
}

impl StateStore {
    /// Creates a store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the state file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn split(&self) -> Result<(&Utf8Path, &str), StateStoreError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StateStoreError::MissingFileName {
                path: self.path.clone(),
            })?;
        Ok((parent, file_name))
    }

    fn io_error(path: &Utf8Path, err: &io::Error) -> StateStoreError {
        StateStoreError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Loads the stored snapshot, or `None` when no state file exists.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::Io`] when the file cannot be read and
    /// [`StateStoreError::Parse`] when it does not hold a snapshot.
    pub fn load(&self) -> Result<Option<BlockStorageState>, StateStoreError> {
        let (parent, file_name) = self.split()?;
        let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Self::io_error(parent, &err)),
        };

        let contents = match dir.read_to_string(file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Self::io_error(&self.path, &err)),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|err| StateStoreError::Parse {
                path: self.path.clone(),
                message: err.to_string(),
            })
    }

    /// Writes `state`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::Io`] when the directory or file cannot be
    /// written.
    pub fn save(&self, state: &BlockStorageState) -> Result<(), StateStoreError> {
        let (parent, file_name) = self.split()?;
        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(|err| Self::io_error(parent, &err))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|err| Self::io_error(parent, &err))?;

        let mut rendered =
            serde_json::to_string_pretty(state).map_err(|err| StateStoreError::Parse {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
        rendered.push('\n');

        dir.write(file_name, rendered)
            .map_err(|err| Self::io_error(&self.path, &err))
    }

    /// Removes the state file. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StateStoreError::Io`] when the file exists but cannot be
    /// removed.
    pub fn clear(&self) -> Result<(), StateStoreError> {
        let (parent, file_name) = self.split()?;
        let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(Self::io_error(parent, &err)),
        };
        match dir.remove_file(file_name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::io_error(&self.path, &err)),
        }
    }
}
