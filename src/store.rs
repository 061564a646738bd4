// src/store.rs
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StorageError;
use crate::state::EventState;

/// Durable home of the single [`EventState`] record.
pub trait StateStore {
    /// The stored record, or an empty one when nothing was ever saved.
    fn load(&self) -> Result<EventState, StorageError>;
    /// Replace the stored record.
    fn save(&mut self, state: &EventState) -> Result<(), StorageError>;
}

impl<T: StateStore + ?Sized> StateStore for &mut T {
    fn load(&self) -> Result<EventState, StorageError> {
        (**self).load()
    }
    fn save(&mut self, state: &EventState) -> Result<(), StorageError> {
        (**self).save(state)
    }
}

/// JSON file, replaced atomically: write a sibling temp file, sync, rename.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_err(&self, source: io::Error) -> StorageError {
        StorageError::Write { path: self.path.clone(), source }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<EventState, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No state at {}; starting empty", self.path.display());
                return Ok(EventState::default());
            }
            Err(source) => return Err(StorageError::Read { path: self.path.clone(), source }),
        };
        serde_json::from_str(&text).map_err(|source| StorageError::Corrupt { path: self.path.clone(), source })
    }

    fn save(&mut self, state: &EventState) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(state).map_err(StorageError::Encode)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.write_err(e))?;
            }
        }

        let tmp = self.tmp_path();
        {
            // flush + fsync before rename
            let file = File::create(&tmp).map_err(|e| self.write_err(e))?;
            let mut out = BufWriter::new(file);
            out.write_all(&body).map_err(|e| self.write_err(e))?;
            let file = out.into_inner().map_err(|e| self.write_err(e.into_error()))?;
            file.sync_all().map_err(|e| self.write_err(e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| self.write_err(e))?;

        debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}

/// In-process store. Counts saves so callers can see how often state was
/// written.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: Option<EventState>,
    saves: usize,
}

impl MemoryStore {
    pub fn with_state(state: EventState) -> Self {
        Self { state: Some(state), saves: 0 }
    }

    pub fn state(&self) -> Option<&EventState> {
        self.state.as_ref()
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<EventState, StorageError> {
        Ok(self.state.clone().unwrap_or_default())
    }

    fn save(&mut self, state: &EventState) -> Result<(), StorageError> {
        self.state = Some(state.clone());
        self.saves += 1;
        Ok(())
    }
}
