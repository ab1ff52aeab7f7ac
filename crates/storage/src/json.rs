// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON snapshot store

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{ChoreStore, Household, StorageError};

/// One pretty-printed JSON file, replaced atomically on every save
#[derive(Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Open a store at `path`, creating its parent directory
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "household.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ChoreStore for JsonStore {
    /// A missing file is an empty household
    fn load(&self) -> Result<Household, StorageError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no snapshot yet, starting empty");
            return Ok(Household::default());
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&self, household: &Household) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(household)?;
        let tmp = self.temp_path();
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
