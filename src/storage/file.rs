// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::{fs, io::AsyncWriteExt as _};

use crate::{
    error::{self, Result},
    metadata,
};

use super::Storage;

/// Stores a value as JSON in a file only the current user can read.
pub(crate) struct File {
    path: PathBuf,
}

impl File {
    /// A file named `file` in the platform's data directory for this program.
    pub(crate) fn new<P: AsRef<Path>>(file: P) -> Result<Self> {
        metadata::PROJECT_DIRS
            .as_ref()
            .map(|dirs| Self::at(dirs.data_dir().join(file)))
            .ok_or_else(|| error::Storage::NoProjectDirs.into())
    }

    pub(crate) fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl<T: Send + Serialize + Sync + for<'de> Deserialize<'de>> Storage<T> for File {
    async fn get(&mut self) -> Result<Option<T>> {
        match fs::read(&self.path).await {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&mut self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut options = fs::OpenOptions::new();
        _ = options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            _ = options.mode(0o600);
        }

        let mut file = options.open(&self.path).await?;
        file.write_all(&serde_json::to_vec(data)?).await?;
        file.flush().await?;
        debug!("Wrote {}", self.path.display());
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::process;

    use super::*;

    fn scratch(name: &str) -> File {
        File::at(
            std::env::temp_dir()
                .join(format!("vitrine-{}", process::id()))
                .join(name),
        )
    }

    #[tokio::test]
    async fn missing_file_is_empty() -> Result<()> {
        let mut storage = scratch("missing.json");

        assert_eq!(Storage::<Vec<u64>>::get(&mut storage).await?, None);
        Storage::<Vec<u64>>::clear(&mut storage).await?;
        Ok(())
    }

    #[tokio::test]
    async fn values_survive_a_reopen() -> Result<()> {
        let mut storage = scratch("reopen.json");
        storage.update(&vec![1_u64, 2, 3]).await?;

        let mut reopened = scratch("reopen.json");
        assert_eq!(
            Storage::<Vec<u64>>::get(&mut reopened).await?,
            Some(vec![1, 2, 3])
        );

        Storage::<Vec<u64>>::clear(&mut reopened).await?;
        assert_eq!(Storage::<Vec<u64>>::get(&mut storage).await?, None);
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn only_the_owner_can_read() -> Result<()> {
        use std::os::unix::fs::PermissionsExt as _;

        let mut storage = scratch("private.json");
        storage.update(&"secret".to_owned()).await?;

        let mode = fs::metadata(&storage.path).await?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        Storage::<String>::clear(&mut storage).await?;
        Ok(())
    }
}
