//! Item persistence module
//!
//! Stores the whole collection as a JSON array in a single file. Every write
//! replaces the file through a temp-file + fsync + rename sequence so a crash
//! mid-write cannot corrupt the existing data.

use crate::item::Item;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// File-backed item collection store
///
/// Writers are not serialized against each other: with concurrent requests
/// the last rename wins and earlier writes are discarded.
#[derive(Debug, Clone)]
pub struct ItemStore {
    data_path: PathBuf,
}

impl ItemStore {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    /// Load the full collection
    ///
    /// A missing file is an empty collection; unparseable content is a read
    /// failure and propagates to the caller.
    pub async fn read_items(&self) -> io::Result<Vec<Item>> {
        match fs::read(&self.data_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid data file {}: {e}", self.data_path.display()),
                )
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Serialize the entire collection and replace the backing file
    pub async fn write_items(&self, items: &[Item]) -> io::Result<()> {
        let json = serde_json::to_vec_pretty(items).map_err(io::Error::other)?;

        if let Some(parent) = self.data_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let tmp_path = self.temp_path();
        let mut tmp = fs::File::create(&tmp_path).await?;
        tmp.write_all(&json).await?;
        tmp.sync_all().await?;
        drop(tmp);

        fs::rename(&tmp_path, &self.data_path).await
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Sibling temp file the atomic rename starts from
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .data_path
            .file_name()
            .map_or_else(|| "items.json".into(), ToOwned::to_owned);
        name.push(".tmp");
        self.data_path.with_file_name(name)
    }
}
