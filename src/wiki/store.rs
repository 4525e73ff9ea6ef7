//! Flat-file page storage
//!
//! One page is one file, `<content_dir>/<title>.txt`, holding the raw body bytes.
//! Titles arrive already validated, so the filename can never escape the
//! content directory.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::fs;

use super::page::Page;
use super::title::Title;

const PAGE_EXTENSION: &str = "txt";

/// Distinguishes temp files of concurrent saves within this process
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page not found: {0}")]
    NotFound(Title),
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Page store rooted at a content directory
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    /// Open the store, creating the content directory if needed.
    ///
    /// Relative paths are resolved against the current working directory once,
    /// so later changes of directory do not move the store.
    pub fn open(content_dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = content_dir.as_ref();
        let root = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            std::env::current_dir()?.join(dir)
        };
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `title`
    pub fn page_path(&self, title: &Title) -> PathBuf {
        self.root
            .join(format!("{}.{PAGE_EXTENSION}", title.as_str()))
    }

    pub async fn load(&self, title: &Title) -> Result<Page, StoreError> {
        let path = self.page_path(title);
        match fs::read(&path).await {
            Ok(body) => Ok(Page::new(title.clone(), body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(title.clone()))
            }
            Err(e) => Err(StoreError::io("read", &path, e)),
        }
    }

    /// Overwrite the page file.
    ///
    /// The body is written to a temporary sibling and renamed into place, so a
    /// concurrent reader sees either the old or the new content in full.
    pub async fn save(&self, page: &Page) -> Result<(), StoreError> {
        let path = self.page_path(&page.title);
        let tmp = self.temp_path(&page.title);

        if let Err(e) = write_private(&tmp, &page.body).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::io("write", &tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StoreError::io("rename", &path, e));
        }
        Ok(())
    }

    fn temp_path(&self, title: &Title) -> PathBuf {
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            ".{}.{PAGE_EXTENSION}.{}.{seq}.tmp",
            title.as_str(),
            std::process::id()
        ))
    }
}

/// Write a file readable only by the owner
async fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    tokio::io::AsyncWriteExt::write_all(&mut file, data).await?;
    file.sync_all().await
}
