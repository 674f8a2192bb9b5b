//! Local file-system backend.
//!
//! Desktop shells usually report a drop as a list of absolute paths.
//! [`PathItem`] turns each of them into a drop item whose entry tree is read
//! through `tokio::fs`, page by page. Full paths are rooted at the dropped
//! path itself, so dropping `/home/me/photos` yields files such as
//! `/photos/2024/a.jpg`.
//!
//! Symbolic links below a dropped directory are reported as neither a file
//! nor a directory and are skipped. File contents are never read; a
//! retrieved [`LocalFile`] carries metadata only.

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    config::DEFAULT_PAGE_SIZE,
    entry::{DirectoryReader, Entry, FileHandle},
    session::{DropItem, ItemKind},
};

/// A retrieved local file
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalFile {
    name: String,
    path: PathBuf,
    size: u64,
}

impl LocalFile {
    /// Absolute location of the file on disk
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileHandle for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FsKind {
    File,
    Directory,
    Other,
}

impl From<fs::FileType> for FsKind {
    fn from(file_type: fs::FileType) -> Self {
        if file_type.is_file() {
            FsKind::File
        } else if file_type.is_dir() {
            FsKind::Directory
        } else {
            FsKind::Other
        }
    }
}

#[derive(Clone, Debug)]
pub struct FsEntry {
    path: PathBuf,
    name: String,
    full_path: String,
    kind: FsKind,
    page_size: usize,
}

impl FsEntry {
    /// Open a dropped path as the root of its own entry tree.
    ///
    /// A symbolic link at the root is followed, since the user dropped it
    /// explicitly.
    pub fn open<P: AsRef<Path>>(path: P, page_size: usize) -> io::Result<Self> {
        let path = path.as_ref();
        let kind = FsKind::from(fs::metadata(path)?.file_type());
        let name = file_name(path);

        Ok(FsEntry {
            full_path: format!("/{}", name),
            name,
            path: path.to_path_buf(),
            kind,
            page_size: page_size.max(1),
        })
    }

    /// Location of the entry on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn child(&self, path: PathBuf, kind: FsKind) -> Self {
        let name = file_name(&path);
        FsEntry {
            full_path: format!("{}/{}", self.full_path, name),
            name,
            path,
            kind,
            page_size: self.page_size,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

impl Entry for FsEntry {
    type File = LocalFile;
    type Reader = FsDirectoryReader;

    fn is_file(&self) -> bool {
        self.kind == FsKind::File
    }

    fn is_directory(&self) -> bool {
        self.kind == FsKind::Directory
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn full_path(&self) -> &str {
        &self.full_path
    }

    fn create_reader(&self) -> FsDirectoryReader {
        FsDirectoryReader {
            parent: self.clone(),
            listing: Listing::NotStarted,
        }
    }

    async fn file(&self) -> io::Result<LocalFile> {
        let metadata = tokio::fs::metadata(&self.path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", self.path.display()),
            ));
        }

        Ok(LocalFile {
            name: self.name.clone(),
            path: self.path.clone(),
            size: metadata.len(),
        })
    }
}

enum Listing {
    NotStarted,
    Open(tokio::fs::ReadDir),
    Exhausted,
}

/// Paged listing of a local directory
pub struct FsDirectoryReader {
    parent: FsEntry,
    listing: Listing,
}

impl DirectoryReader for FsDirectoryReader {
    type Entry = FsEntry;

    async fn read_entries(&mut self) -> io::Result<Vec<FsEntry>> {
        if let Listing::NotStarted = self.listing {
            log::trace!("Opening directory {:?}", self.parent.path);
            self.listing =
                Listing::Open(tokio::fs::read_dir(&self.parent.path).await?);
        }
        let Listing::Open(read_dir) = &mut self.listing else {
            return Ok(Vec::new());
        };

        let mut page = Vec::with_capacity(self.parent.page_size);
        let mut exhausted = false;
        while page.len() < self.parent.page_size {
            match read_dir.next_entry().await? {
                Some(entry) => {
                    let kind = FsKind::from(entry.file_type().await?);
                    page.push(self.parent.child(entry.path(), kind));
                }
                None => {
                    exhausted = true;
                    break;
                }
            }
        }
        if exhausted {
            self.listing = Listing::Exhausted;
        }

        Ok(page)
    }
}

/// A dropped path reported by the host
#[derive(Clone, Debug)]
pub struct PathItem {
    path: PathBuf,
    page_size: usize,
}

impl PathItem {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self::with_page_size(path, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size<P: Into<PathBuf>>(path: P, page_size: usize) -> Self {
        PathItem {
            path: path.into(),
            page_size,
        }
    }
}

impl DropItem for PathItem {
    type Entry = FsEntry;

    fn kind(&self) -> ItemKind {
        ItemKind::File
    }

    fn get_as_entry(&self) -> Option<FsEntry> {
        match FsEntry::open(&self.path, self.page_size) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Cannot open dropped path {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn get_as_file(&self) -> Option<LocalFile> {
        let metadata = fs::metadata(&self.path).ok()?;
        if !metadata.is_file() {
            return None;
        }

        Some(LocalFile {
            name: file_name(&self.path),
            path: self.path.clone(),
            size: metadata.len(),
        })
    }
}
