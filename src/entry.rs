//! Platform boundary for drag-and-drop file-system trees.
//!
//! A drop gesture hands out opaque [`Entry`] handles. Each one is either a
//! file entry, whose binary handle can be retrieved asynchronously, or a
//! directory entry, whose children are listed page by page through a
//! [`DirectoryReader`]. The classifier functions at the bottom of this module
//! decide which of the two an entry is without ever failing.

use std::future::Future;
use std::io;

/// Metadata of a retrieved file handle
pub trait FileHandle {
    /// Bare file name, without any directory component
    fn name(&self) -> &str;

    /// Size of the file in bytes
    fn size(&self) -> u64;
}

/// Cursor over the children of a directory entry.
///
/// Every call to [`DirectoryReader::read_entries`] returns the next bounded
/// page of children. An empty page means the listing is exhausted; a
/// non-empty page never means the listing is complete.
pub trait DirectoryReader {
    type Entry: Entry;

    fn read_entries(
        &mut self,
    ) -> impl Future<Output = io::Result<Vec<Self::Entry>>>;
}

/// One read-only node of a dropped file-system tree
pub trait Entry: Sized {
    type File: FileHandle;
    type Reader: DirectoryReader<Entry = Self>;

    fn is_file(&self) -> bool;

    fn is_directory(&self) -> bool;

    /// Last component of the entry path
    fn name(&self) -> &str;

    /// Forward-slash path of the entry, rooted at the dropped entry rather
    /// than at the file system root (e.g. `/photos/2024/a.jpg`)
    fn full_path(&self) -> &str;

    /// Start a fresh child listing. Only meaningful for directory entries.
    fn create_reader(&self) -> Self::Reader;

    /// Retrieve the binary handle of a file entry
    fn file(&self) -> impl Future<Output = io::Result<Self::File>>;
}

/// The two mutually exclusive kinds of entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// Return true if the entry is present and reports itself as a directory
pub fn is_directory_entry<E: Entry>(entry: Option<&E>) -> bool {
    classify(entry) == Some(EntryKind::Directory)
}

/// Return true if the entry is present and reports itself as a file
pub fn is_file_entry<E: Entry>(entry: Option<&E>) -> bool {
    classify(entry) == Some(EntryKind::File)
}

/// Classify an entry, `None` meaning the entry should be skipped.
///
/// An entry claiming to be both a file and a directory is not well-formed
/// and is classified as neither.
pub fn classify<E: Entry>(entry: Option<&E>) -> Option<EntryKind> {
    let entry = entry?;
    match (entry.is_file(), entry.is_directory()) {
        (true, false) => Some(EntryKind::File),
        (false, true) => Some(EntryKind::Directory),
        _ => None,
    }
}
