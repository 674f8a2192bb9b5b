//! In-memory drag-and-drop platform.
//!
//! Builds entry trees by hand, e.g. for hosts that receive a dropped tree
//! over some other channel, or for exercising the traversal against
//! paginated listings, read failures and item collections that go stale
//! once the drop handler yields.
//!
//! Every listing call and file retrieval yields to the scheduler once
//! before answering, so concurrently resolved entries really interleave.

use std::{
    cell::Cell,
    io,
    rc::Rc,
};

use serde::Serialize;

use crate::{
    config::DEFAULT_PAGE_SIZE,
    entry::{DirectoryReader, Entry, FileHandle},
    session::{DropItem, ItemKind},
};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MemoryFile {
    name: String,
    size: u64,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        MemoryFile {
            name: name.into(),
            size,
        }
    }
}

impl FileHandle for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }
}

#[derive(Clone, Debug)]
enum Node {
    File { size: u64 },
    Directory { children: Rc<Vec<MemoryEntry>> },
    /// Reports neither kind, like a socket or a device
    Unknown,
    /// Reports both kinds at once
    Ambiguous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Failure {
    Listing,
    File,
}

/// A node of an in-memory dropped tree.
///
/// Entries are built bottom-up; wrapping entries into
/// [`MemoryEntry::directory`] re-roots their full paths under the new
/// directory. Clones share their listing counter.
#[derive(Clone, Debug)]
pub struct MemoryEntry {
    name: String,
    full_path: String,
    node: Node,
    page_size: usize,
    failure: Option<Failure>,
    listing_calls: Rc<Cell<usize>>,
}

impl MemoryEntry {
    fn new(name: String, node: Node) -> Self {
        MemoryEntry {
            full_path: format!("/{}", name),
            name,
            node,
            page_size: DEFAULT_PAGE_SIZE,
            failure: None,
            listing_calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self::new(name.into(), Node::File { size })
    }

    pub fn directory(name: impl Into<String>, children: Vec<MemoryEntry>) -> Self {
        let name = name.into();
        let prefix = format!("/{}", name);
        let children = children
            .into_iter()
            .map(|child| child.rerooted(&prefix))
            .collect();
        Self::new(
            name,
            Node::Directory {
                children: Rc::new(children),
            },
        )
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name.into(), Node::Unknown)
    }

    pub fn ambiguous(name: impl Into<String>) -> Self {
        Self::new(name.into(), Node::Ambiguous)
    }

    /// Bound every listing page of this entry and its descendants
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        if let Node::Directory { children } = &self.node {
            let children = children
                .iter()
                .cloned()
                .map(|child| child.with_page_size(page_size))
                .collect();
            self.node = Node::Directory {
                children: Rc::new(children),
            };
        }
        self
    }

    /// Make every listing call on this directory fail
    pub fn failing_listing(mut self) -> Self {
        self.failure = Some(Failure::Listing);
        self
    }

    /// Make retrieving this file fail
    pub fn failing_file(mut self) -> Self {
        self.failure = Some(Failure::File);
        self
    }

    /// Number of listing calls made on this directory so far
    pub fn listing_calls(&self) -> usize {
        self.listing_calls.get()
    }

    fn rerooted(mut self, prefix: &str) -> Self {
        self.full_path = format!("{}/{}", prefix, self.name);
        if let Node::Directory { children } = &self.node {
            let children = children
                .iter()
                .cloned()
                .map(|child| child.rerooted(&self.full_path))
                .collect();
            self.node = Node::Directory {
                children: Rc::new(children),
            };
        }
        self
    }

    fn as_file(&self) -> Option<MemoryFile> {
        match self.node {
            Node::File { size } => Some(MemoryFile::new(self.name.clone(), size)),
            _ => None,
        }
    }
}

impl Entry for MemoryEntry {
    type File = MemoryFile;
    type Reader = MemoryReader;

    fn is_file(&self) -> bool {
        matches!(self.node, Node::File { .. } | Node::Ambiguous)
    }

    fn is_directory(&self) -> bool {
        matches!(self.node, Node::Directory { .. } | Node::Ambiguous)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn full_path(&self) -> &str {
        &self.full_path
    }

    fn create_reader(&self) -> MemoryReader {
        let children = match &self.node {
            Node::Directory { children } => children.clone(),
            _ => Rc::new(Vec::new()),
        };
        MemoryReader {
            children,
            position: 0,
            page_size: self.page_size,
            failing: self.failure == Some(Failure::Listing),
            calls: self.listing_calls.clone(),
        }
    }

    async fn file(&self) -> io::Result<MemoryFile> {
        tokio::task::yield_now().await;

        if self.failure == Some(Failure::File) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        self.as_file().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "not a file")
        })
    }
}

pub struct MemoryReader {
    children: Rc<Vec<MemoryEntry>>,
    position: usize,
    page_size: usize,
    failing: bool,
    calls: Rc<Cell<usize>>,
}

impl DirectoryReader for MemoryReader {
    type Entry = MemoryEntry;

    async fn read_entries(&mut self) -> io::Result<Vec<MemoryEntry>> {
        tokio::task::yield_now().await;
        self.calls.set(self.calls.get() + 1);

        if self.failing {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "directory cannot be listed",
            ));
        }

        let end = (self.position + self.page_size).min(self.children.len());
        let page = self.children[self.position..end].to_vec();
        self.position = end;
        Ok(page)
    }
}

/// Validity of the collection an item was handed out in
#[derive(Debug, Default)]
struct Lease {
    revoked: Cell<bool>,
    stale_reads: Cell<usize>,
}

impl Lease {
    fn check(&self) -> bool {
        if self.revoked.get() {
            self.stale_reads.set(self.stale_reads.get() + 1);
            return false;
        }
        true
    }
}

/// One item of a drop gesture
#[derive(Clone, Debug)]
pub struct MemoryItem {
    kind: ItemKind,
    entry: Option<MemoryEntry>,
    file: Option<MemoryFile>,
    lease: Rc<Lease>,
}

impl MemoryItem {
    /// A file-kind item backed by an entry
    pub fn entry(entry: MemoryEntry) -> Self {
        MemoryItem {
            kind: ItemKind::File,
            file: entry.as_file(),
            entry: Some(entry),
            lease: Rc::default(),
        }
    }

    /// A file-kind item that only exposes a raw file, without an entry
    pub fn raw_file(file: MemoryFile) -> Self {
        MemoryItem {
            kind: ItemKind::File,
            entry: None,
            file: Some(file),
            lease: Rc::default(),
        }
    }

    /// A non-file item, like a dragged text selection
    pub fn text() -> Self {
        MemoryItem {
            kind: ItemKind::Other,
            entry: None,
            file: None,
            lease: Rc::default(),
        }
    }
}

impl DropItem for MemoryItem {
    type Entry = MemoryEntry;

    fn kind(&self) -> ItemKind {
        if !self.lease.check() {
            return ItemKind::Other;
        }
        self.kind
    }

    fn get_as_entry(&self) -> Option<MemoryEntry> {
        if !self.lease.check() {
            return None;
        }
        self.entry.clone()
    }

    fn get_as_file(&self) -> Option<MemoryFile> {
        if !self.lease.check() {
            return None;
        }
        self.file.clone()
    }
}

/// The transient item list of one drop gesture.
///
/// Once [`MemoryItems::invalidate`] is called every accessor of every item
/// answers as if the item were gone, and the access is counted as stale.
#[derive(Debug)]
pub struct MemoryItems {
    items: Vec<MemoryItem>,
    lease: Rc<Lease>,
}

impl MemoryItems {
    pub fn new(items: Vec<MemoryItem>) -> Self {
        let lease = Rc::new(Lease::default());
        let items = items
            .into_iter()
            .map(|item| MemoryItem {
                lease: lease.clone(),
                ..item
            })
            .collect();
        MemoryItems { items, lease }
    }

    pub fn as_slice(&self) -> &[MemoryItem] {
        &self.items
    }

    pub fn invalidate(&self) {
        self.lease.revoked.set(true);
    }

    /// Number of accessor calls made after invalidation
    pub fn stale_reads(&self) -> usize {
        self.lease.stale_reads.get()
    }
}
