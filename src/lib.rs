//! Flatten dropped files and folders into a list of files with relative
//! paths.
//!
//! A drop gesture yields a shallow list of items, each of which may be a
//! file or a whole directory tree. [`DropZone::handle_drop`] snapshots those
//! items synchronously, walks every dropped directory with
//! [`traverse_directory`] and hands the flat result to a [`DropTarget`].
//!
//! The platform is abstracted behind the [`Entry`], [`DirectoryReader`] and
//! [`DropItem`] traits. Two implementations ship with the crate: [`fs`] for
//! paths dropped onto a desktop window and [`memory`] for in-memory trees.
//!
//! ```no_run
//! use dropwalk::{fs::PathItem, DropError, DropTarget, DropZone};
//! use dropwalk::{fs::LocalFile, FileWithRelativePath};
//!
//! struct Printer;
//!
//! impl DropTarget for Printer {
//!     type File = LocalFile;
//!
//!     fn deliver(&mut self, files: Vec<FileWithRelativePath<LocalFile>>) {
//!         for file in files {
//!             println!("{}", file.relative_path());
//!         }
//!     }
//!
//!     fn notify(&mut self, error: &DropError) {
//!         eprintln!("{}", error);
//!     }
//! }
//!
//! # async fn run() {
//! let items = vec![PathItem::new("/home/me/photos"), PathItem::new("/tmp/a.txt")];
//! let mut zone = DropZone::new(Printer);
//! zone.handle_drop(&items).await;
//! # }
//! ```

pub mod config;
pub mod entry;
pub mod errors;
pub mod file;
pub mod fs;
pub mod memory;
pub mod session;
pub mod traverse;

pub use config::{DropConfig, DropPolicy, DEFAULT_PAGE_SIZE};
pub use entry::{
    classify, is_directory_entry, is_file_entry, DirectoryReader, Entry,
    EntryKind, FileHandle,
};
pub use errors::{DropError, Result};
pub use file::FileWithRelativePath;
pub use session::{
    DropItem, DropSession, DropState, DropTarget, DropZone, ItemKind, Resolved,
};
pub use traverse::traverse_directory;
