//! Drop gesture handling.
//!
//! A drop gesture's item list is only valid until the handler first yields.
//! Handling therefore happens in two phases: [`DropSession::snapshot`] reads
//! every item synchronously into owned tasks, and [`DropSession::resolve`]
//! then runs those tasks concurrently. [`DropZone`] ties both phases to a
//! rendering collaborator implementing [`DropTarget`].

use std::future::Future;

use futures::future::{join_all, try_join_all};

use crate::{
    config::{DropConfig, DropPolicy},
    entry::{classify, Entry, EntryKind, FileHandle},
    errors::{DropError, Result},
    file::FileWithRelativePath,
    traverse::traverse_directory,
};

type Files<E> = Vec<FileWithRelativePath<<E as Entry>::File>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// The item carries a file or a directory
    File,
    /// Text, links and anything else that isn't a file
    Other,
}

/// One item of a drop gesture's item list.
///
/// All accessors are synchronous and are only guaranteed to answer
/// correctly before the drop handler yields for the first time.
pub trait DropItem {
    type Entry: Entry;

    fn kind(&self) -> ItemKind;

    fn get_as_entry(&self) -> Option<Self::Entry>;

    fn get_as_file(&self) -> Option<<Self::Entry as Entry>::File>;
}

/// The rendering collaborator receiving the outcome of a drop gesture
pub trait DropTarget {
    type File;

    /// Receive the flat file list of a gesture
    fn deliver(&mut self, files: Vec<FileWithRelativePath<Self::File>>);

    /// Show a blocking error notification to the user
    fn notify(&mut self, error: &DropError);
}

enum DropTask<E: Entry> {
    Directory(E),
    File(E::File),
}

/// Files resolved from a drop gesture
#[derive(Debug)]
pub struct Resolved<F> {
    pub files: Vec<FileWithRelativePath<F>>,
    /// Top-level entries that failed, only ever filled under
    /// [`DropPolicy::Partial`]
    pub failures: Vec<DropError>,
}

/// Owned snapshot of one drop gesture
pub struct DropSession<E: Entry> {
    tasks: Vec<DropTask<E>>,
}

impl<E: Entry> DropSession<E> {
    /// Read every item of the gesture without yielding.
    ///
    /// Items that don't carry files are ignored. A directory entry is
    /// queued for traversal, any other file item is queued as a single file
    /// named after itself. The session borrows nothing from `items`.
    pub fn snapshot<D>(items: &[D]) -> Self
    where
        D: DropItem<Entry = E>,
    {
        let mut tasks = Vec::with_capacity(items.len());

        for item in items {
            if item.kind() != ItemKind::File {
                continue;
            }
            let entry = item.get_as_entry();
            if classify(entry.as_ref()) == Some(EntryKind::Directory) {
                if let Some(entry) = entry {
                    tasks.push(DropTask::Directory(entry));
                }
                continue;
            }
            match item.get_as_file() {
                Some(file) => tasks.push(DropTask::File(file)),
                None => log::warn!("Skipping dropped item without a file"),
            }
        }

        log::debug!("Snapshotted {} dropped entries", tasks.len());
        DropSession { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Resolve all queued entries concurrently.
    ///
    /// The files of each entry are concatenated in the order the entries
    /// were dropped, whatever order they complete in. Under
    /// [`DropPolicy::Strict`] the first failure fails the whole gesture with
    /// [`DropError::AggregateDrop`] and the remaining entries are no longer
    /// awaited. Under [`DropPolicy::Partial`] failed entries are collected
    /// next to the files of the successful ones.
    pub async fn resolve(self, policy: DropPolicy) -> Result<Resolved<E::File>> {
        let branches = self.tasks.into_iter().map(resolve_task);

        match policy {
            DropPolicy::Strict => match try_join_all(branches).await {
                Ok(lists) => Ok(Resolved {
                    files: lists.into_iter().flatten().collect(),
                    failures: Vec::new(),
                }),
                Err(failure) => {
                    log::warn!("Drop failed: {}", failure);
                    Err(DropError::AggregateDrop {
                        failures: vec![failure],
                    })
                }
            },
            DropPolicy::Partial => {
                let mut files = Vec::new();
                let mut failures = Vec::new();
                for outcome in join_all(branches).await {
                    match outcome {
                        Ok(list) => files.extend(list),
                        Err(failure) => {
                            log::warn!("Dropped entry failed: {}", failure);
                            failures.push(failure);
                        }
                    }
                }
                Ok(Resolved { files, failures })
            }
        }
    }
}

async fn resolve_task<E: Entry>(task: DropTask<E>) -> Result<Files<E>> {
    match task {
        DropTask::Directory(entry) => traverse_directory(&entry).await,
        DropTask::File(file) => {
            let relative_path = file.name().to_owned();
            Ok(vec![FileWithRelativePath::new(file, relative_path)])
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DropState {
    #[default]
    Idle,
    Snapshotting,
    Traversing,
    Delivered,
    Failed,
}

/// The controller behind a drop target region
pub struct DropZone<T> {
    target: T,
    config: DropConfig,
    state: DropState,
}

impl<T> DropZone<T> {
    pub fn new(target: T) -> Self {
        Self::with_config(target, DropConfig::default())
    }

    pub fn with_config(target: T, config: DropConfig) -> Self {
        DropZone {
            target,
            config,
            state: DropState::Idle,
        }
    }

    pub fn state(&self) -> DropState {
        self.state
    }

    pub fn config(&self) -> &DropConfig {
        &self.config
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    fn transition(&mut self, next: DropState) {
        log::debug!("Drop zone {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

impl<T: DropTarget> DropZone<T> {
    /// Handle one drop gesture.
    ///
    /// The items are read before this method returns; the returned future
    /// does not borrow them and may outlive the item list. Awaiting it
    /// delivers the files to the target, or notifies the target of the
    /// failure, and resolves to the final state of the gesture. The zone
    /// is idle again afterwards.
    pub fn handle_drop<'a, D>(
        &'a mut self,
        items: &[D],
    ) -> impl Future<Output = DropState> + 'a
    where
        D: DropItem + 'a,
        D::Entry: 'a,
        T: DropTarget<File = <D::Entry as Entry>::File>,
    {
        self.transition(DropState::Snapshotting);
        let session = DropSession::snapshot(items);
        self.transition(DropState::Traversing);

        async move {
            let outcome = session.resolve(self.config.policy).await;
            let finished = match outcome {
                Ok(resolved) => {
                    for failure in &resolved.failures {
                        self.target.notify(failure);
                    }
                    log::debug!("Delivering {} files", resolved.files.len());
                    self.target.deliver(resolved.files);
                    DropState::Delivered
                }
                Err(failure) => {
                    self.target.notify(&failure);
                    DropState::Failed
                }
            };
            self.transition(finished);
            self.transition(DropState::Idle);
            finished
        }
    }
}
