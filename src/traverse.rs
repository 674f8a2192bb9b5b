use crate::{
    entry::{classify, is_directory_entry, DirectoryReader, Entry, EntryKind},
    errors::{DropError, Result},
    file::FileWithRelativePath,
};

/// Collect every file reachable from a directory entry.
///
/// Files are returned in discovery order: children in listing order, with
/// each sub-directory fully descended into before its next sibling. The
/// relative path of each file is its entry's full path.
///
/// The traversal is all-or-nothing. The first listing or retrieval failure
/// anywhere in the tree is returned as [`DropError::EntryRead`] and the files
/// collected so far are discarded.
///
/// Descent uses an explicit stack of per-directory cursors, so arbitrarily
/// deep trees don't grow the call stack.
pub async fn traverse_directory<E: Entry>(
    root: &E,
) -> Result<Vec<FileWithRelativePath<E::File>>> {
    if !is_directory_entry(Some(root)) {
        return Err(DropError::InvalidArgument(
            "entry must be directory".to_owned(),
        ));
    }
    log::debug!("Traversing directory {}", root.full_path());

    let mut result = Vec::new();
    let mut stack = vec![read_all_entries(root).await?.into_iter()];

    while let Some(children) = stack.last_mut() {
        let Some(entry) = children.next() else {
            stack.pop();
            continue;
        };

        match classify(Some(&entry)) {
            Some(EntryKind::File) => {
                let file = entry.file().await.map_err(|e| {
                    DropError::entry_read(entry.full_path(), e)
                })?;
                log::trace!("Discovered file {}", entry.full_path());
                result.push(FileWithRelativePath::new(file, entry.full_path()));
            }
            Some(EntryKind::Directory) => {
                let grandchildren = read_all_entries(&entry).await?;
                stack.push(grandchildren.into_iter());
            }
            None => {
                log::trace!("Skipping entry of unknown kind {}", entry.full_path())
            }
        }
    }

    log::debug!(
        "Found {} files under {}",
        result.len(),
        root.full_path()
    );
    Ok(result)
}

/// Drain the paginated listing of a directory.
///
/// A listing page is bounded, so the reader is polled until it hands back
/// an empty page.
async fn read_all_entries<E: Entry>(directory: &E) -> Result<Vec<E>> {
    let mut reader = directory.create_reader();
    let mut entries = Vec::new();

    loop {
        let batch = reader
            .read_entries()
            .await
            .map_err(|e| DropError::entry_read(directory.full_path(), e))?;
        if batch.is_empty() {
            break;
        }
        log::trace!(
            "Listed {} entries of {}",
            batch.len(),
            directory.full_path()
        );
        entries.extend(batch);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::*;
    use crate::{entry::FileHandle, memory::MemoryEntry};

    fn paths<F>(files: &[FileWithRelativePath<F>]) -> Vec<&str> {
        files.iter().map(|f| f.relative_path()).collect()
    }

    fn photos() -> MemoryEntry {
        MemoryEntry::directory(
            "photos",
            vec![
                MemoryEntry::file("cover.jpg", 10),
                MemoryEntry::directory(
                    "2023",
                    vec![
                        MemoryEntry::file("a.jpg", 1),
                        MemoryEntry::directory(
                            "raw",
                            vec![MemoryEntry::file("a.cr2", 100)],
                        ),
                        MemoryEntry::file("b.jpg", 2),
                    ],
                ),
                MemoryEntry::file("index.txt", 5),
                MemoryEntry::directory("empty", vec![]),
            ],
        )
    }

    #[tokio::test]
    async fn collects_nested_files_in_discovery_order() {
        let files = traverse_directory(&photos()).await.unwrap();

        assert_eq!(
            paths(&files),
            vec![
                "/photos/cover.jpg",
                "/photos/2023/a.jpg",
                "/photos/2023/raw/a.cr2",
                "/photos/2023/b.jpg",
                "/photos/index.txt",
            ]
        );
        assert_eq!(files[2].file().name(), "a.cr2");
        assert_eq!(files[2].file().size(), 100);
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(7)]
    #[tokio::test]
    async fn drains_every_listing_page(#[case] page_size: usize) {
        let children = (0..10)
            .map(|i| MemoryEntry::file(format!("{i}.txt"), i))
            .collect();
        let root =
            MemoryEntry::directory("many", children).with_page_size(page_size);

        let files = traverse_directory(&root).await.unwrap();

        assert_eq!(files.len(), 10);
        let expected: Vec<String> =
            (0..10).map(|i| format!("/many/{i}.txt")).collect();
        assert_eq!(paths(&files), expected);
        // every full page plus the final empty one
        assert_eq!(root.listing_calls(), 10usize.div_ceil(page_size) + 1);
    }

    #[tokio::test]
    async fn empty_directory_yields_nothing() {
        let root = MemoryEntry::directory("empty", vec![]);
        let files = traverse_directory(&root).await.unwrap();
        assert!(files.is_empty());
        assert_eq!(root.listing_calls(), 1);
    }

    #[tokio::test]
    async fn skips_entries_of_unknown_kind() {
        let root = MemoryEntry::directory(
            "dev",
            vec![
                MemoryEntry::unknown("socket"),
                MemoryEntry::file("notes.md", 4),
                MemoryEntry::ambiguous("weird"),
            ],
        );
        let files = traverse_directory(&root).await.unwrap();
        assert_eq!(paths(&files), vec!["/dev/notes.md"]);
    }

    #[tokio::test]
    async fn rejects_a_file_entry() {
        let err = traverse_directory(&MemoryEntry::file("a.txt", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DropError::InvalidArgument(_)), "{err}");
    }

    #[tokio::test]
    async fn unreadable_nested_file_fails_the_whole_tree() {
        let root = MemoryEntry::directory(
            "project",
            vec![
                MemoryEntry::file("ok.txt", 1),
                MemoryEntry::directory(
                    "secret",
                    vec![MemoryEntry::file("key.pem", 1).failing_file()],
                ),
            ],
        );

        let err = traverse_directory(&root).await.unwrap_err();
        assert_eq!(err.path(), Some("/project/secret/key.pem"));
        assert!(matches!(err, DropError::EntryRead { .. }));
    }

    #[tokio::test]
    async fn unlistable_subdirectory_fails_the_whole_tree() {
        let root = MemoryEntry::directory(
            "project",
            vec![
                MemoryEntry::directory("locked", vec![]).failing_listing(),
                MemoryEntry::file("after.txt", 1),
            ],
        );

        let err = traverse_directory(&root).await.unwrap_err();
        assert_eq!(err.path(), Some("/project/locked"));
    }

    #[tokio::test]
    async fn repeated_traversals_agree() {
        let root = photos().with_page_size(2);

        let first = traverse_directory(&root).await.unwrap();
        let second = traverse_directory(&root).await.unwrap();

        assert_eq!(first, second);
        let unique: HashSet<&str> = paths(&first).into_iter().collect();
        assert_eq!(unique.len(), first.len());
    }

    #[tokio::test]
    async fn handles_deeply_nested_trees() {
        let mut node = MemoryEntry::file("leaf.txt", 1);
        for depth in (0..500).rev() {
            node = MemoryEntry::directory(format!("d{depth}"), vec![node]);
        }

        let files = traverse_directory(&node).await.unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].relative_path().starts_with("/d0/d1/d2/"));
        assert!(files[0].relative_path().ends_with("/d499/leaf.txt"));
    }
}
