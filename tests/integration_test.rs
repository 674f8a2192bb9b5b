use std::{collections::BTreeSet, fs, path::Path};

use dropwalk::{
    fs::{FsEntry, LocalFile, PathItem},
    traverse_directory, DropConfig, DropError, DropPolicy, DropState,
    DropTarget, DropZone, FileHandle, FileWithRelativePath,
};
use rstest::rstest;
use tempdir::TempDir;

#[derive(Default)]
struct Collector {
    delivered: Option<Vec<FileWithRelativePath<LocalFile>>>,
    errors: Vec<String>,
}

impl DropTarget for Collector {
    type File = LocalFile;

    fn deliver(&mut self, files: Vec<FileWithRelativePath<LocalFile>>) {
        self.delivered = Some(files);
    }

    fn notify(&mut self, error: &DropError) {
        self.errors.push(error.to_string());
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn relative_paths(files: &[FileWithRelativePath<LocalFile>]) -> BTreeSet<&str> {
    files.iter().map(|f| f.relative_path()).collect()
}

#[tokio::test]
async fn drops_a_file_and_a_folder_from_disk() {
    init_logger();
    let dir = TempDir::new("dropwalk-it").unwrap();
    write(&dir.path().join("notes.txt"), "top");
    write(&dir.path().join("album/one.jpg"), "1");
    write(&dir.path().join("album/2024/two.jpg"), "22");

    let items = vec![
        PathItem::new(dir.path().join("notes.txt")),
        PathItem::new(dir.path().join("album")),
    ];
    let mut zone = DropZone::new(Collector::default());

    let state = zone.handle_drop(&items).await;
    assert_eq!(state, DropState::Delivered);

    let collector = zone.into_target();
    let files = collector.delivered.unwrap();
    assert_eq!(files.len(), 3);
    assert_eq!(files[0].relative_path(), "notes.txt");
    assert_eq!(
        relative_paths(&files[1..]),
        BTreeSet::from(["/album/one.jpg", "/album/2024/two.jpg"])
    );
    let two = files
        .iter()
        .find(|f| f.relative_path().ends_with("two.jpg"))
        .unwrap();
    assert_eq!(two.file().size(), 2);
    assert!(collector.errors.is_empty());
}

#[rstest]
#[case(1)]
#[case(4)]
#[case(100)]
#[tokio::test]
async fn small_listing_pages_still_find_every_file(#[case] page_size: usize) {
    let dir = TempDir::new("dropwalk-it").unwrap();
    let root = dir.path().join("bulk");
    for i in 0..25 {
        write(&root.join(format!("f{i:02}.dat")), "x");
    }
    write(&root.join("sub/inner.dat"), "y");

    let entry = FsEntry::open(&root, page_size).unwrap();
    let files = traverse_directory(&entry).await.unwrap();

    assert_eq!(files.len(), 26);
    let paths = relative_paths(&files);
    assert!(paths.contains("/bulk/f00.dat"));
    assert!(paths.contains("/bulk/f24.dat"));
    assert!(paths.contains("/bulk/sub/inner.dat"));
}

#[tokio::test]
async fn traversing_twice_gives_the_same_files() {
    let dir = TempDir::new("dropwalk-it").unwrap();
    write(&dir.path().join("tree/a/b/c.txt"), "c");
    write(&dir.path().join("tree/a/d.txt"), "d");
    write(&dir.path().join("tree/e.txt"), "e");

    let entry = FsEntry::open(dir.path().join("tree"), 2).unwrap();
    let first = traverse_directory(&entry).await.unwrap();
    let second = traverse_directory(&entry).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn missing_dropped_path_is_skipped() {
    let dir = TempDir::new("dropwalk-it").unwrap();
    write(&dir.path().join("here.txt"), "x");

    let items = vec![
        PathItem::new(dir.path().join("gone.txt")),
        PathItem::new(dir.path().join("here.txt")),
    ];
    let mut zone = DropZone::new(Collector::default());
    zone.handle_drop(&items).await;

    let files = zone.into_target().delivered.unwrap();
    assert_eq!(relative_paths(&files), BTreeSet::from(["here.txt"]));
}

#[tokio::test]
async fn empty_drop_is_not_an_error() {
    let items: Vec<PathItem> = Vec::new();
    let mut zone = DropZone::with_config(
        Collector::default(),
        DropConfig {
            policy: DropPolicy::Strict,
            ..DropConfig::default()
        },
    );

    let state = zone.handle_drop(&items).await;

    assert_eq!(state, DropState::Delivered);
    let collector = zone.into_target();
    assert_eq!(collector.delivered.map(|f| f.len()), Some(0));
    assert!(collector.errors.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn unreadable_subfolder_fails_the_gesture() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new("dropwalk-it").unwrap();
    write(&dir.path().join("ok.txt"), "x");
    let locked = dir.path().join("share/locked");
    write(&locked.join("file.txt"), "x");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // running with privileges that ignore permissions
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))
            .unwrap();
        return;
    }

    let items = vec![
        PathItem::new(dir.path().join("ok.txt")),
        PathItem::new(dir.path().join("share")),
    ];
    let mut zone = DropZone::new(Collector::default());
    let state = zone.handle_drop(&items).await;

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    assert_eq!(state, DropState::Failed);
    let collector = zone.into_target();
    assert!(collector.delivered.is_none());
    assert_eq!(collector.errors.len(), 1);
    assert!(collector.errors[0].contains("/share/locked"));
}
