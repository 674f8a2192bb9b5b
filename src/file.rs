use serde::Serialize;

/// A file discovered in a drop gesture together with its path relative to
/// the dropped root.
///
/// For a file dropped on its own the relative path is the bare file name.
/// For a file found inside a dropped directory it is the entry's full path,
/// e.g. `/photos/2024/a.jpg`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileWithRelativePath<F> {
    file: F,
    relative_path: String,
}

impl<F> FileWithRelativePath<F> {
    pub fn new(file: F, relative_path: impl Into<String>) -> Self {
        FileWithRelativePath {
            file,
            relative_path: relative_path.into(),
        }
    }

    /// Return the retrieved file handle
    pub fn file(&self) -> &F {
        &self.file
    }

    /// Return the path relative to the dropped root
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn into_file(self) -> F {
        self.file
    }
}
