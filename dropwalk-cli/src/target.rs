use std::io::{self, Write};

use dropwalk::{fs::LocalFile, DropError, DropTarget, FileWithRelativePath};

/// Prints delivered files to stdout and notifications to stderr
pub struct ConsoleTarget {
    json: bool,
    notifications: usize,
    output_error: Option<io::Error>,
}

impl ConsoleTarget {
    pub fn new(json: bool) -> Self {
        ConsoleTarget {
            json,
            notifications: 0,
            output_error: None,
        }
    }

    /// Number of errors shown to the user
    pub fn notifications(&self) -> usize {
        self.notifications
    }

    pub fn take_output_error(&mut self) -> Option<io::Error> {
        self.output_error.take()
    }

    fn print(
        &self,
        files: &[FileWithRelativePath<LocalFile>],
    ) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        if self.json {
            serde_json::to_writer_pretty(&mut stdout, files)?;
            writeln!(stdout)?;
        } else {
            for file in files {
                writeln!(stdout, "{}", file.relative_path())?;
            }
        }
        stdout.flush()
    }
}

impl DropTarget for ConsoleTarget {
    type File = LocalFile;

    fn deliver(&mut self, files: Vec<FileWithRelativePath<LocalFile>>) {
        if let Err(e) = self.print(&files) {
            self.output_error = Some(e);
        }
    }

    fn notify(&mut self, error: &DropError) {
        self.notifications += 1;
        eprintln!("{}", error);
    }
}
