//! Flat-file storage keeping one record line per task.
//!
//! Contract: after any successful `store_*` call, line k of the data
//! file (1-based) encodes the task at external index k of the
//! in-memory list, for every k. The store never reorders lines; adds
//! append, done-rewrites replace one line, deletes omit one line.
//! Callers drive the file strictly in step with their list — the
//! store holds no task state of its own. The alignment assumes no
//! concurrent external edits to the file.

/// Error types.
pub mod error;

pub use error::StoreError;

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use taskline_core::Task;
use tracing::debug;

/// Line-oriented task store over a single data file. Every operation
/// opens the file, works, and closes the handle before returning;
/// nothing is held open between calls.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open the store at `dir`/`file`, creating the directory and an
    /// empty data file on first run.
    ///
    /// # Errors
    /// Returns an error when the directory or file cannot be created.
    pub fn open(dir: impl AsRef<Path>, file: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(file);
        if !path.exists() {
            File::create(&path)?;
            debug!(path = %path.display(), "created empty data file");
        }
        Ok(Self { path })
    }

    /// Path of the data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every persisted record back into tasks, in file order.
    /// Lines with an unrecognized kind tag are skipped so files
    /// written by newer versions still load.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or a recognized
    /// record is malformed.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        let contents = fs::read_to_string(&self.path)?;
        let mut tasks = Vec::new();
        for (number, line) in contents.lines().enumerate() {
            match Task::from_record(line) {
                Ok(Some(task)) => tasks.push(task),
                Ok(None) => {
                    debug!(line = number + 1, "skipping record with unknown kind tag");
                }
                Err(source) => {
                    return Err(StoreError::MalformedRecord {
                        line: number + 1,
                        source,
                    });
                }
            }
        }
        debug!(count = tasks.len(), path = %self.path.display(), "loaded task records");
        Ok(tasks)
    }

    /// Append one record line to the end of the file. O(1) I/O;
    /// existing lines are not touched.
    ///
    /// # Errors
    /// Returns an error when the file cannot be opened or written.
    pub fn store_add(&self, record: &str) -> Result<(), StoreError> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{record}")?;
        debug!(path = %self.path.display(), "appended one record");
        Ok(())
    }

    /// Replace the record at the 1-based line with a new encoding,
    /// leaving every other line byte-identical.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or written, or
    /// when it has no line at `index`.
    pub fn store_done(&self, index: usize, record: &str) -> Result<(), StoreError> {
        self.rewrite(index, Some(record))
    }

    /// Drop the record at the 1-based line, shifting later lines up,
    /// leaving every other line byte-identical.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or written, or
    /// when it has no line at `index`.
    pub fn store_delete(&self, index: usize) -> Result<(), StoreError> {
        self.rewrite(index, None)
    }

    /// Full read, selective rewrite, then one truncating overwrite:
    /// lines before `index` verbatim, the replacement (if any) in
    /// place of line `index`, remaining lines verbatim.
    fn rewrite(&self, index: usize, replacement: Option<&str>) -> Result<(), StoreError> {
        let contents = fs::read_to_string(&self.path)?;
        let mut rewritten = String::with_capacity(contents.len());
        let mut found = false;
        for (number, line) in contents.lines().enumerate() {
            if number + 1 == index {
                found = true;
                if let Some(record) = replacement {
                    rewritten.push_str(record);
                    rewritten.push('\n');
                }
            } else {
                rewritten.push_str(line);
                rewritten.push('\n');
            }
        }
        if !found {
            return Err(StoreError::MissingLine(index));
        }
        fs::write(&self.path, rewritten)?;
        debug!(
            index,
            replaced = replacement.is_some(),
            path = %self.path.display(),
            "rewrote data file"
        );
        Ok(())
    }
}
