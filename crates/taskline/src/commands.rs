//! Session dispatch: applies parsed commands to the task list and
//! keeps the file store in step with it.

use std::path::Path;

use taskline_core::{Command, Task, TaskList, command};
use taskline_store_file::{FileStore, StoreError};
use tracing::warn;

const MISSING_TASK: &str = "That task doesn't exist.\nPlease try again.";
const UNKNOWN_COMMAND: &str = "I didn't get that. Please try again.";

/// What one input line produced, for the caller to render.
#[derive(Debug, PartialEq, Eq)]
pub struct Outcome {
    /// The reply itself.
    pub reply: Reply,
    /// Whether a storage write failed while applying the command. Set
    /// at most once per session; afterwards persistence is off.
    pub storage_failed: bool,
}

impl Outcome {
    const fn of(reply: Reply) -> Self {
        Self {
            reply,
            storage_failed: false,
        }
    }
}

/// Reply kinds a command can yield.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    /// A framed confirmation or neutral message.
    Message(String),
    /// A framed error with guidance text.
    Error(String),
    /// The full list, for index-annotated rendering.
    List(Vec<Task>),
    /// Matches with their original external indices.
    Matches(Vec<(usize, Task)>),
    /// The session is over.
    Exit,
}

/// Facade over the task list and its backing store. One command is
/// fully applied to memory, then flushed to the file, before the next
/// line is read. On a storage write failure memory is kept as-is (no
/// rollback) and persistence is disabled for the rest of the session.
#[derive(Debug)]
pub struct Session {
    list: TaskList,
    store: Option<FileStore>,
}

impl Session {
    /// Open the store under `dir`/`file` and rebuild the task list
    /// from it.
    ///
    /// # Errors
    /// Returns an error when the data file cannot be created, read,
    /// or holds a malformed record; the caller falls back to
    /// [`Session::in_memory`].
    pub fn open(dir: impl AsRef<Path>, file: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = FileStore::open(dir, file)?;
        let list = TaskList::new(store.load()?);
        Ok(Self {
            list,
            store: Some(store),
        })
    }

    /// A session without persistence, used when storage is
    /// unavailable.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            list: TaskList::default(),
            store: None,
        }
    }

    /// Parse and apply one raw input line.
    pub fn handle_line(&mut self, line: &str) -> Outcome {
        match command::parse(line) {
            Ok(parsed) => self.execute(parsed),
            Err(err) => Outcome::of(Reply::Error(err.to_string())),
        }
    }

    /// Apply an already parsed command.
    pub fn execute(&mut self, parsed: Command) -> Outcome {
        match parsed {
            Command::Exit => Outcome::of(Reply::Exit),
            Command::List => Outcome::of(Reply::List(self.list.tasks().to_vec())),
            Command::Find(query) => {
                let matches = self
                    .list
                    .find(&query)
                    .into_iter()
                    .map(|(index, task)| (index, task.clone()))
                    .collect();
                Outcome::of(Reply::Matches(matches))
            }
            Command::Add(task) => self.add(task),
            Command::MarkDone(index) => self.mark_done(index),
            Command::Delete(index) => self.delete(index),
            Command::Unknown => Outcome::of(Reply::Message(UNKNOWN_COMMAND.to_owned())),
        }
    }

    fn add(&mut self, task: Task) -> Outcome {
        let record = task.to_record();
        let message = self.list.add(task);
        let storage_failed = self.sync(|store| store.store_add(&record));
        Outcome {
            reply: Reply::Message(message),
            storage_failed,
        }
    }

    fn mark_done(&mut self, index: usize) -> Outcome {
        let Some(message) = self.list.mark_done(index) else {
            return Outcome::of(Reply::Error(MISSING_TASK.to_owned()));
        };
        let record = self.list.storage_line(index).unwrap_or_default();
        let storage_failed = self.sync(|store| store.store_done(index, &record));
        Outcome {
            reply: Reply::Message(message),
            storage_failed,
        }
    }

    fn delete(&mut self, index: usize) -> Outcome {
        let Some(message) = self.list.delete(index) else {
            return Outcome::of(Reply::Error(MISSING_TASK.to_owned()));
        };
        let storage_failed = self.sync(|store| store.store_delete(index));
        Outcome {
            reply: Reply::Message(message),
            storage_failed,
        }
    }

    /// Run a storage operation if persistence is active. A failure is
    /// reported once through the returned flag and turns persistence
    /// off; the in-memory list keeps the applied change.
    fn sync(&mut self, op: impl FnOnce(&FileStore) -> Result<(), StoreError>) -> bool {
        let Some(store) = self.store.as_ref() else {
            return false;
        };
        if let Err(err) = op(store) {
            warn!(error = %err, "storage write failed; persistence disabled for this session");
            self.store = None;
            return true;
        }
        false
    }

    #[cfg(test)]
    pub(crate) const fn list(&self) -> &TaskList {
        &self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};
    use time::macros::datetime;

    const DATA_FILE: &str = "taskData.txt";

    fn open_session() -> (TempDir, Session, PathBuf) {
        let dir = tempdir().unwrap_or_else(|err| panic!("tempdir must exist: {err}"));
        let path = dir.path().join(DATA_FILE);
        let session = Session::open(dir.path(), DATA_FILE)
            .unwrap_or_else(|err| panic!("session must open: {err}"));
        (dir, session, path)
    }

    fn file_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap_or_else(|err| panic!("data file must be readable: {err}"))
            .lines()
            .map(str::to_owned)
            .collect()
    }

    fn message_of(outcome: Outcome) -> String {
        match outcome.reply {
            Reply::Message(text) => text,
            other => panic!("expected a message, got {other:?}"),
        }
    }

    #[test]
    fn adding_a_todo_updates_memory_and_the_file() {
        let (_dir, mut session, path) = open_session();
        let message = message_of(session.handle_line("todo read book"));

        assert!(message.contains("Now you have 1 tasks in the list."));
        assert_eq!(session.list().len(), 1);
        assert_eq!(session.list().tasks()[0].description(), "read book");
        assert_eq!(file_lines(&path), vec!["T%false%read book".to_owned()]);
    }

    #[test]
    fn adding_a_deadline_parses_the_by_field() {
        let (_dir, mut session, path) = open_session();
        session.handle_line("deadline submit report /by 2024 03 15 1800");

        assert_eq!(
            session.list().tasks()[0],
            Task::deadline("submit report", datetime!(2024-03-15 18:00))
        );
        assert_eq!(
            file_lines(&path),
            vec!["D%false%submit report%2024 03 15 1800".to_owned()]
        );
    }

    #[test]
    fn malformed_deadline_names_the_expected_format() {
        let (_dir, mut session, path) = open_session();
        let outcome = session.handle_line("deadline submit report /by tomorrow");

        match outcome.reply {
            Reply::Error(text) => assert!(text.contains("yyyy mm dd hhmm")),
            other => panic!("expected an error, got {other:?}"),
        }
        assert!(file_lines(&path).is_empty());
    }

    #[test]
    fn delete_shifts_indices_and_shrinks_the_file() {
        let (_dir, mut session, path) = open_session();
        session.handle_line("todo read book");
        session.handle_line("todo buy milk");
        session.handle_line("todo book flight");

        let message = message_of(session.handle_line("delete 2"));
        assert!(message.contains("buy milk"));
        assert_eq!(session.list().len(), 2);
        assert_eq!(session.list().tasks()[1].description(), "book flight");
        assert_eq!(
            file_lines(&path),
            vec![
                "T%false%read book".to_owned(),
                "T%false%book flight".to_owned(),
            ]
        );
    }

    #[test]
    fn done_out_of_range_reports_and_leaves_the_file_alone() {
        let (_dir, mut session, path) = open_session();
        session.handle_line("todo read book");
        session.handle_line("todo buy milk");
        let before = file_lines(&path);

        let outcome = session.handle_line("done 5");
        assert_eq!(
            outcome.reply,
            Reply::Error(MISSING_TASK.to_owned())
        );
        assert!(!outcome.storage_failed);
        assert_eq!(file_lines(&path), before);
    }

    #[test]
    fn done_rewrites_the_matching_line() {
        let (_dir, mut session, path) = open_session();
        session.handle_line("todo read book");
        session.handle_line("todo buy milk");

        let message = message_of(session.handle_line("done 2"));
        assert!(message.contains("[T][X] buy milk"));
        assert_eq!(
            file_lines(&path),
            vec!["T%false%read book".to_owned(), "T%true%buy milk".to_owned()]
        );
    }

    #[test]
    fn done_twice_succeeds_both_times() {
        let (_dir, mut session, _path) = open_session();
        session.handle_line("todo read book");

        let first = message_of(session.handle_line("done 1"));
        let second = message_of(session.handle_line("done 1"));
        assert_eq!(first, second);
    }

    #[test]
    fn find_preserves_original_numbering() {
        let (_dir, mut session, _path) = open_session();
        session.handle_line("todo read book");
        session.handle_line("todo buy milk");
        session.handle_line("todo book flight");

        let outcome = session.handle_line("find book");
        match outcome.reply {
            Reply::Matches(matches) => {
                let indices: Vec<usize> = matches.iter().map(|(index, _)| *index).collect();
                assert_eq!(indices, vec![1, 3]);
            }
            other => panic!("expected matches, got {other:?}"),
        }
    }

    #[test]
    fn state_survives_a_restart() {
        let dir = tempdir().unwrap_or_else(|err| panic!("tempdir must exist: {err}"));
        {
            let mut session = Session::open(dir.path(), DATA_FILE)
                .unwrap_or_else(|err| panic!("session must open: {err}"));
            session.handle_line("todo read book");
            session.handle_line("event standup /from 2024 03 16 0900 to 2024 03 16 0915");
            session.handle_line("done 1");
        }

        let reopened = Session::open(dir.path(), DATA_FILE)
            .unwrap_or_else(|err| panic!("session must reopen: {err}"));
        assert_eq!(reopened.list().len(), 2);
        assert!(reopened.list().tasks()[0].is_done());
        assert_eq!(reopened.list().tasks()[1].description(), "standup");
    }

    #[test]
    fn unknown_input_is_a_neutral_message() {
        let (_dir, mut session, _path) = open_session();
        let outcome = session.handle_line("hello there");
        assert_eq!(outcome.reply, Reply::Message(UNKNOWN_COMMAND.to_owned()));
    }

    #[test]
    fn bye_ends_the_session() {
        let (_dir, mut session, _path) = open_session();
        assert_eq!(session.handle_line("bye").reply, Reply::Exit);
    }

    #[test]
    fn in_memory_sessions_apply_commands_without_a_store() {
        let mut session = Session::in_memory();
        let message = message_of(session.handle_line("todo read book"));
        assert!(message.contains("read book"));
        assert_eq!(session.list().len(), 1);
    }

    #[test]
    fn a_write_failure_disables_persistence_but_keeps_memory() {
        let (dir, mut session, path) = open_session();
        // Replace the data file with a directory so the next append
        // fails.
        fs::remove_file(&path).unwrap_or_else(|err| panic!("must remove data file: {err}"));
        fs::create_dir(&path).unwrap_or_else(|err| panic!("must shadow data file: {err}"));

        let outcome = session.handle_line("todo read book");
        assert!(outcome.storage_failed);
        assert_eq!(session.list().len(), 1);

        // Later commands still work and no second storage failure is
        // reported.
        let outcome = session.handle_line("todo buy milk");
        assert!(!outcome.storage_failed);
        assert_eq!(session.list().len(), 2);
        drop(dir);
    }
}
