use thiserror::Error;

use crate::datetime;
use crate::task::Task;

const DONE_USAGE: &str = "done 'index'";
const DELETE_USAGE: &str = "delete 'index'";
const TODO_USAGE: &str = "todo 'description'";
const DEADLINE_USAGE: &str = "deadline 'description' /by 'yyyy mm dd hhmm'";
const EVENT_USAGE: &str = "event 'description' /from 'yyyy mm dd hhmm' to 'yyyy mm dd hhmm'";
const FIND_USAGE: &str = "find 'content'";

/// A validated command ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// End the session.
    Exit,
    /// Show every task.
    List,
    /// Mark the task at the 1-based index as done.
    MarkDone(usize),
    /// Remove the task at the 1-based index.
    Delete(usize),
    /// Case-sensitive substring search over descriptions.
    Find(String),
    /// Append a freshly built task.
    Add(Task),
    /// Input that matched no known command shape. Not a failure; the
    /// caller decides how to present it.
    Unknown,
}

/// Validation failure for a single command line. The `Display` output
/// is the user-facing guidance text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An add command carried nothing but whitespace after the keyword.
    #[error("The description of a {0} task cannot be empty.\nPlease try again.")]
    EmptyDescription(&'static str),
    /// The keyword matched but the rest of the line did not.
    #[error(
        "There appears to be a typo in your {command} command.\nThe command should be of the form:\n  {usage}\nPlease try again."
    )]
    Malformed {
        /// Command keyword, upper-cased for the message.
        command: &'static str,
        /// The expected form.
        usage: &'static str,
    },
    /// A find command with no search text.
    #[error("The contents of a FIND command cannot be empty.\nPlease try again.")]
    EmptyQuery,
    /// Date/time tokens with the right shape that do not name a real
    /// calendar date/time.
    #[error(
        "'{input}' is not a valid date and time: {reason}\nThe expected format is 'yyyy mm dd hhmm'.\nPlease try again."
    )]
    InvalidDateTime {
        /// The rejected date/time text.
        input: String,
        /// Underlying reason from the date/time parser.
        reason: String,
    },
}

/// Turn one raw input line into a structured command.
///
/// Keywords are case-insensitive and surrounding whitespace is
/// tolerated. Lines that resemble no known command yield
/// [`Command::Unknown`] rather than an error. Pure textual pattern
/// matching; never touches the task list or storage.
///
/// # Errors
/// Returns a [`ParseError`] when a recognized keyword carries a
/// malformed argument: a missing or non-positive index, an empty
/// description or search text, or a bad date/time.
pub fn parse(raw: &str) -> Result<Command, ParseError> {
    let line = raw.trim();
    let lower = line.to_ascii_lowercase();
    if lower == "bye" {
        return Ok(Command::Exit);
    }
    if lower == "list" {
        return Ok(Command::List);
    }
    if let Some(rest) = argument_of(line, "done") {
        return parse_index(rest, "DONE", DONE_USAGE).map(Command::MarkDone);
    }
    if let Some(rest) = argument_of(line, "delete") {
        return parse_index(rest, "DELETE", DELETE_USAGE).map(Command::Delete);
    }
    if lower.starts_with("todo") {
        return parse_todo(line);
    }
    if lower.starts_with("deadline") {
        return parse_deadline(line);
    }
    if lower.starts_with("event") {
        return parse_event(line);
    }
    if lower.starts_with("find") {
        return parse_find(line);
    }
    Ok(Command::Unknown)
}

/// The text after `keyword` when the keyword stands alone as the first
/// word of `line` (case-insensitive). `None` when the keyword runs
/// straight into other characters, which is the typo case.
fn argument_of<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let head = line.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &line[keyword.len()..];
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

/// A 1-based index is a plain positive digit sequence: no sign, no
/// leading zero, so `0` and `-1` are syntax errors rather than
/// out-of-range values. Range checks against the list are the
/// caller's job.
fn parse_index(arg: &str, command: &'static str, usage: &'static str) -> Result<usize, ParseError> {
    let digits = arg.trim();
    let shaped = !digits.is_empty()
        && !digits.starts_with('0')
        && digits.bytes().all(|b| b.is_ascii_digit());
    if !shaped {
        return Err(ParseError::Malformed { command, usage });
    }
    digits
        .parse()
        .map_err(|_| ParseError::Malformed { command, usage })
}

fn parse_todo(line: &str) -> Result<Command, ParseError> {
    let Some(rest) = argument_of(line, "todo") else {
        return Err(ParseError::Malformed {
            command: "TODO",
            usage: TODO_USAGE,
        });
    };
    let description = rest.trim();
    if description.is_empty() {
        return Err(ParseError::EmptyDescription("TODO"));
    }
    Ok(Command::Add(Task::todo(description)))
}

fn parse_deadline(line: &str) -> Result<Command, ParseError> {
    let malformed = || ParseError::Malformed {
        command: "DEADLINE",
        usage: DEADLINE_USAGE,
    };
    let rest = argument_of(line, "deadline").ok_or_else(malformed)?;
    let (description, by_text) = rest.split_once(" /by ").ok_or_else(malformed)?;
    let description = description.trim();
    let by_text = by_text.trim();
    if description.is_empty() || !datetime::matches_shape(by_text) {
        return Err(malformed());
    }
    let by = parse_datetime(by_text)?;
    Ok(Command::Add(Task::deadline(description, by)))
}

fn parse_event(line: &str) -> Result<Command, ParseError> {
    let malformed = || ParseError::Malformed {
        command: "EVENT",
        usage: EVENT_USAGE,
    };
    let rest = argument_of(line, "event").ok_or_else(malformed)?;
    let (description, times) = rest.split_once(" /from ").ok_or_else(malformed)?;
    let (from_text, to_text) = times.split_once(" to ").ok_or_else(malformed)?;
    let description = description.trim();
    let from_text = from_text.trim();
    let to_text = to_text.trim();
    if description.is_empty()
        || !datetime::matches_shape(from_text)
        || !datetime::matches_shape(to_text)
    {
        return Err(malformed());
    }
    let from = parse_datetime(from_text)?;
    let to = parse_datetime(to_text)?;
    Ok(Command::Add(Task::event(description, from, to)))
}

fn parse_find(line: &str) -> Result<Command, ParseError> {
    let Some(rest) = argument_of(line, "find") else {
        return Err(ParseError::Malformed {
            command: "FIND",
            usage: FIND_USAGE,
        });
    };
    let query = rest.trim();
    if query.is_empty() {
        return Err(ParseError::EmptyQuery);
    }
    Ok(Command::Find(query.to_owned()))
}

fn parse_datetime(text: &str) -> Result<time::PrimitiveDateTime, ParseError> {
    datetime::parse(text).map_err(|err| ParseError::InvalidDateTime {
        input: err.input,
        reason: err.reason,
    })
}
