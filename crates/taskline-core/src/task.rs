use std::fmt;

use thiserror::Error;
use time::PrimitiveDateTime;

use crate::datetime;

/// Reserved field separator for persisted records. Descriptions and
/// date fields must never contain it; the format does not escape.
pub const FIELD_DELIMITER: char = '%';

/// One tracked task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Plain task carrying only a description.
    Todo {
        /// What the task is about. Never empty after construction.
        description: String,
        /// Completion flag.
        done: bool,
    },
    /// Task with a single target date/time.
    Deadline {
        /// What the task is about. Never empty after construction.
        description: String,
        /// Completion flag.
        done: bool,
        /// When the task is due.
        by: PrimitiveDateTime,
    },
    /// Task spanning a start and an end date/time. No ordering between
    /// the two is enforced.
    Event {
        /// What the task is about. Never empty after construction.
        description: String,
        /// Completion flag.
        done: bool,
        /// When the event starts.
        from: PrimitiveDateTime,
        /// When the event ends.
        to: PrimitiveDateTime,
    },
}

/// Failure to decode a recognized persisted record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A field the kind tag requires was not present.
    #[error("record is missing its {0} field")]
    MissingField(&'static str),
    /// The done flag was neither `true` nor `false`.
    #[error("unreadable done flag: {0}")]
    BadDoneFlag(String),
    /// A date field did not match the external date/time format.
    #[error("unreadable date field: {0}")]
    BadDateTime(#[from] datetime::DateTimeError),
}

impl Task {
    /// Build a pending todo.
    #[must_use]
    pub fn todo(description: impl Into<String>) -> Self {
        Self::Todo {
            description: description.into(),
            done: false,
        }
    }

    /// Build a pending deadline due at `by`.
    #[must_use]
    pub fn deadline(description: impl Into<String>, by: PrimitiveDateTime) -> Self {
        Self::Deadline {
            description: description.into(),
            done: false,
            by,
        }
    }

    /// Build a pending event running from `from` to `to`.
    #[must_use]
    pub fn event(description: impl Into<String>, from: PrimitiveDateTime, to: PrimitiveDateTime) -> Self {
        Self::Event {
            description: description.into(),
            done: false,
            from,
            to,
        }
    }

    /// The task description.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Todo { description, .. }
            | Self::Deadline { description, .. }
            | Self::Event { description, .. } => description,
        }
    }

    /// Whether the task has been completed.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        match self {
            Self::Todo { done, .. } | Self::Deadline { done, .. } | Self::Event { done, .. } => {
                *done
            }
        }
    }

    /// Flip the task to done. Marking an already done task is allowed
    /// and leaves it done.
    pub const fn mark_done(&mut self) {
        match self {
            Self::Todo { done, .. } | Self::Deadline { done, .. } | Self::Event { done, .. } => {
                *done = true;
            }
        }
    }

    /// Encode the task as one persisted record line (without the
    /// trailing newline): `<kind>%<done>%<description>[%<extra>...]`.
    #[must_use]
    pub fn to_record(&self) -> String {
        let d = FIELD_DELIMITER;
        match self {
            Self::Todo { description, done } => format!("T{d}{done}{d}{description}"),
            Self::Deadline {
                description,
                done,
                by,
            } => format!("D{d}{done}{d}{description}{d}{}", datetime::format(*by)),
            Self::Event {
                description,
                done,
                from,
                to,
            } => format!(
                "E{d}{done}{d}{description}{d}{}{d}{}",
                datetime::format(*from),
                datetime::format(*to)
            ),
        }
    }

    /// Decode one persisted record line. `Ok(None)` marks a line whose
    /// kind tag is not recognized; callers skip those so files written
    /// by newer versions still load.
    ///
    /// # Errors
    /// Returns a [`RecordError`] when a recognized record is missing a
    /// field, carries an unreadable done flag, or holds a date field
    /// that does not match the external format.
    pub fn from_record(line: &str) -> Result<Option<Self>, RecordError> {
        let mut fields = line.split(FIELD_DELIMITER);
        let kind = fields.next().unwrap_or_default();
        if !matches!(kind, "T" | "D" | "E") {
            return Ok(None);
        }

        let done = match fields.next() {
            Some("true") => true,
            Some("false") => false,
            Some(other) => return Err(RecordError::BadDoneFlag(other.to_owned())),
            None => return Err(RecordError::MissingField("done")),
        };
        let description = fields
            .next()
            .ok_or(RecordError::MissingField("description"))?
            .to_owned();

        let task = match kind {
            "T" => Self::Todo { description, done },
            "D" => {
                let by = datetime::parse(fields.next().ok_or(RecordError::MissingField("by"))?)?;
                Self::Deadline {
                    description,
                    done,
                    by,
                }
            }
            _ => {
                let from =
                    datetime::parse(fields.next().ok_or(RecordError::MissingField("from"))?)?;
                let to = datetime::parse(fields.next().ok_or(RecordError::MissingField("to"))?)?;
                Self::Event {
                    description,
                    done,
                    from,
                    to,
                }
            }
        };
        Ok(Some(task))
    }

    const fn status_icon(&self) -> &'static str {
        if self.is_done() { "[X]" } else { "[ ]" }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = self.status_icon();
        match self {
            Self::Todo { description, .. } => write!(f, "[T]{icon} {description}"),
            Self::Deadline {
                description, by, ..
            } => write!(f, "[D]{icon} {description} (by: {})", datetime::format(*by)),
            Self::Event {
                description,
                from,
                to,
                ..
            } => write!(
                f,
                "[E]{icon} {description} (from: {} to: {})",
                datetime::format(*from),
                datetime::format(*to)
            ),
        }
    }
}
