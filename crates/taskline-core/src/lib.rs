//! Domain types & command parsing for taskline.

/// Command shapes and the line parser.
pub mod command;
/// External date/time format codec.
pub mod datetime;
/// Ordered task collection.
pub mod list;
/// Task variants, rendering, and the persisted record codec.
pub mod task;

pub use command::{Command, ParseError};
pub use list::TaskList;
pub use task::Task;
