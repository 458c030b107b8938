//! Divider-framed terminal output.

use taskline_core::Task;

/// Line divider framing every response.
const DIVIDER: &str = "------------------------------";

const LOGO: &str = r"  _            _    _ _
 | |_ __ _ ___| | _| (_)_ __   ___
 | __/ _` / __| |/ / | | '_ \ / _ \
 | || (_| \__ \   <| | | | | |  __/
  \__\__,_|___/_|\_\_|_|_| |_|\___|
";

/// Stateless stdout renderer. Owns no handles; every method prints
/// one framed block.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ui;

impl Ui {
    /// Greeting shown once at startup.
    pub fn show_welcome(self) {
        println!("Hello from\n{LOGO}{DIVIDER}");
        println!("Hello! I'm Taskline");
        println!("What can I do for you?");
        println!("{DIVIDER}");
    }

    /// A framed confirmation or neutral message.
    pub fn show_message(self, message: &str) {
        println!("{DIVIDER}\n{message}\n{DIVIDER}");
    }

    /// A framed error with its guidance text.
    pub fn show_error(self, message: &str) {
        println!("{DIVIDER}\nOops... Something's wrong.\n{message}\n{DIVIDER}");
    }

    /// The one-time notice that persistence is unavailable.
    pub fn show_storage_error(self) {
        self.show_error("File for storage of tasks could not be accessed or written.");
    }

    /// Every task with its 1-based index.
    pub fn show_list(self, tasks: &[Task]) {
        println!("{DIVIDER}");
        if tasks.is_empty() {
            println!("There are no tasks in your list.");
        } else {
            println!("Here are the tasks in your list:");
            for (position, task) in tasks.iter().enumerate() {
                println!("  {}. {task}", position + 1);
            }
        }
        println!("{DIVIDER}");
    }

    /// Matching tasks, keeping their original external indices.
    pub fn show_matches(self, matches: &[(usize, Task)]) {
        println!("{DIVIDER}");
        if matches.is_empty() {
            println!("There are no matching tasks in your list.");
        } else {
            println!("Here are the matching tasks in your list:");
            for (index, task) in matches {
                println!("  {index}. {task}");
            }
        }
        println!("{DIVIDER}");
    }

    /// Farewell shown when the session ends on `bye`.
    pub fn show_goodbye(self) {
        self.show_message("Bye. Hope to see you again soon!");
    }
}
