use crate::task::Task;

/// Ordered task collection. External indices shown to the user are
/// 1-based; internal storage is 0-based, so external index `i` always
/// lives at position `i - 1`. Order equals insertion order; deletions
/// shift later tasks down but never reorder.
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Wrap tasks loaded from storage.
    #[must_use]
    pub const fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the list holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Whether the external index falls within `1..=len`.
    #[must_use]
    pub fn is_index_valid(&self, index: usize) -> bool {
        (1..=self.tasks.len()).contains(&index)
    }

    /// Append a task and report the confirmation message naming it and
    /// the new total.
    pub fn add(&mut self, task: Task) -> String {
        let rendered = task.to_string();
        self.tasks.push(task);
        format!(
            "Got it. I've added this task:\n  {rendered}\n{}",
            self.count_line()
        )
    }

    /// Mark the task at the external index as done and report the
    /// confirmation. Re-marking a done task succeeds again with a
    /// fresh message. `None` when the index is out of range.
    pub fn mark_done(&mut self, index: usize) -> Option<String> {
        let task = self.tasks.get_mut(index.checked_sub(1)?)?;
        task.mark_done();
        Some(format!(
            "Nice! I've marked this task as done:\n  {index}.{task}"
        ))
    }

    /// Remove the task at the external index, shifting later tasks
    /// down by one, and report the confirmation. `None` when the index
    /// is out of range.
    pub fn delete(&mut self, index: usize) -> Option<String> {
        if !self.is_index_valid(index) {
            return None;
        }
        let removed = self.tasks.remove(index - 1);
        Some(format!(
            "Noted. I've removed this task:\n  {index}.{removed}\n{}",
            self.count_line()
        ))
    }

    /// Linear case-sensitive substring scan over descriptions,
    /// preserving order and original external indices.
    #[must_use]
    pub fn find(&self, query: &str) -> Vec<(usize, &Task)> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.description().contains(query))
            .map(|(position, task)| (position + 1, task))
            .collect()
    }

    /// Read-only view of every task in order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Persisted encoding of the task at the external index, for
    /// syncing storage after a mutation.
    #[must_use]
    pub fn storage_line(&self, index: usize) -> Option<String> {
        self.tasks
            .get(index.checked_sub(1)?)
            .map(Task::to_record)
    }

    fn count_line(&self) -> String {
        if self.tasks.is_empty() {
            "There are no tasks in your list.".to_owned()
        } else {
            format!("Now you have {} tasks in the list.", self.tasks.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_tasks() -> TaskList {
        let mut list = TaskList::default();
        list.add(Task::todo("read book"));
        list.add(Task::todo("buy milk"));
        list.add(Task::todo("book flight"));
        list
    }

    #[test]
    fn add_reports_the_task_and_the_new_total() {
        let mut list = TaskList::default();
        let message = list.add(Task::todo("read book"));
        assert_eq!(
            message,
            "Got it. I've added this task:\n  [T][ ] read book\nNow you have 1 tasks in the list."
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn external_indices_are_one_based() {
        let list = three_tasks();
        assert!(list.is_index_valid(1));
        assert!(list.is_index_valid(3));
        assert!(!list.is_index_valid(0));
        assert!(!list.is_index_valid(4));
    }

    #[test]
    fn mark_done_flips_the_indexed_task() {
        let mut list = three_tasks();
        let message = list
            .mark_done(2)
            .unwrap_or_else(|| panic!("index 2 must exist"));
        assert_eq!(
            message,
            "Nice! I've marked this task as done:\n  2.[T][X] buy milk"
        );
        assert!(list.tasks()[1].is_done());
        assert!(!list.tasks()[0].is_done());
    }

    #[test]
    fn mark_done_twice_reports_success_both_times() {
        let mut list = three_tasks();
        assert!(list.mark_done(1).is_some());
        assert!(list.mark_done(1).is_some());
        assert!(list.tasks()[0].is_done());
    }

    #[test]
    fn mark_done_out_of_range_is_none() {
        let mut list = three_tasks();
        assert!(list.mark_done(0).is_none());
        assert!(list.mark_done(4).is_none());
    }

    #[test]
    fn delete_shifts_later_indices_down() {
        let mut list = three_tasks();
        let message = list.delete(2).unwrap_or_else(|| panic!("index 2 must exist"));
        assert_eq!(
            message,
            "Noted. I've removed this task:\n  2.[T][ ] buy milk\nNow you have 2 tasks in the list."
        );
        assert_eq!(list.tasks()[1].description(), "book flight");
        assert!(list.is_index_valid(2));
        assert!(!list.is_index_valid(3));
    }

    #[test]
    fn deleting_the_last_task_reports_the_empty_phrasing() {
        let mut list = TaskList::default();
        list.add(Task::todo("only"));
        let message = list.delete(1).unwrap_or_else(|| panic!("index 1 must exist"));
        assert!(message.ends_with("There are no tasks in your list."));
        assert!(list.is_empty());
    }

    #[test]
    fn find_preserves_original_indices_and_order() {
        let list = three_tasks();
        let matches = list.find("book");
        let indices: Vec<usize> = matches.iter().map(|(index, _)| *index).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn find_is_case_sensitive() {
        let list = three_tasks();
        assert!(list.find("Book").is_empty());
        assert_eq!(list.find("book").len(), 2);
    }

    #[test]
    fn storage_line_matches_the_indexed_task() {
        let mut list = three_tasks();
        list.mark_done(2);
        assert_eq!(
            list.storage_line(2).as_deref(),
            Some("T%true%buy milk")
        );
        assert!(list.storage_line(4).is_none());
    }
}
