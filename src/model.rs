use chrono::{DateTime, Local};
use log::{debug, info};
use serde::Deserialize;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identity of a task inside a store. Two tasks with the same title
/// are still different tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown priority '{0}' (expected High, Medium or Low)")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "medium" | "m" => Ok(Priority::Medium),
            "low" | "l" => Ok(Priority::Low),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Reasons a task creation request is rejected. The store is left
/// untouched in both cases.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title can't be empty.")]
    EmptyTitle,
    #[error("Time must be a number.")]
    InvalidTime(String),
}

/// A single to-do item. Everything but the completion state is fixed
/// at creation.
#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    title: String,
    priority: Priority,
    minutes: i64,
    completed: bool,
    created_at: DateTime<Local>,
    completed_at: Option<DateTime<Local>>,
}

impl Task {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Present exactly when the task is completed.
    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        self.completed_at
    }

    fn set_completed(&mut self, completed: bool, now: DateTime<Local>) {
        self.completed = completed;
        self.completed_at = if completed { Some(now) } else { None };
    }
}

/// The ordered, in-memory collection of tasks. Display order is
/// creation order.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a creation request and append the new task at the end.
    ///
    /// `minutes` is the raw user input. It must parse as an integer once
    /// surrounding whitespace is removed; no range is enforced. The time
    /// estimate is checked before the title.
    pub fn create(
        &mut self,
        title: &str,
        priority: Priority,
        minutes: &str,
    ) -> Result<&Task, ValidationError> {
        let minutes = minutes
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidTime(minutes.to_string()))?;

        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let id = TaskId(self.next_id);
        self.next_id += 1;

        self.tasks.push(Task {
            id,
            title: title.to_string(),
            priority,
            minutes,
            completed: false,
            created_at: Local::now(),
            completed_at: None,
        });
        info!("created task {} '{}' ({}, {} min)", id, title, priority, minutes);

        let index = self.tasks.len() - 1;
        Ok(&self.tasks[index])
    }

    /// Flip the completion state of a task. Unknown ids are ignored.
    pub fn toggle(&mut self, id: TaskId) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        let completed = !task.completed;
        task.set_completed(completed, Local::now());
        info!("task {} marked {}", id, if completed { "done" } else { "pending" });
        Some(&*task)
    }

    /// Remove a task, keeping the order of the others. Unknown ids are
    /// ignored.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = match self.tasks.iter().position(|task| task.id == id) {
            Some(index) => index,
            None => {
                debug!("remove of unknown task {} ignored", id);
                return None;
            }
        };
        let task = self.tasks.remove(index);
        info!("removed task {} '{}'", id, task.title);
        Some(task)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Resolve a 1-based display position to the task id shown there.
    pub fn id_at(&self, position: usize) -> Option<TaskId> {
        position
            .checked_sub(1)
            .and_then(|index| self.tasks.get(index))
            .map(Task::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(store: &TaskStore) -> Vec<&str> {
        store.iter().map(Task::title).collect()
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut store = TaskStore::new();
        assert_eq!(
            store.create("", Priority::Medium, "30").unwrap_err(),
            ValidationError::EmptyTitle
        );
        assert_eq!(
            store.create("   \t", Priority::Medium, "30").unwrap_err(),
            ValidationError::EmptyTitle
        );
        assert!(store.is_empty());
    }

    #[test]
    fn non_numeric_time_is_rejected() {
        let mut store = TaskStore::new();
        let err = store.create("Buy milk", Priority::Low, "abc").unwrap_err();
        assert_eq!(err, ValidationError::InvalidTime("abc".to_string()));
        assert_eq!(
            store.create("Buy milk", Priority::Low, "1.5").unwrap_err(),
            ValidationError::InvalidTime("1.5".to_string())
        );
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn invalid_time_wins_over_empty_title() {
        let mut store = TaskStore::new();
        assert!(matches!(
            store.create("", Priority::High, "soon"),
            Err(ValidationError::InvalidTime(_))
        ));
    }

    #[test]
    fn new_task_starts_pending() {
        let mut store = TaskStore::new();
        let task = store.create("Buy milk", Priority::High, "30").unwrap();
        assert_eq!(task.title(), "Buy milk");
        assert_eq!(task.priority(), Priority::High);
        assert_eq!(task.minutes(), 30);
        assert!(!task.is_completed());
        assert!(task.completed_at().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn title_and_time_are_trimmed() {
        let mut store = TaskStore::new();
        let task = store.create("  Call mom  ", Priority::Low, " 15 ").unwrap();
        assert_eq!(task.title(), "Call mom");
        assert_eq!(task.minutes(), 15);
    }

    #[test]
    fn zero_and_negative_minutes_are_accepted() {
        let mut store = TaskStore::new();
        assert_eq!(store.create("a", Priority::Low, "0").unwrap().minutes(), 0);
        assert_eq!(store.create("b", Priority::Low, "-20").unwrap().minutes(), -20);
        assert_eq!(store.create("c", Priority::Low, "+5").unwrap().minutes(), 5);
    }

    #[test]
    fn toggle_sets_and_clears_completion_time() {
        let mut store = TaskStore::new();
        let id = store.create("Write report", Priority::Medium, "45").unwrap().id();

        let task = store.toggle(id).unwrap();
        assert!(task.is_completed());
        assert!(task.completed_at().is_some());
        assert!(task.completed_at().unwrap() >= task.created_at());

        let task = store.toggle(id).unwrap();
        assert!(!task.is_completed());
        assert!(task.completed_at().is_none());
    }

    #[test]
    fn duplicate_titles_are_distinct_tasks() {
        let mut store = TaskStore::new();
        let first = store.create("Same", Priority::Low, "1").unwrap().id();
        let second = store.create("Same", Priority::Low, "1").unwrap().id();
        assert_ne!(first, second);

        store.toggle(second);
        assert!(!store.get(first).unwrap().is_completed());
        assert!(store.get(second).unwrap().is_completed());
    }

    #[test]
    fn remove_preserves_order() {
        let mut store = TaskStore::new();
        let a = store.create("A", Priority::High, "10").unwrap().id();
        store.create("B", Priority::High, "10").unwrap();
        store.remove(a).unwrap();
        store.create("C", Priority::High, "10").unwrap();
        assert_eq!(titles(&store), vec!["B", "C"]);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut store = TaskStore::new();
        let id = store.create("A", Priority::High, "10").unwrap().id();
        assert!(store.remove(id).is_some());
        assert!(store.remove(id).is_none());
        assert!(store.toggle(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut store = TaskStore::new();
        let a = store.create("A", Priority::High, "10").unwrap().id();
        store.remove(a);
        let b = store.create("B", Priority::High, "10").unwrap().id();
        assert_ne!(a, b);
    }

    #[test]
    fn positions_resolve_to_ids() {
        let mut store = TaskStore::new();
        let a = store.create("A", Priority::High, "10").unwrap().id();
        let b = store.create("B", Priority::High, "10").unwrap().id();
        assert_eq!(store.id_at(1), Some(a));
        assert_eq!(store.id_at(2), Some(b));
        assert_eq!(store.id_at(0), None);
        assert_eq!(store.id_at(3), None);
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("High".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("medium".parse::<Priority>(), Ok(Priority::Medium));
        assert_eq!("L".parse::<Priority>(), Ok(Priority::Low));
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }
}
