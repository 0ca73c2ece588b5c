//! Subject-tagged task list and the active subject filter

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info};

use super::PreferenceRepository;

/// Topic tag used to categorize tasks and filter the task view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Physics,
    Chemistry,
    Maths,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Physics, Subject::Chemistry, Subject::Maths];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Maths => "Maths",
        }
    }

    /// Parse a subject name, ignoring case and surrounding whitespace
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|subject| subject.as_str().eq_ignore_ascii_case(value))
    }

    /// Stored name of a filter value, `""` meaning no filter
    pub fn filter_name(filter: Option<Subject>) -> &'static str {
        filter.map(|subject| subject.as_str()).unwrap_or("")
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject a task was created under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSubject {
    Assigned(Subject),
    Unassigned,
}

impl TaskSubject {
    fn from_filter(filter: Option<Subject>) -> Self {
        filter.map_or(TaskSubject::Unassigned, TaskSubject::Assigned)
    }
}

impl fmt::Display for TaskSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskSubject::Assigned(subject) => f.write_str(subject.as_str()),
            TaskSubject::Unassigned => f.write_str("Unassigned"),
        }
    }
}

impl Serialize for TaskSubject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    /// Frozen at creation time
    pub subject: TaskSubject,
    pub completed: bool,
}

/// Owns the task sequence and the subject filter.
///
/// The filter is the single source of truth for "current subject": it
/// drives both the visible view and the subject new tasks are stamped with.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    active_filter: Option<Subject>,
    next_id: u64,
    preferences: Arc<PreferenceRepository>,
}

impl TaskStore {
    /// Create an empty store, restoring the filter from preferences
    pub fn new(preferences: Arc<PreferenceRepository>) -> Self {
        Self {
            tasks: Vec::new(),
            active_filter: preferences.snapshot().active_subject_filter,
            next_id: 1,
            preferences,
        }
    }

    /// Append a task stamped with the current filter. Blank text is ignored.
    pub fn add_task(&mut self, text: &str) -> Option<TaskId> {
        if text.trim().is_empty() {
            debug!("Ignoring blank task text");
            return None;
        }

        let id = TaskId(self.next_id);
        self.next_id += 1;

        let subject = TaskSubject::from_filter(self.active_filter);
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            subject,
            completed: false,
        });

        info!("Added task {} under {}", id, subject);
        Some(id)
    }

    /// Flip completion. Returns the new state, or `None` for an unknown id.
    pub fn toggle_completed(&mut self, id: TaskId) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        debug!("Task {} completed={}", id, task.completed);
        Some(task.completed)
    }

    /// Remove a task. Returns whether anything was removed.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            info!("Deleted task {}", id);
        }
        removed
    }

    /// Select a subject; selecting the active one again clears the filter
    pub fn set_subject_filter(&mut self, subject: Subject) -> Option<Subject> {
        self.active_filter = if self.active_filter == Some(subject) {
            None
        } else {
            Some(subject)
        };

        info!("Subject filter set to {:?}", self.active_filter);
        self.preferences.set_subject_filter(self.active_filter);
        self.active_filter
    }

    pub fn active_filter(&self) -> Option<Subject> {
        self.active_filter
    }

    /// All tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks matching the active filter, derived on every call
    pub fn visible_tasks(&self) -> Vec<&Task> {
        match self.active_filter {
            None => self.tasks.iter().collect(),
            Some(subject) => self
                .tasks
                .iter()
                .filter(|task| task.subject == TaskSubject::Assigned(subject))
                .collect(),
        }
    }

    /// List heading, e.g. `Tasks (Physics)` or `Tasks (All)`
    pub fn heading(&self) -> String {
        match self.active_filter {
            Some(subject) => format!("Tasks ({})", subject),
            None => "Tasks (All)".to_string(),
        }
    }
}
