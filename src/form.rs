//! The single create/edit form.

use chrono::NaiveDate;

use crate::{
    status::TaskStatus,
    task::{field_text, parse_due_date, Task, TaskFields},
};

pub const TITLE_REQUIRED: &str = "Please enter a title.";
pub const DUE_DATE_REQUIRED: &str = "Please enter a due date.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Title,
    Description,
    DueDate,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::DueDate,
            Self::DueDate => Self::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Title => Self::DueDate,
            Self::Description => Self::Title,
            Self::DueDate => Self::Description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub id: Option<u64>,
    pub title: String,
    pub description: String,
    pub due_date: String,
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            title: field_text(&task.title),
            description: field_text(&task.description),
            due_date: field_text(&task.due_date),
        }
    }
}

/// What a valid form turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(TaskFields),
    Update { id: u64, fields: TaskFields },
}

#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub draft: TaskDraft,
    /// Set while the draft is a copy of an existing task.
    pub editing: bool,
    pub title_error: Option<&'static str>,
    pub date_error: Option<&'static str>,
    pub focus: Field,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a copy of `task` for editing.
    pub fn edit(&mut self, task: &Task) {
        *self = Self {
            draft: TaskDraft::from(task),
            editing: true,
            ..Self::default()
        };
    }

    /// Back to a blank create form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.draft.title = value.into();
        self.title_error = blank(&self.draft.title, TITLE_REQUIRED);
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.draft.description = value.into();
    }

    pub fn set_due_date(&mut self, value: impl Into<String>) {
        self.draft.due_date = value.into();
        self.date_error = blank(&self.draft.due_date, DUE_DATE_REQUIRED);
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.draft.title,
            Field::Description => &self.draft.description,
            Field::DueDate => &self.draft.due_date,
        }
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        match field {
            Field::Title => self.title_error,
            Field::Description => None,
            Field::DueDate => self.date_error,
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.set_title(value),
            Field::Description => self.set_description(value),
            Field::DueDate => self.set_due_date(value),
        }
    }

    pub fn push_char(&mut self, c: char) {
        let mut value = self.value(self.focus).to_string();
        value.push(c);
        self.set(self.focus, value);
    }

    pub fn pop_char(&mut self) {
        let mut value = self.value(self.focus).to_string();
        value.pop();
        self.set(self.focus, value);
    }

    /// Checks that title and due date are non-empty, setting the inline
    /// message of each one that is empty. Unlike the live check while
    /// typing, whitespace counts as content here.
    pub fn validate(&mut self) -> bool {
        self.title_error = empty(&self.draft.title, TITLE_REQUIRED);
        self.date_error = empty(&self.draft.due_date, DUE_DATE_REQUIRED);
        self.title_error.is_none() && self.date_error.is_none()
    }

    /// Validates and builds the request, deriving the status from the due
    /// date as of `today`. `None` means submission is blocked.
    pub fn submission(&mut self, today: NaiveDate) -> Option<Submission> {
        if !self.validate() {
            return None;
        }
        // an unparseable date never compares as past or today
        let status = parse_due_date(&self.draft.due_date)
            .map_or(TaskStatus::Pending, |due| TaskStatus::derive(due, today));
        let fields = TaskFields::text(
            &self.draft.title,
            &self.draft.description,
            status.as_str(),
            &self.draft.due_date,
        );
        Some(match (self.editing, self.draft.id) {
            (true, Some(id)) => Submission::Update { id, fields },
            _ => Submission::Create(fields),
        })
    }
}

fn blank(value: &str, message: &'static str) -> Option<&'static str> {
    value.trim().is_empty().then_some(message)
}

fn empty(value: &str, message: &'static str) -> Option<&'static str> {
    value.is_empty().then_some(message)
}
