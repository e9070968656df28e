use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::{
    client::{ClientError, TaskApi},
    form::{Submission, TaskForm},
    status::{TaskStatus, STATUSES},
    task::Task,
};

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: Instant,
}

/// Result of pressing submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed, nothing was sent.
    Blocked,
    Created(u64),
    Updated(u64),
    Failed,
}

/// Local view of the server's tasks plus the form that edits them.
///
/// Local state only changes after a request succeeds.
#[derive(Debug, Default)]
pub struct TaskBoard {
    pub tasks: Vec<Task>,
    pub form: TaskForm,
    pub selected_status: usize, // index into STATUSES
    pub selected_task: usize,   // index within the selected column
    notice: Option<Notice>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the local tasks with the server's, recomputing every status.
    pub fn refresh(&mut self, api: &impl TaskApi, today: NaiveDate) -> bool {
        match api.list_tasks() {
            Ok(tasks) => {
                self.tasks = tasks
                    .into_iter()
                    .map(|task| for_display(task, today))
                    .collect();
                self.clamp_selection();
                true
            }
            Err(error) => {
                self.report("fetching tasks", &error);
                false
            }
        }
    }

    pub fn submit(&mut self, api: &impl TaskApi, today: NaiveDate) -> SubmitOutcome {
        let Some(submission) = self.form.submission(today) else {
            return SubmitOutcome::Blocked;
        };
        match submission {
            Submission::Create(fields) => match api.create_task(&fields) {
                Ok(task) => {
                    let id = task.id;
                    self.tasks.push(for_display(task, today));
                    self.inform("Task created");
                    SubmitOutcome::Created(id)
                }
                Err(error) => {
                    self.report("creating task", &error);
                    SubmitOutcome::Failed
                }
            },
            Submission::Update { id, fields } => match api.update_task(id, &fields) {
                Ok(task) => {
                    let task = for_display(task, today);
                    for local in self.tasks.iter_mut().filter(|t| t.id == id) {
                        *local = task.clone();
                    }
                    self.form.reset();
                    self.clamp_selection();
                    self.inform("Task updated");
                    SubmitOutcome::Updated(id)
                }
                Err(error) => {
                    self.report("updating task", &error);
                    SubmitOutcome::Failed
                }
            },
        }
    }

    pub fn delete(&mut self, api: &impl TaskApi, id: u64) -> bool {
        match api.delete_task(id) {
            Ok(()) => {
                self.tasks.retain(|t| t.id != id);
                self.clamp_selection();
                self.inform("Task deleted");
                true
            }
            Err(error) => {
                self.report("deleting task", &error);
                false
            }
        }
    }

    pub fn delete_selected(&mut self, api: &impl TaskApi) -> bool {
        match self.selected().map(|t| t.id) {
            Some(id) => self.delete(api, id),
            None => false,
        }
    }

    /// Copies the selected task into the form.
    pub fn edit_selected(&mut self) -> bool {
        match self.selected().cloned() {
            Some(task) => {
                self.form.edit(&task);
                true
            }
            None => false,
        }
    }

    pub fn get_tasks_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| local_status(t) == status)
            .collect()
    }

    pub fn selected_column(&self) -> TaskStatus {
        STATUSES[self.selected_status]
    }

    pub fn selected(&self) -> Option<&Task> {
        self.get_tasks_by_status(self.selected_column())
            .get(self.selected_task)
            .copied()
    }

    pub fn move_column(&mut self, direction: isize) {
        self.selected_status = (self.selected_status as isize + direction)
            .clamp(0, STATUSES.len() as isize - 1) as usize;
        self.clamp_selection();
    }

    pub fn move_task(&mut self, direction: isize) {
        let count = self.get_tasks_by_status(self.selected_column()).len();
        if count == 0 {
            self.selected_task = 0;
            return;
        }
        self.selected_task =
            (self.selected_task as isize + direction).clamp(0, count as isize - 1) as usize;
    }

    fn clamp_selection(&mut self) {
        let count = self.get_tasks_by_status(self.selected_column()).len();
        self.selected_task = self.selected_task.min(count.saturating_sub(1));
    }

    /// The current notice, unless it has expired by `now`.
    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| n.expires_at > now)
    }

    pub fn clear_expired_notice(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| n.expires_at <= now) {
            self.notice = None;
        }
    }

    fn inform(&mut self, message: &str) {
        tracing::info!("{message}");
        self.set_notice(NoticeKind::Info, message.to_string());
    }

    fn report(&mut self, action: &str, error: &ClientError) {
        tracing::error!(%error, "Error {action}");
        self.set_notice(NoticeKind::Error, format!("Error {action}: {error}"));
    }

    fn set_notice(&mut self, kind: NoticeKind, message: String) {
        self.notice = Some(Notice {
            kind,
            message,
            expires_at: Instant::now() + NOTICE_TTL,
        });
    }
}

fn for_display(mut task: Task, today: NaiveDate) -> Task {
    task.status = Some(task.display_status(today).as_str().into());
    task
}

fn local_status(task: &Task) -> TaskStatus {
    task.status_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or(TaskStatus::Pending)
}
