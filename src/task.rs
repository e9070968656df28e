use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::status::TaskStatus;

/// A stored task as it travels over the wire.
///
/// Every field besides `id` is whatever JSON value the client sent, strings
/// or not. Absent fields stay absent and are omitted when serialised; an
/// explicit `null` is kept and echoed back.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>, // "pending", "in-progress", "completed"
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Value>,
}

/// Request body for create and update.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Value>,
}

// A key that is present is kept even when its value is `null`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl TaskFields {
    /// Fields as the form submits them: all four present, all strings.
    pub fn text(title: &str, description: &str, status: &str, due_date: &str) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            status: Some(status.into()),
            due_date: Some(due_date.into()),
        }
    }

    /// Picks the four known keys out of a JSON object. Anything that is not
    /// an object carries no fields.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };
        Self {
            title: map.remove("title"),
            description: map.remove("description"),
            status: map.remove("status"),
            due_date: map.remove("dueDate"),
        }
    }
}

impl Task {
    pub fn from_fields(id: u64, fields: TaskFields) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            status: fields.status,
            due_date: fields.due_date,
        }
    }

    /// Overwrites all four fields, including with absent values.
    pub fn overwrite(&mut self, fields: TaskFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.status = fields.status;
        self.due_date = fields.due_date;
    }

    pub fn title_str(&self) -> Option<&str> {
        as_str(&self.title)
    }

    pub fn status_str(&self) -> Option<&str> {
        as_str(&self.status)
    }

    pub fn due_date_str(&self) -> Option<&str> {
        as_str(&self.due_date)
    }

    /// Only a string due date can parse.
    pub fn due(&self) -> Option<NaiveDate> {
        self.due_date_str().and_then(parse_due_date)
    }

    /// Replaces the status with the one derived from the due date, when the
    /// due date parses. Otherwise the stored status is left as is.
    pub fn with_derived_status(mut self, today: NaiveDate) -> Self {
        if let Some(due) = self.due() {
            self.status = Some(TaskStatus::derive(due, today).as_str().into());
        }
        self
    }

    /// Status used for display: the derived one, falling back to pending for
    /// a missing or unparseable due date.
    pub fn display_status(&self, today: NaiveDate) -> TaskStatus {
        self.due()
            .map(|due| TaskStatus::derive(due, today))
            .unwrap_or(TaskStatus::Pending)
    }
}

fn as_str(value: &Option<Value>) -> Option<&str> {
    value.as_ref().and_then(Value::as_str)
}

/// Text shown for a field: strings verbatim, other JSON values in their JSON
/// form, nothing for an absent or `null` field.
pub fn field_text(value: &Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Parses a due date as `YYYY-MM-DD`, falling back to the date part of an
/// RFC 3339 timestamp.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|stamp| stamp.date_naive())
    })
}
