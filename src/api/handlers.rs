//! Request handlers for the `/tasks` resource.
//!
//! Handlers only look tasks up and copy fields; every task leaving the
//! server gets its status recomputed from the due date.

use axum::{
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde_json::Value;

use super::{error::ApiErrorResponse, AppState};
use crate::task::{Task, TaskFields};

/// Create/update body, read leniently.
///
/// A body that is not labelled JSON, or is empty, carries no fields, so the
/// request still goes through with every field absent. A JSON object gives
/// its four known keys, holding any JSON value. An array carries no fields.
/// Malformed JSON, or a bare scalar, is a 400.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBody(pub TaskFields);

impl<S> FromRequest<S> for TaskBody
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = is_json(req.headers());
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            ApiErrorResponse::new(rejection.status(), "INVALID_BODY", rejection.body_text())
        })?;
        if !json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => {
                Ok(Self(TaskFields::from_value(value)))
            }
            Ok(_) => Err(ApiErrorResponse::invalid_json("body must be a JSON object")),
            Err(error) => Err(ApiErrorResponse::invalid_json(error.to_string())),
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiErrorResponse> {
    let tasks = state
        .store
        .list()?
        .into_iter()
        .map(|task| state.present(task))
        .collect();
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Task>, ApiErrorResponse> {
    let task = match parse_task_id(&raw_id) {
        Some(id) => state.store.get(id)?,
        None => None,
    };
    task.map(|task| Json(state.present(task)))
        .ok_or_else(ApiErrorResponse::task_not_found)
}

pub async fn create_task(
    State(state): State<AppState>,
    TaskBody(fields): TaskBody,
) -> Result<(StatusCode, Json<Task>), ApiErrorResponse> {
    let task = state.store.create(fields)?;
    tracing::debug!(id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(state.present(task))))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    TaskBody(fields): TaskBody,
) -> Result<Json<Task>, ApiErrorResponse> {
    let task = match parse_task_id(&raw_id) {
        Some(id) => state.store.update(id, fields)?,
        None => None,
    };
    let task = task.ok_or_else(ApiErrorResponse::task_not_found)?;
    tracing::debug!(id = task.id, "task updated");
    Ok(Json(state.present(task)))
}

/// Always 204, whether or not anything was removed.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiErrorResponse> {
    if let Some(id) = parse_task_id(&raw_id) {
        let removed = state.store.delete(id)?;
        tracing::debug!(id, removed, "task delete");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Reads the leading integer of a path segment: leading whitespace is
/// skipped, a sign is allowed, and parsing stops at the first non-digit.
///
/// `"12abc"` is 12. Segments without leading digits, negative numbers and
/// values past `u64::MAX` can never name a task and yield `None`. There is
/// no radix detection: `"0x10"` reads as 0, not as hex 16.
pub fn parse_task_id(raw: &str) -> Option<u64> {
    let rest = raw.trim_start();
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    if digits.is_empty() {
        return None;
    }
    let value: u64 = digits.parse().ok()?;
    if negative && value != 0 {
        return None;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(1))]
    #[case("42", Some(42))]
    #[case("007", Some(7))]
    #[case("12abc", Some(12))]
    #[case(" 3", Some(3))]
    #[case("+5", Some(5))]
    #[case("-0", Some(0))]
    #[case("-4", None)]
    #[case("abc", None)]
    #[case("", None)]
    #[case("1.5", Some(1))]
    #[case("0x10", Some(0))]
    #[case("99999999999999999999999", None)]
    fn parses_leading_integer(#[case] raw: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_task_id(raw), expected);
    }

    #[rstest]
    #[case(Some("application/json"), true)]
    #[case(Some("Application/JSON; charset=utf-8"), true)]
    #[case(Some("application/merge-patch+json"), true)]
    #[case(Some("text/plain"), false)]
    #[case(Some("application/x-www-form-urlencoded"), false)]
    #[case(None, false)]
    fn recognises_json_content_types(#[case] content_type: Option<&str>, #[case] expected: bool) {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(header::CONTENT_TYPE, content_type.parse().unwrap());
        }
        assert_eq!(is_json(&headers), expected);
    }
}
