/// Task endpoints
///
/// All routes here sit behind the request authenticator; handlers
/// receive the authenticated [`Principal`] from request extensions and
/// apply the ownership contract on every task-scoped operation: load by
/// id, 404 when absent, 403 when the owner does not match. Listing
/// filters by owner inside the query instead.
///
/// # Endpoints
///
/// - `POST /tasks` - Create a task (409 on duplicate title per owner)
/// - `GET /tasks?status=` - List own tasks, due date ascending
/// - `GET /tasks/:id` - Fetch one task
/// - `PUT /tasks/:id` - Partially update a task
/// - `DELETE /tasks/:id` - Delete a task
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use taskdeck_shared::models::{
    task::{CreateTask, Task, TaskStatus, UpdateTask},
    user::Principal,
};
use serde::Deserialize;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title, unique among the caller's tasks
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Initial lifecycle status
    pub status: TaskStatus,

    /// Due date (ISO 8601)
    pub due_date: DateTime<Utc>,
}

/// Partial update request; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub due_date: Option<DateTime<Utc>>,
}

/// Query parameters for task listing
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    /// Optional status filter
    pub status: Option<TaskStatus>,
}

/// Create a task
///
/// # Errors
///
/// - `409 Conflict`: the caller already has a task with this title
/// - `422 Unprocessable Entity`: validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let existing = Task::find_by_owner_and_title(&state.db, principal.id, &req.title).await?;
    if existing.is_some() {
        return Err(ApiError::Conflict(format!(
            "Task with title \"{}\" already exists",
            req.title
        )));
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            due_date: req.due_date,
            user_id: principal.id,
        },
    )
    .await?;

    tracing::debug!(task_id = task.id, user_id = principal.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// List the caller's tasks, optionally filtered by status, ordered by
/// due date ascending.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_for_owner(&state.db, principal.id, query.status).await?;

    Ok(Json(tasks))
}

/// Fetch one task by id
///
/// # Errors
///
/// - `404 Not Found`: no task with this id
/// - `403 Forbidden`: the task belongs to another user
pub async fn get_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = find_owned_task(&state.db, id, &principal, "view").await?;

    Ok(Json(task))
}

/// Partially update a task
///
/// # Errors
///
/// - `404 Not Found`: no task with this id
/// - `403 Forbidden`: the task belongs to another user
/// - `409 Conflict`: renaming to a title the caller already uses
/// - `422 Unprocessable Entity`: validation failed
pub async fn update_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(ApiError::from_validation)?;

    let task = find_owned_task(&state.db, id, &principal, "update").await?;

    let update = UpdateTask {
        title: req.title,
        description: req.description,
        status: req.status,
        due_date: req.due_date,
    };

    if update.is_empty() {
        return Ok(Json(task));
    }

    let updated = Task::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task with ID {} not found", id)))?;

    Ok(Json(updated))
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: no task with this id
/// - `403 Forbidden`: the task belongs to another user
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    find_owned_task(&state.db, id, &principal, "delete").await?;

    Task::delete(&state.db, id).await?;

    tracing::debug!(task_id = id, user_id = principal.id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// The ownership contract shared by every task-scoped operation: load by
/// id, 404 when absent, 403 when owned by someone else.
///
/// Known asymmetry: a caller can distinguish "no such task" (404) from
/// "someone else's task" (403) by status code.
async fn find_owned_task(
    pool: &PgPool,
    id: i64,
    principal: &Principal,
    verb: &str,
) -> Result<Task, ApiError> {
    let task = Task::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task with ID {} not found", id)))?;

    if task.user_id != principal.id {
        return Err(ApiError::Forbidden(format!(
            "You can only {} your own tasks",
            verb
        )));
    }

    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_request_deserializes_camel_case() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{
                "title": "T",
                "description": "d",
                "status": "in_progress",
                "dueDate": "2026-09-01T00:00:00Z"
            }"#,
        )
        .expect("Should deserialize");

        assert_eq!(req.title, "T");
        assert_eq!(req.status, TaskStatus::InProgress);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_task_request_rejects_empty_title() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{
                "title": "",
                "description": "d",
                "status": "pending",
                "dueDate": "2026-09-01T00:00:00Z"
            }"#,
        )
        .expect("Should deserialize");

        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("title"));
    }

    #[test]
    fn test_update_task_request_all_fields_optional() {
        let req: UpdateTaskRequest = serde_json::from_str("{}").expect("Should deserialize");
        assert!(req.title.is_none());
        assert!(req.status.is_none());
        assert!(req.validate().is_ok());

        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"status": "completed"}"#).expect("Should deserialize");
        assert_eq!(req.status, Some(TaskStatus::Completed));
    }

    #[test]
    fn test_list_query_parses_status() {
        let query: TaskListQuery =
            serde_urlencoded::from_str("status=completed").expect("Should parse");
        assert_eq!(query.status, Some(TaskStatus::Completed));

        let query: TaskListQuery = serde_urlencoded::from_str("").expect("Should parse");
        assert!(query.status.is_none());
    }
}
