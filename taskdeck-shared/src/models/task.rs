/// Task model and database operations
///
/// Tasks are owned, single-user rows: every task has exactly one owning
/// user, set at creation and immutable afterwards. Titles are unique per
/// owner (two different users may both have a task called "T"). The
/// ownership *check* lives with the callers in the API layer; this module
/// guarantees that list queries filter by owner in SQL, so no query ever
/// loads another user's rows only to discard them in memory.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     status task_status NOT NULL DEFAULT 'pending',
///     due_date TIMESTAMPTZ NOT NULL,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (user_id, title)
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Task model
///
/// Serialized camelCase on the wire (`dueDate`, `userId`), matching the
/// API's JSON contract.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task id
    pub id: i64,

    /// Title, unique per owning user
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Current lifecycle status
    pub status: TaskStatus,

    /// When the task is due
    pub due_date: DateTime<Utc>,

    /// Owning user id, immutable after creation
    pub user_id: i64,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
    pub user_id: i64,
}

/// Input for a partial task update
///
/// Only `Some` fields are changed; the owner can never be changed.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateTask {
    /// True when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
    }
}

impl Task {
    /// Inserts a new task for its owner.
    ///
    /// # Errors
    ///
    /// Surfaces the `tasks_user_id_title_key` unique violation when the
    /// owner already has a task with this title.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, due_date, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, status, due_date, user_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.due_date)
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by id alone, without an owner filter.
    ///
    /// The caller compares `task.user_id` against the principal and maps
    /// a mismatch to a forbidden response.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, due_date, user_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds an owner's task by title, for the create-time duplicate check.
    pub async fn find_by_owner_and_title(
        pool: &PgPool,
        user_id: i64,
        title: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, due_date, user_id, created_at, updated_at
            FROM tasks
            WHERE user_id = $1 AND title = $2
            "#,
        )
        .bind(user_id)
        .bind(title)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists an owner's tasks, optionally filtered by status, ordered by
    /// due date ascending.
    ///
    /// The owner filter is part of the query; rows belonging to other
    /// users are never fetched.
    pub async fn list_for_owner(
        pool: &PgPool,
        user_id: i64,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, due_date, user_id, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
              AND ($2::task_status IS NULL OR status = $2)
            ORDER BY due_date ASC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Applies a partial update and bumps `updated_at`.
    ///
    /// Returns the updated row, or `None` if the task no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4::task_status, status),
                due_date = COALESCE($5, due_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, due_date, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.due_date)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task by id.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
