use chrono::Local;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::task::{NewTask, Task};

const TASK_COLUMNS: &str = "id, title, description, status, user_id, due_date";

#[derive(Clone)]
pub struct TaskService {
    pool: PgPool,
}

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn tasks_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, ApiError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn find_by_id(&self, task_id: Uuid) -> Result<Option<Task>, ApiError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn create(&self, new_task: NewTask) -> Result<Task, ApiError> {
        let task = Task::from_new(Uuid::new_v4(), new_task, Local::now().date_naive());

        let saved = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, description, status, user_id, due_date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(task.user_id)
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    pub async fn update(&self, task: &Task) -> Result<Task, ApiError> {
        let saved = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET title = $1, description = $2, status = $3, due_date = $4 \
             WHERE id = $5 \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(task.due_date)
        .bind(task.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    pub async fn exists_by_id(&self, task_id: Uuid) -> Result<bool, ApiError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tasks WHERE id = $1)")
            .bind(task_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Returns whether a row was actually removed.
    pub async fn delete(&self, task_id: Uuid) -> Result<bool, ApiError> {
        if !self.exists_by_id(task_id).await? {
            return Ok(false);
        }

        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await?;

        Ok(true)
    }
}
