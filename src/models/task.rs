use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub user_id: Uuid,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub user_id: Uuid,
    pub due_date: Option<NaiveDate>,
}

/// Full replacement payload for PUT edits: every mutable field takes the
/// value from the request, including absent ones.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTask {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Shape returned by the list endpoint; drops the owner id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: Uuid,
    pub title: String,
    pub status: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn from_new(id: Uuid, new: NewTask, today: NaiveDate) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            status: new.status,
            user_id: new.user_id,
            due_date: Some(new.due_date.unwrap_or(today)),
        }
    }

    pub fn apply_edit(&mut self, edit: EditTask) {
        self.title = edit.title;
        self.description = edit.description;
        self.status = edit.status;
        self.due_date = edit.due_date;
    }
}

impl From<Task> for TaskDto {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            status: task.status,
            description: task.description,
            due_date: task.due_date,
        }
    }
}
