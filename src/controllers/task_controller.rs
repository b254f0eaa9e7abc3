use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::task::{EditTask, NewTask, TaskDto};
use crate::service::task_service::TaskService;

pub struct TaskController;

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

impl TaskController {
    pub async fn list(
        tasks: web::Data<TaskService>,
        path: web::Path<Uuid>,
    ) -> Result<HttpResponse, ApiError> {
        let list: Vec<TaskDto> = tasks
            .tasks_for_user(*path)
            .await?
            .into_iter()
            .map(TaskDto::from)
            .collect();

        Ok(HttpResponse::Ok().json(list))
    }

    pub async fn create(
        tasks: web::Data<TaskService>,
        request: web::Json<NewTask>,
    ) -> Result<HttpResponse, ApiError> {
        let task = tasks.create(request.into_inner()).await?;
        Ok(HttpResponse::Ok().json(task))
    }

    pub async fn update_status(
        tasks: web::Data<TaskService>,
        path: web::Path<Uuid>,
        request: web::Json<StatusUpdate>,
    ) -> Result<HttpResponse, ApiError> {
        let status = request
            .into_inner()
            .status
            .ok_or_else(|| ApiError::BadRequest("Missing 'status' field".into()))?;

        let mut task = tasks
            .find_by_id(*path)
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".into()))?;
        task.status = Some(status);

        let saved = tasks.update(&task).await?;
        Ok(HttpResponse::Ok().json(saved))
    }

    pub async fn edit(
        tasks: web::Data<TaskService>,
        path: web::Path<Uuid>,
        request: web::Json<EditTask>,
    ) -> Result<HttpResponse, ApiError> {
        let mut task = tasks
            .find_by_id(*path)
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".into()))?;
        task.apply_edit(request.into_inner());

        let saved = tasks.update(&task).await?;
        Ok(HttpResponse::Ok().json(saved))
    }

    pub async fn delete(
        tasks: web::Data<TaskService>,
        path: web::Path<Uuid>,
    ) -> Result<HttpResponse, ApiError> {
        if !tasks.delete(*path).await? {
            return Err(ApiError::NotFound("Task not found".into()));
        }

        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Task deleted successfully"
        })))
    }
}
