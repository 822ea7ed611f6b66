use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use axum_helpers::{
    JsonBody,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse},
};
use serde_json::{Value, json};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::TaskResult;
use crate::models::{CreatedTask, IdQuery, ListTasksQuery, Task, TaskInput, TaskList};
use crate::repository::TaskRepository;
use crate::service::TaskService;

const TAG: &str = "tasks";

/// OpenAPI documentation for Tasks API
#[derive(OpenApi)]
#[openapi(
    paths(create_task, update_task, get_task, delete_task, done_task, list_tasks),
    components(
        schemas(Task, TaskInput, TaskList, CreatedTask),
        responses(BadRequestResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "Task list endpoints")
    )
)]
pub struct ApiDoc;

/// Create the task router with all HTTP endpoints
pub fn router<R: TaskRepository + 'static>(service: TaskService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/task",
            post(create_task)
                .put(update_task)
                .get(get_task)
                .delete(delete_task),
        )
        .route("/task/done", post(done_task))
        .route("/tasks", get(list_tasks))
        .with_state(shared_service)
}

/// Create a task
#[utoipa::path(
    post,
    path = "/task",
    tag = TAG,
    request_body = TaskInput,
    responses(
        (status = 200, description = "Task created", body = CreatedTask),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    JsonBody(input): JsonBody<TaskInput>,
) -> TaskResult<Json<CreatedTask>> {
    let id = service.create_task(input).await?;
    Ok(Json(CreatedTask { id }))
}

/// Overwrite date, title and description of a task
#[utoipa::path(
    put,
    path = "/task",
    tag = TAG,
    request_body = TaskInput,
    responses(
        (status = 200, description = "Task updated, body is `{}`"),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    JsonBody(input): JsonBody<TaskInput>,
) -> TaskResult<Json<Value>> {
    service.update_task(input).await?;
    Ok(Json(json!({})))
}

/// Get a task by ID
#[utoipa::path(
    get,
    path = "/task",
    tag = TAG,
    params(IdQuery),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Query(query): Query<IdQuery>,
) -> TaskResult<Json<Task>> {
    let task = service.get_task(&query.id).await?;
    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/task",
    tag = TAG,
    params(IdQuery),
    responses(
        (status = 200, description = "Task deleted, body is `{}`"),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Query(query): Query<IdQuery>,
) -> TaskResult<Json<Value>> {
    service.delete_task(&query.id).await?;
    Ok(Json(json!({})))
}

/// Mark a task as done
///
/// Re-writes the stored task unchanged; the status field is not modified.
#[utoipa::path(
    post,
    path = "/task/done",
    tag = TAG,
    params(IdQuery),
    responses(
        (status = 200, description = "Task marked, body is `{}`"),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn done_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Query(query): Query<IdQuery>,
) -> TaskResult<Json<Value>> {
    service.done_task(&query.id).await?;
    Ok(Json(json!({})))
}

/// List tasks ordered by date
#[utoipa::path(
    get,
    path = "/tasks",
    tag = TAG,
    params(ListTasksQuery),
    responses(
        (status = 200, description = "Page of tasks", body = TaskList),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_tasks<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Query(query): Query<ListTasksQuery>,
) -> TaskResult<Json<TaskList>> {
    let tasks = service.list_tasks(query).await?;
    Ok(Json(tasks))
}
