// SPDX-License-Identifier: MIT
//! Task REST routes. Handlers stay thin: parse the identifier and body,
//! call the service, map [`TaskError`] onto a status code.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::tasks::{Task, TaskError};
use crate::AppContext;

type ErrorReply = (StatusCode, Json<Value>);

/// Body accepted by POST /task and PATCH /task/{id}.
///
/// Fields default to "" so an omitted field is reported as a validation
/// error by the service rather than a decode error here.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
}

fn reply_error(err: TaskError) -> ErrorReply {
    let status = match err {
        TaskError::MissingField | TaskError::AlreadyCompleted => StatusCode::BAD_REQUEST,
        TaskError::NotFound => StatusCode::NOT_FOUND,
        TaskError::Storage(ref e) => {
            error!(err = ?e, "task storage fault");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": err.to_string() })))
}

fn bad_request(msg: &str) -> ErrorReply {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": msg })))
}

fn task_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ErrorReply> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(_) => Err(bad_request("invalid task id")),
    }
}

fn task_fields(body: Result<Json<TaskFields>, JsonRejection>) -> Result<TaskFields, ErrorReply> {
    match body {
        Ok(Json(fields)) => Ok(fields),
        Err(_) => Err(bad_request("invalid request body")),
    }
}

pub async fn list_tasks(State(ctx): State<Arc<AppContext>>) -> Result<Json<Vec<Task>>, ErrorReply> {
    ctx.tasks.list_all().await.map(Json).map_err(reply_error)
}

pub async fn pending_tasks(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Vec<Task>>, ErrorReply> {
    ctx.tasks.list_pending().await.map(Json).map_err(reply_error)
}

pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    body: Result<Json<TaskFields>, JsonRejection>,
) -> Result<Json<Task>, ErrorReply> {
    let fields = task_fields(body)?;
    ctx.tasks
        .create(&fields.title, &fields.description)
        .await
        .map(Json)
        .map_err(reply_error)
}

pub async fn get_task(
    State(ctx): State<Arc<AppContext>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Task>, ErrorReply> {
    let id = task_id(id)?;
    ctx.tasks.get(id).await.map(Json).map_err(reply_error)
}

pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ErrorReply> {
    let id = task_id(id)?;
    ctx.tasks.delete(id).await.map_err(reply_error)?;
    Ok(Json(json!({ "data": "task deleted" })))
}

pub async fn edit_task(
    State(ctx): State<Arc<AppContext>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<TaskFields>, JsonRejection>,
) -> Result<Json<Task>, ErrorReply> {
    let id = task_id(id)?;
    let fields = task_fields(body)?;
    ctx.tasks
        .edit(id, &fields.title, &fields.description)
        .await
        .map(Json)
        .map_err(reply_error)
}

pub async fn complete_task(
    State(ctx): State<Arc<AppContext>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Task>, ErrorReply> {
    let id = task_id(id)?;
    ctx.tasks.complete(id).await.map(Json).map_err(reply_error)
}
