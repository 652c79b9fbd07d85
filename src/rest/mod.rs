// SPDX-License-Identifier: MIT
//! Public REST API server.
//!
//! Endpoints:
//!   GET    /task
//!   POST   /task
//!   GET    /task/pending
//!   GET    /task/{id}
//!   DELETE /task/{id}
//!   PATCH  /task/{id}
//!   PUT    /task/{id}/complete
//!   GET    /health

pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::AppContext;

pub async fn serve(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health
        .route("/health", get(routes::health::health))
        // Tasks
        .route(
            "/task",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/task/pending", get(routes::tasks::pending_tasks))
        .route(
            "/task/{id}",
            get(routes::tasks::get_task)
                .delete(routes::tasks::delete_task)
                .patch(routes::tasks::edit_task),
        )
        .route("/task/{id}/complete", put(routes::tasks::complete_task))
        .with_state(ctx)
}
