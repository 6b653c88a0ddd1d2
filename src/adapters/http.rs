//! axum routes for the upload page.

use crate::adapters::views;
use crate::core::handler::{render_error, UploadPredictHandler};
use crate::domain::model::{Rendered, UploadForm, UploadRequest, UploadedFile};
use crate::domain::ports::{ConfigProvider, Predictor};
use crate::utils::error::{RfmError, Result};
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

pub struct AppState {
    pub handler: UploadPredictHandler,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(predictor: Arc<dyn Predictor>, max_upload_bytes: usize) -> Self {
        Self {
            handler: UploadPredictHandler::new(predictor),
            max_upload_bytes,
        }
    }
}

pub fn build_app(app_state: Arc<AppState>) -> Router {
    let max_upload_bytes = app_state.max_upload_bytes;

    Router::new()
        .route("/upload", get(upload_form).post(upload_file))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn upload_form(State(app_state): State<Arc<AppState>>) -> Response {
    respond(app_state.handler.handle(UploadRequest::Get))
}

async fn upload_file(
    State(app_state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let form = match multipart {
        Ok(multipart) => match read_upload_form(multipart, app_state.max_upload_bytes).await {
            Ok(form) => form,
            Err(e) => return respond(render_error(e)),
        },
        Err(rejection) => {
            // Treated like a form without the file field.
            debug!(reason = %rejection.body_text(), "POST /upload without multipart body");
            UploadForm::default()
        }
    };

    let handler = app_state.handler.clone();
    match tokio::task::spawn_blocking(move || handler.handle(UploadRequest::Post(form))).await {
        Ok(rendered) => respond(rendered),
        Err(e) => {
            error!(error = %e, "Upload task panicked");
            respond(render_error(RfmError::ModelError {
                message: e.to_string(),
            }))
        }
    }
}

async fn health(State(app_state): State<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "model": app_state.handler.predictor().describe(),
        })),
    )
        .into_response()
}

/// Collects the first `file` field that carries a filename.
async fn read_upload_form(mut multipart: Multipart, limit: usize) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if form.file.is_some() || field.name() != Some("file") {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let content = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        debug!(filename = %filename, bytes = content.len(), "Received upload");
        form.file = Some(UploadedFile {
            filename: Some(filename),
            content: content.to_vec(),
        });
    }

    Ok(form)
}

fn multipart_error(e: MultipartError, limit: usize) -> RfmError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RfmError::PayloadTooLarge { limit }
    } else {
        RfmError::MalformedUpload {
            message: e.body_text(),
        }
    }
}

fn respond(rendered: Rendered) -> Response {
    let status =
        StatusCode::from_u16(rendered.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Html(views::render(&rendered.view))).into_response()
}

pub async fn serve<C: ConfigProvider>(config: &C, predictor: Arc<dyn Predictor>) -> Result<()> {
    info!(
        model = predictor.describe(),
        max_upload_bytes = config.max_upload_bytes(),
        "Building upload service"
    );

    let app_state = Arc::new(AppState::new(predictor, config.max_upload_bytes()));
    let app = build_app(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("🚀 Listening on http://{}/upload", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
