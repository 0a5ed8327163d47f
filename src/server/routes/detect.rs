//! Detection endpoints: the HTML form target and its JSON twin

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, warn};

use crate::inference::{Diagnosis, Outcome, MISSING_IMAGE_WARNING};
use crate::server::render;
use crate::server::state::SharedState;
use crate::utils::error::{CropDiseaseError, Result};

/// Name of the multipart field carrying the image
pub const UPLOAD_FIELD: &str = "image";

/// JSON body returned by `POST /api/detect`
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DetectResponse {
    Warning {
        message: String,
    },
    #[serde(rename = "ok")]
    Diagnosed {
        diagnosis: Diagnosis,
        analyzed_at: DateTime<Utc>,
    },
    Error {
        message: String,
    },
}

/// POST /detect - Run detection and render the page with the result
pub async fn detect_page(State(state): State<SharedState>, mut multipart: Multipart) -> Response {
    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) => {
            warn!("Rejected malformed upload: {}", e);
            let body = render::page(Some(&render::error(&format!("Upload failed: {}", e.body_text()))));
            return (e.status(), Html(body)).into_response();
        }
    };

    match detect(&state, upload).await {
        Ok((Outcome::MissingImage, _)) => {
            Html(render::page(Some(&render::warning(MISSING_IMAGE_WARNING)))).into_response()
        }
        Ok((Outcome::Diagnosed(diagnosis), upload)) => {
            let section = render::diagnosis(&diagnosis, upload.as_deref());
            Html(render::page(Some(&section))).into_response()
        }
        Err(e) => {
            let body = render::page(Some(&render::error(&e.to_string())));
            (status_for(&e), Html(body)).into_response()
        }
    }
}

/// POST /api/detect - Run detection and answer with JSON
pub async fn detect_json(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<DetectResponse>) {
    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) => {
            warn!("Rejected malformed upload: {}", e);
            return (
                e.status(),
                Json(DetectResponse::Error {
                    message: e.body_text(),
                }),
            );
        }
    };

    match detect(&state, upload).await {
        Ok((Outcome::MissingImage, _)) => (
            StatusCode::OK,
            Json(DetectResponse::Warning {
                message: MISSING_IMAGE_WARNING.to_string(),
            }),
        ),
        Ok((Outcome::Diagnosed(diagnosis), _)) => (
            StatusCode::OK,
            Json(DetectResponse::Diagnosed {
                diagnosis,
                analyzed_at: Utc::now(),
            }),
        ),
        Err(e) => (
            status_for(&e),
            Json(DetectResponse::Error {
                message: e.to_string(),
            }),
        ),
    }
}

/// HTTP status for a failed detection
pub fn status_for(err: &CropDiseaseError) -> StatusCode {
    if err.is_user_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Pull the image field out of the form; other fields are ignored
async fn read_upload(
    multipart: &mut Multipart,
) -> std::result::Result<Option<Vec<u8>>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field.bytes().await?;
            return Ok(Some(bytes.to_vec()));
        }
    }
    Ok(None)
}

/// Run the pipeline off the async runtime, handing the upload back for rendering
async fn detect(
    state: &SharedState,
    upload: Option<Vec<u8>>,
) -> Result<(Outcome, Option<Vec<u8>>)> {
    let worker = state.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let outcome = worker.pipeline.run(upload.as_deref());
        (outcome, upload)
    })
    .await;

    match joined {
        Ok((Ok(outcome), upload)) => Ok((outcome, upload)),
        Ok((Err(e), _)) => {
            if e.is_user_error() {
                warn!("Rejected upload: {}", e);
            } else {
                error!("Detection failed: {}", e);
            }
            Err(e)
        }
        Err(e) => {
            error!("Detection task panicked: {}", e);
            Err(CropDiseaseError::Inference(format!(
                "detection task failed: {}",
                e
            )))
        }
    }
}
