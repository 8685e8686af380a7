use super::types::*;
use crate::{
    Error, Result,
    chat::{Assistant, ConversationMessage},
    flow::FlowStatus,
    scan::{ScanService, UploadedImage, WRONG_FILE_TYPE},
    tabular::{ResultDisplay, TabularField, TabularInput, TabularService},
};
use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use std::{future::Future, sync::Arc};
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub scan: Arc<ScanService>,
    pub tabular: Arc<TabularService>,
    pub assistant: Arc<Assistant>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

pub fn error_response(err: Error) -> ApiError {
    let status = match &err {
        Error::Validation(msg) if msg == WRONG_FILE_TYPE => StatusCode::BAD_REQUEST,
        Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Busy { .. } => StatusCode::CONFLICT,
        Error::ServerStatus { .. }
        | Error::NoResponse(_)
        | Error::RequestSetup(_)
        | Error::Upstream(_)
        | Error::Llm(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Request failed with {}: {:?}", status, err);
    } else {
        warn!("Request rejected with {}: {}", status, err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Runs upstream work on its own task so a disconnecting client abandons the
/// request without cancelling it.
async fn detached<T, F>(work: F) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| Error::internal(format!("Request task failed: {e}")))?
}

pub async fn status(State(state): State<AppState>) -> ApiResult<Vec<FlowStatus>> {
    let statuses = [
        state.scan.tracker(),
        state.tabular.tracker(),
        state.assistant.tracker(),
    ]
    .into_iter()
    .map(|tracker| tracker.status())
    .collect::<Result<Vec<_>>>()
    .map_err(error_response)?;

    Ok(Json(statuses))
}

pub async fn analyze_scan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<PredictionView> {
    let image = read_upload(&mut multipart).await.map_err(error_response)?;
    info!(
        "Received scan upload {} ({} bytes)",
        image.file_name,
        image.size_bytes()
    );

    let scan = Arc::clone(&state.scan);
    let record = detached(async move { scan.analyze(image).await })
        .await
        .map_err(error_response)?;

    Ok(Json(PredictionView::from(&record)))
}

async fn read_upload(multipart: &mut Multipart) -> Result<UploadedImage> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("Invalid upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::validation(format!("Invalid upload: {e}")))?;

        return Ok(UploadedImage::new(file_name, content_type, data.to_vec()));
    }

    Err(Error::validation("No file uploaded."))
}

pub async fn scan_history(State(state): State<AppState>) -> ApiResult<Vec<PredictionView>> {
    let records = state.scan.history().map_err(error_response)?;
    Ok(Json(records.iter().map(PredictionView::from).collect()))
}

pub async fn scan_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> std::result::Result<Response, ApiError> {
    match state.scan.image(id).map_err(error_response)? {
        Some(image) => Ok((
            [(header::CONTENT_TYPE, image.content_type.clone())],
            image.data.clone(),
        )
            .into_response()),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("No scan with id {id}"),
            }),
        )),
    }
}

pub async fn tabular_fields() -> Json<Vec<FieldInfo>> {
    Json(TabularField::ALL.into_iter().map(FieldInfo::from).collect())
}

pub async fn tabular_form(State(state): State<AppState>) -> ApiResult<TabularInput> {
    state.tabular.form().map(Json).map_err(error_response)
}

pub async fn update_tabular_form(
    State(state): State<AppState>,
    Json(update): Json<FieldUpdate>,
) -> ApiResult<TabularInput> {
    let field: TabularField = update.field.parse().map_err(error_response)?;
    state
        .tabular
        .update_field(field, &update.raw_value())
        .map(Json)
        .map_err(error_response)
}

/// An empty body submits the stored form.
pub async fn tabular_predict(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<ResultDisplay> {
    let input = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let input: TabularInput = serde_json::from_slice(&body)
            .map_err(|e| error_response(Error::validation(format!("Invalid tabular input: {e}"))))?;
        Some(input)
    };

    let tabular = Arc::clone(&state.tabular);
    detached(async move { tabular.predict(input).await })
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn conversation(State(state): State<AppState>) -> ApiResult<Vec<ConversationMessage>> {
    state.assistant.messages().map(Json).map_err(error_response)
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<ChatReply> {
    let assistant = Arc::clone(&state.assistant);
    let message = detached(async move { assistant.ask(&request.message).await })
        .await
        .map_err(error_response)?;

    let markdown = message.rendered();
    Ok(Json(ChatReply { message, markdown }))
}
