use axum::{
    extract::{Multipart, State},
    Json,
};
use gemini::models::generate_content::Part;
use tracing::info;

pub mod request;
pub mod response;

use crate::media;
use crate::response::{ApiResponse, IntoApiResponse};
use crate::staging::StagedFile;
use crate::{ApiError, ApiState};

use self::request::GenerateTextRequest;
use self::response::GenerateResponse;

static DEFAULT_IMAGE_PROMPT: &str = "Describe this image:";
static DEFAULT_DOCUMENT_PROMPT: &str = "Analyze this document:";
static DEFAULT_AUDIO_PROMPT: &str = "Transcribe or analyze the following audio:";

/// Generate text from a prompt
#[utoipa::path(
    post,
    path = "/generate-text",
    request_body = GenerateTextRequest,
    responses(
        (status = 200, description = "Generated text", body = GenerateResponse),
        (status = 400, description = "Prompt is missing"),
        (status = 502, description = "Remote model failed")
    )
)]
pub async fn generate_text(
    State(state): State<ApiState>,
    Json(body): Json<GenerateTextRequest>,
) -> ApiResponse<Json<GenerateResponse>> {
    let Some(prompt) = body.prompt.filter(|p| !p.is_empty()) else {
        return Err(ApiError::ClientError(
            "field \"prompt\" is required".to_string(),
        ));
    };

    let output = state
        .model
        .generate(vec![Part::text(prompt)])
        .await
        .upstream_error()?;

    info!(endpoint = "generate-text", "request completed");

    Ok(Json(GenerateResponse { output }))
}

/// Generate a description of an uploaded image
#[utoipa::path(
    post,
    path = "/generate-from-image",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "Image file under field \"image\" plus an optional \"prompt\" field"
    ),
    responses(
        (status = 200, description = "Generated text", body = GenerateResponse),
        (status = 400, description = "File is missing or not an image"),
        (status = 502, description = "Remote model failed")
    )
)]
pub async fn generate_from_image(
    State(state): State<ApiState>,
    multipart: Multipart,
) -> ApiResponse<Json<GenerateResponse>> {
    generate_from_upload(&state, multipart, "image", DEFAULT_IMAGE_PROMPT)
        .await
}

/// Generate an analysis of an uploaded document
#[utoipa::path(
    post,
    path = "/generate-from-document",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "Document file under field \"document\" plus an optional \"prompt\" field"
    ),
    responses(
        (status = 200, description = "Generated text", body = GenerateResponse),
        (status = 400, description = "File is missing"),
        (status = 502, description = "Remote model failed")
    )
)]
pub async fn generate_from_document(
    State(state): State<ApiState>,
    multipart: Multipart,
) -> ApiResponse<Json<GenerateResponse>> {
    generate_from_upload(&state, multipart, "document", DEFAULT_DOCUMENT_PROMPT)
        .await
}

/// Generate a transcription or analysis of an uploaded audio file
#[utoipa::path(
    post,
    path = "/generate-from-audio",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "Audio file under field \"audio\" plus an optional \"prompt\" field"
    ),
    responses(
        (status = 200, description = "Generated text", body = GenerateResponse),
        (status = 400, description = "File is missing"),
        (status = 502, description = "Remote model failed")
    )
)]
pub async fn generate_from_audio(
    State(state): State<ApiState>,
    multipart: Multipart,
) -> ApiResponse<Json<GenerateResponse>> {
    generate_from_upload(&state, multipart, "audio", DEFAULT_AUDIO_PROMPT)
        .await
}

/// Shared shape of the three media endpoints: stage the upload, dispatch
/// to the model, and release the staged file on every exit path.
async fn generate_from_upload(
    state: &ApiState,
    multipart: Multipart,
    field_name: &str,
    default_prompt: &str,
) -> ApiResponse<Json<GenerateResponse>> {
    let form = state.staging.receive(multipart, field_name).await?;
    let prompt = resolve_prompt(form.prompt, default_prompt);

    let outcome = dispatch(state, &form.file, prompt, field_name).await;

    state.staging.release(&form.file).await;
    info!(endpoint = field_name, "request completed");

    let output = outcome?;
    Ok(Json(GenerateResponse { output }))
}

async fn dispatch(
    state: &ApiState,
    file: &StagedFile,
    prompt: String,
    field_name: &str,
) -> ApiResponse<String> {
    // Only the image variant constrains the declared media type.
    let part = if field_name == "image" {
        media::image_part(file).await?
    } else {
        media::inline_part(file).await?
    };

    state
        .model
        .generate(vec![Part::text(prompt), part])
        .await
        .upstream_error()
}

/// Uses the caller's prompt when it carries any text, otherwise the
/// variant's default.
fn resolve_prompt(provided: Option<String>, default: &str) -> String {
    provided
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| default.to_string())
}
