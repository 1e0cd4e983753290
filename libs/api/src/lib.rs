use std::{path::PathBuf, sync::Arc};

use axum::{routing::get, routing::post, Router};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::model::GenerativeModel;
use crate::staging::StagingArea;

pub mod generate;
pub mod healthz;
mod media;
pub mod model;
pub mod not_found;
mod response;
mod staging;
pub mod util;

#[derive(Debug)]
pub enum ApiError {
    ClientError(String),
    UpstreamError(String),
    ServerError(String),
}

#[derive(Clone)]
pub struct ApiState {
    model: Arc<dyn GenerativeModel>,
    staging: StagingArea,
}

pub async fn serve(
    model: Arc<dyn GenerativeModel>,
    staging_dir: PathBuf,
) -> anyhow::Result<Router> {
    #[derive(OpenApi)]
    #[openapi(
        paths(
            generate::generate_text,
            generate::generate_from_image,
            generate::generate_from_document,
            generate::generate_from_audio,
        ),
        components(schemas(
            generate::request::GenerateTextRequest,
            generate::response::GenerateResponse,
        ))
    )]
    struct ApiDoc;

    info!(task = "start api serving");

    let staging = StagingArea::new(staging_dir).await?;
    let state = ApiState { model, staging };

    let router = Router::new()
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .route("/healthz", get(healthz::get_health))
        .route("/generate-text", post(generate::generate_text))
        .route("/generate-from-image", post(generate::generate_from_image))
        .route(
            "/generate-from-document",
            post(generate::generate_from_document),
        )
        .route("/generate-from-audio", post(generate::generate_from_audio))
        .layer(TraceLayer::new_for_http())
        .fallback(not_found::get_404)
        .with_state(state);

    Ok(router)
}
