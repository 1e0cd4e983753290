use anyhow::Context;
use gemini::models::generate_content::Part;

use crate::response::{ApiResponse, IntoApiResponse};
use crate::staging::StagedFile;
use crate::ApiError;

/// Reads the staged file and packs it as an inline-data part. The declared
/// media type is passed through untouched.
pub async fn inline_part(file: &StagedFile) -> ApiResponse<Part> {
    let bytes = tokio::fs::read(&file.path)
        .await
        .with_context(|| {
            format!("failed to read staged file {}", file.path.display())
        })
        .server_error()?;

    Ok(Part::inline_data(file.media_type.clone(), &bytes))
}

/// Like [`inline_part`], but only accepts files declared as images.
pub async fn image_part(file: &StagedFile) -> ApiResponse<Part> {
    if !file.media_type.starts_with("image/") {
        return Err(ApiError::ClientError(format!(
            "uploaded file \"{}\" is not an image: {}",
            file.file_name, file.media_type
        )));
    }

    inline_part(file).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(path: std::path::PathBuf, media_type: &str) -> StagedFile {
        StagedFile {
            path,
            media_type: media_type.to_string(),
            file_name: "upload".to_string(),
        }
    }

    #[tokio::test]
    async fn inline_part_encodes_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staged");
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let part = inline_part(&staged(path, "image/png")).await.unwrap();
        match part {
            Part::InlineData { inline_data } => {
                assert_eq!(inline_data.mime_type, "image/png");
                assert_eq!(inline_data.data, "iVBORw==");
            }
            Part::Text { .. } => panic!("expected an inline-data part"),
        }
    }

    #[tokio::test]
    async fn image_part_rejects_non_image_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staged");
        tokio::fs::write(&path, b"plain text").await.unwrap();

        let result = image_part(&staged(path, "text/plain")).await;
        assert!(matches!(result, Err(ApiError::ClientError(_))));
    }

    #[tokio::test]
    async fn inline_part_fails_when_file_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");

        let result = inline_part(&staged(path, "audio/mpeg")).await;
        assert!(matches!(result, Err(ApiError::ServerError(_))));
    }
}
