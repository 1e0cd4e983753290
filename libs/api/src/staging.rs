use std::path::PathBuf;

use anyhow::Context;
use axum::extract::Multipart;
use tracing::warn;
use uuid::Uuid;

use crate::response::{ApiResponse, IntoApiResponse};
use crate::ApiError;

/// A file parked in the staging area, owned by one request.
#[derive(Debug)]
pub struct StagedFile {
    pub path: PathBuf,
    pub media_type: String,
    pub file_name: String,
}

/// Parsed multipart form: the staged upload plus the optional prompt field.
#[derive(Debug)]
pub struct UploadForm {
    pub file: StagedFile,
    pub prompt: Option<String>,
}

#[derive(Clone, Debug)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub async fn new(dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&dir).await.with_context(|| {
            format!("failed to create staging directory {}", dir.display())
        })?;

        Ok(Self { dir })
    }

    /// Reads the multipart form, staging the file carried by `field_name`
    /// and collecting the optional `prompt` field. If parsing fails after
    /// the file already hit disk, the file is removed before the error is
    /// returned, so callers only ever own a file on success.
    pub async fn receive(
        &self,
        multipart: Multipart,
        field_name: &str,
    ) -> ApiResponse<UploadForm> {
        let mut staged = None;

        match self.collect(multipart, field_name, &mut staged).await {
            Ok(prompt) => match staged {
                Some(file) => Ok(UploadForm { file, prompt }),
                None => Err(ApiError::ClientError(format!(
                    "file field \"{}\" is missing",
                    field_name
                ))),
            },
            Err(e) => {
                if let Some(file) = staged {
                    self.release(&file).await;
                }
                Err(e)
            }
        }
    }

    async fn collect(
        &self,
        mut multipart: Multipart,
        field_name: &str,
        staged: &mut Option<StagedFile>,
    ) -> ApiResponse<Option<String>> {
        let mut prompt = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            ApiError::ClientError(format!(
                "failed to parse multipart form: {}",
                e
            ))
        })? {
            let name = field.name().unwrap_or("").to_string();

            if name == field_name {
                let media_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let file_name =
                    field.file_name().unwrap_or(field_name).to_string();
                let data = field.bytes().await.map_err(|e| {
                    ApiError::ClientError(format!(
                        "failed to read field \"{}\": {}",
                        field_name, e
                    ))
                })?;

                let path = self.dir.join(Uuid::new_v4().to_string());
                tokio::fs::write(&path, &data)
                    .await
                    .with_context(|| {
                        format!(
                            "failed to stage upload at {}",
                            path.display()
                        )
                    })
                    .server_error()?;

                // A repeated file field replaces the earlier upload.
                if let Some(previous) = staged.replace(StagedFile {
                    path,
                    media_type,
                    file_name,
                }) {
                    self.release(&previous).await;
                }
            } else if name == "prompt" {
                prompt = Some(field.text().await.map_err(|e| {
                    ApiError::ClientError(format!(
                        "failed to read field \"prompt\": {}",
                        e
                    ))
                })?);
            }
        }

        Ok(prompt)
    }

    /// Removes the staged file. An already-missing file is a no-op; any
    /// other failure is logged and swallowed so cleanup never takes down
    /// an in-flight response.
    pub async fn release(&self, file: &StagedFile) {
        if let Err(e) = tokio::fs::remove_file(&file.path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    path = %file.path.display(),
                    "failed to remove staged file: {}",
                    e
                );
            }
        }
    }
}
