use anyhow::{bail, Context};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Body, Client,
};
use serde::Deserialize;

pub mod generate_content;

static BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct Models {
    base_url: String,
    client: Client,
}

impl Models {
    pub fn new(api_key: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("*/*"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key)
                .context("api key is not a valid header value")?,
        );

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            base_url: BASE_URL.to_string(),
            client,
        })
    }

    async fn string_response<R: Into<Body>>(
        &self,
        request: R,
        model: &str,
    ) -> anyhow::Result<String> {
        let response = self
            .client
            .post(format!("{}/{}:generateContent", self.base_url, model))
            .header("Content-Type", "application/json")
            .body(request)
            .send()
            .await?;

        let status_code = response.status();
        let text = response.text().await?;

        if !status_code.is_success() {
            // The remote error message is relayed as-is when present.
            if let Ok(error) = serde_json::from_str::<ErrorResponse>(&text) {
                bail!(error.error.message);
            }
            bail!("status code: {}, response: {}", status_code, text);
        }

        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_carries_remote_message() {
        let body = r#"{
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED"
            }
        }"#;

        let parsed: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "Resource has been exhausted");
    }

    #[test]
    fn new_rejects_non_ascii_api_key() {
        assert!(Models::new("key\nwith newline").is_err());
    }
}
