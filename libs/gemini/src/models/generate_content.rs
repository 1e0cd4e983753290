pub mod implementation;

use base64::{engine::general_purpose, Engine as _};
use reqwest::Body;
use serde::{Deserialize, Serialize};

static GEMINI_2_5_FLASH: &str = "models/gemini-2.5-flash";

pub trait GenerateContent {
    fn gemini_2_5_flash(
        &self,
        request: GenerateContentRequest,
    ) -> impl std::future::Future<Output = anyhow::Result<GenerateContentResponse>>
           + Send;
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Wraps an ordered part sequence as a single user turn.
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    pub role: String,
    // Absent when the model stopped before producing any part.
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Builds an inline-data part, encoding the raw bytes for transport.
    pub fn inline_data(mime_type: impl Into<String>, data: &[u8]) -> Self {
        Self::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: general_purpose::STANDARD.encode(data),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if the model returned one.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.as_ref()?.first()?;
        let content = candidate.content.as_ref()?;

        let text = content
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::InlineData { .. } => None,
            })
            .collect::<String>();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl From<GenerateContentRequest> for Body {
    fn from(value: GenerateContentRequest) -> Self {
        serde_json::to_string(&value).unwrap().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_gemini_wire_format() {
        let request = GenerateContentRequest::new(vec![
            Part::text("Describe this image:"),
            Part::inline_data("image/png", b"\x89PNG"),
        ]);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": "Describe this image:" },
                        {
                            "inlineData": {
                                "mimeType": "image/png",
                                "data": "iVBORw=="
                            }
                        }
                    ]
                }]
            })
        );
    }

    #[test]
    fn response_text_joins_candidate_parts() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "A red " },
                        { "text": "panda." }
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#;

        let response: GenerateContentResponse =
            serde_json::from_str(body).unwrap();
        assert_eq!(response.text().unwrap(), "A red panda.");
    }

    #[test]
    fn response_text_is_none_without_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
    }
}
