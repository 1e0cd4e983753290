use anyhow::Context;

use crate::models::{generate_content::GEMINI_2_5_FLASH, Models};

use super::GenerateContent;

impl GenerateContent for Models {
    async fn gemini_2_5_flash(
        &self,
        request: super::GenerateContentRequest,
    ) -> anyhow::Result<super::GenerateContentResponse> {
        let text = self.string_response(request, GEMINI_2_5_FLASH).await?;

        let response =
            serde_json::from_str(&text).context("failed to parse response")?;

        Ok(response)
    }
}
