use anyhow::Context;
use async_trait::async_trait;
use gemini::models::{
    generate_content::{GenerateContent, GenerateContentRequest, Part},
    Models,
};

/// The remote model seen as a single capability, so handlers never depend
/// on a concrete client and tests can substitute a double.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, parts: Vec<Part>) -> anyhow::Result<String>;
}

#[async_trait]
impl GenerativeModel for Models {
    async fn generate(&self, parts: Vec<Part>) -> anyhow::Result<String> {
        let response = self
            .gemini_2_5_flash(GenerateContentRequest::new(parts))
            .await?;

        response.text().context("model returned no candidates")
    }
}
