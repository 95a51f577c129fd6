use super::structure::SelectedStructure;
use blogforge_errors::AppError;
use serde::{Deserialize, Serialize};

/// Inbound generation request, as posted by the browser.
///
/// Every field defaults so that an absent field surfaces as a validation
/// failure rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, rename = "userMessage")]
    pub topic: String,
    #[serde(default)]
    pub blog_type: String,
    #[serde(default)]
    pub internal_links: Vec<String>,
    #[serde(default, rename = "selectedBlocks")]
    pub selected_structure: SelectedStructure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogMetadata {
    pub keywords: Vec<String>,
    pub description: String,
    /// Minutes.
    pub reading_time: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub title: String,
    pub slug: String,
    pub blocks: Vec<GeneratedBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BlogMetadata>,
}

/// Which optional parts of the result contract are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSchema {
    pub require_metadata: bool,
}

impl Default for ResponseSchema {
    fn default() -> Self {
        Self {
            require_metadata: true,
        }
    }
}

impl GenerationResult {
    /// Parses raw generator output and checks it against the result
    /// contract. Malformed output is rejected, never repaired.
    pub fn parse(raw: &str, schema: &ResponseSchema) -> Result<Self, AppError> {
        let json = strip_code_fence(raw);
        let result: GenerationResult = serde_json::from_str(json)
            .map_err(|e| AppError::InvalidResponse(e.to_string()))?;
        result.validate(schema)?;
        Ok(result)
    }

    pub fn validate(&self, schema: &ResponseSchema) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidResponse("title is empty".to_string()));
        }
        if self.slug.trim().is_empty() {
            return Err(AppError::InvalidResponse("slug is empty".to_string()));
        }
        if schema.require_metadata && self.metadata.is_none() {
            return Err(AppError::InvalidResponse(
                "missing field `metadata`".to_string(),
            ));
        }
        Ok(())
    }
}

/// Unwraps a single surrounding ```json fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
