use crate::domain::{validate_links, GenerationRequest, DEFAULT_BLOG_TYPE};
use blogforge_errors::AppError;

const MAX_TOPIC_CHARS: usize = 2000;
const MAX_LINKS: usize = 20;
const MAX_BLOCKS: usize = 30;

/// Fail-fast checks applied before any generation call.
pub struct RequestValidator;

impl RequestValidator {
    /// Returns the request with the topic and links trimmed and a default
    /// blog type filled in, or a `Validation` error.
    pub fn validate(request: GenerationRequest) -> Result<GenerationRequest, AppError> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(AppError::Validation("Topic is required".to_string()));
        }
        if topic.chars().count() > MAX_TOPIC_CHARS {
            return Err(AppError::Validation(format!(
                "Topic must be at most {MAX_TOPIC_CHARS} characters"
            )));
        }

        if request.selected_structure.is_empty() {
            return Err(AppError::Validation(
                "At least one block must be selected".to_string(),
            ));
        }
        if request.selected_structure.len() > MAX_BLOCKS {
            return Err(AppError::Validation(format!(
                "At most {MAX_BLOCKS} blocks can be selected"
            )));
        }
        if let Some(block) = request.selected_structure.first_duplicate() {
            return Err(AppError::Validation(format!(
                "\"{}\" can only be used once",
                block.name
            )));
        }

        if request.internal_links.len() > MAX_LINKS {
            return Err(AppError::Validation(format!(
                "At most {MAX_LINKS} internal links are allowed"
            )));
        }
        let internal_links = validate_links(&request.internal_links)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let blog_type = match request.blog_type.trim() {
            "" => DEFAULT_BLOG_TYPE.to_string(),
            other => other.to_string(),
        };

        Ok(GenerationRequest {
            topic: topic.to_string(),
            blog_type,
            internal_links,
            selected_structure: request.selected_structure,
        })
    }
}
