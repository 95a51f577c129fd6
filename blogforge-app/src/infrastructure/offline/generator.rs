use crate::domain::{
    create_slug, BlockDescriptor, BlogMetadata, GeneratedBlock, GenerationRequest,
    GenerationResult,
};
use blogforge_errors::AppError;

pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/1200x630?text=Blog+Image";

const WORDS_PER_MINUTE: usize = 200;

/// Deterministic stand-in for the generation service, used when no
/// provider is configured. Produces raw JSON so that its output goes
/// through the same validation as a live response.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGenerator;

impl OfflineGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn complete(&self, request: &GenerationRequest) -> Result<String, AppError> {
        let result = self.synthesize(request);
        serde_json::to_string(&result).map_err(|e| AppError::Internal(e.to_string()))
    }

    fn synthesize(&self, request: &GenerationRequest) -> GenerationResult {
        let topic = request.topic.trim();
        let title = format!("How to {topic}");
        let slug = create_slug(&title);

        let blocks: Vec<GeneratedBlock> = request
            .selected_structure
            .iter()
            .map(|block| placeholder_block(block, topic))
            .collect();

        let word_count: usize = blocks
            .iter()
            .map(|b| b.content.split_whitespace().count())
            .sum();

        let keywords = topic
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();

        GenerationResult {
            title,
            slug,
            blocks,
            metadata: Some(BlogMetadata {
                keywords,
                description: format!("A {} about {topic}.", request.blog_type.to_lowercase()),
                reading_time: word_count.div_ceil(WORDS_PER_MINUTE).max(1) as u32,
            }),
        }
    }
}

fn placeholder_block(block: &BlockDescriptor, topic: &str) -> GeneratedBlock {
    if block.is_image() {
        return GeneratedBlock {
            kind: block.id.to_string(),
            content: format!("Illustration for {topic}"),
            image_url: Some(PLACEHOLDER_IMAGE_URL.to_string()),
        };
    }

    GeneratedBlock {
        kind: block.id.to_string(),
        content: format!(
            "## {}\n\nPlaceholder content about **{topic}**. {}",
            block.name, block.prompt
        ),
        image_url: None,
    }
}
