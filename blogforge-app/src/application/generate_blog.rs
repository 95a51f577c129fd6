use crate::domain::{build_prompt, GenerationRequest, GenerationResult, ResponseSchema};
use crate::infrastructure::offline::OfflineGenerator;
use crate::infrastructure::openrouter::OpenRouterClient;
use crate::infrastructure::security::RequestValidator;
use blogforge_errors::AppError;

pub enum LlmBackend {
    OpenRouter(OpenRouterClient),
    Offline(OfflineGenerator),
}

/// Validates a request, asks the backend for a post and checks the answer
/// against the result contract. Holds no per-request state.
pub struct GenerateBlog {
    backend: LlmBackend,
    schema: ResponseSchema,
}

impl GenerateBlog {
    pub fn new(backend: LlmBackend, schema: ResponseSchema) -> Self {
        Self { backend, schema }
    }

    pub fn offline(schema: ResponseSchema) -> Self {
        Self::new(LlmBackend::Offline(OfflineGenerator::new()), schema)
    }

    /// Whether calls cost money at a provider.
    pub fn is_metered(&self) -> bool {
        matches!(self.backend, LlmBackend::OpenRouter(_))
    }

    pub fn backend_name(&self) -> &str {
        match &self.backend {
            LlmBackend::OpenRouter(client) => client.model(),
            LlmBackend::Offline(_) => "offline",
        }
    }

    pub async fn execute(&self, request: GenerationRequest) -> Result<GenerationResult, AppError> {
        let request = RequestValidator::validate(request)?;
        self.execute_validated(request).await
    }

    /// Runs generation for a request that already passed
    /// [`RequestValidator::validate`].
    pub async fn execute_validated(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, AppError> {
        let prompt = build_prompt(
            &request.topic,
            &request.blog_type,
            &request.internal_links,
            &request.selected_structure,
        );
        tracing::info!(
            backend = self.backend_name(),
            blocks = request.selected_structure.len(),
            links = request.internal_links.len(),
            prompt_chars = prompt.len(),
            "Generating blog post"
        );

        let raw = match &self.backend {
            LlmBackend::OpenRouter(client) => client.complete(prompt).await,
            LlmBackend::Offline(generator) => generator.complete(&request),
        }
        .inspect_err(|e| tracing::error!("Generation call failed: {}", e))?;

        let result = GenerationResult::parse(&raw, &self.schema)
            .inspect_err(|e| tracing::error!("Rejected generation output: {}", e))?;

        tracing::info!(
            slug = %result.slug,
            blocks = result.blocks.len(),
            "Generated blog post"
        );
        Ok(result)
    }
}
