use crate::application::{GenerateBlog, LlmBackend};
use crate::config::Config;
use crate::domain::{GenerationRequest, GenerationResult};
use crate::infrastructure::openrouter::OpenRouterClient;
use crate::infrastructure::security::{CostTracker, RateLimiter, RequestValidator};
use blogforge_errors::AppError;
use std::net::IpAddr;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub generate_blog: Arc<GenerateBlog>,
    pub rate_limiter: RateLimiter,
    pub cost_tracker: Arc<CostTracker>,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        let backend = match config.openrouter {
            Some(openrouter) => {
                tracing::info!("Using OpenRouter backend ({})", openrouter.model);
                LlmBackend::OpenRouter(OpenRouterClient::new(openrouter))
            }
            None => {
                tracing::warn!("OPENROUTER_API_KEY not set, using offline generator");
                LlmBackend::Offline(Default::default())
            }
        };

        Self {
            generate_blog: Arc::new(GenerateBlog::new(backend, config.response_schema)),
            rate_limiter: RateLimiter::new(config.rate_limits),
            cost_tracker: Arc::new(CostTracker::new(config.budget)),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Config::from_env().map(Self::new)
    }

    /// Entry point shared by every transport: checks the request, throttles
    /// the client, spends budget only for metered backends, then generates.
    /// Rejected requests never count against the client's quota.
    pub async fn generate(
        &self,
        client_ip: IpAddr,
        request: GenerationRequest,
    ) -> Result<GenerationResult, AppError> {
        let request = RequestValidator::validate(request).inspect_err(|e| {
            tracing::info!("Rejected generation request: {}", e);
        })?;

        self.rate_limiter.check_rate_limit(client_ip).map_err(|e| {
            tracing::warn!("Rate limited {}: {:?}", client_ip, e);
            AppError::from(e)
        })?;

        if self.generate_blog.is_metered() {
            self.cost_tracker.check_and_increment()?;
        }

        self.generate_blog.execute_validated(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateLimits;
    use crate::domain::find_block;
    use std::net::Ipv4Addr;

    fn request(topic: &str) -> GenerationRequest {
        GenerationRequest {
            topic: topic.to_string(),
            blog_type: String::new(),
            internal_links: vec![],
            selected_structure: vec![find_block("hook").unwrap().clone()].into(),
        }
    }

    #[tokio::test]
    async fn test_generate_offline() {
        let ctx = AppContext::new(Config::default());
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let result = ctx.generate(ip, request("remote work")).await.unwrap();
        assert_eq!(result.slug, "how-to-remote-work");
        assert_eq!(ctx.cost_tracker.get_remaining_requests(), 100);
    }

    #[tokio::test]
    async fn test_invalid_requests_do_not_spend_quota() {
        let ctx = AppContext::new(Config {
            rate_limits: RateLimits {
                per_minute: 1,
                per_hour: 10,
                ..RateLimits::default()
            },
            ..Config::default()
        });
        let ip = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
        for _ in 0..3 {
            assert!(matches!(
                ctx.generate(ip, request("")).await,
                Err(AppError::Validation(_))
            ));
        }
        assert!(ctx.generate(ip, request("remote work")).await.is_ok());
        assert!(matches!(
            ctx.generate(ip, request("remote work")).await,
            Err(AppError::RateLimited(_))
        ));
    }

    #[tokio::test]
    async fn test_clients_are_limited_separately() {
        let ctx = AppContext::new(Config {
            rate_limits: RateLimits {
                per_minute: 1,
                ..RateLimits::default()
            },
            ..Config::default()
        });
        let first = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
        let second = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 2));
        assert!(ctx.generate(first, request("remote work")).await.is_ok());
        assert!(ctx.generate(second, request("remote work")).await.is_ok());
    }
}
