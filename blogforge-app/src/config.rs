use crate::domain::ResponseSchema;
use blogforge_errors::AppError;
use std::str::FromStr;

pub const DEFAULT_OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-flash-1.5";

#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    pub per_minute: u32,
    pub per_hour: u32,
    /// Key clients by the first `X-Forwarded-For` entry instead of the peer
    /// address. Only safe behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            per_minute: 5,
            per_hour: 20,
            trust_forwarded_for: false,
        }
    }
}

/// Daily spend ceiling for metered generation calls. Whichever of the two
/// caps is hit first applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyBudget {
    pub requests: u32,
    pub cost_cents: u32,
    pub cost_per_request_cents: u32,
}

impl DailyBudget {
    /// Number of calls the budget admits per day.
    pub fn max_requests(&self) -> u32 {
        match self.cost_cents.checked_div(self.cost_per_request_cents) {
            Some(affordable) => self.requests.min(affordable),
            None => self.requests,
        }
    }
}

impl Default for DailyBudget {
    fn default() -> Self {
        Self {
            requests: 100,
            cost_cents: 500,
            cost_per_request_cents: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` selects the offline generator.
    pub openrouter: Option<OpenRouterConfig>,
    pub response_schema: ResponseSchema,
    pub rate_limits: RateLimits,
    pub budget: DailyBudget,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openrouter: None,
            response_schema: ResponseSchema::default(),
            rate_limits: RateLimits::default(),
            budget: DailyBudget::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. Unset keys fall back to
    /// defaults; set but unparsable keys are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Config::default();

        let openrouter = lookup("OPENROUTER_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| OpenRouterConfig {
                api_key,
                api_url: lookup("OPENROUTER_API_URL")
                    .unwrap_or_else(|| DEFAULT_OPENROUTER_API_URL.to_string()),
                model: lookup("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            });

        Ok(Self {
            openrouter,
            response_schema: ResponseSchema {
                require_metadata: parse_or(
                    &lookup,
                    "BLOG_REQUIRE_METADATA",
                    defaults.response_schema.require_metadata,
                )?,
            },
            rate_limits: RateLimits {
                per_minute: parse_or(
                    &lookup,
                    "RATE_LIMIT_PER_MINUTE",
                    defaults.rate_limits.per_minute,
                )?,
                per_hour: parse_or(&lookup, "RATE_LIMIT_PER_HOUR", defaults.rate_limits.per_hour)?,
                trust_forwarded_for: parse_or(
                    &lookup,
                    "TRUST_FORWARDED_FOR",
                    defaults.rate_limits.trust_forwarded_for,
                )?,
            },
            budget: DailyBudget {
                requests: parse_or(&lookup, "DAILY_REQUEST_LIMIT", defaults.budget.requests)?,
                cost_cents: parse_or(&lookup, "DAILY_COST_LIMIT_CENTS", defaults.budget.cost_cents)?,
                cost_per_request_cents: parse_or(
                    &lookup,
                    "COST_PER_REQUEST_CENTS",
                    defaults.budget.cost_per_request_cents,
                )?,
            },
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}
