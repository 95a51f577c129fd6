use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Generation service failed: {0}")]
    GenerationService(String),

    #[error("Invalid response from generation service: {0}")]
    InvalidResponse(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FromStr for AppError {
    type Err = std::convert::Infallible;

    /// Rebuilds an error from its `Display` form, as carried across a
    /// server function boundary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn detail<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
            s.strip_prefix(prefix).map(|rest| rest.trim_start_matches(": "))
        }

        let s = s.trim();
        if let Some(msg) = detail(s, "Invalid request") {
            Ok(AppError::Validation(msg.to_string()))
        } else if let Some(msg) = detail(s, "Generation service failed") {
            Ok(AppError::GenerationService(msg.to_string()))
        } else if let Some(msg) = detail(s, "Invalid response from generation service") {
            Ok(AppError::InvalidResponse(msg.to_string()))
        } else if let Some(msg) = detail(s, "Rate limited") {
            Ok(AppError::RateLimited(msg.to_string()))
        } else if let Some(msg) = detail(s, "Configuration error") {
            Ok(AppError::Config(msg.to_string()))
        } else if let Some(msg) = detail(s, "Internal error") {
            Ok(AppError::Internal(msg.to_string()))
        } else {
            Ok(AppError::Internal(s.to_string()))
        }
    }
}

impl AppError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::Validation(msg) => msg,
            Self::GenerationService(_) => "The writing service is unavailable. Please try again.",
            Self::InvalidResponse(_) => {
                "The writing service returned an unexpected answer. Please try again."
            }
            Self::RateLimited(msg) => msg,
            Self::Config(_) | Self::Internal(_) => "Something went wrong on our side. Please try again later.",
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::RateLimited(_))
    }
}

#[cfg(feature = "ssr")]
mod ssr_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        error: String,
    }

    impl AppError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                AppError::Validation(_) => StatusCode::BAD_REQUEST,
                AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                AppError::GenerationService(_)
                | AppError::InvalidResponse(_)
                | AppError::Config(_)
                | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = self.status_code();
            let error = match &self {
                AppError::Validation(msg) | AppError::RateLimited(msg) => msg.clone(),
                other => other.user_message().to_string(),
            };
            (status, Json(ErrorResponse { error })).into_response()
        }
    }
}
