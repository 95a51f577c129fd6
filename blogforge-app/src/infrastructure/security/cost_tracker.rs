use crate::config::DailyBudget;
use blogforge_errors::AppError;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Daily budget for metered generation calls. Resets at UTC midnight.
pub struct CostTracker {
    budget: DailyBudget,
    daily_requests: AtomicU32,
    last_reset: Mutex<DateTime<Utc>>,
}

impl CostTracker {
    pub fn new(budget: DailyBudget) -> Self {
        Self {
            budget,
            daily_requests: AtomicU32::new(0),
            last_reset: Mutex::new(Utc::now()),
        }
    }

    pub fn budget(&self) -> DailyBudget {
        self.budget
    }

    /// Reserves one call. The counter never moves past the budget, however
    /// many callers race for the last slot.
    pub fn check_and_increment(&self) -> Result<(), CostLimitError> {
        self.maybe_reset_daily();

        let max_requests = self.budget.max_requests();
        self.daily_requests
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                (current < max_requests).then_some(current + 1)
            })
            .map(|_| ())
            .map_err(|current| {
                if current >= self.budget.requests {
                    CostLimitError::DailyRequestLimitReached
                } else {
                    CostLimitError::DailyCostLimitReached
                }
            })
    }

    pub fn get_remaining_requests(&self) -> u32 {
        self.budget
            .max_requests()
            .saturating_sub(self.daily_requests.load(Ordering::SeqCst))
    }

    fn maybe_reset_daily(&self) {
        let now = Utc::now();
        let mut last_reset = self
            .last_reset
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if now.date_naive() != last_reset.date_naive() {
            self.daily_requests.store(0, Ordering::SeqCst);
            *last_reset = now;
            tracing::info!("Daily cost tracker reset");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostLimitError {
    DailyRequestLimitReached,
    DailyCostLimitReached,
}

impl CostLimitError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::DailyRequestLimitReached => "Daily generation limit reached. Try again tomorrow.",
            Self::DailyCostLimitReached => "Today's generation budget is spent. Try again tomorrow.",
        }
    }
}

impl From<CostLimitError> for AppError {
    fn from(e: CostLimitError) -> Self {
        AppError::RateLimited(e.message().to_string())
    }
}
