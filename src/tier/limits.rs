//! Per-tier enforcement limits
//!
//! Technical ceilings checked by the backend before granting an AI request.
//! Unlike the catalog, these are the numbers enforcement actually compares
//! against; the catalog holds the copy shown next to them.

use serde::Serialize;

use super::catalog::Tier;

/// Enforcement ceilings for one tier.
/// Every numeric field is non-decreasing up the tier ladder.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TierLimits {
    /// AI requests per billing month
    pub monthly_request_limit: u32,
    /// Tokens per billing month
    pub monthly_token_limit: u64,
    /// AI spend ceiling per billing month, in cents
    pub monthly_cost_limit_cents: u32,
    /// AI requests per rolling hour
    pub hourly_request_limit: u32,
    /// Concurrent apps
    pub max_apps: u32,
    pub private_projects: bool,
    pub github_export: bool,
    pub byok: bool,
    pub add_ons: bool,
}

impl Tier {
    /// Enforcement limits for this tier
    pub fn limits(&self) -> &'static TierLimits {
        match self {
            Tier::Free => &FREE_LIMITS,
            Tier::Starter => &STARTER_LIMITS,
            Tier::Neural => &NEURAL_LIMITS,
            Tier::Premium => &PREMIUM_LIMITS,
        }
    }
}

static FREE_LIMITS: TierLimits = TierLimits {
    monthly_request_limit: 5,
    monthly_token_limit: 50_000,
    monthly_cost_limit_cents: 0,
    hourly_request_limit: 2,
    max_apps: 5,
    private_projects: false,
    github_export: false,
    byok: false,
    add_ons: false,
};

static STARTER_LIMITS: TierLimits = TierLimits {
    monthly_request_limit: 150,
    monthly_token_limit: 500_000,
    monthly_cost_limit_cents: 300, // ~$3 AI credits
    hourly_request_limit: 20,
    max_apps: 25,
    private_projects: true,
    github_export: true,
    byok: false,
    add_ons: false,
};

static NEURAL_LIMITS: TierLimits = TierLimits {
    monthly_request_limit: 500,
    monthly_token_limit: 2_000_000,
    monthly_cost_limit_cents: 700, // ~$7 AI credits
    hourly_request_limit: 50,
    max_apps: 65,
    private_projects: true,
    github_export: true,
    byok: false,
    add_ons: true,
};

static PREMIUM_LIMITS: TierLimits = TierLimits {
    monthly_request_limit: 5000,
    monthly_token_limit: 10_000_000,
    monthly_cost_limit_cents: 1500, // ~$15 AI credits
    hourly_request_limit: 200,
    max_apps: 100,
    private_projects: true,
    github_export: true,
    byok: true,
    add_ons: true,
};
