pub mod catalog;
pub mod features;
pub mod limits;
pub mod middleware;
pub mod quota;

pub use catalog::{BillingPeriod, Tier, TierError, TierPricing};
pub use features::Feature;
pub use limits::TierLimits;
pub use middleware::{check_feature, check_quota, extract_tier_from_headers, tier_middleware};
pub use quota::{HttpUsageBackend, PendingUsageBackend, QuotaLookup, QuotaStatus, UsageBackend};
