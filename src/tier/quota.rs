//! Quota status read projection
//!
//! Point-in-time view of a user's consumption against their tier's limits.
//! The usage-tracking service owns the counters and mutates them on every
//! AI request; this module only reads raw counters and projects them into
//! the shape the frontend renders (percent used, exceeded flag, window).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::catalog::Tier;

/// Raw consumption counters reported by the usage service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageCounters {
    pub monthly_requests: u32,
    pub monthly_tokens: u64,
    pub monthly_cost_cents: u32,
    pub hourly_requests: u32,
    pub hourly_window_start: DateTime<Utc>,
}

/// Current billing period bounds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Quota ceilings echoed alongside the counters, for display
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotaCeilings {
    pub monthly_requests: u32,
    pub monthly_tokens: u64,
    pub monthly_cost_cents: u32,
    pub hourly_requests: u32,
}

/// Percentage of each monthly dimension consumed, capped at 100
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PercentUsed {
    pub requests: f64,
    pub tokens: f64,
    pub cost: f64,
}

/// Projected quota status for one user
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub tier: Tier,
    pub tier_name: &'static str,
    pub limits: QuotaCeilings,
    pub current: UsageCounters,
    pub percent_used: PercentUsed,
    pub quota_exceeded: bool,
    pub billing_period: BillingWindow,
}

fn percent_used(used: u64, limit: u64) -> f64 {
    if limit == 0 {
        // Zero ceiling, e.g. free-tier AI credits: any spend is 100%.
        if used == 0 {
            0.0
        } else {
            100.0
        }
    } else {
        (used as f64 / limit as f64 * 100.0).min(100.0)
    }
}

fn dimension_exceeded(used: u64, limit: u64) -> bool {
    if limit == 0 {
        used > 0
    } else {
        used >= limit
    }
}

impl QuotaStatus {
    /// Project raw counters against the tier's limit table
    pub fn project(tier: Tier, current: UsageCounters, billing_period: BillingWindow) -> Self {
        let limits = tier.limits();

        let quota_exceeded = dimension_exceeded(
            current.monthly_requests as u64,
            limits.monthly_request_limit as u64,
        ) || dimension_exceeded(current.monthly_tokens, limits.monthly_token_limit)
            || dimension_exceeded(
                current.monthly_cost_cents as u64,
                limits.monthly_cost_limit_cents as u64,
            )
            || dimension_exceeded(
                current.hourly_requests as u64,
                limits.hourly_request_limit as u64,
            );

        Self {
            tier,
            tier_name: tier.pricing().name,
            limits: QuotaCeilings {
                monthly_requests: limits.monthly_request_limit,
                monthly_tokens: limits.monthly_token_limit,
                monthly_cost_cents: limits.monthly_cost_limit_cents,
                hourly_requests: limits.hourly_request_limit,
            },
            percent_used: PercentUsed {
                requests: percent_used(
                    current.monthly_requests as u64,
                    limits.monthly_request_limit as u64,
                ),
                tokens: percent_used(current.monthly_tokens, limits.monthly_token_limit),
                cost: percent_used(
                    current.monthly_cost_cents as u64,
                    limits.monthly_cost_limit_cents as u64,
                ),
            },
            quota_exceeded,
            current,
            billing_period,
        }
    }
}

/// Result of a quota read. An unreachable or not-yet-deployed usage
/// service is reported explicitly, never coerced to zero usage.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QuotaLookup {
    Available { quota: QuotaStatus },
    Unavailable { reason: String },
}

impl QuotaLookup {
    pub fn is_available(&self) -> bool {
        matches!(self, QuotaLookup::Available { .. })
    }
}

/// Raw per-user snapshot as served by the usage service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    pub tier: Tier,
    pub current: UsageCounters,
    pub billing_period: BillingWindow,
}

/// Source of per-user usage snapshots.
/// Every read is independent and idempotent; callers may poll concurrently.
#[async_trait]
pub trait UsageBackend: Send + Sync {
    async fn quota_status(&self, user_id: &str) -> QuotaLookup;

    /// Short label for the status endpoint
    fn describe(&self) -> &'static str;
}

/// Reads snapshots from the deployed usage-tracking service over HTTP
pub struct HttpUsageBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpUsageBackend {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    async fn fetch_snapshot(&self, user_id: &str) -> anyhow::Result<UsageSnapshot> {
        let url = self.base_url.join(&format!("v1/usage/{}", user_id))?;
        let snapshot = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<UsageSnapshot>()
            .await?;
        Ok(snapshot)
    }
}

#[async_trait]
impl UsageBackend for HttpUsageBackend {
    async fn quota_status(&self, user_id: &str) -> QuotaLookup {
        match self.fetch_snapshot(user_id).await {
            Ok(snapshot) => QuotaLookup::Available {
                quota: QuotaStatus::project(
                    snapshot.tier,
                    snapshot.current,
                    snapshot.billing_period,
                ),
            },
            Err(e) => {
                tracing::warn!("usage service read failed for {}: {}", user_id, e);
                QuotaLookup::Unavailable {
                    reason: "Usage service is temporarily unreachable".to_string(),
                }
            }
        }
    }

    fn describe(&self) -> &'static str {
        "http"
    }
}

/// Stand-in while the usage-tracking service is not deployed yet.
/// Always reports Unavailable so the UI shows "coming soon" instead of
/// a misleading all-zero quota.
pub struct PendingUsageBackend;

#[async_trait]
impl UsageBackend for PendingUsageBackend {
    async fn quota_status(&self, _user_id: &str) -> QuotaLookup {
        QuotaLookup::Unavailable {
            reason: "Usage tracking coming soon: backend API in development".to_string(),
        }
    }

    fn describe(&self) -> &'static str {
        "pending"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> BillingWindow {
        BillingWindow {
            start: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap(),
        }
    }

    fn counters(requests: u32, tokens: u64, cost: u32, hourly: u32) -> UsageCounters {
        UsageCounters {
            monthly_requests: requests,
            monthly_tokens: tokens,
            monthly_cost_cents: cost,
            hourly_requests: hourly,
            hourly_window_start: Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_project_within_quota() {
        let status = QuotaStatus::project(Tier::Neural, counters(250, 1_000_000, 350, 10), window());
        assert!(!status.quota_exceeded);
        assert_eq!(status.tier_name, "Neural");
        assert_eq!(status.percent_used.requests, 50.0);
        assert_eq!(status.percent_used.tokens, 50.0);
        assert_eq!(status.percent_used.cost, 50.0);
        assert_eq!(status.limits.monthly_requests, 500);
    }

    #[test]
    fn test_project_exceeded_on_requests() {
        let status = QuotaStatus::project(Tier::Starter, counters(150, 0, 0, 0), window());
        assert!(status.quota_exceeded);
        assert_eq!(status.percent_used.requests, 100.0);
    }

    #[test]
    fn test_project_exceeded_on_hourly_only() {
        let status = QuotaStatus::project(Tier::Premium, counters(10, 1000, 10, 200), window());
        assert!(status.quota_exceeded);
    }

    #[test]
    fn test_free_zero_cost_ceiling() {
        // A zero ceiling is only exceeded once something was spent
        let untouched = QuotaStatus::project(Tier::Free, counters(1, 100, 0, 1), window());
        assert!(!untouched.quota_exceeded);
        assert_eq!(untouched.percent_used.cost, 0.0);

        let touched = QuotaStatus::project(Tier::Free, counters(1, 100, 1, 1), window());
        assert!(touched.quota_exceeded);
        assert_eq!(touched.percent_used.cost, 100.0);
    }

    #[test]
    fn test_percent_capped_at_100() {
        let status = QuotaStatus::project(Tier::Free, counters(50, 0, 0, 0), window());
        assert_eq!(status.percent_used.requests, 100.0);
    }

    #[tokio::test]
    async fn test_pending_backend_is_unavailable_not_zero() {
        let backend = PendingUsageBackend;
        let lookup = backend.quota_status("user-1").await;
        assert!(!lookup.is_available());
        match lookup {
            QuotaLookup::Unavailable { reason } => {
                assert!(reason.contains("coming soon"));
            }
            QuotaLookup::Available { .. } => panic!("expected Unavailable"),
        }
    }

    #[test]
    fn test_quota_lookup_serializes_tagged() {
        let lookup = QuotaLookup::Unavailable {
            reason: "down".to_string(),
        };
        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["reason"], "down");
    }

    #[test]
    fn test_usage_snapshot_deserializes_camel_case() {
        let json = r#"{
            "tier": "starter",
            "current": {
                "monthlyRequests": 3,
                "monthlyTokens": 1200,
                "monthlyCostCents": 0,
                "hourlyRequests": 1,
                "hourlyWindowStart": "2025-06-15T12:00:00Z"
            },
            "billingPeriod": {
                "start": "2025-06-01T00:00:00Z",
                "end": "2025-07-01T00:00:00Z"
            }
        }"#;
        let snapshot: UsageSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.tier, Tier::Starter);
        assert_eq!(snapshot.current.monthly_requests, 3);
    }
}
