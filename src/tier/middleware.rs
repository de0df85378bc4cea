//! Axum middleware for tier extraction and gate responses

use axum::{
    body::Body,
    extract::Request,
    http::{header::HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::catalog::Tier;
use super::features::Feature;
use super::quota::QuotaStatus;

const TIER_HEADER: &str = "x-adriel-tier";

/// Tier claimed by the request. Absent or unparseable means Free —
/// a bad header must never grant a paid plan.
pub fn extract_tier_from_headers(headers: &HeaderMap) -> Tier {
    headers
        .get(TIER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

pub async fn tier_middleware(mut request: Request<Body>, next: Next) -> Response {
    let tier = extract_tier_from_headers(request.headers());
    request.extensions_mut().insert(tier);
    next.run(request).await
}

#[derive(Debug, Serialize)]
pub struct TierGateResponse {
    pub error: String,
    pub code: TierGateCode,
    pub tier: Tier,
    pub upgrade_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_tier: Option<Tier>,
}

#[derive(Debug, Serialize, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TierGateCode {
    PlanRequired,
    QuotaExceeded,
}

impl TierGateResponse {
    const UPGRADE_URL: &'static str = "https://adriel.app/pricing";

    pub fn plan_required(tier: Tier, feature: Feature) -> Self {
        Self {
            error: format!("'{}' is not included in the {} plan", feature.as_str(), tier),
            code: TierGateCode::PlanRequired,
            tier,
            upgrade_url: Self::UPGRADE_URL.to_string(),
            feature: Some(feature.as_str().to_string()),
            required_tier: feature.minimum_tier(),
        }
    }

    pub fn quota_exceeded(quota: &QuotaStatus) -> Self {
        Self {
            error: format!(
                "Monthly quota exceeded on the {} plan ({}/{} requests)",
                quota.tier, quota.current.monthly_requests, quota.limits.monthly_requests
            ),
            code: TierGateCode::QuotaExceeded,
            tier: quota.tier,
            upgrade_url: Self::UPGRADE_URL.to_string(),
            feature: None,
            required_tier: None,
        }
    }
}

impl IntoResponse for TierGateResponse {
    fn into_response(self) -> Response {
        let status = match self.code {
            TierGateCode::PlanRequired => StatusCode::PAYMENT_REQUIRED,
            TierGateCode::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
        };
        (status, Json(self)).into_response()
    }
}

#[allow(clippy::result_large_err)]
pub fn check_feature(tier: Tier, feature: Feature) -> Result<(), TierGateResponse> {
    if feature.allowed_for(tier) {
        Ok(())
    } else {
        Err(TierGateResponse::plan_required(tier, feature))
    }
}

#[allow(clippy::result_large_err)]
pub fn check_quota(quota: &QuotaStatus) -> Result<(), TierGateResponse> {
    if quota.quota_exceeded {
        Err(TierGateResponse::quota_exceeded(quota))
    } else {
        Ok(())
    }
}
