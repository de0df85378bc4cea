use serde::{Deserialize, Serialize};

use crate::tier::{BillingPeriod, Feature, Tier, TierPricing};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub tier: Tier,
    #[serde(flatten)]
    pub pricing: &'static TierPricing,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTierResponse {
    pub tier: Tier,
    pub name: &'static str,
    /// Next tier worth pitching, None on the top plan
    pub upgrade_to: Option<Tier>,
    pub pricing: &'static TierPricing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCheckRequest {
    pub tier: Tier,
    pub feature: Feature,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCheckResponse {
    pub tier: Tier,
    pub feature: Feature,
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_tier: Option<Tier>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutPriceRequest {
    pub tier: Tier,
    pub period: BillingPeriod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateRequest {
    #[serde(default)]
    pub feature: Option<Feature>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateResponse {
    pub allowed: bool,
    pub tier: Tier,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingStatus {
    pub configured: bool,
    pub placeholders: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatusResponse {
    pub ready: bool,
    pub deployment: &'static str,
    pub billing: BillingStatus,
    pub usage_backend: &'static str,
}
